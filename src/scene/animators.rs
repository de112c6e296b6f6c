//! Per-face update rules.
//!
//! Each rule reads and writes the transforms stored on the scene nodes of one
//! [`FaceCollection`]; there is no other animation state apart from the back
//! face direction and the random generator, both owned by
//! [`SceneState`](super::SceneState). Indices refer to positions inside the
//! collection. An empty collection leaves the scene untouched.

use rand::Rng;

use crate::{
    data_structures::{scene_graph::Scene, transform::Transform},
    scene::FaceCollection,
};

/// Per-index rotation step of the front rings.
pub const FRONT_STEP: f32 = 0.0005;

pub const BACK_FORWARD: f32 = 1.0;
pub const BACK_RETURN: f32 = -4.0;
/// The last triangle turns around once it passes this z position...
pub const BACK_UPPER: f32 = 25.0;
/// ...and heads out again below this one.
pub const BACK_LOWER: f32 = -8.5;

/// Upper bound (exclusive) of the draw that picks the left face sub-rule.
const LEFT_RULES: u32 = 4;

/// Travel axis (0 = x, 1 = y, 2 = z) and direction of the right face lanes.
/// Bar `i` moves in lane `i % 3`.
pub const RIGHT_LANES: [(usize, f32); 3] = [(1, 1.0), (2, 1.0), (1, -1.0)];

pub const BOTTOM_SPIN: [f32; 3] = [0.002, 0.003, 0.001];

fn transform_mut<'a>(
    scene: &'a mut Scene,
    faces: &FaceCollection,
    idx: usize,
) -> Option<&'a mut Transform> {
    faces
        .get(idx)
        .and_then(|id| scene.get_mut(id))
        .map(|node| &mut node.transform)
}

/// Every ring spins around x and y; the further out, the faster.
pub fn front(scene: &mut Scene, faces: &FaceCollection) {
    for (i, id) in faces.iter() {
        if let Some(node) = scene.get_mut(id) {
            let step = i as f32 * FRONT_STEP;
            node.transform.rotation.x += step;
            node.transform.rotation.y += step;
        }
    }
}

/// Triangles travel along z, bouncing between [`BACK_LOWER`] and
/// [`BACK_UPPER`]. They head back four times as fast as they leave.
pub fn back(scene: &mut Scene, faces: &FaceCollection, direction: &mut f32) {
    for (i, id) in faces.iter() {
        if let Some(node) = scene.get_mut(id) {
            node.transform.position.z += (i as f32 / 300.0) * *direction;
            node.transform.rotation.z += (i as f32 / 1000.0) * *direction;
        }
    }
    let last_z = match faces.last().and_then(|id| scene.get(id)) {
        Some(node) => node.transform.position.z,
        None => return,
    };
    if last_z > BACK_UPPER {
        *direction = BACK_RETURN;
    } else if last_z < BACK_LOWER {
        *direction = BACK_FORWARD;
    }
}

/// Jolts one random block per frame.
///
/// An even draw moves the block vertically around its rest height, an odd
/// draw additionally stretches it vertically. Returns the index of the block
/// that changed.
pub fn left(scene: &mut Scene, faces: &FaceCollection, rng: &mut impl Rng) -> Option<usize> {
    if faces.is_empty() {
        return None;
    }
    let idx = rng.gen_range(0..faces.len());
    let rule = rng.gen_range(0..LEFT_RULES);
    let rest_y = faces.rest(idx).map(|rest| rest.position.y).unwrap_or(0.0);
    let transform = transform_mut(scene, faces, idx)?;
    transform.position.y = rest_y + rng.gen_range(-1.5f32..1.5);
    if rule % 2 == 1 {
        transform.scale.y = rng.gen_range(0.5f32..2.5);
    }
    Some(idx)
}

/// Bars stream along their lane and respawn on the far side.
///
/// Speed and travel distance are drawn anew on every call.
pub fn right(scene: &mut Scene, faces: &FaceCollection, rng: &mut impl Rng) {
    for (i, id) in faces.iter() {
        let (axis, sign) = RIGHT_LANES[i % RIGHT_LANES.len()];
        let speed = rng.gen_range(0.05f32..0.2);
        let travel = rng.gen_range(8.0f32..12.0);
        if let Some(node) = scene.get_mut(id) {
            let position = &mut node.transform.position[axis];
            *position += speed * sign;
            if *position * sign > travel {
                *position = -sign * rng.gen_range(8.0f32..12.0);
            }
        }
    }
}

/// The diamond (index 0) spins and carries its child hexagons along; the
/// hexagons pulse up and down in alternating directions with its rotation and
/// shrink with their index.
pub fn top(scene: &mut Scene, faces: &FaceCollection) {
    let theta = match transform_mut(scene, faces, 0) {
        Some(diamond) => {
            diamond.rotation.x += 0.01;
            diamond.rotation.y += 0.005;
            diamond.rotation.y
        }
        None => return,
    };
    let wave = theta.sin();
    for (i, id) in faces.iter().skip(1) {
        let k = i - 1;
        let sign = if k % 2 == 0 { 1.0 } else { -1.0 };
        let factor = (1.0 - k as f32 * 0.1) * (0.75 + 0.25 * wave);
        if let Some(node) = scene.get_mut(id) {
            node.transform.position.y = wave * 2.0 * sign;
            node.transform.scale = cgmath::Vector3::new(factor, factor, factor);
        }
    }
}

/// The planet turns slowly around all three axes.
pub fn bottom(scene: &mut Scene, faces: &FaceCollection) {
    if let Some(planet) = transform_mut(scene, faces, 0) {
        planet.rotation.x += BOTTOM_SPIN[0];
        planet.rotation.y += BOTTOM_SPIN[1];
        planet.rotation.z += BOTTOM_SPIN[2];
    }
}
