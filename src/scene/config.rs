//! Declarative description of the cube.
//!
//! A [`SceneConfig`] lists the cube frame model and, for every face, the
//! stencil reference and the pieces to load. A piece is a model path, how
//! many copies to load and a layout rule computing each copy's starting
//! transform from its index. Nested pieces hang off the face's first node,
//! the way the top face's hexagons follow the diamond.

use std::f32::consts::TAU;

use crate::{
    data_structures::transform::Transform,
    scene::{Face, animators::RIGHT_LANES},
};

/// Starting transform of copy `index` out of `count`.
pub type Layout = fn(index: usize, count: usize) -> Transform;

/// Distance of the hexagons from the diamond, in the diamond's local space.
const HEXAGON_RADIUS: f32 = 1.5;

#[derive(Clone, Debug)]
pub struct PieceSpec {
    pub model: String,
    pub count: usize,
    pub layout: Layout,
    /// Copies are attached as children of the face's first node and laid
    /// out in its local space.
    pub nested: bool,
}

impl PieceSpec {
    pub fn new(model: &str, count: usize, layout: Layout) -> Self {
        Self {
            model: model.to_string(),
            count,
            layout,
            nested: false,
        }
    }

    pub fn nested(mut self) -> Self {
        self.nested = true;
        self
    }
}

#[derive(Clone, Debug)]
pub struct FaceSpec {
    pub face: Face,
    /// Stencil value the face's window writes and its pieces test against.
    pub stencil_ref: u8,
    pub pieces: Vec<PieceSpec>,
}

impl FaceSpec {
    pub fn node_count(&self) -> usize {
        self.pieces.iter().map(|piece| piece.count).sum()
    }
}

#[derive(Clone, Debug)]
pub struct SceneConfig {
    pub frame_model: String,
    /// Distance from the cube centre to each face window.
    pub frame_half_extent: f32,
    /// Side length of a face window relative to the face.
    pub window_fill: f32,
    pub faces: Vec<FaceSpec>,
}

pub mod layouts {
    //! Layout rules of the bundled scene.

    use super::*;

    pub fn nucleus(_: usize, _: usize) -> Transform {
        Transform::new().with_uniform_scale(1.2)
    }

    pub fn ring(i: usize, _: usize) -> Transform {
        Transform::new()
            .with_uniform_scale(1.0 + i as f32 * 0.12)
            .with_rotation(i as f32 * 0.1, i as f32 * 0.05, 0.0)
    }

    pub fn triangle(i: usize, _: usize) -> Transform {
        Transform::new()
            .with_position(0.0, 0.0, -(i as f32) * 0.2)
            .with_rotation(0.0, 0.0, i as f32 * 0.25)
            .with_uniform_scale(0.5 + i as f32 * 0.1)
    }

    /// A 5 wide grid in the yz plane.
    pub fn block(i: usize, _: usize) -> Transform {
        let (row, col) = ((i / 5) as f32, (i % 5) as f32);
        Transform::new()
            .with_position(0.0, (row - 2.0) * 1.6, (col - 2.0) * 1.6)
            .with_uniform_scale(0.7)
    }

    /// Bars are dealt round-robin into the lanes of [`RIGHT_LANES`] and spaced
    /// out along their travel axis.
    pub fn bar(i: usize, _: usize) -> Transform {
        let lane = i % RIGHT_LANES.len();
        let slot = (i / RIGHT_LANES.len()) as f32;
        let (axis, sign) = RIGHT_LANES[lane];
        let mut transform = Transform::new();
        transform.position.x = lane as f32 * 1.5 - 1.5;
        transform.position[axis] = sign * (-8.0 + slot * 4.0);
        // spread the lane across the axis it does not travel on
        let across = if axis == 1 { 2 } else { 1 };
        transform.position[across] = (slot - 1.5) * 1.5;
        transform
    }

    pub fn diamond(_: usize, _: usize) -> Transform {
        Transform::new().with_uniform_scale(2.0)
    }

    /// Evenly spread on a ring around the diamond they are attached to.
    pub fn hexagon(i: usize, count: usize) -> Transform {
        let angle = i as f32 * TAU / count.max(1) as f32;
        Transform::new()
            .with_position(HEXAGON_RADIUS * angle.cos(), 0.0, HEXAGON_RADIUS * angle.sin())
            .with_rotation(0.0, -angle, 0.0)
            .with_uniform_scale(1.0 - i as f32 * 0.1)
    }

    pub fn planet(_: usize, _: usize) -> Transform {
        Transform::new()
            .with_rotation(0.4, 0.0, 0.0)
            .with_uniform_scale(3.0)
    }
}

impl SceneConfig {
    /// Ring/triangle/hexagon counts of the full build.
    pub fn full() -> Self {
        Self::with_counts(30, 20, 8)
    }

    /// A lighter variant with fewer moving pieces; same models and animators.
    pub fn demo() -> Self {
        Self::with_counts(12, 8, 4)
    }

    fn with_counts(rings: usize, triangles: usize, hexagons: usize) -> Self {
        use layouts::*;

        let face = |face, stencil_ref, pieces| FaceSpec {
            face,
            stencil_ref,
            pieces,
        };
        Self {
            frame_model: "models/cube_frame.glb".to_string(),
            frame_half_extent: 5.0,
            window_fill: 0.9,
            faces: vec![
                face(
                    Face::Front,
                    1,
                    vec![
                        PieceSpec::new("models/nucleus.glb", 1, nucleus),
                        PieceSpec::new("models/ring.glb", rings, ring),
                    ],
                ),
                face(
                    Face::Back,
                    2,
                    vec![PieceSpec::new("models/triangle.glb", triangles, triangle)],
                ),
                face(
                    Face::Left,
                    3,
                    vec![PieceSpec::new("models/block.glb", 25, block)],
                ),
                face(
                    Face::Right,
                    4,
                    vec![PieceSpec::new("models/bar.glb", 12, bar)],
                ),
                face(
                    Face::Top,
                    5,
                    vec![
                        PieceSpec::new("models/diamond.glb", 1, diamond),
                        PieceSpec::new("models/hexagon.glb", hexagons, hexagon).nested(),
                    ],
                ),
                face(
                    Face::Bottom,
                    6,
                    vec![PieceSpec::new("models/planet.glb", 1, planet)],
                ),
            ],
        }
    }

    pub fn face(&self, face: Face) -> Option<&FaceSpec> {
        self.faces.iter().find(|spec| spec.face == face)
    }

    /// Number of model loads an assembly performs, frame included.
    pub fn total_loads(&self) -> usize {
        1 + self.faces.iter().map(FaceSpec::node_count).sum::<usize>()
    }
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self::full()
    }
}
