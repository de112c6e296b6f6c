use crate::data_structures::{material::Material, scene_graph::MeshData};

/**
 * A flat rectangle in the xy plane facing +z, centered on the origin.
 *
 * Used for the stencil windows on the cube frame. It is single sided (counter
 * clockwise seen from +z): a window facing away from the camera must not
 * stamp over the one facing it.
 */
pub fn quad(width: f32, height: f32, material: Material) -> MeshData {
    let (w, h) = (width / 2.0, height / 2.0);
    let positions = vec![[-w, -h, 0.0], [w, -h, 0.0], [w, h, 0.0], [-w, h, 0.0]];
    let normals = vec![[0.0, 0.0, 1.0]; 4];
    let indices = vec![0, 1, 2, 0, 2, 3];
    MeshData {
        positions,
        normals,
        indices,
        material,
    }
}

/**
 * Area-weighted vertex normals for meshes that were exported without them.
 *
 * Every triangle adds its (unnormalized) face normal to its three vertices,
 * the sums are normalized at the end. Vertices not referenced by any triangle
 * keep a zero normal.
 */
pub fn compute_normals(positions: &[[f32; 3]], indices: &[u32]) -> Vec<[f32; 3]> {
    use cgmath::InnerSpace;

    let mut normals = vec![cgmath::Vector3::new(0.0f32, 0.0, 0.0); positions.len()];
    for c in indices.chunks_exact(3) {
        let (a, b, d) = (c[0] as usize, c[1] as usize, c[2] as usize);
        if a >= positions.len() || b >= positions.len() || d >= positions.len() {
            continue;
        }
        let p0: cgmath::Vector3<f32> = positions[a].into();
        let p1: cgmath::Vector3<f32> = positions[b].into();
        let p2: cgmath::Vector3<f32> = positions[d].into();
        let face = (p1 - p0).cross(p2 - p0);
        normals[a] += face;
        normals[b] += face;
        normals[d] += face;
    }
    normals
        .into_iter()
        .map(|n| {
            if n.magnitude2() > 0.0 {
                n.normalize().into()
            } else {
                [0.0; 3]
            }
        })
        .collect()
}
