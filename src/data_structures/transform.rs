//! Node transformation data.
//!
//! Every scene node carries a [`Transform`] that the animators mutate in
//! place. Rotation is stored as XYZ Euler angles in radians so that per-axis
//! increments stay trivial; it is converted to a quaternion only when a matrix
//! is needed.

use cgmath::{Euler, Matrix, Quaternion, Rad, SquareMatrix};

/// Local transformation of a scene node: position, Euler rotation and scale.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    pub position: cgmath::Vector3<f32>,
    /// XYZ Euler angles in radians.
    pub rotation: cgmath::Vector3<f32>,
    pub scale: cgmath::Vector3<f32>,
}

impl Transform {
    /// Identity transformation (no move, rotate, or scale).
    pub fn new() -> Self {
        Self {
            position: cgmath::Vector3::new(0.0, 0.0, 0.0),
            rotation: cgmath::Vector3::new(0.0, 0.0, 0.0),
            scale: cgmath::Vector3::new(1.0, 1.0, 1.0),
        }
    }

    pub fn with_uniform_scale(mut self, scale: f32) -> Self {
        self.scale = cgmath::Vector3::new(scale, scale, scale);
        self
    }

    pub fn with_position(mut self, x: f32, y: f32, z: f32) -> Self {
        self.position = cgmath::Vector3::new(x, y, z);
        self
    }

    pub fn with_rotation(mut self, x: f32, y: f32, z: f32) -> Self {
        self.rotation = cgmath::Vector3::new(x, y, z);
        self
    }

    pub fn quaternion(&self) -> Quaternion<f32> {
        Quaternion::from(Euler {
            x: Rad(self.rotation.x),
            y: Rad(self.rotation.y),
            z: Rad(self.rotation.z),
        })
    }

    pub fn to_matrix(&self) -> cgmath::Matrix4<f32> {
        cgmath::Matrix4::from_translation(self.position)
            * cgmath::Matrix4::from(self.quaternion())
            * cgmath::Matrix4::from_nonuniform_scale(self.scale.x, self.scale.y, self.scale.z)
    }

    /// Builds a transform from glTF's decomposed `(translation, rotation, scale)`.
    pub fn from_decomposed(decomposed: ([f32; 3], [f32; 4], [f32; 3])) -> Self {
        let (translation, [x, y, z, w], scale) = decomposed;
        let euler = Euler::from(Quaternion::new(w, x, y, z));
        Self {
            position: translation.into(),
            rotation: cgmath::Vector3::new(euler.x.0, euler.y.0, euler.z.0),
            scale: scale.into(),
        }
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::new()
    }
}

impl From<cgmath::Vector3<f32>> for Transform {
    fn from(position: cgmath::Vector3<f32>) -> Self {
        Transform {
            position,
            ..Default::default()
        }
    }
}

/**
 * The raw model uniform is the actual per-draw data stored on the GPU
 */
#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ModelUniform {
    model: [[f32; 4]; 4],
    // mat3 columns are padded to vec4 in uniform buffers
    normal: [[f32; 4]; 3],
    colour: [f32; 4],
}

impl ModelUniform {
    pub fn new(world: cgmath::Matrix4<f32>, colour: [f32; 4]) -> Self {
        // inverse-transpose keeps normals perpendicular under non-uniform scale
        let normal = world
            .invert()
            .map(|inv| inv.transpose())
            .unwrap_or(cgmath::Matrix4::identity());
        let column = |c: cgmath::Vector4<f32>| [c.x, c.y, c.z, 0.0];
        Self {
            model: world.into(),
            normal: [column(normal.x), column(normal.y), column(normal.z)],
            colour,
        }
    }
}

#[cfg(test)]
mod tests {
    use cgmath::{InnerSpace, Transform as _, Vector3};

    use super::*;

    #[test]
    fn identity_matrix_keeps_points() {
        let point = cgmath::Point3::new(1.0, 2.0, 3.0);
        let moved = Transform::new().to_matrix().transform_point(point);
        assert!((moved - point).magnitude() < 1e-6);
    }

    #[test]
    fn decomposed_quaternion_survives_euler_roundtrip() {
        let half = std::f32::consts::FRAC_PI_4;
        // 90 degrees about z
        let t = Transform::from_decomposed((
            [1.0, 0.0, 0.0],
            [0.0, 0.0, half.sin(), half.cos()],
            [1.0; 3],
        ));
        let rotated = t.quaternion() * Vector3::new(1.0, 0.0, 0.0);
        assert!((rotated - Vector3::new(0.0, 1.0, 0.0)).magnitude() < 1e-5);
        assert_eq!(t.position, Vector3::new(1.0, 0.0, 0.0));
    }
}
