//! Materials and their stencil configuration.
//!
//! A [`StencilTag`] mirrors the handful of stencil switches a material carries:
//! whether the stencil test is active at all, the reference value, the compare
//! function, and whether colour and depth are written. Reference values
//! partition the scene into per-face groups. Nothing checks that two faces use
//! distinct references; picking unique values is up to whoever configures the
//! scene.

/// Policy deciding whether a fragment passes the stencil test.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum StencilCompare {
    /// Always passes and writes the reference into the stencil buffer.
    #[default]
    Always,
    /// Passes only where the stencil buffer already holds the reference.
    Equal,
}

impl StencilCompare {
    pub fn to_wgpu(self) -> wgpu::CompareFunction {
        match self {
            StencilCompare::Always => wgpu::CompareFunction::Always,
            StencilCompare::Equal => wgpu::CompareFunction::Equal,
        }
    }

    /// What happens to the stored stencil value when a fragment passes.
    pub fn pass_op(self) -> wgpu::StencilOperation {
        match self {
            StencilCompare::Always => wgpu::StencilOperation::Replace,
            StencilCompare::Equal => wgpu::StencilOperation::Keep,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct StencilTag {
    pub write_enabled: bool,
    /// The stencil aspect of the depth attachment is 8 bits wide.
    pub reference: u8,
    pub compare: StencilCompare,
    pub colour_write: bool,
    pub depth_write: bool,
}

impl Default for StencilTag {
    fn default() -> Self {
        Self {
            write_enabled: false,
            reference: 0,
            compare: StencilCompare::Always,
            colour_write: true,
            depth_write: true,
        }
    }
}

impl StencilTag {
    /// Content that is only drawn where the stencil buffer holds `reference`.
    pub fn masked_by(reference: u8) -> Self {
        Self {
            write_enabled: true,
            reference,
            compare: StencilCompare::Equal,
            ..Default::default()
        }
    }

    /// An invisible window that stamps `reference` into the stencil buffer.
    pub fn mask(reference: u8) -> Self {
        Self {
            write_enabled: true,
            reference,
            compare: StencilCompare::Always,
            colour_write: false,
            depth_write: false,
        }
    }

    pub fn to_wgpu(&self) -> wgpu::StencilState {
        if !self.write_enabled {
            return wgpu::StencilState::default();
        }
        let face = wgpu::StencilFaceState {
            compare: self.compare.to_wgpu(),
            fail_op: wgpu::StencilOperation::Keep,
            depth_fail_op: wgpu::StencilOperation::Keep,
            pass_op: self.compare.pass_op(),
        };
        wgpu::StencilState {
            front: face,
            back: face,
            read_mask: 0xff,
            write_mask: 0xff,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Material {
    pub name: String,
    pub base_colour: [f32; 4],
    /// Lower values are drawn first.
    pub render_order: i32,
    /// Single sided materials are culled when seen from behind.
    pub double_sided: bool,
    pub stencil: StencilTag,
}

impl Material {
    pub fn new(name: &str, base_colour: [f32; 4]) -> Self {
        Self {
            name: name.to_string(),
            base_colour,
            render_order: 0,
            double_sided: true,
            stencil: StencilTag::default(),
        }
    }
}

impl Default for Material {
    fn default() -> Self {
        Self::new("default", [0.8, 0.8, 0.8, 1.0])
    }
}
