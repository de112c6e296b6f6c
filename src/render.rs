//! Drawing a [`Scene`] with per-material stencil state.
//!
//! The renderer uploads every mesh of the scene once. Each frame only the
//! model uniforms are rewritten; the set of meshes never changes after the
//! scene was assembled. Draws are issued by ascending render order, ties keep
//! scene traversal order, so the stencil windows are stamped before the face
//! content that tests against them.

use std::collections::HashMap;

use wgpu::util::DeviceExt;

use crate::{
    context::Context,
    data_structures::{model::GpuMesh, scene_graph::Scene, transform::ModelUniform},
    pipelines::{self, PipelineKey},
};

#[derive(Debug)]
struct DrawCall {
    mesh: GpuMesh,
    uniform: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
    key: PipelineKey,
    reference: u8,
}

#[derive(Debug)]
pub struct SceneRenderer {
    pipelines: HashMap<PipelineKey, wgpu::RenderPipeline>,
    /// One entry per mesh, in scene traversal order.
    draws: Vec<DrawCall>,
    /// Indices into `draws` in submission order.
    order: Vec<usize>,
}

impl SceneRenderer {
    pub fn new(ctx: &Context, scene: &Scene) -> Self {
        let model_layout = pipelines::model_bind_group_layout(&ctx.device);
        let mut pipelines = HashMap::new();
        let mut draws = Vec::new();
        let mut render_orders = Vec::new();

        for (world, mesh) in scene.draws() {
            let material = &mesh.material;
            let key = PipelineKey::of(material);
            pipelines.entry(key).or_insert_with(|| {
                log::debug!("Creating pipeline for {:?}", key);
                pipelines::mk_stencil_pipeline(
                    &ctx.device,
                    ctx.config.format,
                    &ctx.camera.bind_group_layout,
                    &model_layout,
                    key,
                )
            });

            let uniform = ctx.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(&format!("{} Model Buffer", material.name)),
                contents: bytemuck::cast_slice(&[ModelUniform::new(world, material.base_colour)]),
                usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            });
            let bind_group = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
                layout: &model_layout,
                entries: &[wgpu::BindGroupEntry {
                    binding: 0,
                    resource: uniform.as_entire_binding(),
                }],
                label: Some("model_bind_group"),
            });

            render_orders.push(material.render_order);
            draws.push(DrawCall {
                mesh: GpuMesh::upload(&ctx.device, &material.name, mesh),
                uniform,
                bind_group,
                key,
                reference: material.stencil.reference,
            });
        }

        let order = draw_order(&render_orders);
        log::info!(
            "Uploaded {} meshes using {} pipelines",
            draws.len(),
            pipelines.len()
        );
        Self {
            pipelines,
            draws,
            order,
        }
    }

    /// Rewrites the model uniforms from the scene's current transforms.
    ///
    /// The scene must be the one this renderer was created from.
    pub fn write_to_buffers(&self, queue: &wgpu::Queue, scene: &Scene) {
        for (draw, (world, mesh)) in self.draws.iter().zip(scene.draws()) {
            let uniform = ModelUniform::new(world, mesh.material.base_colour);
            queue.write_buffer(&draw.uniform, 0, bytemuck::cast_slice(&[uniform]));
        }
    }

    pub fn draw(&self, render_pass: &mut wgpu::RenderPass<'_>, camera_bind_group: &wgpu::BindGroup) {
        render_pass.set_bind_group(0, camera_bind_group, &[]);
        let mut bound: Option<PipelineKey> = None;
        for draw in self.order.iter().map(|&i| &self.draws[i]) {
            if draw.mesh.num_elements == 0 {
                continue;
            }
            if bound != Some(draw.key) {
                if let Some(pipeline) = self.pipelines.get(&draw.key) {
                    render_pass.set_pipeline(pipeline);
                    bound = Some(draw.key);
                } else {
                    continue;
                }
            }
            render_pass.set_stencil_reference(u32::from(draw.reference));
            render_pass.set_bind_group(1, &draw.bind_group, &[]);
            render_pass.set_vertex_buffer(0, draw.mesh.vertex_buffer.slice(..));
            render_pass.set_index_buffer(draw.mesh.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
            render_pass.draw_indexed(0..draw.mesh.num_elements, 0, 0..1);
        }
    }

    pub fn len(&self) -> usize {
        self.draws.len()
    }

    pub fn is_empty(&self) -> bool {
        self.draws.is_empty()
    }
}

/// Stable ordering of draw indices by ascending render order.
fn draw_order(render_orders: &[i32]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..render_orders.len()).collect();
    order.sort_by_key(|&i| render_orders[i]);
    order
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn windows_come_first_and_ties_keep_order() {
        assert_eq!(draw_order(&[0, -1, 0, -1, 2, 0]), vec![1, 3, 0, 2, 5, 4]);
    }
}
