//! Loads the cube and its six faces into a [`SceneState`].
//!
//! Order of events:
//! 1. the cube frame is loaded and added to the scene
//! 2. one invisible stencil window per face is added on the frame
//! 3. all face routines run concurrently, each loading its pieces one by one
//! 4. once every routine finished, the loaded nodes are added to the scene and
//!    the face collections are filled; nested pieces become children of their
//!    face's first node
//!
//! The first failing load aborts the whole assembly.

use anyhow::Context as _;
use rand::rngs::StdRng;

use crate::{
    data_structures::{
        material::{Material, StencilTag},
        scene_graph::{Scene, SceneNode},
    },
    resources::{ModelLoader, ModelSource, mesh},
    scene::{
        Face, SceneState,
        config::{FaceSpec, SceneConfig},
    },
};

/// Nodes loaded by one face routine, in load order, each with whether it is
/// nested under the face's first node.
struct FaceBatch {
    face: Face,
    nodes: Vec<(SceneNode, bool)>,
}

pub struct SceneAssembler<S> {
    loader: ModelLoader<S>,
}

impl<S: ModelSource> SceneAssembler<S> {
    pub fn new(loader: ModelLoader<S>) -> Self {
        Self { loader }
    }

    pub fn loader(&self) -> &ModelLoader<S> {
        &self.loader
    }

    pub async fn assemble(&self, config: &SceneConfig, rng: StdRng) -> anyhow::Result<SceneState> {
        let mut scene = Scene::new();

        let mut frame = self
            .loader
            .load_model(&config.frame_model, false, 0)
            .await
            .context("cube frame")?;
        // The frame's outer shell never takes part in stencil masking
        if let Some(material) = frame.children.first_mut().and_then(SceneNode::material_mut) {
            material.stencil.write_enabled = false;
        }
        let frame = scene.add(frame);
        log::info!("Cube frame ready, loading {} faces", config.faces.len());

        let mut state = SceneState::new(scene, frame, rng);
        for spec in &config.faces {
            let window = window_node(spec, config.frame_half_extent, config.window_fill);
            let id = state.scene.add(window);
            state.masks.push((spec.face, id));
        }

        let routines = config.faces.iter().map(|spec| self.load_face(spec));
        let batches = futures::future::try_join_all(routines).await?;

        for batch in batches {
            for (node, nested) in batch.nodes {
                let rest = node.transform;
                let id = if nested {
                    let parent = state
                        .face(batch.face)
                        .get(0)
                        .with_context(|| format!("{:?} face has no node to nest under", batch.face))?;
                    state
                        .scene
                        .add_child(parent, node)
                        .with_context(|| format!("{:?} face cannot nest under {:?}", batch.face, parent))?
                } else {
                    state.scene.add(node)
                };
                state.face_mut(batch.face).push(id, rest);
            }
        }
        for face in Face::ALL {
            log::info!("{:?} face: {} nodes", face, state.face(face).len());
        }
        Ok(state)
    }

    async fn load_face(&self, spec: &FaceSpec) -> anyhow::Result<FaceBatch> {
        let mut nodes = Vec::with_capacity(spec.node_count());
        for piece in &spec.pieces {
            for i in 0..piece.count {
                let mut node = self
                    .loader
                    .load_model(&piece.model, true, u32::from(spec.stencil_ref))
                    .await
                    .with_context(|| format!("{:?} face, copy {} of {}", spec.face, i, piece.model))?;
                node.transform = (piece.layout)(i, piece.count);
                nodes.push((node, piece.nested));
            }
        }
        log::debug!("{:?} face loaded {} nodes", spec.face, nodes.len());
        Ok(FaceBatch {
            face: spec.face,
            nodes,
        })
    }
}

/// The invisible window stamping a face's reference into the stencil buffer.
fn window_node(spec: &FaceSpec, half_extent: f32, fill: f32) -> SceneNode {
    let name = format!("{:?} window", spec.face);
    let mut material = Material::new(&name, [0.0; 4]);
    material.stencil = StencilTag::mask(spec.stencil_ref);
    // windows have to be stamped before anything tests against them
    material.render_order = -1;
    material.double_sided = false;
    let side = 2.0 * half_extent * fill;
    let mut node = SceneNode::with_mesh(&name, mesh::quad(side, side, material));
    node.transform = spec.face.window_transform(half_extent);
    node
}
