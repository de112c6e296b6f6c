use std::{future::Future, pin::Pin};

use anyhow::{Context as _, anyhow};

use crate::data_structures::{
    material::Material,
    scene_graph::{MeshData, SceneNode},
    transform::Transform,
};

/**
 * This module contains all logic for loading meshes and materials from external files.
 */
pub mod mesh;
pub mod stencil;

/// Boxed future returned by [`ModelSource::fetch`]. Not `Send`, so the same
/// source works inside `wasm_bindgen_futures::spawn_local`.
pub type Fetch<'a> = Pin<Box<dyn Future<Output = anyhow::Result<Vec<u8>>> + 'a>>;

/// Where model bytes come from.
///
/// [`AssetSource`] reads the bundled assets; tests plug in in-memory sources.
pub trait ModelSource {
    fn fetch<'a>(&'a self, path: &'a str) -> Fetch<'a>;
}

/// Reads files below `root` from disk, or over HTTP relative to the page
/// origin when running in the browser.
#[derive(Clone, Debug)]
pub struct AssetSource {
    root: String,
}

impl AssetSource {
    pub fn new(root: impl Into<String>) -> Self {
        Self { root: root.into() }
    }
}

impl ModelSource for AssetSource {
    fn fetch<'a>(&'a self, path: &'a str) -> Fetch<'a> {
        Box::pin(load_binary(&self.root, path))
    }
}

#[cfg(target_arch = "wasm32")]
fn format_url(root: &str, file_name: &str) -> anyhow::Result<reqwest::Url> {
    let window = web_sys::window().ok_or_else(|| anyhow!("no browser window"))?;
    let origin = window
        .location()
        .origin()
        .map_err(|_| anyhow!("page origin unavailable"))?;
    let base = reqwest::Url::parse(&format!("{}/{}/", origin, root))?;
    Ok(base.join(file_name)?)
}

pub async fn load_binary(root: &str, file_name: &str) -> anyhow::Result<Vec<u8>> {
    #[cfg(target_arch = "wasm32")]
    let data = {
        let url = format_url(root, file_name)?;
        reqwest::get(url).await?.bytes().await?.to_vec()
    };
    #[cfg(not(target_arch = "wasm32"))]
    let data = {
        let path = std::path::Path::new(root).join(file_name);
        tokio::fs::read(&path)
            .await
            .with_context(|| format!("reading {}", path.display()))?
    };

    Ok(data)
}

/// Resolves a buffer URI next to the model that references it.
fn sibling(model_path: &str, uri: &str) -> String {
    match model_path.rfind('/') {
        Some(idx) => format!("{}/{}", &model_path[..idx], uri),
        None => uri.to_string(),
    }
}

/// Loads glTF models and optionally tags them for stencil masking.
pub struct ModelLoader<S> {
    source: S,
}

impl<S: ModelSource> ModelLoader<S> {
    pub fn new(source: S) -> Self {
        Self { source }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Fetches and parses the model at `path`.
    ///
    /// With `need_stencil` the model's stencil materials (see [`stencil`]) are
    /// set to only render where the stencil buffer equals `ref_num`, which has
    /// to fit the 8 bit stencil buffer. Without
    /// it, no material is touched.
    pub async fn load_model(
        &self,
        path: &str,
        need_stencil: bool,
        ref_num: u32,
    ) -> anyhow::Result<SceneNode> {
        let bytes = self
            .source
            .fetch(path)
            .await
            .with_context(|| format!("failed to fetch model {}", path))?;
        let mut node = self
            .parse_gltf(path, &bytes)
            .await
            .with_context(|| format!("failed to parse model {}", path))?;
        if need_stencil {
            let reference = u8::try_from(ref_num).map_err(|_| {
                anyhow!("stencil reference {} of {} exceeds the 8 bit stencil buffer", ref_num, path)
            })?;
            let tagged = stencil::tag_stencil(&mut node, reference);
            if tagged == 0 {
                log::warn!(
                    "No stencil material found in {} ({:?}); it will render unmasked.",
                    path,
                    stencil::classify(&node)
                );
            }
        }
        log::debug!("Loaded {} (stencil: {}, ref: {})", path, need_stencil, ref_num);
        Ok(node)
    }

    async fn parse_gltf(&self, path: &str, bytes: &[u8]) -> anyhow::Result<SceneNode> {
        let gltf = gltf::Gltf::from_slice(bytes)?;

        // Load buffers
        let mut buffer_data = Vec::new();
        for buffer in gltf.buffers() {
            match buffer.source() {
                gltf::buffer::Source::Bin => {
                    let blob = gltf
                        .blob
                        .as_deref()
                        .ok_or_else(|| anyhow!("buffer {} refers to a missing GLB chunk", buffer.index()))?;
                    buffer_data.push(blob.to_vec());
                }
                gltf::buffer::Source::Uri(uri) => {
                    let bin = self.source.fetch(&sibling(path, uri)).await?;
                    buffer_data.push(bin);
                }
            }
        }

        let scene = gltf
            .default_scene()
            .or_else(|| gltf.scenes().next())
            .ok_or_else(|| anyhow!("model contains no scene"))?;

        // The scene itself becomes the returned node, its root nodes its children
        let mut root = SceneNode::new(scene.name().unwrap_or(path));
        for node in scene.nodes() {
            root.add_child(to_scene_node(node, &buffer_data));
        }
        Ok(root)
    }
}

/// Converts a glTF node and its subtree.
///
/// A mesh with a single primitive stays on the node. A mesh with several
/// primitives is split into one mesh child per primitive, placed before the
/// node's own children, so every material slot is a sibling of the others.
pub fn to_scene_node(node: gltf::scene::Node, buffers: &[Vec<u8>]) -> SceneNode {
    let name = node.name().unwrap_or("unnamed").to_string();
    let mut scene_node = SceneNode::new(&name);
    scene_node.transform = Transform::from_decomposed(node.transform().decomposed());

    if let Some(mesh) = node.mesh() {
        let mut primitives: Vec<MeshData> = mesh
            .primitives()
            .filter_map(|primitive| read_primitive(&primitive, buffers))
            .collect();
        if primitives.len() == 1 {
            scene_node.mesh = primitives.pop();
        } else {
            for (idx, mesh) in primitives.into_iter().enumerate() {
                scene_node.add_child(SceneNode::with_mesh(&format!("{}.{}", name, idx), mesh));
            }
        }
    }
    for child in node.children() {
        scene_node.add_child(to_scene_node(child, buffers));
    }
    scene_node
}

fn read_primitive(primitive: &gltf::Primitive, buffers: &[Vec<u8>]) -> Option<MeshData> {
    if primitive.mode() != gltf::mesh::Mode::Triangles {
        log::warn!(
            "Skipping primitive {} with unsupported mode {:?}",
            primitive.index(),
            primitive.mode()
        );
        return None;
    }
    let reader = primitive.reader(|buffer| buffers.get(buffer.index()).map(|b| b.as_slice()));

    let positions: Vec<[f32; 3]> = match reader.read_positions() {
        Some(positions) => positions.collect(),
        None => {
            log::warn!("Skipping primitive {} without positions", primitive.index());
            return None;
        }
    };
    let indices: Vec<u32> = match reader.read_indices() {
        Some(indices) => indices.into_u32().collect(),
        None => (0..positions.len() as u32).collect(),
    };
    let normals = match reader.read_normals() {
        Some(normals) => normals.collect(),
        None => mesh::compute_normals(&positions, &indices),
    };

    let material = primitive.material();
    let material = Material::new(
        material.name().unwrap_or("unnamed"),
        material.pbr_metallic_roughness().base_color_factor(),
    );

    Some(MeshData {
        positions,
        normals,
        indices,
        material,
    })
}
