//! Builds small glTF files in memory.
//!
//! Every primitive is the same triangle; only names, materials and the
//! hierarchy vary, which is all the loader and the stencil tagging look at.

use serde_json::{Value, json};

const TRIANGLE: [[f32; 3]; 3] = [[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]];
const GLB_MAGIC: u32 = 0x4654_6C67;
const CHUNK_JSON: u32 = 0x4E4F_534A;
const CHUNK_BIN: u32 = 0x004E_4942;
const ARRAY_BUFFER: u32 = 34962;
const ELEMENT_ARRAY_BUFFER: u32 = 34963;

#[derive(Clone, Debug)]
pub struct NodeSpec {
    pub name: String,
    /// One primitive per material; empty for a group node without a mesh.
    pub materials: Vec<String>,
    pub children: Vec<NodeSpec>,
}

impl NodeSpec {
    pub fn mesh(name: &str, material: &str) -> Self {
        Self::primitives(name, &[material])
    }

    /// A node whose mesh has one primitive per material.
    pub fn primitives(name: &str, materials: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            materials: materials.iter().map(|m| m.to_string()).collect(),
            children: vec![],
        }
    }

    pub fn group(name: &str, children: Vec<NodeSpec>) -> Self {
        Self {
            name: name.to_string(),
            materials: vec![],
            children,
        }
    }
}

#[derive(Default)]
struct Builder {
    nodes: Vec<Value>,
    meshes: Vec<Value>,
    materials: Vec<Value>,
    accessors: Vec<Value>,
    views: Vec<Value>,
    bin: Vec<u8>,
}

impl Builder {
    fn add_node(&mut self, spec: &NodeSpec) -> usize {
        let idx = self.nodes.len();
        self.nodes.push(Value::Null);
        let children: Vec<usize> = spec.children.iter().map(|c| self.add_node(c)).collect();

        let mut node = json!({ "name": spec.name });
        if !spec.materials.is_empty() {
            node["mesh"] = json!(self.add_mesh(&spec.materials));
        }
        if !children.is_empty() {
            node["children"] = json!(children);
        }
        self.nodes[idx] = node;
        idx
    }

    fn add_view(&mut self, bytes: &[u8], target: u32) -> usize {
        self.views.push(json!({
            "buffer": 0,
            "byteOffset": self.bin.len(),
            "byteLength": bytes.len(),
            "target": target,
        }));
        self.bin.extend_from_slice(bytes);
        self.views.len() - 1
    }

    fn add_accessor(&mut self, accessor: Value) -> usize {
        self.accessors.push(accessor);
        self.accessors.len() - 1
    }

    fn add_primitive(&mut self, material: &str) -> Value {
        let positions: Vec<u8> = TRIANGLE
            .iter()
            .flatten()
            .flat_map(|c| c.to_le_bytes())
            .collect();
        let indices: Vec<u8> = [0u32, 1, 2].iter().flat_map(|i| i.to_le_bytes()).collect();

        let view = self.add_view(&positions, ARRAY_BUFFER);
        let position = self.add_accessor(json!({
            "bufferView": view,
            "componentType": 5126,
            "count": 3,
            "type": "VEC3",
            "min": [0.0, 0.0, 0.0],
            "max": [1.0, 1.0, 0.0],
        }));
        let view = self.add_view(&indices, ELEMENT_ARRAY_BUFFER);
        let index = self.add_accessor(json!({
            "bufferView": view,
            "componentType": 5125,
            "count": 3,
            "type": "SCALAR",
        }));

        self.materials.push(json!({
            "name": material,
            "pbrMetallicRoughness": { "baseColorFactor": [0.2, 0.4, 0.6, 1.0] },
        }));
        json!({
            "attributes": { "POSITION": position },
            "indices": index,
            "material": self.materials.len() - 1,
        })
    }

    fn add_mesh(&mut self, materials: &[String]) -> usize {
        let primitives: Vec<Value> = materials.iter().map(|m| self.add_primitive(m)).collect();
        self.meshes.push(json!({ "primitives": primitives }));
        self.meshes.len() - 1
    }

    fn json(&self, roots: &[usize], buffer_uri: Option<&str>) -> Vec<u8> {
        let mut buffer = json!({ "byteLength": self.bin.len() });
        if let Some(uri) = buffer_uri {
            buffer["uri"] = json!(uri);
        }
        let root = json!({
            "asset": { "version": "2.0" },
            "scene": 0,
            "scenes": [{ "nodes": roots }],
            "nodes": self.nodes,
            "meshes": self.meshes,
            "materials": self.materials,
            "accessors": self.accessors,
            "bufferViews": self.views,
            "buffers": [buffer],
        });
        serde_json::to_vec(&root).expect("glTF JSON serializes")
    }
}

fn build(roots: &[NodeSpec]) -> (Builder, Vec<usize>) {
    let mut builder = Builder::default();
    let roots = roots.iter().map(|root| builder.add_node(root)).collect();
    (builder, roots)
}

fn push_chunk(out: &mut Vec<u8>, kind: u32, mut data: Vec<u8>, pad: u8) {
    while data.len() % 4 != 0 {
        data.push(pad);
    }
    out.extend_from_slice(&(data.len() as u32).to_le_bytes());
    out.extend_from_slice(&kind.to_le_bytes());
    out.extend_from_slice(&data);
}

/// A binary glTF with the geometry in its BIN chunk.
pub fn build_glb(roots: &[NodeSpec]) -> Vec<u8> {
    let (builder, roots) = build(roots);
    let json = builder.json(&roots, None);

    let mut chunks = Vec::new();
    push_chunk(&mut chunks, CHUNK_JSON, json, b' ');
    push_chunk(&mut chunks, CHUNK_BIN, builder.bin, 0);

    let mut glb = Vec::with_capacity(12 + chunks.len());
    glb.extend_from_slice(&GLB_MAGIC.to_le_bytes());
    glb.extend_from_slice(&2u32.to_le_bytes());
    glb.extend_from_slice(&((12 + chunks.len()) as u32).to_le_bytes());
    glb.extend_from_slice(&chunks);
    glb
}

/// A JSON glTF referencing its geometry through `buffer_uri`, plus the bytes
/// of that buffer.
pub fn build_gltf(roots: &[NodeSpec], buffer_uri: &str) -> (Vec<u8>, Vec<u8>) {
    let (builder, roots) = build(roots);
    let json = builder.json(&roots, Some(buffer_uri));
    (json, builder.bin)
}
