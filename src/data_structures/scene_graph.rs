//! Scene graph and hierarchical scene organization.
//!
//! A [`SceneNode`] is a positionable object with an optional mesh and any
//! number of children. Loaded models arrive as a tree of nodes; once added to
//! a [`Scene`] the top-level node, and any direct child attached through the
//! scene, is addressed through a [`NodeId`] handle and stays there for the
//! lifetime of the program. Only transforms change after
//! setup, the structure does not.

use crate::data_structures::{material::Material, transform::Transform};

/// CPU-side geometry of a single mesh primitive.
#[derive(Clone, Debug, PartialEq)]
pub struct MeshData {
    pub positions: Vec<[f32; 3]>,
    pub normals: Vec<[f32; 3]>,
    pub indices: Vec<u32>,
    pub material: Material,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct SceneNode {
    pub name: String,
    pub transform: Transform,
    pub mesh: Option<MeshData>,
    pub children: Vec<SceneNode>,
}

impl SceneNode {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Default::default()
        }
    }

    pub fn with_mesh(name: &str, mesh: MeshData) -> Self {
        Self {
            name: name.to_string(),
            mesh: Some(mesh),
            ..Default::default()
        }
    }

    pub fn add_child(&mut self, child: SceneNode) {
        self.children.push(child);
    }

    pub fn material(&self) -> Option<&Material> {
        self.mesh.as_ref().map(|mesh| &mesh.material)
    }

    pub fn material_mut(&mut self) -> Option<&mut Material> {
        self.mesh.as_mut().map(|mesh| &mut mesh.material)
    }

    /// Depth-first, pre-order visit of `self` and all descendants.
    pub fn visit<'a>(&'a self, f: &mut dyn FnMut(&'a SceneNode)) {
        f(self);
        for child in &self.children {
            child.visit(f);
        }
    }

    pub fn visit_mut(&mut self, f: &mut dyn FnMut(&mut SceneNode)) {
        f(self);
        for child in self.children.iter_mut() {
            child.visit_mut(f);
        }
    }

    /// All materials in the subtree, in pre-order.
    pub fn materials(&self) -> Vec<&Material> {
        let mut materials = Vec::new();
        self.visit(&mut |node| {
            if let Some(material) = node.material() {
                materials.push(material);
            }
        });
        materials
    }

    /// Every mesh in the subtree with its world matrix, in pre-order.
    ///
    /// `parent` is the world matrix of whatever this node is attached to.
    pub fn collect_draws<'a>(
        &'a self,
        parent: cgmath::Matrix4<f32>,
        out: &mut Vec<(cgmath::Matrix4<f32>, &'a MeshData)>,
    ) {
        let world = parent * self.transform.to_matrix();
        if let Some(mesh) = &self.mesh {
            out.push((world, mesh));
        }
        for child in &self.children {
            child.collect_draws(world, out);
        }
    }
}

/// Handle to a node owned by a [`Scene`]: a top-level node, or a direct child
/// attached to one through [`Scene::add_child`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId {
    root: usize,
    child: Option<usize>,
}

impl NodeId {
    /// Index of the top-level node this handle lives under.
    pub fn root(&self) -> usize {
        self.root
    }

    pub fn is_child(&self) -> bool {
        self.child.is_some()
    }
}

/// Owner of every top-level node in the rendered world.
#[derive(Debug, Default)]
pub struct Scene {
    nodes: Vec<SceneNode>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, node: SceneNode) -> NodeId {
        self.nodes.push(node);
        NodeId {
            root: self.nodes.len() - 1,
            child: None,
        }
    }

    /// Attaches `node` as the last child of the top-level node `parent`, so
    /// it follows the parent's transform.
    ///
    /// Returns `None` if `parent` is unknown or itself a child.
    pub fn add_child(&mut self, parent: NodeId, node: SceneNode) -> Option<NodeId> {
        if parent.is_child() {
            return None;
        }
        let owner = self.nodes.get_mut(parent.root)?;
        owner.add_child(node);
        Some(NodeId {
            root: parent.root,
            child: Some(owner.children.len() - 1),
        })
    }

    pub fn get(&self, id: NodeId) -> Option<&SceneNode> {
        let root = self.nodes.get(id.root)?;
        match id.child {
            None => Some(root),
            Some(child) => root.children.get(child),
        }
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut SceneNode> {
        let root = self.nodes.get_mut(id.root)?;
        match id.child {
            None => Some(root),
            Some(child) => root.children.get_mut(child),
        }
    }

    /// World matrix of the node, parent transform included.
    pub fn world_matrix(&self, id: NodeId) -> Option<cgmath::Matrix4<f32>> {
        let root = self.nodes.get(id.root)?;
        let world = root.transform.to_matrix();
        match id.child {
            None => Some(world),
            Some(child) => Some(world * root.children.get(child)?.transform.to_matrix()),
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Top-level nodes only.
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &SceneNode)> {
        self.nodes.iter().enumerate().map(|(root, node)| {
            (NodeId { root, child: None }, node)
        })
    }

    /// Every mesh in the scene with its world matrix.
    ///
    /// The order only depends on the scene structure, which is fixed after
    /// setup, so indices into the result are stable from frame to frame.
    pub fn draws(&self) -> Vec<(cgmath::Matrix4<f32>, &MeshData)> {
        use cgmath::SquareMatrix;

        let mut out = Vec::new();
        for node in &self.nodes {
            node.collect_draws(cgmath::Matrix4::identity(), &mut out);
        }
        out
    }
}
