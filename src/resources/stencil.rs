//! Finding and tagging the materials of a loaded model that take part in
//! stencil masking.
//!
//! Materials whose name contains [`STENCIL_MARKER`] are tagged wherever they
//! sit in the hierarchy. Assets exported without the marker fall back to the
//! two layouts the bundled models use:
//!
//! - *compound*: the first child of the root has children of its own; the first
//!   two meshes below it are tagged
//! - *simple*: the first direct child carrying a mesh is tagged

use crate::data_structures::{material::StencilTag, scene_graph::SceneNode};

/// Case-insensitive material-name marker that opts a material into stenciling.
pub const STENCIL_MARKER: &str = "stencil";

/// How many slots the compound layout tags.
const COMPOUND_SLOTS: usize = 2;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StencilShape {
    Marked,
    Compound,
    Simple,
    Unrecognised,
}

fn is_marked(node: &SceneNode) -> bool {
    node.material()
        .map(|material| material.name.to_lowercase().contains(STENCIL_MARKER))
        .unwrap_or(false)
}

pub fn classify(node: &SceneNode) -> StencilShape {
    let mut marked = false;
    node.visit(&mut |n| marked |= is_marked(n));
    if marked {
        return StencilShape::Marked;
    }
    match node.children.first() {
        Some(first) if !first.children.is_empty() => StencilShape::Compound,
        Some(_) if node.children.iter().any(|c| c.mesh.is_some()) => StencilShape::Simple,
        _ => StencilShape::Unrecognised,
    }
}

/// Tags the stencil materials of `node` to only render where the stencil
/// buffer holds `reference`. Returns the number of tagged material slots.
///
/// Materials are mutated in place, nothing is copied.
pub fn tag_stencil(node: &mut SceneNode, reference: u8) -> usize {
    let tag = StencilTag::masked_by(reference);
    let mut tagged = 0;
    match classify(node) {
        StencilShape::Marked => node.visit_mut(&mut |n| {
            if is_marked(n) {
                if let Some(material) = n.material_mut() {
                    material.stencil = tag;
                    tagged += 1;
                }
            }
        }),
        StencilShape::Compound => {
            let slots = node.children[0]
                .children
                .iter_mut()
                .filter_map(|child| child.material_mut())
                .take(COMPOUND_SLOTS);
            for material in slots {
                material.stencil = tag;
                tagged += 1;
            }
        }
        StencilShape::Simple => {
            if let Some(material) = node
                .children
                .iter_mut()
                .find_map(|child| child.material_mut())
            {
                material.stencil = tag;
                tagged += 1;
            }
        }
        StencilShape::Unrecognised => (),
    }
    tagged
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_structures::{material::Material, scene_graph::MeshData};

    fn mesh_node(material: &str) -> SceneNode {
        SceneNode::with_mesh(
            material,
            MeshData {
                positions: vec![],
                normals: vec![],
                indices: vec![],
                material: Material::new(material, [1.0; 4]),
            },
        )
    }

    #[test]
    fn marker_beats_layout() {
        let mut group = SceneNode::new("group");
        group.add_child(mesh_node("rim"));
        group.add_child(mesh_node("glass"));
        group.add_child(mesh_node("Portal_Stencil"));
        let mut root = SceneNode::new("scene");
        root.add_child(group);

        assert_eq!(classify(&root), StencilShape::Marked);
        assert_eq!(tag_stencil(&mut root, 4), 1);
        assert!(root.children[0].children[2].material().unwrap().stencil.write_enabled);
        assert!(!root.children[0].children[0].material().unwrap().stencil.write_enabled);
    }

    #[test]
    fn empty_model_tags_nothing() {
        let mut root = SceneNode::new("scene");
        assert_eq!(classify(&root), StencilShape::Unrecognised);
        assert_eq!(tag_stencil(&mut root, 1), 0);
    }
}
