//! The stencil cube itself.
//!
//! - `config` declares which models make up each face and how they are laid out
//! - `assembler` loads everything and produces a [`SceneState`]
//! - `animators` holds the per-face update rules run once per frame
//!
//! A [`SceneState`] can only be obtained from
//! [`SceneAssembler::assemble`](assembler::SceneAssembler::assemble), which
//! returns after every face finished loading. The animators therefore never
//! see a partially populated face.

use rand::rngs::StdRng;

use crate::data_structures::{
    scene_graph::{NodeId, Scene},
    transform::Transform,
};

pub mod animators;
pub mod assembler;
pub mod config;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Face {
    Front,
    Back,
    Left,
    Right,
    Top,
    Bottom,
}

impl Face {
    pub const ALL: [Face; 6] = [
        Face::Front,
        Face::Back,
        Face::Left,
        Face::Right,
        Face::Top,
        Face::Bottom,
    ];

    /// Outward normal of this face of the cube.
    pub fn normal(self) -> cgmath::Vector3<f32> {
        match self {
            Face::Front => cgmath::Vector3::new(0.0, 0.0, 1.0),
            Face::Back => cgmath::Vector3::new(0.0, 0.0, -1.0),
            Face::Left => cgmath::Vector3::new(-1.0, 0.0, 0.0),
            Face::Right => cgmath::Vector3::new(1.0, 0.0, 0.0),
            Face::Top => cgmath::Vector3::new(0.0, 1.0, 0.0),
            Face::Bottom => cgmath::Vector3::new(0.0, -1.0, 0.0),
        }
    }

    /// Transform that moves a +z facing quad onto this face of a cube with the
    /// given half extent.
    pub fn window_transform(self, half_extent: f32) -> Transform {
        use std::f32::consts::{FRAC_PI_2, PI};

        let rotation = match self {
            Face::Front => (0.0, 0.0, 0.0),
            Face::Back => (0.0, PI, 0.0),
            Face::Left => (0.0, -FRAC_PI_2, 0.0),
            Face::Right => (0.0, FRAC_PI_2, 0.0),
            Face::Top => (-FRAC_PI_2, 0.0, 0.0),
            Face::Bottom => (FRAC_PI_2, 0.0, 0.0),
        };
        Transform {
            position: self.normal() * half_extent,
            ..Default::default()
        }
        .with_rotation(rotation.0, rotation.1, rotation.2)
    }
}

/// The nodes of one face, in load order, with the transform each had right
/// after being laid out.
#[derive(Clone, Debug)]
pub struct FaceCollection {
    pub face: Face,
    nodes: Vec<NodeId>,
    rest: Vec<Transform>,
}

impl FaceCollection {
    pub fn new(face: Face) -> Self {
        Self {
            face,
            nodes: Vec::new(),
            rest: Vec::new(),
        }
    }

    pub fn push(&mut self, id: NodeId, rest: Transform) {
        self.nodes.push(id);
        self.rest.push(rest);
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn get(&self, idx: usize) -> Option<NodeId> {
        self.nodes.get(idx).copied()
    }

    pub fn last(&self) -> Option<NodeId> {
        self.nodes.last().copied()
    }

    pub fn rest(&self, idx: usize) -> Option<&Transform> {
        self.rest.get(idx)
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, NodeId)> + '_ {
        self.nodes.iter().copied().enumerate()
    }
}

/// Everything the render loop needs once setup is over.
pub struct SceneState {
    pub scene: Scene,
    pub frame: NodeId,
    pub masks: Vec<(Face, NodeId)>,
    front: FaceCollection,
    back: FaceCollection,
    left: FaceCollection,
    right: FaceCollection,
    top: FaceCollection,
    bottom: FaceCollection,
    direction: f32,
    rng: StdRng,
}

impl SceneState {
    pub(crate) fn new(scene: Scene, frame: NodeId, rng: StdRng) -> Self {
        Self {
            scene,
            frame,
            masks: Vec::new(),
            front: FaceCollection::new(Face::Front),
            back: FaceCollection::new(Face::Back),
            left: FaceCollection::new(Face::Left),
            right: FaceCollection::new(Face::Right),
            top: FaceCollection::new(Face::Top),
            bottom: FaceCollection::new(Face::Bottom),
            direction: animators::BACK_FORWARD,
            rng,
        }
    }

    pub fn face(&self, face: Face) -> &FaceCollection {
        match face {
            Face::Front => &self.front,
            Face::Back => &self.back,
            Face::Left => &self.left,
            Face::Right => &self.right,
            Face::Top => &self.top,
            Face::Bottom => &self.bottom,
        }
    }

    pub(crate) fn face_mut(&mut self, face: Face) -> &mut FaceCollection {
        match face {
            Face::Front => &mut self.front,
            Face::Back => &mut self.back,
            Face::Left => &mut self.left,
            Face::Right => &mut self.right,
            Face::Top => &mut self.top,
            Face::Bottom => &mut self.bottom,
        }
    }

    /// Current travel direction of the back face triangles.
    pub fn direction(&self) -> f32 {
        self.direction
    }

    /// Advances every face by one frame.
    pub fn animate(&mut self) {
        animators::front(&mut self.scene, &self.front);
        animators::back(&mut self.scene, &self.back, &mut self.direction);
        animators::left(&mut self.scene, &self.left, &mut self.rng);
        animators::right(&mut self.scene, &self.right, &mut self.rng);
        animators::top(&mut self.scene, &self.top);
        animators::bottom(&mut self.scene, &self.bottom);
    }
}
