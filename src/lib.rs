//! stencil-cube
//!
//! A cube frame with six windows. Behind every window lives a small animated
//! world that is only visible through that window: each face's content is
//! tagged with a stencil reference, and an invisible quad on the matching
//! face stamps that reference into the stencil buffer. Runs natively and in
//! the browser.
//!
//! High-level modules
//! - `camera`: orbit camera, controller and uniforms for view/projection
//! - `config`: application configuration from defaults and environment
//! - `context`: central GPU and window context that owns device/queue/attachments
//! - `data_structures`: transforms, materials, scene graph and GPU meshes
//! - `flow`: the event loop driving initialization and the frame loop
//! - `pipelines`: stencil aware render pipelines and their shader
//! - `resources`: glTF loading and stencil tagging of loaded models
//! - `render`: draws a scene with per-material stencil state
//! - `scene`: face configuration, concurrent assembly and per-frame animators
//!

pub mod camera;
pub mod config;
pub mod context;
pub mod data_structures;
pub mod flow;
pub mod pipelines;
pub mod render;
pub mod resources;
pub mod scene;

// Re-exports commonly used types for convenience in downstream code.
pub use cgmath;
pub use config::{AppConfig, Variant};
pub use scene::{Face, SceneState, assembler::SceneAssembler, config::SceneConfig};

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn run_web() -> Result<(), wasm_bindgen::JsValue> {
    flow::run(AppConfig::from_env()).map_err(|e| wasm_bindgen::JsValue::from_str(&format!("{:#}", e)))
}
