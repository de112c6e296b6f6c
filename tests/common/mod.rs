#![allow(dead_code)]

pub mod fake_source;
pub mod glb;

use fake_source::FakeSource;
use glb::{NodeSpec, build_glb};
use stencil_cube::SceneConfig;

/// A frame with an outer shell and an inner rim, both plain meshes.
pub fn frame_glb() -> Vec<u8> {
    build_glb(&[NodeSpec::mesh("shell", "frame"), NodeSpec::mesh("rim", "rim")])
}

/// One marked mesh at the root, the way most face pieces are exported.
pub fn piece_glb(name: &str) -> Vec<u8> {
    build_glb(&[NodeSpec::mesh(name, &format!("{}_stencil", name))])
}

/// A source serving every model `config` needs, each with `delay`.
pub fn cube_source(config: &SceneConfig, delay: std::time::Duration) -> FakeSource {
    let mut source = FakeSource::new().with_file(&config.frame_model, frame_glb());
    source = source.with_delay(&config.frame_model, delay);
    for face in &config.faces {
        for piece in &face.pieces {
            let name = piece
                .model
                .rsplit('/')
                .next()
                .unwrap_or(&piece.model)
                .trim_end_matches(".glb");
            source = source
                .with_file(&piece.model, piece_glb(name))
                .with_delay(&piece.model, delay);
        }
    }
    source
}
