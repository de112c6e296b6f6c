use std::{collections::HashSet, time::Duration};

use rand::{SeedableRng, rngs::StdRng};
use stencil_cube::{
    Face, SceneAssembler, SceneConfig,
    data_structures::material::{StencilCompare, StencilTag},
    resources::ModelLoader,
};

use crate::common::{cube_source, fake_source::FetchEvent};

mod common;

const DELAY: Duration = Duration::from_millis(5);

#[tokio::test]
async fn full_cube_fills_every_face() {
    let config = SceneConfig::full();
    let assembler = SceneAssembler::new(ModelLoader::new(cube_source(&config, DELAY)));
    let state = assembler
        .assemble(&config, StdRng::seed_from_u64(1))
        .await
        .unwrap();

    let counts: Vec<usize> = Face::ALL.iter().map(|&f| state.face(f).len()).collect();
    assert_eq!(counts, vec![31, 20, 25, 12, 9, 1]);
    assert_eq!(assembler.loader().source().fetches(), 99);
    // frame + six windows + every face node except the hexagons nested under the diamond
    assert_eq!(state.scene.len(), 1 + 6 + 90);
}

#[tokio::test]
async fn faces_finishing_out_of_order_still_fill_every_face() {
    let config = SceneConfig::full();
    let source = cube_source(&config, Duration::ZERO)
        .with_delay("models/nucleus.glb", Duration::from_millis(3))
        .with_delay("models/ring.glb", Duration::from_millis(2))
        .with_delay("models/triangle.glb", Duration::from_millis(1))
        .with_delay("models/block.glb", Duration::from_millis(6))
        .with_delay("models/bar.glb", Duration::from_millis(4))
        .with_delay("models/diamond.glb", Duration::from_millis(2))
        .with_delay("models/hexagon.glb", Duration::from_millis(3));
    let assembler = SceneAssembler::new(ModelLoader::new(source));
    let state = assembler
        .assemble(&config, StdRng::seed_from_u64(1))
        .await
        .unwrap();

    let counts: Vec<usize> = Face::ALL.iter().map(|&f| state.face(f).len()).collect();
    assert_eq!(counts, vec![31, 20, 25, 12, 9, 1]);

    let events = assembler.loader().source().events();
    let first_end = |path: &str| {
        events
            .iter()
            .position(|e| *e == FetchEvent::End(path.to_string()))
            .unwrap()
    };
    assert!(first_end("models/planet.glb") < first_end("models/block.glb"));
    assert_eq!(
        events.last(),
        Some(&FetchEvent::End("models/block.glb".to_string()))
    );

    let top = state.face(Face::Top);
    let diamond = top.get(0).unwrap();
    for (i, id) in top.iter().skip(1) {
        assert!(id.is_child(), "hexagon {} is not nested", i);
        assert_eq!(id.root(), diamond.root());
    }
}

#[tokio::test]
async fn frame_is_loaded_before_any_face_starts() {
    let config = SceneConfig::full();
    let assembler = SceneAssembler::new(ModelLoader::new(cube_source(&config, DELAY)));
    assembler
        .assemble(&config, StdRng::seed_from_u64(1))
        .await
        .unwrap();

    let events = assembler.loader().source().events();
    assert_eq!(events[0], FetchEvent::Start(config.frame_model.clone()));
    assert_eq!(events[1], FetchEvent::End(config.frame_model.clone()));

    // all six face routines are in flight before the first of them finishes a load
    let first_models: HashSet<String> = events[2..8]
        .iter()
        .map(|e| match e {
            FetchEvent::Start(path) => path.clone(),
            FetchEvent::End(path) => panic!("{} finished before every face started", path),
        })
        .collect();
    let expected: HashSet<String> = config
        .faces
        .iter()
        .map(|f| f.pieces[0].model.clone())
        .collect();
    assert_eq!(first_models, expected);
}

#[tokio::test]
async fn faces_are_tagged_with_their_reference() {
    let config = SceneConfig::full();
    let assembler = SceneAssembler::new(ModelLoader::new(cube_source(&config, Duration::ZERO)));
    let state = assembler
        .assemble(&config, StdRng::seed_from_u64(1))
        .await
        .unwrap();

    for spec in &config.faces {
        let faces = state.face(spec.face);
        for (_, id) in faces.iter() {
            let node = state.scene.get(id).unwrap();
            let materials = node.materials();
            assert!(!materials.is_empty());
            for material in materials {
                assert_eq!(material.stencil, StencilTag::masked_by(spec.stencil_ref));
            }
        }
    }
}

#[tokio::test]
async fn windows_stamp_distinct_references_first() {
    let config = SceneConfig::full();
    let assembler = SceneAssembler::new(ModelLoader::new(cube_source(&config, Duration::ZERO)));
    let state = assembler
        .assemble(&config, StdRng::seed_from_u64(1))
        .await
        .unwrap();

    assert_eq!(state.masks.len(), 6);
    let mut references = HashSet::new();
    for (face, id) in &state.masks {
        let material = state.scene.get(*id).unwrap().material().unwrap();
        assert_eq!(material.render_order, -1);
        assert_eq!(material.stencil.compare, StencilCompare::Always);
        assert!(!material.stencil.colour_write);
        assert!(!material.stencil.depth_write);
        assert_eq!(
            material.stencil.reference,
            config.face(*face).unwrap().stencil_ref
        );
        references.insert(material.stencil.reference);
    }
    assert_eq!(references.len(), 6);
}

#[tokio::test]
async fn frame_shell_never_writes_stencil() {
    let config = SceneConfig::demo();
    let assembler = SceneAssembler::new(ModelLoader::new(cube_source(&config, Duration::ZERO)));
    let state = assembler
        .assemble(&config, StdRng::seed_from_u64(1))
        .await
        .unwrap();

    let frame = state.scene.get(state.frame).unwrap();
    let shell = frame.children[0].material().unwrap();
    assert_eq!(shell.name, "frame");
    assert!(!shell.stencil.write_enabled);
    assert!(frame.materials().iter().all(|m| !m.stencil.write_enabled));
}

#[tokio::test]
async fn laid_out_transforms_are_kept_as_rest() {
    let config = SceneConfig::demo();
    let assembler = SceneAssembler::new(ModelLoader::new(cube_source(&config, Duration::ZERO)));
    let state = assembler
        .assemble(&config, StdRng::seed_from_u64(1))
        .await
        .unwrap();

    let left = state.face(Face::Left);
    let spec = config.face(Face::Left).unwrap();
    for (i, id) in left.iter() {
        let expected = (spec.pieces[0].layout)(i, spec.pieces[0].count);
        assert_eq!(state.scene.get(id).unwrap().transform, expected);
        assert_eq!(left.rest(i), Some(&expected));
    }
}

#[tokio::test]
async fn one_missing_model_fails_the_assembly() {
    let config = SceneConfig::full();
    let source = cube_source(&config, Duration::ZERO).without_file("models/bar.glb");
    let assembler = SceneAssembler::new(ModelLoader::new(source));
    let err = match assembler.assemble(&config, StdRng::seed_from_u64(1)).await {
        Ok(_) => panic!("assembly succeeded without models/bar.glb"),
        Err(err) => err,
    };

    let message = format!("{:#}", err);
    assert!(message.contains("models/bar.glb"), "{}", message);
    assert!(message.contains("Right"), "{}", message);
}

#[tokio::test]
async fn missing_frame_stops_before_any_face() {
    let config = SceneConfig::full();
    let source = cube_source(&config, Duration::ZERO).without_file(&config.frame_model);
    let assembler = SceneAssembler::new(ModelLoader::new(source));

    assert!(
        assembler
            .assemble(&config, StdRng::seed_from_u64(1))
            .await
            .is_err()
    );
    assert_eq!(assembler.loader().source().fetches(), 1);
}

#[tokio::test]
async fn assembled_cube_animates() {
    let config = SceneConfig::full();
    let assembler = SceneAssembler::new(ModelLoader::new(cube_source(&config, Duration::ZERO)));
    let mut state = assembler
        .assemble(&config, StdRng::seed_from_u64(9))
        .await
        .unwrap();

    let frame_before = state.scene.get(state.frame).unwrap().transform;
    let planet = state.face(Face::Bottom).get(0).unwrap();
    for _ in 0..2_000 {
        state.animate();
        assert!(state.direction() == 1.0 || state.direction() == -4.0);
    }

    assert_eq!(state.scene.get(state.frame).unwrap().transform, frame_before);
    assert!(state.scene.get(planet).unwrap().transform.rotation.y > 5.9);
}
