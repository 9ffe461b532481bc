use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use scene_engine::audio::SilentBackend;
use scene_engine::config::GameConfig;
use scene_engine::game::{ControlFlow, Game};
use scene_engine::input::InputState;
use scene_engine::math::{Mat4, Vec3};
use scene_engine::renderer::FrameRecorder;
use scene_engine::scene::{Camera, Component, Mesh, Model, NodeRef, Scene};
use winit::keyboard::KeyCode;

#[test]
fn test_scene_and_camera() {
    // A new scene only has its root
    let scene = Scene::new();
    assert_eq!(scene.root.child_count(), 0);
    assert_eq!(scene.root.name(), "root");

    let mut camera = Camera::perspective(16.0 / 9.0, 75.0, 0.01, 1000.0);
    camera.observe(&Mat4::from_translation(0.0, 2.0, 5.0));

    // View projection is the product of the two matrices
    let view_proj = camera.view_projection_matrix();
    assert_eq!(view_proj, camera.view_matrix() * camera.projection_matrix());
    assert_ne!(camera.view_matrix(), camera.projection_matrix());
}

#[test]
fn test_mesh_creation() {
    let cube = Mesh::cube();
    assert!(!cube.vertices.is_empty());
    assert!(!cube.indices.is_empty());

    let plane = Mesh::plane(10.0, 10.0);
    assert!(!plane.vertices.is_empty());
    assert!(!plane.indices.is_empty());

    // Vertices stay inside the unit cube and UVs inside [0, 1]
    for vertex in &cube.vertices {
        assert!(vertex.position.x >= -0.5 && vertex.position.x <= 0.5);
        assert!(vertex.tex_coord.x >= 0.0 && vertex.tex_coord.x <= 1.0);
    }
}

#[test]
fn test_transform_composition() {
    let scene = Scene::new();
    let r = NodeRef::new("r");
    let c = NodeRef::new("c");
    scene.add_node(&r).unwrap();
    r.add_child(&c).unwrap();

    r.translate(1.0, 0.0, 0.0);
    c.translate(0.0, 1.0, 0.0);

    // Child global combines both translations
    assert_eq!(c.global_transform(), Mat4::from_translation(1.0, 1.0, 0.0));
    assert_eq!(r.global_transform(), r.local_transform());
}

#[test]
fn test_translation_chain_accumulates() {
    let mut rng = ChaCha8Rng::seed_from_u64(7);
    let scene = Scene::new();

    let mut parent = scene.root.clone();
    let mut expected = Vec3::zero();
    for i in 0..8 {
        let offset = Vec3::new(
            rng.gen_range(-10.0..10.0),
            rng.gen_range(-10.0..10.0),
            rng.gen_range(-10.0..10.0),
        );
        let node = NodeRef::new(format!("n{i}"));
        parent.add_child(&node).unwrap();
        node.set_position_vec(offset);
        expected += offset;
        parent = node;
    }

    let actual = parent.global_transform().translation();
    assert!((actual - expected).length() < 1e-3, "{actual:?} != {expected:?}");
}

#[test]
fn test_reparenting() {
    let scene = Scene::new();
    let a = NodeRef::new("a");
    let b = NodeRef::new("b");
    let child = NodeRef::new("child");
    scene.add_node(&a).unwrap();
    scene.add_node(&b).unwrap();
    a.add_child(&child).unwrap();

    b.set_position(0.0, 0.0, 3.0);
    assert!(a.remove_child(&child));
    b.add_child(&child).unwrap();

    // Exactly one parent, exactly one link
    assert_eq!(a.child_count(), 0);
    assert_eq!(b.child_count(), 1);
    assert!(child.parent().is_some_and(|p| p.ptr_eq(&b)));
    assert_eq!(
        child.global_transform().translation(),
        Vec3::new(0.0, 0.0, 3.0)
    );

    // An ancestor cannot become a descendant
    assert!(child.add_child(&b).is_err());
}

#[test]
fn test_scene_draw_uses_model_view_projection() {
    let scene = Scene::new();
    let camera = NodeRef::with_component(
        "camera",
        Component::Camera {
            camera: Camera::perspective(1.0, 75.0, 0.01, 1000.0),
            controller: None,
        },
    );
    let model = NodeRef::with_component(
        "model",
        Component::Model(Model::new(vec![Mesh::cube()])),
    );
    scene.add_node(&camera).unwrap();
    scene.add_node(&model).unwrap();
    camera.set_position(0.0, 0.0, -1.0);
    model.set_position(0.0, 0.0, -5.0);

    let mut recorder = FrameRecorder::new();
    scene.draw(&mut recorder);

    let call = &recorder.last_frame()[0];
    let expected =
        model.global_transform() * camera.global_transform() * call.uniforms.projection;
    assert_eq!(call.uniforms.model_view_proj, expected);
}

#[test]
fn test_game_loop() {
    let config = GameConfig::from_toml("[window]\nwidth = 1024\nheight = 512\n").unwrap();
    assert_eq!(config.camera.fov, 75.0);

    let mut game = Game::new(config, FrameRecorder::new(), SilentBackend::new(1)).unwrap();
    let mut input = InputState::new();

    // Startup sound is one-shot and finishes after the first audio tick
    assert_eq!(game.audio().active_channels(), 1);
    assert_eq!(game.frame(&mut input, 0.016), ControlFlow::Continue);
    assert_eq!(game.frame(&mut input, 0.016), ControlFlow::Continue);
    assert_eq!(game.audio().active_channels(), 0);
    assert_eq!(game.renderer().frames(), 2);

    input.key_pressed(KeyCode::Escape);
    input.key_released(KeyCode::Escape);
    game.frame(&mut input, 0.016);
    assert_eq!(game.frame(&mut input, 0.016), ControlFlow::Exit);
}
