//! The demo game: a first-person camera and a player model under one root.

use crate::audio::{AudioBackend, AudioEngine};
use crate::config::GameConfig;
use crate::error::SceneError;
use crate::input::InputState;
use crate::math::Vec3;
use crate::renderer::Renderer;
use crate::scene::{
    Camera, Component, FirstPersonController, Mesh, Model, NodeRef, Scene, UpdateContext,
};
use tracing::{info, trace, warn};
use winit::keyboard::KeyCode;

/// Whether the game wants another frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlFlow {
    Continue,
    Exit,
}

pub struct Game<R: Renderer, B: AudioBackend> {
    config: GameConfig,
    scene: Scene,
    camera: NodeRef,
    player: NodeRef,
    renderer: R,
    audio: AudioEngine<B>,
    typed_text: String,
}

impl<R: Renderer, B: AudioBackend> Game<R, B> {
    pub fn new(config: GameConfig, renderer: R, audio_backend: B) -> Result<Self, SceneError> {
        let scene = Scene::new();

        let camera = NodeRef::with_component(
            "camera",
            Component::Camera {
                camera: Camera::perspective(
                    config.window.aspect_ratio(),
                    config.camera.fov,
                    config.camera.z_near,
                    config.camera.z_far,
                ),
                controller: Some(FirstPersonController::new(
                    config.input.turn_speed,
                    config.input.move_speed,
                )),
            },
        );
        camera.set_position_vec(Vec3::from(config.camera.start_position));

        let player = NodeRef::with_component(
            "player",
            Component::Model(Model::new(vec![Mesh::cube()])),
        );

        // Cameras must come first so models drawn after them see the current view.
        scene.add_node(&camera)?;
        scene.add_node(&player)?;

        let mut audio = AudioEngine::new(audio_backend);
        if let Some(sound) = &config.audio.startup_sound {
            if let Err(err) = audio.play_sound(sound, config.audio.startup_volume) {
                warn!(%err, "startup sound unavailable");
            }
        }

        info!(
            width = config.window.width,
            height = config.window.height,
            "game created"
        );

        Ok(Self {
            config,
            scene,
            camera,
            player,
            renderer,
            audio,
            typed_text: String::new(),
        })
    }

    /// Runs one update and one draw.
    pub fn frame(&mut self, input: &mut InputState, delta_time: f32) -> ControlFlow {
        input.begin_frame();
        let flow = if input.is_key_up(KeyCode::Escape) {
            info!("escape released, exiting");
            ControlFlow::Exit
        } else {
            ControlFlow::Continue
        };

        self.typed_text.clear();
        while let Some(c) = input.read_char() {
            self.typed_text.push(c);
        }

        self.scene.update(&UpdateContext {
            input: &*input,
            delta_time,
        });
        self.audio.update();

        self.scene.draw(&mut self.renderer);

        let position = self.camera.global_transform().translation();
        trace!(x = position.x, y = position.y, z = position.z, "camera");
        flow
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        let aspect_ratio = width as f32 / height as f32;
        if let Component::Camera { camera, .. } = self.camera.borrow_mut().component_mut() {
            camera.set_aspect_ratio(aspect_ratio);
        }
    }

    /// Stops playback and releases the startup sound.
    pub fn shutdown(&mut self) {
        self.audio.stop_all_channels();
        if let Some(sound) = &self.config.audio.startup_sound {
            self.audio.unload(sound);
        }
        self.player.destroy();
        self.camera.destroy();
    }

    #[must_use]
    pub fn camera_position(&self) -> Vec3 {
        self.camera.position()
    }

    /// Characters typed since the previous frame.
    #[must_use]
    pub fn typed_text(&self) -> &str {
        &self.typed_text
    }

    #[must_use]
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn camera(&self) -> &NodeRef {
        &self.camera
    }

    pub fn player(&self) -> &NodeRef {
        &self.player
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn audio(&self) -> &AudioEngine<B> {
        &self.audio
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::SilentBackend;
    use crate::renderer::FrameRecorder;

    fn game() -> Game<FrameRecorder, SilentBackend> {
        Game::new(GameConfig::default(), FrameRecorder::new(), SilentBackend::default()).unwrap()
    }

    #[test]
    fn builds_camera_then_player() {
        let game = game();
        let root = &game.scene().root;
        assert_eq!(root.child_count(), 2);
        assert!(root.child(0).unwrap().ptr_eq(game.camera()));
        assert!(root.child(1).unwrap().ptr_eq(game.player()));
        assert_eq!(game.camera_position(), Vec3::new(0.0, 0.0, -1.0));
        assert_eq!(game.audio().active_channels(), 1);
    }

    #[test]
    fn frame_draws_player_through_camera() {
        let mut game = game();
        let mut input = InputState::new();
        assert_eq!(game.frame(&mut input, 0.016), ControlFlow::Continue);

        let calls = game.renderer().last_frame();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].mesh, "cube");
        assert_eq!(calls[0].uniforms.view, game.camera().global_transform());
    }

    #[test]
    fn escape_release_exits() {
        let mut game = game();
        let mut input = InputState::new();
        input.key_pressed(KeyCode::Escape);
        input.key_released(KeyCode::Escape);

        assert_eq!(game.frame(&mut input, 0.016), ControlFlow::Continue);
        assert_eq!(game.frame(&mut input, 0.016), ControlFlow::Exit);
    }

    #[test]
    fn typed_chars_are_drained_each_frame() {
        let mut game = game();
        let mut input = InputState::new();
        input.char_typed('h');
        input.char_typed('i');

        game.frame(&mut input, 0.016);
        assert_eq!(game.typed_text(), "hi");
        assert!(input.char_buffer_empty());

        game.frame(&mut input, 0.016);
        assert_eq!(game.typed_text(), "");
    }

    #[test]
    fn holding_forward_moves_camera() {
        let mut game = game();
        let mut input = InputState::new();
        // First frame lets the camera observe its transform.
        game.frame(&mut input, 0.016);
        input.key_pressed(KeyCode::KeyW);
        game.frame(&mut input, 0.5);
        assert_ne!(game.camera_position(), Vec3::new(0.0, 0.0, -1.0));
    }

    #[test]
    fn resize_updates_camera_aspect() {
        let mut game = game();
        game.resize(1600, 800);
        let node = game.camera().borrow();
        match node.component() {
            Component::Camera { camera, .. } => assert_eq!(camera.aspect_ratio(), 2.0),
            other => panic!("unexpected component {other:?}"),
        }
    }

    #[test]
    fn shutdown_releases_audio_and_scene() {
        let mut game = game();
        game.shutdown();
        assert_eq!(game.audio().active_channels(), 0);
        assert!(!game.audio().is_loaded("./res/sounds/test.ogg"));
        assert_eq!(game.scene().root.child_count(), 0);
    }
}
