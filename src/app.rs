use crate::{
    audio::SilentBackend,
    config::GameConfig,
    core::{FpsCounter, Timer},
    error::AppError,
    game::{self, Game},
    input::InputState,
    math::Vec3,
    renderer::FrameRecorder,
};
use std::time::{Duration, Instant};
use tracing::{debug, error, info, warn};
use winit::{
    application::ApplicationHandler,
    dpi::LogicalSize,
    event::{DeviceEvent, DeviceId, ElementState, KeyEvent, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::PhysicalKey,
    window::{CursorGrabMode, Window, WindowAttributes, WindowId},
};

pub struct App {
    config: GameConfig,
    window: Option<Window>,
    game: Option<Game<FrameRecorder, SilentBackend>>,
    timer: Timer,
    fps_counter: FpsCounter,
    input_state: InputState,
    last_frame: Instant,
    error: Option<AppError>,
}

impl App {
    pub fn new(config: GameConfig) -> Self {
        Self {
            config,
            window: None,
            game: None,
            timer: Timer::new(),
            fps_counter: FpsCounter::new(),
            input_state: InputState::new(),
            last_frame: Instant::now(),
            error: None,
        }
    }

    pub fn run(config: GameConfig) -> Result<(), AppError> {
        let event_loop = EventLoop::new()?;
        event_loop.set_control_flow(ControlFlow::Poll);

        let mut app = App::new(config);
        event_loop.run_app(&mut app)?;
        match app.error.take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    fn frame_interval(&self) -> Option<Duration> {
        match self.config.window.target_fps {
            0 => None,
            fps => Some(Duration::from_secs_f64(1.0 / f64::from(fps))),
        }
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, err: AppError) {
        error!(%err, "startup failed");
        self.error = Some(err);
        event_loop.exit();
    }

    fn lock_cursor(window: &Window) {
        if let Err(e) = window.set_cursor_grab(CursorGrabMode::Locked) {
            debug!(%e, "cursor lock unsupported, trying confined mode");
            if let Err(e) = window.set_cursor_grab(CursorGrabMode::Confined) {
                warn!(%e, "failed to confine cursor");
            }
        }
        window.set_cursor_visible(false);
    }

    fn handle_key(&mut self, event: KeyEvent) {
        if event.state == ElementState::Pressed {
            if let Some(text) = &event.text {
                for c in text.chars() {
                    self.input_state.char_typed(c);
                }
            }
        }
        if event.repeat {
            return;
        }
        let PhysicalKey::Code(code) = event.physical_key else {
            return;
        };
        match event.state {
            ElementState::Pressed => self.input_state.key_pressed(code),
            ElementState::Released => self.input_state.key_released(code),
        }
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        self.last_frame = Instant::now();
        let delta = self.timer.tick();
        self.fps_counter.update(delta);

        let Some(game) = &mut self.game else {
            return;
        };
        if game.frame(&mut self.input_state, delta) == game::ControlFlow::Exit {
            event_loop.exit();
            return;
        }
        self.input_state.reset_mouse_delta();

        if let Some(window) = &self.window {
            window.set_title(&window_title(
                &self.config.window.title,
                self.fps_counter.fps(),
                game.camera_position(),
            ));
        }
    }
}

fn window_title(title: &str, fps: f32, camera: Vec3) -> String {
    format!(
        "{title} | FPS: {} | camera ({:.3}, {:.3}, {:.3})",
        fps as u32, camera.x, camera.y, camera.z
    )
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let window_attributes = WindowAttributes::default()
            .with_title(self.config.window.title.clone())
            .with_inner_size(LogicalSize::new(
                self.config.window.width,
                self.config.window.height,
            ));

        let window = match event_loop.create_window(window_attributes) {
            Ok(window) => window,
            Err(e) => return self.fail(event_loop, e.into()),
        };
        info!("window created");

        if self.config.window.mouse_lock {
            Self::lock_cursor(&window);
        }

        match Game::new(
            self.config.clone(),
            FrameRecorder::new(),
            SilentBackend::default(),
        ) {
            Ok(mut game) => {
                let size = window.inner_size();
                game.resize(size.width, size.height);
                self.game = Some(game);
            }
            Err(e) => return self.fail(event_loop, e.into()),
        }

        window.request_redraw();
        self.window = Some(window);
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                info!("window close requested");
                event_loop.exit();
            }
            WindowEvent::Resized(size) => {
                if let Some(game) = &mut self.game {
                    game.resize(size.width, size.height);
                }
                debug!(width = size.width, height = size.height, "window resized");
            }
            WindowEvent::Focused(true) if self.config.window.mouse_lock => {
                if let Some(window) = &self.window {
                    Self::lock_cursor(window);
                }
            }
            WindowEvent::KeyboardInput { event, .. } => self.handle_key(event),
            WindowEvent::RedrawRequested => self.redraw(event_loop),
            _ => {}
        }
    }

    fn device_event(&mut self, _event_loop: &ActiveEventLoop, _id: DeviceId, event: DeviceEvent) {
        if let DeviceEvent::MouseMotion { delta: (dx, dy) } = event {
            self.input_state.mouse_moved(dx as f32, dy as f32);
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        let Some(window) = &self.window else {
            return;
        };
        match self.frame_interval() {
            Some(interval) => {
                let next_frame = self.last_frame + interval;
                if Instant::now() >= next_frame {
                    window.request_redraw();
                } else {
                    event_loop.set_control_flow(ControlFlow::WaitUntil(next_frame));
                }
            }
            None => window.request_redraw(),
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(game) = &mut self.game {
            game.shutdown();
        }
        info!("shutting down");
    }
}
