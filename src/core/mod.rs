mod texture;

pub use texture::{Texture, TextureFormat};

use std::time::Instant;

/// Frame clock: seconds since creation and the delta between the last two ticks.
pub struct Timer {
    start: Instant,
    time: f64,
    delta: f32,
}

impl Timer {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
            time: 0.0,
            delta: 0.0,
        }
    }

    /// Samples the clock and returns the seconds elapsed since the previous tick.
    pub fn tick(&mut self) -> f32 {
        let previous = self.time;
        self.time = self.start.elapsed().as_secs_f64();
        self.delta = (self.time - previous) as f32;
        self.delta
    }

    pub fn time(&self) -> f64 {
        self.time
    }

    pub fn delta(&self) -> f32 {
        self.delta
    }
}

impl Default for Timer {
    fn default() -> Self {
        Self::new()
    }
}

/// Averages frame times over windows of at least one second.
pub struct FpsCounter {
    frame_times: Vec<f32>,
    window: f32,
    current_fps: f32,
}

impl FpsCounter {
    pub fn new() -> Self {
        Self {
            frame_times: Vec::with_capacity(60),
            window: 0.0,
            current_fps: 0.0,
        }
    }

    pub fn update(&mut self, delta_time: f32) {
        self.frame_times.push(delta_time);
        self.window += delta_time;

        if self.window >= 1.0 {
            let avg_frame_time =
                self.frame_times.iter().sum::<f32>() / self.frame_times.len() as f32;
            if avg_frame_time > 0.0 {
                self.current_fps = 1.0 / avg_frame_time;
            }
            self.frame_times.clear();
            self.window = 0.0;
        }
    }

    pub fn fps(&self) -> f32 {
        self.current_fps
    }
}

impl Default for FpsCounter {
    fn default() -> Self {
        Self::new()
    }
}
