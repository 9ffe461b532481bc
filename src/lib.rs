//! A small 3D scene engine built around a transform hierarchy.
//!
//! ```no_run
//! fn main() -> Result<(), scene_engine::error::AppError> {
//!     scene_engine::app::App::run(scene_engine::config::GameConfig::default())
//! }
//! ```

pub mod app;
pub mod audio;
pub mod config;
pub mod core;
pub mod error;
pub mod game;
pub mod input;
pub mod math;
pub mod renderer;
pub mod scene;
