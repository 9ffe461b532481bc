mod matrix;
mod vector;

pub use matrix::{Mat3, Mat4};
pub use vector::{Vec2, Vec3, Vec4};

#[must_use]
pub fn degrees_to_radians(degrees: f32) -> f32 {
    degrees * (std::f32::consts::PI / 180.0)
}

#[must_use]
pub fn radians_to_degrees(radians: f32) -> f32 {
    radians * (180.0 / std::f32::consts::PI)
}
