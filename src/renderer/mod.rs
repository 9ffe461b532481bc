//! Draw submission seam.

use crate::math::Mat4;

/// Per-draw constant data, laid out for upload as a uniform buffer.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Uniforms {
    pub model: Mat4,
    pub view: Mat4,
    pub projection: Mat4,
    pub model_view_proj: Mat4,
}

impl Uniforms {
    /// Builds the block, composing `model * view * projection`.
    #[must_use]
    pub fn new(model: Mat4, view: Mat4, projection: Mat4) -> Self {
        Self {
            model,
            view,
            projection,
            model_view_proj: model * view * projection,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DrawCall {
    pub mesh: String,
    pub vertex_count: usize,
    pub index_count: usize,
    pub texture: Option<String>,
    pub uniforms: Uniforms,
}

pub trait Renderer {
    fn begin_frame(&mut self);
    fn submit(&mut self, draw: DrawCall);
    fn end_frame(&mut self);
}

/// Keeps the draw calls of the most recent frame.
#[derive(Debug, Default)]
pub struct FrameRecorder {
    frames: u64,
    pending: Vec<DrawCall>,
    last_frame: Vec<DrawCall>,
}

impl FrameRecorder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn frames(&self) -> u64 {
        self.frames
    }

    #[must_use]
    pub fn last_frame(&self) -> &[DrawCall] {
        &self.last_frame
    }
}

impl Renderer for FrameRecorder {
    fn begin_frame(&mut self) {
        self.pending.clear();
    }

    fn submit(&mut self, draw: DrawCall) {
        self.pending.push(draw);
    }

    fn end_frame(&mut self) {
        self.frames += 1;
        self.last_frame = std::mem::take(&mut self.pending);
        tracing::trace!(
            frame = self.frames,
            draws = self.last_frame.len(),
            "frame submitted"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draw(name: &str) -> DrawCall {
        DrawCall {
            mesh: name.to_string(),
            vertex_count: 3,
            index_count: 3,
            texture: None,
            uniforms: Uniforms::new(Mat4::identity(), Mat4::identity(), Mat4::identity()),
        }
    }

    #[test]
    fn recorder_keeps_only_the_last_frame() {
        let mut recorder = FrameRecorder::new();
        recorder.begin_frame();
        recorder.submit(draw("a"));
        recorder.submit(draw("b"));
        recorder.end_frame();
        assert_eq!(recorder.last_frame().len(), 2);

        recorder.begin_frame();
        recorder.submit(draw("c"));
        recorder.end_frame();
        assert_eq!(recorder.frames(), 2);
        assert_eq!(recorder.last_frame()[0].mesh, "c");
        assert_eq!(recorder.last_frame().len(), 1);
    }

    #[test]
    fn uniforms_compose_model_view_projection() {
        let model = Mat4::from_translation(1.0, 0.0, 0.0);
        let view = Mat4::from_translation(0.0, 2.0, 0.0);
        let projection = Mat4::scalar(2.0);
        let uniforms = Uniforms::new(model, view, projection);
        assert_eq!(uniforms.model_view_proj, model * view * projection);
    }
}
