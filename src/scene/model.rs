use super::camera::CameraView;
use super::mesh::Mesh;
use crate::core::Texture;
use crate::math::Mat4;
use crate::renderer::{DrawCall, Renderer, Uniforms};

/// Meshes drawn with one shared model matrix. Texture `i`, when present, is bound
/// for mesh `i`.
#[derive(Debug, Clone, PartialEq)]
pub struct Model {
    pub meshes: Vec<Mesh>,
    pub textures: Vec<Texture>,
    model_matrix: Mat4,
}

impl Model {
    #[must_use]
    pub fn new(meshes: Vec<Mesh>) -> Self {
        Self {
            meshes,
            textures: Vec::new(),
            model_matrix: Mat4::identity(),
        }
    }

    #[must_use]
    pub fn with_textures(mut self, textures: Vec<Texture>) -> Self {
        self.textures = textures;
        self
    }

    #[must_use]
    pub fn model_matrix(&self) -> Mat4 {
        self.model_matrix
    }

    pub fn set_model_matrix(&mut self, model_matrix: Mat4) {
        self.model_matrix = model_matrix;
    }

    /// Submits one draw call per mesh using the current model matrix.
    pub fn draw(&self, camera: &CameraView, renderer: &mut dyn Renderer) {
        let uniforms = Uniforms::new(self.model_matrix, camera.view, camera.projection);
        for (i, mesh) in self.meshes.iter().enumerate() {
            renderer.submit(DrawCall {
                mesh: mesh.label.clone(),
                vertex_count: mesh.vertices.len(),
                index_count: mesh.indices.len(),
                texture: self.textures.get(i).map(|t| t.label.clone()),
                uniforms,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::TextureFormat;
    use crate::renderer::FrameRecorder;

    #[test]
    fn draws_every_mesh_with_matching_texture() {
        let texture =
            Texture::create_from_data("skin", &[0; 4], 1, 1, TextureFormat::Rgba8).unwrap();
        let mut model =
            Model::new(vec![Mesh::cube(), Mesh::plane(1.0, 1.0)]).with_textures(vec![texture]);
        model.set_model_matrix(Mat4::from_translation(0.0, 0.0, 5.0));

        let camera = CameraView {
            view: Mat4::from_translation(0.0, 0.0, -1.0),
            projection: Mat4::scalar(2.0),
        };
        let mut recorder = FrameRecorder::new();
        recorder.begin_frame();
        model.draw(&camera, &mut recorder);
        recorder.end_frame();

        let calls = recorder.last_frame();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].mesh, "cube");
        assert_eq!(calls[0].index_count, 36);
        assert_eq!(calls[0].texture.as_deref(), Some("skin"));
        assert_eq!(calls[1].texture, None);
        assert_eq!(
            calls[1].uniforms.model_view_proj,
            model.model_matrix() * camera.view * camera.projection
        );
    }
}
