use crate::math::{Vec2, Vec3};

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex {
    pub position: Vec3,
    pub tex_coord: Vec2,
}

impl Vertex {
    #[must_use]
    pub const fn new(position: Vec3, tex_coord: Vec2) -> Self {
        Self {
            position,
            tex_coord,
        }
    }
}

/// Indexed triangle list.
#[derive(Debug, Clone, PartialEq)]
pub struct Mesh {
    pub label: String,
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u16>,
}

/// Texture coordinates for the four corners of a quad, in winding order.
const QUAD_UVS: [Vec2; 4] = [
    Vec2::new(0.0, 1.0),
    Vec2::new(1.0, 1.0),
    Vec2::new(1.0, 0.0),
    Vec2::new(0.0, 0.0),
];

impl Mesh {
    #[must_use]
    pub fn new(label: impl Into<String>, vertices: Vec<Vertex>, indices: Vec<u16>) -> Self {
        Self {
            label: label.into(),
            vertices,
            indices,
        }
    }

    /// Unit cube centred on the origin, one quad per face.
    #[must_use]
    pub fn cube() -> Self {
        let h = 0.5;
        let faces: [[[f32; 3]; 4]; 6] = [
            // Front
            [[-h, -h, h], [h, -h, h], [h, h, h], [-h, h, h]],
            // Back
            [[h, -h, -h], [-h, -h, -h], [-h, h, -h], [h, h, -h]],
            // Top
            [[-h, h, h], [h, h, h], [h, h, -h], [-h, h, -h]],
            // Bottom
            [[-h, -h, -h], [h, -h, -h], [h, -h, h], [-h, -h, h]],
            // Right
            [[h, -h, h], [h, -h, -h], [h, h, -h], [h, h, h]],
            // Left
            [[-h, -h, -h], [-h, -h, h], [-h, h, h], [-h, h, -h]],
        ];

        let mut vertices = Vec::with_capacity(24);
        let mut indices = Vec::with_capacity(36);
        for (face, corners) in faces.iter().enumerate() {
            let base = (face * 4) as u16;
            for (corner, uv) in corners.iter().zip(QUAD_UVS) {
                vertices.push(Vertex::new(Vec3::from(*corner), uv));
            }
            indices.extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
        }

        Self::new("cube", vertices, indices)
    }

    /// Flat quad on the XZ plane.
    #[must_use]
    pub fn plane(width: f32, depth: f32) -> Self {
        let half_width = width / 2.0;
        let half_depth = depth / 2.0;

        let vertices = vec![
            Vertex::new(Vec3::new(-half_width, 0.0, -half_depth), Vec2::new(0.0, 0.0)),
            Vertex::new(Vec3::new(half_width, 0.0, -half_depth), Vec2::new(1.0, 0.0)),
            Vertex::new(Vec3::new(half_width, 0.0, half_depth), Vec2::new(1.0, 1.0)),
            Vertex::new(Vec3::new(-half_width, 0.0, half_depth), Vec2::new(0.0, 1.0)),
        ];

        Self::new("plane", vertices, vec![0, 1, 2, 0, 2, 3])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cube_has_six_quads() {
        let cube = Mesh::cube();
        assert_eq!(cube.vertices.len(), 24);
        assert_eq!(cube.indices.len(), 36);
        assert!(cube.indices.iter().all(|&i| (i as usize) < cube.vertices.len()));
        assert!(cube
            .vertices
            .iter()
            .all(|v| v.position.x.abs() == 0.5 || v.position.y.abs() == 0.5 || v.position.z.abs() == 0.5));
    }

    #[test]
    fn plane_spans_requested_size() {
        let plane = Mesh::plane(4.0, 2.0);
        assert_eq!(plane.indices, vec![0, 1, 2, 0, 2, 3]);
        assert_eq!(plane.vertices[2].position, Vec3::new(2.0, 0.0, 1.0));
    }
}
