//! Square matrices. Storage is row-major and `(a * b)[i][j] = Σk b[i][k] · a[k][j]`.

use super::{Vec3, Vec4};
use std::ops::{Index, IndexMut, Mul};

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Mat3 {
    pub m: [[f32; 3]; 3],
}

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Mat4 {
    pub m: [[f32; 4]; 4],
}

macro_rules! impl_square_matrix {
    ($ty:ident, $vec:ident, $n:literal) => {
        impl $ty {
            /// The zero matrix. This is also what `Default` yields; use
            /// [`Self::identity`] when an identity is meant.
            #[must_use]
            pub const fn zero() -> Self {
                Self {
                    m: [[0.0; $n]; $n],
                }
            }

            /// `k · Identity`.
            #[must_use]
            pub const fn scalar(k: f32) -> Self {
                let mut m = [[0.0; $n]; $n];
                let mut i = 0;
                while i < $n {
                    m[i][i] = k;
                    i += 1;
                }
                Self { m }
            }

            #[must_use]
            pub const fn identity() -> Self {
                Self::scalar(1.0)
            }

            #[must_use]
            pub const fn from_rows(m: [[f32; $n]; $n]) -> Self {
                Self { m }
            }

            #[must_use]
            pub fn get(&self, row: usize, col: usize) -> f32 {
                self.m[row][col]
            }

            pub fn set(&mut self, row: usize, col: usize, value: f32) {
                self.m[row][col] = value;
            }

            #[must_use]
            pub fn as_array(&self) -> &[[f32; $n]; $n] {
                &self.m
            }

            #[must_use]
            pub fn multiply(&self, other: &Self) -> Self {
                let mut out = Self::zero();
                for i in 0..$n {
                    for j in 0..$n {
                        let mut sum = self.m[0][j] * other.m[i][0];
                        for k in 1..$n {
                            sum += self.m[k][j] * other.m[i][k];
                        }
                        out.m[i][j] = sum;
                    }
                }
                out
            }

            /// Post-multiplies `self` by `other` in place.
            fn post_multiply(&mut self, other: &Self) -> &mut Self {
                *self = self.multiply(other);
                self
            }

            #[must_use]
            pub fn approx_eq(&self, other: &Self, epsilon: f32) -> bool {
                self.m
                    .iter()
                    .flatten()
                    .zip(other.m.iter().flatten())
                    .all(|(a, b)| (a - b).abs() <= epsilon)
            }
        }

        impl Mul for $ty {
            type Output = Self;
            fn mul(self, rhs: Self) -> Self {
                self.multiply(&rhs)
            }
        }

        impl Mul<$vec> for $ty {
            type Output = $vec;
            fn mul(self, rhs: $vec) -> $vec {
                let v = rhs.to_array();
                let mut out = [0.0; $n];
                for (j, slot) in out.iter_mut().enumerate() {
                    let mut sum = v[0] * self.m[0][j];
                    for k in 1..$n {
                        sum += v[k] * self.m[k][j];
                    }
                    *slot = sum;
                }
                $vec::from_array(out)
            }
        }

        impl Index<(usize, usize)> for $ty {
            type Output = f32;
            fn index(&self, (row, col): (usize, usize)) -> &f32 {
                &self.m[row][col]
            }
        }

        impl IndexMut<(usize, usize)> for $ty {
            fn index_mut(&mut self, (row, col): (usize, usize)) -> &mut f32 {
                &mut self.m[row][col]
            }
        }
    };
}

impl_square_matrix!(Mat3, Vec3, 3);
impl_square_matrix!(Mat4, Vec4, 4);

impl Vec3 {
    const fn from_array([x, y, z]: [f32; 3]) -> Self {
        Self::new(x, y, z)
    }
}

impl Vec4 {
    const fn from_array([x, y, z, w]: [f32; 4]) -> Self {
        Self::new(x, y, z, w)
    }
}

impl Mat3 {
    /// Places each vector in a column.
    #[must_use]
    pub const fn from_columns(x: Vec3, y: Vec3, z: Vec3) -> Self {
        Self::from_rows([[x.x, y.x, z.x], [x.y, y.y, z.y], [x.z, y.z, z.z]])
    }

    #[must_use]
    pub fn multiply_vec3(&self, v: &Vec3) -> Vec3 {
        *self * *v
    }

    pub fn set_scaled(&mut self, x: f32, y: f32, z: f32) -> &mut Self {
        self.m = [[x, 0.0, 0.0], [0.0, y, 0.0], [0.0, 0.0, z]];
        self
    }

    pub fn set_scaled_vec(&mut self, v: Vec3) -> &mut Self {
        self.set_scaled(v.x, v.y, v.z)
    }

    pub fn scale(&mut self, x: f32, y: f32, z: f32) -> &mut Self {
        let mut elementary = Self::identity();
        elementary.set_scaled(x, y, z);
        self.post_multiply(&elementary)
    }

    pub fn scale_vec(&mut self, v: Vec3) -> &mut Self {
        self.scale(v.x, v.y, v.z)
    }

    pub fn set_rotation_x(&mut self, radians: f32) -> &mut Self {
        let (s, c) = radians.sin_cos();
        self.m = [[1.0, 0.0, 0.0], [0.0, c, s], [0.0, -s, c]];
        self
    }

    pub fn set_rotation_y(&mut self, radians: f32) -> &mut Self {
        let (s, c) = radians.sin_cos();
        self.m = [[c, 0.0, -s], [0.0, 1.0, 0.0], [s, 0.0, c]];
        self
    }

    pub fn set_rotation_z(&mut self, radians: f32) -> &mut Self {
        let (s, c) = radians.sin_cos();
        self.m = [[c, s, 0.0], [-s, c, 0.0], [0.0, 0.0, 1.0]];
        self
    }

    pub fn rotate_x(&mut self, radians: f32) -> &mut Self {
        let mut elementary = Self::identity();
        elementary.set_rotation_x(radians);
        self.post_multiply(&elementary)
    }

    pub fn rotate_y(&mut self, radians: f32) -> &mut Self {
        let mut elementary = Self::identity();
        elementary.set_rotation_y(radians);
        self.post_multiply(&elementary)
    }

    pub fn rotate_z(&mut self, radians: f32) -> &mut Self {
        let mut elementary = Self::identity();
        elementary.set_rotation_z(radians);
        self.post_multiply(&elementary)
    }

    /// 2D translation held in the last column.
    pub fn set_translation(&mut self, x: f32, y: f32) -> &mut Self {
        self.m[0][2] = x;
        self.m[1][2] = y;
        self
    }

    pub fn translate(&mut self, x: f32, y: f32) -> &mut Self {
        self.m[0][2] += x;
        self.m[1][2] += y;
        self
    }

    /// Overwrites `self` with `Z(roll) * Y(yaw) * X(pitch)`.
    pub fn set_euler(&mut self, pitch: f32, yaw: f32, roll: f32) -> &mut Self {
        let (mut x, mut y, mut z) = (Self::identity(), Self::identity(), Self::identity());
        x.set_rotation_x(pitch);
        y.set_rotation_y(yaw);
        z.set_rotation_z(roll);
        *self = z * y * x;
        self
    }
}

impl Mat4 {
    /// Places each vector in a column.
    #[must_use]
    pub const fn from_columns(x: Vec4, y: Vec4, z: Vec4, w: Vec4) -> Self {
        Self::from_rows([
            [x.x, y.x, z.x, w.x],
            [x.y, y.y, z.y, w.y],
            [x.z, y.z, z.z, w.z],
            [x.w, y.w, z.w, w.w],
        ])
    }

    #[must_use]
    pub fn from_translation(x: f32, y: f32, z: f32) -> Self {
        let mut m = Self::identity();
        m.set_translation(x, y, z);
        m
    }

    #[must_use]
    pub fn from_euler(pitch: f32, yaw: f32, roll: f32) -> Self {
        let mut m = Self::identity();
        m.set_euler(pitch, yaw, roll);
        m
    }

    #[must_use]
    pub fn multiply_vec4(&self, v: &Vec4) -> Vec4 {
        *self * *v
    }

    /// The translation column of an affine matrix.
    #[must_use]
    pub fn translation(&self) -> Vec3 {
        Vec3::new(self.m[0][3], self.m[1][3], self.m[2][3])
    }

    pub fn set_scaled(&mut self, x: f32, y: f32, z: f32) -> &mut Self {
        self.m = [
            [x, 0.0, 0.0, 0.0],
            [0.0, y, 0.0, 0.0],
            [0.0, 0.0, z, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ];
        self
    }

    pub fn set_scaled_vec(&mut self, v: Vec3) -> &mut Self {
        self.set_scaled(v.x, v.y, v.z)
    }

    pub fn scale(&mut self, x: f32, y: f32, z: f32) -> &mut Self {
        let mut elementary = Self::identity();
        elementary.set_scaled(x, y, z);
        self.post_multiply(&elementary)
    }

    pub fn scale_vec(&mut self, v: Vec3) -> &mut Self {
        self.scale(v.x, v.y, v.z)
    }

    pub fn set_rotation_x(&mut self, radians: f32) -> &mut Self {
        let (s, c) = radians.sin_cos();
        self.m = [
            [1.0, 0.0, 0.0, 0.0],
            [0.0, c, s, 0.0],
            [0.0, -s, c, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ];
        self
    }

    pub fn set_rotation_y(&mut self, radians: f32) -> &mut Self {
        let (s, c) = radians.sin_cos();
        self.m = [
            [c, 0.0, -s, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [s, 0.0, c, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ];
        self
    }

    pub fn set_rotation_z(&mut self, radians: f32) -> &mut Self {
        let (s, c) = radians.sin_cos();
        self.m = [
            [c, s, 0.0, 0.0],
            [-s, c, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ];
        self
    }

    pub fn rotate_x(&mut self, radians: f32) -> &mut Self {
        let mut elementary = Self::identity();
        elementary.set_rotation_x(radians);
        self.post_multiply(&elementary)
    }

    pub fn rotate_y(&mut self, radians: f32) -> &mut Self {
        let mut elementary = Self::identity();
        elementary.set_rotation_y(radians);
        self.post_multiply(&elementary)
    }

    pub fn rotate_z(&mut self, radians: f32) -> &mut Self {
        let mut elementary = Self::identity();
        elementary.set_rotation_z(radians);
        self.post_multiply(&elementary)
    }

    /// Overwrites `self` with `Z(roll) * Y(yaw) * X(pitch)`.
    pub fn set_euler(&mut self, pitch: f32, yaw: f32, roll: f32) -> &mut Self {
        let (mut x, mut y, mut z) = (Self::identity(), Self::identity(), Self::identity());
        x.set_rotation_x(pitch);
        y.set_rotation_y(yaw);
        z.set_rotation_z(roll);
        *self = z * y * x;
        self
    }

    /// Writes the translation column and forces `m[3][3]` to 1. Other entries are kept.
    pub fn set_translation(&mut self, x: f32, y: f32, z: f32) -> &mut Self {
        self.m[0][3] = x;
        self.m[1][3] = y;
        self.m[2][3] = z;
        self.m[3][3] = 1.0;
        self
    }

    pub fn set_translation_vec(&mut self, v: Vec3) -> &mut Self {
        self.set_translation(v.x, v.y, v.z)
    }

    /// Adds to the translation column.
    pub fn translate(&mut self, x: f32, y: f32, z: f32) -> &mut Self {
        self.m[0][3] += x;
        self.m[1][3] += y;
        self.m[2][3] += z;
        self
    }

    pub fn translate_vec(&mut self, v: Vec3) -> &mut Self {
        self.translate(v.x, v.y, v.z)
    }

    /// Overwrites `self` with a perspective projection for a `[0, 1]` depth range.
    pub fn set_perspective(
        &mut self,
        aspect: f32,
        fov_radians: f32,
        z_near: f32,
        z_far: f32,
    ) -> &mut Self {
        let y_scale = (0.5 * (std::f32::consts::PI - fov_radians)).tan();
        let x_scale = y_scale / aspect;
        let z_range_inverse = 1.0 / (z_near - z_far);
        let z_scale = z_far * z_range_inverse;
        let z_translation = z_far * z_near * z_range_inverse;

        self.m = [
            [x_scale, 0.0, 0.0, 0.0],
            [0.0, y_scale, 0.0, 0.0],
            [0.0, 0.0, z_scale, z_translation],
            [0.0, 0.0, -1.0, 0.0],
        ];
        self
    }

    #[must_use]
    pub fn perspective(aspect: f32, fov_radians: f32, z_near: f32, z_far: f32) -> Self {
        let mut m = Self::identity();
        m.set_perspective(aspect, fov_radians, z_near, z_far);
        m
    }

    /// Overwrites `self` with an orthographic projection.
    ///
    /// The x/y translation terms are always zero: the view volume is centred regardless
    /// of `left`, `right`, `bottom` and `top`, which only contribute to the scale.
    #[allow(clippy::too_many_arguments)]
    pub fn set_orthographic(
        &mut self,
        scale: f32,
        left: f32,
        right: f32,
        bottom: f32,
        top: f32,
        z_near: f32,
        z_far: f32,
    ) -> &mut Self {
        let x_scale = scale / (right - left);
        let y_scale = scale / (top - bottom);
        let z_scale = scale / (z_near - z_far);
        let z_translation = z_near / (z_near - z_far);

        self.m = [
            [x_scale, 0.0, 0.0, 0.0],
            [0.0, y_scale, 0.0, 0.0],
            [0.0, 0.0, z_scale, 0.0],
            [0.0, 0.0, z_translation, 1.0],
        ];
        self
    }

    #[must_use]
    #[allow(clippy::too_many_arguments)]
    pub fn orthographic(
        scale: f32,
        left: f32,
        right: f32,
        bottom: f32,
        top: f32,
        z_near: f32,
        z_far: f32,
    ) -> Self {
        let mut m = Self::identity();
        m.set_orthographic(scale, left, right, bottom, top, z_near, z_far);
        m
    }
}
