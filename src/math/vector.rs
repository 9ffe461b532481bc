use std::ops::{Add, AddAssign, Div, DivAssign, Mul, MulAssign, Neg, Sub, SubAssign};

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vec4 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub w: f32,
}

/// Implements the component-wise arithmetic shared by every vector type.
macro_rules! impl_vector_ops {
    ($ty:ident { $($field:ident),+ }) => {
        impl Add for $ty {
            type Output = Self;
            fn add(self, rhs: Self) -> Self {
                Self { $($field: self.$field + rhs.$field),+ }
            }
        }

        impl Sub for $ty {
            type Output = Self;
            fn sub(self, rhs: Self) -> Self {
                Self { $($field: self.$field - rhs.$field),+ }
            }
        }

        impl Mul<f32> for $ty {
            type Output = Self;
            fn mul(self, rhs: f32) -> Self {
                Self { $($field: self.$field * rhs),+ }
            }
        }

        impl Mul<$ty> for f32 {
            type Output = $ty;
            fn mul(self, rhs: $ty) -> $ty {
                rhs * self
            }
        }

        impl Div<f32> for $ty {
            type Output = Self;
            fn div(self, rhs: f32) -> Self {
                Self { $($field: self.$field / rhs),+ }
            }
        }

        impl Neg for $ty {
            type Output = Self;
            fn neg(self) -> Self {
                self * -1.0
            }
        }

        impl AddAssign for $ty {
            fn add_assign(&mut self, rhs: Self) {
                $(self.$field += rhs.$field;)+
            }
        }

        impl SubAssign for $ty {
            fn sub_assign(&mut self, rhs: Self) {
                $(self.$field -= rhs.$field;)+
            }
        }

        impl MulAssign<f32> for $ty {
            fn mul_assign(&mut self, rhs: f32) {
                $(self.$field *= rhs;)+
            }
        }

        impl DivAssign<f32> for $ty {
            fn div_assign(&mut self, rhs: f32) {
                $(self.$field /= rhs;)+
            }
        }

        impl $ty {
            #[must_use]
            pub fn dot(&self, other: &Self) -> f32 {
                0.0 $(+ self.$field * other.$field)+
            }

            #[must_use]
            pub fn length_squared(&self) -> f32 {
                self.dot(self)
            }

            #[must_use]
            pub fn length(&self) -> f32 {
                self.length_squared().sqrt()
            }

            /// Returns the unit vector pointing the same way.
            ///
            /// A zero-length vector is returned unchanged rather than divided by zero,
            /// so the result is only unit length when the input is non-zero.
            #[must_use]
            pub fn normalize(&self) -> Self {
                let length = self.length();
                if length != 0.0 {
                    *self / length
                } else {
                    *self
                }
            }

            /// Angle in radians between the two vectors.
            ///
            /// NaN when rounding pushes the normalised dot product outside `[-1, 1]`.
            #[must_use]
            pub fn angle(&self, other: &Self) -> f32 {
                self.normalize().dot(&other.normalize()).acos()
            }

            #[must_use]
            pub fn distance(&self, other: &Self) -> f32 {
                (*self - *other).length()
            }

            #[must_use]
            pub fn scale(&self, factor: f32) -> Self {
                *self * factor
            }
        }
    };
}

impl_vector_ops!(Vec2 { x, y });
impl_vector_ops!(Vec3 { x, y, z });
impl_vector_ops!(Vec4 { x, y, z, w });

impl Vec2 {
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    #[must_use]
    pub const fn zero() -> Self {
        Self::new(0.0, 0.0)
    }

    /// The z component of the 3D cross product of the two vectors lifted onto z = 0.
    #[must_use]
    pub fn cross(&self, other: &Self) -> f32 {
        self.x * other.y - self.y * other.x
    }

    #[must_use]
    pub const fn to_array(self) -> [f32; 2] {
        [self.x, self.y]
    }
}

impl Vec3 {
    pub const X: Self = Self::new(1.0, 0.0, 0.0);
    pub const Y: Self = Self::new(0.0, 1.0, 0.0);
    pub const Z: Self = Self::new(0.0, 0.0, 1.0);

    #[must_use]
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    #[must_use]
    pub const fn zero() -> Self {
        Self::new(0.0, 0.0, 0.0)
    }

    #[must_use]
    pub fn cross(&self, other: &Self) -> Self {
        Self::new(
            self.y * other.z - self.z * other.y,
            self.z * other.x - self.x * other.z,
            self.x * other.y - self.y * other.x,
        )
    }

    #[must_use]
    pub const fn extend(self, w: f32) -> Vec4 {
        Vec4::new(self.x, self.y, self.z, w)
    }

    #[must_use]
    pub const fn to_array(self) -> [f32; 3] {
        [self.x, self.y, self.z]
    }
}

impl Vec4 {
    #[must_use]
    pub const fn new(x: f32, y: f32, z: f32, w: f32) -> Self {
        Self { x, y, z, w }
    }

    #[must_use]
    pub const fn zero() -> Self {
        Self::new(0.0, 0.0, 0.0, 0.0)
    }

    /// Cross product of the xyz parts; `w` of the result is always zero.
    #[must_use]
    pub fn cross(&self, other: &Self) -> Self {
        self.truncate().cross(&other.truncate()).extend(0.0)
    }

    #[must_use]
    pub const fn truncate(self) -> Vec3 {
        Vec3::new(self.x, self.y, self.z)
    }

    #[must_use]
    pub const fn to_array(self) -> [f32; 4] {
        [self.x, self.y, self.z, self.w]
    }
}

impl From<[f32; 3]> for Vec3 {
    fn from([x, y, z]: [f32; 3]) -> Self {
        Self::new(x, y, z)
    }
}

impl From<Vec4> for Vec3 {
    fn from(v: Vec4) -> Self {
        v.truncate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn normalize_gives_unit_length() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        for _ in 0..200 {
            let v = Vec3::new(
                rng.gen_range(-100.0..100.0),
                rng.gen_range(-100.0..100.0),
                rng.gen_range(-100.0..100.0),
            );
            if v.length() == 0.0 {
                continue;
            }
            assert!((v.normalize().length() - 1.0).abs() < 1e-5);

            let v4 = v.extend(rng.gen_range(-5.0..5.0));
            assert!((v4.normalize().length() - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn normalize_zero_is_unchanged() {
        assert_eq!(Vec2::zero().normalize(), Vec2::zero());
        assert_eq!(Vec3::zero().normalize(), Vec3::zero());
        assert_eq!(Vec4::zero().normalize(), Vec4::zero());
    }

    #[test]
    fn cross_products() {
        assert_eq!(Vec3::X.cross(&Vec3::Y), Vec3::Z);
        assert_eq!(Vec3::Y.cross(&Vec3::X), -Vec3::Z);
        assert_eq!(Vec2::new(1.0, 0.0).cross(&Vec2::new(0.0, 1.0)), 1.0);

        let a = Vec4::new(1.0, 0.0, 0.0, 5.0);
        let b = Vec4::new(0.0, 1.0, 0.0, 7.0);
        assert_eq!(a.cross(&b), Vec4::new(0.0, 0.0, 1.0, 0.0));
    }

    #[test]
    fn arithmetic() {
        let a = Vec3::new(1.0, 2.0, 3.0);
        let b = Vec3::new(4.0, 5.0, 6.0);
        assert_eq!(a + b, Vec3::new(5.0, 7.0, 9.0));
        assert_eq!(b - a, Vec3::new(3.0, 3.0, 3.0));
        assert_eq!(a * 2.0, 2.0 * a);
        assert_eq!(b / 2.0, Vec3::new(2.0, 2.5, 3.0));
        assert_eq!(a.dot(&b), 32.0);

        let mut c = a;
        c += b;
        c -= a;
        c *= 2.0;
        c /= 4.0;
        assert_eq!(c, Vec3::new(2.0, 2.5, 3.0));
    }

    #[test]
    fn angle_and_distance() {
        let angle = Vec3::X.angle(&Vec3::Y);
        assert!((angle - std::f32::consts::FRAC_PI_2).abs() < 1e-6);
        assert!((Vec2::new(0.0, 0.0).distance(&Vec2::new(3.0, 4.0)) - 5.0).abs() < 1e-6);
    }
}
