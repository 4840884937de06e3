//! Planar rigid-motion representation used for all camera paths.
//!
//! A [`Transform`] is a translation `(x, y)` plus a rotation angle `a`
//! (radians). Composition and difference are component-wise: consecutive
//! frame rotations are small, so translation and rotation are treated as
//! independently additive. This is not SE(2) composition and must stay that
//! way, since every cumulative path in the pipeline is built on it.

use std::fmt;
use std::ops::{Add, AddAssign, Div, Mul, Neg, Sub, SubAssign};

use nalgebra::{Matrix2x3, Vector3};
use serde::{Deserialize, Serialize};

/// Translation `(x, y)` and rotation `a` in radians.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Transform {
    pub x: f64,
    pub y: f64,
    pub a: f64,
}

impl Transform {
    /// The zero motion.
    pub const IDENTITY: Transform = Transform { x: 0.0, y: 0.0, a: 0.0 };

    /// Create a new transform from its components.
    pub fn new(x: f64, y: f64, a: f64) -> Self {
        Self { x, y, a }
    }

    /// Extract translation and rotation from a 2x3 affine matrix.
    ///
    /// The angle is taken from the first column, so any scale or shear in the
    /// matrix is discarded.
    pub fn from_affine(m: &Matrix2x3<f64>) -> Self {
        Self {
            x: m[(0, 2)],
            y: m[(1, 2)],
            a: m[(1, 0)].atan2(m[(0, 0)]),
        }
    }

    /// Convert to the affine matrix `[[cos a, -sin a, x], [sin a, cos a, y]]`.
    pub fn to_affine(&self) -> Matrix2x3<f64> {
        let (sin, cos) = self.a.sin_cos();
        Matrix2x3::new(
            cos, -sin, self.x,
            sin, cos, self.y,
        )
    }

    /// Convert to the column vector `[x, y, a]`.
    pub fn to_vector(&self) -> Vector3<f64> {
        Vector3::new(self.x, self.y, self.a)
    }

    /// Build a transform from the column vector `[x, y, a]`.
    pub fn from_vector(v: &Vector3<f64>) -> Self {
        Self::new(v[0], v[1], v[2])
    }

    /// Scale every component by `c`.
    pub fn scale(&self, c: f64) -> Self {
        Self::new(c * self.x, c * self.y, c * self.a)
    }

    /// Euclidean norm over `(x, y, a)`.
    pub fn norm(&self) -> f64 {
        (self.x * self.x + self.y * self.y + self.a * self.a).sqrt()
    }

    /// Whether this transform is exactly zero motion.
    pub fn is_identity(&self) -> bool {
        *self == Self::IDENTITY
    }
}

impl Add for Transform {
    type Output = Transform;

    fn add(self, rhs: Transform) -> Transform {
        Transform::new(self.x + rhs.x, self.y + rhs.y, self.a + rhs.a)
    }
}

impl AddAssign for Transform {
    fn add_assign(&mut self, rhs: Transform) {
        self.x += rhs.x;
        self.y += rhs.y;
        self.a += rhs.a;
    }
}

impl Neg for Transform {
    type Output = Transform;

    fn neg(self) -> Transform {
        Transform::new(-self.x, -self.y, -self.a)
    }
}

impl Sub for Transform {
    type Output = Transform;

    fn sub(self, rhs: Transform) -> Transform {
        self + -rhs
    }
}

impl SubAssign for Transform {
    fn sub_assign(&mut self, rhs: Transform) {
        *self += -rhs;
    }
}

impl Mul<f64> for Transform {
    type Output = Transform;

    fn mul(self, c: f64) -> Transform {
        self.scale(c)
    }
}

impl Mul<Transform> for f64 {
    type Output = Transform;

    fn mul(self, t: Transform) -> Transform {
        t.scale(self)
    }
}

impl Div<f64> for Transform {
    type Output = Transform;

    fn div(self, c: f64) -> Transform {
        self.scale(1.0 / c)
    }
}

impl fmt::Display for Transform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{ x: {}, y: {}, a: {} }}", self.x, self.y, self.a)
    }
}
