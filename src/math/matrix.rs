use crate::math::Vector2;
use nalgebra as na;
use std::fmt;

#[cfg(feature = "serialize")]
use serde::{Deserialize, Serialize};

/// A 2x2 matrix representation for physics calculations
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub struct Matrix2 {
    pub data: [[f32; 2]; 2],
}

impl Matrix2 {
    /// Creates a new 2x2 matrix from a 2D array
    #[inline]
    pub fn new(data: [[f32; 2]; 2]) -> Self {
        Self { data }
    }

    /// Creates a new 2x2 identity matrix
    #[inline]
    pub fn identity() -> Self {
        Self {
            data: [[1.0, 0.0], [0.0, 1.0]],
        }
    }

    /// Creates a new 2x2 zero matrix
    #[inline]
    pub fn zero() -> Self {
        Self {
            data: [[0.0, 0.0], [0.0, 0.0]],
        }
    }

    /// Returns the determinant of the matrix
    #[inline]
    pub fn determinant(&self) -> f32 {
        self.data[0][0] * self.data[1][1] - self.data[0][1] * self.data[1][0]
    }

    /// Returns the inverse of the matrix, or None if it is singular
    pub fn inverse(&self) -> Option<Self> {
        let det = self.determinant();
        if det.abs() < crate::math::EPSILON {
            return None;
        }

        let inv_det = 1.0 / det;
        Some(Self {
            data: [
                [self.data[1][1] * inv_det, -self.data[0][1] * inv_det],
                [-self.data[1][0] * inv_det, self.data[0][0] * inv_det],
            ],
        })
    }

    /// Returns the transpose of the matrix
    #[inline]
    pub fn transpose(&self) -> Self {
        Self {
            data: [
                [self.data[0][0], self.data[1][0]],
                [self.data[0][1], self.data[1][1]],
            ],
        }
    }

    /// Multiplies the matrix by a vector
    #[inline]
    pub fn transform_vector(&self, v: Vector2) -> Vector2 {
        Vector2::new(
            self.data[0][0] * v.x + self.data[0][1] * v.y,
            self.data[1][0] * v.x + self.data[1][1] * v.y,
        )
    }

    /// Convert to nalgebra Matrix2
    #[inline]
    pub fn to_nalgebra(&self) -> na::Matrix2<f32> {
        na::Matrix2::new(
            self.data[0][0],
            self.data[0][1],
            self.data[1][0],
            self.data[1][1],
        )
    }

    /// Convert from nalgebra Matrix2
    #[inline]
    pub fn from_nalgebra(m: &na::Matrix2<f32>) -> Self {
        Self {
            data: [[m[(0, 0)], m[(0, 1)]], [m[(1, 0)], m[(1, 1)]]],
        }
    }
}

impl fmt::Display for Matrix2 {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "[[{}, {}], [{}, {}]]",
            self.data[0][0], self.data[0][1], self.data[1][0], self.data[1][1]
        )
    }
}
