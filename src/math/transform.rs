use nalgebra as na;

use crate::math::{Real, Vector2};

#[cfg(feature = "serialize")]
use serde::{Serialize, Deserialize};

/// Position and orientation of a body in the plane
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub struct Transform2 {
    /// Position of the body's centroid in world space
    pub position: Vector2,

    /// Orientation in radians, counter-clockwise in a y-up frame
    pub angle: Real,
}

impl Transform2 {
    /// Creates a new transform with the given position and angle
    #[inline]
    pub fn new(position: Vector2, angle: Real) -> Self {
        Self { position, angle }
    }

    /// Creates a new identity transform
    #[inline]
    pub fn identity() -> Self {
        Self::default()
    }

    /// Creates a new transform from just a position
    #[inline]
    pub fn from_position(position: Vector2) -> Self {
        Self { position, angle: 0.0 }
    }

    /// Transforms a point from local space to world space
    #[inline]
    pub fn transform_point(&self, point: Vector2) -> Vector2 {
        self.position + point.rotate(self.angle)
    }

    /// Transforms a direction from local space to world space (rotation only)
    #[inline]
    pub fn transform_vector(&self, vector: Vector2) -> Vector2 {
        vector.rotate(self.angle)
    }

    /// Transforms a point from world space to local space
    #[inline]
    pub fn inverse_transform_point(&self, point: Vector2) -> Vector2 {
        (point - self.position).rotate(-self.angle)
    }

    /// Converts the transform to a nalgebra isometry
    #[inline]
    pub fn to_isometry(&self) -> na::Isometry2<Real> {
        na::Isometry2::new(self.position.to_nalgebra(), self.angle)
    }

    /// Creates a transform from a nalgebra isometry
    #[inline]
    pub fn from_isometry(isometry: &na::Isometry2<Real>) -> Self {
        Self {
            position: Vector2::from_nalgebra(&isometry.translation.vector),
            angle: isometry.rotation.angle(),
        }
    }
}
