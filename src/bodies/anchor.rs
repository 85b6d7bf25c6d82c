use crate::bodies::RigidBody;
use crate::core::{Arena, BodyHandle};
use crate::math::Vector2;

/// A point fixed in a body's local frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Anchor {
    /// The body the point belongs to
    pub body: BodyHandle,

    /// Coordinates of the point in the body's local frame
    pub local: Vector2,
}

impl Anchor {
    /// Creates a new anchor from a body and a local coordinate
    pub fn new(body: BodyHandle, local: Vector2) -> Self {
        Self { body, local }
    }

    /// Creates an anchor at the body's centroid
    pub fn center(body: BodyHandle) -> Self {
        Self::new(body, Vector2::zero())
    }

    /// Resolves the anchor to a world position
    #[inline]
    pub fn world_position(&self, bodies: &Arena<RigidBody>) -> Vector2 {
        bodies[self.body].world_point(self.local)
    }

    /// World position and offset from the body's centroid
    #[inline]
    pub(crate) fn resolve(&self, bodies: &Arena<RigidBody>) -> (Vector2, Vector2) {
        let body = &bodies[self.body];
        let world = body.world_point(self.local);
        (world, world - body.get_position())
    }
}
