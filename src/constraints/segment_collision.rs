use crate::bodies::RigidBody;
use crate::constraints::{Constraint, ConstraintState};
use crate::core::{Arena, BodyHandle, ConstraintKind};
use crate::math::{closest_segment_point, Real, Vector2};

/// Keeps a circular body at least `radius` away from a fixed segment
#[derive(Debug, Clone)]
pub struct SegmentCollision {
    state: ConstraintState,
    body: BodyHandle,
    start: Vector2,
    end: Vector2,
    radius: Real,
}

impl SegmentCollision {
    /// Creates a new segment collision constraint
    pub fn new(body: BodyHandle, start: Vector2, end: Vector2, radius: Real, compliance: Real) -> Self {
        Self {
            state: ConstraintState::new(compliance),
            body,
            start,
            end,
            radius: radius.max(0.0),
        }
    }

    /// Returns the segment endpoints
    pub fn get_segment(&self) -> (Vector2, Vector2) {
        (self.start, self.end)
    }

    /// Moves the segment
    pub fn set_segment(&mut self, start: Vector2, end: Vector2) {
        self.start = start;
        self.end = end;
    }

    /// Returns the body radius
    pub fn get_radius(&self) -> Real {
        self.radius
    }

    /// Returns the constrained body
    pub fn get_body(&self) -> BodyHandle {
        self.body
    }
}

impl Constraint for SegmentCollision {
    const KIND: ConstraintKind = ConstraintKind::SegmentCollision;

    fn state(&self) -> &ConstraintState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut ConstraintState {
        &mut self.state
    }

    fn solve(&mut self, dt: Real, bodies: &mut Arena<RigidBody>) {
        let body = &bodies[self.body];
        let position = body.get_position();
        let closest = closest_segment_point(position, self.start, self.end);

        let Some((normal, distance)) = (position - closest).try_normalize() else {
            return;
        };
        if distance >= self.radius {
            return;
        }

        let r = -normal * self.radius;
        let w = body.generalized_inverse_mass(r, normal);

        let Some(delta_lambda) = self.state.delta_lambda(self.radius - distance, w, dt) else {
            return;
        };
        self.state.assign(delta_lambda, dt);

        bodies[self.body].apply_position_correction(normal * delta_lambda, r);
    }
}
