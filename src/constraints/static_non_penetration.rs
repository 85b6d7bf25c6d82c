use crate::bodies::RigidBody;
use crate::constraints::{Constraint, ConstraintState};
use crate::core::{Arena, BodyHandle, ConstraintKind};
use crate::math::{Real, Vector2};

/// Keeps a body's circular proxy out of a fixed circle in world space
#[derive(Debug, Clone)]
pub struct StaticNonPenetration {
    state: ConstraintState,
    position: Vector2,
    radius: Real,
    body: BodyHandle,
    body_radius: Real,
}

impl StaticNonPenetration {
    /// Creates a new static non-penetration constraint
    pub fn new(position: Vector2, radius: Real, body: BodyHandle, body_radius: Real) -> Self {
        Self {
            state: ConstraintState::new(0.0),
            position,
            radius: radius.max(0.0),
            body,
            body_radius: body_radius.max(0.0),
        }
    }

    /// Returns the centre of the fixed circle
    pub fn get_position(&self) -> Vector2 {
        self.position
    }

    /// Moves the fixed circle
    pub fn set_position(&mut self, position: Vector2) {
        self.position = position;
    }

    /// Returns the fixed circle's radius
    pub fn get_radius(&self) -> Real {
        self.radius
    }

    /// Returns the constrained body
    pub fn get_body(&self) -> BodyHandle {
        self.body
    }
}

impl Constraint for StaticNonPenetration {
    const KIND: ConstraintKind = ConstraintKind::StaticNonPenetration;

    fn state(&self) -> &ConstraintState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut ConstraintState {
        &mut self.state
    }

    fn solve(&mut self, dt: Real, bodies: &mut Arena<RigidBody>) {
        let body = &bodies[self.body];
        let body_position = body.get_position();

        let min_distance = self.radius + self.body_radius;
        let Some((n, distance)) = (body_position - self.position).try_normalize() else {
            return;
        };
        if distance >= min_distance {
            return;
        }

        let contact = (body_position + self.position) * 0.5;
        let r = contact - body_position;
        let w = body.generalized_inverse_mass(r, n);

        let Some(delta_lambda) = self.state.delta_lambda(min_distance - distance, w, dt) else {
            return;
        };
        self.state.accumulate(delta_lambda, dt);

        bodies[self.body].apply_position_correction(n * delta_lambda, r);
    }
}
