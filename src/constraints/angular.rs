use crate::bodies::RigidBody;
use crate::constraints::{Constraint, ConstraintState};
use crate::core::{Arena, BodyHandle, ConstraintKind};
use crate::math::{Real, Vector2};

/// Holds the relative orientation of two bodies at a target angle (a stiff hinge)
#[derive(Debug, Clone)]
pub struct AngularConstraint {
    state: ConstraintState,
    body_a: BodyHandle,
    body_b: BodyHandle,

    /// Desired signed angle from the first body's orientation to the second's
    angle: Real,
}

impl AngularConstraint {
    /// Creates a new angular constraint
    pub fn new(body_a: BodyHandle, body_b: BodyHandle, angle: Real, compliance: Real) -> Self {
        Self {
            state: ConstraintState::new(compliance),
            body_a,
            body_b,
            angle,
        }
    }

    /// Returns the target relative angle
    pub fn get_angle(&self) -> Real {
        self.angle
    }

    /// Sets the target relative angle
    pub fn set_angle(&mut self, angle: Real) {
        self.angle = angle;
    }

    /// Returns the constrained bodies
    pub fn get_bodies(&self) -> (BodyHandle, BodyHandle) {
        (self.body_a, self.body_b)
    }
}

impl Constraint for AngularConstraint {
    const KIND: ConstraintKind = ConstraintKind::Angular;

    fn state(&self) -> &ConstraintState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut ConstraintState {
        &mut self.state
    }

    fn solve(&mut self, dt: Real, bodies: &mut Arena<RigidBody>) {
        let (a, b) = (&bodies[self.body_a], &bodies[self.body_b]);

        // Measured through directions so the error is wrapped to (-PI, PI]
        let relative = Vector2::from_angle(a.get_angle()).angle_to(&Vector2::from_angle(b.get_angle()));
        let w = a.get_inverse_inertia() + b.get_inverse_inertia();

        let Some(delta_lambda) = self.state.delta_lambda(relative - self.angle, w, dt) else {
            return;
        };
        self.state.assign(delta_lambda, dt);

        bodies[self.body_a].apply_rotation_correction(delta_lambda);
        bodies[self.body_b].apply_rotation_correction(-delta_lambda);
    }
}
