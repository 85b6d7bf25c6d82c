use crate::bodies::RigidBody;
use crate::constraints::{Constraint, ConstraintState};
use crate::core::{Arena, BodyHandle, ConstraintKind};
use crate::math::Real;

/// Keeps the relative angle of two bodies inside `[angle_min, angle_max]`.
///
/// The relative angle is `(angle_b - offset) - angle_a`, measured without wrapping.
/// Inside the band the constraint only relaxes its own accumulated multiplier.
#[derive(Debug, Clone)]
pub struct AngularLimit {
    state: ConstraintState,
    body_a: BodyHandle,
    body_b: BodyHandle,
    angle_min: Real,
    angle_max: Real,
    offset: Real,
}

impl AngularLimit {
    /// Creates a new angular limit; the bounds are swapped if given in the wrong order
    pub fn new(
        body_a: BodyHandle,
        body_b: BodyHandle,
        angle_min: Real,
        angle_max: Real,
        offset: Real,
        compliance: Real,
    ) -> Self {
        Self {
            state: ConstraintState::new(compliance),
            body_a,
            body_b,
            angle_min: angle_min.min(angle_max),
            angle_max: angle_max.max(angle_min),
            offset,
        }
    }

    /// Returns the allowed band
    pub fn get_limits(&self) -> (Real, Real) {
        (self.angle_min, self.angle_max)
    }

    /// Sets the allowed band
    pub fn set_limits(&mut self, angle_min: Real, angle_max: Real) {
        self.angle_min = angle_min.min(angle_max);
        self.angle_max = angle_max.max(angle_min);
    }

    /// Returns the angle subtracted from the second body's orientation
    pub fn get_offset(&self) -> Real {
        self.offset
    }

    /// Returns the constrained bodies
    pub fn get_bodies(&self) -> (BodyHandle, BodyHandle) {
        (self.body_a, self.body_b)
    }

    /// Current relative angle, as seen by the limit
    pub fn relative_angle(&self, bodies: &Arena<RigidBody>) -> Real {
        (bodies[self.body_b].get_angle() - self.offset) - bodies[self.body_a].get_angle()
    }
}

impl Constraint for AngularLimit {
    const KIND: ConstraintKind = ConstraintKind::AngularLimit;

    fn state(&self) -> &ConstraintState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut ConstraintState {
        &mut self.state
    }

    fn solve(&mut self, dt: Real, bodies: &mut Arena<RigidBody>) {
        let current = self.relative_angle(bodies);

        let violation = if current < self.angle_min {
            self.angle_min - current
        } else if current > self.angle_max {
            self.angle_max - current
        } else {
            0.0
        };

        let w = bodies[self.body_a].get_inverse_inertia() + bodies[self.body_b].get_inverse_inertia();

        let Some(delta_lambda) = self.state.delta_lambda(-violation, w, dt) else {
            return;
        };
        self.state.accumulate(delta_lambda, dt);

        bodies[self.body_a].apply_rotation_correction(delta_lambda);
        bodies[self.body_b].apply_rotation_correction(-delta_lambda);
    }
}
