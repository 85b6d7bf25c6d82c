use crate::bodies::{Anchor, RigidBody};
use crate::constraints::{Constraint, ConstraintState};
use crate::core::{Arena, ConstraintKind};
use crate::math::Real;

/// A distance constraint maintains a fixed distance between two anchors on different bodies
#[derive(Debug, Clone)]
pub struct DistanceConstraint {
    state: ConstraintState,

    /// The anchor on the first body
    anchor_a: Anchor,

    /// The anchor on the second body
    anchor_b: Anchor,

    /// The desired distance between the anchor points
    distance: Real,

    /// Distance measured during the last solve
    current_length: Real,
}

impl DistanceConstraint {
    /// Creates a new distance constraint
    pub fn new(anchor_a: Anchor, anchor_b: Anchor, distance: Real, compliance: Real) -> Self {
        Self {
            state: ConstraintState::new(compliance),
            anchor_a,
            anchor_b,
            distance: distance.max(0.0),
            current_length: 0.0,
        }
    }

    /// Creates a pin: both anchors are held at the same world point
    pub fn pin(anchor_a: Anchor, anchor_b: Anchor, compliance: Real) -> Self {
        Self::new(anchor_a, anchor_b, 0.0, compliance)
    }

    /// Returns the desired distance
    pub fn get_distance(&self) -> Real {
        self.distance
    }

    /// Sets the desired distance
    pub fn set_distance(&mut self, distance: Real) {
        self.distance = distance.max(0.0);
    }

    /// Returns the distance measured during the last solve
    pub fn get_current_length(&self) -> Real {
        self.current_length
    }

    /// Returns the two anchors
    pub fn get_anchors(&self) -> (Anchor, Anchor) {
        (self.anchor_a, self.anchor_b)
    }
}

impl Constraint for DistanceConstraint {
    const KIND: ConstraintKind = ConstraintKind::Distance;

    fn state(&self) -> &ConstraintState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut ConstraintState {
        &mut self.state
    }

    fn solve(&mut self, dt: Real, bodies: &mut Arena<RigidBody>) {
        let (world_a, ra) = self.anchor_a.resolve(bodies);
        let (world_b, rb) = self.anchor_b.resolve(bodies);

        let (n, length) = match (world_a - world_b).try_normalize() {
            Some(direction) => direction,
            None => {
                // Coincident anchors: a pin is satisfied, anything else has no direction
                self.current_length = 0.0;
                return;
            }
        };
        self.current_length = length;

        let w = bodies[self.anchor_a.body].generalized_inverse_mass(ra, n)
            + bodies[self.anchor_b.body].generalized_inverse_mass(rb, -n);

        let Some(delta_lambda) = self.state.delta_lambda(self.distance - length, w, dt) else {
            return;
        };
        self.state.accumulate(delta_lambda, dt);

        let p = n * delta_lambda;
        bodies[self.anchor_a.body].apply_position_correction(p, ra);
        bodies[self.anchor_b.body].apply_position_correction(-p, rb);
    }
}
