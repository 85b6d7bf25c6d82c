use crate::bodies::RigidBody;
use crate::constraints::{Constraint, ConstraintState};
use crate::core::{Arena, BodyHandle, ConstraintKind};
use crate::math::{closest_segment_point, Real};

/// Keeps a particle of one body on the segment formed by particles 0 and 1 of another.
///
/// Only the pinned body is corrected; the segment body acts as a rail.
#[derive(Debug, Clone)]
pub struct SegmentPin {
    state: ConstraintState,
    segment: BodyHandle,
    pinned: BodyHandle,
    pinned_particle: usize,
}

impl SegmentPin {
    /// Creates a new segment pin
    pub fn new(segment: BodyHandle, pinned: BodyHandle, pinned_particle: usize, compliance: Real) -> Self {
        Self {
            state: ConstraintState::new(compliance),
            segment,
            pinned,
            pinned_particle,
        }
    }

    /// Returns the body acting as the rail
    pub fn get_segment(&self) -> BodyHandle {
        self.segment
    }

    /// Returns the pinned body and the index of its pinned particle
    pub fn get_pinned(&self) -> (BodyHandle, usize) {
        (self.pinned, self.pinned_particle)
    }
}

impl Constraint for SegmentPin {
    const KIND: ConstraintKind = ConstraintKind::SegmentPin;

    fn state(&self) -> &ConstraintState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut ConstraintState {
        &mut self.state
    }

    fn solve(&mut self, dt: Real, bodies: &mut Arena<RigidBody>) {
        let rail = &bodies[self.segment];
        let (start, end) = (rail.world_particle(0), rail.world_particle(1));

        let pinned = &bodies[self.pinned];
        let pinned_world = pinned.world_particle(self.pinned_particle);
        let closest = closest_segment_point(pinned_world, start, end);

        let Some((n, distance)) = (closest - pinned_world).try_normalize() else {
            return;
        };

        let r = pinned_world - pinned.get_position();
        let w = pinned.generalized_inverse_mass(r, n);

        let Some(delta_lambda) = self.state.delta_lambda(distance, w, dt) else {
            return;
        };
        self.state.assign(delta_lambda, dt);

        bodies[self.pinned].apply_position_correction(n * delta_lambda, r);
    }
}
