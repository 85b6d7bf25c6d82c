use crate::bodies::RigidBody;
use crate::constraints::{Constraint, ConstraintState};
use crate::core::{Arena, BodyHandle, ConstraintKind};
use crate::math::{Real, Vector2};

/// Keeps two circular particle proxies on different bodies from overlapping
#[derive(Debug, Clone)]
pub struct NonPenetration {
    state: ConstraintState,
    body_a: BodyHandle,
    particle_a: usize,
    radius_a: Real,
    body_b: BodyHandle,
    particle_b: usize,
    radius_b: Real,
}

impl NonPenetration {
    /// Creates a new non-penetration constraint between particle proxies
    pub fn new(
        body_a: BodyHandle,
        particle_a: usize,
        radius_a: Real,
        body_b: BodyHandle,
        particle_b: usize,
        radius_b: Real,
    ) -> Self {
        Self {
            state: ConstraintState::new(0.0),
            body_a,
            particle_a,
            radius_a: radius_a.max(0.0),
            body_b,
            particle_b,
            radius_b: radius_b.max(0.0),
        }
    }

    /// Sum of both proxy radii
    pub fn combined_radius(&self) -> Real {
        self.radius_a + self.radius_b
    }

    /// Returns the constrained bodies
    pub fn get_bodies(&self) -> (BodyHandle, BodyHandle) {
        (self.body_a, self.body_b)
    }
}

impl Constraint for NonPenetration {
    const KIND: ConstraintKind = ConstraintKind::NonPenetration;

    fn state(&self) -> &ConstraintState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut ConstraintState {
        &mut self.state
    }

    fn solve(&mut self, dt: Real, bodies: &mut Arena<RigidBody>) {
        let (a, b) = (&bodies[self.body_a], &bodies[self.body_b]);
        let world_a = a.world_particle(self.particle_a);
        let world_b = b.world_particle(self.particle_b);

        let min_distance = self.combined_radius();
        let Some((n, distance)) = (world_a - world_b).try_normalize() else {
            return;
        };
        if distance >= min_distance {
            return;
        }

        let contact = (world_a + world_b) * 0.5;
        let ra = contact - a.get_position();
        let rb = contact - b.get_position();
        let w = a.generalized_inverse_mass(ra, n) + b.generalized_inverse_mass(rb, n);

        let Some(delta_lambda) = self.state.delta_lambda(min_distance - distance, w, dt) else {
            return;
        };
        self.state.accumulate(delta_lambda, dt);

        let p: Vector2 = n * delta_lambda;
        bodies[self.body_a].apply_position_correction(p, ra);
        bodies[self.body_b].apply_position_correction(-p, rb);
    }
}
