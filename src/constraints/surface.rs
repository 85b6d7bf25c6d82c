use crate::bodies::RigidBody;
use crate::constraints::{Constraint, ConstraintState};
use crate::core::{Arena, BodyHandle, ConstraintKind};
use crate::math::{distance_to_line, Real, Vector2};

/// Keeps a body on the outer side of a half-plane of finite thickness
#[derive(Debug, Clone)]
pub struct SurfaceConstraint {
    state: ConstraintState,
    body: BodyHandle,
    origin: Vector2,

    /// Unit normal pointing out of the surface
    normal: Vector2,

    half_thickness: Real,
}

impl SurfaceConstraint {
    /// Creates a new surface constraint; `normal` is normalized
    pub fn new(body: BodyHandle, origin: Vector2, normal: Vector2, half_thickness: Real, compliance: Real) -> Self {
        Self {
            state: ConstraintState::new(compliance),
            body,
            origin,
            normal: normal.normalize(),
            half_thickness: half_thickness.max(0.0),
        }
    }

    /// Returns the plane origin
    pub fn get_origin(&self) -> Vector2 {
        self.origin
    }

    /// Returns the plane normal
    pub fn get_normal(&self) -> Vector2 {
        self.normal
    }

    /// Returns the half thickness
    pub fn get_half_thickness(&self) -> Real {
        self.half_thickness
    }

    /// Returns the constrained body
    pub fn get_body(&self) -> BodyHandle {
        self.body
    }

    /// How far the body must move along the normal to clear the surface.
    ///
    /// Positive while overlapping: behind the plane this is the distance to it
    /// plus the half thickness, in front it is what is left of the half thickness.
    pub fn offset(&self, position: Vector2) -> Real {
        let distance = distance_to_line(position, self.normal.perpendicular(), self.origin);
        let side = (position - self.origin).dot(&self.normal);
        if side < 0.0 {
            distance + self.half_thickness
        } else {
            self.half_thickness - distance
        }
    }
}

impl Constraint for SurfaceConstraint {
    const KIND: ConstraintKind = ConstraintKind::Surface;

    fn state(&self) -> &ConstraintState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut ConstraintState {
        &mut self.state
    }

    fn solve(&mut self, dt: Real, bodies: &mut Arena<RigidBody>) {
        let body = &bodies[self.body];
        let offset = self.offset(body.get_position());
        if offset <= 0.0 {
            return;
        }

        let r = -self.normal * self.half_thickness;
        let w = body.generalized_inverse_mass(r, self.normal);

        let Some(delta_lambda) = self.state.delta_lambda(offset, w, dt) else {
            return;
        };
        self.state.assign(delta_lambda, dt);

        bodies[self.body].apply_position_correction(self.normal * delta_lambda, r);
    }
}
