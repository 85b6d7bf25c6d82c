use crate::bodies::RigidBody;
use crate::core::{Arena, ConstraintKind};
use crate::math::Real;

/// Compliance and Lagrange multiplier shared by every constraint
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ConstraintState {
    /// Inverse stiffness, 0 for a rigid constraint
    pub compliance: Real,

    /// Lagrange multiplier accumulated during the current sub-step
    pub lambda: Real,

    /// Force exerted during the last solve, `lambda / dt^2`
    pub force: Real,
}

impl ConstraintState {
    /// Creates a state with the given compliance
    pub fn new(compliance: Real) -> Self {
        Self {
            compliance: compliance.max(0.0),
            lambda: 0.0,
            force: 0.0,
        }
    }

    /// XPBD multiplier increment for a correction of `error` along the constraint
    /// direction, given the summed generalized inverse masses.
    ///
    /// Returns `None` when neither side can move and the constraint is rigid.
    #[inline]
    pub fn delta_lambda(&self, error: Real, inverse_mass_sum: Real, dt: Real) -> Option<Real> {
        let alpha = self.compliance / (dt * dt);
        let denominator = inverse_mass_sum + alpha;
        if denominator > 0.0 {
            Some((error - alpha * self.lambda) / denominator)
        } else {
            None
        }
    }

    /// Adds `delta_lambda` to the multiplier and refreshes the force
    #[inline]
    pub fn accumulate(&mut self, delta_lambda: Real, dt: Real) {
        self.lambda += delta_lambda;
        self.force = self.lambda / (dt * dt);
    }

    /// Replaces the multiplier with `delta_lambda` and refreshes the force
    #[inline]
    pub fn assign(&mut self, delta_lambda: Real, dt: Real) {
        self.lambda = delta_lambda;
        self.force = self.lambda / (dt * dt);
    }
}

/// Capability shared by every constraint type.
///
/// The solver keeps one arena per implementor and calls these methods through
/// static dispatch during its sweeps.
pub trait Constraint {
    /// The arena this constraint type lives in
    const KIND: ConstraintKind;

    /// Shared compliance/multiplier state
    fn state(&self) -> &ConstraintState;

    /// Shared compliance/multiplier state, mutably
    fn state_mut(&mut self) -> &mut ConstraintState;

    /// Projects the bodies toward satisfying the constraint for a sub-step of `dt`
    fn solve(&mut self, dt: Real, bodies: &mut Arena<RigidBody>);

    /// Clears the multiplier before a new sub-step
    fn reset(&mut self) {
        self.state_mut().lambda = 0.0;
    }

    /// Returns the constraint's compliance
    fn get_compliance(&self) -> Real {
        self.state().compliance
    }

    /// Sets the constraint's compliance (negative values are clamped to 0)
    fn set_compliance(&mut self, compliance: Real) {
        self.state_mut().compliance = compliance.max(0.0);
    }

    /// Returns the multiplier from the last solve
    fn get_lambda(&self) -> Real {
        self.state().lambda
    }

    /// Returns the force exerted during the last solve
    fn get_force(&self) -> Real {
        self.state().force
    }
}
