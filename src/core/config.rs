use crate::error::PhysicsError;
use crate::math::{Real, Vector2};
use crate::Result;

#[cfg(feature = "serialize")]
use serde::{Serialize, Deserialize};

/// Configuration parameters for the solver
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub struct SolverConfig {
    /// Gravity acceleration applied to every moving body.
    ///
    /// The default is expressed in screen units, with y pointing down.
    pub gravity: Vector2,

    /// Velocity damping applied after every sub-step, in [0, 1)
    pub friction: Real,

    /// Number of sub-steps each call to `update` is split into
    pub sub_steps: u32,
}

impl SolverConfig {
    /// Checks that the configuration can drive a simulation
    pub fn validate(&self) -> Result<()> {
        if self.sub_steps == 0 {
            return Err(PhysicsError::InvalidParameter(
                "sub_steps must be at least 1".to_string(),
            ));
        }

        if !(0.0..1.0).contains(&self.friction) {
            return Err(PhysicsError::InvalidParameter(format!(
                "friction must be in [0, 1), got {}",
                self.friction
            )));
        }

        if !self.gravity.x.is_finite() || !self.gravity.y.is_finite() {
            return Err(PhysicsError::InvalidParameter(format!(
                "gravity must be finite, got {}",
                self.gravity
            )));
        }

        Ok(())
    }
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            gravity: Vector2::new(0.0, 1000.0),
            friction: 0.0002,
            sub_steps: 200,
        }
    }
}
