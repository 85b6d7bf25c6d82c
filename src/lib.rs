pub mod math;
pub mod core;
pub mod bodies;
pub mod constraints;

/// Re-export common types for easier usage
pub use crate::core::{Arena, BodyHandle, Handle, Solver, SolverConfig};
pub use crate::bodies::{Anchor, RigidBody, RigidBodyHandle};
pub use crate::constraints::Constraint;
pub use crate::math::{Real, Vector2};

/// Error types for the solver
pub mod error {
    use thiserror::Error;

    #[derive(Error, Debug, Clone, PartialEq)]
    pub enum PhysicsError {
        #[error("Invalid parameter: {0}")]
        InvalidParameter(String),

        #[error("Resource not found: {0}")]
        ResourceNotFound(String),
    }
}

/// Result type for solver operations
pub type Result<T> = std::result::Result<T, error::PhysicsError>;

/// Engine version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
