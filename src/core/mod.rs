pub mod solver;
pub mod config;
pub mod storage;
pub mod events;

pub use self::solver::{Solver, SolverConstraint};
pub use self::config::SolverConfig;
pub use self::storage::{Arena, Handle};
pub use self::events::{EventQueue, SolverEvent, SolverEventType};

use crate::bodies::RigidBody;

/// A unique identifier for a body in the solver
pub type BodyHandle = Handle<RigidBody>;

/// The constraint arenas owned by the solver, in sweep order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ConstraintKind {
    Drag,
    Distance,
    Angular,
    SegmentPin,
    AngularLimit,
    NonPenetration,
    StaticNonPenetration,
    Surface,
    SegmentCollision,
}

impl ConstraintKind {
    /// Every kind, in the order the solver sweeps them
    pub const ALL: [ConstraintKind; 9] = [
        ConstraintKind::Drag,
        ConstraintKind::Distance,
        ConstraintKind::Angular,
        ConstraintKind::SegmentPin,
        ConstraintKind::AngularLimit,
        ConstraintKind::NonPenetration,
        ConstraintKind::StaticNonPenetration,
        ConstraintKind::Surface,
        ConstraintKind::SegmentCollision,
    ];

    /// Human readable name of the constraint type
    pub fn name(&self) -> &'static str {
        match self {
            ConstraintKind::Drag => "Drag",
            ConstraintKind::Distance => "Distance",
            ConstraintKind::Angular => "Angular",
            ConstraintKind::SegmentPin => "SegmentPin",
            ConstraintKind::AngularLimit => "AngularLimit",
            ConstraintKind::NonPenetration => "NonPenetration",
            ConstraintKind::StaticNonPenetration => "StaticNonPenetration",
            ConstraintKind::Surface => "Surface",
            ConstraintKind::SegmentCollision => "SegmentCollision",
        }
    }
}
