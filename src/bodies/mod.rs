mod rigid_body;
mod anchor;

pub use self::rigid_body::{RigidBody, RigidBodyHandle};
pub use self::anchor::Anchor;
pub use self::body_flags::BodyFlags;

/// Flags for controlling body behavior
pub mod body_flags {
    use bitflags::bitflags;

    bitflags! {
        /// Flags for controlling the behavior of rigid bodies
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
        pub struct BodyFlags: u32 {
            /// Body is integrated by the solver; cleared for fixed or kinematic bodies
            const MOVING = 0x01;

            /// Body receives the solver's gravity
            const AFFECTED_BY_GRAVITY = 0x02;
        }
    }
}
