mod constraint;
mod distance;
mod angular;
mod angular_limit;
mod segment_pin;
mod drag;
mod non_penetration;
mod static_non_penetration;
mod surface;
mod segment_collision;

pub use self::constraint::{Constraint, ConstraintState};
pub use self::distance::DistanceConstraint;
pub use self::angular::AngularConstraint;
pub use self::angular_limit::AngularLimit;
pub use self::segment_pin::SegmentPin;
pub use self::drag::DragConstraint;
pub use self::non_penetration::NonPenetration;
pub use self::static_non_penetration::StaticNonPenetration;
pub use self::surface::SurfaceConstraint;
pub use self::segment_collision::SegmentCollision;
