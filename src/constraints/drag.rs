use crate::bodies::{Anchor, RigidBody};
use crate::constraints::{Constraint, ConstraintState};
use crate::core::{Arena, ConstraintKind};
use crate::math::{Real, Vector2};

/// Pulls an anchor toward a target point that eases toward the goal set by the caller.
///
/// Every call to [`DragConstraint::set_target`] restarts a linear ramp of
/// `steps_count` solves from the current eased target to the new goal, so a
/// target that jumps once per frame is spread across the frame's sub-steps.
#[derive(Debug, Clone)]
pub struct DragConstraint {
    state: ConstraintState,
    anchor: Anchor,

    /// Goal set by the caller
    target: Vector2,

    /// Eased target the anchor is actually pulled toward
    current_target: Vector2,

    /// Increment applied to `current_target` per solve
    step: Vector2,

    steps_count: u32,
    current_step: u32,
}

impl DragConstraint {
    /// Creates a drag constraint already settled on `target`
    pub fn new(anchor: Anchor, target: Vector2, steps_count: u32, compliance: Real) -> Self {
        let steps_count = steps_count.max(1);
        Self {
            state: ConstraintState::new(compliance),
            anchor,
            target,
            current_target: target,
            step: Vector2::zero(),
            steps_count,
            current_step: steps_count,
        }
    }

    /// Sets a new goal and restarts the ramp from the current eased target
    pub fn set_target(&mut self, target: Vector2) {
        self.target = target;
        self.current_step = 0;
        self.step = (self.target - self.current_target) / self.steps_count as Real;
    }

    /// Returns the goal set by the caller
    pub fn get_target(&self) -> Vector2 {
        self.target
    }

    /// Returns the eased target used by the last solve
    pub fn get_current_target(&self) -> Vector2 {
        self.current_target
    }

    /// Returns the number of solves a ramp takes
    pub fn get_steps_count(&self) -> u32 {
        self.steps_count
    }

    /// Returns whether the eased target has reached the goal
    pub fn is_settled(&self) -> bool {
        self.current_step >= self.steps_count
    }

    /// Returns the dragged anchor
    pub fn get_anchor(&self) -> Anchor {
        self.anchor
    }
}

impl Constraint for DragConstraint {
    const KIND: ConstraintKind = ConstraintKind::Drag;

    fn state(&self) -> &ConstraintState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut ConstraintState {
        &mut self.state
    }

    fn solve(&mut self, dt: Real, bodies: &mut Arena<RigidBody>) {
        if self.current_step < self.steps_count {
            self.current_step += 1;
            self.current_target = if self.current_step == self.steps_count {
                self.target
            } else {
                self.current_target + self.step
            };
        }

        let (world, r) = self.anchor.resolve(bodies);
        let v = self.current_target - world;
        let distance = v.length();
        if distance == 0.0 {
            return;
        }
        let n = v / distance;

        let w = bodies[self.anchor.body].generalized_inverse_mass(r, n);
        let Some(delta_lambda) = self.state.delta_lambda(distance, w, dt) else {
            return;
        };
        self.state.assign(delta_lambda, dt);

        bodies[self.anchor.body].apply_position_correction(n * delta_lambda, r);
    }
}
