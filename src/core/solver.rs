use crate::bodies::{Anchor, RigidBody};
use crate::constraints::{
    AngularConstraint, AngularLimit, Constraint, DistanceConstraint, DragConstraint,
    NonPenetration, SegmentCollision, SegmentPin, StaticNonPenetration, SurfaceConstraint,
};
use crate::core::{
    Arena, BodyHandle, ConstraintKind, EventQueue, Handle, SolverConfig, SolverEvent,
    SolverEventType,
};
use crate::error::PhysicsError;
use crate::math::{Real, Transform2, Vector2};
use crate::Result;

/// A constraint type the solver owns an arena for.
///
/// Gives generic, statically dispatched access to the arena of each type, so
/// `remove`, `constraint` and friends work for every variant without a
/// heterogeneous collection.
pub trait SolverConstraint: Constraint + Sized {
    /// The solver's arena for this type
    fn arena(solver: &Solver) -> &Arena<Self>;

    /// The solver's arena for this type, mutably
    fn arena_mut(solver: &mut Solver) -> &mut Arena<Self>;
}

macro_rules! solver_constraint {
    ($($ty:ty => $field:ident),* $(,)?) => {
        $(
            impl SolverConstraint for $ty {
                fn arena(solver: &Solver) -> &Arena<Self> {
                    &solver.$field
                }

                fn arena_mut(solver: &mut Solver) -> &mut Arena<Self> {
                    &mut solver.$field
                }
            }
        )*
    };
}

solver_constraint! {
    DragConstraint => drag_constraints,
    DistanceConstraint => distance_constraints,
    AngularConstraint => angular_constraints,
    SegmentPin => segment_pins,
    AngularLimit => angular_limits,
    NonPenetration => non_penetrations,
    StaticNonPenetration => static_non_penetrations,
    SurfaceConstraint => surfaces,
    SegmentCollision => segment_collisions,
}

/// Sub-stepped XPBD solver owning every body and constraint
pub struct Solver {
    bodies: Arena<RigidBody>,

    drag_constraints: Arena<DragConstraint>,
    distance_constraints: Arena<DistanceConstraint>,
    angular_constraints: Arena<AngularConstraint>,
    segment_pins: Arena<SegmentPin>,
    angular_limits: Arena<AngularLimit>,
    non_penetrations: Arena<NonPenetration>,
    static_non_penetrations: Arena<StaticNonPenetration>,
    surfaces: Arena<SurfaceConstraint>,
    segment_collisions: Arena<SegmentCollision>,

    config: SolverConfig,

    /// Structural events, cleared at the start of every `update`
    events: EventQueue,

    /// The total elapsed simulation time
    time: Real,
}

impl Default for Solver {
    fn default() -> Self {
        Self::new()
    }
}

impl Solver {
    /// Creates a new solver with default settings
    pub fn new() -> Self {
        Self::from_valid_config(SolverConfig::default())
    }

    /// Creates a new solver with the given configuration
    pub fn with_config(config: SolverConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::from_valid_config(config))
    }

    fn from_valid_config(config: SolverConfig) -> Self {
        Self {
            bodies: Arena::new(),
            drag_constraints: Arena::new(),
            distance_constraints: Arena::new(),
            angular_constraints: Arena::new(),
            segment_pins: Arena::new(),
            angular_limits: Arena::new(),
            non_penetrations: Arena::new(),
            static_non_penetrations: Arena::new(),
            surfaces: Arena::new(),
            segment_collisions: Arena::new(),
            config,
            events: EventQueue::new(),
            time: 0.0,
        }
    }

    /// Returns the current simulation time
    pub fn get_time(&self) -> Real {
        self.time
    }

    /// Returns the solver configuration
    pub fn get_config(&self) -> &SolverConfig {
        &self.config
    }

    /// Replaces the configuration after validating it.
    ///
    /// Drag constraints keep the ramp length they were created with.
    pub fn set_config(&mut self, config: SolverConfig) -> Result<()> {
        config.validate()?;
        self.config = config;
        Ok(())
    }

    /// Sets the gravity acceleration
    pub fn set_gravity(&mut self, gravity: Vector2) {
        self.config.gravity = gravity;
    }

    /// Gets the gravity acceleration
    pub fn get_gravity(&self) -> Vector2 {
        self.config.gravity
    }

    /// Sets the per sub-step velocity damping
    pub fn set_friction(&mut self, friction: Real) -> Result<()> {
        let config = SolverConfig { friction, ..self.config.clone() };
        self.set_config(config)
    }

    /// Sets the number of sub-steps per update
    pub fn set_sub_steps(&mut self, sub_steps: u32) -> Result<()> {
        let config = SolverConfig { sub_steps, ..self.config.clone() };
        self.set_config(config)
    }

    /// Advances the simulation by `dt` seconds split into `sub_steps` sub-steps
    pub fn update(&mut self, dt: Real) {
        self.events.clear();
        if !(dt > 0.0) {
            return;
        }

        let sub_steps = self.config.sub_steps;
        let sub_dt = dt / sub_steps as Real;
        let gravity = self.config.gravity;
        let friction = self.config.friction;

        for remaining in (0..sub_steps).rev() {
            for body in self.bodies.iter_mut() {
                // Gravity goes through the force path, which scales by inv_mass again
                if body.is_moving() && body.is_affected_by_gravity() && body.get_inverse_mass() > 0.0 {
                    body.set_force(gravity / body.get_inverse_mass());
                }
                body.predict(sub_dt);
            }

            self.reset_constraints();

            // Alternate the sweep direction to cancel Gauss-Seidel ordering bias;
            // the last sub-step always sweeps backward
            self.solve_constraints(sub_dt, remaining % 2 == 0);

            for body in self.bodies.iter_mut() {
                body.derive_velocity(sub_dt, friction);
            }
        }

        self.time += dt;
    }

    fn reset_constraints(&mut self) {
        reset_all(&mut self.drag_constraints);
        reset_all(&mut self.distance_constraints);
        reset_all(&mut self.angular_constraints);
        reset_all(&mut self.segment_pins);
        reset_all(&mut self.angular_limits);
        reset_all(&mut self.non_penetrations);
        reset_all(&mut self.static_non_penetrations);
        reset_all(&mut self.surfaces);
        reset_all(&mut self.segment_collisions);
    }

    fn solve_constraints(&mut self, dt: Real, reverse: bool) {
        let bodies = &mut self.bodies;
        sweep(&mut self.drag_constraints, bodies, dt, reverse);
        sweep(&mut self.distance_constraints, bodies, dt, reverse);
        sweep(&mut self.angular_constraints, bodies, dt, reverse);
        sweep(&mut self.segment_pins, bodies, dt, reverse);
        sweep(&mut self.angular_limits, bodies, dt, reverse);
        sweep(&mut self.non_penetrations, bodies, dt, reverse);
        sweep(&mut self.static_non_penetrations, bodies, dt, reverse);
        sweep(&mut self.surfaces, bodies, dt, reverse);
        sweep(&mut self.segment_collisions, bodies, dt, reverse);
    }

    /// Adds a rigid body to the solver and returns its handle.
    ///
    /// The body's mass properties must already be computed.
    pub fn add_body(&mut self, body: RigidBody) -> BodyHandle {
        let handle = self.bodies.insert(body);
        self.events.push(SolverEvent::body(SolverEventType::BodyAdded, handle));
        handle
    }

    /// Adds an empty body; fill its particles and call `compute_properties` before constraining it
    pub fn create_body(&mut self) -> BodyHandle {
        self.add_body(RigidBody::new())
    }

    /// Removes a body that no constraint references anymore
    pub fn remove_body(&mut self, handle: BodyHandle) -> Result<RigidBody> {
        self.bodies.try_get(handle)?;
        if let Some(kind) = self.constraint_referencing(handle) {
            return Err(PhysicsError::InvalidParameter(format!(
                "{:?} is still referenced by a {} constraint",
                handle,
                kind.name()
            )));
        }

        self.events.push(SolverEvent::body(SolverEventType::BodyRemoved, handle));
        self.bodies.try_remove(handle)
    }

    fn constraint_referencing(&self, body: BodyHandle) -> Option<ConstraintKind> {
        let found = self.drag_constraints.iter().any(|c| c.get_anchor().body == body)
            .then_some(ConstraintKind::Drag);
        found
            .or_else(|| {
                self.distance_constraints
                    .iter()
                    .any(|c| {
                        let (a, b) = c.get_anchors();
                        a.body == body || b.body == body
                    })
                    .then_some(ConstraintKind::Distance)
            })
            .or_else(|| {
                self.angular_constraints
                    .iter()
                    .any(|c| {
                        let (a, b) = c.get_bodies();
                        a == body || b == body
                    })
                    .then_some(ConstraintKind::Angular)
            })
            .or_else(|| {
                self.segment_pins
                    .iter()
                    .any(|c| c.get_segment() == body || c.get_pinned().0 == body)
                    .then_some(ConstraintKind::SegmentPin)
            })
            .or_else(|| {
                self.angular_limits
                    .iter()
                    .any(|c| {
                        let (a, b) = c.get_bodies();
                        a == body || b == body
                    })
                    .then_some(ConstraintKind::AngularLimit)
            })
            .or_else(|| {
                self.non_penetrations
                    .iter()
                    .any(|c| {
                        let (a, b) = c.get_bodies();
                        a == body || b == body
                    })
                    .then_some(ConstraintKind::NonPenetration)
            })
            .or_else(|| {
                self.static_non_penetrations
                    .iter()
                    .any(|c| c.get_body() == body)
                    .then_some(ConstraintKind::StaticNonPenetration)
            })
            .or_else(|| {
                self.surfaces
                    .iter()
                    .any(|c| c.get_body() == body)
                    .then_some(ConstraintKind::Surface)
            })
            .or_else(|| {
                self.segment_collisions
                    .iter()
                    .any(|c| c.get_body() == body)
                    .then_some(ConstraintKind::SegmentCollision)
            })
    }

    /// Gets a reference to a rigid body by its handle
    pub fn get_body(&self, handle: BodyHandle) -> Result<&RigidBody> {
        self.bodies.try_get(handle)
    }

    /// Gets a mutable reference to a rigid body by its handle
    pub fn get_body_mut(&mut self, handle: BodyHandle) -> Result<&mut RigidBody> {
        self.bodies.try_get_mut(handle)
    }

    /// Returns a body, panicking on a stale handle
    pub fn body(&self, handle: BodyHandle) -> &RigidBody {
        &self.bodies[handle]
    }

    /// Returns a body mutably, panicking on a stale handle
    pub fn body_mut(&mut self, handle: BodyHandle) -> &mut RigidBody {
        &mut self.bodies[handle]
    }

    /// Gets the transform of a rigid body
    pub fn get_transform(&self, handle: BodyHandle) -> Result<Transform2> {
        Ok(self.bodies.try_get(handle)?.get_transform())
    }

    /// Returns the body arena
    pub fn bodies(&self) -> &Arena<RigidBody> {
        &self.bodies
    }

    /// Returns the body arena mutably; inserting or removing through it bypasses the event queue
    pub fn bodies_mut(&mut self) -> &mut Arena<RigidBody> {
        &mut self.bodies
    }

    /// Builds an anchor on particle `particle` of `body`
    pub fn particle_anchor(&self, body: BodyHandle, particle: usize) -> Result<Anchor> {
        let local = self
            .bodies
            .try_get(body)?
            .get_particles()
            .get(particle)
            .copied()
            .ok_or_else(|| {
                PhysicsError::InvalidParameter(format!("{:?} has no particle {}", body, particle))
            })?;
        Ok(Anchor::new(body, local))
    }

    fn check_body(&self, body: BodyHandle) -> Result<&RigidBody> {
        self.bodies.try_get(body)
    }

    fn check_particle(&self, body: BodyHandle, particle: usize) -> Result<()> {
        if particle < self.check_body(body)?.particle_count() {
            Ok(())
        } else {
            Err(PhysicsError::InvalidParameter(format!(
                "{:?} has no particle {}",
                body, particle
            )))
        }
    }

    fn insert<C: SolverConstraint>(&mut self, constraint: C) -> Handle<C> {
        self.events.push(SolverEvent::constraint(SolverEventType::ConstraintAdded, C::KIND));
        C::arena_mut(self).insert(constraint)
    }

    /// Creates a constraint keeping two anchors `distance` apart
    pub fn create_distance_constraint(
        &mut self,
        anchor_a: Anchor,
        anchor_b: Anchor,
        distance: Real,
        compliance: Real,
    ) -> Result<Handle<DistanceConstraint>> {
        self.check_body(anchor_a.body)?;
        self.check_body(anchor_b.body)?;
        Ok(self.insert(DistanceConstraint::new(anchor_a, anchor_b, distance, compliance)))
    }

    /// Creates a pin holding two anchors at the same point
    pub fn create_pin(&mut self, anchor_a: Anchor, anchor_b: Anchor, compliance: Real) -> Result<Handle<DistanceConstraint>> {
        self.check_body(anchor_a.body)?;
        self.check_body(anchor_b.body)?;
        Ok(self.insert(DistanceConstraint::pin(anchor_a, anchor_b, compliance)))
    }

    /// Creates a constraint holding the relative orientation of two bodies at `angle`
    pub fn create_angular_constraint(
        &mut self,
        body_a: BodyHandle,
        body_b: BodyHandle,
        angle: Real,
        compliance: Real,
    ) -> Result<Handle<AngularConstraint>> {
        self.check_body(body_a)?;
        self.check_body(body_b)?;
        Ok(self.insert(AngularConstraint::new(body_a, body_b, angle, compliance)))
    }

    /// Creates a limit keeping the relative orientation of two bodies inside a band
    pub fn create_angular_limit(
        &mut self,
        body_a: BodyHandle,
        body_b: BodyHandle,
        angle_min: Real,
        angle_max: Real,
        offset: Real,
        compliance: Real,
    ) -> Result<Handle<AngularLimit>> {
        self.check_body(body_a)?;
        self.check_body(body_b)?;
        Ok(self.insert(AngularLimit::new(body_a, body_b, angle_min, angle_max, offset, compliance)))
    }

    /// Creates a pin keeping particle `pinned_particle` of `pinned` on the segment body `segment`
    pub fn create_segment_pin(
        &mut self,
        segment: BodyHandle,
        pinned: BodyHandle,
        pinned_particle: usize,
        compliance: Real,
    ) -> Result<Handle<SegmentPin>> {
        self.check_particle(segment, 1)?;
        self.check_particle(pinned, pinned_particle)?;
        Ok(self.insert(SegmentPin::new(segment, pinned, pinned_particle, compliance)))
    }

    /// Creates a drag constraint pulling the local point `local` of `body` toward `target`.
    ///
    /// Later targets are eased in over `sub_steps` solves.
    pub fn create_drag_constraint(
        &mut self,
        body: BodyHandle,
        local: Vector2,
        target: Vector2,
        compliance: Real,
    ) -> Result<Handle<DragConstraint>> {
        self.check_body(body)?;
        let steps = self.config.sub_steps;
        Ok(self.insert(DragConstraint::new(Anchor::new(body, local), target, steps, compliance)))
    }

    /// Creates a non-penetration constraint between two particle proxies
    pub fn create_non_penetration(
        &mut self,
        body_a: BodyHandle,
        particle_a: usize,
        radius_a: Real,
        body_b: BodyHandle,
        particle_b: usize,
        radius_b: Real,
    ) -> Result<Handle<NonPenetration>> {
        self.check_particle(body_a, particle_a)?;
        self.check_particle(body_b, particle_b)?;
        Ok(self.insert(NonPenetration::new(body_a, particle_a, radius_a, body_b, particle_b, radius_b)))
    }

    /// Creates a constraint keeping `body` out of a fixed circle
    pub fn create_static_non_penetration(
        &mut self,
        position: Vector2,
        radius: Real,
        body: BodyHandle,
        body_radius: Real,
    ) -> Result<Handle<StaticNonPenetration>> {
        self.check_body(body)?;
        Ok(self.insert(StaticNonPenetration::new(position, radius, body, body_radius)))
    }

    /// Creates a surface constraint for `body` against the half-plane at `origin` facing `normal`
    pub fn create_surface(
        &mut self,
        body: BodyHandle,
        origin: Vector2,
        normal: Vector2,
        half_thickness: Real,
        compliance: Real,
    ) -> Result<Handle<SurfaceConstraint>> {
        self.check_body(body)?;
        if normal.try_normalize().is_none() {
            return Err(PhysicsError::InvalidParameter(
                "surface normal must not be zero".to_string(),
            ));
        }
        Ok(self.insert(SurfaceConstraint::new(body, origin, normal, half_thickness, compliance)))
    }

    /// Creates a constraint keeping `body` at least `radius` away from the fixed segment `start`-`end`
    pub fn create_segment_collision(
        &mut self,
        body: BodyHandle,
        start: Vector2,
        end: Vector2,
        radius: Real,
        compliance: Real,
    ) -> Result<Handle<SegmentCollision>> {
        self.check_body(body)?;
        Ok(self.insert(SegmentCollision::new(body, start, end, radius, compliance)))
    }

    /// Erases a constraint; every other handle stays valid
    pub fn remove<C: SolverConstraint>(&mut self, handle: Handle<C>) -> Option<C> {
        let removed = C::arena_mut(self).remove(handle);
        if removed.is_some() {
            self.events.push(SolverEvent::constraint(SolverEventType::ConstraintRemoved, C::KIND));
        }
        removed
    }

    /// Gets a constraint by its handle
    pub fn get_constraint<C: SolverConstraint>(&self, handle: Handle<C>) -> Result<&C> {
        C::arena(self).try_get(handle)
    }

    /// Gets a mutable reference to a constraint by its handle
    pub fn get_constraint_mut<C: SolverConstraint>(&mut self, handle: Handle<C>) -> Result<&mut C> {
        C::arena_mut(self).try_get_mut(handle)
    }

    /// Returns a constraint, panicking on a stale handle
    pub fn constraint<C: SolverConstraint>(&self, handle: Handle<C>) -> &C {
        &C::arena(self)[handle]
    }

    /// Returns a constraint mutably, panicking on a stale handle
    pub fn constraint_mut<C: SolverConstraint>(&mut self, handle: Handle<C>) -> &mut C {
        &mut C::arena_mut(self)[handle]
    }

    /// Returns the arena of constraints of type `C`
    pub fn constraints<C: SolverConstraint>(&self) -> &Arena<C> {
        C::arena(self)
    }

    /// Returns the constraints of type `C` mutably, for bulk compliance edits
    pub fn constraints_mut<C: SolverConstraint>(&mut self) -> std::slice::IterMut<'_, C> {
        C::arena_mut(self).iter_mut()
    }

    /// Number of live constraints of a given kind
    pub fn constraint_count_of(&self, kind: ConstraintKind) -> usize {
        match kind {
            ConstraintKind::Drag => self.drag_constraints.len(),
            ConstraintKind::Distance => self.distance_constraints.len(),
            ConstraintKind::Angular => self.angular_constraints.len(),
            ConstraintKind::SegmentPin => self.segment_pins.len(),
            ConstraintKind::AngularLimit => self.angular_limits.len(),
            ConstraintKind::NonPenetration => self.non_penetrations.len(),
            ConstraintKind::StaticNonPenetration => self.static_non_penetrations.len(),
            ConstraintKind::Surface => self.surfaces.len(),
            ConstraintKind::SegmentCollision => self.segment_collisions.len(),
        }
    }

    /// Returns the number of bodies in the solver
    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    /// Returns the number of constraints of every kind in the solver
    pub fn constraint_count(&self) -> usize {
        ConstraintKind::ALL.iter().map(|&kind| self.constraint_count_of(kind)).sum()
    }

    /// Returns a reference to the event queue
    pub fn get_events(&self) -> &EventQueue {
        &self.events
    }

    /// Returns a mutable reference to the event queue
    pub fn get_events_mut(&mut self) -> &mut EventQueue {
        &mut self.events
    }

    /// Clears the solver of all bodies and constraints
    pub fn clear(&mut self) {
        self.bodies.clear();
        self.drag_constraints.clear();
        self.distance_constraints.clear();
        self.angular_constraints.clear();
        self.segment_pins.clear();
        self.angular_limits.clear();
        self.non_penetrations.clear();
        self.static_non_penetrations.clear();
        self.surfaces.clear();
        self.segment_collisions.clear();
        self.events.clear();
        self.time = 0.0;
    }
}

fn reset_all<C: Constraint>(constraints: &mut Arena<C>) {
    for constraint in constraints.iter_mut() {
        constraint.reset();
    }
}

fn sweep<C: Constraint>(constraints: &mut Arena<C>, bodies: &mut Arena<RigidBody>, dt: Real, reverse: bool) {
    if reverse {
        for constraint in constraints.iter_mut().rev() {
            constraint.solve(dt, bodies);
        }
    } else {
        for constraint in constraints.iter_mut() {
            constraint.solve(dt, bodies);
        }
    }
}
