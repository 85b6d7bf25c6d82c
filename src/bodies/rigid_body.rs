use crate::bodies::body_flags::BodyFlags;
use crate::core::BodyHandle;
use crate::error::PhysicsError;
use crate::math::{Real, Transform2, Vector2, EPSILON};
use crate::Result;

/// Type alias for a handle to a rigid body
pub type RigidBodyHandle = BodyHandle;

/// A rigid body built from point particles.
///
/// Consecutive particles are joined by uniform-density rods, so a body with two
/// particles is a rigid segment. Particle offsets are expressed in the body's
/// local frame and are recentred about the centroid by [`RigidBody::compute_properties`].
#[derive(Debug, Clone)]
pub struct RigidBody {
    /// Local-frame particle offsets
    particles: Vec<Vector2>,

    /// World position of the centroid
    position: Vector2,

    /// Orientation in radians
    angle: Real,

    /// Position at the start of the current sub-step
    last_position: Vector2,

    /// Angle at the start of the current sub-step
    last_angle: Real,

    linear_velocity: Vector2,
    angular_velocity: Real,

    mass: Real,
    inv_mass: Real,
    inertia: Real,
    inv_inertia: Real,

    /// Mass per unit of rod length
    density: Real,

    flags: BodyFlags,

    /// Force integrated by the next `predict`
    force: Vector2,

    /// Torque integrated by every `predict`
    torque: Real,
}

impl Default for RigidBody {
    fn default() -> Self {
        Self::new()
    }
}

impl RigidBody {
    /// Creates an empty moving body at the origin; add particles then call `compute_properties`
    pub fn new() -> Self {
        Self {
            particles: Vec::new(),
            position: Vector2::zero(),
            angle: 0.0,
            last_position: Vector2::zero(),
            last_angle: 0.0,
            linear_velocity: Vector2::zero(),
            angular_velocity: 0.0,
            mass: 0.0,
            inv_mass: 0.0,
            inertia: 0.0,
            inv_inertia: 0.0,
            density: 1.0,
            flags: BodyFlags::MOVING | BodyFlags::AFFECTED_BY_GRAVITY,
            force: Vector2::zero(),
            torque: 0.0,
        }
    }

    /// Creates a body from local particle offsets and computes its mass properties
    pub fn from_particles(particles: Vec<Vector2>, density: Real) -> Result<Self> {
        let mut body = Self::new();
        body.particles = particles;
        body.density = density;
        body.compute_properties()?;
        Ok(body)
    }

    /// Creates a rigid segment of the given length centred on its position, along the local x axis
    pub fn segment(length: Real, density: Real) -> Result<Self> {
        Self::from_particles(
            vec![Vector2::new(0.0, 0.0), Vector2::new(length, 0.0)],
            density,
        )
    }

    /// Returns the local particle offsets
    pub fn get_particles(&self) -> &[Vector2] {
        &self.particles
    }

    /// Returns the number of particles
    pub fn particle_count(&self) -> usize {
        self.particles.len()
    }

    /// Appends a local particle offset; `compute_properties` must run again afterwards
    pub fn add_particle(&mut self, particle: Vector2) {
        self.particles.push(particle);
    }

    /// Replaces all particle offsets; `compute_properties` must run again afterwards
    ///
    /// # Panics
    ///
    /// Dropping particles that a constraint still indexes makes the next
    /// `Solver::update` panic when that constraint resolves them.
    pub fn set_particles(&mut self, particles: Vec<Vector2>) {
        self.particles = particles;
    }

    /// Derives mass, centroid and rotational inertia from the particle polyline.
    ///
    /// Each consecutive pair of particles is a rod of mass `density * length`. The
    /// inertia of a rod about its own midpoint is `m L^2 / 12`, moved to the body
    /// centroid with the parallel-axis theorem. A lone particle is a point mass of
    /// `density` with no rotational inertia.
    ///
    /// Particle offsets are shifted so the centroid sits at the local origin; the
    /// world position of the body is left unchanged. For a fixed body the inverse
    /// mass and inertia stay at zero.
    pub fn compute_properties(&mut self) -> Result<()> {
        if self.particles.is_empty() {
            return Err(PhysicsError::InvalidParameter(
                "cannot compute properties of a body without particles".to_string(),
            ));
        }

        if !(self.density > 0.0) {
            return Err(PhysicsError::InvalidParameter(format!(
                "density must be positive, got {}",
                self.density
            )));
        }

        let (mass, centroid) = if self.particles.len() == 1 {
            (self.density, self.particles[0])
        } else {
            let mut mass = 0.0;
            let mut weighted = Vector2::zero();
            for pair in self.particles.windows(2) {
                let length = pair[0].distance(&pair[1]);
                let rod_mass = self.density * length;
                mass += rod_mass;
                weighted += (pair[0] + pair[1]) * (0.5 * rod_mass);
            }

            if mass < EPSILON {
                return Err(PhysicsError::InvalidParameter(
                    "body particles are coincident, total length is zero".to_string(),
                ));
            }

            (mass, weighted / mass)
        };

        let mut inertia = 0.0;
        for pair in self.particles.windows(2) {
            let length = pair[0].distance(&pair[1]);
            let rod_mass = self.density * length;
            let midpoint = (pair[0] + pair[1]) * 0.5;
            inertia += rod_mass * length * length / 12.0 + rod_mass * midpoint.distance_squared(&centroid);
        }

        for particle in &mut self.particles {
            *particle -= centroid;
        }

        self.mass = mass;
        self.inertia = inertia;
        self.update_inverses();
        Ok(())
    }

    fn update_inverses(&mut self) {
        if self.is_moving() {
            self.inv_mass = if self.mass > EPSILON { 1.0 / self.mass } else { 0.0 };
            self.inv_inertia = if self.inertia > EPSILON { 1.0 / self.inertia } else { 0.0 };
        } else {
            self.inv_mass = 0.0;
            self.inv_inertia = 0.0;
        }
    }

    /// Returns the body's transform
    pub fn get_transform(&self) -> Transform2 {
        Transform2::new(self.position, self.angle)
    }

    /// Returns the body's position
    pub fn get_position(&self) -> Vector2 {
        self.position
    }

    /// Sets the body's position; the move is seen as velocity by the next sub-step
    pub fn set_position(&mut self, position: Vector2) {
        self.position = position;
    }

    /// Teleports the body and primes the previous-position cache so it starts at rest
    pub fn set_position_instant(&mut self, position: Vector2) {
        self.position = position;
        self.last_position = position;
        self.linear_velocity = Vector2::zero();
    }

    /// Returns the body's orientation in radians
    pub fn get_angle(&self) -> Real {
        self.angle
    }

    /// Sets the body's orientation
    pub fn set_angle(&mut self, angle: Real) {
        self.angle = angle;
    }

    /// Sets the orientation and primes the previous-angle cache so the body does not spin
    pub fn set_angle_instant(&mut self, angle: Real) {
        self.angle = angle;
        self.last_angle = angle;
        self.angular_velocity = 0.0;
    }

    /// Returns the body's linear velocity
    pub fn get_linear_velocity(&self) -> Vector2 {
        self.linear_velocity
    }

    /// Sets the body's linear velocity
    pub fn set_linear_velocity(&mut self, velocity: Vector2) {
        self.linear_velocity = velocity;
    }

    /// Returns the body's angular velocity
    pub fn get_angular_velocity(&self) -> Real {
        self.angular_velocity
    }

    /// Sets the body's angular velocity
    pub fn set_angular_velocity(&mut self, velocity: Real) {
        self.angular_velocity = velocity;
    }

    /// Returns the body's mass
    pub fn get_mass(&self) -> Real {
        self.mass
    }

    /// Returns the body's inverse mass
    pub fn get_inverse_mass(&self) -> Real {
        self.inv_mass
    }

    /// Overrides the inverse mass (0 pins the body in translation)
    pub fn set_inverse_mass(&mut self, inv_mass: Real) {
        self.inv_mass = inv_mass.max(0.0);
    }

    /// Returns the rotational inertia about the centroid
    pub fn get_inertia(&self) -> Real {
        self.inertia
    }

    /// Returns the inverse rotational inertia
    pub fn get_inverse_inertia(&self) -> Real {
        self.inv_inertia
    }

    /// Overrides the inverse rotational inertia (0 pins the body in rotation)
    pub fn set_inverse_inertia(&mut self, inv_inertia: Real) {
        self.inv_inertia = inv_inertia.max(0.0);
    }

    /// Returns the density used by `compute_properties`
    pub fn get_density(&self) -> Real {
        self.density
    }

    /// Sets the density; `compute_properties` must run again afterwards
    pub fn set_density(&mut self, density: Real) {
        self.density = density;
    }

    /// Returns the body's flags
    pub fn get_flags(&self) -> BodyFlags {
        self.flags
    }

    /// Returns whether the body is integrated by the solver
    pub fn is_moving(&self) -> bool {
        self.flags.contains(BodyFlags::MOVING)
    }

    /// Sets whether the body is integrated; inverse mass and inertia are left untouched
    pub fn set_moving(&mut self, moving: bool) {
        self.flags.set(BodyFlags::MOVING, moving);
    }

    /// Turns the body into an immovable anchor: not integrated, zero inverse mass and inertia
    pub fn set_fixed(&mut self) {
        self.flags.remove(BodyFlags::MOVING);
        self.inv_mass = 0.0;
        self.inv_inertia = 0.0;
        self.linear_velocity = Vector2::zero();
        self.angular_velocity = 0.0;
    }

    /// Returns whether the body is a fixed anchor (zero inverse mass and inertia)
    pub fn is_fixed(&self) -> bool {
        self.inv_mass == 0.0 && self.inv_inertia == 0.0
    }

    /// Returns whether the body is affected by gravity
    pub fn is_affected_by_gravity(&self) -> bool {
        self.flags.contains(BodyFlags::AFFECTED_BY_GRAVITY)
    }

    /// Sets whether the body is affected by gravity
    pub fn set_affected_by_gravity(&mut self, affected: bool) {
        self.flags.set(BodyFlags::AFFECTED_BY_GRAVITY, affected);
    }

    /// Returns the force integrated by the next sub-step
    pub fn get_force(&self) -> Vector2 {
        self.force
    }

    /// Replaces the force integrated by the next sub-step
    pub fn set_force(&mut self, force: Vector2) {
        self.force = force;
    }

    /// Returns the torque integrated by every sub-step
    pub fn get_torque(&self) -> Real {
        self.torque
    }

    /// Sets the torque integrated by every sub-step
    pub fn set_torque(&mut self, torque: Real) {
        self.torque = torque;
    }

    /// Predictor step: advances the body with its velocity and accumulated force
    pub fn predict(&mut self, dt: Real) {
        if !self.is_moving() {
            return;
        }

        self.last_position = self.position;
        self.position += self.linear_velocity * dt + self.force * (self.inv_mass * dt * dt);

        self.last_angle = self.angle;
        self.angle += self.angular_velocity * dt + self.torque * self.inv_inertia * dt * dt;
    }

    /// Derives velocities from the motion of the last sub-step, damped by `friction`
    pub fn derive_velocity(&mut self, dt: Real, friction: Real) {
        let damping = 1.0 - friction;
        self.linear_velocity = (self.position - self.last_position) * (damping / dt);
        self.angular_velocity = (self.angle - self.last_angle) * damping / dt;
    }

    /// Transforms a local-frame point to world space
    #[inline]
    pub fn world_point(&self, local: Vector2) -> Vector2 {
        self.position + local.rotate(self.angle)
    }

    /// World position of particle `index`
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of range.
    #[inline]
    pub fn world_particle(&self, index: usize) -> Vector2 {
        self.world_point(self.particles[index])
    }

    /// Effective inverse mass seen by a constraint acting along `normal` at offset `r` from the centroid
    #[inline]
    pub fn generalized_inverse_mass(&self, r: Vector2, normal: Vector2) -> Real {
        let rn = r.cross(&normal);
        self.inv_mass + self.inv_inertia * rn * rn
    }

    /// Applies a positional correction `p` at offset `r` from the centroid
    #[inline]
    pub fn apply_position_correction(&mut self, p: Vector2, r: Vector2) {
        self.position += p * self.inv_mass;
        self.angle += self.inv_inertia * r.cross(&p);
    }

    /// Applies a purely rotational correction
    #[inline]
    pub fn apply_rotation_correction(&mut self, delta_lambda: Real) {
        self.angle += self.inv_inertia * delta_lambda;
    }
}
