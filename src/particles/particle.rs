use crate::models::Vector3;
use crate::utils::PhysicsError;

/// What part a particle plays in the integration step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BodyRole {
    /// Moves under the net force like every other body.
    #[default]
    Free,
    /// Exerts gravity but is never moved by the integrator.
    Anchor,
}

/// A point mass with its own position and velocity.
///
/// Particles never reference each other; a step reads a whole slice of them and produces a fresh
/// slice of updated copies.
#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    mass: f64,
    pub position: Vector3,
    pub velocity: Vector3,
    pub role: BodyRole,
}

impl Particle {
    /// Creates a new free particle.
    ///
    /// # Errors
    ///
    /// Returns [`PhysicsError::InvalidMass`] if `mass` is not a positive finite number.
    ///
    /// # Examples
    ///
    /// ```
    /// use nbody_sim::models::Vector3;
    /// use nbody_sim::particles::Particle;
    /// use nbody_sim::utils::PhysicsError;
    ///
    /// let particle = Particle::new(2.0, Vector3::planar(1.0, 1.0), Vector3::ZERO)
    ///     .expect("Failed to create particle");
    /// assert_eq!(particle.mass(), 2.0);
    ///
    /// let invalid = Particle::new(0.0, Vector3::ZERO, Vector3::ZERO);
    /// assert_eq!(invalid, Err(PhysicsError::InvalidMass));
    /// ```
    pub fn new(mass: f64, position: Vector3, velocity: Vector3) -> Result<Self, PhysicsError> {
        if !(mass.is_finite() && mass > 0.0) {
            return Err(PhysicsError::InvalidMass);
        }
        Ok(Particle {
            mass,
            position,
            velocity,
            role: BodyRole::Free,
        })
    }

    /// Creates a particle that is never moved by [`Particle::integrate`].
    pub fn anchored(mass: f64, position: Vector3) -> Result<Self, PhysicsError> {
        let mut particle = Particle::new(mass, position, Vector3::ZERO)?;
        particle.role = BodyRole::Anchor;
        Ok(particle)
    }

    pub fn mass(&self) -> f64 {
        self.mass
    }

    pub fn is_anchor(&self) -> bool {
        self.role == BodyRole::Anchor
    }

    pub fn momentum(&self) -> Vector3 {
        self.velocity * self.mass
    }

    pub fn kinetic_energy(&self) -> f64 {
        0.5 * self.mass * self.velocity.magnitude_squared()
    }

    /// Applies `force` for one unit time step and returns the updated copy.
    ///
    /// Semi-implicit Euler: the velocity is advanced first and the position is advanced with the
    /// new velocity. Anchored particles are returned unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`PhysicsError::NonFiniteState`] if the new position or velocity is NaN or
    /// infinite.
    ///
    /// # Examples
    ///
    /// ```
    /// use nbody_sim::models::Vector3;
    /// use nbody_sim::particles::Particle;
    ///
    /// let particle = Particle::new(2.0, Vector3::ZERO, Vector3::planar(1.0, 0.0)).unwrap();
    /// let next = particle.integrate(Vector3::planar(0.0, 4.0)).unwrap();
    ///
    /// assert_eq!(next.velocity, Vector3::planar(1.0, 2.0));
    /// assert_eq!(next.position, Vector3::planar(1.0, 2.0));
    /// // The source particle is untouched.
    /// assert_eq!(particle.position, Vector3::ZERO);
    /// ```
    pub fn integrate(&self, force: Vector3) -> Result<Particle, PhysicsError> {
        if self.is_anchor() {
            return Ok(self.clone());
        }
        let acceleration = force / self.mass;
        let velocity = self.velocity + acceleration;
        let position = self.position + velocity;
        if !(velocity.is_finite() && position.is_finite()) {
            return Err(PhysicsError::NonFiniteState);
        }
        Ok(Particle {
            velocity,
            position,
            ..self.clone()
        })
    }
}
