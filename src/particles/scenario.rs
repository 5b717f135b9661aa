//! Initial particle layouts.
//!
//! Both layouts place `particle_count` stars around the origin and finish with a single
//! blackhole at the origin, so the blackhole is always the last particle.
use std::f64::consts::PI;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::models::Vector3;
use crate::particles::Particle;
use crate::utils::{PhysicsError, ScenarioKind, SimulationConfig};

/// Draws a point from a square of half-side `radius` around `center`, accepting it with a
/// Gaussian probability of its distance to the center (standard deviation `radius / 5`).
///
/// The result clusters around the center like a galaxy core.
pub fn generate_circle_position<R: Rng + ?Sized>(rng: &mut R, center: Vector3, radius: f64) -> Vector3 {
    if radius.is_nan() || radius <= 0.0 {
        return center;
    }
    let standard_deviation = radius / 5.0;
    loop {
        let x = rng.random::<f64>() * (2.0 * radius) + (center.x - radius);
        let y = rng.random::<f64>() * (2.0 * radius) + (center.y - radius);

        let distance = ((x - center.x).powi(2) + (y - center.y).powi(2)).sqrt();
        let probability_density =
            (-(distance * distance) / (2.0 * standard_deviation * standard_deviation)).exp();

        if rng.random::<f64>() < probability_density {
            return Vector3::planar(x, y);
        }
    }
}

/// Draws a point uniformly from the disc of `radius` around `center`.
pub fn generate_disc_position<R: Rng + ?Sized>(rng: &mut R, center: Vector3, radius: f64) -> Vector3 {
    let r = radius * rng.random::<f64>().sqrt();
    let angle = 2.0 * PI * rng.random::<f64>();
    center.translate(r * angle.cos(), r * angle.sin(), 0.0)
}

/// Speed of a circular orbit at `distance` from a body of `central_mass`.
pub fn circular_orbit_speed(gravity_constant: f64, central_mass: f64, distance: f64) -> f64 {
    ((gravity_constant * central_mass) / distance).max(0.0).sqrt()
}

/// Velocity of a circular orbit around the origin, tangent to `position` in the `xy` plane.
///
/// A body sitting on the origin has no defined orbit and gets zero velocity.
pub fn orbit_velocity(position: Vector3, gravity_constant: f64, central_mass: f64) -> Vector3 {
    let distance = position.magnitude();
    if distance == 0.0 {
        return Vector3::ZERO;
    }
    position.cross(Vector3::UNIT_Z).normalize()
        * circular_orbit_speed(gravity_constant, central_mass, distance)
}

/// Seeds the particle set described by `config`. The same seed always yields the same particles.
///
/// # Errors
///
/// Returns [`PhysicsError::InvalidMass`] if the star or blackhole mass is not positive.
///
/// # Examples
///
/// ```
/// use nbody_sim::particles::seed_particles;
/// use nbody_sim::utils::SimulationConfig;
///
/// let config = SimulationConfig { particle_count: 25, ..Default::default() };
/// let particles = seed_particles(&config).unwrap();
///
/// assert_eq!(particles.len(), 26);
/// assert_eq!(particles[25].mass(), config.blackhole_mass);
/// assert_eq!(particles, seed_particles(&config).unwrap());
/// ```
pub fn seed_particles(config: &SimulationConfig) -> Result<Vec<Particle>, PhysicsError> {
    let mut rng = StdRng::seed_from_u64(config.seed);
    let radius = config.galaxy_radius();
    let mut particles = Vec::with_capacity(config.particle_count + 1);

    for _ in 0..config.particle_count {
        let (position, velocity) = match config.scenario {
            ScenarioKind::Galaxy => {
                let position = generate_circle_position(&mut rng, Vector3::ZERO, radius);
                let velocity =
                    orbit_velocity(position, config.gravity_constant, config.blackhole_mass);
                (position, velocity)
            }
            ScenarioKind::Random => {
                let position = generate_disc_position(&mut rng, Vector3::ZERO, radius);
                let jitter = Vector3::random(&mut rng);
                let velocity = Vector3::planar(jitter.x, jitter.y) * config.simulation_scale;
                (position, velocity)
            }
        };
        particles.push(Particle::new(config.star_mass, position, velocity)?);
    }

    let blackhole = if config.pin_blackhole {
        Particle::anchored(config.blackhole_mass, Vector3::ZERO)?
    } else {
        Particle::new(config.blackhole_mass, Vector3::ZERO, Vector3::ZERO)?
    };
    particles.push(blackhole);

    Ok(particles)
}
