//! Newtonian point-mass gravity and the exact O(n²) force pass.
use crate::models::Vector3;
use crate::particles::Particle;

/// Gravitational force exerted on body 1 by body 2.
///
/// The separation is floored at `dampening` so that converging bodies cannot produce an
/// unbounded force. Bodies at exactly the same position have no defined direction and exert no
/// force on each other.
///
/// # Arguments
///
/// * `g` - The gravitational constant.
/// * `dampening` - The minimum separation used in the inverse-square law.
/// * `mass1`, `position1` - The body the force acts on.
/// * `mass2`, `position2` - The attracting body.
///
/// # Examples
///
/// ```
/// use nbody_sim::models::Vector3;
/// use nbody_sim::particles::gravitational_force;
///
/// let force = gravitational_force(1.0, 0.0, 1.0, Vector3::ZERO, 4.0, Vector3::planar(2.0, 0.0));
/// // Attraction points from body 1 towards body 2 with magnitude G m1 m2 / d².
/// assert!((force.x - 1.0).abs() < 1e-12);
/// assert_eq!(force.y, 0.0);
/// ```
pub fn gravitational_force(
    g: f64,
    dampening: f64,
    mass1: f64,
    position1: Vector3,
    mass2: f64,
    position2: Vector3,
) -> Vector3 {
    let direction = position1 - position2;
    let separation = direction.magnitude();
    if separation == 0.0 {
        return Vector3::ZERO;
    }
    let distance = separation.max(dampening);
    let force_scalar = -g * (mass1 * mass2) / (distance * distance);
    direction.normalize() * force_scalar
}

/// Net force on `particles[index]` from every other particle in the slice.
pub fn naive_force(particles: &[Particle], index: usize, g: f64, dampening: f64) -> Vector3 {
    let target = &particles[index];
    particles
        .iter()
        .enumerate()
        .filter(|(j, _)| *j != index)
        .map(|(_, other)| {
            gravitational_force(
                g,
                dampening,
                target.mass(),
                target.position,
                other.mass(),
                other.position,
            )
        })
        .sum()
}

/// Net force on every particle by exact pairwise summation.
///
/// # Examples
///
/// ```
/// use nbody_sim::models::Vector3;
/// use nbody_sim::particles::{compute_naive_forces, Particle};
///
/// let particles = vec![
///     Particle::new(1.0, Vector3::ZERO, Vector3::ZERO).unwrap(),
///     Particle::new(1.0, Vector3::planar(1.0, 0.0), Vector3::ZERO).unwrap(),
/// ];
/// let forces = compute_naive_forces(&particles, 1.0, 0.0);
///
/// // Equal and opposite.
/// assert!((forces[0].x + forces[1].x).abs() < 1e-12);
/// assert!(forces[0].x > 0.0);
/// ```
pub fn compute_naive_forces(particles: &[Particle], g: f64, dampening: f64) -> Vec<Vector3> {
    (0..particles.len())
        .map(|i| naive_force(particles, i, g, dampening))
        .collect()
}
