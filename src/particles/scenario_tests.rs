use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::assert_float_eq;
use crate::models::Vector3;
use crate::particles::{
    circular_orbit_speed, generate_circle_position, generate_disc_position, orbit_velocity, seed_particles,
};
use crate::utils::{PhysicsError, ScenarioKind, SimulationConfig};

fn small_config() -> SimulationConfig {
    SimulationConfig {
        particle_count: 64,
        ..SimulationConfig::default()
    }
}

#[test]
fn test_seeding_is_deterministic() {
    let config = small_config();
    let first = seed_particles(&config).expect("Failed to seed particles");
    let second = seed_particles(&config).expect("Failed to seed particles");
    assert_eq!(first, second);

    let reseeded = seed_particles(&SimulationConfig { seed: config.seed + 1, ..config })
        .expect("Failed to seed particles");
    assert_ne!(first, reseeded);
}

#[test]
fn test_blackhole_is_last() {
    for scenario in [ScenarioKind::Galaxy, ScenarioKind::Random] {
        let config = SimulationConfig { scenario, ..small_config() };
        let particles = seed_particles(&config).expect("Failed to seed particles");

        assert_eq!(particles.len(), config.particle_count + 1);
        let blackhole = particles.last().expect("blackhole");
        assert_eq!(blackhole.mass(), config.blackhole_mass);
        assert_eq!(blackhole.position, Vector3::ZERO);
        assert_eq!(blackhole.velocity, Vector3::ZERO);
        assert!(!blackhole.is_anchor());
        assert!(particles[..config.particle_count]
            .iter()
            .all(|p| p.mass() == config.star_mass && !p.is_anchor()));
    }
}

#[test]
fn test_pinned_blackhole_is_anchor() {
    let config = SimulationConfig { pin_blackhole: true, ..small_config() };
    let particles = seed_particles(&config).expect("Failed to seed particles");
    assert!(particles.last().expect("blackhole").is_anchor());
}

#[test]
fn test_no_stars() {
    let config = SimulationConfig { particle_count: 0, ..small_config() };
    let particles = seed_particles(&config).expect("Failed to seed particles");
    assert_eq!(particles.len(), 1);
}

#[test]
fn test_invalid_star_mass() {
    let config = SimulationConfig { star_mass: 0.0, ..small_config() };
    assert_eq!(seed_particles(&config), Err(PhysicsError::InvalidMass));
}

#[test]
fn test_galaxy_stars_orbit_the_blackhole() {
    let config = small_config();
    let particles = seed_particles(&config).expect("Failed to seed particles");

    for star in &particles[..config.particle_count] {
        let distance = star.position.magnitude();
        if distance == 0.0 {
            continue;
        }
        // Tangential: velocity is perpendicular to the radius.
        assert!(star.position.dot(star.velocity).abs() < 1e-9 * distance * star.velocity.magnitude().max(1.0));
        let expected = (config.gravity_constant * config.blackhole_mass / distance).sqrt();
        assert_float_eq(star.velocity.magnitude(), expected, 1e-9 * expected.max(1.0), None);
        assert_eq!(star.position.z, 0.0);
    }
}

#[test]
fn test_galaxy_stars_cluster_near_center() {
    let config = SimulationConfig { particle_count: 500, ..small_config() };
    let radius = config.galaxy_radius();
    let particles = seed_particles(&config).expect("Failed to seed particles");

    assert!(particles.iter().all(|p| p.position.x.abs() <= radius && p.position.y.abs() <= radius));
    let mean_distance: f64 =
        particles.iter().map(|p| p.position.magnitude()).sum::<f64>() / particles.len() as f64;
    // A Gaussian with sd radius / 5 puts the mean distance near 0.25 * radius.
    assert!(mean_distance < 0.4 * radius, "mean distance {} too wide", mean_distance);
}

#[test]
fn test_random_scenario_velocities_are_bounded() {
    let config = SimulationConfig {
        scenario: ScenarioKind::Random,
        simulation_scale: 2.0,
        ..small_config()
    };
    let radius = config.galaxy_radius();
    let particles = seed_particles(&config).expect("Failed to seed particles");

    for star in &particles[..config.particle_count] {
        assert!(star.position.magnitude() <= radius + 1e-9);
        assert!(star.velocity.x.abs() <= 2.0 && star.velocity.y.abs() <= 2.0);
        assert_eq!(star.velocity.z, 0.0);
    }
}

#[test]
fn test_circle_position_with_degenerate_radius() {
    let mut rng = StdRng::seed_from_u64(1);
    let center = Vector3::planar(3.0, -2.0);
    assert_eq!(generate_circle_position(&mut rng, center, 0.0), center);
    assert_eq!(generate_circle_position(&mut rng, center, -5.0), center);
    assert_eq!(generate_circle_position(&mut rng, center, f64::NAN), center);
}

#[test]
fn test_disc_position_stays_in_disc() {
    let mut rng = StdRng::seed_from_u64(2);
    let center = Vector3::planar(10.0, 10.0);
    for _ in 0..200 {
        let point = generate_disc_position(&mut rng, center, 4.0);
        assert!(point.distance(center) <= 4.0 + 1e-12);
    }
}

#[test]
fn test_orbit_velocity() {
    assert_eq!(orbit_velocity(Vector3::ZERO, 1.0, 100.0), Vector3::ZERO);

    let velocity = orbit_velocity(Vector3::planar(4.0, 0.0), 1.0, 100.0);
    assert_float_eq(velocity.magnitude(), 5.0, 1e-12, None);
    assert_float_eq(velocity.x, 0.0, 1e-12, None);

    assert_float_eq(circular_orbit_speed(2.0, 50.0, 25.0), 2.0, 1e-12, None);
}
