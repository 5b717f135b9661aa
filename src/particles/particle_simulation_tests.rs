use approx::assert_relative_eq;

use crate::models::{Rectangle, Vector3};
use crate::particles::{compute_naive_forces, BarnesHutTree, Particle, Simulation};
use crate::utils::{ForceMethod, PhysicsError, SimulationConfig};

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn particle_at(mass: f64, x: f64, y: f64) -> Particle {
    Particle::new(mass, Vector3::planar(x, y), Vector3::ZERO).expect("Failed to create particle")
}

fn small_config(force_method: ForceMethod) -> SimulationConfig {
    SimulationConfig {
        particle_count: 40,
        force_method,
        ..SimulationConfig::default()
    }
}

fn cluster() -> Vec<Particle> {
    vec![
        particle_at(1.0, -20.0, 5.0),
        particle_at(2.0, 15.0, -10.0),
        particle_at(3.0, 0.0, 30.0),
        particle_at(0.5, 40.0, 40.0),
        Particle::new(1.5, Vector3::planar(-35.0, -25.0), Vector3::planar(0.5, -0.5))
            .expect("Failed to create particle"),
    ]
}

#[test]
fn test_new_simulation() {
    init_logger();
    let config = small_config(ForceMethod::BarnesHut);
    let sim = Simulation::new(config).expect("Failed to create simulation");

    assert_eq!(sim.particles().len(), config.particle_count + 1);
    assert_eq!(sim.steps(), 0);
    assert_eq!(sim.config(), &config);
    assert_eq!(sim.last_step().node_count, 0);
}

#[test]
fn test_new_rejects_invalid_config() {
    let config = SimulationConfig { theta: -1.0, ..SimulationConfig::default() };
    assert_eq!(Simulation::new(config).err(), Some(PhysicsError::InvalidTheta));

    let config = SimulationConfig { blackhole_mass: 0.0, ..SimulationConfig::default() };
    assert!(Simulation::with_particles(config, cluster()).is_err());
}

#[test]
fn test_naive_step_matches_manual_integration() {
    let config = SimulationConfig { force_method: ForceMethod::Naive, dampening: 1.0, ..SimulationConfig::default() };
    let particles = cluster();
    let mut sim = Simulation::with_particles(config, particles.clone()).expect("Failed to create simulation");

    let forces = compute_naive_forces(&particles, config.gravity_constant, config.dampening);
    let expected: Vec<Particle> = particles
        .iter()
        .zip(forces)
        .map(|(p, f)| p.integrate(f).expect("Failed to integrate"))
        .collect();

    sim.step().expect("Step failed");
    assert_eq!(sim.particles(), expected.as_slice());
    assert_eq!(sim.steps(), 1);

    let n = particles.len();
    assert_eq!(sim.last_step().interactions.direct, n * (n - 1));
    assert_eq!(sim.last_step().node_count, 0);
}

#[test]
fn test_barnes_hut_step_uses_start_of_step_positions() {
    init_logger();
    let config = SimulationConfig { dampening: 1.0, ..SimulationConfig::default() };
    let particles = cluster();
    let mut sim = Simulation::with_particles(config, particles.clone()).expect("Failed to create simulation");

    let bounds = sim.tree_bounds().expect("bounds around the particles");
    let tree = BarnesHutTree::build(bounds, &particles);
    let expected: Vec<Particle> = particles
        .iter()
        .map(|p| {
            let force = tree.compute_force(p, config.theta, config.gravity_constant, config.dampening);
            p.integrate(force).expect("Failed to integrate")
        })
        .collect();

    sim.step().expect("Step failed");
    assert_eq!(sim.particles(), expected.as_slice());
    assert_eq!(sim.last_step().node_count, tree.node_count());
    assert_eq!(sim.last_step().dropped, 0);
}

#[test]
fn test_symmetric_pair_stays_symmetric() {
    let particles = vec![particle_at(1.0, -10.0, 0.0), particle_at(1.0, 10.0, 0.0)];
    for force_method in [ForceMethod::Naive, ForceMethod::BarnesHut] {
        let config = SimulationConfig { force_method, dampening: 0.0, ..SimulationConfig::default() };
        let mut sim = Simulation::with_particles(config, particles.clone()).expect("Failed to create simulation");
        sim.simulate(3).expect("Simulation failed");

        let (left, right) = (&sim.particles()[0], &sim.particles()[1]);
        assert_relative_eq!(left.position, -right.position, epsilon = 1e-12);
        assert_relative_eq!(left.velocity, -right.velocity, epsilon = 1e-12);
        assert!(left.position.x > -10.0);
    }
}

#[test]
fn test_barnes_hut_with_zero_theta_matches_naive() {
    let naive_config = small_config(ForceMethod::Naive);
    let tree_config = SimulationConfig { theta: 0.0, ..small_config(ForceMethod::BarnesHut) };

    let mut naive = Simulation::new(naive_config).expect("Failed to create simulation");
    let mut tree = Simulation::new(tree_config).expect("Failed to create simulation");
    assert_eq!(naive.particles(), tree.particles());

    naive.step().expect("Step failed");
    tree.step().expect("Step failed");

    for (a, b) in naive.particles().iter().zip(tree.particles()) {
        assert_relative_eq!(a.position, b.position, epsilon = 1e-9, max_relative = 1e-9);
        assert_relative_eq!(a.velocity, b.velocity, epsilon = 1e-9, max_relative = 1e-9);
    }
}

#[test]
fn test_naive_method_conserves_momentum() {
    let config = small_config(ForceMethod::Naive);
    let mut sim = Simulation::new(config).expect("Failed to create simulation");
    let before = sim.momentum();

    sim.simulate(5).expect("Simulation failed");
    assert_relative_eq!(sim.momentum(), before, epsilon = 1e-8);
    assert_relative_eq!(sim.total_mass(), config.particle_count as f64 * config.star_mass + config.blackhole_mass);
}

#[test]
fn test_pinned_blackhole_stays_put() {
    let config = SimulationConfig { pin_blackhole: true, ..small_config(ForceMethod::BarnesHut) };
    let mut sim = Simulation::new(config).expect("Failed to create simulation");
    sim.simulate(5).expect("Simulation failed");

    let blackhole = sim.particles().last().expect("blackhole");
    assert!(blackhole.is_anchor());
    assert_eq!(blackhole.position, Vector3::ZERO);
    assert_eq!(blackhole.velocity, Vector3::ZERO);
}

#[test]
fn test_free_blackhole_moves() {
    let config = small_config(ForceMethod::BarnesHut);
    let mut sim = Simulation::new(config).expect("Failed to create simulation");
    sim.simulate(3).expect("Simulation failed");

    let blackhole = sim.particles().last().expect("blackhole");
    assert!(!blackhole.is_anchor());
    assert_ne!(blackhole.velocity, Vector3::ZERO);
}

#[test]
fn test_fixed_bounds_drop_outside_particles() {
    init_logger();
    let config = SimulationConfig {
        bounds: Some(Rectangle::centered(0.0, 0.0, 50.0)),
        dampening: 0.0,
        ..SimulationConfig::default()
    };
    let particles = vec![
        particle_at(1.0, -10.0, 0.0),
        particle_at(1.0, 10.0, 0.0),
        particle_at(1.0, 100.0, 0.0),
    ];
    let mut sim = Simulation::with_particles(config, particles).expect("Failed to create simulation");
    sim.step().expect("Step failed");

    assert_eq!(sim.last_step().dropped, 1);
    assert_eq!(sim.particles().len(), 3);
    // The outside particle is still pulled by the two inside.
    assert!(sim.particles()[2].velocity.x < 0.0);
}

#[test]
fn test_non_finite_step_leaves_state_unchanged() {
    let config = SimulationConfig {
        gravity_constant: f64::MAX,
        dampening: 0.0,
        force_method: ForceMethod::Naive,
        ..SimulationConfig::default()
    };
    let particles = vec![particle_at(10.0, 0.0, 0.0), particle_at(10.0, 1.0, 0.0)];
    let mut sim = Simulation::with_particles(config, particles.clone()).expect("Failed to create simulation");

    assert_eq!(sim.step(), Err(PhysicsError::NonFiniteState));
    assert_eq!(sim.particles(), particles.as_slice());
    assert_eq!(sim.steps(), 0);
}

#[test]
fn test_reconfigure() {
    let config = small_config(ForceMethod::BarnesHut);
    let mut sim = Simulation::new(config).expect("Failed to create simulation");
    sim.simulate(2).expect("Simulation failed");

    assert_eq!(sim.reconfigure(config), Ok(false));
    assert_eq!(sim.steps(), 2);

    let invalid = SimulationConfig { star_mass: -1.0, ..config };
    assert_eq!(sim.reconfigure(invalid), Err(PhysicsError::InvalidMass));
    assert_eq!(sim.config(), &config);
    assert_eq!(sim.steps(), 2);

    let bigger = SimulationConfig { particle_count: 80, ..config };
    assert_eq!(sim.reconfigure(bigger), Ok(true));
    assert_eq!(sim.steps(), 0);
    assert_eq!(sim.particles().len(), 81);
}

#[test]
fn test_reset_reseeds() {
    let config = small_config(ForceMethod::BarnesHut);
    let mut sim = Simulation::new(config).expect("Failed to create simulation");
    let seeded = sim.particles().to_vec();

    sim.simulate(2).expect("Simulation failed");
    assert_ne!(sim.particles(), seeded.as_slice());

    sim.reset().expect("Reset failed");
    assert_eq!(sim.particles(), seeded.as_slice());
    assert_eq!(sim.steps(), 0);
}

#[test]
fn test_tree_bounds_enclose_every_particle() {
    let sim = Simulation::with_particles(SimulationConfig::default(), cluster()).expect("Failed to create simulation");
    let bounds = sim.tree_bounds().expect("bounds around the particles");
    assert!(sim.particles().iter().all(|p| bounds.contains(p.position)));

    let tree = sim.tree().expect("tree");
    assert_eq!(tree.len(), sim.particles().len());
}

#[test]
fn test_empty_simulation() {
    let mut sim = Simulation::with_particles(SimulationConfig::default(), Vec::new())
        .expect("Failed to create simulation");

    assert!(sim.tree_bounds().is_none());
    assert!(sim.tree().is_none());
    assert!(sim.center_of_mass().is_none());
    assert_eq!(sim.kinetic_energy(), 0.0);

    sim.step().expect("Step failed");
    assert_eq!(sim.steps(), 1);
    assert!(sim.particles().is_empty());
}

#[test]
fn test_center_of_mass() {
    let particles = vec![particle_at(1.0, 0.0, 0.0), particle_at(3.0, 4.0, 8.0)];
    let sim = Simulation::with_particles(SimulationConfig::default(), particles).expect("Failed to create simulation");
    assert_eq!(sim.center_of_mass(), Some(Vector3::planar(3.0, 6.0)));
    assert_eq!(sim.total_mass(), 4.0);
}
