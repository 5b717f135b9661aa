//! Frame-by-frame driver for the gravity simulation.
//!
//! Each [`Simulation::step`] computes the net force on every particle from the positions at the
//! start of the step, then integrates every particle into a new collection that replaces the old
//! one. No particle sees another particle's updated state within the same step.
//!
//! With the `parallel` feature the force pass is spread over a Rayon thread pool. The pass only
//! reads the particle slice and the tree, so the results are the same as the sequential pass.
//!
//! # Example
//!
//! ```
//! use nbody_sim::particles::Simulation;
//! use nbody_sim::utils::{ForceMethod, SimulationConfig};
//!
//! let config = SimulationConfig {
//!     particle_count: 200,
//!     force_method: ForceMethod::BarnesHut,
//!     ..Default::default()
//! };
//! let mut sim = Simulation::new(config).expect("Failed to initialize simulation");
//!
//! sim.simulate(10).expect("Simulation failed");
//! assert_eq!(sim.steps(), 10);
//! assert_eq!(sim.particles().len(), 201);
//! ```
use log::{info, trace, warn};
#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::models::{Rectangle, Vector3};
use crate::particles::{naive_force, seed_particles, BarnesHutTree, Particle, TraversalStats};
use crate::utils::{ForceMethod, PhysicsError, SimulationConfig, AUTO_BOUNDS_PADDING};

/// Bookkeeping from the most recent force pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StepStats {
    /// Nodes allocated for the tree (zero for the naive method).
    pub node_count: usize,
    /// Particles that fell outside fixed root bounds and were left out of the tree.
    pub dropped: usize,
    pub interactions: TraversalStats,
}

/// A running simulation owning its particles and configuration.
#[derive(Debug, Clone)]
pub struct Simulation {
    config: SimulationConfig,
    particles: Vec<Particle>,
    steps: u64,
    last_step: StepStats,
}

impl Simulation {
    /// Validates `config` and seeds the particles it describes.
    ///
    /// # Errors
    ///
    /// Returns the first configuration error found by [`SimulationConfig::validate`].
    pub fn new(config: SimulationConfig) -> Result<Self, PhysicsError> {
        config.validate()?;
        let particles = seed_particles(&config)?;
        info!(
            "seeded {:?} scenario with {} particles ({:?}, theta {})",
            config.scenario,
            particles.len(),
            config.force_method,
            config.theta
        );
        Ok(Self {
            config,
            particles,
            steps: 0,
            last_step: StepStats::default(),
        })
    }

    /// Runs `config` over a caller supplied particle set instead of a seeded scenario.
    pub fn with_particles(config: SimulationConfig, particles: Vec<Particle>) -> Result<Self, PhysicsError> {
        config.validate()?;
        Ok(Self {
            config,
            particles,
            steps: 0,
            last_step: StepStats::default(),
        })
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn steps(&self) -> u64 {
        self.steps
    }

    pub fn last_step(&self) -> StepStats {
        self.last_step
    }

    /// Swaps in a new configuration, reseeding when it differs from the current one.
    ///
    /// Returns `Ok(true)` if the particles were reseeded. On error the simulation is unchanged.
    pub fn reconfigure(&mut self, config: SimulationConfig) -> Result<bool, PhysicsError> {
        if config == self.config {
            return Ok(false);
        }
        *self = Simulation::new(config)?;
        Ok(true)
    }

    /// Reseeds the particles from the current configuration.
    pub fn reset(&mut self) -> Result<(), PhysicsError> {
        *self = Simulation::new(self.config)?;
        Ok(())
    }

    /// Root bounds the next tree is built over: the configured bounds, or a square fitted around
    /// every particle. `None` when there are no particles to fit.
    pub fn tree_bounds(&self) -> Option<Rectangle> {
        self.config.bounds.or_else(|| {
            Rectangle::enclosing(self.particles.iter().map(|p| p.position), AUTO_BOUNDS_PADDING)
        })
    }

    /// Builds the tree the next Barnes-Hut force pass would use.
    pub fn tree(&self) -> Option<BarnesHutTree<'_>> {
        self.tree_bounds()
            .map(|bounds| BarnesHutTree::build(bounds, &self.particles))
    }

    /// Net force on every particle at the current positions, in particle order.
    pub fn compute_forces(&self) -> Result<(Vec<Vector3>, StepStats), PhysicsError> {
        if self.particles.is_empty() {
            return Ok((Vec::new(), StepStats::default()));
        }
        match self.config.force_method {
            ForceMethod::Naive => Ok(self.naive_forces()),
            ForceMethod::BarnesHut => self.barnes_hut_forces(),
        }
    }

    fn naive_forces(&self) -> (Vec<Vector3>, StepStats) {
        let (g, dampening) = (self.config.gravity_constant, self.config.dampening);
        let n = self.particles.len();

        #[cfg(feature = "parallel")]
        let forces: Vec<Vector3> = (0..n)
            .into_par_iter()
            .map(|i| naive_force(&self.particles, i, g, dampening))
            .collect();
        #[cfg(not(feature = "parallel"))]
        let forces: Vec<Vector3> = (0..n)
            .map(|i| naive_force(&self.particles, i, g, dampening))
            .collect();

        let stats = StepStats {
            interactions: TraversalStats { direct: n * (n - 1), approximated: 0 },
            ..StepStats::default()
        };
        (forces, stats)
    }

    fn barnes_hut_forces(&self) -> Result<(Vec<Vector3>, StepStats), PhysicsError> {
        let config = &self.config;
        let tree = self.tree().ok_or_else(|| {
            PhysicsError::CalculationError("Could not fit bounds around the particles".to_string())
        })?;

        let dropped = self.particles.len() - tree.len();
        if dropped > 0 {
            warn!(
                "{} particles lie outside {:?} and were left out of the tree",
                dropped,
                tree.bounds()
            );
        }

        let evaluate = |particle: &Particle| {
            tree.compute_force_with_stats(particle, config.theta, config.gravity_constant, config.dampening)
        };

        #[cfg(feature = "parallel")]
        let results: Vec<(Vector3, TraversalStats)> = self.particles.par_iter().map(evaluate).collect();
        #[cfg(not(feature = "parallel"))]
        let results: Vec<(Vector3, TraversalStats)> = self.particles.iter().map(evaluate).collect();

        let mut interactions = TraversalStats::default();
        let forces = results
            .into_iter()
            .map(|(force, stats)| {
                interactions += stats;
                force
            })
            .collect();

        let stats = StepStats {
            node_count: tree.node_count(),
            dropped,
            interactions,
        };
        Ok((forces, stats))
    }

    /// Advances the simulation by one frame.
    ///
    /// # Errors
    ///
    /// Returns [`PhysicsError::NonFiniteState`] if any particle's new state is not finite. The
    /// particles are left as they were at the start of the step.
    ///
    /// # Examples
    ///
    /// ```
    /// use nbody_sim::models::Vector3;
    /// use nbody_sim::particles::{Particle, Simulation};
    /// use nbody_sim::utils::SimulationConfig;
    ///
    /// let particles = vec![
    ///     Particle::new(1.0, Vector3::planar(-10.0, 0.0), Vector3::ZERO).unwrap(),
    ///     Particle::new(1.0, Vector3::planar(10.0, 0.0), Vector3::ZERO).unwrap(),
    /// ];
    /// let mut sim = Simulation::with_particles(SimulationConfig::default(), particles).unwrap();
    /// sim.step().unwrap();
    ///
    /// // The pair attracts: the left body moves right and the right body moves left.
    /// assert!(sim.particles()[0].position.x > -10.0);
    /// assert!(sim.particles()[1].position.x < 10.0);
    /// ```
    pub fn step(&mut self) -> Result<(), PhysicsError> {
        let (forces, stats) = self.compute_forces()?;
        let next = self
            .particles
            .iter()
            .zip(forces)
            .map(|(particle, force)| particle.integrate(force))
            .collect::<Result<Vec<_>, _>>()?;

        self.particles = next;
        self.steps += 1;
        self.last_step = stats;
        trace!("step {}: {:?}", self.steps, stats);
        Ok(())
    }

    /// Runs the simulation for a specified number of steps.
    pub fn simulate(&mut self, steps: usize) -> Result<(), PhysicsError> {
        for _ in 0..steps {
            self.step()?;
        }
        Ok(())
    }

    pub fn total_mass(&self) -> f64 {
        self.particles.iter().map(Particle::mass).sum()
    }

    /// Mass-weighted mean position of all particles, or `None` without particles.
    pub fn center_of_mass(&self) -> Option<Vector3> {
        let total_mass = self.total_mass();
        if total_mass == 0.0 {
            return None;
        }
        let weighted: Vector3 = self.particles.iter().map(|p| p.position * p.mass()).sum();
        Some(weighted / total_mass)
    }

    pub fn momentum(&self) -> Vector3 {
        self.particles.iter().map(Particle::momentum).sum()
    }

    pub fn kinetic_energy(&self) -> f64 {
        self.particles.iter().map(Particle::kinetic_energy).sum()
    }
}
