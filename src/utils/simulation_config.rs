// src/utils/simulation_config.rs
use crate::models::Rectangle;
use crate::utils::{DEFAULT_SIMULATION_CONFIG, errors::PhysicsError};

/// How the net force on each particle is accumulated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ForceMethod {
    /// Exact pairwise summation over every other particle.
    Naive,
    /// Quadtree approximation controlled by `theta`.
    BarnesHut,
}

/// How the initial particle set is seeded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScenarioKind {
    /// Stars on circular orbits around a central blackhole.
    Galaxy,
    /// Stars scattered uniformly over the disc with small random velocities.
    Random,
}

/// Every input that shapes a simulation run.
///
/// The driver owns the current configuration and compares it against the new one when an input
/// changes; a differing configuration is handed to `Simulation::reconfigure`, which reseeds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimulationConfig {
    pub particle_count: usize,
    pub gravity_constant: f64,
    pub blackhole_mass: f64,
    pub star_mass: f64,
    /// World units per rendered pixel.
    pub simulation_scale: f64,
    /// Minimum separation used by the force law.
    pub dampening: f64,
    pub theta: f64,
    /// Width of the render surface the galaxy radius is derived from.
    pub field_width: f64,
    pub force_method: ForceMethod,
    pub scenario: ScenarioKind,
    /// Keeps the blackhole fixed in place instead of integrating it like any other body.
    pub pin_blackhole: bool,
    /// Fixed root bounds for the tree. `None` fits a square around all particles every step.
    pub bounds: Option<Rectangle>,
    pub seed: u64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        DEFAULT_SIMULATION_CONFIG
    }
}

impl SimulationConfig {
    /// Builds a configuration from the demo's numeric inputs, falling back to the defaults for
    /// anything left as `None`.
    ///
    /// # Examples
    ///
    /// ```
    /// use nbody_sim::utils::SimulationConfig;
    ///
    /// let config = SimulationConfig::new(Some(200), None, None, None, None, None, Some(0.8));
    /// assert_eq!(config.particle_count, 200);
    /// assert_eq!(config.theta, 0.8);
    /// assert_eq!(config.star_mass, SimulationConfig::default().star_mass);
    /// ```
    pub fn new(
        particle_count: Option<usize>,
        gravity_constant: Option<f64>,
        blackhole_mass: Option<f64>,
        star_mass: Option<f64>,
        simulation_scale: Option<f64>,
        dampening: Option<f64>,
        theta: Option<f64>,
    ) -> Self {
        let default = DEFAULT_SIMULATION_CONFIG;
        Self {
            particle_count: particle_count.unwrap_or(default.particle_count),
            gravity_constant: gravity_constant.unwrap_or(default.gravity_constant),
            blackhole_mass: blackhole_mass.unwrap_or(default.blackhole_mass),
            star_mass: star_mass.unwrap_or(default.star_mass),
            simulation_scale: simulation_scale.unwrap_or(default.simulation_scale),
            dampening: dampening.unwrap_or(default.dampening),
            theta: theta.unwrap_or(default.theta),
            ..default
        }
    }

    /// Checks every field that would otherwise surface later as NaN or a silent no-op.
    pub fn validate(&self) -> Result<(), PhysicsError> {
        if !(self.star_mass.is_finite() && self.star_mass > 0.0) {
            return Err(PhysicsError::InvalidMass);
        }
        if !(self.blackhole_mass.is_finite() && self.blackhole_mass > 0.0) {
            return Err(PhysicsError::InvalidMass);
        }
        if !(self.theta.is_finite() && self.theta >= 0.0) {
            return Err(PhysicsError::InvalidTheta);
        }
        if !(self.dampening.is_finite() && self.dampening >= 0.0) {
            return Err(PhysicsError::InvalidDampening);
        }
        if !(self.simulation_scale.is_finite() && self.simulation_scale > 0.0) {
            return Err(PhysicsError::InvalidScale);
        }
        if !(self.field_width.is_finite() && self.field_width > 0.0) {
            return Err(PhysicsError::InvalidScale);
        }
        if !self.gravity_constant.is_finite() {
            return Err(PhysicsError::CalculationError(
                "Gravity constant must be finite".to_string(),
            ));
        }
        if let Some(bounds) = self.bounds {
            bounds.validate()?;
        }
        Ok(())
    }

    /// Radius of the disc stars are seeded in.
    pub fn galaxy_radius(&self) -> f64 {
        (self.field_width / 1.5) * self.simulation_scale
    }
}
