use crate::utils::{ForceMethod, ScenarioKind, SimulationConfig};

/// Opening parameter used when none is configured.
pub const DEFAULT_THETA: f64 = 0.5;

/// Deepest level a node may be created at. Particles that are still not separated at this
/// depth (coincident positions) share the same leaf.
pub const MAX_TREE_DEPTH: usize = 64;

/// Relative padding added around the particles when the root bounds are fitted each step.
pub const AUTO_BOUNDS_PADDING: f64 = 0.01;

pub const DEFAULT_SIMULATION_CONFIG: SimulationConfig = SimulationConfig {
    particle_count: 1_000,
    gravity_constant: 1.0,
    blackhole_mass: 10_000.0,
    star_mass: 1.0,
    simulation_scale: 1.0,
    dampening: 5.0,
    theta: DEFAULT_THETA,
    field_width: 800.0,
    force_method: ForceMethod::BarnesHut,
    scenario: ScenarioKind::Galaxy,
    pin_blackhole: false,
    bounds: None,
    seed: 42,
};
