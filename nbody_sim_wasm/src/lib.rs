// nbody_sim_wasm/src/lib.rs
// Browser-facing wrapper around the simulation driver. The page owns the canvas and the input
// controls; it calls `step` once per animation frame and draws what `positions` returns.

use wasm_bindgen::prelude::*;
use nbody_sim::particles::Simulation;
use nbody_sim::utils::{ForceMethod, PhysicsError, SimulationConfig};

fn to_js(error: PhysicsError) -> JsValue {
    JsValue::from_str(&error.to_string())
}

/// Seed drawn from the JS engine so every page load starts a different galaxy.
fn random_seed() -> u64 {
    (js_sys::Math::random() * u32::MAX as f64) as u64
}

#[allow(clippy::too_many_arguments)]
fn config_from_inputs(
    base: SimulationConfig,
    particle_count: Option<u32>,
    gravity_constant: Option<f64>,
    blackhole_mass: Option<f64>,
    star_mass: Option<f64>,
    simulation_scale: Option<f64>,
    dampening: Option<f64>,
    theta: Option<f64>,
) -> SimulationConfig {
    SimulationConfig {
        particle_count: particle_count.map_or(base.particle_count, |n| n as usize),
        gravity_constant: gravity_constant.unwrap_or(base.gravity_constant),
        blackhole_mass: blackhole_mass.unwrap_or(base.blackhole_mass),
        star_mass: star_mass.unwrap_or(base.star_mass),
        simulation_scale: simulation_scale.unwrap_or(base.simulation_scale),
        dampening: dampening.unwrap_or(base.dampening),
        theta: theta.unwrap_or(base.theta),
        ..base
    }
}

#[wasm_bindgen]
pub struct WasmSimulation {
    simulation: Simulation,
}

#[wasm_bindgen]
impl WasmSimulation {
    /// Seeds a galaxy from the page's numeric inputs. Any input left undefined uses the default.
    #[wasm_bindgen(constructor)]
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        particle_count: Option<u32>,
        gravity_constant: Option<f64>,
        blackhole_mass: Option<f64>,
        star_mass: Option<f64>,
        simulation_scale: Option<f64>,
        dampening: Option<f64>,
        theta: Option<f64>,
        field_width: Option<f64>,
    ) -> Result<WasmSimulation, JsValue> {
        let base = SimulationConfig {
            field_width: field_width.unwrap_or(SimulationConfig::default().field_width),
            seed: random_seed(),
            ..SimulationConfig::default()
        };
        let config = config_from_inputs(
            base,
            particle_count,
            gravity_constant,
            blackhole_mass,
            star_mass,
            simulation_scale,
            dampening,
            theta,
        );
        let simulation = Simulation::new(config).map_err(to_js)?;
        web_sys::console::log_1(&format!("seeded {} particles", simulation.particles().len()).into());
        Ok(Self { simulation })
    }

    /// Advances one frame.
    #[wasm_bindgen]
    pub fn step(&mut self) -> Result<(), JsValue> {
        self.simulation.step().map_err(|e| {
            web_sys::console::warn_1(&format!("step {} failed: {}", self.simulation.steps() + 1, e).into());
            to_js(e)
        })
    }

    /// Applies changed inputs, reseeding if anything differs. Returns whether it reseeded.
    #[wasm_bindgen]
    #[allow(clippy::too_many_arguments)]
    pub fn reconfigure(
        &mut self,
        particle_count: Option<u32>,
        gravity_constant: Option<f64>,
        blackhole_mass: Option<f64>,
        star_mass: Option<f64>,
        simulation_scale: Option<f64>,
        dampening: Option<f64>,
        theta: Option<f64>,
    ) -> Result<bool, JsValue> {
        let config = config_from_inputs(
            *self.simulation.config(),
            particle_count,
            gravity_constant,
            blackhole_mass,
            star_mass,
            simulation_scale,
            dampening,
            theta,
        );
        self.simulation.reconfigure(config).map_err(to_js)
    }

    /// Switches between the exact and the quadtree force pass without reseeding.
    #[wasm_bindgen]
    pub fn set_naive(&mut self, naive: bool) -> Result<(), JsValue> {
        let force_method = if naive { ForceMethod::Naive } else { ForceMethod::BarnesHut };
        let config = SimulationConfig { force_method, ..*self.simulation.config() };
        let particles = self.simulation.particles().to_vec();
        self.simulation = Simulation::with_particles(config, particles).map_err(to_js)?;
        Ok(())
    }

    /// Particle positions flattened as `[x0, y0, x1, y1, ...]`, blackhole last.
    #[wasm_bindgen]
    pub fn positions(&self) -> Vec<f64> {
        self.simulation
            .particles()
            .iter()
            .flat_map(|p| [p.position.x, p.position.y])
            .collect()
    }

    /// Indices of particles that never move.
    #[wasm_bindgen]
    pub fn anchors(&self) -> Vec<u32> {
        self.simulation
            .particles()
            .iter()
            .enumerate()
            .filter(|(_, p)| p.is_anchor())
            .map(|(i, _)| i as u32)
            .collect()
    }

    /// Bounds of every tree node flattened as `[x, y, width, height, ...]`, root first.
    #[wasm_bindgen]
    pub fn tree_bounds(&self) -> Vec<f64> {
        self.simulation
            .tree()
            .map(|tree| {
                tree.nodes()
                    .iter()
                    .flat_map(|node| {
                        let b = node.bounds();
                        [b.x(), b.y(), b.width(), b.height()]
                    })
                    .collect()
            })
            .unwrap_or_default()
    }

    #[wasm_bindgen(getter)]
    pub fn particle_count(&self) -> usize {
        self.simulation.particles().len()
    }

    #[wasm_bindgen(getter)]
    pub fn steps(&self) -> f64 {
        self.simulation.steps() as f64
    }

    #[wasm_bindgen(getter)]
    pub fn kinetic_energy(&self) -> f64 {
        self.simulation.kinetic_energy()
    }

    /// Direct plus aggregated force evaluations in the last frame.
    #[wasm_bindgen(getter)]
    pub fn interactions(&self) -> usize {
        self.simulation.last_step().interactions.interactions()
    }
}
