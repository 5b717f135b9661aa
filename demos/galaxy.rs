// demos/galaxy.rs
// Runs a galaxy headless and logs how the system evolves. Try `RUST_LOG=info`.

use log::info;
use nbody_sim::particles::Simulation;
use nbody_sim::utils::{ForceMethod, PhysicsError, SimulationConfig};

fn main() -> Result<(), PhysicsError> {
    env_logger::init();

    let config = SimulationConfig {
        particle_count: 2_000,
        force_method: ForceMethod::BarnesHut,
        ..SimulationConfig::default()
    };
    let mut sim = Simulation::new(config)?;

    info!(
        "initial state: mass {:.1}, kinetic energy {:.3e}, momentum {:?}",
        sim.total_mass(),
        sim.kinetic_energy(),
        sim.momentum()
    );

    for frame in 1..=200 {
        sim.step()?;
        if frame % 20 == 0 {
            let stats = sim.last_step();
            info!(
                "frame {}: kinetic energy {:.3e}, center of mass {:?}, {} nodes, {} direct / {} approximated",
                frame,
                sim.kinetic_energy(),
                sim.center_of_mass(),
                stats.node_count,
                stats.interactions.direct,
                stats.interactions.approximated
            );
        }
    }

    info!("final momentum {:?}", sim.momentum());
    Ok(())
}
