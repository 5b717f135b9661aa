mod particle;
mod gravity;
mod barnes_hut;
mod scenario;
mod particle_simulation;

pub use particle::*;
pub use gravity::*;
pub use barnes_hut::*;
pub use scenario::*;
pub use particle_simulation::*;

#[cfg(test)]
mod scenario_tests;
#[cfg(test)]
mod particle_simulation_tests;
