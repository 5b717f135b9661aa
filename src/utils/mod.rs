pub mod errors;
mod constants;
mod simulation_config;

pub use errors::PhysicsError;
pub use constants::*;
pub use simulation_config::*;
