use std::fmt;
use std::error::Error;

/// Represents errors that can occur while building or stepping a simulation.
#[derive(Debug, Clone, PartialEq)]
pub enum PhysicsError {
    /// Indicates an invalid mass value (e.g., negative, zero or non-finite mass).
    InvalidMass,
    /// Indicates a degenerate or non-finite bounding rectangle.
    InvalidBounds,
    /// Indicates a negative or non-finite Barnes-Hut opening parameter.
    InvalidTheta,
    /// Indicates a negative or non-finite dampening distance.
    InvalidDampening,
    /// Indicates a non-positive simulation scale or field width.
    InvalidScale,
    /// Indicates that integration produced a NaN or infinite position or velocity.
    NonFiniteState,
    /// A general error for calculations that produce invalid results.
    CalculationError(String),
}

impl fmt::Display for PhysicsError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            PhysicsError::InvalidMass => write!(f, "Invalid mass value"),
            PhysicsError::InvalidBounds => write!(f, "Invalid bounds"),
            PhysicsError::InvalidTheta => write!(f, "Invalid theta value"),
            PhysicsError::InvalidDampening => write!(f, "Invalid dampening value"),
            PhysicsError::InvalidScale => write!(f, "Invalid simulation scale"),
            PhysicsError::NonFiniteState => write!(f, "Particle state is no longer finite"),
            PhysicsError::CalculationError(msg) => write!(f, "Calculation error: {}", msg),
        }
    }
}

impl Error for PhysicsError {}
