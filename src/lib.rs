//! Gravitational n-body simulation with an exact O(n²) force pass and a Barnes-Hut quadtree
//! approximation.
//!
//! - [`models`]: the `Vector3` and `Rectangle` value types.
//! - [`particles`]: particles, the quadtree, force accumulation, scenario seeding and the
//!   per-frame [`particles::Simulation`] driver.
//! - [`utils`]: errors, constants and [`utils::SimulationConfig`].
pub mod utils;
pub mod models;
pub mod particles;

/// ### General helper function
/// - Asserts that two floating point numbers are approximately equal.
///
/// ### Arguments
///
/// * `a` - The first floating point number.
/// * `b` - The second floating point number.
/// * `epsilon` - The maximum difference between `a` and `b` for them to be considered equal.
/// * `optional_message` - An optional message to display if the assertion fails.
///
pub fn assert_float_eq(a: f64, b: f64, epsilon: f64, optional_message: Option<&str>) {
    match optional_message {
        Some(message) => assert!((a - b).abs() < epsilon, "a: {:?},\nb: {:?},\nepsilon: {:?},\n message: {:?}", a, b, epsilon, message),
        None => assert!((a - b).abs() < epsilon, "Expected {} to be approximately equal to {} (epsilon: {})", a, b, epsilon),
    }
}
