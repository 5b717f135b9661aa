mod vector3;
mod rectangle;

pub use vector3::*;
pub use rectangle::*;
