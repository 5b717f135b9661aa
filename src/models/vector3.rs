use std::iter::Sum;
use std::ops::{Add, AddAssign, Div, DivAssign, Mul, MulAssign, Neg, Sub, SubAssign};

use approx::{AbsDiffEq, RelativeEq};
use rand::Rng;

/// A three component vector used for positions, velocities and forces.
///
/// `Vector3` is a plain `Copy` value. Every method and binary operator returns a new vector;
/// the compound assignment operators (`+=`, `-=`, `*=`, `/=`) and [`Vector3::normalize_in_place`]
/// are the explicit in-place variants for hot loops.
///
/// # Examples
///
/// ```
/// use nbody_sim::models::Vector3;
///
/// let a = Vector3::new(1.0, 2.0, 0.0);
/// let b = Vector3::new(3.0, -1.0, 0.0);
///
/// let sum = a + b;
/// assert_eq!(sum, Vector3::new(4.0, 1.0, 0.0));
///
/// // `a` is untouched by the pure form.
/// assert_eq!(a, Vector3::new(1.0, 2.0, 0.0));
///
/// let mut c = a;
/// c += b;
/// assert_eq!(c, sum);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vector3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vector3 {
    pub const ZERO: Vector3 = Vector3 { x: 0.0, y: 0.0, z: 0.0 };
    pub const UNIT_Z: Vector3 = Vector3 { x: 0.0, y: 0.0, z: 1.0 };

    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// A vector in the `z = 0` plane.
    pub const fn planar(x: f64, y: f64) -> Self {
        Self { x, y, z: 0.0 }
    }

    /// Returns a vector whose components are each drawn uniformly from `[-1, 1)`.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self {
            x: rng.random_range(-1.0..1.0),
            y: rng.random_range(-1.0..1.0),
            z: rng.random_range(-1.0..1.0),
        }
    }

    pub fn translate(self, x_offset: f64, y_offset: f64, z_offset: f64) -> Self {
        Self::new(self.x + x_offset, self.y + y_offset, self.z + z_offset)
    }

    pub fn dot(self, other: Vector3) -> f64 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    pub fn cross(self, other: Vector3) -> Self {
        Self {
            x: self.y * other.z - self.z * other.y,
            y: self.z * other.x - self.x * other.z,
            z: self.x * other.y - self.y * other.x,
        }
    }

    pub fn magnitude_squared(self) -> f64 {
        self.dot(self)
    }

    pub fn magnitude(self) -> f64 {
        self.magnitude_squared().sqrt()
    }

    pub fn distance(self, other: Vector3) -> f64 {
        (self - other).magnitude()
    }

    /// Returns the unit vector in the same direction. The zero vector is returned unchanged.
    ///
    /// # Examples
    ///
    /// ```
    /// use nbody_sim::models::Vector3;
    ///
    /// let v = Vector3::new(3.0, 4.0, 0.0).normalize();
    /// assert!((v.magnitude() - 1.0).abs() < 1e-12);
    /// assert_eq!(Vector3::ZERO.normalize(), Vector3::ZERO);
    /// ```
    pub fn normalize(self) -> Self {
        let magnitude = self.magnitude();
        if magnitude == 0.0 {
            return self;
        }
        self / magnitude
    }

    pub fn normalize_in_place(&mut self) {
        *self = self.normalize();
    }

    /// Caps the magnitude at `limit`, keeping the direction.
    pub fn limit(self, limit: f64) -> Self {
        if self.magnitude() <= limit {
            return self;
        }
        self.normalize() * limit
    }

    /// Clamps the magnitude into `(lower_bound, upper_bound)`, keeping the direction.
    pub fn constrain(self, lower_bound: f64, upper_bound: f64) -> Self {
        let magnitude = self.magnitude();
        if magnitude > lower_bound && magnitude < upper_bound {
            return self;
        }
        let bound = if magnitude <= lower_bound { lower_bound } else { upper_bound };
        self.normalize() * bound
    }

    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

impl Add for Vector3 {
    type Output = Vector3;

    fn add(self, rhs: Vector3) -> Vector3 {
        Vector3::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl Sub for Vector3 {
    type Output = Vector3;

    fn sub(self, rhs: Vector3) -> Vector3 {
        Vector3::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl Mul<f64> for Vector3 {
    type Output = Vector3;

    fn mul(self, scale: f64) -> Vector3 {
        Vector3::new(self.x * scale, self.y * scale, self.z * scale)
    }
}

impl Mul<Vector3> for f64 {
    type Output = Vector3;

    fn mul(self, vector: Vector3) -> Vector3 {
        vector * self
    }
}

impl Div<f64> for Vector3 {
    type Output = Vector3;

    fn div(self, scale: f64) -> Vector3 {
        Vector3::new(self.x / scale, self.y / scale, self.z / scale)
    }
}

impl Neg for Vector3 {
    type Output = Vector3;

    fn neg(self) -> Vector3 {
        Vector3::new(-self.x, -self.y, -self.z)
    }
}

impl AddAssign for Vector3 {
    fn add_assign(&mut self, rhs: Vector3) {
        self.x += rhs.x;
        self.y += rhs.y;
        self.z += rhs.z;
    }
}

impl SubAssign for Vector3 {
    fn sub_assign(&mut self, rhs: Vector3) {
        self.x -= rhs.x;
        self.y -= rhs.y;
        self.z -= rhs.z;
    }
}

impl MulAssign<f64> for Vector3 {
    fn mul_assign(&mut self, scale: f64) {
        self.x *= scale;
        self.y *= scale;
        self.z *= scale;
    }
}

impl DivAssign<f64> for Vector3 {
    fn div_assign(&mut self, scale: f64) {
        self.x /= scale;
        self.y /= scale;
        self.z /= scale;
    }
}

impl Sum for Vector3 {
    fn sum<I: Iterator<Item = Vector3>>(iter: I) -> Vector3 {
        iter.fold(Vector3::ZERO, |acc, v| acc + v)
    }
}

impl AbsDiffEq for Vector3 {
    type Epsilon = f64;

    fn default_epsilon() -> f64 {
        f64::default_epsilon()
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: f64) -> bool {
        self.x.abs_diff_eq(&other.x, epsilon)
            && self.y.abs_diff_eq(&other.y, epsilon)
            && self.z.abs_diff_eq(&other.z, epsilon)
    }
}

impl RelativeEq for Vector3 {
    fn default_max_relative() -> f64 {
        f64::default_max_relative()
    }

    fn relative_eq(&self, other: &Self, epsilon: f64, max_relative: f64) -> bool {
        self.x.relative_eq(&other.x, epsilon, max_relative)
            && self.y.relative_eq(&other.y, epsilon, max_relative)
            && self.z.relative_eq(&other.z, epsilon, max_relative)
    }
}
