use crate::models::Vector3;
use crate::utils::PhysicsError;

/// One of the four quarters of a [`Rectangle`].
///
/// The `y` axis grows downwards (screen convention), so "north" is the half with the smaller
/// `y` values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Quadrant {
    NorthEast,
    SouthEast,
    SouthWest,
    NorthWest,
}

impl Quadrant {
    /// All quadrants in storage order.
    pub const ALL: [Quadrant; 4] = [
        Quadrant::NorthEast,
        Quadrant::SouthEast,
        Quadrant::SouthWest,
        Quadrant::NorthWest,
    ];

    pub fn index(self) -> usize {
        match self {
            Quadrant::NorthEast => 0,
            Quadrant::SouthEast => 1,
            Quadrant::SouthWest => 2,
            Quadrant::NorthWest => 3,
        }
    }
}

/// An axis aligned rectangle anchored at its top-left corner `(x, y)`.
///
/// Rectangles are immutable once constructed.
///
/// # Examples
///
/// ```
/// use nbody_sim::models::{Rectangle, Vector3};
///
/// let bounds = Rectangle::new(0.0, 0.0, 10.0, 10.0);
/// assert_eq!(bounds.center_x(), 5.0);
///
/// // Containment is half-open: the left/top edges are inside, right/bottom are not.
/// assert!(bounds.contains(Vector3::planar(0.0, 0.0)));
/// assert!(!bounds.contains(Vector3::planar(10.0, 5.0)));
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rectangle {
    x: f64,
    y: f64,
    width: f64,
    height: f64,
}

impl Rectangle {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    /// A square of side `2 * half_size` centered on `(cx, cy)`.
    pub fn centered(cx: f64, cy: f64, half_size: f64) -> Self {
        Self::new(cx - half_size, cy - half_size, 2.0 * half_size, 2.0 * half_size)
    }

    /// Smallest square centered on the midpoint of `points` that contains every point, grown by
    /// `padding` (relative to its side) so that points on the far edges stay inside the
    /// half-open bounds.
    ///
    /// Returns `None` when `points` is empty or contains a non-finite coordinate.
    pub fn enclosing<I>(points: I, padding: f64) -> Option<Self>
    where
        I: IntoIterator<Item = Vector3>,
    {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        if !first.is_finite() {
            return None;
        }
        let (mut min_x, mut max_x, mut min_y, mut max_y) = (first.x, first.x, first.y, first.y);
        for p in iter {
            if !p.is_finite() {
                return None;
            }
            min_x = min_x.min(p.x);
            max_x = max_x.max(p.x);
            min_y = min_y.min(p.y);
            max_y = max_y.max(p.y);
        }
        let side = (max_x - min_x).max(max_y - min_y).max(1.0);
        let half_size = side * (0.5 + padding);
        Some(Self::centered((min_x + max_x) / 2.0, (min_y + max_y) / 2.0, half_size))
    }

    pub fn x(&self) -> f64 {
        self.x
    }

    pub fn y(&self) -> f64 {
        self.y
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn top(&self) -> f64 {
        self.y
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn left(&self) -> f64 {
        self.x
    }

    pub fn center_x(&self) -> f64 {
        self.x + self.width / 2.0
    }

    pub fn center_y(&self) -> f64 {
        self.y + self.height / 2.0
    }

    /// Checks that the rectangle has a finite origin and a positive, finite size.
    pub fn validate(&self) -> Result<(), PhysicsError> {
        let finite = [self.x, self.y, self.width, self.height].iter().all(|v| v.is_finite());
        if !finite || self.width <= 0.0 || self.height <= 0.0 {
            return Err(PhysicsError::InvalidBounds);
        }
        Ok(())
    }

    /// Returns true if the point lies inside the rectangle. The `z` component is ignored.
    ///
    /// The lower bounds are inclusive and the upper bounds exclusive.
    pub fn contains(&self, point: Vector3) -> bool {
        point.x >= self.left()
            && point.x < self.right()
            && point.y >= self.top()
            && point.y < self.bottom()
    }

    /// Returns true if the two rectangles overlap or touch.
    pub fn intersects(&self, other: &Rectangle) -> bool {
        !(other.left() > self.right()
            || other.right() < self.left()
            || other.top() > self.bottom()
            || other.bottom() < self.top())
    }

    /// Picks the quadrant a point belongs to.
    ///
    /// East requires `x > center_x` and south requires `y > center_y`; points on a center line
    /// fall to the west / north side.
    pub fn quadrant_of(&self, point: Vector3) -> Quadrant {
        let east = point.x > self.center_x();
        let south = point.y > self.center_y();
        match (east, south) {
            (true, false) => Quadrant::NorthEast,
            (true, true) => Quadrant::SouthEast,
            (false, true) => Quadrant::SouthWest,
            (false, false) => Quadrant::NorthWest,
        }
    }

    /// The quarter of this rectangle at the given corner.
    pub fn quadrant(&self, quadrant: Quadrant) -> Rectangle {
        let (w, h) = (self.width / 2.0, self.height / 2.0);
        let (cx, cy) = (self.center_x(), self.center_y());
        match quadrant {
            Quadrant::NorthEast => Rectangle::new(cx, self.y, w, h),
            Quadrant::SouthEast => Rectangle::new(cx, cy, w, h),
            Quadrant::SouthWest => Rectangle::new(self.x, cy, w, h),
            Quadrant::NorthWest => Rectangle::new(self.x, self.y, w, h),
        }
    }
}
