//! Angle spaces and the point transforms every instrument is built from.
//!
//! Screen space has its origin at the top-left corner with y growing
//! downward, so a positive rotation turns clockwise on the panel. Two
//! direction spaces exist side by side: [`EastZeroClockwise`] (zero along +x,
//! the convention of `cos`/`sin` offsets and of arc drawing) and
//! [`NorthZeroClockwise`] (zero straight up, the convention of headings,
//! bearings and dial pointers). Converting between them is explicit.

use std::ops::{Add, Neg, Sub};

// ============================================================================
// POINTS
// ============================================================================

/// A point (or offset vector) in screen space.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point2D {
    pub x: f64,
    pub y: f64,
}

impl Point2D {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Snaps both coordinates to the nearest pixel.
    pub fn round(self) -> Self {
        Self::new(self.x.round(), self.y.round())
    }

    pub fn offset(self, dx: f64, dy: f64) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }
}

impl Add for Point2D {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point2D {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Neg for Point2D {
    type Output = Self;

    fn neg(self) -> Self {
        Self::new(-self.x, -self.y)
    }
}

impl From<(f64, f64)> for Point2D {
    fn from((x, y): (f64, f64)) -> Self {
        Self::new(x, y)
    }
}

// ============================================================================
// ANGLE SPACES
// ============================================================================

/// Degrees measured clockwise from the +x axis.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default)]
pub struct EastZeroClockwise(pub f64);

/// Degrees measured clockwise from straight up.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default)]
pub struct NorthZeroClockwise(pub f64);

impl EastZeroClockwise {
    pub fn degrees(self) -> f64 {
        self.0
    }

    /// Unit direction `(cos, sin)` for this angle.
    pub fn direction(self) -> Point2D {
        let radians = self.0.to_radians();
        Point2D::new(radians.cos(), radians.sin())
    }
}

impl NorthZeroClockwise {
    pub fn degrees(self) -> f64 {
        self.0
    }

    pub fn direction(self) -> Point2D {
        EastZeroClockwise::from(self).direction()
    }
}

impl From<NorthZeroClockwise> for EastZeroClockwise {
    fn from(angle: NorthZeroClockwise) -> Self {
        Self(angle.0 - 90.0)
    }
}

impl From<EastZeroClockwise> for NorthZeroClockwise {
    fn from(angle: EastZeroClockwise) -> Self {
        Self(angle.0 + 90.0)
    }
}

/// Reduces an angle to `[0, 360)`. Only ring indexing needs this; everything
/// else goes through sine and cosine and never wraps.
pub fn normalize_degrees(degrees: f64) -> f64 {
    let reduced = degrees.rem_euclid(360.0);
    if reduced >= 360.0 {
        0.0
    } else {
        reduced
    }
}

// ============================================================================
// KERNEL OPERATIONS
// ============================================================================

/// Pixel offset of a point `radius` away along `angle`, rounded (not
/// truncated) so neighbouring ticks do not drift apart.
pub fn polar_offset(angle: impl Into<EastZeroClockwise>, radius: f64) -> Point2D {
    let direction = angle.into().direction();
    Point2D::new(
        (direction.x * radius).round(),
        (direction.y * radius).round(),
    )
}

/// Rotates `point` (relative to `pivot`) by a precomputed sine/cosine pair
/// and returns the absolute, pixel-snapped result.
pub fn rotate_around(sin_a: f64, cos_a: f64, point: Point2D, pivot: Point2D) -> Point2D {
    Point2D::new(
        (pivot.x + point.x * cos_a - point.y * sin_a).round(),
        (pivot.y + point.x * sin_a + point.y * cos_a).round(),
    )
}

/// Rotates an ordered outline about `pivot`. Order is preserved exactly, it
/// carries the polygon winding.
pub fn rotate_batch(degrees: f64, points: &[Point2D], pivot: Point2D) -> Vec<Point2D> {
    Rotation::degrees(degrees).apply_all(points, pivot)
}

/// Saturating clamp applied to a physical quantity before it is projected.
/// Never panics, also when the bounds arrive swapped; NaN maps to `min`.
pub fn clamp_to_domain(value: f64, min: f64, max: f64) -> f64 {
    let (low, high) = if min <= max { (min, max) } else { (max, min) };
    if value.is_nan() || value < low {
        low
    } else if value > high {
        high
    } else {
        value
    }
}

/// Sine and cosine of one rotation, computed once and shared by every point
/// drawn with it during a frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rotation {
    pub sin: f64,
    pub cos: f64,
}

impl Rotation {
    /// Clockwise rotation by `degrees`.
    pub fn degrees(degrees: f64) -> Self {
        let radians = degrees.to_radians();
        Self {
            sin: radians.sin(),
            cos: radians.cos(),
        }
    }

    pub fn apply(&self, point: Point2D, pivot: Point2D) -> Point2D {
        rotate_around(self.sin, self.cos, point, pivot)
    }

    pub fn apply_all(&self, points: &[Point2D], pivot: Point2D) -> Vec<Point2D> {
        points.iter().map(|p| self.apply(*p, pivot)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn polar_offset_is_periodic() {
        for step in -72..72 {
            let theta = step as f64 * 5.0 + 0.3;
            for radius in [1.0, 17.5, 120.0] {
                let a = polar_offset(EastZeroClockwise(theta), radius);
                let b = polar_offset(EastZeroClockwise(theta + 360.0), radius);
                assert!((a.x - b.x).abs() <= 1.0 && (a.y - b.y).abs() <= 1.0);
            }
        }
    }

    #[test]
    fn polar_offset_rounds_instead_of_truncating() {
        let p = polar_offset(EastZeroClockwise(60.0), 10.0);
        assert_eq!(p, Point2D::new(5.0, 9.0));
    }

    #[test]
    fn north_zero_points_up_and_turns_clockwise() {
        let up = polar_offset(NorthZeroClockwise(0.0), 10.0);
        let right = polar_offset(NorthZeroClockwise(90.0), 10.0);
        assert_eq!(up, Point2D::new(0.0, -10.0));
        assert_eq!(right, Point2D::new(10.0, 0.0));
    }

    #[test]
    fn angle_spaces_convert_both_ways() {
        let north = NorthZeroClockwise(30.0);
        let east: EastZeroClockwise = north.into();
        assert_eq!(east, EastZeroClockwise(-60.0));
        assert_eq!(NorthZeroClockwise::from(east), north);
    }

    #[test]
    fn rotate_batch_keeps_order() {
        let pivot = Point2D::new(100.0, 100.0);
        let square = [
            Point2D::new(10.0, 0.0),
            Point2D::new(0.0, 10.0),
            Point2D::new(-10.0, 0.0),
            Point2D::new(0.0, -10.0),
        ];
        let turned = rotate_batch(90.0, &square, pivot);
        assert_eq!(
            turned,
            vec![
                Point2D::new(100.0, 110.0),
                Point2D::new(90.0, 100.0),
                Point2D::new(100.0, 90.0),
                Point2D::new(110.0, 100.0),
            ]
        );
    }

    #[test]
    fn clamp_saturates() {
        assert_eq!(clamp_to_domain(12.0, -10.0, 10.0), 10.0);
        assert_eq!(clamp_to_domain(-12.0, -10.0, 10.0), -10.0);
        assert_eq!(clamp_to_domain(3.5, -10.0, 10.0), 3.5);
        assert_eq!(clamp_to_domain(3.5, 10.0, -10.0), 3.5);
        assert_eq!(clamp_to_domain(f64::NAN, 0.0, 1.0), 0.0);
    }

    #[test]
    fn normalize_wraps_negative_angles() {
        assert_eq!(normalize_degrees(-90.0), 270.0);
        assert_eq!(normalize_degrees(570.0), 210.0);
        assert_eq!(normalize_degrees(360.0), 0.0);
    }
}
