use nalgebra::{Scalar, Vector2};
use num_traits::{Float, Num};

/// Point in a flat 2d coordinate space.
///
/// Geographic coordinates implement it too, with `x` being longitude and `y` latitude. This is what the planar
/// approximations of the kernel (perpendicular foot, clipping, on-segment test) operate on.
pub trait CartesianPoint2d {
    /// Numeric type used to represent coordinates.
    type Num: Num + Copy + PartialOrd + Scalar;

    /// X coordinate.
    fn x(&self) -> Self::Num;
    /// Y coordinate.
    fn y(&self) -> Self::Num;

    /// Vector from `other` to this point.
    fn sub(&self, other: &impl CartesianPoint2d<Num = Self::Num>) -> Vector2<Self::Num> {
        Vector2::new(self.x() - other.x(), self.y() - other.y())
    }

    /// Squared euclidean distance to the `other` point.
    fn distance_sq(&self, other: &impl CartesianPoint2d<Num = Self::Num>) -> Self::Num {
        let v = self.sub(other);
        v.x * v.x + v.y * v.y
    }
}

/// Helpers for points with floating-point coordinates.
pub trait CartesianPoint2dFloat<N: Float = f64>: CartesianPoint2d<Num = N> {
    /// Euclidean distance to the `other` point.
    fn planar_distance(&self, other: &impl CartesianPoint2d<Num = N>) -> N {
        self.distance_sq(other).sqrt()
    }
}

impl<N: Float + Scalar, T: CartesianPoint2d<Num = N>> CartesianPoint2dFloat<N> for T {}
