//! Distance metrics for proximity queries.
//!
//! All searches compare and prune in the units returned by the metric. The default,
//! [`SquaredEuclidean`], never takes a square root: squaring is monotonic over non-negative
//! values, so the ordering of neighbors is the same as with true Euclidean distance.

use crate::r#type::IndexableNum;

/// A trait for calculating the dissimilarity between two points.
pub trait DistanceMetric<N: IndexableNum> {
    /// Distance between two points of equal dimension.
    fn distance(&self, a: &[N], b: &[N]) -> N;

    /// Lower bound on the distance from a query to any point on the far side of a splitting
    /// plane, given the signed offset `delta` between the query and the plane along the
    /// splitting axis.
    ///
    /// Must be expressed in the same units as [`distance`][DistanceMetric::distance].
    fn axis_distance(&self, delta: N) -> N;
}

/// Squared Euclidean distance, the default metric.
///
/// `distance(a, b) = Σ (a[i] - b[i])²`
#[derive(Debug, Clone, Copy, Default)]
pub struct SquaredEuclidean;

impl<N: IndexableNum> DistanceMetric<N> for SquaredEuclidean {
    #[inline]
    fn distance(&self, a: &[N], b: &[N]) -> N {
        a.iter().zip(b).fold(N::zero(), |acc, (&x, &y)| {
            let d = x - y;
            acc + d * d
        })
    }

    #[inline]
    fn axis_distance(&self, delta: N) -> N {
        delta * delta
    }
}

/// Manhattan (taxicab) distance.
///
/// `distance(a, b) = Σ |a[i] - b[i]|`
#[derive(Debug, Clone, Copy, Default)]
pub struct Manhattan;

impl<N: IndexableNum> DistanceMetric<N> for Manhattan {
    #[inline]
    fn distance(&self, a: &[N], b: &[N]) -> N {
        a.iter()
            .zip(b)
            .fold(N::zero(), |acc, (&x, &y)| acc + (x - y).abs())
    }

    #[inline]
    fn axis_distance(&self, delta: N) -> N {
        delta.abs()
    }
}

impl<N: IndexableNum, M: DistanceMetric<N> + ?Sized> DistanceMetric<N> for &M {
    #[inline]
    fn distance(&self, a: &[N], b: &[N]) -> N {
        (**self).distance(a, b)
    }

    #[inline]
    fn axis_distance(&self, delta: N) -> N {
        (**self).axis_distance(delta)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn squared_euclidean_has_no_square_root() {
        let d: f64 = SquaredEuclidean.distance(&[4., 8.], &[6., 8.]);
        assert_eq!(d, 4.);
        let d: f64 = SquaredEuclidean.distance(&[4., 8.], &[5., 4.]);
        assert_eq!(d, 17.);
    }

    #[test]
    fn squared_euclidean_is_commutative() {
        let a = [1.5f64, -2., 7.25];
        let b = [-3f64, 0.5, 2.];
        assert_eq!(
            SquaredEuclidean.distance(&a, &b),
            SquaredEuclidean.distance(&b, &a)
        );
        assert_eq!(SquaredEuclidean.distance(&a, &a), 0.);
    }

    #[test]
    fn manhattan_distance() {
        let d: f32 = Manhattan.distance(&[1., 1.], &[4., -3.]);
        assert_eq!(d, 7.);
        assert_eq!(Manhattan.axis_distance(-2.5f32), 2.5);
    }

    #[test]
    fn axis_distance_matches_units() {
        // a point directly across the plane is exactly the plane bound away
        let a = [0f64, 3.];
        let b = [0f64, -1.];
        assert_eq!(
            SquaredEuclidean.axis_distance(a[1] - b[1]),
            SquaredEuclidean.distance(&a, &b)
        );
    }
}
