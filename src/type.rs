use std::fmt::Debug;

use num_traits::Float;

/// A trait for types that can be used for indexed coordinates.
///
/// This trait is sealed and cannot be implemented for external types. Only floating point
/// coordinates are supported, because search bounds start at infinity and distances are compared
/// with a total order.
pub trait IndexableNum: private::Sealed + Float + Default + Debug + Send + Sync + 'static {
    /// Total ordering of two coordinates.
    ///
    /// Coordinates stored in a tree are always finite, so this agrees with `partial_cmp` for
    /// every value that can reach a search.
    fn cmp_coord(&self, other: &Self) -> std::cmp::Ordering;
}

impl IndexableNum for f32 {
    #[inline]
    fn cmp_coord(&self, other: &Self) -> std::cmp::Ordering {
        f32::total_cmp(self, other)
    }
}

impl IndexableNum for f64 {
    #[inline]
    fn cmp_coord(&self, other: &Self) -> std::cmp::Ordering {
        f64::total_cmp(self, other)
    }
}

// https://rust-lang.github.io/api-guidelines/future-proofing.html#sealed-traits-protect-against-downstream-implementations-c-sealed
mod private {
    pub trait Sealed {}

    impl Sealed for f32 {}
    impl Sealed for f64 {}
}
