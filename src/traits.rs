use num_traits::{Float, FromPrimitive, ToPrimitive};
use std::fmt::{Debug, Display};
use std::ops::{AddAssign, MulAssign, SubAssign};

/// Default tolerance for floating-point comparisons
pub(crate) const FLOAT_TOLERANCE: f64 = 1e-10;

/// Scalars the numeric containers ([`Vector`](crate::Vector),
/// [`JaggedMatrix`](crate::JaggedMatrix)) can hold.
///
/// `num_traits::Float` supplies the arithmetic and the elementary
/// functions; the remaining bounds keep formatting and in-place updates
/// available for generic code.
pub trait MathScalar:
    Float + FromPrimitive + ToPrimitive + Debug + Display + AddAssign + SubAssign + MulAssign + 'static
{
}

impl<T> MathScalar for T where
    T: Float
        + FromPrimitive
        + ToPrimitive
        + Debug
        + Display
        + AddAssign
        + SubAssign
        + MulAssign
        + 'static
{
}

/// Check if a float is approximately an integer
#[inline]
pub(crate) fn is_integer(n: f64) -> bool {
    (n - n.round()).abs() < FLOAT_TOLERANCE
}
