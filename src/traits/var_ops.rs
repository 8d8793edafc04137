//! `std::ops` implementations for [`Var<F>`].
//!
//! Each operator records its precomputed partials onto the active tape.

use std::ops::{
    Add, AddAssign, Div, DivAssign, Mul, MulAssign, Neg, Rem, RemAssign, Sub, SubAssign,
};

use crate::float::Float;
use crate::tape::TapeLocal;
use crate::var::{record_binary, record_unary, Var};

impl<F: Float + TapeLocal> Add for Var<F> {
    type Output = Self;
    #[inline]
    fn add(self, rhs: Self) -> Self {
        record_binary(self, rhs, self.value + rhs.value, F::one(), F::one())
    }
}

impl<F: Float + TapeLocal> Sub for Var<F> {
    type Output = Self;
    #[inline]
    fn sub(self, rhs: Self) -> Self {
        record_binary(self, rhs, self.value - rhs.value, F::one(), -F::one())
    }
}

impl<F: Float + TapeLocal> Mul for Var<F> {
    type Output = Self;
    #[inline]
    fn mul(self, rhs: Self) -> Self {
        record_binary(self, rhs, self.value * rhs.value, rhs.value, self.value)
    }
}

impl<F: Float + TapeLocal> Div for Var<F> {
    type Output = Self;
    #[inline]
    fn div(self, rhs: Self) -> Self {
        let inv = F::one() / rhs.value;
        record_binary(
            self,
            rhs,
            self.value * inv,
            inv,
            -self.value * inv * inv,
        )
    }
}

impl<F: Float + TapeLocal> Neg for Var<F> {
    type Output = Self;
    #[inline]
    fn neg(self) -> Self {
        record_unary(self, -self.value, -F::one())
    }
}

impl<F: Float + TapeLocal> Rem for Var<F> {
    type Output = Self;
    #[inline]
    fn rem(self, rhs: Self) -> Self {
        // d(a % b)/da = 1 away from the discontinuities; the divisor
        // contributes -trunc(a/b).
        let q = (self.value / rhs.value).trunc();
        record_binary(self, rhs, self.value % rhs.value, F::one(), -q)
    }
}

impl<F: Float + TapeLocal> AddAssign for Var<F> {
    #[inline]
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl<F: Float + TapeLocal> SubAssign for Var<F> {
    #[inline]
    fn sub_assign(&mut self, rhs: Self) {
        *self = *self - rhs;
    }
}

impl<F: Float + TapeLocal> MulAssign for Var<F> {
    #[inline]
    fn mul_assign(&mut self, rhs: Self) {
        *self = *self * rhs;
    }
}

impl<F: Float + TapeLocal> DivAssign for Var<F> {
    #[inline]
    fn div_assign(&mut self, rhs: Self) {
        *self = *self / rhs;
    }
}

impl<F: Float + TapeLocal> RemAssign for Var<F> {
    #[inline]
    fn rem_assign(&mut self, rhs: Self) {
        *self = *self % rhs;
    }
}

// Comparisons look at the primal value only.

impl<F: Float> PartialEq for Var<F> {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl<F: Float> PartialOrd for Var<F> {
    #[inline]
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        self.value.partial_cmp(&other.value)
    }
}
