//! The [`Scalar`] trait for writing AD-generic residual systems.
//!
//! A residual body written as `fn eval<T: Scalar<f64>>(...)` evaluates
//! unchanged with plain `f64` (values only), [`Dual<f64>`](crate::Dual)
//! (forward tangents), and [`Var<f64>`](crate::Var) (reverse adjoints).

use std::fmt::{Debug, Display};

use num_traits::{FloatConst, FromPrimitive};

use crate::dual::Dual;
use crate::float::Float;
use crate::tape::TapeLocal;
use crate::var::Var;

/// An AD-capable scalar over the base float `F`.
pub trait Scalar<F: Float>:
    num_traits::Float + FloatConst + FromPrimitive + Copy + Default + Debug + Display + 'static
{
    /// Lift a plain float into this scalar as a constant (zero derivative).
    fn lift(value: F) -> Self;

    /// Extract the primal value.
    fn value(&self) -> F;
}

impl Scalar<f32> for f32 {
    #[inline]
    fn lift(value: f32) -> Self {
        value
    }

    #[inline]
    fn value(&self) -> f32 {
        *self
    }
}

impl Scalar<f64> for f64 {
    #[inline]
    fn lift(value: f64) -> Self {
        value
    }

    #[inline]
    fn value(&self) -> f64 {
        *self
    }
}

impl<F: Float> Scalar<F> for Dual<F> {
    #[inline]
    fn lift(value: F) -> Self {
        Dual::constant(value)
    }

    #[inline]
    fn value(&self) -> F {
        self.val
    }
}

impl<F: Float + TapeLocal> Scalar<F> for Var<F> {
    #[inline]
    fn lift(value: F) -> Self {
        Var::constant(value)
    }

    #[inline]
    fn value(&self) -> F {
        self.value
    }
}
