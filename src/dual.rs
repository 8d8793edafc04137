use std::fmt::{self, Display};

use crate::Float;

/// Forward-mode dual number: a value paired with its tangent.
///
/// `Dual { val, dot }` represents `val + dot·ε` with `ε² = 0`.
#[derive(Clone, Copy, Debug, Default)]
pub struct Dual<F: Float> {
    /// Primal value.
    pub val: F,
    /// Tangent (directional derivative).
    pub dot: F,
}

impl<F: Float> Dual<F> {
    /// Create a dual number from a value and a tangent.
    #[inline]
    pub fn new(val: F, dot: F) -> Self {
        Dual { val, dot }
    }

    /// A constant (zero tangent).
    #[inline]
    pub fn constant(val: F) -> Self {
        Dual {
            val,
            dot: F::zero(),
        }
    }

    /// A differentiation variable (unit tangent).
    #[inline]
    pub fn variable(val: F) -> Self {
        Dual { val, dot: F::one() }
    }

    /// Chain rule: given `f(self.val)` and `f'(self.val)`, produce the result.
    #[inline]
    pub(crate) fn chain(self, f_val: F, df: F) -> Self {
        Dual {
            val: f_val,
            dot: self.dot * df,
        }
    }
}

impl<F: Float> Display for Dual<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} + {}ε", self.val, self.dot)
    }
}
