use std::fmt::{self, Display};

use crate::tape::{self, TapeLocal, CONSTANT};
use crate::Float;

/// Reverse-mode AD variable: a value plus a tape slot.
///
/// `Copy` because the tape lives in a thread-local, not in the struct.
/// All arithmetic records onto the active tape; see [`crate::trace`].
#[derive(Clone, Copy, Debug)]
pub struct Var<F: Float> {
    pub(crate) value: F,
    pub(crate) slot: u32,
}

impl<F: Float> Var<F> {
    /// A constant, not tracked on any tape.
    #[inline]
    pub fn constant(value: F) -> Self {
        Var {
            value,
            slot: CONSTANT,
        }
    }

    /// Build a variable from a value and an already-allocated tape slot.
    #[inline]
    pub fn from_parts(value: F, slot: u32) -> Self {
        Var { value, slot }
    }

    /// The primal value.
    #[inline]
    pub fn value(&self) -> F {
        self.value
    }

    /// The tape slot, or [`CONSTANT`] for untracked constants.
    #[inline]
    pub fn slot(&self) -> u32 {
        self.slot
    }
}

/// Record a unary elemental with value `f_val` and partial `df`.
#[inline]
pub(crate) fn record_unary<F: Float + TapeLocal>(x: Var<F>, f_val: F, df: F) -> Var<F> {
    let slot = tape::with_tape(|t| t.push_unary(x.slot, df));
    Var { value: f_val, slot }
}

/// Record a binary elemental with value `f_val` and partials `dx`, `dy`.
#[inline]
pub(crate) fn record_binary<F: Float + TapeLocal>(
    x: Var<F>,
    y: Var<F>,
    f_val: F,
    dx: F,
    dy: F,
) -> Var<F> {
    let slot = tape::with_tape(|t| t.push_binary(x.slot, dx, y.slot, dy));
    Var { value: f_val, slot }
}

impl<F: Float> Display for Var<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}

impl<F: Float> Default for Var<F> {
    fn default() -> Self {
        Var::constant(F::zero())
    }
}
