use crate::float::Float;
use crate::scalar::Scalar;

/// A user-supplied implicit equation system `F: (y, x) → outputs`.
///
/// The first [`num_states`](Residual::num_states) outputs are the residual
/// rows the solver drives to zero; any further outputs are auxiliary
/// observations computed alongside the residual and reported with the
/// solution. `eval` must be pure and differentiable; it is called with plain
/// floats, dual numbers, and reverse-mode variables interchangeably.
///
/// # Example
///
/// Solve `y³ = x` while also reporting `y²`:
///
/// ```
/// use adroot::{Residual, Scalar};
///
/// struct Cube;
///
/// impl Residual<f64> for Cube {
///     fn num_states(&self) -> usize { 1 }
///     fn num_params(&self) -> usize { 1 }
///     fn num_outputs(&self) -> usize { 2 }
///
///     fn eval<T: Scalar<f64>>(&self, y: &[T], x: &[T]) -> Vec<T> {
///         vec![y[0] * y[0] * y[0] - x[0], y[0] * y[0]]
///     }
/// }
/// ```
pub trait Residual<F: Float> {
    /// Number of unknown states `m` (equals the number of residual rows).
    fn num_states(&self) -> usize;

    /// Number of fixed parameters `n`.
    fn num_params(&self) -> usize;

    /// Total number of outputs: `m` residual rows plus any auxiliary rows.
    fn num_outputs(&self) -> usize;

    /// Number of auxiliary output rows.
    fn num_aux(&self) -> usize {
        self.num_outputs() - self.num_states()
    }

    /// Evaluate all outputs at `(y, x)`.
    ///
    /// Must return exactly [`num_outputs`](Residual::num_outputs) values,
    /// residual rows first.
    fn eval<T: Scalar<F>>(&self, y: &[T], x: &[T]) -> Vec<T>;
}
