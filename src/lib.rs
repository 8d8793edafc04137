//! Implicit function solver with tape-based automatic differentiation.
//!
//! `adroot` solves residual systems `r(y, x) = 0` for the states `y` given
//! parameters `x`, and differentiates the solution: because `y(x)` is only
//! defined implicitly, its derivatives come from the Implicit Function
//! Theorem (`dy/dx = -r_y⁻¹ · r_x`) rather than from differentiating a
//! solver loop.
//!
//! A system is described once, generically, by implementing [`Residual`];
//! the same closure body then runs on plain floats (Newton iteration), on
//! recording [`Var`]s (reverse-mode adjoints), and on [`Dual`] numbers
//! (forward-mode tangents). Outputs beyond the residual rows are auxiliary
//! expressions evaluated at the root and differentiated along with it.
//!
//! # Quick start
//!
//! Solve `sin(y) = x` for `y` near `x = 0.2`, observing `y²` as an
//! auxiliary output, and ask for the sensitivity of `y²` to `x`:
//!
//! ```
//! use adroot::{ImplicitFn, Residual, Scalar, SolveError};
//!
//! struct Asin;
//!
//! impl Residual<f64> for Asin {
//!     fn num_states(&self) -> usize { 1 }
//!     fn num_params(&self) -> usize { 1 }
//!     fn num_outputs(&self) -> usize { 2 }
//!     fn eval<T: Scalar<f64>>(&self, y: &[T], x: &[T]) -> Vec<T> {
//!         vec![x[0] - y[0].asin(), y[0] * y[0]]
//!     }
//! }
//!
//! # fn main() -> Result<(), SolveError> {
//! let sol = ImplicitFn::new(Asin)
//!     .with_guess(&[0.1])
//!     .solve_seeded(&[0.2], &[(1, 1.0)])?;
//!
//! assert!((sol.states()[0] - 0.2f64.sin()).abs() < 1e-12);
//! // d(y²)/dx = 2·sin(x)·cos(x)
//! let expected = 2.0 * 0.2f64.sin() * 0.2f64.cos();
//! assert!((sol.adjoint_sens(0) - expected).abs() < 1e-10);
//! # Ok(())
//! # }
//! ```
//!
//! # Feature flags
//!
//! - `sparse` — faer-backed sparse LU variants of the Newton step and the
//!   adjoint solve, for large structurally sparse state Jacobians.

mod dual;
mod error;
mod float;
mod implicit;
mod linalg;
mod newton;
mod residual;
mod scalar;
mod solver;
mod tape;
mod trace;
mod traits;
mod var;

#[cfg(feature = "sparse")]
mod sparse;

pub use dual::Dual;
pub use error::SolveError;
pub use float::Float;
pub use implicit::{adjoint_sensitivities, implicit_jacobian, tangent_sensitivities};
pub use linalg::{lu_factor, lu_solve, LuFactors};
pub use newton::{newton_solve, NewtonConfig, NewtonReport};
pub use residual::Residual;
pub use scalar::Scalar;
pub use solver::{solve, ImplicitFn, Solution};
pub use tape::{Tape, TapeLocal, TapeScope, CONSTANT};
pub use trace::{propagate, trace, Trace};
pub use var::Var;

#[cfg(feature = "sparse")]
pub use sparse::{adjoint_sensitivities_sparse, newton_solve_sparse};
