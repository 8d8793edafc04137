//! Solve `x - asin(y) = 0` for `y` and pull an adjoint seed on the `y²`
//! auxiliary output back to the parameter.
//!
//! At the root `y = sin(x)`, so with `x = 0.2` the solver should recover
//! `sin(0.2)` and the seeded sensitivity `d(y²)/dx = 2·sin(x)·cos(x)`.
//!
//! ```text
//! cargo run --example implicit_asin
//! ```

use adroot::{ImplicitFn, Residual, Scalar, SolveError};

struct AsinResidual;

impl Residual<f64> for AsinResidual {
    fn num_states(&self) -> usize {
        1
    }
    fn num_params(&self) -> usize {
        1
    }
    fn num_outputs(&self) -> usize {
        3
    }
    fn eval<T: Scalar<f64>>(&self, y: &[T], x: &[T]) -> Vec<T> {
        vec![x[0] - y[0].asin(), x[0].sqrt(), y[0] * y[0]]
    }
}

fn main() -> Result<(), SolveError> {
    let sol = ImplicitFn::new(AsinResidual)
        .with_guess(&[0.1])
        .solve_seeded(&[0.2], &[(2, 1.0)])?;

    println!("sin(0.2) = {}", 0.2f64.sin());
    println!("y = {}", sol.output(0));
    println!("aux1 = {}", sol.output(1));
    println!("aux2 = {}", sol.output(2));
    println!("{}", sol.adjoint_sens(0));

    Ok(())
}
