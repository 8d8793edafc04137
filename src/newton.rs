use crate::error::SolveError;
use crate::float::Float;
use crate::linalg::lu_solve;
use crate::residual::Residual;
use crate::tape::TapeLocal;
use crate::trace::trace;

/// Configuration for the Newton root-finder.
#[derive(Debug, Clone)]
pub struct NewtonConfig<F> {
    /// Maximum number of Newton steps (default: 50).
    pub max_iter: usize,
    /// Residual norm tolerance: stop when `‖r‖ < tol`.
    pub tol: F,
    /// Step size tolerance: stop when `‖δ‖ < step_tol` (default: 0, disabled).
    pub step_tol: F,
}

impl Default for NewtonConfig<f64> {
    fn default() -> Self {
        NewtonConfig {
            max_iter: 50,
            tol: 1e-12,
            step_tol: 0.0,
        }
    }
}

impl Default for NewtonConfig<f32> {
    fn default() -> Self {
        NewtonConfig {
            max_iter: 50,
            tol: 1e-6,
            step_tol: 0.0,
        }
    }
}

/// Outcome of a converged Newton run.
#[derive(Debug, Clone)]
pub struct NewtonReport<F> {
    /// Solved states.
    pub y: Vec<F>,
    /// Newton steps taken.
    pub iterations: usize,
    /// Residual norm at the solution.
    pub residual_norm: F,
}

/// Full-step Newton iteration on the residual rows of `residual`.
///
/// Per step: record the residual at the current iterate, assemble the m×m
/// state Jacobian `r_y` from seeded reverse sweeps, solve `r_y · δ = -r` by
/// LU with partial pivoting, and update the states.
///
/// # Panics
///
/// Panics if `y0` does not match the residual's declared state count.
pub fn newton_solve<F, R>(
    residual: &R,
    y0: &[F],
    x: &[F],
    config: &NewtonConfig<F>,
) -> Result<NewtonReport<F>, SolveError>
where
    F: Float + TapeLocal,
    R: Residual<F> + ?Sized,
{
    let m = residual.num_states();
    assert_eq!(
        y0.len(),
        m,
        "initial guess length {} != num_states {}",
        y0.len(),
        m
    );

    let mut y = y0.to_vec();

    for iter in 0..=config.max_iter {
        let t = trace(residual, &y, x);
        t.check_finite()?;

        let norm = t.residual_norm();
        if norm < config.tol {
            return Ok(NewtonReport {
                y,
                iterations: iter,
                residual_norm: norm,
            });
        }
        if iter == config.max_iter {
            return Err(SolveError::NoConvergence {
                iterations: iter,
                residual_norm: norm.to_f64().unwrap_or(f64::NAN),
            });
        }

        let (r_y, _) = t.split_jacobian();
        let rhs: Vec<F> = t.residual().iter().map(|&r| -r).collect();
        let delta = lu_solve(&r_y, &rhs).ok_or(SolveError::SingularJacobian)?;

        let mut step_sq = F::zero();
        for i in 0..m {
            step_sq = step_sq + delta[i] * delta[i];
            y[i] = y[i] + delta[i];
        }

        if config.step_tol > F::zero() && step_sq.sqrt() < config.step_tol {
            let t = trace(residual, &y, x);
            t.check_finite()?;
            let norm = t.residual_norm();
            return Ok(NewtonReport {
                y,
                iterations: iter + 1,
                residual_norm: norm,
            });
        }
    }

    unreachable!("newton loop exits via convergence or NoConvergence")
}
