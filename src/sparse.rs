//! Sparse direct linear-solver backend (f64 only, `sparse` feature).
//!
//! Drop-in counterparts of the dense Newton step and adjoint solve that
//! route the state Jacobian through faer's sparse LU instead of the dense
//! factorization in [`crate::linalg`]. Worthwhile when `r_y` is large and
//! structurally sparse (banded systems, discretized operators); for the
//! small dense blocks typical of test problems the dense path wins.

use std::panic::{catch_unwind, AssertUnwindSafe};

use faer::linalg::solvers::SpSolver;
use faer::sparse::SparseColMat;
use faer::Col;

use crate::error::SolveError;
#[cfg(debug_assertions)]
use crate::implicit::warn_if_not_root;
use crate::newton::{NewtonConfig, NewtonReport};
use crate::residual::Residual;
use crate::solver::{ImplicitFn, Solution};
use crate::trace::{trace, Trace};

/// Sparse LU factors of the state Jacobian.
struct SparseFactors {
    lu: faer::sparse::linalg::solvers::Lu<usize, f64>,
    n: usize,
}

/// Assemble `rows` into compressed-column form, dropping structural zeros,
/// and factorize.
///
/// Returns `None` on singularity. faer's sparse LU panics on singular input
/// rather than returning an error, hence the `catch_unwind`.
fn sparse_factor(rows: &[Vec<f64>]) -> Option<SparseFactors> {
    let n = rows.len();
    let mut triplets = Vec::new();
    for (i, row) in rows.iter().enumerate() {
        debug_assert_eq!(row.len(), n);
        for (j, &v) in row.iter().enumerate() {
            if v != 0.0 {
                triplets.push((i, j, v));
            }
        }
    }

    let mat = SparseColMat::<usize, f64>::try_new_from_triplets(n, n, &triplets).ok()?;
    let lu = catch_unwind(AssertUnwindSafe(|| mat.sp_lu().ok()))
        .ok()
        .flatten()?;
    Some(SparseFactors { lu, n })
}

impl SparseFactors {
    fn solve(&self, b: &[f64]) -> Vec<f64> {
        let rhs = Col::<f64>::from_fn(self.n, |i| b[i]);
        let sol = self.lu.solve(&rhs);
        (0..self.n).map(|i| sol[i]).collect()
    }

    fn solve_transpose(&self, b: &[f64]) -> Vec<f64> {
        let rhs = Col::<f64>::from_fn(self.n, |i| b[i]);
        let sol = self.lu.solve_transpose(&rhs);
        (0..self.n).map(|i| sol[i]).collect()
    }
}

/// [`newton_solve`](crate::newton_solve) with the Newton step solved by
/// faer's sparse LU.
///
/// # Panics
///
/// Panics if `y0` does not match the residual's declared state count.
pub fn newton_solve_sparse<R>(
    residual: &R,
    y0: &[f64],
    x: &[f64],
    config: &NewtonConfig<f64>,
) -> Result<NewtonReport<f64>, SolveError>
where
    R: Residual<f64> + ?Sized,
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
                residual_norm: norm,
            });
        }

        let (r_y, _) = t.split_jacobian();
        let factors = sparse_factor(&r_y).ok_or(SolveError::SingularJacobian)?;
        let rhs: Vec<f64> = t.residual().iter().map(|&r| -r).collect();
        let delta = factors.solve(&rhs);

        let mut step_sq = 0.0;
        for i in 0..m {
            step_sq += delta[i] * delta[i];
            y[i] += delta[i];
        }

        if config.step_tol > 0.0 && step_sq.sqrt() < config.step_tol {
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

/// [`adjoint_sensitivities`](crate::adjoint_sensitivities) with the
/// transpose solve routed through faer's sparse LU.
///
/// # Panics
///
/// Panics on dimension mismatches.
pub fn adjoint_sensitivities_sparse<R>(
    residual: &R,
    y_star: &[f64],
    x: &[f64],
    seeds: &[f64],
) -> Result<Vec<f64>, SolveError>
where
    R: Residual<f64> + ?Sized,
{
    let t = trace(residual, y_star, x);
    adjoint_from_trace_sparse(&t, seeds)
}

fn adjoint_from_trace_sparse(t: &Trace<f64>, seeds: &[f64]) -> Result<Vec<f64>, SolveError> {
    let m = t.num_states();
    let n = t.num_params();
    let q = t.values().len();
    assert_eq!(seeds.len(), q, "seed vector length {} != num_outputs {}", seeds.len(), q);

    t.check_finite()?;
    #[cfg(debug_assertions)]
    warn_if_not_root(t);

    let mut aux_seeds = vec![0.0; q];
    aux_seeds[m..].copy_from_slice(&seeds[m..]);
    let (gy_w, gx_w) = t.pull_back(&aux_seeds);

    // r_yᵀ · λ = w_y + g_yᵀ·w_g
    let (r_y, _) = t.split_jacobian();
    let factors = sparse_factor(&r_y).ok_or(SolveError::SingularJacobian)?;
    let v: Vec<f64> = (0..m).map(|i| seeds[i] + gy_w[i]).collect();
    let lambda = factors.solve_transpose(&v);

    // x̄ = g_xᵀ·w_g - r_xᵀ·λ
    let mut res_seeds = vec![0.0; q];
    for i in 0..m {
        res_seeds[i] = -lambda[i];
    }
    let (_, neg_rx_lambda) = t.pull_back(&res_seeds);

    Ok((0..n).map(|j| gx_w[j] + neg_rx_lambda[j]).collect())
}

impl<R: Residual<f64>> ImplicitFn<f64, R> {
    /// [`solve`](ImplicitFn::solve) with the Newton step on faer's sparse LU.
    pub fn solve_sparse(&self, x: &[f64]) -> Result<Solution<f64>, SolveError> {
        let report = newton_solve_sparse(self.residual(), self.guess(), x, self.newton())?;
        let t = trace(self.residual(), &report.y, x);
        let aux = t.values()[self.residual().num_states()..].to_vec();
        Ok(Solution::new(report, aux, None))
    }

    /// [`solve_seeded`](ImplicitFn::solve_seeded) with both the Newton step
    /// and the adjoint transpose solve on faer's sparse LU.
    ///
    /// # Panics
    ///
    /// Panics if a seed index is out of range.
    pub fn solve_seeded_sparse(
        &self,
        x: &[f64],
        seeds: &[(usize, f64)],
    ) -> Result<Solution<f64>, SolveError> {
        let q = self.residual().num_outputs();
        let mut w = vec![0.0; q];
        for &(i, weight) in seeds {
            assert!(i < q, "adjoint seed index {} out of range for {} outputs", i, q);
            w[i] += weight;
        }

        let report = newton_solve_sparse(self.residual(), self.guess(), x, self.newton())?;
        let t = trace(self.residual(), &report.y, x);
        let sens = adjoint_from_trace_sparse(&t, &w)?;
        let aux = t.values()[self.residual().num_states()..].to_vec();
        Ok(Solution::new(report, aux, Some(sens)))
    }
}
