//! Sensitivities of an implicit solution via the Implicit Function Theorem.
//!
//! With residual rows `r(y, x) = 0` defining `y(x)` and auxiliary rows
//! `g(y, x)` observed at the solution, the solver's outputs are
//! `out(x) = [y(x); g(y(x), x)]` and `dy/dx = -r_y⁻¹ · r_x`.
//!
//! All functions expect `y_star` to already satisfy `r(y_star, x) ≈ 0`;
//! debug builds warn on stderr when it does not.

use crate::error::SolveError;
use crate::float::Float;
use crate::linalg::lu_factor;
use crate::residual::Residual;
use crate::tape::TapeLocal;
use crate::trace::{propagate, trace, Trace};

#[cfg(debug_assertions)]
pub(crate) fn warn_if_not_root<F: Float + TapeLocal>(t: &Trace<F>) {
    let norm = t.residual_norm();
    let threshold = F::from(1e-6).unwrap_or_else(F::epsilon);
    if norm > threshold {
        eprintln!(
            "WARNING: implicit sensitivity requested at a point with ‖r(y*, x)‖ = {:e} > 1e-6; \
             derivatives are only meaningful at a root",
            norm.to_f64().unwrap_or(f64::NAN)
        );
    }
}

/// Adjoint (reverse-mode) sensitivities of the parameters.
///
/// `seeds` weights the solver outputs `[y..., aux...]`; the result is
/// `x̄ = d(seedsᵀ · out)/dx`, accounting for the implicit dependence of `y`
/// on `x`. Computed as two reverse sweeps over one recorded evaluation plus
/// one transpose solve against the state Jacobian:
///
/// 1. sweep the auxiliary seeds: `(g_yᵀ·w_g, g_xᵀ·w_g)`
/// 2. solve `r_yᵀ · λ = w_y + g_yᵀ·w_g`
/// 3. sweep `-λ` on the residual rows: `-r_xᵀ·λ`
///
/// # Panics
///
/// Panics if `y_star`, `x`, or `seeds` disagree with the residual's declared
/// dimensions.
pub fn adjoint_sensitivities<F, R>(
    residual: &R,
    y_star: &[F],
    x: &[F],
    seeds: &[F],
) -> Result<Vec<F>, SolveError>
where
    F: Float + TapeLocal,
    R: Residual<F> + ?Sized,
{
    let t = trace(residual, y_star, x);
    adjoint_from_trace(&t, seeds)
}

/// Adjoint sensitivities from an already-recorded trace at the solution.
pub(crate) fn adjoint_from_trace<F>(t: &Trace<F>, seeds: &[F]) -> Result<Vec<F>, SolveError>
where
    F: Float + TapeLocal,
{
    let m = t.num_states();
    let n = t.num_params();
    let q = t.values().len();
    assert_eq!(seeds.len(), q, "seed vector length {} != num_outputs {}", seeds.len(), q);

    t.check_finite()?;
    #[cfg(debug_assertions)]
    warn_if_not_root(t);

    // Pull the auxiliary seeds back through g alone.
    let mut aux_seeds = vec![F::zero(); q];
    aux_seeds[m..].copy_from_slice(&seeds[m..]);
    let (gy_w, gx_w) = t.pull_back(&aux_seeds);

    // r_yᵀ · λ = w_y + g_yᵀ·w_g
    let (r_y, _) = t.split_jacobian();
    let factors = lu_factor(&r_y).ok_or(SolveError::SingularJacobian)?;
    let v: Vec<F> = (0..m).map(|i| seeds[i] + gy_w[i]).collect();
    let lambda = factors.solve_transpose(&v);

    // x̄ = g_xᵀ·w_g - r_xᵀ·λ
    let mut res_seeds = vec![F::zero(); q];
    for i in 0..m {
        res_seeds[i] = -lambda[i];
    }
    let (_, neg_rx_lambda) = t.pull_back(&res_seeds);

    let x_bar = (0..n).map(|j| gx_w[j] + neg_rx_lambda[j]).collect();
    Ok(x_bar)
}

/// Tangent (forward-mode) sensitivities in the parameter direction `x_dot`.
///
/// Returns `(ẏ, ȯut)` where `ẏ = -r_y⁻¹ · (r_x · ẋ)` and `ȯut` is the
/// tangent of every solver output `[y..., aux...]`.
///
/// # Panics
///
/// Panics on dimension mismatches.
pub fn tangent_sensitivities<F, R>(
    residual: &R,
    y_star: &[F],
    x: &[F],
    x_dot: &[F],
) -> Result<(Vec<F>, Vec<F>), SolveError>
where
    F: Float + TapeLocal,
    R: Residual<F> + ?Sized,
{
    let m = residual.num_states();
    assert_eq!(
        x_dot.len(),
        residual.num_params(),
        "tangent direction length {} != num_params {}",
        x_dot.len(),
        residual.num_params()
    );

    let t = trace(residual, y_star, x);
    t.check_finite()?;
    #[cfg(debug_assertions)]
    warn_if_not_root(&t);

    // r_x · ẋ from a forward pass with frozen states.
    let zero_y = vec![F::zero(); m];
    let (_, dot_frozen) = propagate(residual, y_star, x, &zero_y, x_dot);

    // Solve r_y · ẏ = -(r_x · ẋ).
    let (r_y, _) = t.split_jacobian();
    let factors = lu_factor(&r_y).ok_or(SolveError::SingularJacobian)?;
    let rhs: Vec<F> = dot_frozen[..m].iter().map(|&v| -v).collect();
    let y_dot = factors.solve(&rhs);

    // Second forward pass propagates the full tangent through every output.
    let (_, full_dot) = propagate(residual, y_star, x, &y_dot, x_dot);

    let mut out_dot = Vec::with_capacity(full_dot.len());
    out_dot.extend_from_slice(&y_dot);
    out_dot.extend_from_slice(&full_dot[m..]);
    Ok((y_dot, out_dot))
}

/// The full implicit Jacobian `dy/dx = -r_y⁻¹ · r_x` (m × n).
///
/// One LU factorization of the state block, one back-solve per parameter.
///
/// # Panics
///
/// Panics on dimension mismatches.
pub fn implicit_jacobian<F, R>(residual: &R, y_star: &[F], x: &[F]) -> Result<Vec<Vec<F>>, SolveError>
where
    F: Float + TapeLocal,
    R: Residual<F> + ?Sized,
{
    let t = trace(residual, y_star, x);
    t.check_finite()?;
    #[cfg(debug_assertions)]
    warn_if_not_root(&t);

    let m = t.num_states();
    let n = t.num_params();
    let (r_y, r_x) = t.split_jacobian();
    let factors = lu_factor(&r_y).ok_or(SolveError::SingularJacobian)?;

    let mut result = vec![vec![F::zero(); n]; m];
    for j in 0..n {
        let neg_col: Vec<F> = (0..m).map(|i| -r_x[i][j]).collect();
        let col = factors.solve(&neg_col);
        for i in 0..m {
            result[i][j] = col[i];
        }
    }
    Ok(result)
}
