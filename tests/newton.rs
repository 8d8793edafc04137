//! Newton iteration behavior: convergence, warm starts, stopping rules.

use adroot::{newton_solve, NewtonConfig, Residual, Scalar};

/// `y³ = x`.
struct Cube;

impl Residual<f64> for Cube {
    fn num_states(&self) -> usize {
        1
    }
    fn num_params(&self) -> usize {
        1
    }
    fn num_outputs(&self) -> usize {
        1
    }
    fn eval<T: Scalar<f64>>(&self, y: &[T], x: &[T]) -> Vec<T> {
        vec![y[0] * y[0] * y[0] - x[0]]
    }
}

#[test]
fn cube_root_converges() {
    let report = newton_solve(&Cube, &[1.0], &[8.0], &NewtonConfig::default()).unwrap();
    assert!(
        (report.y[0] - 2.0).abs() < 1e-12,
        "cube root of 8 should be 2, got {}",
        report.y[0]
    );
    assert!(report.iterations > 0);
    assert!(report.residual_norm < 1e-12);
}

#[test]
fn exact_root_guess_takes_zero_iterations() {
    let report = newton_solve(&Cube, &[2.0], &[8.0], &NewtonConfig::default()).unwrap();
    assert_eq!(report.iterations, 0);
    assert_eq!(report.y, vec![2.0]);
}

/// Coupled 2×2 system with root (1, 1) at x = (2, 1).
struct Pair;

impl Residual<f64> for Pair {
    fn num_states(&self) -> usize {
        2
    }
    fn num_params(&self) -> usize {
        2
    }
    fn num_outputs(&self) -> usize {
        2
    }
    fn eval<T: Scalar<f64>>(&self, y: &[T], x: &[T]) -> Vec<T> {
        vec![y[0] * y[0] + y[1] - x[0], y[0] * y[1] - x[1]]
    }
}

#[test]
fn coupled_system_converges_to_nearby_root() {
    let report = newton_solve(&Pair, &[1.1, 0.9], &[2.0, 1.0], &NewtonConfig::default()).unwrap();
    assert!(
        (report.y[0] - 1.0).abs() < 1e-10 && (report.y[1] - 1.0).abs() < 1e-10,
        "expected root (1, 1), got ({}, {})",
        report.y[0],
        report.y[1]
    );
    assert!(report.iterations <= 10);
}

/// `y = x` solved by a single exact Newton step.
struct Linear;

impl Residual<f64> for Linear {
    fn num_states(&self) -> usize {
        1
    }
    fn num_params(&self) -> usize {
        1
    }
    fn num_outputs(&self) -> usize {
        1
    }
    fn eval<T: Scalar<f64>>(&self, y: &[T], x: &[T]) -> Vec<T> {
        vec![y[0] - x[0]]
    }
}

#[test]
fn step_tolerance_accepts_small_corrections() {
    // With the residual tolerance disabled, the run can only stop through
    // the step-size rule.
    let config = NewtonConfig {
        max_iter: 5,
        tol: 0.0,
        step_tol: 1e-6,
    };
    let report = newton_solve(&Linear, &[1.0 + 1e-8], &[1.0], &config).unwrap();
    assert_eq!(report.iterations, 1);
    assert!(report.residual_norm < 1e-12);
}

#[test]
fn tight_iteration_budget_is_respected() {
    // From y = 16, Newton on y³ = 8 needs several halvings; two steps are
    // not enough.
    let config = NewtonConfig {
        max_iter: 2,
        ..NewtonConfig::default()
    };
    let err = newton_solve(&Cube, &[16.0], &[8.0], &config).unwrap_err();
    assert!(matches!(
        err,
        adroot::SolveError::NoConvergence { iterations: 2, .. }
    ));
}
