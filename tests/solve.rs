//! End-to-end solves through the `ImplicitFn` front end.

use adroot::{solve, ImplicitFn, NewtonConfig, Residual, Scalar, SolveError};

/// `x - asin(y) = 0` with auxiliary outputs `sqrt(x)` and `y²`.
///
/// The root is `y = sin(x)`, and `d(y²)/dx = 2·sin(x)·cos(x)`.
struct AsinSystem;

impl Residual<f64> for AsinSystem {
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

#[test]
fn asin_system_solved_and_seeded() {
    let sol = ImplicitFn::new(AsinSystem)
        .with_guess(&[0.1])
        .solve_seeded(&[0.2], &[(2, 1.0)])
        .unwrap();

    let expected_y = 0.2f64.sin();
    assert!(
        (sol.states()[0] - expected_y).abs() < 1e-12,
        "y should be sin(0.2), got {}",
        sol.states()[0]
    );
    assert!((sol.aux()[0] - 0.2f64.sqrt()).abs() < 1e-15);
    assert!((sol.aux()[1] - expected_y * expected_y).abs() < 1e-12);

    // output(i) addresses states first, then auxiliaries
    assert_eq!(sol.output(0), sol.states()[0]);
    assert_eq!(sol.output(1), sol.aux()[0]);
    assert_eq!(sol.output(2), sol.aux()[1]);

    // seed on y² pulls back to 2·sin(x)·cos(x)
    let expected_sens = 2.0 * 0.2f64.sin() * 0.2f64.cos();
    assert!(
        (sol.adjoint_sens(0) - expected_sens).abs() < 1e-10,
        "sensitivity should be {}, got {}",
        expected_sens,
        sol.adjoint_sens(0)
    );
}

#[test]
fn unseeded_solve_carries_no_sensitivities() {
    let sol = ImplicitFn::new(AsinSystem)
        .with_guess(&[0.1])
        .solve(&[0.2])
        .unwrap();
    assert!(sol.adjoint_sensitivities().is_none());
    assert!((sol.states()[0] - 0.2f64.sin()).abs() < 1e-12);
}

#[test]
fn repeated_solves_are_bitwise_identical() {
    let f = ImplicitFn::new(AsinSystem).with_guess(&[0.1]);
    let a = f.solve_seeded(&[0.2], &[(2, 1.0)]).unwrap();
    let b = f.solve_seeded(&[0.2], &[(2, 1.0)]).unwrap();

    assert_eq!(a.states(), b.states());
    assert_eq!(a.aux(), b.aux());
    assert_eq!(a.adjoint_sensitivities(), b.adjoint_sensitivities());
    assert_eq!(a.iterations, b.iterations);
}

/// `y + y³ = x` has `r_y = 1 + 3y² ≥ 1` everywhere, so a zero guess works.
struct Cubic;

impl Residual<f64> for Cubic {
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
        vec![y[0] + y[0] * y[0] * y[0] - x[0]]
    }
}

#[test]
fn convenience_solve_uses_zero_guess() {
    let sol = solve(Cubic, &[2.0]).unwrap();
    assert!(
        (sol.states()[0] - 1.0).abs() < 1e-12,
        "y + y³ = 2 has root y = 1, got {}",
        sol.states()[0]
    );
}

/// `y² + 1 = 0` has no real root.
struct NoRoot;

impl Residual<f64> for NoRoot {
    fn num_states(&self) -> usize {
        1
    }
    fn num_params(&self) -> usize {
        1
    }
    fn num_outputs(&self) -> usize {
        1
    }
    fn eval<T: Scalar<f64>>(&self, y: &[T], _x: &[T]) -> Vec<T> {
        vec![y[0] * y[0] + T::one()]
    }
}

#[test]
fn rootless_system_reports_no_convergence() {
    let err = ImplicitFn::new(NoRoot)
        .with_guess(&[0.5])
        .with_newton(NewtonConfig {
            max_iter: 8,
            ..NewtonConfig::default()
        })
        .solve(&[0.0])
        .unwrap_err();
    assert!(matches!(err, SolveError::NoConvergence { iterations: 8, .. }));
}

/// `y² = x` has `r_y = 2y`, singular at the zero guess.
struct Sqrt;

impl Residual<f64> for Sqrt {
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
        vec![y[0] * y[0] - x[0]]
    }
}

#[test]
fn singular_jacobian_at_guess_is_reported() {
    let err = ImplicitFn::new(Sqrt).solve(&[1.0]).unwrap_err();
    assert_eq!(err, SolveError::SingularJacobian);
}

/// `sqrt(y) = x` evaluates to NaN for negative iterates.
struct SqrtState;

impl Residual<f64> for SqrtState {
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
        vec![y[0].sqrt() - x[0]]
    }
}

#[test]
fn non_finite_residual_is_reported() {
    let err = ImplicitFn::new(SqrtState)
        .with_guess(&[-1.0])
        .solve(&[2.0])
        .unwrap_err();
    assert_eq!(err, SolveError::NonFinite);
}

#[test]
#[should_panic(expected = "seed index")]
fn out_of_range_seed_index_panics() {
    let _ = ImplicitFn::new(AsinSystem)
        .with_guess(&[0.1])
        .solve_seeded(&[0.2], &[(3, 1.0)]);
}
