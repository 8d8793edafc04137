//! Cross-checks between adjoint, tangent, finite-difference, and
//! hand-derived implicit sensitivities.

use adroot::{
    adjoint_sensitivities, implicit_jacobian, newton_solve, tangent_sensitivities, NewtonConfig,
    Residual, Scalar, SolveError,
};
use approx::assert_relative_eq;

/// Two coupled states with two auxiliary observations:
///
///   r0 = y0² + y1 - x0
///   r1 = y0·y1 - x1
///   g0 = y0·x0
///   g1 = y1 + x1
///
/// At x = (2, 1) the root near (1, 1) is exactly y* = (1, 1), where
///
///   r_y = [[2, 1], [1, 1]],  r_x = -I,  dy/dx = r_y⁻¹ = [[1, -1], [-1, 2]]
struct Coupled;

impl Residual<f64> for Coupled {
    fn num_states(&self) -> usize {
        2
    }
    fn num_params(&self) -> usize {
        2
    }
    fn num_outputs(&self) -> usize {
        4
    }
    fn eval<T: Scalar<f64>>(&self, y: &[T], x: &[T]) -> Vec<T> {
        vec![
            y[0] * y[0] + y[1] - x[0],
            y[0] * y[1] - x[1],
            y[0] * x[0],
            y[1] + x[1],
        ]
    }
}

const X: [f64; 2] = [2.0, 1.0];
const Y_STAR: [f64; 2] = [1.0, 1.0];

#[test]
fn implicit_jacobian_matches_hand_derivation() {
    let jac = implicit_jacobian(&Coupled, &Y_STAR, &X).unwrap();
    let expected = [[1.0, -1.0], [-1.0, 2.0]];
    for i in 0..2 {
        for j in 0..2 {
            assert_relative_eq!(jac[i][j], expected[i][j], epsilon = 1e-12);
        }
    }
}

#[test]
fn adjoint_seeds_match_hand_derivation() {
    // Seed on solved state y0: x̄ = row 0 of dy/dx.
    let sens = adjoint_sensitivities(&Coupled, &Y_STAR, &X, &[1.0, 0.0, 0.0, 0.0]).unwrap();
    assert_relative_eq!(sens[0], 1.0, epsilon = 1e-12);
    assert_relative_eq!(sens[1], -1.0, epsilon = 1e-12);

    // Seed on g0 = y0·x0: d(g0)/dx0 = y0 + x0·dy0/dx0 = 3, d(g0)/dx1 = x0·dy0/dx1 = -2.
    let sens = adjoint_sensitivities(&Coupled, &Y_STAR, &X, &[0.0, 0.0, 1.0, 0.0]).unwrap();
    assert_relative_eq!(sens[0], 3.0, epsilon = 1e-12);
    assert_relative_eq!(sens[1], -2.0, epsilon = 1e-12);

    // Seed on g1 = y1 + x1: d(g1)/dx = (dy1/dx0, dy1/dx1 + 1) = (-1, 3).
    let sens = adjoint_sensitivities(&Coupled, &Y_STAR, &X, &[0.0, 0.0, 0.0, 1.0]).unwrap();
    assert_relative_eq!(sens[0], -1.0, epsilon = 1e-12);
    assert_relative_eq!(sens[1], 3.0, epsilon = 1e-12);
}

#[test]
fn tangent_columns_match_implicit_jacobian() {
    let jac = implicit_jacobian(&Coupled, &Y_STAR, &X).unwrap();
    for j in 0..2 {
        let mut dir = [0.0; 2];
        dir[j] = 1.0;
        let (y_dot, _) = tangent_sensitivities(&Coupled, &Y_STAR, &X, &dir).unwrap();
        for i in 0..2 {
            assert!(
                (y_dot[i] - jac[i][j]).abs() < 1e-12,
                "tangent column {} row {} = {}, jacobian says {}",
                j,
                i,
                y_dot[i],
                jac[i][j]
            );
        }
    }
}

#[test]
fn adjoint_and_tangent_agree_on_pairings() {
    // For any seed vector w and direction d, wᵀ·(dout/dx)·d is the same
    // whether contracted from the left (adjoint) or the right (tangent).
    let w = [0.3, -0.7, 1.1, 0.5];
    let d = [0.9, -0.4];

    let x_bar = adjoint_sensitivities(&Coupled, &Y_STAR, &X, &w).unwrap();
    let left: f64 = x_bar.iter().zip(d.iter()).map(|(a, b)| a * b).sum();

    let (_, out_dot) = tangent_sensitivities(&Coupled, &Y_STAR, &X, &d).unwrap();
    let right: f64 = w.iter().zip(out_dot.iter()).map(|(a, b)| a * b).sum();

    assert!(
        (left - right).abs() < 1e-12,
        "adjoint pairing {} != tangent pairing {}",
        left,
        right
    );
}

#[test]
fn tangent_matches_finite_differences() {
    let h = 1e-6;
    let config = NewtonConfig::default();

    for j in 0..2 {
        let mut dir = [0.0; 2];
        dir[j] = 1.0;
        let (_, out_dot) = tangent_sensitivities(&Coupled, &Y_STAR, &X, &dir).unwrap();

        // Re-solve at perturbed parameters, warm-started from y*.
        let mut x_plus = X;
        x_plus[j] += h;
        let plus = newton_solve(&Coupled, &Y_STAR, &x_plus, &config).unwrap();
        let mut x_minus = X;
        x_minus[j] -= h;
        let minus = newton_solve(&Coupled, &Y_STAR, &x_minus, &config).unwrap();

        for i in 0..2 {
            let fd = (plus.y[i] - minus.y[i]) / (2.0 * h);
            assert!(
                (out_dot[i] - fd).abs() < 1e-6,
                "state {} direction {}: tangent {}, finite difference {}",
                i,
                j,
                out_dot[i],
                fd
            );
        }
    }
}

/// The state never influences the residual, so `r_y ≡ 0`.
struct Degenerate;

impl Residual<f64> for Degenerate {
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
        vec![(y[0] - y[0]) * x[0]]
    }
}

#[test]
fn degenerate_state_jacobian_is_singular() {
    let err = adjoint_sensitivities(&Degenerate, &[0.0], &[1.0], &[1.0]).unwrap_err();
    assert_eq!(err, SolveError::SingularJacobian);

    let err = tangent_sensitivities(&Degenerate, &[0.0], &[1.0], &[1.0]).unwrap_err();
    assert_eq!(err, SolveError::SingularJacobian);

    let err = implicit_jacobian(&Degenerate, &[0.0], &[1.0]).unwrap_err();
    assert_eq!(err, SolveError::SingularJacobian);
}
