//! Recorded residual evaluations.
//!
//! [`trace`] runs a [`Residual`] once under reverse-mode recording and keeps
//! the tape, so that any number of seeded adjoint sweeps can be pulled from
//! the same evaluation point. [`propagate`] is the forward-mode counterpart,
//! pushing a tangent direction through a single dual-number evaluation.

use crate::dual::Dual;
use crate::error::SolveError;
use crate::float::Float;
use crate::residual::Residual;
use crate::tape::{Tape, TapeLocal, TapeScope, CONSTANT};
use crate::var::Var;

/// One recorded evaluation of a residual system at a fixed `(y, x)`.
pub struct Trace<F: Float + TapeLocal> {
    tape: Tape<F>,
    values: Vec<F>,
    out_slots: Vec<u32>,
    num_states: usize,
    num_params: usize,
}

/// Evaluate `residual` at `(y, x)` under reverse-mode recording.
///
/// # Panics
///
/// Panics if slice lengths or the output count disagree with the residual's
/// declared dimensions.
pub fn trace<F, R>(residual: &R, y: &[F], x: &[F]) -> Trace<F>
where
    F: Float + TapeLocal,
    R: Residual<F> + ?Sized,
{
    let m = residual.num_states();
    let n = residual.num_params();
    assert_eq!(y.len(), m, "state slice length {} != num_states {}", y.len(), m);
    assert_eq!(x.len(), n, "param slice length {} != num_params {}", x.len(), n);

    let mut tape = Tape::with_capacity((m + n) * 8);

    // State slots first, then parameter slots.
    let yv: Vec<Var<F>> = y
        .iter()
        .map(|&v| Var::from_parts(v, tape.input(v)))
        .collect();
    let xv: Vec<Var<F>> = x
        .iter()
        .map(|&v| Var::from_parts(v, tape.input(v)))
        .collect();

    let outputs = {
        let _scope = TapeScope::activate(&mut tape);
        residual.eval(&yv, &xv)
    };
    assert_eq!(
        outputs.len(),
        residual.num_outputs(),
        "residual returned {} outputs, declared {}",
        outputs.len(),
        residual.num_outputs()
    );

    Trace {
        values: outputs.iter().map(|o| o.value()).collect(),
        out_slots: outputs.iter().map(|o| o.slot()).collect(),
        tape,
        num_states: m,
        num_params: n,
    }
}

impl<F: Float + TapeLocal> Trace<F> {
    /// All output values, residual rows first.
    pub fn values(&self) -> &[F] {
        &self.values
    }

    /// The residual rows (first `num_states` outputs).
    pub fn residual(&self) -> &[F] {
        &self.values[..self.num_states]
    }

    /// L2 norm of the residual rows.
    pub fn residual_norm(&self) -> F {
        let mut s = F::zero();
        for &r in self.residual() {
            s = s + r * r;
        }
        s.sqrt()
    }

    pub fn num_states(&self) -> usize {
        self.num_states
    }

    pub fn num_params(&self) -> usize {
        self.num_params
    }

    /// Reverse sweep with one adjoint seed per output.
    ///
    /// Returns the `(ȳ, x̄)` adjoint split: the pullback of the seed vector
    /// through this single evaluation (no implicit-function correction).
    pub fn pull_back(&self, seeds: &[F]) -> (Vec<F>, Vec<F>) {
        assert_eq!(
            seeds.len(),
            self.values.len(),
            "seed vector length {} != num_outputs {}",
            seeds.len(),
            self.values.len()
        );

        let seeds: Vec<(u32, F)> = self
            .out_slots
            .iter()
            .zip(seeds.iter())
            .filter(|(&slot, &w)| slot != CONSTANT && w != F::zero())
            .map(|(&slot, &w)| (slot, w))
            .collect();
        let adjoints = self.tape.sweep(&seeds);

        let y_bar = adjoints[..self.num_states].to_vec();
        let x_bar = adjoints[self.num_states..self.num_states + self.num_params].to_vec();
        (y_bar, x_bar)
    }

    /// Row `i` of the full output Jacobian, split as `(∂out_i/∂y, ∂out_i/∂x)`.
    pub fn jacobian_row(&self, i: usize) -> (Vec<F>, Vec<F>) {
        let mut seeds = vec![F::zero(); self.values.len()];
        seeds[i] = F::one();
        self.pull_back(&seeds)
    }

    /// Assemble the m×m state block of the residual Jacobian, one seeded
    /// sweep per residual row, along with the m×n parameter block.
    pub(crate) fn split_jacobian(&self) -> (Vec<Vec<F>>, Vec<Vec<F>>) {
        let m = self.num_states;
        let mut r_y = Vec::with_capacity(m);
        let mut r_x = Vec::with_capacity(m);
        for i in 0..m {
            let (row_y, row_x) = self.jacobian_row(i);
            r_y.push(row_y);
            r_x.push(row_x);
        }
        (r_y, r_x)
    }

    /// Fail with [`SolveError::NonFinite`] if any output is NaN or infinite.
    pub(crate) fn check_finite(&self) -> Result<(), SolveError> {
        if self.values.iter().all(|v| v.is_finite()) {
            Ok(())
        } else {
            Err(SolveError::NonFinite)
        }
    }
}

/// Forward-mode evaluation: push the tangent `(ẏ, ẋ)` through `residual`.
///
/// Returns `(values, tangents)` over all outputs.
///
/// # Panics
///
/// Panics on dimension mismatches, as [`trace`] does.
pub fn propagate<F, R>(residual: &R, y: &[F], x: &[F], y_dot: &[F], x_dot: &[F]) -> (Vec<F>, Vec<F>)
where
    F: Float,
    R: Residual<F> + ?Sized,
{
    let m = residual.num_states();
    let n = residual.num_params();
    assert_eq!(y.len(), m, "state slice length {} != num_states {}", y.len(), m);
    assert_eq!(x.len(), n, "param slice length {} != num_params {}", x.len(), n);
    assert_eq!(y_dot.len(), m, "state tangent length {} != num_states {}", y_dot.len(), m);
    assert_eq!(x_dot.len(), n, "param tangent length {} != num_params {}", x_dot.len(), n);

    let yd: Vec<Dual<F>> = y
        .iter()
        .zip(y_dot.iter())
        .map(|(&v, &d)| Dual::new(v, d))
        .collect();
    let xd: Vec<Dual<F>> = x
        .iter()
        .zip(x_dot.iter())
        .map(|(&v, &d)| Dual::new(v, d))
        .collect();

    let outputs = residual.eval(&yd, &xd);
    assert_eq!(
        outputs.len(),
        residual.num_outputs(),
        "residual returned {} outputs, declared {}",
        outputs.len(),
        residual.num_outputs()
    );

    let values = outputs.iter().map(|o| o.val).collect();
    let tangents = outputs.iter().map(|o| o.dot).collect();
    (values, tangents)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scalar::Scalar;

    struct Product;

    impl Residual<f64> for Product {
        fn num_states(&self) -> usize {
            1
        }
        fn num_params(&self) -> usize {
            2
        }
        fn num_outputs(&self) -> usize {
            2
        }
        fn eval<T: Scalar<f64>>(&self, y: &[T], x: &[T]) -> Vec<T> {
            vec![y[0] * x[0] * x[1], y[0] + x[0]]
        }
    }

    #[test]
    fn pull_back_matches_hand_gradient() {
        let t = trace(&Product, &[2.0], &[3.0, 5.0]);
        assert_eq!(t.values(), &[30.0, 5.0]);

        let (y_bar, x_bar) = t.pull_back(&[1.0, 0.0]);
        assert!((y_bar[0] - 15.0).abs() < 1e-12);
        assert!((x_bar[0] - 10.0).abs() < 1e-12);
        assert!((x_bar[1] - 6.0).abs() < 1e-12);

        let (y_bar, x_bar) = t.pull_back(&[0.0, 1.0]);
        assert!((y_bar[0] - 1.0).abs() < 1e-12);
        assert!((x_bar[0] - 1.0).abs() < 1e-12);
        assert!(x_bar[1].abs() < 1e-12);
    }

    #[test]
    fn propagate_matches_hand_tangent() {
        // d/dt f(y + t·1, x + t·[1, 0]) at t = 0.
        let (values, dots) = propagate(&Product, &[2.0], &[3.0, 5.0], &[1.0], &[1.0, 0.0]);
        assert_eq!(values, vec![30.0, 5.0]);
        assert!((dots[0] - (15.0 + 10.0)).abs() < 1e-12);
        assert!((dots[1] - 2.0).abs() < 1e-12);
    }

    #[test]
    fn sweeps_are_repeatable() {
        let t = trace(&Product, &[2.0], &[3.0, 5.0]);
        let first = t.pull_back(&[1.0, 2.0]);
        let second = t.pull_back(&[1.0, 2.0]);
        assert_eq!(first, second);
    }
}
