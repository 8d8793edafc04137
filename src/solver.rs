//! Single-call implicit function solver.
//!
//! [`ImplicitFn`] bundles a residual system with a Newton configuration and
//! an initial guess; one call to [`ImplicitFn::solve`] (or
//! [`ImplicitFn::solve_seeded`] when adjoint sensitivities are wanted)
//! produces a [`Solution`] carrying the solved states, the auxiliary outputs
//! evaluated at the root, and optionally the parameter sensitivities.

use crate::error::SolveError;
use crate::float::Float;
use crate::implicit::adjoint_from_trace;
use crate::newton::{newton_solve, NewtonConfig, NewtonReport};
use crate::residual::Residual;
use crate::tape::TapeLocal;
use crate::trace::trace;

/// An implicit function `x ↦ [y(x); g(y(x), x)]` defined by a residual
/// system, ready to be solved at any parameter point.
pub struct ImplicitFn<F, R> {
    residual: R,
    newton: NewtonConfig<F>,
    guess: Vec<F>,
}

impl<F, R> ImplicitFn<F, R>
where
    F: Float + TapeLocal,
    R: Residual<F>,
    NewtonConfig<F>: Default,
{
    /// Wrap a residual system. The initial guess defaults to zero states.
    ///
    /// # Panics
    ///
    /// Panics if the residual declares fewer outputs than states: the first
    /// `num_states` outputs are the residual rows being driven to zero.
    pub fn new(residual: R) -> Self {
        assert!(
            residual.num_outputs() >= residual.num_states(),
            "residual declares {} outputs but needs at least {} residual rows",
            residual.num_outputs(),
            residual.num_states()
        );
        let guess = vec![F::zero(); residual.num_states()];
        ImplicitFn {
            residual,
            newton: NewtonConfig::default(),
            guess,
        }
    }

    /// Replace the initial guess used by the Newton iteration.
    ///
    /// # Panics
    ///
    /// Panics if the guess length differs from the state count.
    pub fn with_guess(mut self, guess: &[F]) -> Self {
        assert_eq!(
            guess.len(),
            self.residual.num_states(),
            "initial guess length {} != num_states {}",
            guess.len(),
            self.residual.num_states()
        );
        self.guess = guess.to_vec();
        self
    }

    /// Replace the Newton configuration.
    pub fn with_newton(mut self, config: NewtonConfig<F>) -> Self {
        self.newton = config;
        self
    }

    /// Solve the residual system at parameter point `x`.
    pub fn solve(&self, x: &[F]) -> Result<Solution<F>, SolveError> {
        let report = newton_solve(&self.residual, &self.guess, x, &self.newton)?;
        let t = trace(&self.residual, &report.y, x);
        let aux = t.values()[self.residual.num_states()..].to_vec();
        Ok(Solution::new(report, aux, None))
    }

    /// Solve at `x`, then pull the given adjoint seeds back to the
    /// parameters through the implicit dependence of the states.
    ///
    /// Each `(index, weight)` pair seeds one solver output; indices `0..m`
    /// address the solved states, `m..` the auxiliary outputs.
    ///
    /// # Panics
    ///
    /// Panics if a seed index is out of range.
    pub fn solve_seeded(&self, x: &[F], seeds: &[(usize, F)]) -> Result<Solution<F>, SolveError> {
        let q = self.residual.num_outputs();
        let mut w = vec![F::zero(); q];
        for &(i, weight) in seeds {
            assert!(i < q, "adjoint seed index {} out of range for {} outputs", i, q);
            w[i] = w[i] + weight;
        }

        let report = newton_solve(&self.residual, &self.guess, x, &self.newton)?;
        let t = trace(&self.residual, &report.y, x);
        let sens = adjoint_from_trace(&t, &w)?;
        let aux = t.values()[self.residual.num_states()..].to_vec();
        Ok(Solution::new(report, aux, Some(sens)))
    }

    pub(crate) fn residual(&self) -> &R {
        &self.residual
    }

    pub(crate) fn guess(&self) -> &[F] {
        &self.guess
    }

    pub(crate) fn newton(&self) -> &NewtonConfig<F> {
        &self.newton
    }
}

/// A solved implicit system: states at the root, auxiliary outputs, and
/// (when seeded) adjoint sensitivities of the parameters.
#[derive(Debug, Clone)]
pub struct Solution<F> {
    states: Vec<F>,
    aux: Vec<F>,
    sens: Option<Vec<F>>,
    /// Newton steps taken.
    pub iterations: usize,
    /// Residual norm at the accepted iterate.
    pub residual_norm: F,
}

impl<F: Float> Solution<F> {
    pub(crate) fn new(report: NewtonReport<F>, aux: Vec<F>, sens: Option<Vec<F>>) -> Self {
        Solution {
            states: report.y,
            aux,
            sens,
            iterations: report.iterations,
            residual_norm: report.residual_norm,
        }
    }

    /// The solved states `y*`.
    pub fn states(&self) -> &[F] {
        &self.states
    }

    /// The auxiliary outputs `g(y*, x)`.
    pub fn aux(&self) -> &[F] {
        &self.aux
    }

    /// Solver output `i`: states first, auxiliary outputs after.
    ///
    /// # Panics
    ///
    /// Panics if `i` is out of range.
    pub fn output(&self, i: usize) -> F {
        if i < self.states.len() {
            self.states[i]
        } else {
            self.aux[i - self.states.len()]
        }
    }

    /// Adjoint sensitivities `x̄`, one per parameter. `None` unless the
    /// solve was seeded.
    pub fn adjoint_sensitivities(&self) -> Option<&[F]> {
        self.sens.as_deref()
    }

    /// Adjoint sensitivity of parameter `j`.
    ///
    /// # Panics
    ///
    /// Panics if the solve was not seeded or `j` is out of range.
    pub fn adjoint_sens(&self, j: usize) -> F {
        match &self.sens {
            Some(sens) => sens[j],
            None => panic!("solution carries no sensitivities; use solve_seeded"),
        }
    }
}

/// Solve a residual system at `x` with default Newton settings and a zero
/// initial guess.
pub fn solve<F, R>(residual: R, x: &[F]) -> Result<Solution<F>, SolveError>
where
    F: Float + TapeLocal,
    R: Residual<F>,
    NewtonConfig<F>: Default,
{
    ImplicitFn::new(residual).solve(x)
}
