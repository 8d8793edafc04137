use thiserror::Error;

/// Numeric failure during an implicit solve or a sensitivity computation.
///
/// Shape mismatches between a [`Residual`](crate::Residual)'s declared
/// dimensions and the data handed to the solver are programmer errors and
/// panic instead.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SolveError {
    /// Newton iteration exhausted its iteration budget without driving the
    /// residual below tolerance.
    #[error("newton iteration stopped after {iterations} iterations with residual norm {residual_norm:e}")]
    NoConvergence {
        iterations: usize,
        residual_norm: f64,
    },

    /// The state block of the residual Jacobian is singular (or numerically
    /// indistinguishable from singular).
    #[error("state jacobian of the residual system is singular")]
    SingularJacobian,

    /// The residual or one of its derivatives evaluated to NaN or infinity.
    #[error("residual evaluation produced a non-finite value")]
    NonFinite,
}
