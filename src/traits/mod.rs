//! Operator and `num_traits` surfaces for the AD scalar types.
//!
//! [`crate::Dual`] and [`crate::Var`] both implement `num_traits::Float` so
//! that residual systems written against [`crate::Scalar`] evaluate unchanged
//! in plain, forward, and reverse mode.

mod dual_float;
mod dual_ops;
mod var_float;
mod var_ops;
