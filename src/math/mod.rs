//! Mathematical utilities: least-squares kernels for the bounded fitter.

pub mod ols;

pub use ols::*;
