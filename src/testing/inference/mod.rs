//! Exact tests on counts.
//!
//! Both tests follow the conventions of the common scientific stacks: one-sided p-values are
//! tail probabilities including the observed value, and two-sided p-values sum the probability of
//! every outcome that is no more likely than the observed one (with a small relative tolerance so
//! that numerically tied outcomes are counted).

pub mod discrete;

pub use discrete::{binomial_test, fisher_exact_test};

/// Relative tolerance used when comparing outcome probabilities for two-sided p-values.
pub(crate) const RELATIVE_TOLERANCE: f64 = 1.0 + 1e-7;
