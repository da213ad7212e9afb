use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::error::EnrichmentError;

/// Multiple testing correction methods to control for false positives
/// when performing many statistical tests simultaneously.
///
/// The string names follow the `multipletests` conventions (`fdr_bh`, `holm`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CorrectionMethod {
    #[serde(rename = "bonferroni")]
    Bonferroni,
    #[serde(rename = "sidak")]
    Sidak,
    #[serde(rename = "holm")]
    Holm,
    #[serde(rename = "holm-sidak")]
    HolmSidak,
    #[serde(rename = "simes-hochberg")]
    Hochberg,
    /// Benjamini-Hochberg false discovery rate
    #[default]
    #[serde(rename = "fdr_bh")]
    BenjaminiHochberg,
    /// Benjamini-Yekutieli false discovery rate
    #[serde(rename = "fdr_by")]
    BenjaminiYekutieli,
}

impl CorrectionMethod {
    pub const ACCEPTED: [&'static str; 7] = [
        "bonferroni",
        "sidak",
        "holm",
        "holm-sidak",
        "simes-hochberg",
        "fdr_bh",
        "fdr_by",
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CorrectionMethod::Bonferroni => "bonferroni",
            CorrectionMethod::Sidak => "sidak",
            CorrectionMethod::Holm => "holm",
            CorrectionMethod::HolmSidak => "holm-sidak",
            CorrectionMethod::Hochberg => "simes-hochberg",
            CorrectionMethod::BenjaminiHochberg => "fdr_bh",
            CorrectionMethod::BenjaminiYekutieli => "fdr_by",
        }
    }

    /// Adjust `p_values` with this method.
    pub fn adjust(&self, p_values: &[f64]) -> Result<Vec<f64>> {
        match self {
            CorrectionMethod::Bonferroni => bonferroni_correction(p_values),
            CorrectionMethod::Sidak => sidak_correction(p_values),
            CorrectionMethod::Holm => holm_bonferroni_correction(p_values),
            CorrectionMethod::HolmSidak => holm_sidak_correction(p_values),
            CorrectionMethod::Hochberg => hochberg_correction(p_values),
            CorrectionMethod::BenjaminiHochberg => benjamini_hochberg_correction(p_values),
            CorrectionMethod::BenjaminiYekutieli => benjamini_yekutieli_correction(p_values),
        }
    }
}

impl fmt::Display for CorrectionMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CorrectionMethod {
    type Err = EnrichmentError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "bonferroni" => Ok(CorrectionMethod::Bonferroni),
            "sidak" => Ok(CorrectionMethod::Sidak),
            "holm" => Ok(CorrectionMethod::Holm),
            "holm-sidak" => Ok(CorrectionMethod::HolmSidak),
            "simes-hochberg" | "hochberg" => Ok(CorrectionMethod::Hochberg),
            "fdr_bh" | "bh" => Ok(CorrectionMethod::BenjaminiHochberg),
            "fdr_by" | "by" => Ok(CorrectionMethod::BenjaminiYekutieli),
            other => Err(EnrichmentError::invalid_option(
                "correction",
                other,
                &CorrectionMethod::ACCEPTED,
            )),
        }
    }
}

fn validate_p_values(p_values: &[f64]) -> Result<()> {
    if p_values.is_empty() {
        return Err(EnrichmentError::EmptyPValues.into());
    }
    for (index, &value) in p_values.iter().enumerate() {
        if !(0.0..=1.0).contains(&value) {
            return Err(EnrichmentError::InvalidPValue { index, value }.into());
        }
    }
    Ok(())
}

/// Indices of `p_values` in ascending order of p-value.
fn ascending_order(p_values: &[f64]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..p_values.len()).collect();
    order.sort_by(|&a, &b| p_values[a].partial_cmp(&p_values[b]).unwrap_or(Ordering::Equal));
    order
}

/// Apply Bonferroni correction to p-values
///
/// Bonferroni correction is a simple but conservative method that multiplies
/// each p-value by the number of tests.
///
/// # Arguments
/// * `p_values` - A slice of p-values to adjust
///
/// # Returns
/// * `Result<Vec<f64>>` - Vector of adjusted p-values
pub fn bonferroni_correction(p_values: &[f64]) -> Result<Vec<f64>> {
    validate_p_values(p_values)?;
    let n = p_values.len() as f64;
    Ok(p_values.iter().map(|&p| (p * n).min(1.0)).collect())
}

/// Apply Šidák correction, `1 - (1 - p)^n`.
pub fn sidak_correction(p_values: &[f64]) -> Result<Vec<f64>> {
    validate_p_values(p_values)?;
    let n = p_values.len() as i32;
    Ok(p_values.iter().map(|&p| 1.0 - (1.0 - p).powi(n)).collect())
}

/// Apply Benjamini-Hochberg (BH) procedure for controlling false discovery rate
///
/// The BH procedure controls the false discovery rate (FDR), which is the expected
/// proportion of false positives among all rejected null hypotheses.
///
/// # Arguments
/// * `p_values` - A slice of p-values to adjust
///
/// # Returns
/// * `Result<Vec<f64>>` - Vector of adjusted p-values
pub fn benjamini_hochberg_correction(p_values: &[f64]) -> Result<Vec<f64>> {
    validate_p_values(p_values)?;
    Ok(step_up(p_values, 1.0))
}

/// Apply Benjamini-Yekutieli (BY) procedure for controlling false discovery rate under dependence
///
/// The BY procedure is a more conservative variant of the BH procedure that is valid
/// under arbitrary dependence structures among the tests.
pub fn benjamini_yekutieli_correction(p_values: &[f64]) -> Result<Vec<f64>> {
    validate_p_values(p_values)?;
    let c_n: f64 = (1..=p_values.len()).map(|i| 1.0 / i as f64).sum();
    Ok(step_up(p_values, c_n))
}

/// `min(1, c * p_(i) * n / i)` with a running minimum from the largest p-value down.
fn step_up(p_values: &[f64], c: f64) -> Vec<f64> {
    let n = p_values.len();
    let order = ascending_order(p_values);
    let mut adjusted_p_values = vec![0.0; n];
    let mut current_min: f64 = 1.0;

    for i in (0..n).rev() {
        let orig_idx = order[i];
        let rank = i + 1;
        let adjustment = (p_values[orig_idx] * c * n as f64 / rank as f64).min(1.0);
        current_min = adjustment.min(current_min);
        adjusted_p_values[orig_idx] = current_min;
    }

    adjusted_p_values
}

/// Apply Holm-Bonferroni (step-down) method for controlling family-wise error rate
///
/// The Holm procedure is a step-down method that controls the family-wise error rate (FWER)
/// and is uniformly more powerful than the standard Bonferroni correction.
pub fn holm_bonferroni_correction(p_values: &[f64]) -> Result<Vec<f64>> {
    validate_p_values(p_values)?;
    Ok(step_down(p_values, |p, remaining| (p * remaining as f64).min(1.0)))
}

/// Holm step-down procedure with Šidák adjustments.
pub fn holm_sidak_correction(p_values: &[f64]) -> Result<Vec<f64>> {
    validate_p_values(p_values)?;
    Ok(step_down(p_values, |p, remaining| {
        1.0 - (1.0 - p).powi(remaining as i32)
    }))
}

/// Running maximum from the smallest p-value up, `remaining` being `n - i` for the i-th smallest.
fn step_down<A>(p_values: &[f64], adjust: A) -> Vec<f64>
where
    A: Fn(f64, usize) -> f64,
{
    let n = p_values.len();
    let order = ascending_order(p_values);
    let mut adjusted_p_values = vec![0.0; n];
    let mut current_max: f64 = 0.0;

    for (i, &orig_idx) in order.iter().enumerate() {
        current_max = current_max.max(adjust(p_values[orig_idx], n - i));
        adjusted_p_values[orig_idx] = current_max;
    }

    adjusted_p_values
}

/// Apply Hochberg's step-up method for controlling family-wise error rate
///
/// Hochberg's procedure is a step-up method that controls the family-wise error rate (FWER)
/// and is more powerful than Holm's procedure when all tests are independent.
pub fn hochberg_correction(p_values: &[f64]) -> Result<Vec<f64>> {
    validate_p_values(p_values)?;
    let n = p_values.len();
    let order = ascending_order(p_values);
    let mut adjusted_p_values = vec![0.0; n];
    let mut current_min: f64 = 1.0;

    for i in (0..n).rev() {
        let orig_idx = order[i];
        let adjustment = (p_values[orig_idx] * (n - i) as f64).min(1.0);
        current_min = adjustment.min(current_min);
        adjusted_p_values[orig_idx] = current_min;
    }

    Ok(adjusted_p_values)
}
