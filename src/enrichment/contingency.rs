use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::data::{Feature, FeatureSet, ReferenceSet};
use crate::error::EnrichmentError;
use crate::testing::inference::{binomial_test, fisher_exact_test};
use crate::testing::{Alternative, CorrectionMethod};

/// Per-term test run on the overlap between the object and a reference term.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContingencyKernel {
    /// `n_inter` successes out of `n_set` trials at rate `n_set / N`.
    Binomial,
    /// Fisher's exact test on the 2x2 overlap table.
    Fisher,
}

/// Options of a contingency calculation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContingencyOptions {
    pub correction: CorrectionMethod,
    pub alternative: Alternative,
    /// Keep only the `focus` most significant rows.
    pub focus: Option<usize>,
}

impl Default for ContingencyOptions {
    fn default() -> Self {
        ContingencyOptions {
            correction: CorrectionMethod::BenjaminiHochberg,
            alternative: Alternative::Greater,
            focus: None,
        }
    }
}

/// One row of an [`EnrichmentTable`].
#[derive(Debug, Clone, PartialEq)]
pub struct OverlapRow<F> {
    pub term: String,
    pub p_value: f64,
    pub adjusted_p_value: f64,
    pub overlap: FeatureSet<F>,
    /// Size of the overlap.
    pub hits: usize,
    /// Size of the (adjusted) term.
    pub total: usize,
}

/// Terms with a non-empty overlap, ascending by raw p-value.
#[derive(Debug, Clone, PartialEq)]
pub struct EnrichmentTable<F> {
    rows: Vec<OverlapRow<F>>,
}

impl<F> Default for EnrichmentTable<F> {
    fn default() -> Self {
        EnrichmentTable { rows: Vec::new() }
    }
}

impl<F: Feature> EnrichmentTable<F> {
    pub const COLUMNS: [&'static str; 5] = [
        "p value",
        "adjusted p value",
        "overlap",
        "hit No.",
        "total No.",
    ];

    pub fn columns(&self) -> &'static [&'static str] {
        &Self::COLUMNS
    }

    pub fn rows(&self) -> &[OverlapRow<F>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn terms(&self) -> Vec<&str> {
        self.rows.iter().map(|row| row.term.as_str()).collect()
    }

    pub fn get(&self, term: &str) -> Option<&OverlapRow<F>> {
        self.rows.iter().find(|row| row.term == term)
    }

    /// Rows whose adjusted p-value is below `alpha`.
    pub fn significant(&self, alpha: f64) -> impl Iterator<Item = &OverlapRow<F>> {
        self.rows.iter().filter(move |row| row.adjusted_p_value < alpha)
    }
}

/// Test every reference term for over-representation in `object`.
///
/// # Arguments
///
/// * `object` - Query set, already intersected with the universe
/// * `reference` - Reference adjusted to the same universe
/// * `n_whole` - Size of the universe
/// * `kernel` - Test run per term
/// * `options` - Correction, alternative and truncation
pub fn calc<F: Feature>(
    object: &FeatureSet<F>,
    reference: &ReferenceSet<F>,
    n_whole: usize,
    kernel: ContingencyKernel,
    options: &ContingencyOptions,
) -> anyhow::Result<EnrichmentTable<F>> {
    debug!(
        "{:?} test of {} features against {} terms (N = {}, {}, {})",
        kernel,
        object.len(),
        reference.len(),
        n_whole,
        options.alternative,
        options.correction
    );

    let mut rows = Vec::with_capacity(reference.len());
    for (term, members) in reference {
        let overlap: FeatureSet<F> = object.intersection(members).cloned().collect();
        if overlap.is_empty() {
            continue;
        }
        let hits = overlap.len();
        let total = members.len();

        let p_value = match kernel {
            ContingencyKernel::Binomial => {
                let rate = total as f64 / n_whole as f64;
                binomial_test(hits as u64, total as u64, rate, options.alternative)?.p_value
            }
            ContingencyKernel::Fisher => {
                let table = overlap_table(term, hits, total, object.len(), n_whole)?;
                fisher_exact_test(table, options.alternative)?.p_value
            }
        };

        rows.push(OverlapRow {
            term: term.clone(),
            p_value,
            adjusted_p_value: p_value,
            overlap,
            hits,
            total,
        });
    }

    if rows.is_empty() {
        warn!("No reference term overlaps the object; returning an empty table");
        return Ok(EnrichmentTable::default());
    }

    let raw: Vec<f64> = rows.iter().map(|row| row.p_value).collect();
    let adjusted = options.correction.adjust(&raw)?;
    for (row, q) in rows.iter_mut().zip(adjusted) {
        row.adjusted_p_value = q;
    }

    rows.sort_by(|a, b| a.p_value.total_cmp(&b.p_value));
    if let Some(focus) = options.focus {
        rows.truncate(focus);
    }

    Ok(EnrichmentTable { rows })
}

/// `[[n_inter, n_set - n_inter], [n_obj - n_inter, (N - n_obj) - (n_set - n_inter)]]`
fn overlap_table(
    term: &str,
    n_inter: usize,
    n_set: usize,
    n_obj: usize,
    n_whole: usize,
) -> anyhow::Result<[[u64; 2]; 2]> {
    let cells = [
        n_inter as i64,
        n_set as i64 - n_inter as i64,
        n_obj as i64 - n_inter as i64,
        (n_whole as i64 - n_obj as i64) - (n_set as i64 - n_inter as i64),
    ];
    if let Some(negative) = cells.iter().find(|&&c| c < 0) {
        return Err(EnrichmentError::InvalidContingencyTable {
            term: term.to_string(),
            reason: format!(
                "negative cell {} (object of {} features in a universe of {}); \
                 adjust the object first",
                negative, n_obj, n_whole
            ),
        }
        .into());
    }
    Ok([
        [cells[0] as u64, cells[1] as u64],
        [cells[2] as u64, cells[3] as u64],
    ])
}
