use ndarray::{Array2, ArrayView1, Axis};

use super::utils::descending_nan_last;
use crate::data::{Feature, ReferenceSet};
use crate::error::EnrichmentError;

/// Term × sample matrix of enrichment or connectivity scores.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreTable {
    terms: Vec<String>,
    samples: Vec<String>,
    scores: Array2<f64>,
}

impl ScoreTable {
    pub(crate) fn new(terms: Vec<String>, samples: Vec<String>, scores: Array2<f64>) -> Self {
        debug_assert_eq!(scores.dim(), (terms.len(), samples.len()));
        ScoreTable {
            terms,
            samples,
            scores,
        }
    }

    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    pub fn samples(&self) -> &[String] {
        &self.samples
    }

    pub fn scores(&self) -> &Array2<f64> {
        &self.scores
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn get(&self, term: &str, sample: &str) -> Option<f64> {
        let row = self.terms.iter().position(|t| t == term)?;
        let col = self.samples.iter().position(|s| s == sample)?;
        Some(self.scores[[row, col]])
    }

    pub fn column(&self, sample: &str) -> Option<ArrayView1<'_, f64>> {
        let col = self.samples.iter().position(|s| s == sample)?;
        Some(self.scores.column(col))
    }

    /// Reorder rows by descending score of the first sample, NaN last.
    pub(crate) fn sorted_descending(self) -> Self {
        if self.samples.is_empty() {
            return self;
        }
        let first = self.scores.column(0);
        let mut order: Vec<usize> = (0..self.terms.len()).collect();
        order.sort_by(|&a, &b| descending_nan_last(first[a], first[b]));

        ScoreTable {
            terms: order.iter().map(|&i| self.terms[i].clone()).collect(),
            samples: self.samples,
            scores: self.scores.select(Axis(0), &order),
        }
    }

    /// Rescale each row by `1 / (1 - term_size / n_features)`.
    ///
    /// # Arguments
    ///
    /// * `reference` - Reference the table was computed from, for the term sizes
    /// * `n_features` - Number of ranked features the scores were computed on
    pub fn normalized<F: Feature>(
        &self,
        reference: &ReferenceSet<F>,
        n_features: usize,
    ) -> anyhow::Result<ScoreTable> {
        let mut scores = self.scores.clone();
        for (term, mut row) in self.terms.iter().zip(scores.rows_mut()) {
            let members = reference.get(term).ok_or_else(|| EnrichmentError::UnknownTerm {
                term: term.clone(),
                candidates: Vec::new(),
            })?;
            let kmax = 1.0 - members.len() as f64 / n_features as f64;
            row.mapv_inplace(|score| score / kmax);
        }
        Ok(ScoreTable::new(self.terms.clone(), self.samples.clone(), scores))
    }
}

/// Scores of a single term across samples, ordered by descending score.
#[derive(Debug, Clone, PartialEq)]
pub struct FocusedScores {
    pub term: String,
    pub samples: Vec<String>,
    pub scores: Vec<f64>,
}

impl FocusedScores {
    pub(crate) fn new(term: String, samples: Vec<String>, scores: Vec<f64>) -> Self {
        let mut order: Vec<usize> = (0..samples.len()).collect();
        order.sort_by(|&a, &b| descending_nan_last(scores[a], scores[b]));
        FocusedScores {
            term,
            samples: order.iter().map(|&i| samples[i].clone()).collect(),
            scores: order.iter().map(|&i| scores[i]).collect(),
        }
    }

    pub fn get(&self, sample: &str) -> Option<f64> {
        let idx = self.samples.iter().position(|s| s == sample)?;
        Some(self.scores[idx])
    }
}

/// Output of the running-sum engine: a full table or a single focused term.
#[derive(Debug, Clone, PartialEq)]
pub enum ScoreOutput {
    Table(ScoreTable),
    Focused(FocusedScores),
}

impl ScoreOutput {
    /// See [`ScoreTable::normalized`]. Focused outputs cannot be normalized.
    pub fn normalized<F: Feature>(
        &self,
        reference: &ReferenceSet<F>,
        n_features: usize,
    ) -> anyhow::Result<ScoreTable> {
        match self {
            ScoreOutput::Table(table) => table.normalized(reference, n_features),
            ScoreOutput::Focused(_) => Err(EnrichmentError::FocusedNormalization.into()),
        }
    }

    pub fn as_table(&self) -> Option<&ScoreTable> {
        match self {
            ScoreOutput::Table(table) => Some(table),
            ScoreOutput::Focused(_) => None,
        }
    }

    pub fn as_focused(&self) -> Option<&FocusedScores> {
        match self {
            ScoreOutput::Table(_) => None,
            ScoreOutput::Focused(focused) => Some(focused),
        }
    }
}
