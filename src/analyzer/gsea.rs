use serde::{Deserialize, Serialize};

use crate::analyzer::{Calculable, Fittable, ReferenceState};
use crate::data::{Adjustable, Feature, ProfileMatrix, ReferenceSet};
use crate::enrichment::gsea::{self, Algorithm, Process, RunningSum, ScoreMethod};
use crate::enrichment::results::{ScoreOutput, ScoreTable};
use crate::error::EnrichmentError;

/// Options of a GSEA calculation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GseaOptions {
    pub method: ScoreMethod,
    /// Exponent of the `|value|` weights.
    pub alpha: f64,
}

impl Default for GseaOptions {
    fn default() -> Self {
        GseaOptions {
            method: ScoreMethod::Standard,
            alpha: 0.0,
        }
    }
}

/// Options of an ssGSEA calculation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SsGseaOptions {
    pub method: ScoreMethod,
    /// Exponent of the rank weights.
    pub alpha: f64,
    /// Score only this term (focused mode); every term when `None` (exploratory mode).
    pub focus_term: Option<String>,
}

impl Default for SsGseaOptions {
    fn default() -> Self {
        SsGseaOptions {
            method: ScoreMethod::Standard,
            alpha: 0.25,
            focus_term: None,
        }
    }
}

/// Last output of a running-sum analyzer with the data needed to post-process it.
#[derive(Debug, Clone)]
struct RunningSumResult<F> {
    output: ScoreOutput,
    running_sums: Vec<RunningSum<F>>,
    n_features: usize,
}

fn normalize<F: Feature>(
    result: Option<&RunningSumResult<F>>,
    reference: &ReferenceSet<F>,
    n_features: Option<usize>,
) -> anyhow::Result<ScoreTable> {
    let result = result.ok_or(EnrichmentError::NoResult)?;
    result
        .output
        .normalized(reference, n_features.unwrap_or(result.n_features))
}

/// Gene set enrichment analysis of ranked profiles.
#[derive(Debug, Clone)]
pub struct Gsea<F: Feature> {
    state: ReferenceState<F, ReferenceSet<F>>,
    result: Option<RunningSumResult<F>>,
}

impl<F: Feature> Default for Gsea<F> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F: Feature> Gsea<F> {
    pub fn new() -> Self {
        Gsea {
            state: ReferenceState::default(),
            result: None,
        }
    }

    pub fn result(&self) -> Option<&ScoreTable> {
        self.result.as_ref().and_then(|r| r.output.as_table())
    }

    /// Running sums of every sample of the last calculation.
    pub fn running_sums(&self) -> Option<&[RunningSum<F>]> {
        self.result.as_ref().map(|r| r.running_sums.as_slice())
    }

    /// Rescale the last scores by `1 / (1 - term_size / n)`.
    ///
    /// `n` defaults to the number of features of the last adjusted profile.
    pub fn normalize_score(&self, n_features: Option<usize>) -> anyhow::Result<ScoreTable> {
        normalize(self.result.as_ref(), self.state.reference()?, n_features)
    }
}

impl<F: Feature> Fittable<F> for Gsea<F> {
    type Ref = ReferenceSet<F>;

    fn state(&self) -> &ReferenceState<F, Self::Ref> {
        &self.state
    }

    fn state_mut(&mut self) -> &mut ReferenceState<F, Self::Ref> {
        &mut self.state
    }
}

impl<F: Feature> Calculable<F> for Gsea<F> {
    type Object = ProfileMatrix<F>;
    type Options = GseaOptions;
    type Output = ScoreTable;

    fn calc(
        &mut self,
        object: &ProfileMatrix<F>,
        options: &GseaOptions,
    ) -> anyhow::Result<ScoreTable> {
        let (reference, universe) = self.state.fitted()?;
        let profile = object.adjust(universe, 0);
        let (output, running_sums) = gsea::calc(
            &profile,
            reference,
            &Process::Ranked,
            Algorithm::Standard,
            options.method,
            options.alpha,
        )?;
        let table = output
            .as_table()
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("Ranked scoring produced a focused output"))?;

        self.result = Some(RunningSumResult {
            output,
            running_sums,
            n_features: profile.n_features(),
        });
        Ok(table)
    }
}

/// Single-sample GSEA: rank-weighted running sums per sample.
#[derive(Debug, Clone)]
pub struct SsGsea<F: Feature> {
    state: ReferenceState<F, ReferenceSet<F>>,
    result: Option<RunningSumResult<F>>,
}

impl<F: Feature> Default for SsGsea<F> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F: Feature> SsGsea<F> {
    pub fn new() -> Self {
        SsGsea {
            state: ReferenceState::default(),
            result: None,
        }
    }

    pub fn result(&self) -> Option<&ScoreOutput> {
        self.result.as_ref().map(|r| &r.output)
    }

    pub fn running_sums(&self) -> Option<&[RunningSum<F>]> {
        self.result.as_ref().map(|r| r.running_sums.as_slice())
    }

    /// Rescale the last exploratory scores by `1 / (1 - term_size / n)`.
    ///
    /// # Errors
    ///
    /// [`EnrichmentError::NoResult`] before any calculation,
    /// [`EnrichmentError::FocusedNormalization`] after a focused calculation.
    pub fn normalize_score(&self, n_features: Option<usize>) -> anyhow::Result<ScoreTable> {
        normalize(self.result.as_ref(), self.state.reference()?, n_features)
    }
}

impl<F: Feature> Fittable<F> for SsGsea<F> {
    type Ref = ReferenceSet<F>;

    fn state(&self) -> &ReferenceState<F, Self::Ref> {
        &self.state
    }

    fn state_mut(&mut self) -> &mut ReferenceState<F, Self::Ref> {
        &mut self.state
    }
}

impl<F: Feature> Calculable<F> for SsGsea<F> {
    type Object = ProfileMatrix<F>;
    type Options = SsGseaOptions;
    type Output = ScoreOutput;

    fn calc(
        &mut self,
        object: &ProfileMatrix<F>,
        options: &SsGseaOptions,
    ) -> anyhow::Result<ScoreOutput> {
        let (reference, universe) = self.state.fitted()?;
        let profile = object.adjust(universe, 0);
        let (process, algorithm) = match &options.focus_term {
            Some(term) => (Process::Focused(term.clone()), Algorithm::SsGsea),
            None => (Process::Exploratory, Algorithm::ExploratorySsGsea),
        };
        let (output, running_sums) = gsea::calc(
            &profile,
            reference,
            &process,
            algorithm,
            options.method,
            options.alpha,
        )?;

        self.result = Some(RunningSumResult {
            output: output.clone(),
            running_sums,
            n_features: profile.n_features(),
        });
        Ok(output)
    }
}
