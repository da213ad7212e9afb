//! Running-sum enrichment scores (GSEA, ssGSEA).
//!
//! For every sample the features are ranked by descending value, and for every tag (term) a
//! running sum walks down the ranking: the tag-weighted fraction `posi` seen so far minus the
//! fraction of non-tag features `nega` seen so far. The curve `es = posi - nega` is reduced to a
//! single enrichment score by a [`ScoreMethod`].
//!
//! The configurable parts are passed per call:
//!
//! - [`Process`]: which terms are scored (all of them, or a single focused term)
//! - [`Algorithm`]: how positions are weighted (by value or by rank position)
//! - [`ScoreMethod`]: how the curve is reduced (standard, Kuiper, GSVA-like)

use std::fmt;
use std::str::FromStr;

use log::debug;
use ndarray::{Array2, ArrayView1, Axis};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::data::{Feature, FeatureSet, ProfileMatrix, ReferenceSet};
use crate::enrichment::results::{FocusedScores, ScoreOutput, ScoreTable};
use crate::enrichment::utils::{cumulative_fraction, descending_order};
use crate::error::EnrichmentError;

/// Which terms are scored against each sample's ranking.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Process {
    /// Every term against every ranked sample (GSEA).
    Ranked,
    /// A single term against every ranked sample (ssGSEA focused mode).
    Focused(String),
    /// Every term against every ranked sample, sweeping for enriched terms
    /// (ssGSEA exploratory mode).
    Exploratory,
}

/// How the positional weights of the running sum are computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Algorithm {
    /// Weight `|value|^alpha`.
    Standard,
    /// Weight `(n - i)^alpha` for the feature at 0-based rank `i`; magnitude is ignored.
    SsGsea,
    /// Same weights as [`Algorithm::SsGsea`], used for sweeping all terms.
    ExploratorySsGsea,
}

impl Algorithm {
    fn weights(&self, sorted_values: &[f64], alpha: f64) -> Vec<f64> {
        match self {
            Algorithm::Standard => sorted_values.iter().map(|v| v.abs().powf(alpha)).collect(),
            Algorithm::SsGsea | Algorithm::ExploratorySsGsea => {
                let n = sorted_values.len();
                (0..n).map(|i| ((n - i) as f64).powf(alpha)).collect()
            }
        }
    }
}

/// Reduction of a running-sum curve to a single enrichment score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreMethod {
    /// Maximum absolute deviation (Barbie et al., 2009).
    #[default]
    Standard,
    /// `|max| + |min|`; tail sensitive, suits mixed up/down tags.
    Kuiper,
    /// `max(max, 0) - min(min, 0)`; suits unidirectional tags.
    Gsva,
}

impl ScoreMethod {
    pub const ACCEPTED: [&'static str; 3] = ["standard", "kuiper", "gsva"];

    pub fn as_str(&self) -> &'static str {
        match self {
            ScoreMethod::Standard => "standard",
            ScoreMethod::Kuiper => "kuiper",
            ScoreMethod::Gsva => "gsva",
        }
    }

    /// Reduce a running-sum curve. An empty curve, or NaN anywhere in it, yields NaN.
    pub fn reduce(&self, es: ArrayView1<'_, f64>) -> f64 {
        if es.is_empty() || es.iter().any(|v| v.is_nan()) {
            return f64::NAN;
        }
        let maxi = es.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let mini = es.iter().copied().fold(f64::INFINITY, f64::min);
        match self {
            ScoreMethod::Standard => {
                es.iter().map(|v| v.abs()).fold(f64::NEG_INFINITY, f64::max)
            }
            ScoreMethod::Kuiper => maxi.abs() + mini.abs(),
            ScoreMethod::Gsva => maxi.max(0.0) - mini.min(0.0),
        }
    }
}

impl fmt::Display for ScoreMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ScoreMethod {
    type Err = EnrichmentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "standard" => Ok(ScoreMethod::Standard),
            "kuiper" => Ok(ScoreMethod::Kuiper),
            "gsva" => Ok(ScoreMethod::Gsva),
            other => Err(EnrichmentError::invalid_option(
                "method",
                other,
                &ScoreMethod::ACCEPTED,
            )),
        }
    }
}

/// Running-sum curves of one sample against a list of tags.
///
/// All matrices are tag × rank position.
#[derive(Debug, Clone, PartialEq)]
pub struct RunningSum<F> {
    pub sample: String,
    /// Tag (term) names, one per row.
    pub keys: Vec<String>,
    /// Features in ranked order, one per column.
    pub ranked: Vec<F>,
    /// `1.0` where the feature at that rank belongs to the tag.
    pub loc: Array2<f64>,
    /// Cumulative fraction of tag-weighted mass.
    pub posi: Array2<f64>,
    /// Cumulative fraction of non-tag mass.
    pub nega: Array2<f64>,
    /// `posi - nega`
    pub es: Array2<f64>,
}

impl<F> RunningSum<F> {
    pub fn scores(&self, method: ScoreMethod) -> Vec<f64> {
        self.es.axis_iter(Axis(0)).map(|row| method.reduce(row)).collect()
    }
}

/// Compute the running sum of `tags` over a fixed ranking.
///
/// # Arguments
///
/// * `ranked` - Features in descending order
/// * `weights` - Positional weight of each ranked feature
/// * `tags` - `(name, members)` pairs
///
/// A tag with no member in `ranked` produces a NaN curve.
pub fn running_sum<F: Feature>(
    sample: &str,
    ranked: Vec<F>,
    weights: &[f64],
    tags: &[(&str, &FeatureSet<F>)],
) -> RunningSum<F> {
    let n = ranked.len();
    let n_tags = tags.len();
    let mut loc = Array2::<f64>::zeros((n_tags, n));
    let mut posi = Array2::<f64>::zeros((n_tags, n));
    let mut nega = Array2::<f64>::zeros((n_tags, n));

    for (t, (_, members)) in tags.iter().enumerate() {
        let hits: Vec<f64> = ranked
            .iter()
            .map(|feature| if members.contains(feature) { 1.0 } else { 0.0 })
            .collect();
        let posi_raw: Vec<f64> = hits.iter().zip(weights).map(|(h, w)| h * w).collect();
        let nega_raw: Vec<f64> = hits.iter().map(|h| 1.0 - h).collect();

        for (i, ((hit, p), q)) in hits
            .iter()
            .zip(cumulative_fraction(&posi_raw))
            .zip(cumulative_fraction(&nega_raw))
            .enumerate()
        {
            loc[[t, i]] = *hit;
            posi[[t, i]] = p;
            nega[[t, i]] = q;
        }
    }

    let es = &posi - &nega;
    RunningSum {
        sample: sample.to_string(),
        keys: tags.iter().map(|(name, _)| name.to_string()).collect(),
        ranked,
        loc,
        posi,
        nega,
        es,
    }
}

/// Rank one sample and compute its running sums against `tags`.
fn sample_running_sum<F: Feature>(
    profile: &ProfileMatrix<F>,
    sample_idx: usize,
    tags: &[(&str, &FeatureSet<F>)],
    algorithm: Algorithm,
    alpha: f64,
) -> RunningSum<F> {
    let column = profile.column(sample_idx);
    let order = descending_order(column);
    let ranked: Vec<F> = order.iter().map(|&i| profile.features()[i].clone()).collect();
    let sorted_values: Vec<f64> = order.iter().map(|&i| column[i]).collect();
    let weights = algorithm.weights(&sorted_values, alpha);
    running_sum(&profile.samples()[sample_idx], ranked, &weights, tags)
}

/// Score a profile against a reference.
///
/// # Arguments
///
/// * `profile` - Adjusted feature × sample profile
/// * `reference` - Adjusted reference terms
/// * `process` - Which terms to score
/// * `algorithm` - Positional weighting
/// * `method` - Curve reduction
/// * `alpha` - Weight exponent (0 for classic GSEA, 0.25 for ssGSEA)
///
/// # Returns
///
/// The scores, plus the running sums of every sample for introspection.
pub fn calc<F: Feature>(
    profile: &ProfileMatrix<F>,
    reference: &ReferenceSet<F>,
    process: &Process,
    algorithm: Algorithm,
    method: ScoreMethod,
    alpha: f64,
) -> anyhow::Result<(ScoreOutput, Vec<RunningSum<F>>)> {
    let tags: Vec<(&str, &FeatureSet<F>)> = match process {
        Process::Ranked | Process::Exploratory => reference
            .iter()
            .map(|(term, members)| (term.as_str(), members))
            .collect(),
        Process::Focused(term) => {
            let members = reference.get(term).ok_or_else(|| EnrichmentError::UnknownTerm {
                term: term.clone(),
                candidates: reference
                    .keys()
                    .filter(|name| name.contains(term.as_str()))
                    .cloned()
                    .collect(),
            })?;
            vec![(term.as_str(), members)]
        }
    };
    debug!(
        "Running-sum scoring: {:?} / {:?} / {} method, alpha = {}, {} tags x {} samples",
        process,
        algorithm,
        method,
        alpha,
        tags.len(),
        profile.n_samples()
    );

    let sums: Vec<RunningSum<F>> = (0..profile.n_samples())
        .into_par_iter()
        .map(|s| sample_running_sum(profile, s, &tags, algorithm, alpha))
        .collect();

    let output = match process {
        Process::Focused(term) => {
            let scores = sums
                .iter()
                .map(|sum| sum.scores(method)[0])
                .collect();
            ScoreOutput::Focused(FocusedScores::new(
                term.clone(),
                profile.samples().to_vec(),
                scores,
            ))
        }
        Process::Ranked | Process::Exploratory => {
            let mut scores = Array2::<f64>::zeros((tags.len(), profile.n_samples()));
            for (s, sum) in sums.iter().enumerate() {
                for (t, score) in sum.scores(method).into_iter().enumerate() {
                    scores[[t, s]] = score;
                }
            }
            let terms = tags.iter().map(|(name, _)| name.to_string()).collect();
            ScoreOutput::Table(
                ScoreTable::new(terms, profile.samples().to_vec(), scores).sorted_descending(),
            )
        }
    };

    Ok((output, sums))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::array;

    fn ranked_profile() -> ProfileMatrix<u32> {
        // feature i has value 11 - i: feature 1 ranks first, feature 10 last
        let values: Vec<f64> = (1..=10).map(|i| (11 - i) as f64).collect();
        ProfileMatrix::from_vector("s1", (1..=10).collect(), values).unwrap()
    }

    #[test]
    fn test_cumulative_fractions_reach_one() {
        let tag: FeatureSet<u32> = [2, 5, 7].into();
        let sum = running_sum("s", (1..=10).collect(), &[1.0; 10], &[("t", &tag)]);
        assert_relative_eq!(sum.posi[[0, 9]], 1.0, epsilon = 1e-12);
        assert_relative_eq!(sum.nega[[0, 9]], 1.0, epsilon = 1e-12);
        assert_eq!(sum.loc.row(0).sum(), 3.0);
    }

    #[test]
    fn test_last_ranked_single_tag_curve() {
        let tag: FeatureSet<u32> = [10].into();
        let sum = running_sum("s", (1..=10).collect(), &[1.0; 10], &[("t", &tag)]);
        let es = sum.es.row(0);
        for i in 1..9 {
            assert!(es[i] <= es[i - 1], "es increased at {}: {:?}", i, es);
        }
        // nega climbs to 1 over the first nine ranks, posi jumps to 1 at the end
        assert_relative_eq!(es[8], -1.0, epsilon = 1e-12);
        assert_relative_eq!(es[9], 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_curve_non_increasing_once_tag_is_used_up() {
        let tag: FeatureSet<u32> = [4].into();
        let sum = running_sum("s", (1..=10).collect(), &[1.0; 10], &[("t", &tag)]);
        let es = sum.es.row(0);
        assert_relative_eq!(sum.posi[[0, 3]], 1.0);
        for i in 4..10 {
            assert!(es[i] <= es[i - 1], "es increased at {}: {:?}", i, es);
        }
    }

    #[test]
    fn test_empty_tag_propagates_nan() {
        let tag: FeatureSet<u32> = FeatureSet::new();
        let sum = running_sum("s", (1..=4).collect(), &[1.0; 4], &[("empty", &tag)]);
        assert!(sum.posi.iter().all(|v| v.is_nan()));
        assert!(sum.scores(ScoreMethod::Standard)[0].is_nan());
    }

    #[test]
    fn test_no_ranked_features_scores_nan() {
        let tag: FeatureSet<u32> = [1, 2, 3].into();
        let sum = running_sum("s", Vec::new(), &[], &[("t", &tag)]);
        assert_eq!(sum.es.dim(), (1, 0));
        for method in [ScoreMethod::Standard, ScoreMethod::Kuiper, ScoreMethod::Gsva] {
            assert!(sum.scores(method)[0].is_nan(), "{} on an empty curve", method);
        }
    }

    #[test]
    fn test_score_methods() {
        let es = array![0.2, 0.5, -0.1, -0.4, 0.0];
        assert_relative_eq!(ScoreMethod::Standard.reduce(es.view()), 0.5);
        assert_relative_eq!(ScoreMethod::Kuiper.reduce(es.view()), 0.9);
        assert_relative_eq!(ScoreMethod::Gsva.reduce(es.view()), 0.9);

        let positive = array![0.1, 0.3, 0.2];
        assert_relative_eq!(ScoreMethod::Gsva.reduce(positive.view()), 0.3);
        assert_relative_eq!(ScoreMethod::Kuiper.reduce(positive.view()), 0.4);
    }

    #[test]
    fn test_ssgsea_rank_weights() {
        let weights = Algorithm::SsGsea.weights(&[9.0, 3.0, 1.0, -5.0], 1.0);
        assert_eq!(weights, vec![4.0, 3.0, 2.0, 1.0]);
        let standard = Algorithm::Standard.weights(&[9.0, 3.0, 1.0, -5.0], 1.0);
        assert_eq!(standard, vec![9.0, 3.0, 1.0, 5.0]);
        let flat = Algorithm::Standard.weights(&[9.0, 0.0], 0.0);
        assert_eq!(flat, vec![1.0, 1.0]);
    }

    #[test]
    fn test_top_ranked_tag_scores_higher() {
        let mut reference = ReferenceSet::new();
        reference.insert("top".to_string(), [1, 2, 3].into());
        reference.insert("bottom".to_string(), [8, 9, 10].into());
        reference.insert("spread".to_string(), [1, 5, 10].into());

        let (output, sums) = calc(
            &ranked_profile(),
            &reference,
            &Process::Ranked,
            Algorithm::Standard,
            ScoreMethod::Gsva,
            0.0,
        )
        .unwrap();
        let table = output.as_table().unwrap();
        assert_eq!(table.terms()[2], "spread");
        // both extremes saturate: top reaches +1 - 0, bottom reaches 0 - 1
        assert_relative_eq!(table.get("top", "s1").unwrap(), 1.0, epsilon = 1e-12);
        assert_relative_eq!(table.get("bottom", "s1").unwrap(), 1.0, epsilon = 1e-12);
        assert_eq!(sums.len(), 1);
        assert_eq!(sums[0].ranked[0], 1);
    }

    #[test]
    fn test_focused_mode_scores_each_sample() {
        let profile = ProfileMatrix::new(
            vec![1u32, 2, 3, 4, 5, 6],
            vec!["up".to_string(), "down".to_string()],
            array![[6.0, 1.0], [5.0, 2.0], [4.0, 3.0], [3.0, 4.0], [2.0, 5.0], [1.0, 6.0]],
        )
        .unwrap();
        let mut reference = ReferenceSet::new();
        reference.insert("tag".to_string(), [1, 2, 3].into());

        let (output, sums) = calc(
            &profile,
            &reference,
            &Process::Focused("tag".to_string()),
            Algorithm::SsGsea,
            ScoreMethod::Standard,
            0.25,
        )
        .unwrap();
        let focused = output.as_focused().unwrap();
        assert_eq!(focused.term, "tag");
        assert_eq!(sums.len(), 2);
        assert_relative_eq!(focused.get("up").unwrap(), 1.0, epsilon = 1e-12);
        assert_relative_eq!(focused.get("down").unwrap(), 1.0, epsilon = 1e-12);
        // ranking differs per sample
        assert_eq!(sums[1].ranked, vec![6, 5, 4, 3, 2, 1]);
    }

    #[test]
    fn test_focused_unknown_term() {
        let mut reference = ReferenceSet::new();
        reference.insert("HALLMARK_HYPOXIA".to_string(), [1, 2, 3].into());
        let err = calc(
            &ranked_profile(),
            &reference,
            &Process::Focused("HYPOXIA".to_string()),
            Algorithm::SsGsea,
            ScoreMethod::Standard,
            0.25,
        )
        .unwrap_err();
        match err.downcast_ref::<EnrichmentError>() {
            Some(EnrichmentError::UnknownTerm { candidates, .. }) => {
                assert_eq!(candidates, &vec!["HALLMARK_HYPOXIA".to_string()])
            }
            other => panic!("unexpected error {:?}", other),
        }
    }
}
