//! Connectivity scores (Lamb et al., Science 2006).
//!
//! Each sample of a profile is turned into a rank map `V(j)`; every up/down signature pair is
//! scored with a two-sided Kolmogorov-Smirnov statistic against it. Scores are bounded by
//! `2 + 1/n - (t_up + t_down)/n` and normalized into `[-1, 1]`.

use std::collections::HashMap;

use log::debug;
use ndarray::Array2;
use rayon::prelude::*;

use crate::data::{Feature, FeatureSet, ProfileMatrix, ReferenceSetPair};
use crate::enrichment::results::ScoreTable;
use crate::enrichment::utils::rank_data;

/// 1-based rank of every feature of a sample, highest value first.
pub type RankMap<F> = HashMap<F, usize>;

/// Build the rank map of every sample.
pub fn rank_maps<F: Feature>(profile: &ProfileMatrix<F>) -> Vec<RankMap<F>> {
    (0..profile.n_samples())
        .into_par_iter()
        .map(|s| {
            profile
                .features()
                .iter()
                .cloned()
                .zip(rank_data(profile.column(s)))
                .collect()
        })
        .collect()
}

/// The `(a, b)` statistics of a tag against a rank map.
///
/// `a = max_j [(j + 1)/t - V(j)/n]`, `b = max_j [V(j)/n - j/t]` over the tag members sorted by
/// ascending rank. An empty tag yields `(NaN, NaN)`.
pub fn ks_components<F: Feature>(
    tag: &FeatureSet<F>,
    ranks: &RankMap<F>,
) -> anyhow::Result<(f64, f64)> {
    if tag.is_empty() {
        return Ok((f64::NAN, f64::NAN));
    }
    let t = tag.len() as f64;
    let n = ranks.len() as f64;

    let mut tag_ranks = tag
        .iter()
        .map(|feature| {
            ranks
                .get(feature)
                .copied()
                .ok_or_else(|| {
                    anyhow::anyhow!("Tag feature {:?} is not ranked in the profile", feature)
                })
        })
        .collect::<anyhow::Result<Vec<usize>>>()?;
    tag_ranks.sort_unstable();

    let mut a = f64::NEG_INFINITY;
    let mut b = f64::NEG_INFINITY;
    for (j, &rank) in tag_ranks.iter().enumerate() {
        let v = rank as f64 / n;
        a = a.max((j + 1) as f64 / t - v);
        b = b.max(v - j as f64 / t);
    }
    Ok((a, b))
}

/// Signed KS statistic of one side: `a` if `a > b`, else `-b`.
pub fn ks_side(a: f64, b: f64) -> f64 {
    if a > b { a } else { -b }
}

/// Normalized connectivity score of an up/down signature against one rank map.
///
/// Zero when both sides enrich in the same direction.
pub fn connectivity_score<F: Feature>(
    up: &FeatureSet<F>,
    down: &FeatureSet<F>,
    ranks: &RankMap<F>,
) -> anyhow::Result<f64> {
    let (a_up, b_up) = ks_components(up, ranks)?;
    let (a_dn, b_dn) = ks_components(down, ranks)?;
    let ks_up = ks_side(a_up, b_up);
    let ks_dn = ks_side(a_dn, b_dn);

    if ks_up.is_nan() || ks_dn.is_nan() {
        return Ok(f64::NAN);
    }
    let ks = if ks_up * ks_dn > 0.0 { 0.0 } else { ks_up - ks_dn };

    let n = ranks.len() as f64;
    let kss_max = 2.0 + 1.0 / n - (up.len() + down.len()) as f64 / n;
    Ok(ks / kss_max)
}

/// Score every signature pair against every sample.
///
/// # Arguments
///
/// * `profile` - Feature × sample profile, rows in canonical order
/// * `reference` - Signatures adjusted to the features of `profile`
///
/// # Returns
///
/// Term × sample scores in reference term order, and the rank map of every sample.
pub fn calc<F: Feature>(
    profile: &ProfileMatrix<F>,
    reference: &ReferenceSetPair<F>,
) -> anyhow::Result<(ScoreTable, Vec<RankMap<F>>)> {
    debug!(
        "Connectivity scoring: {} signatures x {} samples over {} features",
        reference.len(),
        profile.n_samples(),
        profile.n_features()
    );
    let maps = rank_maps(profile);

    let rows = reference
        .par_iter()
        .map(|(_, (up, down))| {
            maps.iter()
                .map(|ranks| connectivity_score(up, down, ranks))
                .collect::<anyhow::Result<Vec<f64>>>()
        })
        .collect::<anyhow::Result<Vec<Vec<f64>>>>()?;

    let mut scores = Array2::<f64>::zeros((reference.len(), profile.n_samples()));
    for (t, row) in rows.into_iter().enumerate() {
        for (s, score) in row.into_iter().enumerate() {
            scores[[t, s]] = score;
        }
    }

    let table = ScoreTable::new(
        reference.keys().cloned().collect(),
        profile.samples().to_vec(),
        scores,
    );
    Ok((table, maps))
}
