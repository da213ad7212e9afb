use std::cmp::Ordering;

use ndarray::ArrayView1;

/// Descending order with NaN after every number.
pub(crate) fn descending_nan_last(a: f64, b: f64) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => b.total_cmp(&a),
    }
}

/// Indices of `values` ordered by descending value, NaN last. Ties keep their input order.
pub(crate) fn descending_order(values: ArrayView1<'_, f64>) -> Vec<usize> {
    let mut indexed_values: Vec<(usize, f64)> = values.iter().copied().enumerate().collect();

    indexed_values.sort_by(|a, b| descending_nan_last(a.1, b.1));

    indexed_values.into_iter().map(|(i, _)| i).collect()
}

/// 1-based ordinal ranks, highest value first. Ties are ranked in input order.
pub(crate) fn rank_data(values: ArrayView1<'_, f64>) -> Vec<usize> {
    let mut ranks = vec![0; values.len()];
    for (rank, original_idx) in descending_order(values).into_iter().enumerate() {
        ranks[original_idx] = rank + 1;
    }
    ranks
}

/// Running fraction of the total mass seen so far: `cumsum(raw) / sum(raw)`.
///
/// A zero total yields NaN everywhere.
pub(crate) fn cumulative_fraction(raw: &[f64]) -> Vec<f64> {
    let total: f64 = raw.iter().sum();
    let mut acc = 0.0;
    raw.iter()
        .map(|&x| {
            acc += x;
            acc / total
        })
        .collect()
}
