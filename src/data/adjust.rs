use log::debug;

use crate::data::{Feature, FeatureSet, FeatureUniverse, ReferenceSet, ReferenceSetPair};

/// Restrict a collection to the features of a universe.
///
/// Implementations never mutate `self`; they return an adjusted copy. Adjusting an already
/// adjusted collection against the same universe returns an equal collection.
pub trait Adjustable<F: Feature>: Sized {
    /// # Arguments
    ///
    /// * `universe` - Features under consideration
    /// * `min_size` - Minimum number of members a term must keep (ignored by containers without
    ///   terms)
    fn adjust(&self, universe: &FeatureUniverse<F>, min_size: usize) -> Self;
}

impl<F: Feature> Adjustable<F> for FeatureSet<F> {
    fn adjust(&self, universe: &FeatureUniverse<F>, _min_size: usize) -> Self {
        self.intersection(universe).cloned().collect()
    }
}

impl<F: Feature> Adjustable<F> for ReferenceSet<F> {
    fn adjust(&self, universe: &FeatureUniverse<F>, min_size: usize) -> Self {
        let adjusted: ReferenceSet<F> = self
            .iter()
            .filter_map(|(term, members)| {
                let kept = members.adjust(universe, min_size);
                (kept.len() >= min_size).then(|| (term.clone(), kept))
            })
            .collect();
        debug!(
            "Adjusted reference: kept {} of {} terms (min_size = {})",
            adjusted.len(),
            self.len(),
            min_size
        );
        adjusted
    }
}

impl<F: Feature> Adjustable<F> for ReferenceSetPair<F> {
    fn adjust(&self, universe: &FeatureUniverse<F>, min_size: usize) -> Self {
        let adjusted: ReferenceSetPair<F> = self
            .iter()
            .filter_map(|(term, (up, down))| {
                let up = up.adjust(universe, min_size);
                let down = down.adjust(universe, min_size);
                (up.len() >= min_size && down.len() >= min_size)
                    .then(|| (term.clone(), (up, down)))
            })
            .collect();
        debug!(
            "Adjusted two-sided reference: kept {} of {} terms (min_size = {})",
            adjusted.len(),
            self.len(),
            min_size
        );
        adjusted
    }
}
