//! Stateful analyzers built on the enrichment engines.
//!
//! An analyzer owns a reference collection, the universe it was adjusted against and the last
//! computed result. Capabilities are split in two traits:
//!
//! - [`Fittable`]: load a reference and manage the universe
//! - [`Calculable`]: run the engine against a query object
//!
//! ## Quick Example
//!
//! ```rust
//! use single_enrichment::analyzer::{Calculable, Contingency, Fittable};
//! use single_enrichment::data::{FeatureSet, ReferenceSet};
//! use single_enrichment::enrichment::ContingencyOptions;
//!
//! let mut reference = ReferenceSet::new();
//! reference.insert("T1".to_string(), [1u32, 2, 3].into());
//! reference.insert("T2".to_string(), [4u32, 5, 6, 7, 8, 9, 10].into());
//!
//! let mut fet = Contingency::<u32>::fisher();
//! fet.fit(reference, false, None)?;
//!
//! let object: FeatureSet<u32> = [1, 2, 8].into();
//! let table = fet.calc(&object, &ContingencyOptions::default())?;
//! assert_eq!(table.rows()[0].term, "T1");
//! # Ok::<(), anyhow::Error>(())
//! ```

use log::info;

use crate::data::{Feature, FeatureUniverse, Reference, TermLookup, DEFAULT_MIN_SIZE};
use crate::error::EnrichmentError;

mod connectivity;
mod contingency;
mod gsea;

pub use connectivity::Connect;
pub use contingency::Contingency;
pub use gsea::{Gsea, GseaOptions, SsGsea, SsGseaOptions};

/// Reference as loaded, the same reference adjusted to the universe, and the universe itself.
#[derive(Debug, Clone)]
pub struct ReferenceState<F: Feature, R: Reference<F>> {
    raw: Option<R>,
    adjusted: Option<R>,
    universe: Option<FeatureUniverse<F>>,
    min_size: usize,
}

impl<F: Feature, R: Reference<F>> Default for ReferenceState<F, R> {
    fn default() -> Self {
        ReferenceState {
            raw: None,
            adjusted: None,
            universe: None,
            min_size: DEFAULT_MIN_SIZE,
        }
    }
}

impl<F: Feature, R: Reference<F>> ReferenceState<F, R> {
    /// Load `reference` and adjust it.
    ///
    /// With `keep_whole` the registered universe is kept; otherwise the universe becomes the
    /// union of the reference members.
    pub fn fit(
        &mut self,
        reference: R,
        keep_whole: bool,
        min_size: Option<usize>,
    ) -> anyhow::Result<()> {
        let min_size = min_size.unwrap_or(DEFAULT_MIN_SIZE);
        let universe = if keep_whole {
            self.universe.clone().ok_or(EnrichmentError::NoUniverse)?
        } else {
            reference.whole()
        };

        let adjusted = reference.adjust(&universe, min_size);
        info!(
            "Fitted reference: {} of {} terms kept (min size {}, universe of {} features)",
            adjusted.n_terms(),
            reference.n_terms(),
            min_size,
            universe.len()
        );

        self.raw = Some(reference);
        self.adjusted = Some(adjusted);
        self.universe = Some(universe);
        self.min_size = min_size;
        Ok(())
    }

    /// Replace the universe, re-adjusting the loaded reference from its raw form.
    pub fn set_universe(&mut self, universe: FeatureUniverse<F>) {
        if let Some(raw) = &self.raw {
            let adjusted = raw.adjust(&universe, self.min_size);
            info!(
                "Universe replaced ({} features): {} of {} terms kept",
                universe.len(),
                adjusted.n_terms(),
                raw.n_terms()
            );
            self.adjusted = Some(adjusted);
        } else {
            info!("Universe registered ({} features)", universe.len());
        }
        self.universe = Some(universe);
    }

    pub fn reference(&self) -> anyhow::Result<&R> {
        self.adjusted
            .as_ref()
            .ok_or_else(|| EnrichmentError::NoReference.into())
    }

    pub fn universe(&self) -> Option<&FeatureUniverse<F>> {
        self.universe.as_ref()
    }

    /// Reference and universe together; both exist once fitted.
    pub(crate) fn fitted(&self) -> anyhow::Result<(&R, &FeatureUniverse<F>)> {
        let reference = self.reference()?;
        let universe = self.universe.as_ref().ok_or(EnrichmentError::NoUniverse)?;
        Ok((reference, universe))
    }

    pub fn min_size(&self) -> usize {
        self.min_size
    }
}

/// Reference loading and universe management.
pub trait Fittable<F: Feature> {
    type Ref: Reference<F>;

    fn state(&self) -> &ReferenceState<F, Self::Ref>;

    fn state_mut(&mut self) -> &mut ReferenceState<F, Self::Ref>;

    /// Load a reference collection.
    ///
    /// # Arguments
    ///
    /// * `reference` - Terms and their members
    /// * `keep_whole` - Keep the registered universe instead of deriving it from the reference
    /// * `min_size` - Minimum term size after adjustment, 3 when `None`
    ///
    /// # Errors
    ///
    /// [`EnrichmentError::NoUniverse`] when `keep_whole` is set but no universe is registered.
    fn fit(
        &mut self,
        reference: Self::Ref,
        keep_whole: bool,
        min_size: Option<usize>,
    ) -> anyhow::Result<()> {
        self.state_mut().fit(reference, keep_whole, min_size)
    }

    fn set_universe(&mut self, universe: FeatureUniverse<F>) {
        self.state_mut().set_universe(universe)
    }

    /// The loaded reference, adjusted to the universe.
    fn reference(&self) -> anyhow::Result<&Self::Ref> {
        self.state().reference()
    }

    fn universe(&self) -> Option<&FeatureUniverse<F>> {
        self.state().universe()
    }

    /// Look a term up in the adjusted reference; a miss lists the terms containing `keyword`.
    fn inspect(
        &self,
        keyword: &str,
    ) -> anyhow::Result<TermLookup<'_, <Self::Ref as Reference<F>>::Members>> {
        Ok(self.reference()?.lookup(keyword))
    }
}

/// Running an analysis against a query object.
pub trait Calculable<F: Feature> {
    type Object;
    type Options;
    type Output;

    /// Compute, store and return the result for `object`.
    fn calc(&mut self, object: &Self::Object, options: &Self::Options)
    -> anyhow::Result<Self::Output>;
}
