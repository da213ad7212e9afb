//! Feature collections and their adjustment against a feature universe.
//!
//! Every calculation in this crate operates on a consistent feature space: reference terms, the
//! query object and the "whole" universe are reconciled by the [`Adjustable`] implementations in
//! [`adjust`] before any statistic is computed.
//!
//! ## Containers
//!
//! - [`FeatureUniverse`] / [`FeatureSet`]: ordered sets of feature identifiers
//! - [`ReferenceSet`]: one-sided reference, `term -> members`
//! - [`ReferenceSetPair`]: two-sided reference, `term -> (up, down)`
//! - [`ProfileMatrix`]: feature × sample value matrix (ranked profiles)

use std::collections::{BTreeMap, BTreeSet};
use std::fmt::Debug;
use std::hash::Hash;

pub mod adjust;
pub mod profile;

pub use adjust::Adjustable;
pub use profile::ProfileMatrix;

/// Minimum number of members a term keeps after adjustment unless configured otherwise.
pub const DEFAULT_MIN_SIZE: usize = 3;

/// Opaque feature identifier (gene symbol, probe id, integer index, ...).
pub trait Feature: Clone + Eq + Hash + Ord + Debug + Send + Sync + 'static {}

impl<F> Feature for F where F: Clone + Eq + Hash + Ord + Debug + Send + Sync + 'static {}

pub type FeatureSet<F> = BTreeSet<F>;

/// Everything measured. Shared by the reference and object adjusters.
pub type FeatureUniverse<F> = BTreeSet<F>;

pub type ReferenceSet<F> = BTreeMap<String, FeatureSet<F>>;

pub type ReferenceSetPair<F> = BTreeMap<String, (FeatureSet<F>, FeatureSet<F>)>;

/// Outcome of looking a term up by name.
#[derive(Debug, Clone, PartialEq)]
pub enum TermLookup<'a, M> {
    Found(&'a M),
    /// The term is unknown; these terms contain the keyword as a substring.
    Candidates(Vec<String>),
}

/// A reference collection that can be loaded into an analyzer.
pub trait Reference<F: Feature>: Adjustable<F> + Clone + Default + Debug {
    type Members: Debug;

    /// Union of every member of every term.
    fn whole(&self) -> FeatureUniverse<F>;

    fn n_terms(&self) -> usize;

    fn term_names(&self) -> Vec<String>;

    fn lookup(&self, keyword: &str) -> TermLookup<'_, Self::Members>;
}

fn lookup_in<'a, M>(map: &'a BTreeMap<String, M>, keyword: &str) -> TermLookup<'a, M> {
    match map.get(keyword) {
        Some(members) => TermLookup::Found(members),
        None => TermLookup::Candidates(
            map.keys()
                .filter(|name| name.contains(keyword))
                .cloned()
                .collect(),
        ),
    }
}

impl<F: Feature> Reference<F> for ReferenceSet<F> {
    type Members = FeatureSet<F>;

    fn whole(&self) -> FeatureUniverse<F> {
        self.values().flat_map(|set| set.iter().cloned()).collect()
    }

    fn n_terms(&self) -> usize {
        self.len()
    }

    fn term_names(&self) -> Vec<String> {
        self.keys().cloned().collect()
    }

    fn lookup(&self, keyword: &str) -> TermLookup<'_, Self::Members> {
        lookup_in(self, keyword)
    }
}

impl<F: Feature> Reference<F> for ReferenceSetPair<F> {
    type Members = (FeatureSet<F>, FeatureSet<F>);

    fn whole(&self) -> FeatureUniverse<F> {
        self.values()
            .flat_map(|(up, down)| up.iter().chain(down.iter()).cloned())
            .collect()
    }

    fn n_terms(&self) -> usize {
        self.len()
    }

    fn term_names(&self) -> Vec<String> {
        self.keys().cloned().collect()
    }

    fn lookup(&self, keyword: &str) -> TermLookup<'_, Self::Members> {
        lookup_in(self, keyword)
    }
}
