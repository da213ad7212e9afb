use crate::analyzer::{Calculable, Fittable, ReferenceState};
use crate::data::{Adjustable, Feature, FeatureSet, ReferenceSet};
use crate::enrichment::contingency::{self, ContingencyKernel, ContingencyOptions, EnrichmentTable};

/// Over-representation analysis of a feature set against a one-sided reference.
#[derive(Debug, Clone)]
pub struct Contingency<F: Feature> {
    kernel: ContingencyKernel,
    state: ReferenceState<F, ReferenceSet<F>>,
    result: Option<EnrichmentTable<F>>,
}

impl<F: Feature> Contingency<F> {
    pub fn new(kernel: ContingencyKernel) -> Self {
        Contingency {
            kernel,
            state: ReferenceState::default(),
            result: None,
        }
    }

    /// Binomial test per term.
    pub fn binomial() -> Self {
        Self::new(ContingencyKernel::Binomial)
    }

    /// Fisher's exact test per term.
    pub fn fisher() -> Self {
        Self::new(ContingencyKernel::Fisher)
    }

    pub fn kernel(&self) -> ContingencyKernel {
        self.kernel
    }

    /// Table of the last [`Calculable::calc`] call.
    pub fn result(&self) -> Option<&EnrichmentTable<F>> {
        self.result.as_ref()
    }
}

impl<F: Feature> Fittable<F> for Contingency<F> {
    type Ref = ReferenceSet<F>;

    fn state(&self) -> &ReferenceState<F, Self::Ref> {
        &self.state
    }

    fn state_mut(&mut self) -> &mut ReferenceState<F, Self::Ref> {
        &mut self.state
    }
}

impl<F: Feature> Calculable<F> for Contingency<F> {
    type Object = FeatureSet<F>;
    type Options = ContingencyOptions;
    type Output = EnrichmentTable<F>;

    /// The object is intersected with the universe; `N` is the universe size.
    fn calc(
        &mut self,
        object: &FeatureSet<F>,
        options: &ContingencyOptions,
    ) -> anyhow::Result<EnrichmentTable<F>> {
        let (reference, universe) = self.state.fitted()?;
        let object = object.adjust(universe, 0);
        let table = contingency::calc(&object, reference, universe.len(), self.kernel, options)?;
        self.result = Some(table.clone());
        Ok(table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EnrichmentError;

    #[test]
    fn test_calc_before_fit() {
        let mut fet = Contingency::<u32>::fisher();
        let err = fet
            .calc(&[1, 2].into(), &ContingencyOptions::default())
            .unwrap_err();
        assert_eq!(
            err.downcast_ref::<EnrichmentError>(),
            Some(&EnrichmentError::NoReference)
        );
        assert!(fet.result().is_none());
    }

    #[test]
    fn test_object_outside_universe_is_ignored() {
        let mut reference = ReferenceSet::new();
        reference.insert("T1".to_string(), [1u32, 2, 3].into());
        reference.insert("T2".to_string(), [4u32, 5, 6, 7, 8, 9, 10].into());

        let mut binom = Contingency::binomial();
        binom.fit(reference, false, None).unwrap();
        let table = binom
            .calc(&[1, 2, 8, 42, 43].into(), &ContingencyOptions::default())
            .unwrap();
        assert_eq!(table.len(), 2);
        assert!(table.rows().iter().all(|row| !row.overlap.contains(&42)));
        assert_eq!(binom.result(), Some(&table));
    }
}
