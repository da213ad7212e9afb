use crate::analyzer::{Calculable, Fittable, ReferenceState};
use crate::data::{Adjustable, Feature, ProfileMatrix, ReferenceSetPair};
use crate::enrichment::connectivity::{self, RankMap};
use crate::enrichment::results::ScoreTable;

/// Connectivity scoring of up/down signatures against ranked profiles.
///
/// Signatures are re-adjusted to the features of each profile before scoring; the profile itself
/// is not restricted to the stored universe.
#[derive(Debug, Clone)]
pub struct Connect<F: Feature> {
    state: ReferenceState<F, ReferenceSetPair<F>>,
    result: Option<ScoreTable>,
    rank_maps: Vec<RankMap<F>>,
}

impl<F: Feature> Default for Connect<F> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F: Feature> Connect<F> {
    pub fn new() -> Self {
        Connect {
            state: ReferenceState::default(),
            result: None,
            rank_maps: Vec::new(),
        }
    }

    pub fn result(&self) -> Option<&ScoreTable> {
        self.result.as_ref()
    }

    /// Rank map of every sample of the last calculation.
    pub fn rank_maps(&self) -> &[RankMap<F>] {
        &self.rank_maps
    }
}

impl<F: Feature> Fittable<F> for Connect<F> {
    type Ref = ReferenceSetPair<F>;

    fn state(&self) -> &ReferenceState<F, Self::Ref> {
        &self.state
    }

    fn state_mut(&mut self) -> &mut ReferenceState<F, Self::Ref> {
        &mut self.state
    }
}

impl<F: Feature> Calculable<F> for Connect<F> {
    type Object = ProfileMatrix<F>;
    type Options = ();
    type Output = ScoreTable;

    fn calc(&mut self, object: &ProfileMatrix<F>, _options: &()) -> anyhow::Result<ScoreTable> {
        let features = object.feature_set();
        let profile = object.adjust(&features, 0);
        let reference = self.state.reference()?.adjust(&features, self.state.min_size());

        let (table, rank_maps) = connectivity::calc(&profile, &reference)?;
        self.result = Some(table.clone());
        self.rank_maps = rank_maps;
        Ok(table)
    }
}
