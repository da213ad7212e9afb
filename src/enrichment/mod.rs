//! Enrichment engines.
//!
//! These are plain functions over already-adjusted inputs; the stateful façade in
//! [`crate::analyzer`] takes care of reference loading and universe adjustment.
//!
//! ## Available Methods
//!
//! - **Contingency** (`contingency`): over-representation of reference terms in a feature set,
//!   with a binomial or Fisher's exact kernel and multiple testing correction
//! - **GSEA / ssGSEA** (`gsea`): running-sum enrichment scores on ranked profiles
//! - **Connectivity** (`connectivity`): up/down signature scoring (CMap)

pub mod connectivity;
pub mod contingency;
pub mod gsea;
pub mod results;
pub(crate) mod utils;

pub use connectivity::RankMap;
pub use contingency::{ContingencyKernel, ContingencyOptions, EnrichmentTable, OverlapRow};
pub use gsea::{Algorithm, Process, RunningSum, ScoreMethod};
pub use results::{FocusedScores, ScoreOutput, ScoreTable};
