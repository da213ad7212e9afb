//! # single-enrichment
//!
//! A Rust library for set- and rank-based enrichment analysis, part of the single-rust ecosystem.
//!
//! Given a reference collection of named feature sets (gene signatures, pathways, ontology terms)
//! and a query object, this crate reports which reference terms are enriched in the query. All
//! inputs are first reconciled against a common feature universe.
//!
//! ## Core Features
//!
//! - **Over-representation Analysis**: binomial and Fisher's exact tests on set overlaps, with
//!   multiple testing correction
//! - **GSEA / ssGSEA**: running-sum enrichment scores on ranked profiles, with standard, Kuiper and
//!   GSVA-like score reductions
//! - **Connectivity Scores**: up/down signature matching against ranked profiles (CMap)
//! - **Sparse Matrix Support**: profiles can be built from `CsrMatrix` from nalgebra-sparse
//!
//! ## Quick Start
//!
//! Load a reference into one of the analyzers in [`analyzer`] with [`analyzer::Fittable::fit`],
//! then run it against a query with [`analyzer::Calculable::calc`]. The engines in
//! [`enrichment`] can also be called directly on already-adjusted inputs.
//!
//! ## Module Organization
//!
//! - **[`data`]**: Feature containers and their adjustment against a universe
//! - **[`enrichment`]**: Enrichment engines (contingency, running-sum, connectivity)
//! - **[`testing`]**: Exact tests and multiple testing correction
//! - **[`analyzer`]**: Stateful analyzers combining a reference with an engine
//! - **[`error`]**: Error taxonomy

pub mod analyzer;
pub mod data;
pub mod enrichment;
pub mod error;
pub mod testing;

pub use error::EnrichmentError;
