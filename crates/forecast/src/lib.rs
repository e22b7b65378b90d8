//! `stockwise-forecast`
//!
//! **Responsibility:** demand forecasting and reorder optimization math.
//!
//! Every computation here is a pure, synchronous job over in-memory inputs:
//! - It never performs IO; collaborators hand inputs in (see `stockwise-infra`).
//! - It is deterministic: the same history always yields the same output.
//! - Lookup tables (Z-scores, confidence tiers, ABC boundaries) live in [`tables`].

pub mod abc;
pub mod demand;
pub mod error;
pub mod job;
pub mod optimizer;
pub mod reorder;
pub mod seasonal;
pub mod stats;
pub mod tables;

pub use abc::{AbcBucket, AbcClassificationJob, AbcResult, RankedProduct};
pub use demand::{
    ConfidenceInterval, ContributingFactors, DemandForecastJob, DemandPrediction, ForecastModel,
};
pub use error::ForecastError;
pub use job::AnalyticsJob;
pub use optimizer::{InventoryOptimization, InventoryOptimizationJob};
pub use reorder::{ReorderPointJob, ReorderPointResult, RiskAssessment};
pub use seasonal::{SeasonalAnalysisJob, SeasonalPattern};
pub use tables::{AbcClass, ConfidenceTier, ServiceLevel};
