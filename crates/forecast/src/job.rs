use crate::error::ForecastError;

/// A self-contained analytics computation.
///
/// Jobs own their inputs (history windows, catalog aggregates) which are
/// fetched by callers (infra/workers). This crate stays storage-agnostic.
pub trait AnalyticsJob: Send + Sync + 'static {
    type Output: Send + 'static;

    /// Stable name used in logs (e.g. `inventory.reorder_point`).
    fn kind(&self) -> &'static str;

    /// Execute the computation.
    ///
    /// Must be pure: no IO, no hidden random state.
    fn run(&self) -> Result<Self::Output, ForecastError>;
}
