use thiserror::Error;

use stockwise_core::ProductId;
use stockwise_forecast::ForecastError;

/// Failure reported by an external collaborator.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ProviderError {
    #[error("product {0} not found")]
    NotFound(ProductId),

    #[error("provider unavailable: {0}")]
    Unavailable(String),
}

/// Error returned by [`crate::InventoryAnalyticsService`] operations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AnalyticsError {
    /// The collaborator returned an empty series for the product.
    #[error("no sales history available for product {product_id}")]
    DataUnavailable { product_id: ProductId },

    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error(transparent)]
    Forecast(#[from] ForecastError),

    /// A per-product task panicked or was cancelled.
    #[error("task failed: {0}")]
    TaskFailed(String),
}
