//! Infrastructure layer: collaborator adapters, configuration, and the
//! analytics service that wires them to the forecasting engine.

pub mod config;
pub mod error;
pub mod providers;
pub mod service;

pub use config::AnalyticsConfig;
pub use error::{AnalyticsError, ProviderError};
pub use providers::{
    CommerceFixture, InMemoryCommerceData, LeadTimeProvider, ProductCatalog, ProductFixture,
    SalesHistoryProvider, StockProvider,
};
pub use service::{InventoryAnalyticsService, ProductOutcome};
