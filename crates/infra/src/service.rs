//! Inventory analytics service: fetches inputs from collaborators and runs the
//! forecasting jobs.
//!
//! Batch operations fan out one task per product. A failing product never
//! aborts its siblings; it is reported in its own [`ProductOutcome`].

use std::future::Future;
use std::sync::Arc;
use std::time::Instant;

use serde::{Serialize, Serializer};
use tokio::sync::Semaphore;
use tracing::{debug, info, warn};

use stockwise_core::{DailySalesRecord, ProductId};
use stockwise_forecast::{
    AbcClassificationJob, AbcResult, AnalyticsJob, DemandForecastJob, DemandPrediction, ForecastModel,
    InventoryOptimization, InventoryOptimizationJob, ReorderPointJob, ReorderPointResult,
    SeasonalAnalysisJob, SeasonalPattern, ServiceLevel,
};

use crate::config::AnalyticsConfig;
use crate::error::AnalyticsError;
use crate::providers::{LeadTimeProvider, ProductCatalog, SalesHistoryProvider, StockProvider};

/// Result of one product inside a batch call.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductOutcome<T> {
    pub product_id: ProductId,
    pub result: Result<T, AnalyticsError>,
}

impl<T> ProductOutcome<T> {
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

#[derive(Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
enum OutcomeView<'a, T> {
    Ok { product_id: ProductId, value: &'a T },
    Failed { product_id: ProductId, error: String },
}

impl<T: Serialize> Serialize for ProductOutcome<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let view = match &self.result {
            Ok(value) => OutcomeView::Ok {
                product_id: self.product_id,
                value,
            },
            Err(e) => OutcomeView::Failed {
                product_id: self.product_id,
                error: e.to_string(),
            },
        };
        view.serialize(serializer)
    }
}

/// Entry point for demand forecasting and reorder optimization.
///
/// Cheap to clone: collaborators and the concurrency limiter are shared.
#[derive(Clone)]
pub struct InventoryAnalyticsService {
    sales: Arc<dyn SalesHistoryProvider>,
    stock: Arc<dyn StockProvider>,
    lead_times: Arc<dyn LeadTimeProvider>,
    catalog: Arc<dyn ProductCatalog>,
    config: Arc<AnalyticsConfig>,
    limiter: Arc<Semaphore>,
}

impl core::fmt::Debug for InventoryAnalyticsService {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("InventoryAnalyticsService")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl InventoryAnalyticsService {
    pub fn new(
        sales: Arc<dyn SalesHistoryProvider>,
        stock: Arc<dyn StockProvider>,
        lead_times: Arc<dyn LeadTimeProvider>,
        catalog: Arc<dyn ProductCatalog>,
        config: AnalyticsConfig,
    ) -> Self {
        let permits = config.max_concurrency.max(1);
        Self {
            sales,
            stock,
            lead_times,
            catalog,
            config: Arc::new(config),
            limiter: Arc::new(Semaphore::new(permits)),
        }
    }

    /// Build from a single adapter implementing every collaborator.
    pub fn from_provider<P>(provider: Arc<P>, config: AnalyticsConfig) -> Self
    where
        P: SalesHistoryProvider + StockProvider + LeadTimeProvider + ProductCatalog + 'static,
    {
        Self::new(
            provider.clone(),
            provider.clone(),
            provider.clone(),
            provider,
            config,
        )
    }

    pub fn config(&self) -> &AnalyticsConfig {
        &self.config
    }

    /// Forecast demand for each product, `horizon_days` past its last sale day.
    pub async fn forecast_demand(
        &self,
        product_ids: &[ProductId],
        horizon_days: u32,
        model: ForecastModel,
    ) -> Vec<ProductOutcome<DemandPrediction>> {
        self.run_batch("forecast_demand", product_ids, move |svc, id| async move {
            svc.forecast_one(id, horizon_days, model).await
        })
        .await
    }

    /// Twelve seasonal patterns (January first) for one product.
    pub async fn analyze_seasonal_patterns(
        &self,
        product_id: ProductId,
    ) -> Result<Vec<SeasonalPattern>, AnalyticsError> {
        let history = self
            .history(product_id, self.config.seasonal_lookback_days)
            .await?;
        self.run_job(SeasonalAnalysisJob::new(product_id, history)).await
    }

    /// Reorder point and safety stock; `None` uses the 95% service level.
    pub async fn calculate_reorder_point(
        &self,
        product_id: ProductId,
        service_level: Option<f64>,
    ) -> Result<ReorderPointResult, AnalyticsError> {
        let (history, lead_time) = tokio::try_join!(
            self.history(product_id, self.config.reorder_lookback_days),
            async {
                self.lead_times
                    .average_lead_time(product_id)
                    .await
                    .map_err(AnalyticsError::from)
            },
        )?;
        let level = service_level.unwrap_or_else(|| ServiceLevel::DEFAULT.probability());
        self.run_job(ReorderPointJob::new(product_id, history, lead_time).with_service_level(level))
            .await
    }

    /// Target stock levels for each product.
    pub async fn optimize_inventory_levels(
        &self,
        product_ids: &[ProductId],
    ) -> Vec<ProductOutcome<InventoryOptimization>> {
        self.run_batch("optimize_inventory_levels", product_ids, |svc, id| async move {
            svc.optimize_one(id).await
        })
        .await
    }

    /// Revenue tiering of the whole catalog.
    ///
    /// Fails as a whole when the catalog aggregate cannot be fetched or is empty.
    pub async fn classify_abc(&self) -> Result<AbcResult, AnalyticsError> {
        let catalog = self.catalog.catalog_aggregates().await?;
        let result = self.run_job(AbcClassificationJob::new(catalog)).await?;
        info!(
            a = result.a.products.len(),
            b = result.b.products.len(),
            c = result.c.products.len(),
            "abc classification complete"
        );
        Ok(result)
    }

    async fn forecast_one(
        &self,
        product_id: ProductId,
        horizon_days: u32,
        model: ForecastModel,
    ) -> Result<DemandPrediction, AnalyticsError> {
        let (history, name) = tokio::try_join!(
            self.history(product_id, self.config.forecast_lookback_days),
            async {
                self.catalog
                    .product_name(product_id)
                    .await
                    .map_err(AnalyticsError::from)
            },
        )?;
        self.run_job(DemandForecastJob::new(product_id, name, history, horizon_days).with_model(model))
            .await
    }

    async fn optimize_one(&self, product_id: ProductId) -> Result<InventoryOptimization, AnalyticsError> {
        let (current_stock, prediction, patterns) = tokio::try_join!(
            async {
                self.stock
                    .current_stock(product_id)
                    .await
                    .map_err(AnalyticsError::from)
            },
            self.forecast_one(
                product_id,
                self.config.optimizer_horizon_days,
                self.config.default_model
            ),
            self.analyze_seasonal_patterns(product_id),
        )?;
        self.run_job(
            InventoryOptimizationJob::new(product_id, current_stock, prediction, patterns)
                .with_unit_carrying_cost(self.config.unit_carrying_cost),
        )
        .await
    }

    async fn history(
        &self,
        product_id: ProductId,
        days: u32,
    ) -> Result<Vec<DailySalesRecord>, AnalyticsError> {
        let records = self.sales.historical_sales(product_id, days).await?;
        if records.is_empty() {
            return Err(AnalyticsError::DataUnavailable { product_id });
        }
        Ok(records)
    }

    /// Run a pure job on the blocking pool.
    async fn run_job<J: AnalyticsJob>(&self, job: J) -> Result<J::Output, AnalyticsError> {
        let kind = job.kind();
        let started = Instant::now();
        let output = tokio::task::spawn_blocking(move || job.run())
            .await
            .map_err(|e| AnalyticsError::TaskFailed(e.to_string()))??;
        debug!(job = kind, elapsed_us = started.elapsed().as_micros() as u64, "job completed");
        Ok(output)
    }

    /// Run `op` once per product on the runtime, bounded by `max_concurrency`.
    ///
    /// Outcomes come back in the order of `product_ids`.
    async fn run_batch<T, F, Fut>(
        &self,
        name: &'static str,
        product_ids: &[ProductId],
        op: F,
    ) -> Vec<ProductOutcome<T>>
    where
        T: Send + 'static,
        F: Fn(InventoryAnalyticsService, ProductId) -> Fut,
        Fut: Future<Output = Result<T, AnalyticsError>> + Send + 'static,
    {
        let handles: Vec<_> = product_ids
            .iter()
            .map(|&product_id| {
                let limiter = self.limiter.clone();
                let task = op(self.clone(), product_id);
                let handle = tokio::spawn(async move {
                    let _permit = limiter
                        .acquire_owned()
                        .await
                        .map_err(|e| AnalyticsError::TaskFailed(e.to_string()))?;
                    task.await
                });
                (product_id, handle)
            })
            .collect();

        let mut outcomes = Vec::with_capacity(handles.len());
        for (product_id, handle) in handles {
            let result = match handle.await {
                Ok(result) => result,
                Err(e) => Err(AnalyticsError::TaskFailed(e.to_string())),
            };
            if let Err(e) = &result {
                warn!(batch = name, product = %product_id, error = %e, "product failed; continuing batch");
            }
            outcomes.push(ProductOutcome { product_id, result });
        }

        let failed = outcomes.iter().filter(|o| !o.is_ok()).count();
        info!(
            batch = name,
            succeeded = outcomes.len() - failed,
            failed,
            "batch complete"
        );
        outcomes
    }
}
