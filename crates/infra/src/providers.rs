//! Collaborator interfaces consumed by the analytics service.
//!
//! Real deployments back these with the order database and catalog service;
//! [`InMemoryCommerceData`] implements all of them for tests, benches and the
//! report binary.

use std::sync::RwLock;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use chrono::Days;
use serde::{Deserialize, Serialize};

use stockwise_core::{CatalogAggregate, DailySalesRecord, ProductId};

use crate::error::ProviderError;

/// Daily sales history source.
#[async_trait]
pub trait SalesHistoryProvider: Send + Sync {
    /// Records from the trailing `days` calendar days, oldest first.
    async fn historical_sales(
        &self,
        product_id: ProductId,
        days: u32,
    ) -> Result<Vec<DailySalesRecord>, ProviderError>;
}

/// Current on-hand stock lookup.
#[async_trait]
pub trait StockProvider: Send + Sync {
    async fn current_stock(&self, product_id: ProductId) -> Result<i64, ProviderError>;
}

/// Supplier lead time lookup.
#[async_trait]
pub trait LeadTimeProvider: Send + Sync {
    /// Average replenishment lead time in days.
    async fn average_lead_time(&self, product_id: ProductId) -> Result<f64, ProviderError>;
}

/// Product catalog lookups.
#[async_trait]
pub trait ProductCatalog: Send + Sync {
    async fn product_name(&self, product_id: ProductId) -> Result<String, ProviderError>;

    /// Revenue/volume/margin aggregates for every product in the catalog.
    async fn catalog_aggregates(&self) -> Result<Vec<CatalogAggregate>, ProviderError>;
}

/// One product as described in a JSON fixture.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductFixture {
    pub product_id: ProductId,
    pub name: String,
    #[serde(default)]
    pub current_stock: i64,
    #[serde(default = "default_lead_time_days")]
    pub lead_time_days: f64,
    /// Gross margin ratio reported in the catalog aggregate.
    #[serde(default)]
    pub margin: f64,
    #[serde(default)]
    pub sales: Vec<DailySalesRecord>,
}

fn default_lead_time_days() -> f64 {
    7.0
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CommerceFixture {
    pub products: Vec<ProductFixture>,
}

/// In-memory commerce data for tests/dev.
///
/// Products keep their insertion order, which is also the catalog order.
#[derive(Debug, Default)]
pub struct InMemoryCommerceData {
    products: RwLock<Vec<ProductFixture>>,
    catalog_offline: AtomicBool,
}

impl InMemoryCommerceData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_fixture(mut fixture: CommerceFixture) -> Self {
        for p in &mut fixture.products {
            p.sales.sort_by_key(|r| r.date);
        }
        Self {
            products: RwLock::new(fixture.products),
            catalog_offline: AtomicBool::new(false),
        }
    }

    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        let fixture: CommerceFixture = serde_json::from_str(raw)?;
        Ok(Self::from_fixture(fixture))
    }

    /// Insert or replace a product.
    pub fn upsert_product(&self, mut product: ProductFixture) -> Result<(), ProviderError> {
        product.sales.sort_by_key(|r| r.date);
        let mut products = self.write()?;
        match products.iter_mut().find(|p| p.product_id == product.product_id) {
            Some(existing) => *existing = product,
            None => products.push(product),
        }
        Ok(())
    }

    pub fn product_ids(&self) -> Result<Vec<ProductId>, ProviderError> {
        Ok(self.read()?.iter().map(|p| p.product_id).collect())
    }

    /// Simulate an outage of the catalog aggregate feed.
    pub fn set_catalog_offline(&self, offline: bool) {
        self.catalog_offline.store(offline, Ordering::SeqCst);
    }

    fn read(&self) -> Result<std::sync::RwLockReadGuard<'_, Vec<ProductFixture>>, ProviderError> {
        self.products
            .read()
            .map_err(|_| ProviderError::Unavailable("commerce data lock poisoned".to_string()))
    }

    fn write(&self) -> Result<std::sync::RwLockWriteGuard<'_, Vec<ProductFixture>>, ProviderError> {
        self.products
            .write()
            .map_err(|_| ProviderError::Unavailable("commerce data lock poisoned".to_string()))
    }

    fn with_product<T>(
        &self,
        product_id: ProductId,
        f: impl FnOnce(&ProductFixture) -> T,
    ) -> Result<T, ProviderError> {
        let products = self.read()?;
        products
            .iter()
            .find(|p| p.product_id == product_id)
            .map(f)
            .ok_or(ProviderError::NotFound(product_id))
    }
}

#[async_trait]
impl SalesHistoryProvider for InMemoryCommerceData {
    async fn historical_sales(
        &self,
        product_id: ProductId,
        days: u32,
    ) -> Result<Vec<DailySalesRecord>, ProviderError> {
        self.with_product(product_id, |p| {
            let Some(last) = p.sales.last().map(|r| r.date) else {
                return Vec::new();
            };
            // Anchored on the newest record, not on the wall clock.
            let start = match last.checked_sub_days(Days::new(u64::from(days))) {
                Some(cutoff) => p.sales.partition_point(|r| r.date <= cutoff),
                None => 0,
            };
            p.sales[start..].to_vec()
        })
    }
}

#[async_trait]
impl StockProvider for InMemoryCommerceData {
    async fn current_stock(&self, product_id: ProductId) -> Result<i64, ProviderError> {
        self.with_product(product_id, |p| p.current_stock)
    }
}

#[async_trait]
impl LeadTimeProvider for InMemoryCommerceData {
    async fn average_lead_time(&self, product_id: ProductId) -> Result<f64, ProviderError> {
        self.with_product(product_id, |p| p.lead_time_days)
    }
}

#[async_trait]
impl ProductCatalog for InMemoryCommerceData {
    async fn product_name(&self, product_id: ProductId) -> Result<String, ProviderError> {
        self.with_product(product_id, |p| p.name.clone())
    }

    async fn catalog_aggregates(&self) -> Result<Vec<CatalogAggregate>, ProviderError> {
        if self.catalog_offline.load(Ordering::SeqCst) {
            return Err(ProviderError::Unavailable("catalog aggregate feed offline".to_string()));
        }
        Ok(self
            .read()?
            .iter()
            .map(|p| CatalogAggregate {
                product_id: p.product_id,
                revenue: p.sales.iter().map(|r| r.revenue).sum(),
                volume: p.sales.iter().map(|r| r.quantity).sum(),
                margin: p.margin,
                order_frequency: p.sales.iter().filter(|r| r.quantity > 0).count() as f64,
            })
            .collect())
    }
}
