//! Sales inputs handed to the analytics engine by its collaborators.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};
use crate::id::ProductId;
use crate::value_object::ValueObject;

/// One day of sales for one product.
///
/// Supplied by the historical data provider, oldest first, and never persisted
/// by the engine itself. Deserialization goes through [`DailySalesRecord::new`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawDailySalesRecord")]
pub struct DailySalesRecord {
    pub date: NaiveDate,
    pub quantity: u64,
    pub revenue: f64,
}

impl DailySalesRecord {
    pub fn new(date: NaiveDate, quantity: u64, revenue: f64) -> DomainResult<Self> {
        if !(revenue.is_finite() && revenue >= 0.0) {
            return Err(DomainError::validation(format!(
                "revenue must be a finite non-negative number (got {revenue})"
            )));
        }
        Ok(Self {
            date,
            quantity,
            revenue,
        })
    }

    pub fn quantity_f64(&self) -> f64 {
        self.quantity as f64
    }
}

impl ValueObject for DailySalesRecord {}

#[derive(Deserialize)]
struct RawDailySalesRecord {
    date: NaiveDate,
    quantity: u64,
    revenue: f64,
}

impl TryFrom<RawDailySalesRecord> for DailySalesRecord {
    type Error = DomainError;

    fn try_from(raw: RawDailySalesRecord) -> DomainResult<Self> {
        Self::new(raw.date, raw.quantity, raw.revenue)
    }
}

/// Whole-catalog aggregate for one product (input to ABC classification).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogAggregate {
    pub product_id: ProductId,
    pub revenue: f64,
    pub volume: u64,
    pub margin: f64,
    pub order_frequency: f64,
}

impl CatalogAggregate {
    /// Aggregate carrying only revenue; the other figures are zeroed.
    pub fn with_revenue(product_id: ProductId, revenue: f64) -> Self {
        Self {
            product_id,
            revenue,
            volume: 0,
            margin: 0.0,
            order_frequency: 0.0,
        }
    }
}

impl ValueObject for CatalogAggregate {}
