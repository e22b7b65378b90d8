use chrono::Datelike;
use serde::{Deserialize, Serialize};
use tracing::debug;

use stockwise_core::{DailySalesRecord, ProductId, ValueObject};

use crate::error::ForecastError;
use crate::job::AnalyticsJob;
use crate::stats::mean;
use crate::tables::ConfidenceTier;

/// Index used for a month without data, and for every month when the overall
/// average is zero.
pub const NEUTRAL_SEASONAL_INDEX: f64 = 1.0;

/// Seasonal index of one calendar month for one product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeasonalPattern {
    pub product_id: ProductId,
    /// Calendar month, 1..=12.
    pub month: u32,
    pub seasonal_index: f64,
    pub confidence: f64,
    pub historical_data_points: usize,
}

impl ValueObject for SeasonalPattern {}

/// Month-of-year seasonality over up to two years of daily records.
///
/// Model:
/// - `index(m) = mean quantity of records in month m / mean quantity of all records`.
/// - Years are pooled: January 2023 and January 2024 both feed month 1.
/// - Confidence comes from [`ConfidenceTier`], not from a statistical test.
#[derive(Debug, Clone)]
pub struct SeasonalAnalysisJob {
    product_id: ProductId,
    history: Vec<DailySalesRecord>,
}

impl SeasonalAnalysisJob {
    pub fn new(product_id: ProductId, history: Vec<DailySalesRecord>) -> Self {
        Self {
            product_id,
            history,
        }
    }
}

impl AnalyticsJob for SeasonalAnalysisJob {
    type Output = Vec<SeasonalPattern>;

    fn kind(&self) -> &'static str {
        "inventory.seasonal_patterns"
    }

    fn run(&self) -> Result<Self::Output, ForecastError> {
        if self.history.is_empty() {
            return Err(ForecastError::data_unavailable(format!(
                "no sales history for product {}",
                self.product_id
            )));
        }
        Ok(analyze(self.product_id, &self.history))
    }
}

/// Per-month quantity totals and counts, indexed by `month0`.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct MonthlyTotals {
    sums: [f64; 12],
    counts: [usize; 12],
    overall_average: f64,
}

impl MonthlyTotals {
    pub(crate) fn from_records(records: &[DailySalesRecord]) -> Self {
        let mut totals = MonthlyTotals::default();
        for r in records {
            let m = r.date.month0() as usize;
            totals.sums[m] += r.quantity_f64();
            totals.counts[m] += 1;
        }
        let quantities: Vec<f64> = records.iter().map(DailySalesRecord::quantity_f64).collect();
        totals.overall_average = mean(&quantities);
        totals
    }

    pub(crate) fn data_points(&self, month: u32) -> usize {
        self.counts[(month - 1) as usize]
    }

    /// Seasonal index of `month` (1..=12), neutral when undefined.
    pub(crate) fn index(&self, month: u32) -> f64 {
        let m = (month - 1) as usize;
        if self.counts[m] == 0 || self.overall_average <= 0.0 {
            return NEUTRAL_SEASONAL_INDEX;
        }
        let monthly_average = self.sums[m] / self.counts[m] as f64;
        monthly_average / self.overall_average
    }
}

/// Compute all twelve patterns for a non-empty history.
pub fn analyze(product_id: ProductId, records: &[DailySalesRecord]) -> Vec<SeasonalPattern> {
    let totals = MonthlyTotals::from_records(records);

    (1..=12u32)
        .map(|month| {
            let points = totals.data_points(month);
            let tier = ConfidenceTier::for_data_points(points);
            if points == 0 {
                debug!(product = %product_id, month, "no sales records for month; using neutral index");
            } else if tier == ConfidenceTier::Low {
                debug!(product = %product_id, month, points, "insufficient history for month");
            }

            SeasonalPattern {
                product_id,
                month,
                seasonal_index: totals.index(month),
                confidence: tier.confidence(),
                historical_data_points: points,
            }
        })
        .collect()
}
