use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::warn;

use stockwise_core::{DailySalesRecord, ProductId, ValueObject};

use crate::error::ForecastError;
use crate::job::AnalyticsJob;
use crate::stats::{mean, stddev_population};
use crate::tables::ServiceLevel;

/// Reported `optimal_service_level`. Always 0.95, whatever level was requested.
pub const REPORTED_OPTIMAL_SERVICE_LEVEL: f64 = 0.95;
/// Days of average demand that safety stock may cover before it counts as excess.
const EXCESS_COVER_DAYS: f64 = 3.0;
const STOCKOUT_SIGMA_SCALE: f64 = 10.0;

#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskAssessment {
    pub stockout_probability: f64,
    pub excess_inventory_risk: f64,
    pub optimal_service_level: f64,
}

#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReorderPointResult {
    pub reorder_point: u64,
    pub safety_stock: u64,
    pub lead_time_demand: u64,
    /// Population standard deviation of daily demand.
    pub demand_variability: f64,
    pub risk_assessment: RiskAssessment,
}

impl ValueObject for ReorderPointResult {}

/// Statistical reorder point for a target service level.
///
/// Model:
/// - Sum quantities per calendar day, then take mean and population σ.
/// - `safety = z × σ × sqrt(lead_time)` with `z` from the [`ServiceLevel`] table.
/// - `reorder = mean × lead_time + safety`, rounded up.
#[derive(Debug, Clone)]
pub struct ReorderPointJob {
    product_id: ProductId,
    history: Vec<DailySalesRecord>,
    lead_time_days: f64,
    service_level: f64,
}

impl ReorderPointJob {
    pub fn new(product_id: ProductId, history: Vec<DailySalesRecord>, lead_time_days: f64) -> Self {
        Self {
            product_id,
            history,
            lead_time_days,
            service_level: ServiceLevel::DEFAULT.probability(),
        }
    }

    pub fn with_service_level(mut self, service_level: f64) -> Self {
        self.service_level = service_level;
        self
    }

    /// Table level for the requested probability, falling back to the default.
    fn resolved_level(&self) -> ServiceLevel {
        ServiceLevel::from_probability(self.service_level).unwrap_or_else(|| {
            warn!(
                product = %self.product_id,
                requested = self.service_level,
                fallback = ServiceLevel::DEFAULT.probability(),
                "service level not tabulated; using default z-score"
            );
            ServiceLevel::DEFAULT
        })
    }
}

impl AnalyticsJob for ReorderPointJob {
    type Output = ReorderPointResult;

    fn kind(&self) -> &'static str {
        "inventory.reorder_point"
    }

    fn run(&self) -> Result<ReorderPointResult, ForecastError> {
        if !(self.lead_time_days.is_finite() && self.lead_time_days >= 0.0) {
            return Err(ForecastError::invalid_input(format!(
                "lead time must be a finite non-negative number of days (got {})",
                self.lead_time_days
            )));
        }

        let daily_demands = daily_totals(&self.history);
        if daily_demands.is_empty() {
            return Err(ForecastError::data_unavailable(format!(
                "no sales history for product {}",
                self.product_id
            )));
        }

        let avg_daily_demand = mean(&daily_demands);
        let demand_std_dev = stddev_population(&daily_demands, avg_daily_demand);

        let lead_time_demand = avg_daily_demand * self.lead_time_days;
        let z = self.resolved_level().z_score();
        let safety_stock = z * demand_std_dev * self.lead_time_days.sqrt();
        let reorder_point = lead_time_demand + safety_stock;

        let stockout_probability = if demand_std_dev > 0.0 {
            ((avg_daily_demand - reorder_point) / (demand_std_dev * STOCKOUT_SIGMA_SCALE)).max(0.0)
        } else {
            0.0
        };
        let excess_inventory_risk = if safety_stock > 0.0 {
            ((safety_stock - avg_daily_demand * EXCESS_COVER_DAYS) / safety_stock).max(0.0)
        } else {
            0.0
        };

        Ok(ReorderPointResult {
            reorder_point: reorder_point.ceil() as u64,
            safety_stock: safety_stock.ceil() as u64,
            lead_time_demand: lead_time_demand.ceil() as u64,
            demand_variability: demand_std_dev,
            risk_assessment: RiskAssessment {
                stockout_probability,
                excess_inventory_risk,
                optimal_service_level: REPORTED_OPTIMAL_SERVICE_LEVEL,
            },
        })
    }
}

/// One total quantity per calendar day, in date order.
fn daily_totals(records: &[DailySalesRecord]) -> Vec<f64> {
    let mut by_day: BTreeMap<NaiveDate, u64> = BTreeMap::new();
    for r in records {
        *by_day.entry(r.date).or_insert(0) += r.quantity;
    }
    by_day.into_values().map(|q| q as f64).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn day(offset: i64) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 1).unwrap() + chrono::Duration::days(offset)
    }

    fn series(quantities: &[u64]) -> Vec<DailySalesRecord> {
        quantities
            .iter()
            .enumerate()
            .map(|(i, q)| DailySalesRecord::new(day(i as i64), *q, 0.0).unwrap())
            .collect()
    }

    /// Alternating 8/12: mean 10, population σ 2.
    fn alternating() -> Vec<DailySalesRecord> {
        let q: Vec<u64> = (0..180).map(|i| if i % 2 == 0 { 8 } else { 12 }).collect();
        series(&q)
    }

    #[test]
    fn computes_reorder_point_at_default_level() {
        let r = ReorderPointJob::new(ProductId::new(), alternating(), 4.0).run().unwrap();

        // lead time demand = 10 × 4 = 40; safety = 1.65 × 2 × 2 = 6.6 -> 7; reorder = 46.6 -> 47
        assert_eq!(r.lead_time_demand, 40);
        assert_eq!(r.safety_stock, 7);
        assert_eq!(r.reorder_point, 47);
        assert!((r.demand_variability - 2.0).abs() < 1e-12);
        assert_eq!(r.risk_assessment.stockout_probability, 0.0);
        assert_eq!(r.risk_assessment.excess_inventory_risk, 0.0);
    }

    #[test]
    fn z_table_drives_safety_stock() {
        let run = |level: f64| {
            ReorderPointJob::new(ProductId::new(), alternating(), 1.0)
                .with_service_level(level)
                .run()
                .unwrap()
        };
        // σ = 2, lead time 1: safety = 2z.
        assert_eq!(run(0.90).safety_stock, (2.0f64 * 1.28).ceil() as u64);
        assert_eq!(run(0.95).safety_stock, (2.0f64 * 1.65).ceil() as u64);
        assert_eq!(run(0.99).safety_stock, (2.0f64 * 2.33).ceil() as u64);
        assert_eq!(run(0.975), run(0.95));
    }

    #[test]
    fn optimal_service_level_is_always_reported_as_095() {
        let r = ReorderPointJob::new(ProductId::new(), alternating(), 2.0)
            .with_service_level(0.99)
            .run()
            .unwrap();
        assert_eq!(r.risk_assessment.optimal_service_level, 0.95);
    }

    #[test]
    fn multiple_records_per_day_are_summed() {
        let mut history = series(&[5, 5]);
        history.push(DailySalesRecord::new(day(0), 5, 0.0).unwrap());
        history.push(DailySalesRecord::new(day(1), 5, 0.0).unwrap());
        let r = ReorderPointJob::new(ProductId::new(), history, 3.0).run().unwrap();
        assert_eq!(r.lead_time_demand, 30);
        assert_eq!(r.demand_variability, 0.0);
        assert_eq!(r.safety_stock, 0);
    }

    #[test]
    fn large_safety_stock_flags_excess_risk() {
        // Mostly zeros with rare spikes: σ is large relative to the mean.
        let q: Vec<u64> = (0..180).map(|i| if i % 30 == 0 { 300 } else { 0 }).collect();
        let r = ReorderPointJob::new(ProductId::new(), series(&q), 9.0).run().unwrap();
        assert!(r.risk_assessment.excess_inventory_risk > 0.0);
        assert!(r.risk_assessment.excess_inventory_risk < 1.0);
    }

    #[test]
    fn zero_lead_time_has_no_lead_time_demand() {
        let r = ReorderPointJob::new(ProductId::new(), alternating(), 0.0).run().unwrap();
        assert_eq!(r.lead_time_demand, 0);
        assert_eq!(r.safety_stock, 0);
        assert_eq!(r.reorder_point, 0);
        // mean 10 above a zero reorder point: (10 - 0) / (2 × 10)
        assert!((r.risk_assessment.stockout_probability - 0.5).abs() < 1e-12);
    }

    #[test]
    fn invalid_lead_time_is_rejected() {
        for lt in [-1.0, f64::NAN, f64::INFINITY] {
            let err = ReorderPointJob::new(ProductId::new(), alternating(), lt).run().unwrap_err();
            assert!(matches!(err, ForecastError::InvalidInput(_)));
        }
    }

    #[test]
    fn empty_history_is_data_unavailable() {
        let err = ReorderPointJob::new(ProductId::new(), vec![], 5.0).run().unwrap_err();
        assert!(matches!(err, ForecastError::DataUnavailable(_)));
    }

    proptest! {
        #[test]
        fn reorder_point_covers_lead_time_demand(
            quantities in prop::collection::vec(0u64..10_000, 1..180),
            lead_time in 0.0f64..60.0,
            level in prop::sample::select(vec![0.90, 0.95, 0.99, 0.5, 0.975]),
        ) {
            let r = ReorderPointJob::new(ProductId::new(), series(&quantities), lead_time)
                .with_service_level(level)
                .run()
                .unwrap();
            prop_assert!(r.reorder_point >= r.lead_time_demand);
            prop_assert!(r.demand_variability >= 0.0);
            prop_assert!(r.risk_assessment.stockout_probability >= 0.0);
            prop_assert!(r.risk_assessment.excess_inventory_risk >= 0.0);
        }
    }
}
