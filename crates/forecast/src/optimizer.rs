use serde::{Deserialize, Serialize};

use stockwise_core::{ProductId, ValueObject};

use crate::demand::DemandPrediction;
use crate::error::ForecastError;
use crate::job::AnalyticsJob;
use crate::seasonal::SeasonalPattern;
use crate::stats::mean;

/// Carrying cost per surplus unit when none is configured.
pub const DEFAULT_UNIT_CARRYING_COST: f64 = 50.0;

const OPTIMAL_STOCK_BUFFER: f64 = 1.2;
const REORDER_SHARE_OF_OPTIMAL: f64 = 0.3;
/// Fixed-ratio stand-in for the classical square-root EOQ.
const EOQ_SHARE_OF_DEMAND: f64 = 0.5;
const SAFETY_SHARE_OF_DEMAND: f64 = 0.2;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventoryOptimization {
    pub product_id: ProductId,
    pub current_stock: i64,
    pub optimal_stock_level: u64,
    pub reorder_point: u64,
    pub economic_order_quantity: u64,
    pub safety_stock: u64,
    pub carrying_cost_reduction: f64,
    /// Percentage in [0, 100].
    pub stockout_risk_reduction: f64,
}

impl ValueObject for InventoryOptimization {}

/// Target stock levels derived from a demand forecast and the product's
/// seasonal profile.
#[derive(Debug, Clone)]
pub struct InventoryOptimizationJob {
    product_id: ProductId,
    current_stock: i64,
    prediction: DemandPrediction,
    patterns: Vec<SeasonalPattern>,
    unit_carrying_cost: f64,
}

impl InventoryOptimizationJob {
    pub fn new(
        product_id: ProductId,
        current_stock: i64,
        prediction: DemandPrediction,
        patterns: Vec<SeasonalPattern>,
    ) -> Self {
        Self {
            product_id,
            current_stock,
            prediction,
            patterns,
            unit_carrying_cost: DEFAULT_UNIT_CARRYING_COST,
        }
    }

    pub fn with_unit_carrying_cost(mut self, cost: f64) -> Self {
        self.unit_carrying_cost = cost;
        self
    }
}

impl AnalyticsJob for InventoryOptimizationJob {
    type Output = InventoryOptimization;

    fn kind(&self) -> &'static str {
        "inventory.optimization"
    }

    fn run(&self) -> Result<InventoryOptimization, ForecastError> {
        if self.patterns.len() != 12 {
            return Err(ForecastError::invalid_input(format!(
                "expected 12 seasonal patterns, got {}",
                self.patterns.len()
            )));
        }
        if self.prediction.product_id != self.product_id
            || self.patterns.iter().any(|p| p.product_id != self.product_id)
        {
            return Err(ForecastError::invalid_input(
                "product_id mismatch between job and its inputs",
            ));
        }
        if !(self.unit_carrying_cost.is_finite() && self.unit_carrying_cost >= 0.0) {
            return Err(ForecastError::invalid_input(
                "unit carrying cost must be a finite non-negative number",
            ));
        }

        let indices: Vec<f64> = self.patterns.iter().map(|p| p.seasonal_index).collect();
        let avg_seasonal_index = mean(&indices);
        let demand = self.prediction.predicted_demand as f64;

        let optimal_stock_level = (demand * avg_seasonal_index * OPTIMAL_STOCK_BUFFER).round().max(0.0) as u64;
        let reorder_point = (optimal_stock_level as f64 * REORDER_SHARE_OF_OPTIMAL).round() as u64;
        let economic_order_quantity = (demand * EOQ_SHARE_OF_DEMAND).round() as u64;
        let safety_stock = (demand * SAFETY_SHARE_OF_DEMAND).round() as u64;

        let surplus = self.current_stock as f64 - optimal_stock_level as f64;
        let carrying_cost_reduction = (surplus * self.unit_carrying_cost).max(0.0);

        Ok(InventoryOptimization {
            product_id: self.product_id,
            current_stock: self.current_stock,
            optimal_stock_level,
            reorder_point,
            economic_order_quantity,
            safety_stock,
            carrying_cost_reduction,
            stockout_risk_reduction: (self.prediction.confidence_score * 100.0).clamp(0.0, 100.0),
        })
    }
}
