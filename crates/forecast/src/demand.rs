use core::str::FromStr;

use chrono::{Datelike, Days, NaiveDate};
use serde::{Deserialize, Serialize};

use stockwise_core::{DailySalesRecord, ProductId, ValueObject};

use crate::error::ForecastError;
use crate::job::AnalyticsJob;
use crate::seasonal::MonthlyTotals;
use crate::stats::{coefficient_of_variation, least_squares_slope, mean, stddev_population};

/// Maximum seasonal swing applied to the average (±20%).
const SEASONAL_BAND: f64 = 0.2;
/// Maximum trend swing applied to the average (±10%).
const TREND_BAND: f64 = 0.1;
/// Trailing window for the trend slope, in records.
const TREND_WINDOW: usize = 30;
/// Fixed ±20% confidence band around the point estimate.
const INTERVAL_LOWER: f64 = 0.8;
const INTERVAL_UPPER: f64 = 1.2;
const CONFIDENCE_FLOOR: f64 = 0.75;
const CONFIDENCE_CEILING: f64 = 0.95;
/// History length at which coverage saturates.
const FULL_COVERAGE_DAYS: f64 = 365.0;
const PROMOTION_SIGMA: f64 = 2.0;
const PROMOTIONAL_CAP: f64 = 0.1;
const EXTERNAL_CAP: f64 = 0.05;

/// Model tag requested by the caller.
///
/// Metadata only: every tag runs the same arithmetic.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ForecastModel {
    LinearRegression,
    Arima,
    NeuralNetwork,
    Ensemble,
}

impl ForecastModel {
    pub fn as_str(self) -> &'static str {
        match self {
            ForecastModel::LinearRegression => "linear_regression",
            ForecastModel::Arima => "arima",
            ForecastModel::NeuralNetwork => "neural_network",
            ForecastModel::Ensemble => "ensemble",
        }
    }
}

impl core::fmt::Display for ForecastModel {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ForecastModel {
    type Err = ForecastError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "linear_regression" => Ok(ForecastModel::LinearRegression),
            "arima" => Ok(ForecastModel::Arima),
            "neural_network" => Ok(ForecastModel::NeuralNetwork),
            "ensemble" => Ok(ForecastModel::Ensemble),
            other => Err(ForecastError::invalid_input(format!("unknown forecast model '{other}'"))),
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfidenceInterval {
    pub lower: u64,
    pub upper: u64,
}

/// Signed offsets from 1.0 explaining the point estimate.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContributingFactors {
    pub seasonal: f64,
    pub trend: f64,
    pub promotional: f64,
    pub external: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DemandPrediction {
    pub product_id: ProductId,
    pub product_name: String,
    pub prediction_date: NaiveDate,
    pub predicted_demand: u64,
    pub confidence_interval: ConfidenceInterval,
    pub confidence_score: f64,
    pub contributing_factors: ContributingFactors,
    pub model_used: ForecastModel,
}

impl ValueObject for DemandPrediction {}

/// Point forecast of daily demand `horizon_days` past the last observed day.
///
/// Model:
/// - Start from the mean daily quantity of the window.
/// - Scale by the seasonal index of the target month (clamped to ±20%).
/// - Scale by the trailing 30-record least-squares trend, projected over the
///   horizon (clamped to ±10%).
/// - Interval is a fixed ±20% band around the rounded estimate.
#[derive(Debug, Clone)]
pub struct DemandForecastJob {
    product_id: ProductId,
    product_name: String,
    history: Vec<DailySalesRecord>,
    horizon_days: u32,
    model: ForecastModel,
}

impl DemandForecastJob {
    pub fn new(
        product_id: ProductId,
        product_name: impl Into<String>,
        history: Vec<DailySalesRecord>,
        horizon_days: u32,
    ) -> Self {
        Self {
            product_id,
            product_name: product_name.into(),
            history,
            horizon_days,
            model: ForecastModel::Ensemble,
        }
    }

    pub fn with_model(mut self, model: ForecastModel) -> Self {
        self.model = model;
        self
    }
}

impl AnalyticsJob for DemandForecastJob {
    type Output = DemandPrediction;

    fn kind(&self) -> &'static str {
        "inventory.demand_forecast"
    }

    fn run(&self) -> Result<DemandPrediction, ForecastError> {
        if self.horizon_days == 0 {
            return Err(ForecastError::invalid_input("horizon_days must be >= 1"));
        }

        let last_date = self
            .history
            .iter()
            .map(|r| r.date)
            .max()
            .ok_or_else(|| {
                ForecastError::data_unavailable(format!(
                    "no sales history for product {}",
                    self.product_id
                ))
            })?;

        let prediction_date = last_date
            .checked_add_days(Days::new(u64::from(self.horizon_days)))
            .ok_or_else(|| ForecastError::invalid_input("prediction date out of range"))?;

        let quantities: Vec<f64> = self.history.iter().map(DailySalesRecord::quantity_f64).collect();
        let avg_demand = mean(&quantities);

        let seasonal_factor = MonthlyTotals::from_records(&self.history)
            .index(prediction_date.month())
            .clamp(1.0 - SEASONAL_BAND, 1.0 + SEASONAL_BAND);
        let trend_factor = 1.0 + trend_offset(&quantities, avg_demand, self.horizon_days);

        let predicted = (avg_demand * seasonal_factor * trend_factor).round();
        let predicted_demand = predicted.max(0.0) as u64;

        let cv = coefficient_of_variation(&quantities);

        Ok(DemandPrediction {
            product_id: self.product_id,
            product_name: self.product_name.clone(),
            prediction_date,
            predicted_demand,
            confidence_interval: confidence_interval(predicted_demand),
            confidence_score: confidence_score(quantities.len(), cv),
            contributing_factors: ContributingFactors {
                seasonal: seasonal_factor - 1.0,
                trend: trend_factor - 1.0,
                promotional: promotional_offset(&quantities, avg_demand),
                external: (cv * EXTERNAL_CAP).min(EXTERNAL_CAP),
            },
            model_used: self.model,
        })
    }
}

pub fn confidence_interval(predicted_demand: u64) -> ConfidenceInterval {
    let p = predicted_demand as f64;
    ConfidenceInterval {
        lower: (INTERVAL_LOWER * p).round() as u64,
        upper: (INTERVAL_UPPER * p).round() as u64,
    }
}

/// Relative trend over the horizon, from the trailing window slope.
fn trend_offset(quantities: &[f64], avg_demand: f64, horizon_days: u32) -> f64 {
    if avg_demand <= 0.0 {
        return 0.0;
    }
    let start = quantities.len().saturating_sub(TREND_WINDOW);
    let slope = least_squares_slope(&quantities[start..]);
    (slope * f64::from(horizon_days) / avg_demand).clamp(-TREND_BAND, TREND_BAND)
}

/// Share of spike days (above mean + 2σ), capped.
fn promotional_offset(quantities: &[f64], avg_demand: f64) -> f64 {
    if quantities.is_empty() {
        return 0.0;
    }
    let threshold = avg_demand + PROMOTION_SIGMA * stddev_population(quantities, avg_demand);
    let spikes = quantities.iter().filter(|q| **q > threshold).count();
    (spikes as f64 / quantities.len() as f64).min(PROMOTIONAL_CAP)
}

/// Score in [0.75, 0.95]: longer and steadier histories score higher.
fn confidence_score(points: usize, cv: f64) -> f64 {
    let coverage = (points as f64 / FULL_COVERAGE_DAYS).min(1.0);
    let stability = 1.0 / (1.0 + cv.max(0.0));
    let span = CONFIDENCE_CEILING - CONFIDENCE_FLOOR;
    (CONFIDENCE_FLOOR + span * coverage * stability).clamp(CONFIDENCE_FLOOR, CONFIDENCE_CEILING)
}
