//! Configuration loading and representation.

use core::str::FromStr;

use tracing::warn;

use stockwise_forecast::ForecastModel;
use stockwise_forecast::optimizer::DEFAULT_UNIT_CARRYING_COST;

/// Tunables for [`crate::InventoryAnalyticsService`].
///
/// Defaults reproduce the windows and constants the engine has always used.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalyticsConfig {
    /// History window for seasonal analysis (two years).
    pub seasonal_lookback_days: u32,
    /// History window for demand forecasts (one year).
    pub forecast_lookback_days: u32,
    /// History window for reorder points (six months).
    pub reorder_lookback_days: u32,
    /// Forecast horizon used by the inventory optimizer.
    pub optimizer_horizon_days: u32,
    pub unit_carrying_cost: f64,
    /// Model tag used when the optimizer requests a forecast.
    pub default_model: ForecastModel,
    /// Upper bound on concurrently running per-product tasks.
    pub max_concurrency: usize,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            seasonal_lookback_days: 730,
            forecast_lookback_days: 365,
            reorder_lookback_days: 180,
            optimizer_horizon_days: 30,
            unit_carrying_cost: DEFAULT_UNIT_CARRYING_COST,
            default_model: ForecastModel::Ensemble,
            max_concurrency: 8,
        }
    }
}

impl AnalyticsConfig {
    /// Read overrides from `STOCKWISE_*` environment variables.
    ///
    /// Unset variables keep their defaults; unparsable ones are logged and ignored.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`Self::from_env`] with an injectable variable source.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut cfg = Self::default();
        override_from(&lookup, "STOCKWISE_SEASONAL_LOOKBACK_DAYS", &mut cfg.seasonal_lookback_days);
        override_from(&lookup, "STOCKWISE_FORECAST_LOOKBACK_DAYS", &mut cfg.forecast_lookback_days);
        override_from(&lookup, "STOCKWISE_REORDER_LOOKBACK_DAYS", &mut cfg.reorder_lookback_days);
        override_from(&lookup, "STOCKWISE_OPTIMIZER_HORIZON_DAYS", &mut cfg.optimizer_horizon_days);
        override_from(&lookup, "STOCKWISE_UNIT_CARRYING_COST", &mut cfg.unit_carrying_cost);
        override_from(&lookup, "STOCKWISE_DEFAULT_MODEL", &mut cfg.default_model);
        override_from(&lookup, "STOCKWISE_MAX_CONCURRENCY", &mut cfg.max_concurrency);

        if cfg.max_concurrency == 0 {
            warn!("STOCKWISE_MAX_CONCURRENCY must be >= 1; using 1");
            cfg.max_concurrency = 1;
        }
        cfg
    }

    pub fn with_max_concurrency(mut self, max: usize) -> Self {
        self.max_concurrency = max.max(1);
        self
    }

    pub fn with_unit_carrying_cost(mut self, cost: f64) -> Self {
        self.unit_carrying_cost = cost;
        self
    }

    pub fn with_default_model(mut self, model: ForecastModel) -> Self {
        self.default_model = model;
        self
    }

    pub fn with_optimizer_horizon_days(mut self, days: u32) -> Self {
        self.optimizer_horizon_days = days;
        self
    }
}

fn override_from<T, F>(lookup: &F, key: &str, slot: &mut T)
where
    T: FromStr,
    T::Err: core::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    let Some(raw) = lookup(key) else {
        return;
    };
    match raw.trim().parse::<T>() {
        Ok(v) => *slot = v,
        Err(e) => warn!(key, value = %raw, error = %e, "ignoring invalid config value"),
    }
}
