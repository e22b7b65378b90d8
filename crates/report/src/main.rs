//! Runs every analytics operation over a JSON commerce fixture and prints one
//! JSON report to stdout.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use serde_json::json;

use stockwise_forecast::ForecastModel;
use stockwise_infra::{AnalyticsConfig, InMemoryCommerceData, InventoryAnalyticsService};

/// Inventory analytics report over a commerce fixture
#[derive(Debug, Parser)]
#[command(name = "stockwise-report")]
#[command(version, about, long_about = None)]
struct Cli {
    /// JSON fixture with products and their daily sales
    fixture: PathBuf,

    /// Days past the last sale to forecast
    #[arg(default_value_t = 30)]
    horizon_days: u32,

    /// Forecast model tag (defaults to STOCKWISE_DEFAULT_MODEL, then ensemble)
    model: Option<ForecastModel>,
}

#[tokio::main]
async fn main() -> Result<()> {
    stockwise_observability::init();

    let cli = Cli::parse();
    let config = AnalyticsConfig::from_env();
    let model = cli.model.unwrap_or(config.default_model);
    let horizon_days = cli.horizon_days;
    let path = cli.fixture.display().to_string();

    let raw = std::fs::read_to_string(&path).with_context(|| format!("failed to read {path}"))?;
    let data = Arc::new(InMemoryCommerceData::from_json(&raw).with_context(|| format!("invalid fixture {path}"))?);
    let product_ids = data.product_ids()?;
    tracing::info!(products = product_ids.len(), horizon_days, %model, "running analytics report");

    let service = InventoryAnalyticsService::from_provider(data, config);

    let forecasts = service.forecast_demand(&product_ids, horizon_days, model).await;
    let optimizations = service.optimize_inventory_levels(&product_ids).await;

    let mut per_product = Vec::with_capacity(product_ids.len());
    for id in &product_ids {
        let seasonal = service.analyze_seasonal_patterns(*id).await;
        let reorder = service.calculate_reorder_point(*id, None).await;
        per_product.push(json!({
            "product_id": id,
            "seasonal_patterns": result_json(seasonal)?,
            "reorder_point": result_json(reorder)?,
        }));
    }

    let abc = result_json(service.classify_abc().await)?;

    let report = json!({
        "forecasts": forecasts,
        "optimizations": optimizations,
        "products": per_product,
        "abc": abc,
    });
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

/// Render a single-product result the same way batch outcomes are rendered.
fn result_json<T, E>(result: Result<T, E>) -> Result<serde_json::Value>
where
    T: serde::Serialize,
    E: std::fmt::Display,
{
    Ok(match result {
        Ok(value) => json!({ "status": "ok", "value": serde_json::to_value(value)? }),
        Err(e) => json!({ "status": "failed", "error": e.to_string() }),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positional_arguments_parse() {
        let cli = Cli::try_parse_from(["stockwise-report", "demo.json", "14", "arima"]).unwrap();
        assert_eq!(cli.fixture, PathBuf::from("demo.json"));
        assert_eq!(cli.horizon_days, 14);
        assert_eq!(cli.model, Some(ForecastModel::Arima));
    }

    #[test]
    fn horizon_and_model_are_optional() {
        let cli = Cli::try_parse_from(["stockwise-report", "demo.json"]).unwrap();
        assert_eq!(cli.horizon_days, 30);
        assert_eq!(cli.model, None);
    }

    #[test]
    fn unknown_model_is_rejected() {
        assert!(Cli::try_parse_from(["stockwise-report", "demo.json", "7", "prophet"]).is_err());
    }
}
