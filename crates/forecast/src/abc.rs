use serde::{Deserialize, Serialize};
use tracing::debug;

use stockwise_core::{CatalogAggregate, ProductId, ValueObject};

use crate::error::ForecastError;
use crate::job::AnalyticsJob;
use crate::tables::AbcClass;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AbcBucket {
    /// Members in descending revenue order.
    pub products: Vec<ProductId>,
    /// Share of total revenue, in percent.
    pub revenue_contribution: f64,
    pub management_strategy: String,
}

/// One product's position in the revenue ranking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedProduct {
    pub product_id: ProductId,
    pub revenue: f64,
    /// Cumulative revenue share after adding this product, in percent.
    pub cumulative_percentage: f64,
    pub class: AbcClass,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AbcResult {
    #[serde(rename = "A")]
    pub a: AbcBucket,
    #[serde(rename = "B")]
    pub b: AbcBucket,
    #[serde(rename = "C")]
    pub c: AbcBucket,
    pub ranking: Vec<RankedProduct>,
}

impl ValueObject for AbcResult {}

impl AbcResult {
    pub fn bucket(&self, class: AbcClass) -> &AbcBucket {
        match class {
            AbcClass::A => &self.a,
            AbcClass::B => &self.b,
            AbcClass::C => &self.c,
        }
    }

    pub fn class_of(&self, product_id: ProductId) -> Option<AbcClass> {
        self.ranking
            .iter()
            .find(|r| r.product_id == product_id)
            .map(|r| r.class)
    }
}

/// Revenue tiering of the whole catalog.
///
/// Products are ranked by revenue (descending, ties keep input order) and each
/// is classified by the cumulative share *after* its own revenue is added.
/// A product that pushes the share across a boundary therefore lands in the
/// tier above that boundary.
#[derive(Debug, Clone)]
pub struct AbcClassificationJob {
    catalog: Vec<CatalogAggregate>,
}

impl AbcClassificationJob {
    pub fn new(catalog: Vec<CatalogAggregate>) -> Self {
        Self { catalog }
    }
}

impl AnalyticsJob for AbcClassificationJob {
    type Output = AbcResult;

    fn kind(&self) -> &'static str {
        "catalog.abc_classification"
    }

    fn run(&self) -> Result<AbcResult, ForecastError> {
        if self.catalog.is_empty() {
            return Err(ForecastError::data_unavailable("catalog aggregate is empty"));
        }
        if let Some(bad) = self
            .catalog
            .iter()
            .find(|p| !(p.revenue.is_finite() && p.revenue >= 0.0))
        {
            return Err(ForecastError::invalid_input(format!(
                "product {} has invalid revenue {}",
                bad.product_id, bad.revenue
            )));
        }

        // `sort_by` is stable: equal revenues keep their input order.
        let mut sorted: Vec<&CatalogAggregate> = self.catalog.iter().collect();
        sorted.sort_by(|x, y| y.revenue.total_cmp(&x.revenue));

        let total_revenue: f64 = sorted.iter().map(|p| p.revenue).sum();

        let mut cumulative_revenue = 0.0;
        let ranking: Vec<RankedProduct> = sorted
            .iter()
            .map(|p| {
                cumulative_revenue += p.revenue;
                let (cumulative_percentage, class) = if total_revenue > 0.0 {
                    let pct = cumulative_revenue / total_revenue * 100.0;
                    (pct, AbcClass::for_cumulative_percentage(pct))
                } else {
                    (100.0, AbcClass::C)
                };
                RankedProduct {
                    product_id: p.product_id,
                    revenue: p.revenue,
                    cumulative_percentage,
                    class,
                }
            })
            .collect();

        if total_revenue <= 0.0 {
            debug!(products = ranking.len(), "catalog has no revenue; all products classed C");
        }

        let bucket = |class: AbcClass| {
            let members: Vec<&RankedProduct> = ranking.iter().filter(|r| r.class == class).collect();
            let revenue: f64 = members.iter().map(|r| r.revenue).sum();
            let revenue_contribution = if total_revenue > 0.0 {
                revenue / total_revenue * 100.0
            } else if class == AbcClass::C {
                100.0
            } else {
                0.0
            };
            AbcBucket {
                products: members.iter().map(|r| r.product_id).collect(),
                revenue_contribution,
                management_strategy: class.management_strategy().to_string(),
            }
        };

        Ok(AbcResult {
            a: bucket(AbcClass::A),
            b: bucket(AbcClass::B),
            c: bucket(AbcClass::C),
            ranking,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::collections::HashSet;

    fn catalog(revenues: &[f64]) -> (Vec<ProductId>, Vec<CatalogAggregate>) {
        let ids: Vec<ProductId> = revenues.iter().map(|_| ProductId::new()).collect();
        let rows = ids
            .iter()
            .zip(revenues)
            .map(|(id, r)| CatalogAggregate::with_revenue(*id, *r))
            .collect();
        (ids, rows)
    }

    #[test]
    fn classifies_by_post_addition_cumulative_share() {
        let (ids, rows) = catalog(&[1000.0, 500.0, 300.0, 150.0, 50.0]);
        let result = AbcClassificationJob::new(rows).run().unwrap();

        let pct: Vec<f64> = result.ranking.iter().map(|r| r.cumulative_percentage).collect();
        assert_eq!(pct, vec![50.0, 75.0, 90.0, 97.5, 100.0]);

        assert_eq!(result.a.products, vec![ids[0], ids[1]]);
        assert_eq!(result.b.products, vec![ids[2]]);
        // 97.5% > 95%: the fourth product crosses into C.
        assert_eq!(result.c.products, vec![ids[3], ids[4]]);

        assert_eq!(result.a.revenue_contribution, 75.0);
        assert_eq!(result.b.revenue_contribution, 15.0);
        assert_eq!(result.c.revenue_contribution, 10.0);
    }

    #[test]
    fn sorts_descending_and_keeps_tie_order() {
        let (ids, rows) = catalog(&[10.0, 70.0, 10.0, 10.0]);
        let result = AbcClassificationJob::new(rows).run().unwrap();
        let order: Vec<ProductId> = result.ranking.iter().map(|r| r.product_id).collect();
        assert_eq!(order, vec![ids[1], ids[0], ids[2], ids[3]]);
    }

    #[test]
    fn single_product_is_class_c() {
        // Its own addition takes the share to 100%.
        let (ids, rows) = catalog(&[42.0]);
        let result = AbcClassificationJob::new(rows).run().unwrap();
        assert_eq!(result.class_of(ids[0]), Some(AbcClass::C));
        assert_eq!(result.bucket(AbcClass::C).revenue_contribution, 100.0);
    }

    #[test]
    fn zero_revenue_catalog_goes_to_c() {
        let (_, rows) = catalog(&[0.0, 0.0, 0.0]);
        let result = AbcClassificationJob::new(rows).run().unwrap();
        assert!(result.a.products.is_empty());
        assert!(result.b.products.is_empty());
        assert_eq!(result.c.products.len(), 3);
        assert_eq!(result.a.revenue_contribution + result.b.revenue_contribution + result.c.revenue_contribution, 100.0);
    }

    #[test]
    fn strategies_are_attached() {
        let (_, rows) = catalog(&[5.0, 1.0]);
        let result = AbcClassificationJob::new(rows).run().unwrap();
        assert_eq!(result.a.management_strategy, AbcClass::A.management_strategy());
        assert_eq!(result.c.management_strategy, AbcClass::C.management_strategy());
    }

    #[test]
    fn empty_catalog_is_data_unavailable() {
        let err = AbcClassificationJob::new(vec![]).run().unwrap_err();
        assert!(matches!(err, ForecastError::DataUnavailable(_)));
    }

    #[test]
    fn negative_revenue_is_rejected() {
        let (_, rows) = catalog(&[5.0, -1.0]);
        let err = AbcClassificationJob::new(rows).run().unwrap_err();
        assert!(matches!(err, ForecastError::InvalidInput(_)));
    }

    #[test]
    fn buckets_serialize_with_upper_case_keys() {
        let (_, rows) = catalog(&[5.0]);
        let json = serde_json::to_value(AbcClassificationJob::new(rows).run().unwrap()).unwrap();
        assert!(json.get("A").is_some() && json.get("B").is_some() && json.get("C").is_some());
    }

    proptest! {
        /// Property: every product lands in exactly one bucket and the three
        /// contributions add up to 100%.
        #[test]
        fn partition_is_complete_and_sums_to_100(
            revenues in prop::collection::vec(0.0f64..100_000.0, 1..60)
        ) {
            let (ids, rows) = catalog(&revenues);
            let result = AbcClassificationJob::new(rows).run().unwrap();

            let mut seen = HashSet::new();
            for bucket in [&result.a, &result.b, &result.c] {
                for id in &bucket.products {
                    prop_assert!(seen.insert(*id));
                }
            }
            prop_assert_eq!(seen.len(), ids.len());

            let total = result.a.revenue_contribution + result.b.revenue_contribution + result.c.revenue_contribution;
            prop_assert!((total - 100.0).abs() < 1e-6);
        }
    }
}
