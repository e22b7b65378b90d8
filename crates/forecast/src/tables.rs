//! Fixed lookup tables used by the algorithms.
//!
//! These are tagged constant mappings rather than continuous functions: the
//! reorder calculator uses a three-point Z-score table, the seasonal analyzer a
//! three-tier confidence heuristic, and the ABC classifier two cumulative
//! revenue boundaries. Extending a table means adding a variant here.

use serde::{Deserialize, Serialize};

/// Target service levels with a tabulated Z-score.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServiceLevel {
    Ninety,
    NinetyFive,
    NinetyNine,
}

impl ServiceLevel {
    pub const ALL: [ServiceLevel; 3] = [
        ServiceLevel::Ninety,
        ServiceLevel::NinetyFive,
        ServiceLevel::NinetyNine,
    ];

    /// Level used for any untabulated probability.
    pub const DEFAULT: ServiceLevel = ServiceLevel::NinetyFive;

    pub fn probability(self) -> f64 {
        match self {
            ServiceLevel::Ninety => 0.90,
            ServiceLevel::NinetyFive => 0.95,
            ServiceLevel::NinetyNine => 0.99,
        }
    }

    pub fn z_score(self) -> f64 {
        match self {
            ServiceLevel::Ninety => 1.28,
            ServiceLevel::NinetyFive => 1.65,
            ServiceLevel::NinetyNine => 2.33,
        }
    }

    /// Exact table lookup; `None` for any probability not in the table.
    pub fn from_probability(p: f64) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|level| (level.probability() - p).abs() < 1e-9)
    }
}

/// Confidence tier of a seasonal index, keyed on the month's data point count.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfidenceTier {
    /// Fewer than 3 points.
    Low,
    /// 3 to 5 points.
    Medium,
    /// 6 or more points.
    High,
}

impl ConfidenceTier {
    pub fn for_data_points(points: usize) -> Self {
        match points {
            0..=2 => ConfidenceTier::Low,
            3..=5 => ConfidenceTier::Medium,
            _ => ConfidenceTier::High,
        }
    }

    pub fn confidence(self) -> f64 {
        match self {
            ConfidenceTier::Low => 0.3,
            ConfidenceTier::Medium => 0.6,
            ConfidenceTier::High => 0.9,
        }
    }
}

/// Revenue tier of a product in the ABC classification.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AbcClass {
    A,
    B,
    C,
}

impl AbcClass {
    /// Inclusive upper bound of the cumulative revenue percentage for the tier.
    pub fn cumulative_upper_bound(self) -> f64 {
        match self {
            AbcClass::A => 80.0,
            AbcClass::B => 95.0,
            AbcClass::C => 100.0,
        }
    }

    /// Tier for a cumulative percentage taken *after* adding the product.
    pub fn for_cumulative_percentage(pct: f64) -> Self {
        if pct <= AbcClass::A.cumulative_upper_bound() {
            AbcClass::A
        } else if pct <= AbcClass::B.cumulative_upper_bound() {
            AbcClass::B
        } else {
            AbcClass::C
        }
    }

    pub fn management_strategy(self) -> &'static str {
        match self {
            AbcClass::A => {
                "Tight control: review stock weekly, forecast individually, keep safety stock high"
            }
            AbcClass::B => "Moderate control: review monthly, use standard reorder points",
            AbcClass::C => "Simple control: bulk orders, periodic review, minimal safety stock",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn z_table_has_three_rows() {
        assert_eq!(ServiceLevel::from_probability(0.90).map(ServiceLevel::z_score), Some(1.28));
        assert_eq!(ServiceLevel::from_probability(0.95).map(ServiceLevel::z_score), Some(1.65));
        assert_eq!(ServiceLevel::from_probability(0.99).map(ServiceLevel::z_score), Some(2.33));
        assert_eq!(ServiceLevel::from_probability(0.975), None);
        assert_eq!(ServiceLevel::DEFAULT.z_score(), 1.65);
    }

    #[test]
    fn confidence_tiers_are_stepwise() {
        let got: Vec<f64> = (0..8)
            .map(|n| ConfidenceTier::for_data_points(n).confidence())
            .collect();
        assert_eq!(got, vec![0.3, 0.3, 0.3, 0.6, 0.6, 0.6, 0.9, 0.9]);
    }

    #[test]
    fn abc_boundaries_are_inclusive() {
        assert_eq!(AbcClass::for_cumulative_percentage(80.0), AbcClass::A);
        assert_eq!(AbcClass::for_cumulative_percentage(80.01), AbcClass::B);
        assert_eq!(AbcClass::for_cumulative_percentage(95.0), AbcClass::B);
        assert_eq!(AbcClass::for_cumulative_percentage(95.01), AbcClass::C);
    }
}
