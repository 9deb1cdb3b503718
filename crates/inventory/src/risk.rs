use serde::{Deserialize, Serialize};

use millboard_core::{MaterialForecastRecord, round_to};

use crate::coverage::days_coverage;

/// Weighted stockout risk index (0-100) and the weight it was computed over.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockoutRiskIndex {
    pub index: f64,
    pub total_weight: f64,
}

impl StockoutRiskIndex {
    pub const EMPTY: StockoutRiskIndex = StockoutRiskIndex {
        index: 0.0,
        total_weight: 0.0,
    };
}

/// Per-material risk score: 1 at or below 3 days of coverage, 0.5 at or below 7, else 0.
pub fn risk_score(coverage_days: f64) -> f64 {
    if coverage_days <= 3.0 {
        1.0
    } else if coverage_days <= 7.0 {
        0.5
    } else {
        0.0
    }
}

/// Index = `100 × Σ(weight × score) / Σweight`, rounded to one decimal.
///
/// Empty input (or zero total weight) is the defined `{0, 0}` result.
pub fn stockout_risk_index(records: &[MaterialForecastRecord]) -> StockoutRiskIndex {
    if records.is_empty() {
        return StockoutRiskIndex::EMPTY;
    }

    let mut weighted_risk = 0.0;
    let mut total_weight = 0.0;
    for r in records {
        weighted_risk += r.weight * risk_score(days_coverage(r));
        total_weight += r.weight;
    }

    if total_weight == 0.0 {
        return StockoutRiskIndex::EMPTY;
    }

    StockoutRiskIndex {
        index: round_to(100.0 * (weighted_risk / total_weight), 1),
        total_weight,
    }
}

/// Materials at risk within 7 and 14 days. A material may be in both sets.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct HighRiskMaterials<'a> {
    /// `balance_7d < 0` or coverage below 7 days.
    pub within_7d: Vec<&'a MaterialForecastRecord>,
    /// `balance_14d < 0` or coverage below 14 days.
    pub within_14d: Vec<&'a MaterialForecastRecord>,
}

pub fn high_risk_materials(records: &[MaterialForecastRecord]) -> HighRiskMaterials<'_> {
    let mut out = HighRiskMaterials::default();
    for r in records {
        let coverage = days_coverage(r);
        if r.balance_7d < 0.0 || coverage < 7.0 {
            out.within_7d.push(r);
        }
        if r.balance_14d < 0.0 || coverage < 14.0 {
            out.within_14d.push(r);
        }
    }
    out
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HealthBucketLabel {
    #[serde(rename = "0-3")]
    Critical,
    #[serde(rename = "4-7")]
    Low,
    #[serde(rename = "8-14")]
    Adequate,
    #[serde(rename = "15+")]
    Healthy,
}

impl HealthBucketLabel {
    pub const ORDER: [HealthBucketLabel; 4] = [
        HealthBucketLabel::Critical,
        HealthBucketLabel::Low,
        HealthBucketLabel::Adequate,
        HealthBucketLabel::Healthy,
    ];

    pub fn for_coverage(days: f64) -> Self {
        if days <= 3.0 {
            HealthBucketLabel::Critical
        } else if days <= 7.0 {
            HealthBucketLabel::Low
        } else if days <= 14.0 {
            HealthBucketLabel::Adequate
        } else {
            HealthBucketLabel::Healthy
        }
    }

    fn slot(self) -> usize {
        match self {
            HealthBucketLabel::Critical => 0,
            HealthBucketLabel::Low => 1,
            HealthBucketLabel::Adequate => 2,
            HealthBucketLabel::Healthy => 3,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            HealthBucketLabel::Critical => "0-3",
            HealthBucketLabel::Low => "4-7",
            HealthBucketLabel::Adequate => "8-14",
            HealthBucketLabel::Healthy => "15+",
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthBucket {
    pub label: HealthBucketLabel,
    pub count: usize,
    /// Share of all materials, one decimal.
    pub percentage: f64,
}

/// Tenths of a percent in a whole distribution.
const TENTHS_TOTAL: usize = 1000;

/// Histogram of coverage over the four fixed buckets, in bucket order.
///
/// Percentages are one decimal, apportioned by largest remainder so that a
/// non-empty distribution sums to exactly 100. Ties go to the earlier bucket.
pub fn health_distribution(records: &[MaterialForecastRecord]) -> [HealthBucket; 4] {
    let mut counts = [0usize; 4];
    for r in records {
        counts[HealthBucketLabel::for_coverage(days_coverage(r)).slot()] += 1;
    }

    let total = records.len().max(1);
    let mut tenths = counts.map(|c| c * TENTHS_TOTAL / total);
    if !records.is_empty() {
        let mut by_remainder: Vec<usize> = (0..counts.len()).collect();
        by_remainder.sort_by_key(|&i| core::cmp::Reverse(counts[i] * TENTHS_TOTAL % total));
        let leftover = TENTHS_TOTAL - tenths.iter().sum::<usize>();
        for &i in by_remainder.iter().take(leftover) {
            tenths[i] += 1;
        }
    }

    HealthBucketLabel::ORDER.map(|label| HealthBucket {
        label,
        count: counts[label.slot()],
        percentage: tenths[label.slot()] as f64 / 10.0,
    })
}
