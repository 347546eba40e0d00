use serde::Serialize;

use crate::domain::{CategoryRollup, Color};

/// Slices below this share of the total get no on-chart label.
pub const LABEL_THRESHOLD_PERCENT: f64 = 4.0;

/// Pie-chart input as index-aligned parallel arrays.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ChartSeries {
    pub labels: Vec<String>,
    pub values: Vec<u64>,
    pub colors: Vec<Color>,
}

impl ChartSeries {
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn total(&self) -> u64 {
        self.values
            .iter()
            .fold(0u64, |sum, value| sum.saturating_add(*value))
    }

    /// Share of the total for each slice, in percent.
    pub fn percentages(&self) -> Vec<f64> {
        let total = self.total();
        self.values
            .iter()
            .map(|value| {
                if total == 0 {
                    0.0
                } else {
                    *value as f64 / total as f64 * 100.0
                }
            })
            .collect()
    }

    /// Labels to draw on the slices; small slices get an empty string.
    pub fn visible_labels(&self) -> Vec<String> {
        self.labels
            .iter()
            .zip(self.percentages())
            .map(|(label, percent)| {
                if percent < LABEL_THRESHOLD_PERCENT {
                    String::new()
                } else {
                    label.clone()
                }
            })
            .collect()
    }
}

pub fn chart_series(rollup: &CategoryRollup) -> ChartSeries {
    let mut series = ChartSeries::default();
    for entry in &rollup.entries {
        series.labels.push(entry.category.clone());
        series.values.push(entry.total);
        series.colors.push(entry.color);
    }
    series
}
