use crate::types::{DailyRecord, RatePoint, VariationIndex};
use crate::utils::WeeklyBucket;

/// A time unit carrying visit and conversion counts, daily or weekly.
pub trait CountUnit {
    fn label(&self) -> &str;
    fn visits(&self, id: &str) -> Option<u64>;
    fn conversions(&self, id: &str) -> Option<u64>;
}

impl CountUnit for DailyRecord {
    fn label(&self) -> &str {
        &self.date
    }

    fn visits(&self, id: &str) -> Option<u64> {
        self.visits.get(id).copied()
    }

    fn conversions(&self, id: &str) -> Option<u64> {
        self.conversions.get(id).copied()
    }
}

impl CountUnit for WeeklyBucket {
    fn label(&self) -> &str {
        &self.week_label
    }

    fn visits(&self, id: &str) -> Option<u64> {
        self.visits.get(id).copied()
    }

    fn conversions(&self, id: &str) -> Option<u64> {
        self.conversions.get(id).copied()
    }
}

/// Round half away from zero to two decimals.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Conversion percentage, or `None` when either count is missing or zero.
pub fn conversion_rate(visits: Option<u64>, conversions: Option<u64>) -> Option<f64> {
    match (visits, conversions) {
        (Some(v), Some(c)) if v > 0 && c > 0 => Some(round2(c as f64 / v as f64 * 100.0)),
        _ => None,
    }
}

/// Project counts into one rate point per unit, in input order.
///
/// A variation only gets a column for a unit when both its visits and its
/// conversions are present and non-zero there.
pub fn project_rates<U: CountUnit>(units: &[U], index: &VariationIndex) -> Vec<RatePoint> {
    units
        .iter()
        .map(|unit| {
            let mut point = RatePoint::new(unit.label());
            for (id, name) in index.iter() {
                if let Some(rate) = conversion_rate(unit.visits(id), unit.conversions(id)) {
                    point.values.insert(name.to_string(), rate);
                }
            }
            point
        })
        .collect()
}

/// Largest value plotted for the selection; missing columns count as zero.
pub fn max_rate(series: &[RatePoint], columns: &[String]) -> f64 {
    series
        .iter()
        .flat_map(|point| columns.iter().map(|name| point.get(name).unwrap_or(0.0)))
        .fold(0.0, f64::max)
}

/// Y-axis ceiling: the maximum rounded up to the next multiple of five.
pub fn top_reference_line(series: &[RatePoint], columns: &[String]) -> f64 {
    (max_rate(series, columns) / 5.0).ceil() * 5.0
}
