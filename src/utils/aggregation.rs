use chrono::{Datelike, NaiveDate};
use std::collections::HashMap;

use crate::error::{ChartError, Result};
use crate::types::{CountMap, DailyRecord, VariationIndex};

/// Daily counts summed over one week-of-month.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeeklyBucket {
    /// `"Week {n}, {Mon} {year}"`, taken from the first record of the bucket.
    pub week_label: String,
    pub first_date: NaiveDate,
    pub visits: CountMap,
    pub conversions: CountMap,
}

/// Parse an ISO `YYYY-MM-DD` day key.
pub fn parse_day(date: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map_err(|_| ChartError::MalformedDate(date.to_string()))
}

/// Week number within the month, where weeks start on Sunday and the first
/// (possibly partial) week of the month is week 1.
pub fn week_of_month(date: NaiveDate) -> u32 {
    let first_weekday_offset = date
        .with_day(1)
        .map(|first| first.weekday().num_days_from_sunday())
        .unwrap_or(0);
    (date.day() + first_weekday_offset).div_ceil(7)
}

pub fn format_week_label(date: NaiveDate) -> String {
    format!(
        "Week {}, {} {}",
        week_of_month(date),
        date.format("%b"),
        date.year()
    )
}

/// Collapse daily records into week-of-month buckets ordered by their first date.
///
/// Every known variation id gets an entry in each bucket, absent daily counts
/// contributing zero. A week straddling two months is split at the month
/// boundary since the grouping key includes the month.
pub fn aggregate_weekly(index: &VariationIndex, data: &[DailyRecord]) -> Result<Vec<WeeklyBucket>> {
    let mut buckets: Vec<WeeklyBucket> = Vec::new();
    let mut slots: HashMap<(i32, u32, u32), usize> = HashMap::new();

    for record in data {
        let date = parse_day(&record.date)?;
        let key = (date.year(), date.month(), week_of_month(date));

        let slot = *slots.entry(key).or_insert_with(|| {
            buckets.push(WeeklyBucket {
                week_label: format_week_label(date),
                first_date: date,
                visits: CountMap::new(),
                conversions: CountMap::new(),
            });
            buckets.len() - 1
        });
        let bucket = &mut buckets[slot];

        for id in index.ids() {
            let visits = record.visits.get(id).copied().unwrap_or(0);
            let conversions = record.conversions.get(id).copied().unwrap_or(0);
            *bucket.visits.entry(id.to_string()).or_insert(0) += visits;
            *bucket.conversions.entry(id.to_string()).or_insert(0) += conversions;
        }
    }

    buckets.sort_by_key(|bucket| bucket.first_date);
    Ok(buckets)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Variation;
    use pretty_assertions::assert_eq;

    fn index() -> VariationIndex {
        VariationIndex::new(&[
            Variation { id: None, name: "Original".to_string() },
            Variation { id: Some(1), name: "A".to_string() },
        ])
        .unwrap()
    }

    fn record(date: &str, visits: &[(&str, u64)], conversions: &[(&str, u64)]) -> DailyRecord {
        DailyRecord {
            date: date.to_string(),
            visits: visits.iter().map(|(k, v)| (k.to_string(), *v)).collect(),
            conversions: conversions.iter().map(|(k, v)| (k.to_string(), *v)).collect(),
        }
    }

    fn day(s: &str) -> NaiveDate {
        parse_day(s).unwrap()
    }

    #[test]
    fn test_week_of_month() {
        // 2025-01-01 is a Wednesday, so the first week holds Jan 1..=4.
        assert_eq!(week_of_month(day("2025-01-01")), 1);
        assert_eq!(week_of_month(day("2025-01-04")), 1);
        assert_eq!(week_of_month(day("2025-01-05")), 2);
        assert_eq!(week_of_month(day("2025-01-31")), 5);
        // 2024-09-01 is a Sunday.
        assert_eq!(week_of_month(day("2024-09-07")), 1);
        assert_eq!(week_of_month(day("2024-09-08")), 2);
    }

    #[test]
    fn test_week_label() {
        assert_eq!(format_week_label(day("2025-01-05")), "Week 2, Jan 2025");
        assert_eq!(format_week_label(day("2024-09-30")), "Week 5, Sep 2024");
    }

    #[test]
    fn test_sums_counts_per_variation() {
        let data = vec![
            record("2025-01-01", &[("0", 10), ("1", 20)], &[("0", 1), ("1", 2)]),
            record("2025-01-02", &[("0", 5)], &[("0", 1)]),
            record("2025-01-05", &[("0", 7), ("1", 3)], &[("1", 1)]),
        ];

        let weeks = aggregate_weekly(&index(), &data).unwrap();
        assert_eq!(weeks.len(), 2);
        assert_eq!(weeks[0].week_label, "Week 1, Jan 2025");
        assert_eq!(weeks[0].visits.get("0"), Some(&15));
        assert_eq!(weeks[0].visits.get("1"), Some(&20));
        assert_eq!(weeks[0].conversions.get("0"), Some(&2));
        assert_eq!(weeks[1].visits.get("0"), Some(&7));
        // Missing daily counts still produce a zero entry.
        assert_eq!(weeks[1].conversions.get("0"), Some(&0));
    }

    #[test]
    fn test_orders_by_first_date_not_input_order() {
        let data = vec![
            record("2025-02-10", &[("1", 1)], &[("1", 1)]),
            record("2025-01-10", &[("1", 1)], &[("1", 1)]),
            record("2025-02-11", &[("1", 1)], &[("1", 1)]),
        ];

        let weeks = aggregate_weekly(&index(), &data).unwrap();
        let firsts: Vec<NaiveDate> = weeks.iter().map(|w| w.first_date).collect();
        assert_eq!(firsts, vec![day("2025-01-10"), day("2025-02-10")]);
        assert_eq!(weeks[1].visits.get("1"), Some(&2));
    }

    #[test]
    fn test_month_boundary_splits_week() {
        // Fri Jan 31 and Sat Feb 1 share a calendar week but not a month.
        let data = vec![
            record("2025-01-31", &[("1", 4)], &[("1", 1)]),
            record("2025-02-01", &[("1", 6)], &[("1", 3)]),
        ];

        let weeks = aggregate_weekly(&index(), &data).unwrap();
        assert_eq!(weeks.len(), 2);
        assert_eq!(weeks[0].week_label, "Week 5, Jan 2025");
        assert_eq!(weeks[1].week_label, "Week 1, Feb 2025");
    }

    #[test]
    fn test_empty_data() {
        let weeks = aggregate_weekly(&index(), &[]).unwrap();
        assert!(weeks.is_empty());
    }

    #[test]
    fn test_malformed_date() {
        let data = vec![record("2025/01/01", &[], &[])];
        assert!(matches!(
            aggregate_weekly(&index(), &data),
            Err(ChartError::MalformedDate(_))
        ));
    }
}
