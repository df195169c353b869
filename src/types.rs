//! # Common Types
//!
//! This module contains the types shared by the aggregation, projection and
//! viewport layers: the input document, the id→name lookup, derived rate
//! points and the small option enums the UI switches between.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use crate::error::{ChartError, Result};

/// Display label of the pseudo-selection that disables per-variation filtering.
pub const ALL_VARIATIONS: &str = "All variations";

/// Per-variation counts keyed by the variation id rendered as a string.
pub type CountMap = BTreeMap<String, u64>;

/// One arm of an experiment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Variation {
    /// Numeric id used as the key into the count maps. Missing ids map to `"0"`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    /// Canonical name, used as display label and as the rate column key.
    pub name: String,
}

/// Raw counts for a single calendar day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyRecord {
    /// ISO date, `YYYY-MM-DD`.
    pub date: String,
    #[serde(default)]
    pub visits: CountMap,
    #[serde(default)]
    pub conversions: CountMap,
}

/// The read-only input document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartData {
    pub variations: Vec<Variation>,
    pub data: Vec<DailyRecord>,
}

impl ChartData {
    /// Parse a document from its JSON text.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read and parse a document from disk.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ChartError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&text)
    }
}

/// Lookup from variation id key to variation name.
///
/// Entries are ordered by ascending numeric id, which is also the order the
/// variation names are listed in the UI and painted in.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VariationIndex {
    entries: Vec<(String, String)>,
}

impl VariationIndex {
    /// Build the lookup. A repeated id keeps the last name seen; a repeated
    /// name is an error since names key the rate columns.
    pub fn new(variations: &[Variation]) -> Result<Self> {
        let mut by_id: BTreeMap<i64, String> = BTreeMap::new();
        for variation in variations {
            by_id.insert(variation.id.unwrap_or(0), variation.name.clone());
        }

        let mut seen = HashSet::new();
        for name in by_id.values() {
            if !seen.insert(name.as_str()) {
                return Err(ChartError::DuplicateVariationName(name.clone()));
            }
        }

        Ok(Self {
            entries: by_id
                .into_iter()
                .map(|(id, name)| (id.to_string(), name))
                .collect(),
        })
    }

    /// `(id key, name)` pairs in display order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(id, name)| (id.as_str(), name.as_str()))
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(id, _)| id.as_str())
    }

    pub fn names(&self) -> Vec<String> {
        self.entries.iter().map(|(_, name)| name.clone()).collect()
    }

    pub fn name_of(&self, id: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(key, _)| key == id)
            .map(|(_, name)| name.as_str())
    }

    pub fn contains_name(&self, name: &str) -> bool {
        self.entries.iter().any(|(_, n)| n == name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// One time unit's conversion percentages, keyed by variation name.
///
/// The map is sparse: a variation without qualifying counts for the unit has
/// no entry at all.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RatePoint {
    /// Display key: the ISO date for daily units, the week label for weekly ones.
    pub date: String,
    pub values: BTreeMap<String, f64>,
}

impl RatePoint {
    pub fn new(date: impl Into<String>) -> Self {
        Self {
            date: date.into(),
            values: BTreeMap::new(),
        }
    }

    pub fn get(&self, variation: &str) -> Option<f64> {
        self.values.get(variation).copied()
    }
}

/// Aggregation unit of the time axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Granularity {
    #[default]
    Day,
    Week,
}

impl Granularity {
    pub const ALL: [Granularity; 2] = [Granularity::Day, Granularity::Week];

    pub fn as_str(self) -> &'static str {
        match self {
            Granularity::Day => "Day",
            Granularity::Week => "Week",
        }
    }
}

/// How series are painted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ChartKind {
    #[default]
    Smooth,
    Line,
    Area,
}

impl ChartKind {
    pub const ALL: [ChartKind; 3] = [ChartKind::Smooth, ChartKind::Line, ChartKind::Area];

    pub fn as_str(self) -> &'static str {
        match self {
            ChartKind::Smooth => "Smooth",
            ChartKind::Line => "Line",
            ChartKind::Area => "Area",
        }
    }
}

/// Label flavour requested from the date formatter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateMode {
    /// Short month name only.
    Month,
    /// `"Jan 05"`, used on the x axis.
    DayMonth,
    /// `"01/05/2024"`, used in the tooltip title.
    Full,
}

/// Which rate columns survive filtering.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum VariationSelection {
    All,
    Single(String),
}

impl VariationSelection {
    pub fn label(&self) -> &str {
        match self {
            VariationSelection::All => ALL_VARIATIONS,
            VariationSelection::Single(name) => name,
        }
    }
}

impl From<&str> for VariationSelection {
    fn from(value: &str) -> Self {
        if value == ALL_VARIATIONS {
            VariationSelection::All
        } else {
            VariationSelection::Single(value.to_string())
        }
    }
}

macro_rules! ui_option {
    ($ty:ty, $kind:literal) => {
        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $ty {
            type Err = ChartError;

            fn from_str(s: &str) -> Result<Self> {
                <$ty>::ALL
                    .into_iter()
                    .find(|option| option.as_str() == s)
                    .ok_or_else(|| ChartError::UnknownOption {
                        kind: $kind,
                        value: s.to_string(),
                    })
            }
        }
    };
}

ui_option!(Granularity, "granularity");
ui_option!(ChartKind, "chart kind");

impl fmt::Display for VariationSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn variation(id: Option<i64>, name: &str) -> Variation {
        Variation {
            id,
            name: name.to_string(),
        }
    }

    #[test]
    fn test_index_orders_by_numeric_id() {
        let index = VariationIndex::new(&[
            variation(Some(10), "Ten"),
            variation(Some(2), "Two"),
            variation(None, "Original"),
        ])
        .unwrap();

        let pairs: Vec<(&str, &str)> = index.iter().collect();
        assert_eq!(pairs, vec![("0", "Original"), ("2", "Two"), ("10", "Ten")]);
        assert_eq!(index.name_of("2"), Some("Two"));
        assert_eq!(index.name_of("3"), None);
    }

    #[test]
    fn test_index_accepts_any_integer_id() {
        let json = r#"{
            "variations": [
                {"id": 5000000000, "name": "Big"},
                {"id": -3, "name": "Negative"},
                {"name": "Original"}
            ],
            "data": []
        }"#;
        let doc = ChartData::from_json_str(json).unwrap();
        let index = VariationIndex::new(&doc.variations).unwrap();
        let pairs: Vec<(&str, &str)> = index.iter().collect();
        assert_eq!(
            pairs,
            vec![("-3", "Negative"), ("0", "Original"), ("5000000000", "Big")]
        );
    }

    #[test]
    fn test_index_repeated_id_keeps_last_name() {
        let index =
            VariationIndex::new(&[variation(Some(1), "First"), variation(Some(1), "Second")])
                .unwrap();
        assert_eq!(index.names(), vec!["Second".to_string()]);
    }

    #[test]
    fn test_index_rejects_duplicate_names() {
        let err = VariationIndex::new(&[variation(Some(1), "A"), variation(Some(2), "A")])
            .unwrap_err();
        assert!(matches!(err, ChartError::DuplicateVariationName(name) if name == "A"));
    }

    #[test]
    fn test_document_parsing() {
        let json = r#"{
            "variations": [{"name": "Original"}, {"id": 1, "name": "Variation A"}],
            "data": [{"date": "2025-01-01", "visits": {"0": 10, "1": 12}, "conversions": {"0": 1}}]
        }"#;
        let doc = ChartData::from_json_str(json).unwrap();
        assert_eq!(doc.variations[0].id, None);
        assert_eq!(doc.data[0].visits.get("1"), Some(&12));
        assert!(doc.data[0].conversions.get("1").is_none());
    }

    #[test]
    fn test_options_round_trip_through_labels() {
        assert_eq!("Week".parse::<Granularity>().unwrap(), Granularity::Week);
        assert_eq!(ChartKind::Area.to_string(), "Area");
        assert!("Month".parse::<Granularity>().is_err());
        assert_eq!(VariationSelection::from(ALL_VARIATIONS), VariationSelection::All);
        assert_eq!(
            VariationSelection::from("B"),
            VariationSelection::Single("B".to_string())
        );
    }
}
