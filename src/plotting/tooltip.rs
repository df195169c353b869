use plotters::style::RGBColor;

use super::styles::palette_color;
use crate::types::RatePoint;

/// One variation row of the tooltip.
#[derive(Debug, Clone, PartialEq)]
pub struct TooltipEntry {
    pub name: String,
    pub value: f64,
    pub color: RGBColor,
    /// Whole-percent label, e.g. `"13%"`.
    pub label: String,
    /// Set on every entry holding the highest value.
    pub is_leader: bool,
}

/// Tooltip content for the selected point.
#[derive(Debug, Clone, PartialEq)]
pub struct Tooltip {
    pub title: String,
    pub entries: Vec<TooltipEntry>,
}

impl Tooltip {
    /// Build the tooltip for `point`. `variation_names` is the full display
    /// order, which decides each entry's color; entries come out sorted by
    /// value, highest first.
    pub fn for_point(point: &RatePoint, variation_names: &[String], title: String) -> Self {
        let mut entries: Vec<TooltipEntry> = variation_names
            .iter()
            .enumerate()
            .filter_map(|(index, name)| {
                point.get(name).map(|value| TooltipEntry {
                    name: name.clone(),
                    value,
                    color: palette_color(index),
                    label: percent_label(value),
                    is_leader: false,
                })
            })
            .collect();

        let best = entries.iter().map(|e| e.value).fold(0.0, f64::max);
        for entry in &mut entries {
            entry.is_leader = entry.value == best;
        }
        entries.sort_by(|a, b| b.value.total_cmp(&a.value));

        Self { title, entries }
    }
}

/// Round half away from zero to a whole percent.
pub fn percent_label(value: f64) -> String {
    format!("{}%", value.round() as i64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn names() -> Vec<String> {
        ["Original", "A", "B"].iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_entries_sorted_with_leader() {
        let mut point = RatePoint::new("2025-01-05");
        point.values.insert("Original".to_string(), 10.25);
        point.values.insert("B".to_string(), 12.5);

        let tooltip = Tooltip::for_point(&point, &names(), "01/05/2025".to_string());
        assert_eq!(tooltip.title, "01/05/2025");
        let rows: Vec<(&str, &str, bool)> = tooltip
            .entries
            .iter()
            .map(|e| (e.name.as_str(), e.label.as_str(), e.is_leader))
            .collect();
        assert_eq!(rows, vec![("B", "13%", true), ("Original", "10%", false)]);
        // Colors follow the display position, not the sorted position.
        assert_eq!(tooltip.entries[0].color, palette_color(2));
    }

    #[test]
    fn test_ties_share_the_lead() {
        let mut point = RatePoint::new("2025-01-05");
        point.values.insert("A".to_string(), 7.0);
        point.values.insert("B".to_string(), 7.0);

        let tooltip = Tooltip::for_point(&point, &names(), String::new());
        assert!(tooltip.entries.iter().all(|e| e.is_leader));
        assert_eq!(tooltip.entries[0].name, "A");
    }

    #[test]
    fn test_empty_point() {
        let tooltip = Tooltip::for_point(&RatePoint::new("x"), &names(), String::new());
        assert!(tooltip.entries.is_empty());
    }
}
