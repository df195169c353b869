use std::sync::Arc;

use crate::types::{RatePoint, VariationSelection};

/// Narrow the projected series to the selected variation.
///
/// `All` hands back the same allocation. A single variation keeps only the
/// points that carry a value for it, each reduced to that one column, so the
/// filtered series can be shorter than the input.
pub fn filter_series(
    series: &Arc<Vec<RatePoint>>,
    selection: &VariationSelection,
) -> Arc<Vec<RatePoint>> {
    let name = match selection {
        VariationSelection::All => return Arc::clone(series),
        VariationSelection::Single(name) => name,
    };

    Arc::new(
        series
            .iter()
            .filter_map(|point| {
                point.get(name).map(|value| {
                    let mut filtered = RatePoint::new(point.date.clone());
                    filtered.values.insert(name.clone(), value);
                    filtered
                })
            })
            .collect(),
    )
}
