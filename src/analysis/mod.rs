mod cache;
pub mod filter;
pub mod rates;

pub use cache::SeriesCache;
pub use filter::filter_series;
pub use rates::{project_rates, top_reference_line, CountUnit};

use crate::error::Result;
use crate::types::{DailyRecord, Granularity, RatePoint, VariationIndex};
use crate::utils::aggregate_weekly;

/// Project the raw daily records at the requested granularity.
pub fn project_series(
    granularity: Granularity,
    data: &[DailyRecord],
    index: &VariationIndex,
) -> Result<Vec<RatePoint>> {
    match granularity {
        Granularity::Day => Ok(project_rates(data, index)),
        Granularity::Week => Ok(project_rates(&aggregate_weekly(index, data)?, index)),
    }
}
