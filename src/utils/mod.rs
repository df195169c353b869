pub mod aggregation;
pub mod date_format;

pub use aggregation::{aggregate_weekly, WeeklyBucket};
pub use date_format::{display_date, format_date};
