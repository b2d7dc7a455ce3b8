//! The filter → bucket → aggregate → pivot pipeline.
//!
//! Everything here is pure and synchronous: the store hands over filtered
//! readings, and these functions own the bucketing, averaging, KPI, and
//! wide-table semantics. One full evaluation per filter change, no state
//! carried between evaluations.

mod aggregate;
mod filter;
mod granularity;
mod reshape;

pub use aggregate::{AggregateRow, aggregate_readings};
pub use filter::FilterCriteria;
pub use granularity::Granularity;
pub use reshape::{Kpis, LocationColumn, TrendOutcome, TrendReport, present};
