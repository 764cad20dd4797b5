//! Row collection and aggregation.

pub mod aggregator;
pub mod collector;

pub use aggregator::AggregatedView;
pub use collector::build_rows;
