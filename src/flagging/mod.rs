pub mod flag_aggregator;

pub use flag_aggregator::FlagAggregator;
