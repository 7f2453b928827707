pub mod decoders;
mod classifier;
mod graph_builder;
mod manifest;
mod result_aggregator;

pub use classifier::Classifier;
pub use decoders::{LockDialect, LOCKFILE_NAMES};
pub use graph_builder::GraphBuilder;
pub use manifest::{ManifestMerger, DEPENDENCY_SECTIONS};
pub use result_aggregator::ScanResultAggregator;
