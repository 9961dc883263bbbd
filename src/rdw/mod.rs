//! RDW open-data lookups.
//!
//! - [`dataset`]: the ten fixed provider datasets
//! - [`fetcher`]: HTTP fetching with failure isolation
//! - [`catalog`]: the static tool catalog
//! - [`aggregator`]: tool resolution and result shaping

pub mod aggregator;
pub mod catalog;
pub mod dataset;
pub mod fetcher;

pub use aggregator::{AggregatedPayload, ResultAggregator, ToolOutcome};
pub use catalog::{ResultShape, ToolCatalog, ToolDefinition};
pub use dataset::Dataset;
pub use fetcher::{DataFetcher, FetchResult, HttpFetcher, DEFAULT_TIMEOUT_SECS};
