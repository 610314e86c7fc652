//! Error type shared by the data pipeline and graph stages.

use thiserror::Error;

/// Errors raised by stage mutators and the connectivity index.
///
/// Empty inputs are never errors: every stage produces an empty derived view
/// for them instead.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ChartError {
	/// A union-find label outside `1..=size`.
	#[error("label {label} is out of range 1..={size}")]
	LabelOutOfRange {
		/// The offending label.
		label: usize,
		/// Number of labels in the index.
		size: usize,
	},

	/// A mutator ran before any update reached the stage.
	#[error("no data yet: call send_update() before changing stage settings")]
	NoDataYet,

	/// Grouping was constructed without any granularity.
	#[error("at least one granularity is required")]
	NoGranularities,

	/// Granularity at `index` is not strictly coarser than the one before it.
	#[error("granularity {index} is not coarser than the previous one")]
	GranularityOrder {
		/// Position of the granularity in the list.
		index: usize,
	},

	/// `group_by` was asked for a granularity that does not exist.
	#[error("granularity index {index} is out of range (count {count})")]
	GranularityIndexOutOfRange {
		/// Requested index.
		index: usize,
		/// Number of granularities.
		count: usize,
	},

	/// A switcher was constructed without any data source.
	#[error("at least one data source is required")]
	NoDataSources,

	/// `set_data_source_index` was asked for a source that does not exist.
	#[error("data source index {index} is out of range (count {count})")]
	DataSourceIndexOutOfRange {
		/// Requested index.
		index: usize,
		/// Number of sources.
		count: usize,
	},

	/// Percentile outside `(0, 1]`.
	#[error("percentile {0} is outside (0, 1]")]
	InvalidPercentile(f64),
}

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, ChartError>;
