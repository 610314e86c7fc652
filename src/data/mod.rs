//! Reactive pipeline over time-keyed tables.
//!
//! A pipeline starts at a [`DataSource`] (or a [`DataSourceSwitcher`] over
//! several) and is extended with decorators through [`DataStageExt`]:
//!
//! ```
//! use reactive_charts::data::{DataSource, DataStageExt, TimeInterval};
//! use reactive_charts::Stage;
//!
//! let chart_data = DataSource::new(Vec::new(), "date")
//! 	.with_category_exclusion()
//! 	.grouped_by([TimeInterval::Day, TimeInterval::Week])
//! 	.unwrap()
//! 	.with_row_total("_total_")
//! 	.with_stacked_data();
//! chart_data.on_update(|update| assert!(update.data_stacked.is_empty()));
//! chart_data.send_update().unwrap();
//! ```

mod aggregate;
mod categories;
mod grouping;
mod moving_average;
mod percentile;
mod series;
mod source;
mod stacked;
mod time;
mod types;

pub use aggregate::{
	ClampedMin, MinMaxKey, MinMaxOf, MinMaxOfRow, RowTotal, VALUE_FIELD, WithClampedMin,
	WithMinMax, WithMinMaxKey, WithMinMaxOfRow, WithRowTotal,
};
pub use categories::{CategoryExclusion, FirstCategories, WithCategoryExclusion, WithFirstCategories};
pub use grouping::{AutoGroupOnFirstUpdate, GroupedBy, Regroup, TimeGrouping, group_rows};
pub use moving_average::{Mean, TimedValue, moving_average};
pub use percentile::{FilteredByPercentile, PercentileFilter, kept_row_count};
pub use series::{SeriesData, WithSeriesData};
pub use source::{DataSource, DataSourceSwitcher};
pub use stacked::{Stacked, WithStackedData, stack};
pub use time::{Granularity, TimeInterval};
pub use types::{DataUpdate, Record, Row, Series, SeriesPoint, StackedPoint, Value, categories_of};

use crate::error::Result;
use crate::stage::{Decorated, Stage};

/// Any stage of a data pipeline.
pub trait DataStage: Stage<Update = DataUpdate> {}

impl<S: Stage<Update = DataUpdate>> DataStage for S {}

/// Chainable constructors for every data pipeline decorator.
pub trait DataStageExt: DataStage + Sized {
	/// Lets categories be hidden and shown again.
	fn with_category_exclusion(self) -> WithCategoryExclusion<Self> {
		Decorated::new(self, CategoryExclusion::default())
	}

	/// Keeps the first `count` categories.
	fn with_first_categories(self, count: usize) -> WithFirstCategories<Self> {
		Decorated::new(self, FirstCategories::new(count))
	}

	/// Fails when `granularities` is empty or not ordered finest to coarsest.
	fn grouped_by<G>(self, granularities: impl IntoIterator<Item = G>) -> Result<GroupedBy<Self>>
	where
		G: Granularity + 'static,
	{
		GroupedBy::new(granularities, self)
	}

	/// Picks a coarser granularity on the first update while rows reach `threshold`.
	fn auto_group_on_first_update(self, threshold: usize) -> AutoGroupOnFirstUpdate<Self>
	where
		Self: Regroup,
	{
		AutoGroupOnFirstUpdate::new(threshold, self)
	}

	/// Adds a per-row total under `field`.
	fn with_row_total(self, field: impl Into<String>) -> WithRowTotal<Self> {
		Decorated::new(self, RowTotal::new(field))
	}

	/// Reports the extremes of `field`.
	fn with_min_max(self, field: impl Into<String>) -> WithMinMax<Self> {
		Decorated::new(self, MinMaxOf::new(field))
	}

	/// Reports the extremes over every category value.
	fn with_min_max_of_row(self) -> WithMinMaxOfRow<Self> {
		Decorated::new(self, MinMaxOfRow)
	}

	/// Reports the earliest and latest key.
	fn with_min_max_key(self) -> WithMinMaxKey<Self> {
		Decorated::new(self, MinMaxKey)
	}

	/// Pins numeric minimums to `floor`.
	fn clamped_min(self, floor: f64) -> WithClampedMin<Self> {
		Decorated::new(self, ClampedMin::new(floor))
	}

	/// Filters rows by their `field` total.
	fn filtered_by_percentile(self, field: impl Into<String>) -> FilteredByPercentile<Self> {
		Decorated::new(self, PercentileFilter::new(field))
	}

	/// Adds stacked layers.
	fn with_stacked_data(self) -> WithStackedData<Self> {
		Decorated::new(self, Stacked)
	}

	/// Adds one series per category.
	fn with_series_data(self) -> WithSeriesData<Self> {
		Decorated::new(self, SeriesData)
	}
}

impl<S: DataStage> DataStageExt for S {}

#[cfg(test)]
pub(crate) mod test_support {
	use std::cell::RefCell;
	use std::rc::Rc;

	use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

	use super::{DataUpdate, Row};
	use crate::stage::Stage;

	/// Parses `dd/mm/yyyy` as midnight of that day.
	pub fn date(text: &str) -> NaiveDateTime {
		NaiveDate::parse_from_str(text, "%d/%m/%Y")
			.expect("test date")
			.and_time(NaiveTime::MIN)
	}

	pub fn sample_rows() -> Vec<Row> {
		vec![
			Row::new(date("18/01/2013")).with("java", 3.0).with("xml", 33.0).with("txt", 333.0),
			Row::new(date("19/01/2013")).with("java", 2.0).with("xml", 22.0).with("txt", 222.0),
			Row::new(date("20/01/2013")).with("java", 1.0).with("xml", 11.0).with("txt", 111.0),
		]
	}

	pub fn scaled_rows() -> Vec<Row> {
		vec![
			Row::new(date("18/01/2013")).with("java", 33.0).with("xml", 333.0).with("txt", 3333.0),
			Row::new(date("19/01/2013")).with("java", 22.0).with("xml", 222.0).with("txt", 2222.0),
			Row::new(date("20/01/2013")).with("java", 11.0).with("xml", 111.0).with("txt", 1111.0),
		]
	}

	/// Registers a subscriber and returns a getter for the latest update.
	pub fn capture(stage: &impl Stage<Update = DataUpdate>) -> impl Fn() -> DataUpdate {
		let received = Rc::new(RefCell::new(None));
		let sink = received.clone();
		stage.on_update(move |update: &DataUpdate| *sink.borrow_mut() = Some(update.clone()));
		move || received.borrow().clone().expect("no update received")
	}
}
