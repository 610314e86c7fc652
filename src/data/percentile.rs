use std::cell::Cell;

use log::debug;

use super::types::DataUpdate;
use crate::error::{ChartError, Result};
use crate::stage::{Decorated, Stage, Transform};

/// Keeps the `ceil(p × N)` rows with the smallest value of a total field.
///
/// Rows with the largest totals are dropped first, so outliers disappear
/// from the chart as the percentile goes down. Output stays in key order.
#[derive(Debug)]
pub struct PercentileFilter {
	field: String,
	percentile: Cell<f64>,
}

impl PercentileFilter {
	/// Ranks rows by `field`, keeping all of them at first.
	pub fn new(field: impl Into<String>) -> Self {
		Self {
			field: field.into(),
			percentile: Cell::new(1.0),
		}
	}

	/// Current percentile.
	pub fn percentile(&self) -> f64 {
		self.percentile.get()
	}
}

// products such as 0.07 * 100 land a hair above the integer
const ROUNDING_SLACK: f64 = 1e-9;

/// Number of rows kept out of `rows` at `percentile`.
pub fn kept_row_count(rows: usize, percentile: f64) -> usize {
	let exact = percentile * rows as f64;
	((exact - ROUNDING_SLACK).ceil().max(0.0) as usize).min(rows)
}

impl Transform for PercentileFilter {
	type Update = DataUpdate;

	fn apply(&self, mut update: DataUpdate) -> DataUpdate {
		let percentile = self.percentile.get();
		let keep = kept_row_count(update.data.len(), percentile);

		let mut ranked: Vec<usize> = (0..update.data.len()).collect();
		ranked.sort_by(|&a, &b| {
			let (a, b) = (&update.data[a], &update.data[b]);
			a.value(&self.field).total_cmp(&b.value(&self.field))
		});
		ranked.truncate(keep);
		ranked.sort_by(|&a, &b| update.data[a].key.cmp(&update.data[b].key).then(a.cmp(&b)));

		update.data = ranked.into_iter().map(|i| update.data[i].clone()).collect();
		update.percentile = Some(percentile);
		update
	}
}

/// Stage filtering rows by percentile.
pub type FilteredByPercentile<S> = Decorated<S, PercentileFilter>;

impl<S> Decorated<S, PercentileFilter>
where
	S: Stage<Update = DataUpdate>,
{
	/// Sets the percentile, `p` in `(0, 1]`, and rebroadcasts.
	pub fn set_percentile(&self, percentile: f64) -> Result<()> {
		if !(percentile > 0.0 && percentile <= 1.0) {
			return Err(ChartError::InvalidPercentile(percentile));
		}
		self.ensure_primed()?;
		debug!("percentile filter on {} set to {percentile}", self.transform().field);
		self.transform().percentile.set(percentile);
		self.republish()
	}
}

#[cfg(test)]
mod tests {
	use proptest::prelude::*;

	use super::*;
	use crate::data::test_support::{capture, date, sample_rows};
	use crate::data::{DataSource, DataStageExt, Row};

	#[test]
	fn when_percentile_is_set_sends_update_with_filtered_data() {
		let source = DataSource::new(sample_rows(), "date")
			.with_row_total("_total_")
			.filtered_by_percentile("_total_");
		let received = capture(&source);

		source.send_update().unwrap();
		assert_eq!(received().percentile, Some(1.0));
		assert_eq!(received().data.len(), 3);

		source.set_percentile(0.5).unwrap();
		assert_eq!(received().percentile, Some(0.5));
		assert_eq!(received().data.len(), 2);
		assert_eq!(received().data[0].key, date("19/01/2013"));
		assert_eq!(received().data[1].key, date("20/01/2013"));
	}

	#[test]
	fn full_percentile_keeps_rows_in_key_order() {
		let rows: Vec<_> = sample_rows().into_iter().rev().collect();
		let source = DataSource::new(rows, "date")
			.with_row_total("_total_")
			.filtered_by_percentile("_total_");
		let received = capture(&source);

		source.send_update().unwrap();

		let keys: Vec<_> = received().data.iter().map(|row| row.key).collect();
		assert_eq!(keys, [date("18/01/2013"), date("19/01/2013"), date("20/01/2013")]);
	}

	#[test]
	fn rejects_percentile_outside_unit_interval() {
		let source = DataSource::new(sample_rows(), "date").filtered_by_percentile("_total_");
		source.send_update().unwrap();

		for bad in [0.0, -0.5, 1.5, f64::NAN] {
			assert!(matches!(
				source.set_percentile(bad),
				Err(ChartError::InvalidPercentile(_))
			));
		}
		assert_eq!(source.transform().percentile(), 1.0);
	}

	#[test]
	fn kept_row_count_is_exact_on_whole_products() {
		assert_eq!(kept_row_count(100, 0.07), 7);
		assert_eq!(kept_row_count(100, 0.14), 14);
		assert_eq!(kept_row_count(100, 0.071), 8);
		assert_eq!(kept_row_count(3, 0.5), 2);
		assert_eq!(kept_row_count(3, 1.0), 3);
		assert_eq!(kept_row_count(0, 0.5), 0);
	}

	proptest! {
		#[test]
		fn whole_fractions_keep_exactly_that_many_rows(rows in 1usize..500, kept in 1usize..500) {
			let kept = kept.min(rows);
			prop_assert_eq!(kept_row_count(rows, kept as f64 / rows as f64), kept);
		}


		#[test]
		fn keeps_ceil_of_percentile_rows(
			totals in proptest::collection::vec(0u32..10_000, 0..30),
			percentile in 0.01f64..=1.0,
		) {
			let rows: Vec<_> = totals
				.iter()
				.enumerate()
				.map(|(i, total)| Row::new(date("01/01/2013") + chrono::TimeDelta::days(i as i64)).with("_total_", f64::from(*total)))
				.collect();
			let filter = PercentileFilter::new("_total_");
			filter.percentile.set(percentile);

			let filtered = filter.apply(DataUpdate::new(rows.clone(), "date", Vec::new()));

			prop_assert_eq!(filtered.data.len(), kept_row_count(rows.len(), percentile));
			prop_assert!(filtered.data.len() as f64 >= percentile * rows.len() as f64 - 1e-6);
			prop_assert!(filtered.data.windows(2).all(|pair| pair[0].key < pair[1].key));
			let kept_max = filtered
				.data
				.iter()
				.map(|row| row.value("_total_"))
				.fold(f64::NEG_INFINITY, f64::max);
			prop_assert!(rows
				.iter()
				.filter(|row| !filtered.data.contains(row))
				.all(|row| row.value("_total_") >= kept_max));
		}
	}
}
