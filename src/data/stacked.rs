use super::types::{DataUpdate, StackedPoint};
use crate::stage::{Decorated, Transform};

/// Stacks category values of each row in category order.
///
/// Produces one layer per category; `y0` of a segment is the sum of the
/// segments of earlier categories in the same row.
#[derive(Debug, Default)]
pub struct Stacked;

/// Stacked layers of the current categories, bottom layer first.
pub fn stack(update: &DataUpdate) -> Vec<Vec<StackedPoint>> {
	if update.data.is_empty() {
		return Vec::new();
	}
	let mut baseline = vec![0.0; update.data.len()];
	update
		.categories
		.iter()
		.map(|category| {
			update
				.data
				.iter()
				.zip(baseline.iter_mut())
				.map(|(row, y0)| {
					let y = row.value(category);
					let point = StackedPoint {
						category: category.clone(),
						x: row.key,
						y,
						y0: *y0,
					};
					*y0 += y;
					point
				})
				.collect()
		})
		.collect()
}

impl Transform for Stacked {
	type Update = DataUpdate;

	fn apply(&self, mut update: DataUpdate) -> DataUpdate {
		update.data_stacked = stack(&update);
		update
	}
}

/// Stage adding stacked layers.
pub type WithStackedData<S> = Decorated<S, Stacked>;

#[cfg(test)]
mod tests {
	use proptest::prelude::*;

	use super::*;
	use crate::data::test_support::{capture, date, sample_rows};
	use crate::data::{DataSource, DataStageExt, Row};
	use crate::stage::Stage;

	fn point(category: &str, day: &str, y: f64, y0: f64) -> StackedPoint {
		StackedPoint {
			category: category.to_string(),
			x: date(day),
			y,
			y0,
		}
	}

	#[test]
	fn sends_update_with_stacked_data() {
		let rows: Vec<_> = sample_rows().into_iter().rev().collect();
		let source = DataSource::new(rows, "date").with_stacked_data();
		let received = capture(&source);

		source.send_update().unwrap();

		let stacked = received().data_stacked;
		assert_eq!(stacked.len(), 3);
		assert_eq!(stacked[0][0], point("java", "20/01/2013", 1.0, 0.0));
		assert_eq!(stacked[1][0], point("xml", "20/01/2013", 11.0, 1.0));
		assert_eq!(stacked[2][0], point("txt", "20/01/2013", 111.0, 1.0 + 11.0));
		assert_eq!(stacked[0][1], point("java", "19/01/2013", 2.0, 0.0));
		assert_eq!(stacked[1][1], point("xml", "19/01/2013", 22.0, 2.0));
		assert_eq!(stacked[2][1], point("txt", "19/01/2013", 222.0, 2.0 + 22.0));
	}

	#[test]
	fn sends_empty_update_when_input_is_empty() {
		let source = DataSource::new(Vec::new(), "date").with_stacked_data();
		let received = capture(&source);

		source.send_update().unwrap();

		assert!(received().data_stacked.is_empty());
	}

	#[test]
	fn excluded_categories_are_not_stacked() {
		let source = DataSource::new(sample_rows(), "date")
			.with_category_exclusion()
			.with_stacked_data();
		let received = capture(&source);

		source.send_update().unwrap();
		source.upstream().exclude_category("java").unwrap();

		let stacked = received().data_stacked;
		assert_eq!(stacked.len(), 2);
		assert_eq!(stacked[0][0], point("xml", "18/01/2013", 33.0, 0.0));
		assert_eq!(stacked[1][0], point("txt", "18/01/2013", 333.0, 33.0));
	}

	proptest! {
		#[test]
		fn segments_sit_on_top_of_each_other(
			table in proptest::collection::vec(proptest::collection::vec(0u16..500, 4), 1..12),
		) {
			let categories = ["a", "b", "c", "d"];
			let rows: Vec<_> = table
				.iter()
				.enumerate()
				.map(|(i, values)| {
					categories.iter().zip(values).fold(
						Row::new(date("01/01/2013") + chrono::TimeDelta::days(i as i64)),
						|row, (name, value)| row.with(*name, f64::from(*value)),
					)
				})
				.collect();
			let update = DataUpdate::new(rows, "date", categories.iter().map(|c| c.to_string()).collect());

			let stacked = stack(&update);

			for row in 0..table.len() {
				prop_assert_eq!(stacked[0][row].y0, 0.0);
				for layer in 1..categories.len() {
					let below = &stacked[layer - 1][row];
					prop_assert_eq!(below.y0 + below.y, stacked[layer][row].y0);
				}
			}
		}
	}
}
