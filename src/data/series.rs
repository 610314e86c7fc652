use super::types::{DataUpdate, Series, SeriesPoint};
use crate::stage::{Decorated, Transform};

/// One line series per current category, points in row order.
#[derive(Debug, Default)]
pub struct SeriesData;

impl Transform for SeriesData {
	type Update = DataUpdate;

	fn apply(&self, mut update: DataUpdate) -> DataUpdate {
		update.series = update
			.categories
			.iter()
			.map(|category| Series {
				category: category.clone(),
				points: update
					.data
					.iter()
					.map(|row| SeriesPoint {
						x: row.key,
						y: row.value(category),
					})
					.collect(),
			})
			.collect();
		update
	}
}

/// Stage adding per-category series.
pub type WithSeriesData<S> = Decorated<S, SeriesData>;
