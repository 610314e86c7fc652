//! Row totals and the `min`/`max` records used for axis domains.

use super::types::{DataUpdate, Record, Value};
use crate::stage::{Decorated, Transform};

/// Field name under which [`MinMaxOfRow`] reports category extremes.
pub const VALUE_FIELD: &str = "value";

fn merge_extent(update: &mut DataUpdate, field: &str, values: impl IntoIterator<Item = f64>) {
	let mut values = values.into_iter();
	let Some(first) = values.next() else {
		return;
	};
	let (min, max) = values.fold((first, first), |(min, max), value| (min.min(value), max.max(value)));
	update.min.insert(field.to_string(), Value::Number(min));
	update.max.insert(field.to_string(), Value::Number(max));
}

/// Adds a field holding the sum of the current categories of each row.
#[derive(Debug)]
pub struct RowTotal {
	field: String,
}

impl RowTotal {
	/// Total written to `field`.
	pub fn new(field: impl Into<String>) -> Self {
		Self { field: field.into() }
	}

	/// Name of the total field.
	pub fn field(&self) -> &str {
		&self.field
	}
}

impl Transform for RowTotal {
	type Update = DataUpdate;

	fn apply(&self, mut update: DataUpdate) -> DataUpdate {
		let categories = &update.categories;
		for row in &mut update.data {
			let total = categories.iter().map(|category| row.value(category)).sum();
			row.set(self.field.as_str(), total);
		}
		update
	}
}

/// Stage adding a row total.
pub type WithRowTotal<S> = Decorated<S, RowTotal>;

/// Smallest and largest category value over all rows, as `min.value`/`max.value`.
#[derive(Debug, Default)]
pub struct MinMaxOfRow;

impl Transform for MinMaxOfRow {
	type Update = DataUpdate;

	fn apply(&self, mut update: DataUpdate) -> DataUpdate {
		let values: Vec<f64> = update
			.data
			.iter()
			.flat_map(|row| update.categories.iter().filter_map(move |category| row.get(category)))
			.collect();
		merge_extent(&mut update, VALUE_FIELD, values);
		update
	}
}

/// Stage reporting category extremes.
pub type WithMinMaxOfRow<S> = Decorated<S, MinMaxOfRow>;

/// Earliest and latest key, merged into `min`/`max` under the key name.
#[derive(Debug, Default)]
pub struct MinMaxKey;

impl Transform for MinMaxKey {
	type Update = DataUpdate;

	fn apply(&self, mut update: DataUpdate) -> DataUpdate {
		let keys = update.data.iter().map(|row| row.key);
		if let (Some(min), Some(max)) = (keys.clone().min(), keys.max()) {
			update.min.insert(update.key.clone(), Value::Time(min));
			update.max.insert(update.key.clone(), Value::Time(max));
		}
		update
	}
}

/// Stage reporting key extremes.
pub type WithMinMaxKey<S> = Decorated<S, MinMaxKey>;

/// Extremes of one named field, merged into `min`/`max`.
#[derive(Debug)]
pub struct MinMaxOf {
	field: String,
}

impl MinMaxOf {
	/// Extremes of `field`.
	pub fn new(field: impl Into<String>) -> Self {
		Self { field: field.into() }
	}
}

impl Transform for MinMaxOf {
	type Update = DataUpdate;

	fn apply(&self, mut update: DataUpdate) -> DataUpdate {
		let values: Vec<f64> = update.data.iter().filter_map(|row| row.get(&self.field)).collect();
		merge_extent(&mut update, &self.field, values);
		update
	}
}

/// Stage reporting the extremes of one field.
pub type WithMinMax<S> = Decorated<S, MinMaxOf>;

/// Pins every numeric entry of `min` to a floor value, so value axes start there.
#[derive(Debug)]
pub struct ClampedMin {
	floor: f64,
}

impl ClampedMin {
	/// Clamps at `floor`.
	pub fn new(floor: f64) -> Self {
		Self { floor }
	}

	/// The clamping floor.
	pub fn floor(&self) -> f64 {
		self.floor
	}
}

impl Transform for ClampedMin {
	type Update = DataUpdate;

	fn apply(&self, mut update: DataUpdate) -> DataUpdate {
		clamp_record(&mut update.min, self.floor);
		update
	}
}

fn clamp_record(record: &mut Record, floor: f64) {
	for value in record.values_mut() {
		if let Value::Number(number) = value {
			*number = floor;
		}
	}
}

/// Stage clamping `min`.
pub type WithClampedMin<S> = Decorated<S, ClampedMin>;
