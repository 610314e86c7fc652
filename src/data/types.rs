use std::collections::BTreeMap;

use chrono::NaiveDateTime;

/// One row of a time-keyed table: the key plus named numeric fields.
///
/// Fields keep the order they were added in, which is the column order of
/// the source table.
#[derive(Clone, Debug, PartialEq)]
pub struct Row {
	/// Row key, usually a date.
	pub key: NaiveDateTime,
	fields: Vec<(String, f64)>,
}

impl Row {
	/// Row without fields.
	pub fn new(key: NaiveDateTime) -> Self {
		Self {
			key,
			fields: Vec::new(),
		}
	}

	/// Builder form of [`Row::set`].
	pub fn with(mut self, name: impl Into<String>, value: f64) -> Self {
		self.set(name, value);
		self
	}

	/// Value of `name`, if the row has it.
	pub fn get(&self, name: &str) -> Option<f64> {
		self.fields
			.iter()
			.find(|(field, _)| field == name)
			.map(|(_, value)| *value)
	}

	/// Value of `name`, zero when the row lacks the field.
	pub fn value(&self, name: &str) -> f64 {
		self.get(name).unwrap_or(0.0)
	}

	/// Sets `name`, appending it when it is new.
	pub fn set(&mut self, name: impl Into<String>, value: f64) {
		let name = name.into();
		match self.fields.iter_mut().find(|(field, _)| *field == name) {
			Some((_, slot)) => *slot = value,
			None => self.fields.push((name, value)),
		}
	}

	/// Adds `value` to `name`, appending it when it is new.
	pub fn add(&mut self, name: &str, value: f64) {
		match self.fields.iter_mut().find(|(field, _)| field == name) {
			Some((_, slot)) => *slot += value,
			None => self.fields.push((name.to_string(), value)),
		}
	}

	/// Fields in column order.
	pub fn fields(&self) -> impl Iterator<Item = (&str, f64)> {
		self.fields
			.iter()
			.map(|(name, value)| (name.as_str(), *value))
	}

	/// Field names in column order.
	pub fn field_names(&self) -> impl Iterator<Item = &str> {
		self.fields.iter().map(|(name, _)| name.as_str())
	}
}

/// Category names of a table, taken from its first row.
pub fn categories_of(rows: &[Row]) -> Vec<String> {
	rows.first()
		.map(|row| row.field_names().map(str::to_string).collect())
		.unwrap_or_default()
}

/// Entry of a `min`/`max` record.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Value {
	/// Extreme of a key field.
	Time(NaiveDateTime),
	/// Extreme of a numeric field.
	Number(f64),
}

impl Value {
	/// The number, for numeric entries.
	pub fn as_number(&self) -> Option<f64> {
		match self {
			Value::Number(value) => Some(*value),
			Value::Time(_) => None,
		}
	}

	/// The time, for key entries.
	pub fn as_time(&self) -> Option<NaiveDateTime> {
		match self {
			Value::Time(time) => Some(*time),
			Value::Number(_) => None,
		}
	}
}

/// Field name to extreme value, e.g. `{"date": earliest, "_total_": 0}`.
pub type Record = BTreeMap<String, Value>;

/// One stacked bar segment.
#[derive(Clone, Debug, PartialEq)]
pub struct StackedPoint {
	/// Category the segment belongs to.
	pub category: String,
	/// Key of the row.
	pub x: NaiveDateTime,
	/// Segment height.
	pub y: f64,
	/// Sum of the segments below this one.
	pub y0: f64,
}

/// One point of a [`Series`].
#[derive(Clone, Debug, PartialEq)]
pub struct SeriesPoint {
	/// Key of the row.
	pub x: NaiveDateTime,
	/// Value of the category in that row.
	pub y: f64,
}

/// Line of one category over time.
#[derive(Clone, Debug, PartialEq)]
pub struct Series {
	/// Category name.
	pub category: String,
	/// Points in key order.
	pub points: Vec<SeriesPoint>,
}

/// Payload broadcast by every data pipeline stage.
///
/// The source fills `data`, `key` and `categories`; decorators fill the rest
/// as they are stacked on.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct DataUpdate {
	/// Rows in ascending key order.
	pub data: Vec<Row>,
	/// Name of the key field.
	pub key: String,
	/// Categories currently shown.
	pub categories: Vec<String>,
	/// Active source, set by a switcher.
	pub data_source_index: Option<usize>,
	/// Active granularity, set by grouping.
	pub group_by_index: Option<usize>,
	/// Active percentile, set by the percentile filter.
	pub percentile: Option<f64>,
	/// Smallest values per field.
	pub min: Record,
	/// Largest values per field.
	pub max: Record,
	/// Stacked segments, one layer per category, one point per row.
	pub data_stacked: Vec<Vec<StackedPoint>>,
	/// One series per category.
	pub series: Vec<Series>,
}

impl DataUpdate {
	/// Source payload; every derived field starts empty.
	pub fn new(data: Vec<Row>, key: impl Into<String>, categories: Vec<String>) -> Self {
		Self {
			data,
			key: key.into(),
			categories,
			..Self::default()
		}
	}
}
