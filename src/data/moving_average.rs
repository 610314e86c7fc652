use chrono::NaiveDateTime;

use super::time::Granularity;

/// A value observed at a point in time.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TimedValue {
	/// When the value was observed.
	pub date: NaiveDateTime,
	/// Observed value.
	pub value: f64,
}

/// Mean of a moving window ending at `date`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Mean {
	/// Floor of the window's last bucket.
	pub date: NaiveDateTime,
	/// Mean over the window.
	pub mean: f64,
}

/// Moving average over `window` buckets of `granularity`.
///
/// Values are summed per bucket; buckets without values count as zero. A mean
/// is emitted for every populated bucket that has `window - 1` buckets before
/// it, dated at the bucket floor.
pub fn moving_average(values: &[TimedValue], granularity: &dyn Granularity, window: usize) -> Vec<Mean> {
	if window == 0 {
		return Vec::new();
	}
	let mut values = values.to_vec();
	values.sort_by_key(|value| value.date);
	let Some(first) = values.first() else {
		return Vec::new();
	};

	let mut floor = granularity.floor(first.date);
	let mut sums = vec![0.0];
	let mut populated: Vec<(usize, NaiveDateTime)> = Vec::new();
	for value in &values {
		let bucket = granularity.floor(value.date);
		while floor < bucket {
			floor = granularity.next_floor(floor);
			sums.push(0.0);
		}
		let index = sums.len() - 1;
		sums[index] += value.value;
		if populated.last().map(|(last, _)| *last) != Some(index) {
			populated.push((index, bucket));
		}
	}

	populated
		.into_iter()
		.filter(|(index, _)| *index + 1 >= window)
		.map(|(index, date)| Mean {
			date,
			mean: sums[index + 1 - window..=index].iter().sum::<f64>() / window as f64,
		})
		.collect()
}
