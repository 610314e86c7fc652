//! Time bucketing policies used by grouping and moving averages.

use chrono::{Datelike, Months, NaiveDateTime, NaiveTime, TimeDelta, Timelike};

/// A time bucketing policy.
///
/// Lists of granularities handed to grouping must be ordered from finest to
/// coarsest `size`.
pub trait Granularity {
	/// Nominal length of one bucket.
	fn size(&self) -> TimeDelta;

	/// Start of the bucket containing `time`.
	fn floor(&self, time: NaiveDateTime) -> NaiveDateTime;

	/// Start of the bucket after the one containing `time`.
	fn next_floor(&self, time: NaiveDateTime) -> NaiveDateTime;

	/// Short name used in logs.
	fn label(&self) -> &str {
		"custom"
	}
}

/// Calendar granularities. Weeks start on Monday.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TimeInterval {
	/// One minute.
	Minute,
	/// One hour.
	Hour,
	/// One calendar day.
	Day,
	/// Monday to Sunday.
	Week,
	/// One calendar month.
	Month,
	/// One calendar year.
	Year,
}

impl Granularity for TimeInterval {
	fn size(&self) -> TimeDelta {
		match self {
			TimeInterval::Minute => TimeDelta::minutes(1),
			TimeInterval::Hour => TimeDelta::hours(1),
			TimeInterval::Day => TimeDelta::days(1),
			TimeInterval::Week => TimeDelta::weeks(1),
			TimeInterval::Month => TimeDelta::days(30),
			TimeInterval::Year => TimeDelta::days(365),
		}
	}

	fn floor(&self, time: NaiveDateTime) -> NaiveDateTime {
		let date = time.date();
		let midnight = date.and_time(NaiveTime::MIN);
		match self {
			TimeInterval::Minute => midnight + TimeDelta::minutes(i64::from(time.hour() * 60 + time.minute())),
			TimeInterval::Hour => midnight + TimeDelta::hours(i64::from(time.hour())),
			TimeInterval::Day => midnight,
			TimeInterval::Week => {
				midnight - TimeDelta::days(i64::from(date.weekday().num_days_from_monday()))
			}
			TimeInterval::Month => midnight - TimeDelta::days(i64::from(date.day0())),
			TimeInterval::Year => midnight - TimeDelta::days(i64::from(date.ordinal0())),
		}
	}

	fn next_floor(&self, time: NaiveDateTime) -> NaiveDateTime {
		let floor = self.floor(time);
		let months = match self {
			TimeInterval::Month => 1,
			TimeInterval::Year => 12,
			_ => return floor + self.size(),
		};
		floor
			.checked_add_months(Months::new(months))
			.unwrap_or(NaiveDateTime::MAX)
	}

	fn label(&self) -> &str {
		match self {
			TimeInterval::Minute => "minute",
			TimeInterval::Hour => "hour",
			TimeInterval::Day => "day",
			TimeInterval::Week => "week",
			TimeInterval::Month => "month",
			TimeInterval::Year => "year",
		}
	}
}
