use std::cell::RefCell;
use std::rc::Rc;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use reactive_charts::data::{
	DataSource, DataSourceSwitcher, DataStageExt, DataUpdate, Regroup, Row, TimeInterval, TimedValue, Value,
	moving_average,
};
use reactive_charts::{ChartError, Stage};

fn date(text: &str) -> NaiveDateTime {
	NaiveDate::parse_from_str(text, "%d/%m/%Y")
		.expect("test date")
		.and_time(NaiveTime::MIN)
}

fn rows(scale: f64) -> Vec<Row> {
	[("18/01/2013", 3.0), ("19/01/2013", 2.0), ("20/01/2013", 1.0)]
		.into_iter()
		.map(|(day, n)| {
			Row::new(date(day))
				.with("java", n * scale)
				.with("xml", n * 11.0 * scale)
				.with("txt", n * 111.0 * scale)
		})
		.collect()
}

fn capture(stage: &impl Stage<Update = DataUpdate>) -> impl Fn() -> DataUpdate {
	let received = Rc::new(RefCell::new(None));
	let sink = received.clone();
	stage.on_update(move |update: &DataUpdate| *sink.borrow_mut() = Some(update.clone()));
	move || received.borrow().clone().expect("no update received")
}

#[test]
fn clamped_total_domain_starts_at_zero() {
	let chart = DataSource::new(rows(1.0), "date")
		.with_row_total("_total_")
		.with_min_max("_total_")
		.clamped_min(0.0);
	let received = capture(&chart);

	chart.send_update().unwrap();

	assert_eq!(received().min["_total_"], Value::Number(0.0));
	assert_eq!(received().max["_total_"], Value::Number(369.0));
}

#[test]
fn stacked_bar_chart_chain() {
	let chart = DataSource::new(rows(1.0), "date")
		.with_category_exclusion()
		.grouped_by([TimeInterval::Day, TimeInterval::Week])
		.unwrap()
		.with_row_total("_total_")
		.filtered_by_percentile("_total_")
		.with_stacked_data();
	let received = capture(&chart);

	chart.send_update().unwrap();
	assert_eq!(received().data.len(), 3);
	assert_eq!(received().percentile, Some(1.0));
	assert_eq!(received().group_by_index, Some(0));

	chart.upstream().set_percentile(0.5).unwrap();
	let update = received();
	assert_eq!(
		update.data.iter().map(|row| row.key).collect::<Vec<_>>(),
		[date("19/01/2013"), date("20/01/2013")]
	);
	let txt = &update.data_stacked[2];
	assert_eq!((txt[0].y, txt[0].y0), (222.0, 24.0));
	assert_eq!((txt[1].y, txt[1].y0), (111.0, 12.0));

	chart.group_by(1).unwrap();
	let update = received();
	assert_eq!(update.group_by_index, Some(1));
	assert_eq!(update.data.len(), 1);
	assert_eq!(update.data[0].key, date("14/01/2013"));
	assert_eq!(update.data[0].get("_total_"), Some(738.0));
	assert_eq!(update.data_stacked.len(), 3);

	assert_eq!(
		chart.group_by(2),
		Err(ChartError::GranularityIndexOutOfRange { index: 2, count: 2 })
	);
}

#[test]
fn switching_sources_keeps_decorators() {
	let sources = vec![DataSource::new(rows(1.0), "date"), DataSource::new(rows(10.0), "date")];
	let chart = DataSourceSwitcher::new(sources)
		.unwrap()
		.with_row_total("_total_")
		.with_min_max("_total_");
	let received = capture(&chart);

	chart.send_update().unwrap();
	assert_eq!(received().data_source_index, Some(0));
	assert_eq!(received().max["_total_"], Value::Number(369.0));

	chart.upstream().upstream().set_data_source_index(1).unwrap();
	assert_eq!(received().data_source_index, Some(1));
	assert_eq!(received().max["_total_"], Value::Number(3690.0));

	assert_eq!(
		chart.upstream().upstream().set_data_source_index(2),
		Err(ChartError::DataSourceIndexOutOfRange { index: 2, count: 2 })
	);
}

#[test]
fn auto_grouping_picks_a_coarser_granularity() {
	let chart = DataSource::new(rows(1.0), "date")
		.grouped_by([TimeInterval::Day, TimeInterval::Week])
		.unwrap()
		.with_min_max_key()
		.auto_group_on_first_update(3);
	let received = capture(&chart);

	chart.send_update().unwrap();

	assert_eq!(received().group_by_index, Some(1));
	assert_eq!(received().min["date"], Value::Time(date("14/01/2013")));
	assert_eq!(received().max["date"].as_time(), Some(date("14/01/2013")));
	assert_eq!(chart.group_by_index(), 1);
}

#[test]
fn series_follow_excluded_categories() {
	let chart = DataSource::new(rows(1.0), "date")
		.with_category_exclusion()
		.with_series_data();
	let received = capture(&chart);

	chart.send_update().unwrap();
	chart.upstream().exclude_category("xml").unwrap();

	let series = received().series;
	assert_eq!(
		series.iter().map(|s| s.category.as_str()).collect::<Vec<_>>(),
		["java", "txt"]
	);
	assert_eq!(
		series[0].points.iter().map(|p| p.y).collect::<Vec<_>>(),
		[3.0, 2.0, 1.0]
	);
}

#[test]
fn moving_average_over_days() {
	let values = [
		TimedValue { date: date("01/01/2013"), value: 11.0 },
		TimedValue { date: date("03/01/2013"), value: 13.0 },
		TimedValue { date: date("04/01/2013"), value: 5.0 },
	];

	let means = moving_average(&values, &TimeInterval::Day, 3);

	assert_eq!(means.len(), 2);
	assert_eq!((means[0].date, means[0].mean), (date("03/01/2013"), 8.0));
	assert_eq!((means[1].date, means[1].mean), (date("04/01/2013"), 6.0));
}
