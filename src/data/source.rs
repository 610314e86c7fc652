use std::cell::{Cell, RefCell};
use std::rc::Rc;

use log::{debug, info};

use super::types::{DataUpdate, Row, categories_of};
use crate::error::{ChartError, Result};
use crate::observable::{Observable, Subscriber};
use crate::stage::Stage;

/// Base stage broadcasting a table as `{data, key, categories}`.
#[derive(Debug)]
pub struct DataSource {
	rows: RefCell<Vec<Row>>,
	key: String,
	observable: Observable<DataUpdate>,
}

impl DataSource {
	/// `key` names the key field of every row (e.g. `"date"`).
	pub fn new(rows: Vec<Row>, key: impl Into<String>) -> Self {
		Self {
			rows: RefCell::new(rows),
			key: key.into(),
			observable: Observable::new(),
		}
	}

	/// Name of the key field.
	pub fn key(&self) -> &str {
		&self.key
	}

	/// Copy of the current table.
	pub fn rows(&self) -> Vec<Row> {
		self.rows.borrow().clone()
	}

	/// Replaces the table; takes effect on the next `send_update`.
	pub fn set_rows(&self, rows: Vec<Row>) {
		*self.rows.borrow_mut() = rows;
	}
}

impl Stage for DataSource {
	type Update = DataUpdate;

	fn subscribe(&self, subscribers: Vec<Subscriber<DataUpdate>>) {
		self.observable.subscribe(subscribers);
	}

	fn send_update(&self) -> Result<()> {
		let rows = self.rows();
		let categories = categories_of(&rows);
		debug!(
			"data source: {} rows, categories {:?}",
			rows.len(),
			categories
		);
		self.observable
			.broadcast(&DataUpdate::new(rows, self.key.clone(), categories));
		Ok(())
	}
}

struct SwitchState {
	index: Cell<usize>,
	observable: Observable<DataUpdate>,
}

/// Forwards the updates of one of several sources, tagged with its index.
pub struct DataSourceSwitcher<S> {
	sources: Vec<S>,
	state: Rc<SwitchState>,
}

impl<S> DataSourceSwitcher<S>
where
	S: Stage<Update = DataUpdate>,
{
	/// Switcher over `sources`, starting at the first.
	pub fn new(sources: Vec<S>) -> Result<Self> {
		if sources.is_empty() {
			return Err(ChartError::NoDataSources);
		}
		let state = Rc::new(SwitchState {
			index: Cell::new(0),
			observable: Observable::new(),
		});
		for (i, source) in sources.iter().enumerate() {
			let weak = Rc::downgrade(&state);
			source.on_update(move |update| {
				let Some(state) = weak.upgrade() else {
					return;
				};
				if state.index.get() != i {
					return;
				}
				let mut update = update.clone();
				update.data_source_index = Some(i);
				state.observable.broadcast(&update);
			});
		}
		Ok(Self { sources, state })
	}

	/// Index of the active source.
	pub fn data_source_index(&self) -> usize {
		self.state.index.get()
	}

	/// Every source, active or not.
	pub fn sources(&self) -> &[S] {
		&self.sources
	}

	/// Switches to source `index` and broadcasts a fresh update from it.
	pub fn set_data_source_index(&self, index: usize) -> Result<()> {
		let source = self
			.sources
			.get(index)
			.ok_or(ChartError::DataSourceIndexOutOfRange {
				index,
				count: self.sources.len(),
			})?;
		info!("switching to data source {index}");
		self.state.index.set(index);
		source.send_update()
	}
}

impl<S> Stage for DataSourceSwitcher<S>
where
	S: Stage<Update = DataUpdate>,
{
	type Update = DataUpdate;

	fn subscribe(&self, subscribers: Vec<Subscriber<DataUpdate>>) {
		self.state.observable.subscribe(subscribers);
	}

	fn send_update(&self) -> Result<()> {
		match self.sources.get(self.state.index.get()) {
			Some(source) => source.send_update(),
			None => Err(ChartError::NoDataSources),
		}
	}
}
