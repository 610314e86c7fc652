//! Time bucketing stages.

use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::collections::btree_map::Entry;
use std::fmt;
use std::rc::Rc;

use log::{debug, info};

use super::time::Granularity;
use super::types::{DataUpdate, Row};
use crate::error::{ChartError, Result};
use crate::observable::{Observable, Subscriber};
use crate::stage::{Decorated, Stage, Transform};

/// Sums rows falling into the same bucket of `granularity`.
///
/// Bucket rows take the bucket floor as key; output is ordered by bucket.
pub fn group_rows(rows: &[Row], granularity: &dyn Granularity) -> Vec<Row> {
	let mut buckets: BTreeMap<_, Row> = BTreeMap::new();
	for row in rows {
		let floor = granularity.floor(row.key);
		match buckets.entry(floor) {
			Entry::Vacant(entry) => {
				let mut bucket = row.clone();
				bucket.key = floor;
				entry.insert(bucket);
			}
			Entry::Occupied(mut entry) => {
				let bucket = entry.get_mut();
				for (name, value) in row.fields() {
					bucket.add(name, value);
				}
			}
		}
	}
	buckets.into_values().collect()
}

/// Transform behind [`GroupedBy`].
pub struct TimeGrouping {
	granularities: Vec<Box<dyn Granularity>>,
	index: Cell<usize>,
}

impl TimeGrouping {
	/// Granularities must be non-empty and strictly increasing in size.
	pub fn new(granularities: Vec<Box<dyn Granularity>>) -> Result<Self> {
		if granularities.is_empty() {
			return Err(ChartError::NoGranularities);
		}
		if let Some(index) = (1..granularities.len())
			.find(|&i| granularities[i].size() <= granularities[i - 1].size())
		{
			return Err(ChartError::GranularityOrder { index });
		}
		Ok(Self {
			granularities,
			index: Cell::new(0),
		})
	}

	/// Index of the active granularity.
	pub fn index(&self) -> usize {
		self.index.get()
	}

	/// Granularities, finest first.
	pub fn granularities(&self) -> &[Box<dyn Granularity>] {
		&self.granularities
	}
}

impl fmt::Debug for TimeGrouping {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let labels: Vec<_> = self.granularities.iter().map(|g| g.label()).collect();
		f.debug_struct("TimeGrouping")
			.field("granularities", &labels)
			.field("index", &self.index.get())
			.finish()
	}
}

impl Transform for TimeGrouping {
	type Update = DataUpdate;

	fn apply(&self, mut update: DataUpdate) -> DataUpdate {
		let index = self.index.get();
		update.data = group_rows(&update.data, self.granularities[index].as_ref());
		update.group_by_index = Some(index);
		update
	}
}

/// Access to the grouping stage of a chain from any stage above it.
pub trait Regroup: Stage<Update = DataUpdate> {
	/// Index of the active granularity.
	fn group_by_index(&self) -> usize;

	/// Number of granularities to choose from.
	fn granularity_count(&self) -> usize;

	/// Regroups the cached data at granularity `index` and rebroadcasts.
	fn group_by(&self, index: usize) -> Result<()>;
}

/// Buckets upstream rows by the selected granularity.
pub struct GroupedBy<S: Stage<Update = DataUpdate>> {
	inner: Decorated<S, TimeGrouping>,
}

impl<S> GroupedBy<S>
where
	S: Stage<Update = DataUpdate>,
{
	/// Groups `upstream` starting at the finest granularity.
	pub fn new<G>(granularities: impl IntoIterator<Item = G>, upstream: S) -> Result<Self>
	where
		G: Granularity + 'static,
	{
		let granularities = granularities
			.into_iter()
			.map(|g| Box::new(g) as Box<dyn Granularity>)
			.collect();
		let transform = TimeGrouping::new(granularities)?;
		Ok(Self {
			inner: Decorated::new(upstream, transform),
		})
	}

	/// The wrapped stage.
	pub fn upstream(&self) -> &S {
		self.inner.upstream()
	}

	/// Grouping settings.
	pub fn transform(&self) -> &TimeGrouping {
		self.inner.transform()
	}
}

impl<S> Stage for GroupedBy<S>
where
	S: Stage<Update = DataUpdate>,
{
	type Update = DataUpdate;

	fn subscribe(&self, subscribers: Vec<Subscriber<DataUpdate>>) {
		self.inner.subscribe(subscribers);
	}

	fn send_update(&self) -> Result<()> {
		self.inner.send_update()
	}
}

impl<S> Regroup for GroupedBy<S>
where
	S: Stage<Update = DataUpdate>,
{
	fn group_by_index(&self) -> usize {
		self.transform().index()
	}

	fn granularity_count(&self) -> usize {
		self.transform().granularities.len()
	}

	fn group_by(&self, index: usize) -> Result<()> {
		let count = self.granularity_count();
		if index >= count {
			return Err(ChartError::GranularityIndexOutOfRange { index, count });
		}
		self.inner.ensure_primed()?;
		info!(
			"grouping by {} (index {index})",
			self.transform().granularities[index].label()
		);
		self.transform().index.set(index);
		self.inner.republish()
	}
}

impl<S, T> Regroup for Decorated<S, T>
where
	S: Regroup,
	T: Transform<Update = DataUpdate>,
{
	fn group_by_index(&self) -> usize {
		self.upstream().group_by_index()
	}

	fn granularity_count(&self) -> usize {
		self.upstream().granularity_count()
	}

	fn group_by(&self, index: usize) -> Result<()> {
		self.upstream().group_by(index)
	}
}

struct AutoGroupState {
	primed: Cell<bool>,
	holding: Cell<bool>,
	last_seen: RefCell<Option<DataUpdate>>,
	observable: Observable<DataUpdate>,
}

impl AutoGroupState {
	fn receive(&self, update: &DataUpdate) {
		*self.last_seen.borrow_mut() = Some(update.clone());
		if !self.holding.get() {
			self.observable.broadcast(update);
		}
	}

	fn row_count(&self) -> Option<usize> {
		self.last_seen.borrow().as_ref().map(|update| update.data.len())
	}
}

/// Picks a coarser granularity on the first update when there are too many rows.
///
/// On the first `send_update` the grouping index is advanced one step at a
/// time while the grouped view still has `threshold` rows or more and a
/// coarser granularity remains. Only the settled view is broadcast; later
/// updates pass through untouched.
pub struct AutoGroupOnFirstUpdate<S> {
	upstream: S,
	threshold: usize,
	state: Rc<AutoGroupState>,
}

impl<S: Regroup> AutoGroupOnFirstUpdate<S> {
	/// Coarsens `upstream` while it yields at least `threshold` rows.
	pub fn new(threshold: usize, upstream: S) -> Self {
		let state = Rc::new(AutoGroupState {
			primed: Cell::new(false),
			holding: Cell::new(false),
			last_seen: RefCell::new(None),
			observable: Observable::new(),
		});
		let weak = Rc::downgrade(&state);
		upstream.on_update(move |update| {
			if let Some(state) = weak.upgrade() {
				state.receive(update);
			}
		});
		Self {
			upstream,
			threshold,
			state,
		}
	}

	/// Row count that triggers coarsening.
	pub fn threshold(&self) -> usize {
		self.threshold
	}

	/// The wrapped stage.
	pub fn upstream(&self) -> &S {
		&self.upstream
	}

	fn settle(&self) -> Result<()> {
		self.upstream.send_update()?;
		while let Some(rows) = self.state.row_count() {
			let index = self.upstream.group_by_index();
			if rows < self.threshold || index + 1 >= self.upstream.granularity_count() {
				break;
			}
			debug!(
				"auto-grouping: {rows} rows reach threshold {}, coarsening to index {}",
				self.threshold,
				index + 1
			);
			self.upstream.group_by(index + 1)?;
		}
		Ok(())
	}
}

impl<S: Regroup> Stage for AutoGroupOnFirstUpdate<S> {
	type Update = DataUpdate;

	fn subscribe(&self, subscribers: Vec<Subscriber<DataUpdate>>) {
		self.state.observable.subscribe(subscribers);
	}

	fn send_update(&self) -> Result<()> {
		if self.state.primed.get() {
			return self.upstream.send_update();
		}
		self.state.holding.set(true);
		let settled = self.settle();
		self.state.holding.set(false);
		settled?;
		self.state.primed.set(true);
		let update = self.state.last_seen.borrow().clone();
		if let Some(update) = update {
			self.state.observable.broadcast(&update);
		}
		Ok(())
	}
}

impl<S: Regroup> Regroup for AutoGroupOnFirstUpdate<S> {
	fn group_by_index(&self) -> usize {
		self.upstream.group_by_index()
	}

	fn granularity_count(&self) -> usize {
		self.upstream.granularity_count()
	}

	fn group_by(&self, index: usize) -> Result<()> {
		self.upstream.group_by(index)
	}
}
