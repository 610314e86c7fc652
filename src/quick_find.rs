//! Quick-find disjoint sets over the labels `1..=n`.

use log::trace;

use crate::error::{ChartError, Result};

/// Incremental connectivity index.
///
/// Union relabels every member of the first component (O(n)), queries are a
/// single comparison (O(1)). Graphs rendered by the toolkit stay small enough
/// for that trade-off.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QuickFind {
	// ids[label - 1] is the component id of `label`
	ids: Vec<usize>,
}

impl QuickFind {
	/// Creates `size` singleton components, each labelled with its own point.
	pub fn new(size: usize) -> Self {
		Self {
			ids: (1..=size).collect(),
		}
	}

	/// Number of labels, `n`.
	pub fn len(&self) -> usize {
		self.ids.len()
	}

	/// `true` for an index over zero labels.
	pub fn is_empty(&self) -> bool {
		self.ids.is_empty()
	}

	/// Merges the components containing `a` and `b`.
	pub fn connect(&mut self, a: usize, b: usize) -> Result<()> {
		let (from, to) = (self.component_of(a)?, self.component_of(b)?);
		if from == to {
			return Ok(());
		}
		trace!("quick find: relabel component {from} -> {to}");
		for id in self.ids.iter_mut().filter(|id| **id == from) {
			*id = to;
		}
		Ok(())
	}

	/// Whether `a` and `b` share a component.
	pub fn are_connected(&self, a: usize, b: usize) -> Result<bool> {
		Ok(self.component_of(a)? == self.component_of(b)?)
	}

	/// Component id currently owning `label`.
	pub fn component_of(&self, label: usize) -> Result<usize> {
		label
			.checked_sub(1)
			.and_then(|i| self.ids.get(i))
			.copied()
			.ok_or(ChartError::LabelOutOfRange {
				label,
				size: self.ids.len(),
			})
	}

	/// Number of points sharing the component of `label`.
	pub fn component_size(&self, label: usize) -> Result<usize> {
		let id = self.component_of(label)?;
		Ok(self.ids.iter().filter(|other| **other == id).count())
	}
}
