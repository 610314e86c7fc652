use std::cell::RefCell;

use log::debug;

use super::types::DataUpdate;
use crate::error::Result;
use crate::stage::{Decorated, Stage, Transform};

/// Hides categories from downstream consumers without touching row shape.
#[derive(Debug, Default)]
pub struct CategoryExclusion {
	excluded: RefCell<Vec<String>>,
}

impl CategoryExclusion {
	/// Currently excluded names, in exclusion order.
	pub fn excluded(&self) -> Vec<String> {
		self.excluded.borrow().clone()
	}

	/// Whether `category` is hidden.
	pub fn is_excluded(&self, category: &str) -> bool {
		self.excluded.borrow().iter().any(|name| name == category)
	}
}

impl Transform for CategoryExclusion {
	type Update = DataUpdate;

	fn apply(&self, mut update: DataUpdate) -> DataUpdate {
		update.categories.retain(|category| !self.is_excluded(category));
		update
	}
}

/// Stage with [`CategoryExclusion`] applied.
pub type WithCategoryExclusion<S> = Decorated<S, CategoryExclusion>;

impl<S> Decorated<S, CategoryExclusion>
where
	S: Stage<Update = DataUpdate>,
{
	/// Hides `category` and rebroadcasts.
	pub fn exclude_category(&self, category: &str) -> Result<()> {
		self.ensure_primed()?;
		if !self.transform().is_excluded(category) {
			debug!("excluding category {category}");
			self.transform()
				.excluded
				.borrow_mut()
				.push(category.to_string());
		}
		self.republish()
	}

	/// Brings back a previously excluded category.
	pub fn include_category(&self, category: &str) -> Result<()> {
		self.ensure_primed()?;
		self.transform()
			.excluded
			.borrow_mut()
			.retain(|name| name != category);
		self.republish()
	}
}

/// Keeps only the first `count` categories.
#[derive(Debug)]
pub struct FirstCategories {
	count: usize,
}

impl FirstCategories {
	/// Keeps `count` categories.
	pub fn new(count: usize) -> Self {
		Self { count }
	}

	/// Number of categories kept.
	pub fn count(&self) -> usize {
		self.count
	}
}

impl Transform for FirstCategories {
	type Update = DataUpdate;

	fn apply(&self, mut update: DataUpdate) -> DataUpdate {
		update.categories.truncate(self.count);
		update
	}
}

/// Stage with [`FirstCategories`] applied.
pub type WithFirstCategories<S> = Decorated<S, FirstCategories>;
