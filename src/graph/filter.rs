use std::cell::Cell;

use log::{debug, warn};

use super::clusters::Clusters;
use super::types::GraphUpdate;
use crate::error::Result;
use crate::stage::{Decorated, Stage, Transform};

/// Starting threshold of [`ClusterSizeFilter`]: lone nodes are hidden.
pub const DEFAULT_MIN_NODE_CLUSTER_SIZE: usize = 2;

/// Starting threshold of [`LinkStrengthFilter`]: every link passes, negative
/// strengths included.
pub const DEFAULT_MIN_LINK_STRENGTH: f64 = f64::NEG_INFINITY;

/// Keeps nodes whose cluster has at least `min` members.
#[derive(Debug)]
pub struct ClusterSizeFilter {
	min: Cell<usize>,
}

impl ClusterSizeFilter {
	/// Filter at `min` members.
	pub fn new(min: usize) -> Self {
		Self { min: Cell::new(min) }
	}

	/// Current threshold.
	pub fn min_node_cluster_size(&self) -> usize {
		self.min.get()
	}
}

impl Default for ClusterSizeFilter {
	fn default() -> Self {
		Self::new(DEFAULT_MIN_NODE_CLUSTER_SIZE)
	}
}

impl Transform for ClusterSizeFilter {
	type Update = GraphUpdate;

	fn apply(&self, mut update: GraphUpdate) -> GraphUpdate {
		let min = self.min.get();
		let sizes = Clusters::of(&update.nodes, &update.links).sizes();
		let kept = |index: usize| sizes.get(&index).is_some_and(|&size| size >= min);
		update.nodes.retain(|node| kept(node.index));
		update
			.links
			.retain(|link| kept(link.source.index) && kept(link.target.index));
		update.retain_shown_selection();
		update.min_node_cluster_size = Some(min);
		update
	}
}

/// Stage filtering nodes by cluster size.
pub type WithClusterSizeFilter<S> = Decorated<S, ClusterSizeFilter>;

impl<S> Decorated<S, ClusterSizeFilter>
where
	S: Stage<Update = GraphUpdate>,
{
	/// Sets the threshold and rebroadcasts.
	pub fn set_min_node_cluster_size(&self, min: usize) -> Result<()> {
		self.ensure_primed()?;
		debug!("min node cluster size {min}");
		self.transform().min.set(min);
		self.republish()
	}
}

/// Keeps links whose strength is at least `min`.
///
/// `link_strength_extent` is passed through from upstream untouched.
#[derive(Debug)]
pub struct LinkStrengthFilter {
	min: Cell<f64>,
}

impl LinkStrengthFilter {
	/// Filter at strength `min`.
	pub fn new(min: f64) -> Self {
		Self { min: Cell::new(min) }
	}

	/// Current threshold.
	pub fn min_link_strength(&self) -> f64 {
		self.min.get()
	}
}

impl Default for LinkStrengthFilter {
	fn default() -> Self {
		Self::new(DEFAULT_MIN_LINK_STRENGTH)
	}
}

impl Transform for LinkStrengthFilter {
	type Update = GraphUpdate;

	fn apply(&self, mut update: GraphUpdate) -> GraphUpdate {
		let min = self.min.get();
		update.links.retain(|link| link.value >= min);
		update.min_link_strength = Some(min);
		update
	}
}

/// Stage filtering links by strength.
pub type WithLinkStrengthFilter<S> = Decorated<S, LinkStrengthFilter>;

impl<S> Decorated<S, LinkStrengthFilter>
where
	S: Stage<Update = GraphUpdate>,
{
	/// Sets the threshold and rebroadcasts.
	pub fn set_min_link_strength(&self, min: f64) -> Result<()> {
		self.ensure_primed()?;
		if min.is_nan() {
			warn!("ignoring NaN link strength threshold");
			return Ok(());
		}
		debug!("min link strength {min}");
		self.transform().min.set(min);
		self.republish()
	}
}
