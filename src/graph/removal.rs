use std::cell::RefCell;
use std::collections::HashSet;

use log::{debug, info};

use super::clusters::Clusters;
use super::types::{GraphUpdate, Node};
use crate::error::{ChartError, Result};
use crate::stage::{Decorated, Stage, Transform};

/// Drops removed nodes, and every link touching one, from the graph.
#[derive(Debug, Default)]
pub struct NodeRemoval {
	removed: RefCell<HashSet<usize>>,
	// removed set as it was before the latest removal
	undo: RefCell<Option<HashSet<usize>>>,
}

impl NodeRemoval {
	/// Whether `node` is currently hidden.
	pub fn is_removed(&self, node: &Node) -> bool {
		self.removed.borrow().contains(&node.index)
	}

	/// Number of hidden nodes.
	pub fn removed_count(&self) -> usize {
		self.removed.borrow().len()
	}

	/// Whether a removal can be reverted.
	pub fn can_undo(&self) -> bool {
		self.undo.borrow().is_some()
	}

	fn remove(&self, indexes: impl IntoIterator<Item = usize>) {
		let mut removed = self.removed.borrow_mut();
		*self.undo.borrow_mut() = Some(removed.clone());
		removed.extend(indexes);
	}
}

impl Transform for NodeRemoval {
	type Update = GraphUpdate;

	fn apply(&self, mut update: GraphUpdate) -> GraphUpdate {
		let removed = self.removed.borrow();
		update.nodes.retain(|node| !removed.contains(&node.index));
		update
			.links
			.retain(|link| !removed.contains(&link.source.index) && !removed.contains(&link.target.index));
		update.retain_shown_selection();
		update
	}
}

/// Stage hiding removed nodes.
pub type WithRemovedNodes<S> = Decorated<S, NodeRemoval>;

impl<S> Decorated<S, NodeRemoval>
where
	S: Stage<Update = GraphUpdate>,
{
	/// Removes a single node and rebroadcasts.
	pub fn remove_node(&self, node: &Node) -> Result<()> {
		self.ensure_primed()?;
		debug!("removing node {}", node.name);
		self.transform().remove([node.index]);
		self.republish()
	}

	/// Removes `node` and everything connected to it through the links still
	/// visible after earlier removals.
	pub fn remove_nodes_in_cluster_with(&self, node: &Node) -> Result<()> {
		let visible = self
			.last_seen()
			.map(|update| self.transform().apply(update))
			.ok_or(ChartError::NoDataYet)?;
		let mut cluster: HashSet<usize> = Clusters::of(&visible.nodes, &visible.links)
			.members(node, &visible.nodes)
			.iter()
			.map(|member| member.index)
			.collect();
		cluster.insert(node.index);
		info!("removing cluster of {} ({} node(s))", node.name, cluster.len());
		self.transform().remove(cluster);
		self.republish()
	}

	/// Reverts the latest removal. Only one step is kept; without one this does
	/// nothing and broadcasts nothing.
	pub fn undo_node_removal(&self) -> Result<()> {
		let Some(previous) = self.transform().undo.borrow_mut().take() else {
			debug!("nothing to undo");
			return Ok(());
		};
		info!("undoing node removal");
		*self.transform().removed.borrow_mut() = previous;
		self.republish()
	}
}
