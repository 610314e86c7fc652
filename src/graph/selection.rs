use std::cell::{Cell, RefCell};
use std::collections::HashSet;

use log::debug;

use super::clusters::Clusters;
use super::types::{GraphUpdate, Node, NodeRef};
use crate::error::Result;
use crate::stage::{Decorated, Stage, Transform};

/// Which nodes count as related to a clicked node.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SelectionPolicy {
	/// Every node transitively linked to it.
	Cluster,
	/// It and its direct neighbours.
	Neighbors,
}

impl SelectionPolicy {
	fn related(self, anchor: &Node, update: &GraphUpdate) -> Vec<NodeRef> {
		match self {
			SelectionPolicy::Cluster => Clusters::of(&update.nodes, &update.links).members(anchor, &update.nodes),
			SelectionPolicy::Neighbors => {
				let mut related: HashSet<usize> = update
					.links
					.iter()
					.filter_map(|link| link.other_end(anchor.index))
					.map(|node| node.index)
					.collect();
				related.insert(anchor.index);
				update
					.nodes
					.iter()
					.filter(|node| related.contains(&node.index))
					.cloned()
					.collect()
			}
		}
	}
}

/// Marks the nodes related to an anchor node as selected.
///
/// The anchor is remembered, so later upstream updates recompute the selection
/// over the new snapshot. While the anchor is absent from the snapshot (e.g.
/// removed by an inner stage) the selection is empty.
#[derive(Debug)]
pub struct NodeSelection {
	policy: SelectionPolicy,
	anchor: RefCell<Option<NodeRef>>,
	selected: RefCell<Vec<NodeRef>>,
	announcing: Cell<bool>,
}

impl NodeSelection {
	/// Selection following `policy`, starting empty.
	pub fn new(policy: SelectionPolicy) -> Self {
		Self {
			policy,
			anchor: RefCell::new(None),
			selected: RefCell::new(Vec::new()),
			announcing: Cell::new(false),
		}
	}

	/// Nodes selected by the latest update.
	pub fn selected_nodes(&self) -> Vec<NodeRef> {
		self.selected.borrow().clone()
	}
}

impl Transform for NodeSelection {
	type Update = GraphUpdate;

	fn apply(&self, mut update: GraphUpdate) -> GraphUpdate {
		for node in self.selected.borrow().iter().chain(&update.nodes) {
			node.set_selected(false);
		}
		let selected = match self.anchor.borrow().as_ref() {
			Some(anchor) if update.contains(anchor) => self.policy.related(anchor, &update),
			_ => Vec::new(),
		};
		for node in &selected {
			node.set_selected(true);
		}
		*self.selected.borrow_mut() = selected.clone();
		update.is_selection_update = self.announcing.get();
		update.selected_nodes = selected;
		update
	}
}

/// Stage selecting related nodes.
pub type WithNodeSelection<S> = Decorated<S, NodeSelection>;

impl<S> Decorated<S, NodeSelection>
where
	S: Stage<Update = GraphUpdate>,
{
	/// Selects the nodes related to `node` and broadcasts a selection update.
	pub fn select_related_nodes(&self, node: &NodeRef) -> Result<()> {
		self.ensure_primed()?;
		*self.transform().anchor.borrow_mut() = Some(node.clone());
		self.announce()?;
		debug!(
			"selected {} node(s) related to {}",
			self.transform().selected.borrow().len(),
			node.name
		);
		Ok(())
	}

	/// Drops the anchor and broadcasts an empty selection.
	pub fn clear_selection(&self) -> Result<()> {
		self.ensure_primed()?;
		*self.transform().anchor.borrow_mut() = None;
		self.announce()
	}

	fn announce(&self) -> Result<()> {
		self.transform().announcing.set(true);
		let published = self.republish();
		self.transform().announcing.set(false);
		published
	}
}

#[cfg(test)]
mod tests {
	use crate::error::ChartError;
	use crate::graph::test_support::{capture, sample};
	use crate::graph::{Graph, GraphStageExt, Link};
	use crate::stage::Stage;

	#[test]
	fn sends_update_with_empty_list_of_selected_nodes() {
		let s = sample();
		let graph = Graph::new(s.nodes(), s.links()).with_node_cluster_selection();
		let received = capture(&graph);

		graph.send_update().unwrap();

		assert!(!received().is_selection_update);
		assert!(received().selected_nodes.is_empty());
		assert!(s.nodes().iter().all(|node| !node.is_selected()));
	}

	#[test]
	fn on_cluster_selection_sends_update_with_list_of_selected_nodes() {
		let s = sample();
		let graph = Graph::new(s.nodes(), vec![s.ca.clone()]).with_node_cluster_selection();
		let received = capture(&graph);

		graph.send_update().unwrap();
		graph.select_related_nodes(&s.a).unwrap();

		assert!(received().is_selection_update);
		assert_eq!(received().selected_nodes, vec![s.a.clone(), s.c.clone()]);
		assert!(s.a.is_selected());
		assert!(!s.b.is_selected());
		assert!(s.c.is_selected());
	}

	#[test]
	fn cluster_selection_follows_links_transitively() {
		let s = sample();
		let graph = Graph::new(s.nodes(), s.links()).with_node_cluster_selection();
		let received = capture(&graph);

		graph.send_update().unwrap();
		graph.select_related_nodes(&s.a).unwrap();

		assert_eq!(received().selected_nodes, s.nodes());
	}

	#[test]
	fn on_neighbors_selection_sends_update_with_list_of_selected_nodes() {
		let s = sample();
		let graph = Graph::new(s.nodes(), vec![s.ab.clone(), s.bc.clone()]).with_node_neighbors_selection();
		let received = capture(&graph);

		graph.send_update().unwrap();
		graph.select_related_nodes(&s.a).unwrap();

		assert!(received().is_selection_update);
		assert_eq!(received().selected_nodes, vec![s.a.clone(), s.b.clone()]);
		assert!(s.a.is_selected());
		assert!(s.b.is_selected());
		assert!(!s.c.is_selected());
	}

	#[test]
	fn selection_survives_plain_updates() {
		let s = sample();
		let graph = Graph::new(s.nodes(), vec![Link::new(&s.a, &s.b, 1.0)]).with_node_cluster_selection();
		let received = capture(&graph);

		graph.send_update().unwrap();
		graph.select_related_nodes(&s.b).unwrap();
		graph.send_update().unwrap();

		assert!(!received().is_selection_update);
		assert_eq!(received().selected_nodes, vec![s.a.clone(), s.b.clone()]);

		graph.clear_selection().unwrap();
		assert!(received().is_selection_update);
		assert!(received().selected_nodes.is_empty());
		assert!(!s.a.is_selected());
	}

	#[test]
	fn selecting_before_first_update_fails() {
		let s = sample();
		let graph = Graph::new(s.nodes(), s.links()).with_node_cluster_selection();
		assert_eq!(graph.select_related_nodes(&s.a), Err(ChartError::NoDataYet));
		assert!(!s.a.is_selected());
	}
}
