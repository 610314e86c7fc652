use std::cell::RefCell;

use log::debug;

use super::types::{GraphUpdate, Link, NodeRef};
use crate::error::Result;
use crate::observable::{Observable, Subscriber};
use crate::stage::Stage;

/// Base graph stage broadcasting `{nodes, links, link_strength_extent}`.
#[derive(Debug)]
pub struct Graph {
	nodes: RefCell<Vec<NodeRef>>,
	links: RefCell<Vec<Link>>,
	observable: Observable<GraphUpdate>,
}

impl Graph {
	/// Graph over `nodes` and `links`.
	pub fn new(nodes: Vec<NodeRef>, links: Vec<Link>) -> Self {
		Self {
			nodes: RefCell::new(nodes),
			links: RefCell::new(links),
			observable: Observable::new(),
		}
	}

	/// Every node, removed or filtered ones included.
	pub fn nodes(&self) -> Vec<NodeRef> {
		self.nodes.borrow().clone()
	}

	/// Every link.
	pub fn links(&self) -> Vec<Link> {
		self.links.borrow().clone()
	}

	/// Replaces the node/link set; takes effect on the next `send_update`.
	pub fn set_data(&self, nodes: Vec<NodeRef>, links: Vec<Link>) {
		*self.nodes.borrow_mut() = nodes;
		*self.links.borrow_mut() = links;
	}
}

impl Stage for Graph {
	type Update = GraphUpdate;

	fn subscribe(&self, subscribers: Vec<Subscriber<GraphUpdate>>) {
		self.observable.subscribe(subscribers);
	}

	fn send_update(&self) -> Result<()> {
		let update = GraphUpdate::new(self.nodes(), self.links());
		debug!(
			"graph: {} nodes, {} links",
			update.nodes.len(),
			update.links.len()
		);
		self.observable.broadcast(&update);
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::graph::test_support::{capture, sample};
	use crate::graph::types::Extent;

	#[test]
	fn sends_update_with_graph_nodes_and_links() {
		let s = sample();
		let graph = Graph::new(s.nodes(), s.links());
		let received = capture(&graph);

		graph.send_update().unwrap();

		assert_eq!(received().nodes, s.nodes());
		assert_eq!(received().links, s.links());
		assert_eq!(received().link_strength_extent, Some(Extent { min: 1.0, max: 3.0 }));
	}

	#[test]
	fn empty_graph_has_no_extent() {
		let graph = Graph::new(Vec::new(), Vec::new());
		let received = capture(&graph);

		graph.send_update().unwrap();

		assert_eq!(received(), GraphUpdate::default());
	}

	#[test]
	fn extent_follows_replaced_links() {
		let s = sample();
		let graph = Graph::new(s.nodes(), s.links());
		let received = capture(&graph);

		graph.set_data(s.nodes(), vec![s.bc.clone()]);
		graph.send_update().unwrap();

		assert_eq!(received().link_strength_extent, Some(Extent { min: 2.0, max: 2.0 }));
	}
}
