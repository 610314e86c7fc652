//! Connected components of a graph snapshot, on top of [`QuickFind`].

use std::collections::HashMap;

use super::types::{Link, Node, NodeRef};
use crate::quick_find::QuickFind;

/// Connectivity of one `(nodes, links)` snapshot.
///
/// Links whose endpoints are not among `nodes` are ignored.
#[derive(Debug)]
pub struct Clusters {
	// node index -> 1-based quick-find label
	labels: HashMap<usize, usize>,
	quick_find: QuickFind,
}

impl Clusters {
	/// Connected components of the graph.
	pub fn of(nodes: &[NodeRef], links: &[Link]) -> Self {
		let labels: HashMap<usize, usize> = nodes
			.iter()
			.enumerate()
			.map(|(position, node)| (node.index, position + 1))
			.collect();
		let mut quick_find = QuickFind::new(nodes.len());
		for link in links {
			if let (Some(&a), Some(&b)) = (labels.get(&link.source.index), labels.get(&link.target.index)) {
				// labels are 1..=nodes.len() by construction
				let _ = quick_find.connect(a, b);
			}
		}
		Self { labels, quick_find }
	}

	fn component(&self, node: &Node) -> Option<usize> {
		let label = *self.labels.get(&node.index)?;
		self.quick_find.component_of(label).ok()
	}

	/// Whether `a` and `b` are in one cluster.
	pub fn are_connected(&self, a: &Node, b: &Node) -> bool {
		match (self.component(a), self.component(b)) {
			(Some(a), Some(b)) => a == b,
			_ => false,
		}
	}

	/// Nodes of `nodes` sharing the cluster of `anchor`, in `nodes` order.
	pub fn members(&self, anchor: &Node, nodes: &[NodeRef]) -> Vec<NodeRef> {
		nodes
			.iter()
			.filter(|node| self.are_connected(anchor, node))
			.cloned()
			.collect()
	}

	/// Cluster size for every node of the snapshot, keyed by node index.
	pub fn sizes(&self) -> HashMap<usize, usize> {
		let mut per_component: HashMap<usize, usize> = HashMap::new();
		for &label in self.labels.values() {
			if let Ok(component) = self.quick_find.component_of(label) {
				*per_component.entry(component).or_default() += 1;
			}
		}
		self.labels
			.iter()
			.filter_map(|(&index, &label)| {
				let component = self.quick_find.component_of(label).ok()?;
				Some((index, per_component.get(&component).copied().unwrap_or(0)))
			})
			.collect()
	}
}
