//! Reactive node/link graphs: selection, removal with undo and filtering.
//!
//! Decorators see the output of the stage they wrap, so order matters:
//!
//! ```
//! use reactive_charts::graph::{Graph, GraphStageExt, Link, Node};
//! use reactive_charts::Stage;
//!
//! let (a, b, c) = (Node::new(0, "A", "g"), Node::new(1, "B", "g"), Node::new(2, "C", "g"));
//! let graph = Graph::new(vec![a.clone(), b.clone(), c.clone()], vec![Link::new(&a, &b, 1.0)])
//! 	.with_removed_nodes()
//! 	.with_node_cluster_selection();
//! graph.send_update().unwrap();
//! graph.select_related_nodes(&a).unwrap();
//! assert!(b.is_selected());
//! ```

mod clusters;
mod filter;
mod removal;
mod selection;
mod source;
mod types;

pub use clusters::Clusters;
pub use filter::{
	ClusterSizeFilter, DEFAULT_MIN_LINK_STRENGTH, DEFAULT_MIN_NODE_CLUSTER_SIZE, LinkStrengthFilter,
	WithClusterSizeFilter, WithLinkStrengthFilter,
};
pub use removal::{NodeRemoval, WithRemovedNodes};
pub use selection::{NodeSelection, SelectionPolicy, WithNodeSelection};
pub use source::Graph;
pub use types::{Extent, GraphUpdate, Link, Node, NodeRef};

use crate::stage::{Decorated, Stage};

/// Any stage of a graph chain.
pub trait GraphStage: Stage<Update = GraphUpdate> {}

impl<S: Stage<Update = GraphUpdate>> GraphStage for S {}

/// Chainable constructors for every graph decorator.
pub trait GraphStageExt: GraphStage + Sized {
	/// Clicking a node selects its whole cluster.
	fn with_node_cluster_selection(self) -> WithNodeSelection<Self> {
		Decorated::new(self, NodeSelection::new(SelectionPolicy::Cluster))
	}

	/// Clicking a node selects it and its direct neighbours.
	fn with_node_neighbors_selection(self) -> WithNodeSelection<Self> {
		Decorated::new(self, NodeSelection::new(SelectionPolicy::Neighbors))
	}

	/// Nodes can be removed, with one level of undo.
	fn with_removed_nodes(self) -> WithRemovedNodes<Self> {
		Decorated::new(self, NodeRemoval::default())
	}

	/// Cluster-size filter starting at [`DEFAULT_MIN_NODE_CLUSTER_SIZE`].
	fn with_node_cluster_size_filter(self) -> WithClusterSizeFilter<Self> {
		Decorated::new(self, ClusterSizeFilter::default())
	}

	/// Cluster-size filter starting at `min`.
	fn with_min_node_cluster_size(self, min: usize) -> WithClusterSizeFilter<Self> {
		Decorated::new(self, ClusterSizeFilter::new(min))
	}

	/// Link-strength filter starting at [`DEFAULT_MIN_LINK_STRENGTH`].
	fn with_link_strength_filter(self) -> WithLinkStrengthFilter<Self> {
		Decorated::new(self, LinkStrengthFilter::default())
	}
}

impl<S: GraphStage> GraphStageExt for S {}


#[cfg(test)]
mod tests {
	use super::test_support::{capture, sample};
	use super::{Graph, GraphStageExt};
	use crate::stage::Stage;

	#[test]
	fn chained_decorators_see_each_others_output() {
		let s = sample();
		let graph = Graph::new(s.nodes(), vec![s.ab.clone(), s.bc.clone()])
			.with_link_strength_filter()
			.with_removed_nodes()
			.with_node_cluster_selection();
		let received = capture(&graph);

		graph.send_update().unwrap();
		graph.upstream().remove_node(&s.b).unwrap();
		graph.select_related_nodes(&s.a).unwrap();

		assert_eq!(received().nodes, vec![s.a.clone(), s.c.clone()]);
		assert!(received().links.is_empty());
		assert!(s.a.is_selected());
		assert!(!s.b.is_selected());
		assert!(!s.c.is_selected());
	}
}
