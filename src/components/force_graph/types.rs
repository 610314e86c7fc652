use crate::graph::{Extent, GraphUpdate};

/// Plain snapshot of a graph broadcast, cheap to keep in a signal.
#[derive(Clone, Debug, PartialEq)]
pub struct GraphNode {
	pub id: usize,
	pub label: String,
	pub group: String,
	pub selected: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct GraphLink {
	pub source: usize,
	pub target: usize,
	pub value: f64,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct GraphData {
	pub nodes: Vec<GraphNode>,
	pub links: Vec<GraphLink>,
	pub link_strength_extent: Option<Extent>,
	pub min_link_strength: Option<f64>,
}

impl From<&GraphUpdate> for GraphData {
	fn from(update: &GraphUpdate) -> Self {
		Self {
			nodes: update
				.nodes
				.iter()
				.map(|node| GraphNode {
					id: node.index,
					label: node.name.clone(),
					group: node.group.clone(),
					selected: node.is_selected(),
				})
				.collect(),
			links: update
				.links
				.iter()
				.map(|link| GraphLink {
					source: link.source.index,
					target: link.target.index,
					value: link.value,
				})
				.collect(),
			link_strength_extent: update.link_strength_extent,
			min_link_strength: update.min_link_strength,
		}
	}
}
