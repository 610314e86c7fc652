use std::cell::Cell;
use std::collections::HashSet;
use std::rc::Rc;

/// A graph node shared by every stage of one graph chain.
///
/// `index` is the node's identity. `selected` is written by selection stages
/// only, and every holder of the node sees the change.
#[derive(Debug, PartialEq)]
pub struct Node {
	/// Identity of the node.
	pub index: usize,
	/// Display name.
	pub name: String,
	/// Group name, used for colouring.
	pub group: String,
	selected: Cell<bool>,
}

/// Shared handle to a [`Node`].
pub type NodeRef = Rc<Node>;

impl Node {
	/// Unselected node.
	pub fn new(index: usize, name: impl Into<String>, group: impl Into<String>) -> NodeRef {
		Rc::new(Self {
			index,
			name: name.into(),
			group: group.into(),
			selected: Cell::new(false),
		})
	}

	/// Whether a selection stage currently selects the node.
	pub fn is_selected(&self) -> bool {
		self.selected.get()
	}

	pub(crate) fn set_selected(&self, selected: bool) {
		self.selected.set(selected);
	}
}

/// Undirected weighted link between two shared nodes.
#[derive(Clone, Debug, PartialEq)]
pub struct Link {
	/// One end.
	pub source: NodeRef,
	/// The other end.
	pub target: NodeRef,
	/// Link strength.
	pub value: f64,
}

impl Link {
	/// Link of strength `value`.
	pub fn new(source: &NodeRef, target: &NodeRef, value: f64) -> Self {
		Self {
			source: source.clone(),
			target: target.clone(),
			value,
		}
	}

	/// Whether the node `index` is one of the ends.
	pub fn touches(&self, index: usize) -> bool {
		self.source.index == index || self.target.index == index
	}

	/// The endpoint opposite to `index`, if the link touches it.
	pub fn other_end(&self, index: usize) -> Option<&NodeRef> {
		if self.source.index == index {
			Some(&self.target)
		} else if self.target.index == index {
			Some(&self.source)
		} else {
			None
		}
	}
}

/// Closed range of values.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Extent {
	/// Lower bound.
	pub min: f64,
	/// Upper bound.
	pub max: f64,
}

impl Extent {
	/// Smallest and largest of `values`, `None` when there are none.
	pub fn of(values: impl IntoIterator<Item = f64>) -> Option<Self> {
		values.into_iter().fold(None, |extent, value| {
			Some(match extent {
				None => Extent { min: value, max: value },
				Some(Extent { min, max }) => Extent {
					min: min.min(value),
					max: max.max(value),
				},
			})
		})
	}
}

/// Payload broadcast by every graph stage.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct GraphUpdate {
	/// Nodes shown.
	pub nodes: Vec<NodeRef>,
	/// Links between shown nodes.
	pub links: Vec<Link>,
	/// Strength range of the source's links.
	pub link_strength_extent: Option<Extent>,
	/// Set when the update was caused by a selection change.
	pub is_selection_update: bool,
	/// Selected nodes, all of them shown.
	pub selected_nodes: Vec<NodeRef>,
	/// Threshold of a cluster-size filter, if any.
	pub min_node_cluster_size: Option<usize>,
	/// Threshold of a link-strength filter, if any.
	pub min_link_strength: Option<f64>,
}

impl GraphUpdate {
	/// Source payload; the strength extent is computed from `links`.
	pub fn new(nodes: Vec<NodeRef>, links: Vec<Link>) -> Self {
		let link_strength_extent = Extent::of(links.iter().map(|link| link.value));
		Self {
			nodes,
			links,
			link_strength_extent,
			..Self::default()
		}
	}

	/// Whether `node` is shown.
	pub fn contains(&self, node: &Node) -> bool {
		self.nodes.iter().any(|candidate| candidate.index == node.index)
	}

	/// Narrows `selected_nodes` to the nodes still present after a stage
	/// dropped some, and syncs their flags to match.
	pub(crate) fn retain_shown_selection(&mut self) {
		if self.selected_nodes.is_empty() {
			return;
		}
		let shown: HashSet<usize> = self.nodes.iter().map(|node| node.index).collect();
		self.selected_nodes.retain(|node| {
			let kept = shown.contains(&node.index);
			node.set_selected(kept);
			kept
		});
	}
}
