use std::cell::RefCell;
use std::rc::Rc;

use reactive_charts::graph::{Graph, GraphStageExt, GraphUpdate, Link, Node, NodeRef};
use reactive_charts::{ChartError, QuickFind, Stage};

fn capture(stage: &impl Stage<Update = GraphUpdate>) -> impl Fn() -> GraphUpdate {
	let received = Rc::new(RefCell::new(None));
	let sink = received.clone();
	stage.on_update(move |update: &GraphUpdate| *sink.borrow_mut() = Some(update.clone()));
	move || received.borrow().clone().expect("no update received")
}

fn names(nodes: &[NodeRef]) -> Vec<&str> {
	nodes.iter().map(|node| node.name.as_str()).collect()
}

#[test]
fn quick_find_connectivity() {
	let mut points = QuickFind::new(10);
	points.connect(1, 2).unwrap();
	points.connect(2, 3).unwrap();
	points.connect(4, 5).unwrap();

	assert!(points.are_connected(1, 3).unwrap());
	assert!(!points.are_connected(1, 4).unwrap());
	assert_eq!(points.component_size(5).unwrap(), 2);
	assert_eq!(points.connect(0, 1), Err(ChartError::LabelOutOfRange { label: 0, size: 10 }));
	assert_eq!(points.are_connected(1, 11), Err(ChartError::LabelOutOfRange { label: 11, size: 10 }));
}

#[test]
fn triangle_is_one_cluster() {
	let (a, b, c) = (Node::new(0, "A", "g"), Node::new(1, "B", "g"), Node::new(2, "C", "g"));
	let links = vec![Link::new(&a, &b, 1.0), Link::new(&b, &c, 2.0), Link::new(&c, &a, 3.0)];
	let graph = Graph::new(vec![a.clone(), b.clone(), c.clone()], links).with_node_cluster_selection();
	let received = capture(&graph);

	graph.send_update().unwrap();
	graph.select_related_nodes(&a).unwrap();

	assert_eq!(names(&received().selected_nodes), ["A", "B", "C"]);
}

#[test]
fn selection_drops_nodes_removed_underneath() {
	let (a, b, c) = (Node::new(0, "A", "g"), Node::new(1, "B", "g"), Node::new(2, "C", "g"));
	let links = vec![Link::new(&a, &b, 1.0), Link::new(&b, &c, 1.0)];
	let graph = Graph::new(vec![a.clone(), b.clone(), c.clone()], links)
		.with_removed_nodes()
		.with_node_cluster_selection();
	let received = capture(&graph);

	graph.send_update().unwrap();
	graph.select_related_nodes(&a).unwrap();
	assert_eq!(names(&received().selected_nodes), ["A", "B", "C"]);

	graph.upstream().remove_node(&b).unwrap();
	assert!(!received().is_selection_update);
	assert_eq!(names(&received().selected_nodes), ["A"]);
	assert!(!b.is_selected());
	assert!(!c.is_selected());

	graph.upstream().remove_node(&a).unwrap();
	assert!(received().selected_nodes.is_empty());
	assert!(!a.is_selected());

	graph.upstream().undo_node_removal().unwrap();
	assert_eq!(names(&received().selected_nodes), ["A"]);
	assert!(a.is_selected());
}

#[test]
fn removal_outside_selection_hides_removed_nodes() {
	let (a, b, c) = (Node::new(0, "A", "g"), Node::new(1, "B", "g"), Node::new(2, "C", "g"));
	let links = vec![Link::new(&a, &b, 1.0), Link::new(&b, &c, 1.0)];
	let graph = Graph::new(vec![a.clone(), b.clone(), c.clone()], links)
		.with_node_cluster_selection()
		.with_removed_nodes();
	let received = capture(&graph);

	graph.send_update().unwrap();
	graph.upstream().select_related_nodes(&a).unwrap();
	graph.remove_node(&b).unwrap();

	let update = received();
	assert_eq!(names(&update.nodes), ["A", "C"]);
	assert_eq!(names(&update.selected_nodes), ["A", "C"]);
	assert!(!b.is_selected());
}

#[test]
fn default_strength_threshold_admits_negative_links() {
	let (a, b) = (Node::new(0, "A", "g"), Node::new(1, "B", "g"));
	let graph = Graph::new(vec![a.clone(), b.clone()], vec![Link::new(&a, &b, -5.0)])
		.with_link_strength_filter();
	let received = capture(&graph);

	graph.send_update().unwrap();

	assert_eq!(received().links.len(), 1);
}

#[test]
fn small_clusters_are_filtered_out() {
	let (a, b, c) = (Node::new(0, "A", "g"), Node::new(1, "B", "g"), Node::new(2, "C", "g"));
	let graph = Graph::new(vec![a.clone(), b.clone(), c.clone()], vec![Link::new(&a, &b, 1.0)])
		.with_min_node_cluster_size(3);
	let received = capture(&graph);

	graph.send_update().unwrap();

	assert!(received().nodes.is_empty());
	assert!(received().links.is_empty());
}

#[test]
fn weak_links_split_clusters() {
	let (a, b, c) = (Node::new(0, "A", "g"), Node::new(1, "B", "g"), Node::new(2, "C", "g"));
	let links = vec![Link::new(&a, &b, 1.0), Link::new(&b, &c, 5.0)];
	let graph = Graph::new(vec![a.clone(), b.clone(), c.clone()], links)
		.with_link_strength_filter()
		.with_node_cluster_size_filter();
	let received = capture(&graph);

	graph.send_update().unwrap();
	assert_eq!(names(&received().nodes), ["A", "B", "C"]);

	graph.upstream().set_min_link_strength(2.0).unwrap();
	assert_eq!(names(&received().nodes), ["B", "C"]);
	assert_eq!(received().min_link_strength, Some(2.0));
	assert_eq!(received().min_node_cluster_size, Some(2));
}
