use leptos::prelude::*;
use log::warn;
use web_sys::{Event, MouseEvent};

use crate::components::force_graph::{ForceGraphCanvas, GraphData, NodeHandler};
use crate::error::Result;
use crate::graph::{
	Graph, GraphStageExt, Link, Node, NodeRef, WithLinkStrengthFilter, WithNodeSelection,
	WithRemovedNodes,
};
use crate::stage::Stage;

type DemoGraph = WithNodeSelection<WithRemovedNodes<WithLinkStrengthFilter<Graph>>>;

/// Sample forest: every node links to an earlier one, except every seventh,
/// which starts a new cluster.
fn generate_sample_graph(n: usize) -> (Vec<NodeRef>, Vec<Link>) {
	let nodes: Vec<NodeRef> = (0..n)
		.map(|i| Node::new(i, format!("Node {i}"), format!("group{}", i % 10)))
		.collect();
	let links = nodes
		.iter()
		.enumerate()
		.skip(1)
		.filter(|(i, _)| i % 7 != 0)
		.map(|(i, node)| {
			let target = (rand_simple(i) * (i as f64)) as usize;
			let strength = 1.0 + (rand_simple(i * 31) * 9.0).floor();
			Link::new(node, &nodes[target], strength)
		})
		.collect();
	(nodes, links)
}

/// Simple pseudo-random number generator (deterministic for consistency).
fn rand_simple(seed: usize) -> f64 {
	let x = ((seed + 1) * 9301 + 49297) % 233280;
	(x as f64) / 233280.0
}

fn report(action: &str, result: Result<()>) {
	if let Err(err) = result {
		warn!("{action} failed: {err}");
	}
}

type Local<T> = StoredValue<T, LocalStorage>;

fn demo_graph(nodes: &[NodeRef], links: Vec<Link>) -> DemoGraph {
	Graph::new(nodes.to_vec(), links)
		.with_link_strength_filter()
		.with_removed_nodes()
		.with_node_cluster_selection()
}

/// Node click handler running `action` on the clicked node.
fn node_handler(
	nodes: Local<Vec<NodeRef>>,
	graph: Local<DemoGraph>,
	action: fn(&DemoGraph, &NodeRef) -> Result<()>,
	name: &'static str,
) -> NodeHandler {
	Callback::new(move |id: usize| {
		let node = nodes.with_value(|nodes| nodes.iter().find(|node| node.index == id).cloned());
		if let Some(node) = node {
			report(name, graph.with_value(|graph| action(graph, &node)));
		}
	})
}

/// Default Home Page
#[component]
pub fn Home() -> impl IntoView {
	let (nodes, links) = generate_sample_graph(100);
	let graph = demo_graph(&nodes, links);

	let graph_data = RwSignal::new(GraphData::default());
	graph.on_update(move |update| graph_data.set(GraphData::from(update)));
	report("initial update", graph.send_update());

	// the chain is single-threaded; these handles are what the view captures
	let graph = StoredValue::new_local(graph);
	let nodes = StoredValue::new_local(nodes);

	let on_node_click = node_handler(nodes, graph, |graph, node| graph.select_related_nodes(node), "selection");
	let on_node_dblclick = node_handler(
		nodes,
		graph,
		|graph, node| graph.upstream().remove_nodes_in_cluster_with(node),
		"cluster removal",
	);

	let on_undo = move |_: MouseEvent| {
		report("undo", graph.with_value(|graph| graph.upstream().undo_node_removal()))
	};
	let on_clear = move |_: MouseEvent| {
		report("clear selection", graph.with_value(|graph| graph.clear_selection()))
	};
	let on_strength = move |ev: Event| match event_target_value(&ev).parse::<f64>() {
		Ok(min) => report(
			"link strength filter",
			graph.with_value(|graph| graph.upstream().upstream().set_min_link_strength(min)),
		),
		Err(err) => warn!("bad link strength: {err}"),
	};

	let strength_max = move || {
		graph_data.with(|data| data.link_strength_extent.map_or(10.0, |extent| extent.max).to_string())
	};
	let strength_value = move || {
		graph_data.with(|data| {
			data.min_link_strength
				.filter(|min| min.is_finite())
				.map_or_else(String::new, |min| min.to_string())
		})
	};
	let visible = move || {
		graph_data.with(|data| format!("{} nodes, {} links", data.nodes.len(), data.links.len()))
	};

	view! {
		<ErrorBoundary fallback=|errors| {
			view! {
				<h1>"Uh oh! Something went wrong!"</h1>

				<p>"Errors: "</p>
				<ul>
					{move || {
						errors
							.get()
							.into_iter()
							.map(|(_, e)| view! { <li>{e.to_string()}</li> })
							.collect_view()
					}}
				</ul>
			}
		}>

			<div class="fullscreen-graph">
				<ForceGraphCanvas
					data=graph_data
					fullscreen=true
					on_node_click=on_node_click
					on_node_dblclick=on_node_dblclick
				/>
				<div class="graph-overlay">
					<h1>"Force-Directed Graph"</h1>
					<p class="subtitle">
						"Click a node to select its cluster. Double-click to remove it. Drag nodes to reposition."
					</p>
					<p class="subtitle">{visible}</p>
					<label>
						"Min link strength "
						<input type="range" min="0" step="1" prop:max=strength_max on:input=on_strength />
						{strength_value}
					</label>
					<button on:click=on_undo>"Undo removal"</button>
					<button on:click=on_clear>"Clear selection"</button>
				</div>
			</div>
		</ErrorBoundary>
	}
}
