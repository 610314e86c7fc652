//! Canvas renderer for graph broadcasts, driven by the `force_graph` simulation.

mod component;
mod render;
mod state;
mod types;

pub use component::{ForceGraphCanvas, NodeHandler};
pub use types::GraphData;
