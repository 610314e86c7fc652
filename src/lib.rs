//! Reactive chart pipelines and graph chains, plus the Leptos demo app that
//! renders them.
//!
//! [`data`] turns time-keyed tables into chart-ready updates through a chain of
//! decorators, [`graph`] does the same for node/link graphs. Both are built on
//! [`Observable`] and the [`Stage`] seam.

use leptos::prelude::*;
use leptos_meta::*;
use leptos_router::components::*;
use leptos_router::path;
use log::{Level, info};

// Modules
mod components;
pub mod data;
mod error;
pub mod graph;
mod observable;
mod pages;
mod quick_find;
mod stage;

pub use error::{ChartError, Result};
pub use observable::{Observable, Subscriber, subscriber};
pub use quick_find::QuickFind;
pub use stage::{Decorated, Stage, Transform};

// Top-Level pages
use crate::pages::home::Home;
use crate::pages::not_found::NotFound;

/// Initialize logging and panic hooks for the WASM target.
pub fn init_logging() {
	let _ = console_log::init_with_level(Level::Debug);
	console_error_panic_hook::set_once();
	info!("Logging initialized");
}

/// An app router which renders the homepage and handles 404's
#[component]
pub fn App() -> impl IntoView {
	// Provides context that manages stylesheets, titles, meta tags, etc.
	provide_meta_context();

	view! {
		<Html attr:lang="en" attr:dir="ltr" attr:data-theme="light" />

		// sets the document title
		<Title text="Reactive Charts" />

		// injects metadata in the <head> of the page
		<Meta charset="UTF-8" />
		<Meta name="viewport" content="width=device-width, initial-scale=1.0" />

		<Router>
			<Routes fallback=|| view! { <NotFound /> }>
				<Route path=path!("/") view=Home />
			</Routes>
		</Router>
	}
}
