//! skill-tree: Interactive skill tree for tracking completed skills.
//!
//! This crate provides a WASM-based skill tree component: a fixed-layout
//! dependency graph where a skill can be completed once a prerequisite is, and
//! reverted while nothing completed depends on it alone.

use leptos::prelude::*;
use leptos_meta::*;
use log::{Level, info, warn};
use thiserror::Error;
use wasm_bindgen::JsCast;
use web_sys::{Document, HtmlScriptElement};

pub mod components;

pub use components::skill_tree::{
	ActivityLevel, CompletionStatus, GraphData, GraphError, LinkInfo, NodeId, NodeInfo,
	NodeLookup, SkillGraph, SkillTreeCanvas, Theme, VisualState,
};

/// Element holding the graph JSON: `{ nodes: [...], links: [...] }`.
const DATA_ELEMENT_ID: &str = "skill-tree-data";
/// Element holding optional theme overrides.
const STYLE_ELEMENT_ID: &str = "skill-tree-style";

/// Why the page's skill tree could not be loaded.
#[derive(Error, Debug)]
pub enum LoadError {
	/// The data element does not hold valid graph JSON.
	#[error("invalid skill tree JSON: {0}")]
	Json(#[from] serde_json::Error),
	/// The graph JSON describes an inconsistent graph.
	#[error("invalid skill tree: {0}")]
	Graph(#[from] GraphError),
}

/// Initialize logging and panic hooks for the WASM target.
pub fn init_logging() {
	let _ = console_log::init_with_level(Level::Debug);
	console_error_panic_hook::set_once();
	info!("skill-tree: logging initialized");
}

/// Text of a script element, if the page has one with this id.
fn script_text(id: &str) -> Option<String> {
	let document: Document = web_sys::window()?.document()?;
	let script: HtmlScriptElement = document.get_element_by_id(id)?.dyn_into().ok()?;
	script.text().ok()
}

/// Parses and builds a skill graph from its JSON description.
pub fn parse_graph(json: &str) -> Result<SkillGraph, LoadError> {
	let data: GraphData = serde_json::from_str(json)?;
	let graph = SkillGraph::build(&data)?;
	info!(
		"skill-tree: loaded {} nodes, {} links",
		graph.node_count(),
		graph.edge_count()
	);
	Ok(graph)
}

/// Loads the skill graph from the page, or the demo tree when the page
/// provides none.
fn load_graph() -> Result<SkillGraph, LoadError> {
	match script_text(DATA_ELEMENT_ID) {
		Some(json) => parse_graph(&json),
		None => {
			info!("skill-tree: no #{} element, showing demo tree", DATA_ELEMENT_ID);
			Ok(SkillGraph::build(&GraphData::demo())?)
		}
	}
}

/// Loads the theme, applying page overrides on top of the defaults.
fn load_theme() -> Theme {
	let Some(json) = script_text(STYLE_ELEMENT_ID) else {
		return Theme::default();
	};
	Theme::with_overrides(&json).unwrap_or_else(|e| {
		warn!("skill-tree: ignoring invalid theme overrides: {}", e);
		Theme::default()
	})
}

/// Main application component.
/// Loads the skill tree from DOM and renders it fullscreen.
#[component]
pub fn App() -> impl IntoView {
	provide_meta_context();

	let (graph, error) = match load_graph() {
		Ok(graph) => (graph, None),
		Err(e) => {
			warn!("skill-tree: {}", e);
			(SkillGraph::default(), Some(e.to_string()))
		}
	};
	let graph_signal = Signal::derive(move || graph.clone());

	view! {
		<Html attr:lang="en" attr:dir="ltr" attr:data-theme="dark" />
		<Title text="Skill Tree" />
		<Meta charset="UTF-8" />
		<Meta name="viewport" content="width=device-width, initial-scale=1.0" />

		<div class="fullscreen-skill-tree">
			<SkillTreeCanvas graph=graph_signal fullscreen=true theme=load_theme() />
			<div class="skill-tree-overlay">
				<h1>"Skill Tree"</h1>
				<p class="subtitle">"Click a skill for details. Scroll to zoom. Drag background to pan."</p>
				{error.map(|message| view! { <p class="skill-tree-error">{message}</p> })}
			</div>
		</div>
	}
}
