//! Skill tree visualization component.
//!
//! Renders an interactive skill tree on an HTML canvas with:
//! - Completion rules: a skill unlocks once a prerequisite is completed, and
//!   can be reverted only while no completed dependent relies on it alone
//! - Edge glows derived from the completion of both endpoints
//! - Hover and selection states with smooth radius transitions
//! - Pan and zoom, and a details panel for completing or reverting a skill
//!
//! # Example
//!
//! ```ignore
//! use skill_tree::{GraphData, LinkInfo, NodeId, NodeInfo, SkillGraph, SkillTreeCanvas};
//!
//! let data = GraphData {
//!     nodes: vec![
//!         NodeInfo { id: NodeId(1), x: 100.0, y: 100.0, label: "Basics".into(), .. },
//!         NodeInfo { id: NodeId(2), x: 200.0, y: 200.0, label: "Practice".into(), .. },
//!     ],
//!     links: vec![LinkInfo { source_id: NodeId(1), target_id: NodeId(2) }],
//! };
//! let graph = SkillGraph::build(&data)?;
//!
//! view! { <SkillTreeCanvas graph=graph fullscreen=true /> }
//! ```

pub mod adapter;
mod component;
pub mod edge;
pub mod error;
pub mod graph;
pub mod node;
mod render;
pub mod state;
pub mod theme;
mod types;

pub use adapter::{Feedback, InteractionAdapter, NodeDetails, PointerEvent, Surface};
pub use component::SkillTreeCanvas;
pub use edge::{ActivityLevel, Edge};
pub use error::{GraphError, Result};
pub use graph::SkillGraph;
pub use node::{CompletionStatus, NodeHandle, NodeId, NodeLookup, SkillNode, VisualState};
pub use state::SkillTreeState;
pub use theme::Theme;
pub use types::{GraphData, LinkInfo, NodeInfo};
