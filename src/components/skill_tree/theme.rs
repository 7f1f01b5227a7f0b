//! Visual theming for the skill tree.
//!
//! A [`Theme`] bundles one [`StatusProfile`] per completion status together with
//! edge, label and background styling. It is built once at startup, either from
//! the defaults or from a JSON document that overrides any subset of keys.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::edge::ActivityLevel;
use super::node::{CompletionStatus, VisualState};

/// RGBA color representation.
///
/// Serialized as a CSS color string so style documents can use `#rrggbb`,
/// `rgb(..)` or `rgba(..)` notation.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
	/// Red channel.
	pub r: u8,
	/// Green channel.
	pub g: u8,
	/// Blue channel.
	pub b: u8,
	/// Opacity, `0.0..=1.0`.
	pub a: f64,
}

impl Color {
	/// Opaque color.
	pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
		Self { r, g, b, a: 1.0 }
	}

	/// Color with opacity `a`.
	pub const fn rgba(r: u8, g: u8, b: u8, a: f64) -> Self {
		Self { r, g, b, a }
	}

	/// Same color with opacity `a`.
	pub fn with_alpha(self, a: f64) -> Self {
		Self { a, ..self }
	}

	/// Parses hex (`#RRGGBB`) and `rgb()`/`rgba()` functional notation.
	pub fn parse(color_str: &str) -> Option<Self> {
		let color_str = color_str.trim();
		if let Some(hex) = color_str.strip_prefix('#') {
			if hex.len() != 6 {
				return None;
			}
			let r = u8::from_str_radix(hex.get(0..2)?, 16).ok()?;
			let g = u8::from_str_radix(hex.get(2..4)?, 16).ok()?;
			let b = u8::from_str_radix(hex.get(4..6)?, 16).ok()?;
			Some(Color::rgb(r, g, b))
		} else if color_str.starts_with("rgb") {
			let nums: Vec<&str> = color_str
				.trim_start_matches("rgba(")
				.trim_start_matches("rgb(")
				.trim_end_matches(')')
				.split(',')
				.map(str::trim)
				.collect();
			if nums.len() != 3 && nums.len() != 4 {
				return None;
			}
			let r = nums[0].parse().ok()?;
			let g = nums[1].parse().ok()?;
			let b = nums[2].parse().ok()?;
			let a = match nums.get(3) {
				Some(a) => a.parse().ok()?,
				None => 1.0,
			};
			Some(Color::rgba(r, g, b, a))
		} else {
			None
		}
	}

	/// CSS notation, `rgb(..)` when opaque and `rgba(..)` otherwise.
	pub fn to_css(self) -> String {
		if (self.a - 1.0).abs() < 0.001 {
			format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
		} else {
			format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
		}
	}
}

impl TryFrom<String> for Color {
	type Error = String;

	fn try_from(value: String) -> Result<Self, Self::Error> {
		Color::parse(&value).ok_or_else(|| format!("invalid color: {value:?}"))
	}
}

impl From<Color> for String {
	fn from(color: Color) -> Self {
		color.to_css()
	}
}

/// A blurred drop shadow, used for node and edge glows.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Shadow {
	/// Shadow color.
	pub color: Color,
	/// Blur radius in pixels.
	pub blur: f64,
	/// Horizontal offset in pixels.
	pub offset_x: f64,
	/// Vertical offset in pixels.
	pub offset_y: f64,
}

impl Shadow {
	/// Unshifted shadow, used as a glow.
	pub const fn glow(color: Color, blur: f64) -> Self {
		Self {
			color,
			blur,
			offset_x: 0.0,
			offset_y: 0.0,
		}
	}
}

/// Node styling for one completion status, across all visual states.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusProfile {
	/// Radius while idle.
	pub idle_size: f64,
	/// Radius while hovered or active.
	pub active_size: f64,
	/// Inner fill.
	pub fill_color: Color,
	/// Outline color while idle.
	pub idle_stroke: Color,
	/// Stroke color while hovered or active.
	pub active_stroke: Color,
	/// Outline width while idle.
	pub idle_stroke_width: f64,
	/// Outline width while hovered.
	pub hover_stroke_width: f64,
	/// Outline width while active.
	pub active_stroke_width: f64,
	/// Shadow while idle or hovered.
	pub idle_shadow: Shadow,
	/// Glow while active.
	pub active_shadow: Shadow,
}

/// Concrete drawing parameters for a node in a given visual state.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NodeLook {
	/// Radius in graph units.
	pub radius: f64,
	/// Inner fill.
	pub fill: Color,
	/// Outline color.
	pub stroke: Color,
	/// Outline width.
	pub stroke_width: f64,
	/// Glow around the node.
	pub shadow: Shadow,
}

impl StatusProfile {
	/// Magenta profile for nodes that are not yet completed.
	pub fn uncompleted() -> Self {
		let stroke = Color::rgb(245, 90, 245);
		Self {
			idle_size: 30.0,
			active_size: 39.0,
			fill_color: Color::rgb(30, 30, 30),
			idle_stroke: stroke,
			active_stroke: stroke,
			idle_stroke_width: 3.0,
			hover_stroke_width: 0.975,
			active_stroke_width: 0.975,
			idle_shadow: Shadow::glow(Color::rgba(15, 15, 15, 0.9), 10.0),
			active_shadow: Shadow::glow(Color::rgb(255, 100, 255), 18.0),
		}
	}

	/// Green profile for completed nodes. Completed nodes glow in every state.
	pub fn completed() -> Self {
		let stroke = Color::rgb(57, 255, 20);
		let glow = Shadow::glow(stroke, 18.0);
		Self {
			idle_size: 30.0,
			active_size: 39.0,
			fill_color: Color::rgb(30, 30, 30),
			idle_stroke: stroke,
			active_stroke: stroke,
			idle_stroke_width: 3.0,
			hover_stroke_width: 3.0,
			active_stroke_width: 0.975,
			idle_shadow: glow,
			active_shadow: glow,
		}
	}

	/// Resolves this profile for one visual state.
	pub fn look(&self, visual: VisualState) -> NodeLook {
		let (radius, stroke, stroke_width, shadow) = match visual {
			VisualState::Idle => (
				self.idle_size,
				self.idle_stroke,
				self.idle_stroke_width,
				self.idle_shadow,
			),
			VisualState::Hover => (
				self.active_size,
				self.active_stroke,
				self.hover_stroke_width,
				self.idle_shadow,
			),
			VisualState::Active => (
				self.active_size,
				self.active_stroke,
				self.active_stroke_width,
				self.active_shadow,
			),
		};
		NodeLook {
			radius,
			fill: self.fill_color,
			stroke,
			stroke_width,
			shadow,
		}
	}
}

/// Edge visual style. The shadow encodes the edge's activity level.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EdgeStyle {
	/// Line color.
	pub color: Color,
	/// Line width.
	pub width: f64,
	/// Glow when the source is not completed.
	pub inactive_shadow: Shadow,
	/// Glow when only the source is completed.
	pub semi_active_shadow: Shadow,
	/// Glow when both endpoints are completed.
	pub active_shadow: Shadow,
}

impl EdgeStyle {
	/// Glow for an edge at `activity`.
	pub fn shadow(&self, activity: ActivityLevel) -> Shadow {
		match activity {
			ActivityLevel::Inactive => self.inactive_shadow,
			ActivityLevel::SemiActive => self.semi_active_shadow,
			ActivityLevel::Active => self.active_shadow,
		}
	}
}

/// Node label style.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LabelStyle {
	/// CSS font family.
	pub font_family: String,
	/// Font size in pixels.
	pub font_size: f64,
	/// Text color.
	pub fill: Color,
	/// Text shadow for uncompleted nodes.
	pub uncompleted_shadow: Shadow,
	/// Text shadow for completed nodes.
	pub completed_shadow: Shadow,
}

impl LabelStyle {
	/// CSS font shorthand.
	pub fn font(&self) -> String {
		format!("{}px {}", self.font_size, self.font_family)
	}

	/// Text shadow for a node with `status`.
	pub fn shadow(&self, status: CompletionStatus) -> Shadow {
		match status {
			CompletionStatus::Completed => self.completed_shadow,
			CompletionStatus::Uncompleted => self.uncompleted_shadow,
		}
	}
}

/// Complete visual theme.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Theme {
	/// Canvas background.
	pub background: Color,
	/// Style of completed nodes.
	pub completed: StatusProfile,
	/// Style of uncompleted nodes.
	pub uncompleted: StatusProfile,
	/// Edge style.
	pub edge: EdgeStyle,
	/// Label style.
	pub label: LabelStyle,
}

impl Theme {
	/// Neon theme: magenta for open skills, green for completed ones (default).
	pub fn neon() -> Self {
		Self {
			background: Color::rgb(40, 40, 40),
			completed: StatusProfile::completed(),
			uncompleted: StatusProfile::uncompleted(),
			edge: EdgeStyle {
				color: Color::rgb(255, 255, 255),
				width: 2.0,
				inactive_shadow: Shadow::glow(Color::rgba(255, 100, 255, 0.7), 12.0),
				semi_active_shadow: Shadow::glow(Color::rgba(255, 211, 25, 0.7), 12.0),
				active_shadow: Shadow::glow(Color::rgba(57, 255, 20, 0.65), 12.0),
			},
			label: LabelStyle {
				font_family: "Comic Sans MS, sans-serif".to_string(),
				font_size: 22.0,
				fill: Color::rgb(220, 220, 220),
				uncompleted_shadow: Shadow {
					color: Color::rgba(255, 100, 255, 0.9),
					blur: 2.0,
					offset_x: 2.0,
					offset_y: 2.0,
				},
				completed_shadow: Shadow {
					color: Color::rgba(57, 255, 20, 0.9),
					blur: 2.0,
					offset_x: 2.0,
					offset_y: 2.0,
				},
			},
		}
	}

	/// Builds a theme from a JSON document overriding any subset of the
	/// default keys. Objects are merged recursively; everything else replaces.
	pub fn with_overrides(json: &str) -> serde_json::Result<Self> {
		let overrides: Value = serde_json::from_str(json)?;
		let mut base = serde_json::to_value(Theme::default())?;
		merge(&mut base, overrides);
		serde_json::from_value(base)
	}

	/// Node style for `status`.
	pub fn profile(&self, status: CompletionStatus) -> &StatusProfile {
		match status {
			CompletionStatus::Completed => &self.completed,
			CompletionStatus::Uncompleted => &self.uncompleted,
		}
	}
}

impl Default for Theme {
	fn default() -> Self {
		Self::neon()
	}
}

fn merge(base: &mut Value, overrides: Value) {
	match (base, overrides) {
		(Value::Object(base), Value::Object(overrides)) => {
			for (key, value) in overrides {
				match base.get_mut(&key) {
					Some(slot) => merge(slot, value),
					None => {
						base.insert(key, value);
					}
				}
			}
		}
		(slot, value) => *slot = value,
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn parses_css_colors() {
		assert_eq!(Color::parse("#39ff14"), Some(Color::rgb(57, 255, 20)));
		assert_eq!(Color::parse("rgb(30, 30, 30)"), Some(Color::rgb(30, 30, 30)));
		assert_eq!(
			Color::parse("rgba(255, 100, 255, 0.7)"),
			Some(Color::rgba(255, 100, 255, 0.7))
		);
		assert_eq!(Color::parse("magenta"), None);
		assert_eq!(Color::parse("#fff"), None);
		assert_eq!(Color::parse("rgb(1, 2)"), None);
	}

	#[test]
	fn css_output_drops_opaque_alpha() {
		assert_eq!(Color::rgb(57, 255, 20).to_css(), "#39ff14");
		assert_eq!(
			Color::rgb(57, 255, 20).with_alpha(0.5).to_css(),
			"rgba(57, 255, 20, 0.5)"
		);
	}

	#[test]
	fn uncompleted_look_follows_visual_state() {
		let profile = StatusProfile::uncompleted();

		let idle = profile.look(VisualState::Idle);
		assert_eq!(idle.radius, 30.0);
		assert_eq!(idle.stroke_width, 3.0);
		assert_eq!(idle.shadow, profile.idle_shadow);

		let hover = profile.look(VisualState::Hover);
		assert_eq!(hover.radius, 39.0);
		assert_eq!(hover.stroke_width, profile.hover_stroke_width);
		assert_eq!(hover.stroke, profile.active_stroke);
		assert_eq!(hover.shadow, profile.idle_shadow);

		let active = profile.look(VisualState::Active);
		assert_eq!(active.radius, 39.0);
		assert_eq!(active.stroke_width, profile.active_stroke_width);
		assert_eq!(active.shadow, profile.active_shadow);
	}

	#[test]
	fn completed_profile_glows_in_every_state() {
		let profile = StatusProfile::completed();
		for visual in [VisualState::Idle, VisualState::Hover, VisualState::Active] {
			assert_eq!(profile.look(visual).shadow.color, Color::rgb(57, 255, 20));
		}
	}

	#[test]
	fn overrides_keep_unmentioned_defaults() {
		let theme = Theme::with_overrides(
			r##"{
				"background": "#101010",
				"completed": { "idleSize": 24, "idleShadow": { "blur": 4 } }
			}"##,
		)
		.unwrap();

		assert_eq!(theme.background, Color::rgb(16, 16, 16));
		assert_eq!(theme.completed.idle_size, 24.0);
		assert_eq!(theme.completed.idle_shadow.blur, 4.0);
		assert_eq!(
			theme.completed.idle_shadow.color,
			StatusProfile::completed().idle_shadow.color
		);
		assert_eq!(theme.completed.active_size, 39.0);
		assert_eq!(theme.uncompleted, StatusProfile::uncompleted());
		assert_eq!(theme.edge, Theme::neon().edge);
	}

	#[test]
	fn overrides_reject_bad_colors() {
		assert!(Theme::with_overrides(r#"{ "background": "not-a-color" }"#).is_err());
		assert!(Theme::with_overrides("[1, 2]").is_err());
	}

	#[test]
	fn label_shadow_tracks_status() {
		let label = Theme::neon().label;
		assert_eq!(label.shadow(CompletionStatus::Completed), label.completed_shadow);
		assert_eq!(
			label.shadow(CompletionStatus::Uncompleted),
			label.uncompleted_shadow
		);
		assert_eq!(label.font(), "22px Comic Sans MS, sans-serif");
	}

	#[test]
	fn edge_glow_tracks_activity() {
		let edge = Theme::neon().edge;
		assert_eq!(edge.shadow(ActivityLevel::Inactive).color, Color::rgba(255, 100, 255, 0.7));
		assert_eq!(edge.shadow(ActivityLevel::SemiActive), edge.semi_active_shadow);
		assert_eq!(edge.shadow(ActivityLevel::Active).color, Color::rgba(57, 255, 20, 0.65));
	}
}
