use log::warn;

use super::layout::{LayoutConfig, Placement};
use super::viewport::ZoomConfig;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct MindMapConfig {
	pub layout: LayoutConfig,
	pub zoom: ZoomConfig,
	/// Whether the outline panel starts open.
	pub show_outline: bool,
}

impl MindMapConfig {
	/// Builds a config from URL query parameters.
	///
	/// Recognised keys: `layout` (`stacked` or `fan`), `min_zoom`, `max_zoom`
	/// and `outline`. Bad values are logged and replaced by defaults.
	pub fn from_query(get: impl Fn(&str) -> Option<String>) -> Self {
		let mut config = Self::default();

		if let Some(raw) = get("layout") {
			match raw.parse::<Placement>() {
				Ok(placement) => config.layout.placement = placement,
				Err(e) => warn!("{}, using {:?}", e, config.layout.placement),
			}
		}

		let bound = |key: &str, default: f64| match get(key) {
			None => default,
			Some(raw) => raw.trim().parse::<f64>().unwrap_or_else(|e| {
				warn!("Ignoring {}={:?}: {}", key, raw, e);
				default
			}),
		};
		let (min, max) = (
			bound("min_zoom", config.zoom.min_scale),
			bound("max_zoom", config.zoom.max_scale),
		);
		match config.zoom.clone().with_bounds(min, max) {
			Ok(zoom) => config.zoom = zoom,
			Err(e) => warn!("{}, keeping defaults", e),
		}

		config.show_outline = get("outline")
			.map(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
			.unwrap_or(false);

		config
	}
}
