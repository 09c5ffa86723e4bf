use super::types::MindMapError;

pub const MIN_SCALE: f64 = 0.1;
pub const MAX_SCALE: f64 = 2.0;
pub const ZOOM_SENSITIVITY: f64 = 0.001;

#[derive(Clone, Debug, PartialEq)]
pub struct ZoomConfig {
	pub min_scale: f64,
	pub max_scale: f64,
	/// Scale change per unit of wheel delta.
	pub sensitivity: f64,
}

impl Default for ZoomConfig {
	fn default() -> Self {
		Self {
			min_scale: MIN_SCALE,
			max_scale: MAX_SCALE,
			sensitivity: ZOOM_SENSITIVITY,
		}
	}
}

impl ZoomConfig {
	pub fn with_bounds(self, min_scale: f64, max_scale: f64) -> Result<Self, MindMapError> {
		if !(min_scale > 0.0 && min_scale <= max_scale && max_scale.is_finite()) {
			return Err(MindMapError::InvalidZoomBounds {
				min: min_scale,
				max: max_scale,
			});
		}
		Ok(Self {
			min_scale,
			max_scale,
			..self
		})
	}
}

/// Pan/zoom transform: `screen = world * scale + offset`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewportState {
	pub offset_x: f64,
	pub offset_y: f64,
	pub scale: f64,
}

impl Default for ViewportState {
	fn default() -> Self {
		Self {
			offset_x: 0.0,
			offset_y: 0.0,
			scale: 1.0,
		}
	}
}

impl ViewportState {
	pub fn screen_to_world(&self, sx: f64, sy: f64) -> (f64, f64) {
		(
			(sx - self.offset_x) / self.scale,
			(sy - self.offset_y) / self.scale,
		)
	}

	pub fn world_to_screen(&self, wx: f64, wy: f64) -> (f64, f64) {
		(
			wx * self.scale + self.offset_x,
			wy * self.scale + self.offset_y,
		)
	}
}

#[derive(Clone, Debug, Default)]
pub struct PanState {
	pub active: bool,
	pub start_x: f64,
	pub start_y: f64,
	pub offset_start_x: f64,
	pub offset_start_y: f64,
}

#[derive(Clone, Debug, Default)]
pub struct ViewportController {
	pub state: ViewportState,
	pub pan: PanState,
	pub zoom: ZoomConfig,
}

impl ViewportController {
	pub fn new(zoom: ZoomConfig) -> Self {
		Self {
			zoom,
			..Self::default()
		}
	}

	pub fn is_panning(&self) -> bool {
		self.pan.active
	}

	pub fn begin_pan(&mut self, sx: f64, sy: f64) {
		self.pan = PanState {
			active: true,
			start_x: sx,
			start_y: sy,
			offset_start_x: self.state.offset_x,
			offset_start_y: self.state.offset_y,
		};
	}

	/// Moves the view with the pointer. Returns false when no pan is active.
	pub fn pan_to(&mut self, sx: f64, sy: f64) -> bool {
		if !self.pan.active {
			return false;
		}
		self.state.offset_x = self.pan.offset_start_x + (sx - self.pan.start_x);
		self.state.offset_y = self.pan.offset_start_y + (sy - self.pan.start_y);
		true
	}

	pub fn end_pan(&mut self) {
		self.pan.active = false;
	}

	/// Applies one wheel step, keeping the world point under `(sx, sy)` fixed.
	pub fn wheel(&mut self, delta_y: f64, sx: f64, sy: f64) {
		let current = self.state.scale;
		let new_k = (current - delta_y * self.zoom.sensitivity)
			.clamp(self.zoom.min_scale, self.zoom.max_scale);
		if !new_k.is_finite() || new_k == current {
			return;
		}
		let ratio = new_k / current;
		self.state.offset_x = sx - (sx - self.state.offset_x) * ratio;
		self.state.offset_y = sy - (sy - self.state.offset_y) * ratio;
		self.state.scale = new_k;
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn pan_accumulates_pointer_delta() {
		let mut vp = ViewportController::default();
		assert!(!vp.pan_to(10.0, 10.0));

		vp.begin_pan(100.0, 100.0);
		assert!(vp.pan_to(130.0, 80.0));
		assert_eq!((vp.state.offset_x, vp.state.offset_y), (30.0, -20.0));
		vp.end_pan();

		vp.begin_pan(0.0, 0.0);
		vp.pan_to(5.0, 5.0);
		assert_eq!((vp.state.offset_x, vp.state.offset_y), (35.0, -15.0));
		vp.end_pan();
		assert!(!vp.is_panning());
	}

	#[test]
	fn wheel_scale_stays_clamped() {
		let mut vp = ViewportController::default();
		for delta in [-5000.0, 120.0, 9000.0, -0.5, -250.0, 1e9, -1e9, 3.0] {
			vp.wheel(delta, 400.0, 300.0);
			assert!(
				(MIN_SCALE..=MAX_SCALE).contains(&vp.state.scale),
				"scale {} escaped after delta {}",
				vp.state.scale,
				delta
			);
		}
	}

	#[test]
	fn wheel_zoom_is_inverse_scroll() {
		let mut vp = ViewportController::default();
		vp.wheel(-100.0, 0.0, 0.0);
		assert!((vp.state.scale - 1.1).abs() < 1e-9);
		vp.wheel(200.0, 0.0, 0.0);
		assert!((vp.state.scale - 0.9).abs() < 1e-9);
	}

	#[test]
	fn wheel_zoom_keeps_point_under_cursor() {
		let mut vp = ViewportController::default();
		vp.state.offset_x = 40.0;
		vp.state.offset_y = -25.0;
		let before = vp.state.screen_to_world(320.0, 240.0);
		vp.wheel(-300.0, 320.0, 240.0);
		let after = vp.state.screen_to_world(320.0, 240.0);
		assert!((before.0 - after.0).abs() < 1e-9);
		assert!((before.1 - after.1).abs() < 1e-9);
	}

	#[test]
	fn screen_world_conversions_are_inverse() {
		let state = ViewportState {
			offset_x: 12.0,
			offset_y: -7.0,
			scale: 0.5,
		};
		let (wx, wy) = state.screen_to_world(100.0, 50.0);
		assert_eq!((wx, wy), (176.0, 114.0));
		assert_eq!(state.world_to_screen(wx, wy), (100.0, 50.0));
	}

	#[test]
	fn rejects_inverted_zoom_bounds() {
		assert!(ZoomConfig::default().with_bounds(0.5, 3.0).is_ok());
		assert_eq!(
			ZoomConfig::default().with_bounds(2.0, 1.0),
			Err(MindMapError::InvalidZoomBounds { min: 2.0, max: 1.0 })
		);
		assert!(ZoomConfig::default().with_bounds(0.0, 1.0).is_err());
	}
}
