use std::f64::consts::{PI, TAU};
use std::str::FromStr;

use super::types::MindMapError;

pub const ROOT_POSITION: (f64, f64) = (400.0, 300.0);
pub const HORIZONTAL_SPACING: f64 = 200.0;
pub const VERTICAL_SPACING: f64 = 100.0;
pub const FAN_RADIUS: f64 = 180.0;
pub const FAN_STEP: f64 = PI / 6.0;
pub const ROOT_SLOTS: usize = 6;

/// Strategy used to place a newly created node relative to its parent.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Placement {
	/// Fixed offsets: children one column to the right, stacked downwards.
	#[default]
	Stacked,
	/// Angular fan-out around the parent.
	Fan,
}

impl FromStr for Placement {
	type Err = MindMapError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s.trim().to_ascii_lowercase().as_str() {
			"stacked" | "fixed" => Ok(Placement::Stacked),
			"fan" | "radial" => Ok(Placement::Fan),
			other => Err(MindMapError::UnknownPlacement(other.to_string())),
		}
	}
}

#[derive(Clone, Debug, PartialEq)]
pub struct LayoutConfig {
	pub placement: Placement,
	pub horizontal_spacing: f64,
	pub vertical_spacing: f64,
	pub fan_radius: f64,
	pub fan_step: f64,
	pub root_slots: usize,
}

impl Default for LayoutConfig {
	fn default() -> Self {
		Self {
			placement: Placement::default(),
			horizontal_spacing: HORIZONTAL_SPACING,
			vertical_spacing: VERTICAL_SPACING,
			fan_radius: FAN_RADIUS,
			fan_step: FAN_STEP,
			root_slots: ROOT_SLOTS,
		}
	}
}

impl LayoutConfig {
	/// Position for a new root, given the positions of the existing roots.
	pub fn root_position(&self, roots: &[(f64, f64)]) -> (f64, f64) {
		let Some(&(x, y)) = roots.last() else {
			return ROOT_POSITION;
		};
		match self.placement {
			Placement::Stacked => (x, y + self.vertical_spacing),
			// Leave room for a full ring of children between neighbouring roots.
			Placement::Fan => (x + 3.0 * self.fan_radius, y),
		}
	}

	/// Slots in one ring of an inner node's fan. Offsets stay short of the
	/// half turn so no child lands on the edge back to the grandparent.
	fn fan_slots(&self) -> usize {
		let step = self.fan_step.abs();
		if step.is_nan() || step == 0.0 || step >= PI {
			return 1;
		}
		// Largest k with (k + 0.5) * step < PI - step, so staggered rings fit too.
		let mut k = 0usize;
		while (k as f64 + 1.5) * step < PI - step {
			k += 1;
		}
		2 * k + 1
	}

	/// Position for a new child of `parent`.
	///
	/// `grandparent` is the parent's own parent, if any, and `siblings`
	/// are the positions of the children `parent` already has, in order.
	pub fn child_position(
		&self,
		parent: (f64, f64),
		grandparent: Option<(f64, f64)>,
		siblings: &[(f64, f64)],
	) -> (f64, f64) {
		match self.placement {
			Placement::Stacked => {
				let y = siblings
					.last()
					.map(|&(_, y)| y + self.vertical_spacing)
					.unwrap_or(parent.1);
				(parent.0 + self.horizontal_spacing, y)
			}
			Placement::Fan => {
				let i = siblings.len();
				let (angle, radius) = match grandparent {
					None => {
						let slots = self.root_slots.max(1);
						let (slot, ring) = (i % slots, i / slots);
						let step = TAU / slots as f64;
						(
							slot as f64 * step + ring as f64 * step * 0.5,
							self.fan_radius * (ring + 1) as f64,
						)
					}
					Some((gx, gy)) => {
						let outward = (parent.1 - gy).atan2(parent.0 - gx);
						let slots = self.fan_slots();
						let (j, ring) = (i % slots, i / slots);
						let k = j.div_ceil(2) as f64;
						let sign = if j % 2 == 1 { 1.0 } else { -1.0 };
						let stagger = if ring % 2 == 1 { 0.5 * self.fan_step } else { 0.0 };
						(
							outward + sign * k * self.fan_step + stagger,
							self.fan_radius * (ring + 1) as f64,
						)
					}
				};
				(
					parent.0 + radius * angle.cos(),
					parent.1 + radius * angle.sin(),
				)
			}
		}
	}
}
