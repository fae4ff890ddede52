//! Render surface sizing and zoom limits.

/// Furthest zoom out.
pub const MIN_ZOOM: f64 = 0.1;
/// Furthest zoom in.
pub const MAX_ZOOM: f64 = 10.0;
/// Width used until the container has been measured.
pub const FALLBACK_WIDTH: f64 = 800.0;

/// New zoom scale after one wheel notch.
pub fn zoom_step(k: f64, delta_y: f64) -> f64 {
	let factor = if delta_y > 0.0 { 0.9 } else { 1.1 };
	(k * factor).clamp(MIN_ZOOM, MAX_ZOOM)
}

/// Latest measured container width plus the view's fixed height.
///
/// Measurements may arrive before the graph data does; whichever came last wins once the
/// canvas exists.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SurfaceSize {
	measured_width: Option<f64>,
	height: f64,
}

impl SurfaceSize {
	/// Unmeasured surface of fixed `height`.
	pub fn new(height: f64) -> Self {
		Self {
			measured_width: None,
			height,
		}
	}

	/// Records a measurement. Zero, negative and non-finite widths (detached or hidden
	/// containers) are ignored. Returns whether the width changed.
	pub fn observe_width(&mut self, width: f64) -> bool {
		if !width.is_finite() || width <= 0.0 {
			return false;
		}
		let changed = self.measured_width != Some(width);
		self.measured_width = Some(width);
		changed
	}

	/// Last measured width, [`FALLBACK_WIDTH`] before any.
	pub fn width(&self) -> f64 {
		self.measured_width.unwrap_or(FALLBACK_WIDTH)
	}

	/// Fixed height.
	pub fn height(&self) -> f64 {
		self.height
	}

	/// A usable width has been observed.
	pub fn is_measured(&self) -> bool {
		self.measured_width.is_some()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn zoom_is_clamped() {
		assert_eq!(zoom_step(10.0, -1.0), MAX_ZOOM);
		assert_eq!(zoom_step(0.1, 1.0), MIN_ZOOM);
		assert!(zoom_step(1.0, -1.0) > 1.0);
	}

	#[test]
	fn unmeasured_surface_uses_fallback() {
		let size = SurfaceSize::new(600.0);
		assert_eq!(size.width(), FALLBACK_WIDTH);
		assert_eq!(size.height(), 600.0);
		assert!(!size.is_measured());
	}

	#[test]
	fn latest_measurement_wins() {
		let mut size = SurfaceSize::new(600.0);
		assert!(size.observe_width(1024.0));
		assert!(size.observe_width(640.0));
		assert!(!size.observe_width(640.0));
		assert!(!size.observe_width(0.0));
		assert!(!size.observe_width(f64::NAN));
		assert_eq!(size.width(), 640.0);
	}
}
