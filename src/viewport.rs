/// Window size and pixel-ratio policy.
///
/// Sizes are tracked in logical units. The render surface is the logical
/// size times the pixel ratio, where the ratio is the device's, clamped to
/// `max_pixel_ratio`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    logical_width: f64,
    logical_height: f64,
    device_pixel_ratio: f64,
    max_pixel_ratio: f64,
}

impl Viewport {
    pub fn new(logical_width: f64, logical_height: f64, device_pixel_ratio: f64, max_pixel_ratio: f64) -> Self {
        Self {
            logical_width: logical_width.max(1.0),
            logical_height: logical_height.max(1.0),
            device_pixel_ratio: sanitize_ratio(device_pixel_ratio),
            max_pixel_ratio: sanitize_ratio(max_pixel_ratio),
        }
    }

    /// Builds from a window's physical size and scale factor.
    pub fn from_physical(width: u32, height: u32, scale_factor: f64, max_pixel_ratio: f64) -> Self {
        let scale = sanitize_ratio(scale_factor);
        Self::new(width as f64 / scale, height as f64 / scale, scale, max_pixel_ratio)
    }

    /// Returns false (and changes nothing) for zero or non-finite sizes.
    pub fn resize_logical(&mut self, width: f64, height: f64) -> bool {
        if !(width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0) {
            return false;
        }
        self.logical_width = width;
        self.logical_height = height;
        true
    }

    /// Window-system resize: physical pixels at the current scale factor.
    pub fn resize_physical(&mut self, width: u32, height: u32) -> bool {
        if width == 0 || height == 0 {
            return false;
        }
        self.resize_logical(
            width as f64 / self.device_pixel_ratio,
            height as f64 / self.device_pixel_ratio,
        )
    }

    /// Scale-factor change; the logical size is kept.
    pub fn set_device_pixel_ratio(&mut self, ratio: f64) {
        self.device_pixel_ratio = sanitize_ratio(ratio);
    }

    pub fn logical_size(&self) -> (f64, f64) {
        (self.logical_width, self.logical_height)
    }

    pub fn device_pixel_ratio(&self) -> f64 {
        self.device_pixel_ratio
    }

    pub fn pixel_ratio(&self) -> f64 {
        self.device_pixel_ratio.min(self.max_pixel_ratio)
    }

    pub fn aspect(&self) -> f32 {
        (self.logical_width / self.logical_height) as f32
    }

    /// Render surface size in physical pixels, never zero.
    pub fn surface_size(&self) -> (u32, u32) {
        let ratio = self.pixel_ratio();
        (
            ((self.logical_width * ratio).round() as u32).max(1),
            ((self.logical_height * ratio).round() as u32).max(1),
        )
    }
}

fn sanitize_ratio(ratio: f64) -> f64 {
    if ratio.is_finite() && ratio > 0.0 {
        ratio
    } else {
        1.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resize_updates_aspect() {
        let mut viewport = Viewport::new(800.0, 600.0, 1.0, 2.0);
        assert!((viewport.aspect() - 1.333).abs() < 1e-3);
        assert!(viewport.resize_logical(1600.0, 900.0));
        assert!((viewport.aspect() - 1.778).abs() < 1e-3);
        assert_eq!(viewport.surface_size(), (1600, 900));
    }

    #[test]
    fn test_pixel_ratio_is_clamped() {
        let viewport = Viewport::new(800.0, 600.0, 3.0, 2.0);
        assert_eq!(viewport.pixel_ratio(), 2.0);
        assert_eq!(viewport.surface_size(), (1600, 1200));

        let low = Viewport::new(800.0, 600.0, 1.5, 2.0);
        assert_eq!(low.pixel_ratio(), 1.5);
        assert_eq!(low.surface_size(), (1200, 900));
    }

    #[test]
    fn test_zero_resize_is_ignored() {
        let mut viewport = Viewport::new(800.0, 600.0, 1.0, 2.0);
        assert!(!viewport.resize_logical(0.0, 600.0));
        assert!(!viewport.resize_physical(800, 0));
        assert_eq!(viewport.logical_size(), (800.0, 600.0));
    }

    #[test]
    fn test_physical_size_at_high_dpi() {
        // 3x display: 2400x1800 physical is 800x600 logical, rendered at 2x.
        let viewport = Viewport::from_physical(2400, 1800, 3.0, 2.0);
        assert_eq!(viewport.logical_size(), (800.0, 600.0));
        assert_eq!(viewport.surface_size(), (1600, 1200));
    }

    #[test]
    fn test_bad_ratio_falls_back_to_one() {
        let viewport = Viewport::new(800.0, 600.0, f64::NAN, 2.0);
        assert_eq!(viewport.pixel_ratio(), 1.0);
    }
}
