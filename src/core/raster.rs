// Sizing rules for decoded panorama rasters.

/// Decoded RGBA8 pixels ready for upload, tightly packed rows.
#[derive(Clone, Debug, PartialEq)]
pub struct RasterImage {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

impl RasterImage {
    pub fn bytes_per_row(&self) -> u32 {
        self.width * 4
    }

    pub fn is_consistent(&self) -> bool {
        self.width > 0
            && self.height > 0
            && self.pixels.len() == (self.width as usize) * (self.height as usize) * 4
    }
}

/// Target size for a `width`×`height` source so the width never exceeds
/// `max_width`. Aspect ratio is kept and both sides round to the nearest
/// integer, with a floor of one pixel.
pub fn fit_to_max_width(width: u32, height: u32, max_width: u32) -> (u32, u32) {
    let max_width = max_width.max(1);
    if width <= max_width {
        return (width.max(1), height.max(1));
    }
    let scale = max_width as f64 / width as f64;
    let w = ((width as f64) * scale).round().max(1.0) as u32;
    let h = ((height as f64) * scale).round().max(1.0) as u32;
    (w.min(max_width), h)
}

/// Number of mip levels down to 1×1.
pub fn mip_level_count(width: u32, height: u32) -> u32 {
    32 - width.max(height).max(1).leading_zeros()
}

/// Effective width cap given the configured limit and the device limit.
pub fn effective_max_width(configured: u32, device_max_dimension: u32) -> u32 {
    configured.min(device_max_dimension).max(1)
}
