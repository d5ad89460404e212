//! Luminance histogram over interleaved pixel data.
//!
//! Used by tonal normalization to find the black and white points of a frame.
//! Luminance uses ITU-R BT.709 coefficients.

/// ITU-R BT.709 coefficient for the red channel.
pub const LUMINANCE_R: f32 = 0.2126;

/// ITU-R BT.709 coefficient for the green channel.
pub const LUMINANCE_G: f32 = 0.7152;

/// ITU-R BT.709 coefficient for the blue channel.
pub const LUMINANCE_B: f32 = 0.0722;

/// Luminance of an 8-bit RGB triple, rounded to 0-255.
#[inline]
pub fn luminance_u8(r: u8, g: u8, b: u8) -> u8 {
    let lum = LUMINANCE_R * r as f32 + LUMINANCE_G * g as f32 + LUMINANCE_B * b as f32;
    lum.clamp(0.0, 255.0).round() as u8
}

/// 256-bin luminance histogram.
#[derive(Debug, Clone)]
pub struct LuminanceHistogram {
    bins: [u64; 256],
    total: u64,
}

impl Default for LuminanceHistogram {
    fn default() -> Self {
        Self {
            bins: [0; 256],
            total: 0,
        }
    }
}

impl LuminanceHistogram {
    /// Bin every pixel of an interleaved 8-bit buffer.
    ///
    /// `channels` is 3 for RGB or 4 for RGBA; only the first three channels of
    /// each pixel contribute. A trailing partial pixel is ignored.
    pub fn from_pixels(pixels: &[u8], channels: usize) -> Self {
        let mut hist = Self::default();
        if channels < 3 {
            return hist;
        }

        for px in pixels.chunks_exact(channels) {
            hist.bins[luminance_u8(px[0], px[1], px[2]) as usize] += 1;
            hist.total += 1;
        }

        hist
    }

    /// Number of pixels binned.
    pub fn total(&self) -> u64 {
        self.total
    }

    /// Count in a single bin.
    pub fn count(&self, level: u8) -> u64 {
        self.bins[level as usize]
    }

    /// Smallest level at or below which `fraction` of all pixels fall.
    ///
    /// Returns `None` for an empty histogram. `fraction` is clamped to 0.0-1.0.
    pub fn percentile(&self, fraction: f64) -> Option<u8> {
        if self.total == 0 {
            return None;
        }

        let target = ((self.total as f64 * fraction.clamp(0.0, 1.0)).ceil() as u64).max(1);
        let mut cumulative = 0u64;
        for (level, count) in self.bins.iter().enumerate() {
            cumulative += count;
            if cumulative >= target {
                return Some(level as u8);
            }
        }
        Some(255)
    }
}
