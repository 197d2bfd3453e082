//! Burst color palette.
//!
//! Each emission picks one base color from a fixed palette at spawn. Colors
//! are configured as `0xRRGGBB` integers and converted once, at engine
//! construction, to RGB in `[0, 1]`.

use glam::Vec3;

/// Default firework palette.
pub const DEFAULT_PALETTE: [u32; 7] = [
    0xFF6B6B, // red
    0x4ECDC4, // teal
    0xFFD93D, // yellow
    0x6BCF7F, // green
    0xFF8C42, // orange
    0x845EC2, // purple
    0xF9F871, // pale yellow
];

/// Convert a `0xRRGGBB` integer into an RGB vector with channels in `[0, 1]`.
///
/// Bits above the low 24 are ignored.
#[inline]
pub fn rgb_from_hex(hex: u32) -> Vec3 {
    let r = ((hex >> 16) & 0xFF) as f32;
    let g = ((hex >> 8) & 0xFF) as f32;
    let b = (hex & 0xFF) as f32;
    Vec3::new(r, g, b) / 255.0
}

/// A non-empty, resolved list of burst colors.
#[derive(Debug, Clone, PartialEq)]
pub struct BurstPalette {
    colors: Vec<Vec3>,
}

impl BurstPalette {
    /// Resolve hex colors. Returns `None` for an empty list.
    pub fn from_hex(hex: &[u32]) -> Option<Self> {
        if hex.is_empty() {
            return None;
        }
        Some(Self {
            colors: hex.iter().copied().map(rgb_from_hex).collect(),
        })
    }

    /// Number of colors.
    #[inline]
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    /// Whether the palette has no colors. Never true for a constructed palette.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// Color at `index`, wrapping around the palette.
    #[inline]
    pub fn get(&self, index: usize) -> Vec3 {
        self.colors[index % self.colors.len()]
    }

    /// All colors in order.
    pub fn colors(&self) -> &[Vec3] {
        &self.colors
    }
}

impl Default for BurstPalette {
    fn default() -> Self {
        Self {
            colors: DEFAULT_PALETTE.iter().copied().map(rgb_from_hex).collect(),
        }
    }
}
