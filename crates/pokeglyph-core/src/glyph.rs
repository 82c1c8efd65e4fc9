//! # Half-block glyph conversion
//!
//! Turns an RGBA sprite into text for truecolor terminals. Every output cell
//! covers two vertically stacked pixels: the upper one is drawn with the
//! foreground color of `▀`, the lower one with the background color.
//!
//! ```text
//! upper  lower   cell
//!  -      -      " "
//!  -      L      ESC[38;2;L m ▄ ESC[0m
//!  U      -      ESC[38;2;U m ▀ ESC[0m
//!  U      L      ESC[38;2;U m ESC[48;2;L m ▀ ESC[0m
//! ```
//!
//! The sprite is cropped to the bounding box of its non-transparent pixels
//! first. The crop keeps `column_padding` extra columns on the right, which
//! are transparent once they run past the image edge.

use crate::error::Result;
use image::{Rgb, RgbaImage};
use std::path::Path;

/// Extra columns kept right of the bounding box
pub const COLUMN_PADDING: u32 = 6;

/// SGR reset
pub const RESET: &str = "\x1b[0m";

/// Upper half block
pub const UPPER_HALF: char = '▀';

/// Lower half block
pub const LOWER_HALF: char = '▄';

/// Region of an image, in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bounds {
    pub left: u32,
    pub top: u32,
    pub width: u32,
    pub height: u32,
}

impl Bounds {
    /// The whole image
    pub fn frame(img: &RgbaImage) -> Self {
        Self {
            left: 0,
            top: 0,
            width: img.width(),
            height: img.height(),
        }
    }
}

/// Tight bounding box of all pixels with non-zero alpha
pub fn opaque_bounds(img: &RgbaImage) -> Option<Bounds> {
    let mut min_x = u32::MAX;
    let mut min_y = u32::MAX;
    let mut max_x = 0;
    let mut max_y = 0;
    let mut found = false;

    for (x, y, pixel) in img.enumerate_pixels() {
        if pixel[3] != 0 {
            found = true;
            min_x = min_x.min(x);
            min_y = min_y.min(y);
            max_x = max_x.max(x);
            max_y = max_y.max(y);
        }
    }

    found.then(|| Bounds {
        left: min_x,
        top: min_y,
        width: max_x - min_x + 1,
        height: max_y - min_y + 1,
    })
}

/// Configuration for glyph conversion
#[derive(Debug, Clone)]
pub struct GlyphConfig {
    /// Columns appended right of the bounding box
    pub column_padding: u32,
}

impl Default for GlyphConfig {
    fn default() -> Self {
        Self {
            column_padding: COLUMN_PADDING,
        }
    }
}

/// Half-block sprite renderer
pub struct GlyphRenderer {
    config: GlyphConfig,
}

impl GlyphRenderer {
    /// Create a new renderer with default config
    pub fn new() -> Self {
        Self {
            config: GlyphConfig::default(),
        }
    }

    /// Create with custom config
    pub fn with_config(config: GlyphConfig) -> Self {
        Self { config }
    }

    /// Load a PNG from disk and convert it
    pub fn render_file<P: AsRef<Path>>(&self, path: P) -> Result<String> {
        let img = image::open(path)?.to_rgba8();
        Ok(self.render(&img))
    }

    /// Convert a sprite to half-block text.
    ///
    /// A fully transparent sprite has no bounding box and is converted over
    /// its whole frame, which yields only spaces and newlines.
    pub fn render(&self, img: &RgbaImage) -> String {
        let bounds = opaque_bounds(img).unwrap_or_else(|| Bounds::frame(img));
        let grid = self.color_grid(img, bounds);

        let mut text = String::new();
        // An odd trailing row has no partner and is dropped
        for pair in grid.chunks_exact(2) {
            for (upper, lower) in pair[0].iter().zip(&pair[1]) {
                push_cell(&mut text, *upper, *lower);
            }
            text.push('\n');
        }
        text
    }

    /// Colors of the cropped region, `None` where transparent
    fn color_grid(&self, img: &RgbaImage, bounds: Bounds) -> Vec<Vec<Option<Rgb<u8>>>> {
        let columns = bounds.width + self.config.column_padding;
        (bounds.top..bounds.top + bounds.height)
            .map(|y| {
                (bounds.left..bounds.left + columns)
                    .map(|x| pixel_color(img, x, y))
                    .collect()
            })
            .collect()
    }
}

impl Default for GlyphRenderer {
    fn default() -> Self {
        Self::new()
    }
}

fn pixel_color(img: &RgbaImage, x: u32, y: u32) -> Option<Rgb<u8>> {
    if x >= img.width() || y >= img.height() {
        return None;
    }
    let pixel = img.get_pixel(x, y);
    if pixel[3] == 0 {
        None
    } else {
        Some(Rgb([pixel[0], pixel[1], pixel[2]]))
    }
}

/// SGR truecolor foreground prefix
pub fn fg(color: Rgb<u8>) -> String {
    format!("\x1b[38;2;{};{};{}m", color[0], color[1], color[2])
}

/// SGR truecolor background prefix
pub fn bg(color: Rgb<u8>) -> String {
    format!("\x1b[48;2;{};{};{}m", color[0], color[1], color[2])
}

fn push_cell(text: &mut String, upper: Option<Rgb<u8>>, lower: Option<Rgb<u8>>) {
    match (upper, lower) {
        (None, None) => text.push(' '),
        (None, Some(lower)) => {
            text.push_str(&fg(lower));
            text.push(LOWER_HALF);
            text.push_str(RESET);
        }
        (Some(upper), None) => {
            text.push_str(&fg(upper));
            text.push(UPPER_HALF);
            text.push_str(RESET);
        }
        (Some(upper), Some(lower)) => {
            text.push_str(&fg(upper));
            text.push_str(&bg(lower));
            text.push(UPPER_HALF);
            text.push_str(RESET);
        }
    }
}
