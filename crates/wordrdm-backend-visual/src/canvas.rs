//! Word rendering onto a gray canvas and binarization.

use log::warn;
use wordrdm_spec::{BitVector, ChannelKind, RdmError, RdmResult, VisualParams};

use crate::glyphs::{glyph, pixel, text_width, Glyph, GLYPH_HEIGHT, GLYPH_SPACING, GLYPH_WIDTH};

/// An 8-bit grayscale image, row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Canvas {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl Canvas {
    /// A canvas filled with one gray level.
    pub fn new(width: u32, height: u32, fill: u8) -> Self {
        Self {
            width,
            height,
            pixels: vec![fill; width as usize * height as usize],
        }
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Raw pixels.
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Pixel value, `None` outside the canvas.
    pub fn get(&self, x: u32, y: u32) -> Option<u8> {
        (x < self.width && y < self.height)
            .then(|| self.pixels[y as usize * self.width as usize + x as usize])
    }

    /// Sets one pixel; out-of-range coordinates are ignored.
    pub fn set(&mut self, x: u32, y: u32, value: u8) {
        if x < self.width && y < self.height {
            self.pixels[y as usize * self.width as usize + x as usize] = value;
        }
    }

    /// Fills an axis-aligned block, clipped to the canvas.
    fn fill_block(&mut self, x: i64, y: i64, size: u32, value: u8) {
        let size = size as i64;
        let x0 = x.max(0);
        let y0 = y.max(0);
        let x1 = (x + size).min(self.width as i64);
        let y1 = (y + size).min(self.height as i64);
        for py in y0..y1 {
            let row = py as usize * self.width as usize;
            for px in x0..x1 {
                self.pixels[row + px as usize] = value;
            }
        }
    }

    /// Ink mask: every pixel that differs from `background` is set.
    pub fn binarize(&self, background: u8) -> BitVector {
        BitVector::from_bools(self.pixels.iter().map(|&p| p != background))
    }
}

/// Pixels per font pixel for the given canvas: `floor(letter_height * H / 7)`,
/// at least 1.
pub fn glyph_scale(params: &VisualParams) -> u32 {
    let scale = (params.letter_height * params.height as f64 / GLYPH_HEIGHT as f64).floor();
    if scale.is_finite() && scale >= 1.0 {
        scale as u32
    } else {
        1
    }
}

/// Renders a word in ink on the background, centered.
///
/// # Errors
/// [`RdmError::InvalidConfig`] for an empty canvas or identical ink and
/// background; [`RdmError::LookupMiss`] when a character has no glyph.
pub fn render_word(word: &str, params: &VisualParams) -> RdmResult<Canvas> {
    if params.width == 0 || params.height == 0 {
        return Err(RdmError::InvalidConfig(
            "visual canvas must be at least 1x1".to_string(),
        ));
    }
    if params.ink == params.background {
        return Err(RdmError::InvalidConfig(
            "visual ink and background must differ".to_string(),
        ));
    }

    let glyphs = word
        .chars()
        .map(|c| {
            glyph(c).ok_or_else(|| {
                RdmError::lookup_miss(
                    ChannelKind::Visual.as_str(),
                    word,
                    format!("bitmap font (no glyph for {:?})", c),
                )
            })
        })
        .collect::<RdmResult<Vec<Glyph>>>()?;

    let scale = glyph_scale(params);
    let text_w = text_width(glyphs.len()) as i64 * scale as i64;
    let text_h = GLYPH_HEIGHT as i64 * scale as i64;
    if text_w > params.width as i64 {
        warn!(
            "visual: '{}' is {}px wide on a {}px canvas and will be clipped",
            word, text_w, params.width
        );
    }
    let origin_x = (params.width as i64 - text_w).div_euclid(2);
    let origin_y = (params.height as i64 - text_h).div_euclid(2);

    let mut canvas = Canvas::new(params.width, params.height, params.background);
    let advance = (GLYPH_WIDTH + GLYPH_SPACING) as i64 * scale as i64;
    for (i, g) in glyphs.iter().enumerate() {
        let left = origin_x + i as i64 * advance;
        for gy in 0..GLYPH_HEIGHT {
            for gx in 0..GLYPH_WIDTH {
                if pixel(g, gx, gy) {
                    canvas.fill_block(
                        left + (gx * scale) as i64,
                        origin_y + (gy * scale) as i64,
                        scale,
                        params.ink,
                    );
                }
            }
        }
    }
    Ok(canvas)
}

/// Renders and binarizes a word.
pub fn word_mask(word: &str, params: &VisualParams) -> RdmResult<BitVector> {
    Ok(render_word(word, params)?.binarize(params.background))
}
