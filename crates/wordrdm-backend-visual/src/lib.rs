//! Visual channel for WordRDM.
//!
//! Words are drawn with a built-in 5x7 bitmap font, scaled to the configured
//! letter height and centered on a gray canvas. Each rendering is binarized
//! (background off, ink on) and words are compared by correlation distance
//! over the resulting bit vectors. Renderings can also be written out as PNG
//! for inspection.

pub mod canvas;
pub mod channel;
pub mod error;
pub mod glyphs;
pub mod png;

pub use canvas::{glyph_scale, render_word, word_mask, Canvas};
pub use channel::VisualChannel;
pub use error::{VisualError, VisualResult};
pub use crate::png::{canvas_to_png, export_words, mask_canvas, write_canvas};
