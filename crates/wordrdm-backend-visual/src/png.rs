//! Grayscale PNG export of rendered words.
//!
//! Fixed compression and no filtering, so identical canvases encode to
//! identical bytes.

use std::collections::HashSet;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use log::{info, warn};
use png::{BitDepth, ColorType, Compression, Encoder, FilterType};
use wordrdm_spec::{VisualParams, WordSet};

use crate::canvas::{render_word, Canvas};
use crate::error::VisualResult;

/// Encodes a canvas as 8-bit grayscale PNG into any writer.
pub fn write_canvas_to_writer<W: Write>(canvas: &Canvas, writer: W) -> VisualResult<()> {
    let mut encoder = Encoder::new(writer, canvas.width(), canvas.height());
    encoder.set_color(ColorType::Grayscale);
    encoder.set_depth(BitDepth::Eight);
    encoder.set_compression(Compression::Default);
    encoder.set_filter(FilterType::NoFilter);

    let mut png_writer = encoder.write_header()?;
    png_writer.write_image_data(canvas.pixels())?;
    Ok(())
}

/// Writes a canvas to a PNG file.
pub fn write_canvas(canvas: &Canvas, path: &Path) -> VisualResult<()> {
    let file = fs::File::create(path)?;
    write_canvas_to_writer(canvas, std::io::BufWriter::new(file))
}

/// Encodes a canvas into memory.
pub fn canvas_to_png(canvas: &Canvas) -> VisualResult<Vec<u8>> {
    let mut out = Vec::new();
    write_canvas_to_writer(canvas, &mut out)?;
    Ok(out)
}

/// Binary mask of a canvas as a canvas: ink white, background black.
pub fn mask_canvas(canvas: &Canvas, background: u8) -> Canvas {
    let mut mask = Canvas::new(canvas.width(), canvas.height(), 0);
    for y in 0..canvas.height() {
        for x in 0..canvas.width() {
            if canvas.get(x, y).is_some_and(|p| p != background) {
                mask.set(x, y, 255);
            }
        }
    }
    mask
}

/// Renders every word and writes `{word}.png` into `out_dir`. With `binary`,
/// the binarized mask is written instead of the rendered canvas.
///
/// Repeated words are written once. Distinct words whose file names would
/// clash (`o'clock` and `o_clock`, or `Apple` and `apple` on a
/// case-insensitive filesystem) get a numeric suffix: `o_clock_2.png`.
pub fn export_words(
    words: &WordSet,
    params: &VisualParams,
    out_dir: &Path,
    binary: bool,
) -> VisualResult<Vec<PathBuf>> {
    fs::create_dir_all(out_dir)?;
    let mut written = Vec::with_capacity(words.len());
    let mut exported: HashSet<&str> = HashSet::new();
    let mut stems: HashSet<String> = HashSet::new();
    for word in words.iter() {
        if !exported.insert(word) {
            continue;
        }
        let stem = unique_stem(word, &stems);
        if stem != file_stem(word) {
            warn!("visual: '{}' written as {}.png to avoid a name clash", word, stem);
        }
        stems.insert(stem.to_lowercase());

        let mut canvas = render_word(word, params)?;
        if binary {
            canvas = mask_canvas(&canvas, params.background);
        }
        let path = out_dir.join(format!("{}.png", stem));
        write_canvas(&canvas, &path)?;
        written.push(path);
    }
    info!("visual: wrote {} images to {}", written.len(), out_dir.display());
    Ok(written)
}

/// File-name-safe form of a word.
fn file_stem(word: &str) -> String {
    word.chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' { c } else { '_' })
        .collect()
}

/// First of `stem`, `stem_2`, `stem_3`, ... not yet taken, compared
/// case-insensitively.
fn unique_stem(word: &str, taken: &HashSet<String>) -> String {
    let base = file_stem(word);
    let mut stem = base.clone();
    let mut n = 2;
    while taken.contains(&stem.to_lowercase()) {
        stem = format!("{}_{}", base, n);
        n += 1;
    }
    stem
}
