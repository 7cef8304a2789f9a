//! Render command implementation
//!
//! Writes each word as the visual channel sees it, for inspection.

use anyhow::{Context, Result};
use colored::Colorize;
use std::path::Path;
use std::process::ExitCode;

use wordrdm_backend_visual::{export_words, glyph_scale};
use wordrdm_spec::WordSet;

use super::load_study;

/// Run the render command
///
/// # Arguments
/// * `word_lists` - Word-list files, concatenated
/// * `out_dir` - Directory receiving `{word}.png`
/// * `study` - Optional study file providing the canvas
/// * `binary` - Write binarized masks instead of gray renderings
pub fn run(
    word_lists: &[String],
    out_dir: &str,
    study: Option<&str>,
    binary: bool,
) -> Result<ExitCode> {
    let config = load_study(study)?;
    let words = WordSet::from_files(word_lists).context("failed to read word lists")?;
    let params = &config.visual;

    let written = export_words(&words, params, Path::new(out_dir), binary)?;

    println!(
        "{} {} {} on {}x{} (glyph scale {}) -> {}",
        "ok".green().bold(),
        written.len(),
        if binary { "masks" } else { "renderings" },
        params.width,
        params.height,
        glyph_scale(params),
        out_dir
    );
    Ok(ExitCode::SUCCESS)
}
