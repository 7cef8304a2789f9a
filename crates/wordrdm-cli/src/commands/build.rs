//! Build command implementation
//!
//! Builds a single channel's RDM for one word list.

use anyhow::{Context, Result};
use colored::Colorize;
use std::path::Path;
use std::process::ExitCode;
use std::time::Instant;

use wordrdm_spec::{ChannelKind, WordSet};

use super::{load_study, progress_bar};
use crate::registry::Assets;

/// Run the build command
///
/// # Arguments
/// * `channel` - Channel name
/// * `word_lists` - Word-list files, concatenated
/// * `study` - Optional study file with asset locations
/// * `output` - Output CSV path; stdout when absent
pub fn run(
    channel: &str,
    word_lists: &[String],
    study: Option<&str>,
    output: Option<&str>,
) -> Result<ExitCode> {
    let kind: ChannelKind = channel.parse()?;
    let config = load_study(study)?;
    let words = WordSet::from_files(word_lists).context("failed to read word lists")?;
    let assets = Assets::load(&config, &[kind])?;

    let start = Instant::now();
    let matrix = assets.build(&config, kind, &words, progress_bar(kind.to_string()))?;
    let elapsed = start.elapsed();

    match output {
        Some(path) => {
            let path = Path::new(path);
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("failed to create {}", parent.display()))?;
            }
            matrix.write_csv(path)?;
            eprintln!(
                "{} {} {}x{} -> {} {}",
                "ok".green().bold(),
                kind,
                matrix.size(),
                matrix.size(),
                path.display(),
                format!("({:.1}s)", elapsed.as_secs_f64()).dimmed()
            );
        }
        None => print!("{}", matrix.to_csv()),
    }

    let total = matrix.size() * matrix.size();
    let missing = total - matrix.filled_cells();
    if missing > 0 {
        eprintln!(
            "  {} {} of {} cells have no value",
            "!!".yellow(),
            missing,
            total
        );
    }

    Ok(ExitCode::SUCCESS)
}
