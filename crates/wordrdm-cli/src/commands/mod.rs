//! Command implementations for the WordRDM CLI

pub mod batch;
pub mod build;
pub mod channels;
pub mod check;
pub mod render;

use std::path::Path;

use anyhow::{Context, Result};
use wordrdm_spec::StudyConfig;

/// Loads a study file, or the empty study when none is given.
pub(crate) fn load_study(path: Option<&str>) -> Result<StudyConfig> {
    match path {
        Some(path) => StudyConfig::load(Path::new(path))
            .with_context(|| format!("failed to load study {}", path)),
        None => Ok(StudyConfig::default()),
    }
}

/// Progress callback drawing a bar on stderr; redraws only when the
/// percentage changes.
pub(crate) fn progress_bar(label: String) -> impl FnMut(usize, usize) {
    use colored::Colorize;
    use std::io::Write;

    let mut last = None;
    move |done, total| {
        let pct = if total == 0 { 100 } else { done * 100 / total };
        if last == Some(pct) {
            return;
        }
        last = Some(pct);
        let bar_width = 30;
        let filled = pct * bar_width / 100;
        let bar = format!(
            "[{}{}] {}%",
            "=".repeat(filled),
            " ".repeat(bar_width - filled),
            pct
        );
        eprint!("\r  {} {}", label, bar.dimmed());
        if done >= total {
            eprintln!();
        }
        let _ = std::io::stderr().flush();
    }
}
