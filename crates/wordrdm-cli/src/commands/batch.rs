//! Batch command implementation
//!
//! Builds every requested channel for every condition of a study and writes
//! `{out_dir}/{condition}_{channel}.csv`, plus a JSON report.

use anyhow::{bail, Context, Result};
use colored::Colorize;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Instant;

use wordrdm_spec::{ChannelKind, ConditionConfig, WordSet};

use super::progress_bar;
use crate::registry::Assets;

/// File name of the JSON report written next to the matrices.
pub const REPORT_FILE: &str = "batch-report.json";

/// Run the batch command
///
/// Assets are loaded before anything is built; a failing asset aborts the
/// run. An unreadable word list fails every channel of its condition, and a
/// failing channel build is reported; in both cases the remaining builds go
/// on and the report is still written.
///
/// # Returns
/// Exit code: 0 if every build succeeded, 1 otherwise
pub fn run(
    study: &str,
    condition_filter: &[String],
    channel_filter: &[String],
    out_dir: Option<&str>,
) -> Result<ExitCode> {
    let mut config = super::load_study(Some(study))?;

    if !channel_filter.is_empty() {
        config.channels = channel_filter
            .iter()
            .map(|name| name.parse::<ChannelKind>())
            .collect::<Result<_, _>>()?;
    }
    config.validate_batch()?;

    let conditions = select_conditions(&config.conditions, condition_filter)?;
    let channels = dedup_channels(&config.channels);
    let out_dir = out_dir
        .map(PathBuf::from)
        .unwrap_or_else(|| config.out_dir.clone());
    std::fs::create_dir_all(&out_dir)
        .with_context(|| format!("failed to create {}", out_dir.display()))?;

    let assets = Assets::load(&config, &channels)?;

    let total = conditions.len() * channels.len();
    println!(
        "Building {} matrices ({} conditions x {} channels)...",
        total,
        conditions.len(),
        channels.len()
    );
    println!("Output directory: {}", out_dir.display());

    let mut results = Vec::with_capacity(total);
    let mut passed = 0;
    let mut failed = 0;
    let batch_start = Instant::now();

    for condition in &conditions {
        let words = match WordSet::from_files(&condition.word_lists) {
            Ok(words) => words,
            Err(e) => {
                let error = format!("failed to read word lists of '{}': {}", condition.name, e);
                println!(
                    "\n{} {} {} {}",
                    "✗ ERROR".red().bold(),
                    "•".dimmed(),
                    condition.name,
                    error
                );
                failed += channels.len();
                results.extend(channels.iter().map(|&kind| BatchResult {
                    condition: condition.name.clone(),
                    channel: kind,
                    output: None,
                    words: 0,
                    filled_cells: 0,
                    error: Some(error.clone()),
                }));
                continue;
            }
        };

        for &kind in &channels {
            let index = results.len() + 1;
            let progress = format!("[{}/{}]", index, total).cyan().bold();
            println!("\n{} {} / {}", progress, condition.name, kind);

            let item_start = Instant::now();
            let path = output_path(&out_dir, &condition.name, kind);
            let result = assets
                .build(&config, kind, &words, progress_bar(kind.to_string()))
                .and_then(|matrix| {
                    matrix.write_csv(&path)?;
                    Ok(matrix)
                });
            let time_str = format!("{:.1}s", item_start.elapsed().as_secs_f64()).dimmed();

            match result {
                Ok(matrix) => {
                    println!(
                        "  {} {} {} {}",
                        "✓ PASS".green().bold(),
                        "•".dimmed(),
                        path.display(),
                        time_str
                    );
                    passed += 1;
                    results.push(BatchResult {
                        condition: condition.name.clone(),
                        channel: kind,
                        output: Some(path.to_string_lossy().to_string()),
                        words: matrix.size(),
                        filled_cells: matrix.filled_cells(),
                        error: None,
                    });
                }
                Err(e) => {
                    println!(
                        "  {} {} {}: {:#}",
                        "✗ ERROR".red().bold(),
                        "•".dimmed(),
                        time_str,
                        e
                    );
                    failed += 1;
                    results.push(BatchResult {
                        condition: condition.name.clone(),
                        channel: kind,
                        output: None,
                        words: words.len(),
                        filled_cells: 0,
                        error: Some(format!("{:#}", e)),
                    });
                }
            }
        }
    }

    let report = BatchReport {
        total,
        passed,
        failed,
        results,
    };
    let report_path = out_dir.join(REPORT_FILE);
    std::fs::write(&report_path, serde_json::to_string_pretty(&report)?)
        .with_context(|| format!("failed to write {}", report_path.display()))?;

    println!("\n{}", "=".repeat(60));
    println!(
        "{} {} {}",
        "Batch Summary".bold(),
        "•".dimmed(),
        format!("{:.1}s total", batch_start.elapsed().as_secs_f64()).dimmed()
    );
    println!("  Total:  {}", total);
    println!(
        "  Passed: {}",
        if failed == 0 {
            passed.to_string().green()
        } else {
            passed.to_string().normal()
        }
    );
    println!(
        "  Failed: {}",
        if failed > 0 {
            failed.to_string().red()
        } else {
            failed.to_string().normal()
        }
    );
    println!("Report: {}", report_path.display());

    if failed > 0 {
        Ok(ExitCode::from(1))
    } else {
        Ok(ExitCode::SUCCESS)
    }
}

/// `{out_dir}/{condition}_{channel}.csv`
pub fn output_path(out_dir: &Path, condition: &str, kind: ChannelKind) -> PathBuf {
    out_dir.join(format!("{}_{}.csv", condition, kind))
}

fn select_conditions<'a>(
    conditions: &'a [ConditionConfig],
    filter: &[String],
) -> Result<Vec<&'a ConditionConfig>> {
    if filter.is_empty() {
        return Ok(conditions.iter().collect());
    }
    for name in filter {
        if !conditions.iter().any(|c| &c.name == name) {
            bail!("unknown condition '{}'", name);
        }
    }
    Ok(conditions
        .iter()
        .filter(|c| filter.contains(&c.name))
        .collect())
}

fn dedup_channels(channels: &[ChannelKind]) -> Vec<ChannelKind> {
    let mut unique = Vec::with_capacity(channels.len());
    for &kind in channels {
        if !unique.contains(&kind) {
            unique.push(kind);
        }
    }
    unique
}

#[derive(Debug, Serialize)]
struct BatchReport {
    total: usize,
    passed: usize,
    failed: usize,
    results: Vec<BatchResult>,
}

#[derive(Debug, Serialize)]
struct BatchResult {
    condition: String,
    channel: ChannelKind,
    output: Option<String>,
    words: usize,
    filled_cells: usize,
    error: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn condition(name: &str) -> ConditionConfig {
        ConditionConfig {
            name: name.to_string(),
            word_lists: vec![PathBuf::from(format!("{name}.txt"))],
        }
    }

    #[test]
    fn test_output_path() {
        assert_eq!(
            output_path(Path::new("rdms"), "list1", ChannelKind::SyntacticCategory),
            PathBuf::from("rdms/list1_syntactic-category.csv")
        );
    }

    #[test]
    fn test_select_conditions() {
        let all = vec![condition("list1"), condition("list2")];
        assert_eq!(select_conditions(&all, &[]).unwrap().len(), 2);

        let picked = select_conditions(&all, &["list2".to_string()]).unwrap();
        assert_eq!(picked.len(), 1);
        assert_eq!(picked[0].name, "list2");

        assert!(select_conditions(&all, &["list3".to_string()]).is_err());
    }

    #[test]
    fn test_dedup_channels_keeps_order() {
        let channels = [
            ChannelKind::Semantic,
            ChannelKind::WordLength,
            ChannelKind::Semantic,
        ];
        assert_eq!(
            dedup_channels(&channels),
            vec![ChannelKind::Semantic, ChannelKind::WordLength]
        );
    }
}
