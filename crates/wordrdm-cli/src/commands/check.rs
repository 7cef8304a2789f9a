//! Check command implementation
//!
//! Loads a study and every asset it declares, then reports which words of
//! each condition a channel could not resolve.

use anyhow::Result;
use colored::Colorize;
use std::process::ExitCode;

use wordrdm_spec::{ChannelKind, StudyConfig, WordSet};

use crate::registry::Assets;

/// Channels worth checking: the declared batch channels, or every channel
/// whose asset section is present.
fn channels_to_check(config: &StudyConfig) -> Vec<ChannelKind> {
    if config.channels.is_empty() {
        ChannelKind::ALL
            .iter()
            .copied()
            .filter(|&kind| config.has_asset_for(kind))
            .collect()
    } else {
        let mut channels = config.channels.clone();
        channels.sort();
        channels.dedup();
        channels
    }
}

/// Run the check command
///
/// # Returns
/// Exit code: 0 if every build would succeed, 1 otherwise
pub fn run(study: &str) -> Result<ExitCode> {
    println!("{}", "WordRDM Check".cyan().bold());
    println!("{}", "=============".cyan());
    println!();

    let config = super::load_study(Some(study))?;
    let mut all_ok = true;

    println!("{}", "Assets:".bold());
    let mut usable = Vec::new();
    for kind in channels_to_check(&config) {
        match Assets::load(&config, &[kind]) {
            Ok(assets) => {
                let source = kind.required_asset().unwrap_or("built-in");
                println!("  {} {:<20} {}", "ok".green(), kind.as_str(), source.dimmed());
                usable.push((kind, assets));
            }
            Err(e) => {
                println!("  {} {:<20} {:#}", "!!".red(), kind.as_str(), e);
                all_ok = false;
            }
        }
    }
    println!();

    println!("{}", "Conditions:".bold());
    if config.conditions.is_empty() {
        println!("  {} no conditions declared", "->".yellow());
    }
    for condition in &config.conditions {
        let words = match WordSet::from_files(&condition.word_lists) {
            Ok(words) => words,
            Err(e) => {
                println!("  {} {}: {}", "!!".red(), condition.name, e);
                all_ok = false;
                continue;
            }
        };
        println!(
            "  {} {} ({} words)",
            "->".green(),
            condition.name.bold(),
            words.len()
        );

        for (kind, assets) in &usable {
            match assets.unresolved_words(&config, *kind, &words) {
                Ok(missing) if missing.is_empty() => {
                    println!("     {} {}", "ok".green(), kind);
                }
                Ok(missing) => {
                    // A missing recording only empties cells; a lookup miss aborts the build.
                    let (marker, fatal) = if *kind == ChannelKind::Acoustic {
                        ("!!".yellow(), false)
                    } else {
                        ("!!".red(), true)
                    };
                    println!(
                        "     {} {}: {} unresolved: {}",
                        marker,
                        kind,
                        missing.len(),
                        missing.join(", ")
                    );
                    if fatal {
                        all_ok = false;
                    }
                }
                Err(e) => {
                    println!("     {} {}: {:#}", "!!".red(), kind, e);
                    all_ok = false;
                }
            }
        }
    }
    println!();

    if all_ok {
        println!("{}", "All checks passed.".green().bold());
        Ok(ExitCode::SUCCESS)
    } else {
        println!("{}", "Some checks failed.".red().bold());
        Ok(ExitCode::from(1))
    }
}
