//! Channels command implementation
//!
//! Lists every channel with its shape, required asset and computation.

use anyhow::Result;
use colored::Colorize;
use serde::Serialize;
use std::process::ExitCode;

use wordrdm_spec::{ChannelKind, ChannelShape};

#[derive(Debug, Serialize)]
struct ChannelInfo {
    name: ChannelKind,
    shape: ChannelShape,
    asset: Option<&'static str>,
    description: &'static str,
    excluded_words: &'static [&'static str],
}

fn channel_infos() -> Vec<ChannelInfo> {
    ChannelKind::ALL
        .iter()
        .map(|&kind| ChannelInfo {
            name: kind,
            shape: kind.shape(),
            asset: kind.required_asset(),
            description: kind.description(),
            excluded_words: kind.excluded_words(),
        })
        .collect()
}

/// Run the channels command
pub fn run(json: bool) -> Result<ExitCode> {
    let infos = channel_infos();

    if json {
        println!("{}", serde_json::to_string_pretty(&infos)?);
        return Ok(ExitCode::SUCCESS);
    }

    println!("{}", "Channels:".bold());
    for info in &infos {
        let shape = match info.shape {
            ChannelShape::Pairwise => "pairwise",
            ChannelShape::Joint => "joint",
            ChannelShape::Aggregated => "aggregated",
        };
        println!(
            "  {:<20} {:<11} {}",
            info.name.as_str().cyan(),
            shape,
            info.description
        );
        match info.asset {
            Some(asset) => println!("  {:<20} {}", "", format!("needs: {}", asset).dimmed()),
            None => println!("  {:<20} {}", "", "needs: nothing".dimmed()),
        }
        if !info.excluded_words.is_empty() {
            println!(
                "  {:<20} {}",
                "",
                format!("always drops: {}", info.excluded_words.join(", ")).dimmed()
            );
        }
    }

    Ok(ExitCode::SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_channel_infos_json() {
        let value = serde_json::to_value(channel_infos()).unwrap();
        let entries = value.as_array().unwrap();
        assert_eq!(entries.len(), ChannelKind::ALL.len());

        let acoustic = entries
            .iter()
            .find(|e| e["name"] == "acoustic")
            .unwrap();
        assert_eq!(acoustic["shape"], "aggregated");
        assert_eq!(acoustic["asset"], "audio");

        let imageability = entries
            .iter()
            .find(|e| e["name"] == "imageability")
            .unwrap();
        assert_eq!(imageability["excluded_words"].as_array().unwrap().len(), 8);

        let length = entries
            .iter()
            .find(|e| e["name"] == "word-length")
            .unwrap();
        assert!(length["asset"].is_null());
    }
}
