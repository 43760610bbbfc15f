//! `sluice patterns` command handler

use std::io::Write;

use serde::Serialize;
use tracing::info;

use sluice_core::config::SluiceConfig;
use sluice_transformer::PatternLibrary;

use crate::cli::PatternsArgs;
use crate::error::CliError;
use crate::output::{OutputWriter, Render};

/// Execute the `patterns` command.
pub async fn execute(
    args: PatternsArgs,
    config: &SluiceConfig,
    writer: &OutputWriter,
) -> Result<(), CliError> {
    let mut sources = config.transformer.pattern_paths.clone();
    sources.extend(args.pattern_paths);

    info!(sources = sources.len(), "building pattern library");

    let (library, failed) = tokio::task::spawn_blocking(move || {
        let mut library = PatternLibrary::builtin();
        let failed = library.load_sources(&sources);
        (library, failed)
    })
    .await?;

    let report = PatternListReport::from_library(&library, failed);
    writer.render(&report)?;
    Ok(())
}

#[derive(Serialize)]
pub struct PatternListReport {
    pub total: usize,
    pub failed_sources: usize,
    pub patterns: Vec<PatternEntry>,
}

#[derive(Serialize)]
pub struct PatternEntry {
    pub name: String,
    pub fragment: String,
}

impl PatternListReport {
    fn from_library(library: &PatternLibrary, failed_sources: usize) -> Self {
        let patterns: Vec<PatternEntry> = library
            .sorted()
            .into_iter()
            .map(|(name, fragment)| PatternEntry {
                name: name.to_owned(),
                fragment: fragment.to_owned(),
            })
            .collect();
        Self {
            total: patterns.len(),
            failed_sources,
            patterns,
        }
    }
}

impl Render for PatternListReport {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        use colored::Colorize;

        writeln!(
            w,
            "Grok Patterns ({} total)",
            self.total.to_string().bold()
        )?;
        if self.failed_sources > 0 {
            writeln!(
                w,
                "{}",
                format!("{} pattern source(s) failed to load", self.failed_sources).yellow()
            )?;
        }
        writeln!(w)?;
        writeln!(w, "{:<16} Fragment", "Name")?;
        writeln!(w, "{}", "-".repeat(90))?;

        for p in &self.patterns {
            writeln!(w, "{:<16} {}", p.name, p.fragment)?;
        }

        Ok(())
    }
}
