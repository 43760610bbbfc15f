//! `sluice grok` command handler

use std::io::{BufRead, Write};

use serde::Serialize;
use tracing::info;

use sluice_core::config::SluiceConfig;
use sluice_core::value::{Map, Value};
use sluice_transformer::{GrokCompiler, GrokConfig, GrokMatcher};

use crate::cli::GrokArgs;
use crate::commands::parse_inline_patterns;
use crate::error::CliError;
use crate::output::{OutputWriter, Render};

/// Execute the `grok` command.
///
/// Pattern sources may be URLs fetched with a blocking client, so the
/// library is built on the blocking thread pool.
pub async fn execute(
    args: GrokArgs,
    config: &SluiceConfig,
    writer: &OutputWriter,
) -> Result<(), CliError> {
    let grok_config = grok_config(&args, config)?;
    let matcher = tokio::task::spawn_blocking(move || build_matcher(&grok_config)).await??;

    let inputs = if args.inputs.is_empty() {
        read_lines(std::io::stdin().lock())?
    } else {
        args.inputs
    };

    info!(expr = %args.match_expr, inputs = inputs.len(), "matching grok expression");

    let report = match_inputs(&matcher, &inputs);
    writer.render(&report)?;

    if report.unmatched > 0 {
        return Err(CliError::NoMatch(report.unmatched));
    }
    Ok(())
}

fn grok_config(args: &GrokArgs, config: &SluiceConfig) -> Result<GrokConfig, CliError> {
    let mut pattern_paths = config.transformer.pattern_paths.clone();
    pattern_paths.extend(args.pattern_paths.iter().cloned());

    Ok(GrokConfig {
        match_expr: args.match_expr.clone(),
        ignore_blank: Some(!args.keep_blank),
        pattern_paths,
        pattern: parse_inline_patterns(&args.patterns)?.into_iter().collect(),
    })
}

fn build_matcher(config: &GrokConfig) -> Result<GrokMatcher, CliError> {
    let library = config.build_library();
    let compiled = GrokCompiler::new(&library)?.compile(&config.match_expr)?;
    Ok(GrokMatcher::new(compiled, config.ignore_blank.unwrap_or(true)))
}

fn read_lines(reader: impl BufRead) -> Result<Vec<String>, CliError> {
    let mut lines = Vec::new();
    for line in reader.lines() {
        let line = line?;
        if !line.is_empty() {
            lines.push(line);
        }
    }
    Ok(lines)
}

fn match_inputs(matcher: &GrokMatcher, inputs: &[String]) -> GrokReport {
    let results: Vec<GrokResult> = inputs
        .iter()
        .map(|input| {
            let fields = matcher.extract(input);
            GrokResult {
                input: input.clone(),
                matched: !fields.is_empty(),
                fields,
            }
        })
        .collect();

    GrokReport {
        expr: matcher.compiled().expr().to_owned(),
        total: results.len(),
        unmatched: results.iter().filter(|r| !r.matched).count(),
        results,
    }
}

#[derive(Serialize)]
pub struct GrokReport {
    pub expr: String,
    pub total: usize,
    pub unmatched: usize,
    pub results: Vec<GrokResult>,
}

#[derive(Serialize)]
pub struct GrokResult {
    pub input: String,
    pub matched: bool,
    pub fields: Map,
}

impl Render for GrokReport {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        use colored::Colorize;

        writeln!(w, "Grok: {}", self.expr.bold())?;
        for result in &self.results {
            writeln!(w)?;
            writeln!(w, "{}", result.input)?;
            if !result.matched {
                writeln!(w, "  {}", "no match".red())?;
                continue;
            }
            for (name, value) in &result.fields {
                let shown = match value {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                };
                writeln!(w, "  {:<20} {}", name.cyan(), shown)?;
            }
        }
        writeln!(w)?;
        writeln!(
            w,
            "{} input(s), {} matched, {} unmatched",
            self.total,
            self.total - self.unmatched,
            self.unmatched
        )?;
        Ok(())
    }
}
