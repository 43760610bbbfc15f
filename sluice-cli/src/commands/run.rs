//! `sluice run` command handler
//!
//! Reads one event per line. A JSON object line becomes the event header,
//! with its `body` member taken as the raw body; any other line is used as
//! the body of an event with an empty header. Transformed events are written
//! to stdout as JSON lines.

use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use sluice_core::config::{SluiceConfig, TransformerSection};
use sluice_core::event::{BODY_FIELD, Event};
use sluice_core::metrics as sluice_metrics;
use sluice_core::value::Value;
use sluice_transformer::{ActionRegistry, Transformer, TransformerBuilder, TransformerConfig};

use crate::cli::RunArgs;
use crate::error::CliError;

/// Counters for one `run` invocation.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RunStats {
    pub read: usize,
    pub emitted: usize,
    pub failed: usize,
    pub dropped: usize,
}

/// Execute the `run` command.
///
/// Transformer construction may fetch pattern URLs with a blocking client,
/// so the whole run happens on the blocking thread pool.
pub async fn execute(args: RunArgs, config: SluiceConfig) -> Result<(), CliError> {
    let actions_path = actions_path(args.actions, &config)?;
    let input = args.input;

    let stats = tokio::task::spawn_blocking(move || -> Result<RunStats, CliError> {
        let transformer = build_transformer(&actions_path, &config)?;

        let stdout = std::io::stdout();
        let mut out = BufWriter::new(stdout.lock());
        let stats = match input {
            Some(path) => {
                let file = std::fs::File::open(&path)?;
                process(&transformer, &config.transformer, BufReader::new(file), &mut out)?
            }
            None => process(
                &transformer,
                &config.transformer,
                std::io::stdin().lock(),
                &mut out,
            )?,
        };
        out.flush()?;
        Ok(stats)
    })
    .await??;

    info!(
        read = stats.read,
        emitted = stats.emitted,
        failed = stats.failed,
        dropped = stats.dropped,
        "run finished"
    );
    Ok(())
}

fn actions_path(flag: Option<PathBuf>, config: &SluiceConfig) -> Result<PathBuf, CliError> {
    if let Some(path) = flag {
        return Ok(path);
    }
    if config.transformer.actions_file.is_empty() {
        return Err(CliError::Config(
            "no actions file: pass --actions or set transformer.actions_file".to_owned(),
        ));
    }
    Ok(PathBuf::from(&config.transformer.actions_file))
}

/// Parse the actions file and compile every step.
pub(crate) fn build_transformer(path: &Path, config: &SluiceConfig) -> Result<Transformer, CliError> {
    info!(path = %path.display(), "loading actions");
    let actions = TransformerConfig::from_file(path)?;
    let registry = ActionRegistry::with_builtins();
    let transformer = TransformerBuilder::new(&registry)
        .global_pattern_paths(config.transformer.pattern_paths.iter().cloned())
        .build(&actions)?;
    Ok(transformer)
}

/// Transform every line of `reader`, writing surviving events to `out`.
pub fn process(
    transformer: &Transformer,
    section: &TransformerSection,
    reader: impl BufRead,
    out: &mut dyn Write,
) -> Result<RunStats, CliError> {
    let mut stats = RunStats::default();

    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        stats.read += 1;
        let lineno = index + 1;

        let mut event = parse_event(&line);
        if event.body().len() > section.max_body_size {
            warn!(
                line = lineno,
                size = event.body().len(),
                limit = section.max_body_size,
                "event body exceeds max_body_size, dropping"
            );
            drop_event(&mut stats);
            continue;
        }

        if let Err(e) = transformer.transform(&mut event) {
            stats.failed += 1;
            warn!(line = lineno, error = %e, "transform failed");
            if section.drops_on_error() {
                drop_event(&mut stats);
                continue;
            }
        }

        write_event(out, event)?;
        stats.emitted += 1;
    }

    Ok(stats)
}

fn drop_event(stats: &mut RunStats) {
    stats.dropped += 1;
    metrics::counter!(sluice_metrics::TRANSFORMER_EVENTS_DROPPED_TOTAL).increment(1);
}

fn parse_event(line: &str) -> Event {
    let Ok(Value::Map(mut header)) = serde_json::from_str::<Value>(line) else {
        return Event::from_body(line.to_owned());
    };
    let body = match header.remove(BODY_FIELD) {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s,
        Some(other) => other.to_string(),
    };
    Event::new(header, body)
}

fn write_event(out: &mut dyn Write, event: Event) -> Result<(), CliError> {
    let (mut header, body) = event.into_parts();
    if !body.is_empty() {
        header.insert(
            BODY_FIELD.to_owned(),
            Value::String(String::from_utf8_lossy(&body).into_owned()),
        );
    }
    serde_json::to_writer(&mut *out, &header)?;
    writeln!(out)?;
    Ok(())
}
