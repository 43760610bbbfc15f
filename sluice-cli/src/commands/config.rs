//! `sluice config` command handler

use std::io::Write;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::info;

use sluice_core::config::SluiceConfig;

use crate::cli::{ConfigAction, ConfigArgs};
use crate::commands::run::build_transformer;
use crate::error::CliError;
use crate::output::{OutputWriter, Render};

/// Execute the `config` command.
pub async fn execute(
    args: ConfigArgs,
    config_path: &Path,
    writer: &OutputWriter,
) -> Result<(), CliError> {
    match args.action {
        ConfigAction::Validate => execute_validate(config_path, writer).await,
        ConfigAction::Show { section } => execute_show(config_path, section, writer).await,
    }
}

/// Load and validate the configuration file, then build the transformer
/// from the referenced actions file if one is set.
///
/// # Errors
///
/// Returns `CliError::Config` if any check fails.
async fn execute_validate(config_path: &Path, writer: &OutputWriter) -> Result<(), CliError> {
    info!(path = %config_path.display(), "validating configuration");

    let report = validate(config_path).await;
    writer.render(&report)?;

    if !report.valid {
        return Err(CliError::Config("configuration is invalid".to_owned()));
    }

    Ok(())
}

async fn validate(config_path: &Path) -> ConfigValidationReport {
    let mut errors = Vec::new();
    let mut actions = None;

    match SluiceConfig::load(config_path).await {
        Ok(config) => {
            let actions_file = config.transformer.actions_file.clone();
            if !actions_file.is_empty() {
                let path = PathBuf::from(&actions_file);
                // pattern URLs are fetched with a blocking client
                let built = tokio::task::spawn_blocking(move || {
                    build_transformer(&path, &config).map(|t| t.len())
                })
                .await;
                match built {
                    Ok(Ok(steps)) => actions = Some(steps),
                    Ok(Err(e)) => errors.push(format!("{actions_file}: {e}")),
                    Err(e) => errors.push(format!("{actions_file}: {e}")),
                }
            }
        }
        Err(e) => errors.push(e.to_string()),
    }

    ConfigValidationReport {
        source: config_path.display().to_string(),
        valid: errors.is_empty(),
        actions,
        errors,
    }
}

/// Show the effective configuration (file + env overrides + defaults).
///
/// # Errors
///
/// Returns `CliError::Core` if loading fails or `CliError::Command` if the
/// section name is unknown.
async fn execute_show(
    config_path: &Path,
    section: Option<String>,
    writer: &OutputWriter,
) -> Result<(), CliError> {
    info!(path = %config_path.display(), "loading configuration");

    let config = SluiceConfig::load(config_path).await?;

    let config_toml = match section.as_deref() {
        None => to_toml(&config),
        Some("general") => to_toml(&config.general),
        Some("transformer") => to_toml(&config.transformer),
        Some(other) => {
            return Err(CliError::Command(format!(
                "unknown section: {other} (expected: general, transformer)"
            )));
        }
    };

    let report = ConfigReport {
        source: config_path.display().to_string(),
        section,
        config_toml,
    };
    writer.render(&report)?;

    Ok(())
}

fn to_toml<T: Serialize>(value: &T) -> String {
    toml::to_string_pretty(value).unwrap_or_else(|e| format!("(serialization error: {e})"))
}

/// Configuration display report.
///
/// `config_toml` is only used for text rendering.
#[derive(Serialize)]
pub struct ConfigReport {
    /// Configuration file path
    pub source: String,
    /// Optional section name (None = full config)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub section: Option<String>,
    /// Serialized TOML configuration
    #[serde(skip)]
    pub config_toml: String,
}

impl Render for ConfigReport {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        use colored::Colorize;

        if let Some(ref section) = self.section {
            let section_label = format!("[{}]", section);
            writeln!(
                w,
                "Configuration {} (source: {})",
                section_label.bold(),
                self.source
            )?;
        } else {
            writeln!(w, "Configuration (source: {})", self.source.bold())?;
        }

        writeln!(w)?;
        write!(w, "{}", self.config_toml)?;

        Ok(())
    }
}

/// Configuration validation report.
#[derive(Serialize)]
pub struct ConfigValidationReport {
    /// Configuration file path
    pub source: String,
    /// Whether the configuration is valid
    pub valid: bool,
    /// Number of steps in the actions file, when one is configured and builds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actions: Option<usize>,
    /// Validation error messages (empty if valid)
    pub errors: Vec<String>,
}

impl Render for ConfigValidationReport {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        use colored::Colorize;

        writeln!(w, "Config Validation: {}", self.source.bold())?;

        if self.valid {
            writeln!(w, "  Result: {}", "VALID".green().bold())?;
        } else {
            writeln!(w, "  Result: {}", "INVALID".red().bold())?;
            for err in &self.errors {
                writeln!(w, "  Error: {}", err.red())?;
            }
        }
        if let Some(count) = self.actions {
            writeln!(w, "  Actions: {count} step(s)")?;
        }

        Ok(())
    }
}
