//! Command handlers -- one module per subcommand

pub mod config;
pub mod grok;
pub mod patterns;
pub mod run;

use std::path::Path;

use sluice_core::config::SluiceConfig;

use crate::error::CliError;

/// Load the configuration file, or defaults plus env overrides when it does not exist.
pub async fn load_config(path: &Path) -> Result<SluiceConfig, CliError> {
    if tokio::fs::try_exists(path).await.unwrap_or(false) {
        return Ok(SluiceConfig::load(path).await?);
    }

    tracing::debug!(path = %path.display(), "config file not found, using defaults");
    let mut config = SluiceConfig::default();
    config.apply_env_overrides();
    config.validate()?;
    Ok(config)
}

/// Parse repeatable `NAME=FRAGMENT` arguments.
pub fn parse_inline_patterns(specs: &[String]) -> Result<Vec<(String, String)>, CliError> {
    specs
        .iter()
        .map(|spec| match spec.split_once('=') {
            Some((name, fragment)) if !name.trim().is_empty() => {
                Ok((name.trim().to_owned(), fragment.to_owned()))
            }
            _ => Err(CliError::Command(format!(
                "invalid pattern '{spec}', expected NAME=FRAGMENT"
            ))),
        })
        .collect()
}
