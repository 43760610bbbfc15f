//! CLI-specific error types and exit code mapping

use sluice_core::error::SluiceError;
use sluice_transformer::TransformError;

/// CLI-specific error type.
///
/// Each variant carries enough context for a user-friendly message.
/// The `exit_code()` method maps errors to standard Unix exit codes.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Configuration loading or validation failure.
    #[error("configuration error: {0}")]
    Config(String),

    /// A subcommand-specific operation failed.
    #[error("{0}")]
    Command(String),

    /// One or more grok inputs produced no fields.
    #[error("{0} input(s) did not match")]
    NoMatch(usize),

    /// JSON serialisation failed during output rendering.
    #[error("json output error: {0}")]
    JsonSerialize(#[from] serde_json::Error),

    /// IO error (file read, stdout write, etc.).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Wrapped domain error from sluice-core.
    #[error("{0}")]
    Core(#[from] SluiceError),

    /// Action construction or transformation failure.
    #[error("transform error: {0}")]
    Transform(#[from] TransformError),
}

impl CliError {
    /// Map the error to a process exit code.
    ///
    /// | Code | Meaning                        |
    /// |------|--------------------------------|
    /// | 0    | Success                        |
    /// | 1    | General / command error        |
    /// | 2    | Configuration error            |
    /// | 3    | Grok input did not match       |
    /// | 10   | IO error                       |
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_) | Self::Core(SluiceError::Config(_)) => 2,
            Self::NoMatch(_) => 3,
            Self::Io(_) | Self::Core(SluiceError::Io(_)) => 10,
            Self::JsonSerialize(_) | Self::Command(_) | Self::Core(_) | Self::Transform(_) => 1,
        }
    }
}

impl From<tokio::task::JoinError> for CliError {
    fn from(e: tokio::task::JoinError) -> Self {
        Self::Command(format!("worker task failed: {e}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sluice_core::error::ConfigError;

    #[test]
    fn test_exit_code_config_error() {
        let err = CliError::Config("test error".to_owned());
        assert_eq!(err.exit_code(), 2, "config error should return exit code 2");
    }

    #[test]
    fn test_exit_code_core_config_error() {
        let err = CliError::from(SluiceError::Config(ConfigError::FileNotFound {
            path: "sluice.toml".to_owned(),
        }));
        assert_eq!(
            err.exit_code(),
            2,
            "core config error should return exit code 2"
        );
    }

    #[test]
    fn test_exit_code_no_match() {
        let err = CliError::NoMatch(2);
        assert_eq!(err.exit_code(), 3, "no match should return exit code 3");
        assert_eq!(err.to_string(), "2 input(s) did not match");
    }

    #[test]
    fn test_exit_code_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err = CliError::Io(io_err);
        assert_eq!(err.exit_code(), 10, "io error should return exit code 10");
    }

    #[test]
    fn test_exit_code_command_error() {
        let err = CliError::Command("test error".to_owned());
        assert_eq!(
            err.exit_code(),
            1,
            "command error should return exit code 1"
        );
    }

    #[test]
    fn test_exit_code_transform_error() {
        let err = CliError::from(TransformError::config("grok", "'match' is required"));
        assert_eq!(err.exit_code(), 1, "transform error should return exit code 1");
        assert!(err.to_string().contains("'match' is required"));
    }

    #[test]
    fn test_error_display_config() {
        let err = CliError::Config("invalid TOML syntax".to_owned());
        let display_str = format!("{}", err);
        assert!(
            display_str.contains("configuration error"),
            "should include error context"
        );
        assert!(
            display_str.contains("invalid TOML syntax"),
            "should include error message"
        );
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "access denied");
        let cli_err: CliError = io_err.into();
        match cli_err {
            CliError::Io(e) => {
                assert_eq!(e.kind(), std::io::ErrorKind::PermissionDenied);
            }
            _ => panic!("expected Io error variant"),
        }
    }
}
