//! CLI error type and exit codes.

use netbox_client::NetBoxError;
use thiserror::Error;

/// Exit code for configuration problems (missing URL/token, bad values)
pub const EXIT_CONFIG: i32 = 2;

/// Exit code for every other failure
pub const EXIT_FAILURE: i32 = 1;

/// Errors surfaced by `nbpull` commands
#[derive(Debug, Error)]
pub enum CliError {
    /// Settings are missing or malformed; nothing was sent to NetBox
    #[error("configuration error: {0}")]
    Config(String),

    /// User-supplied input (batch file, arguments) is unusable
    #[error("{0}")]
    Input(String),

    /// NetBox client error
    #[error(transparent)]
    NetBox(#[from] NetBoxError),

    /// Local I/O or rendering failure
    #[error(transparent)]
    Failure(#[from] anyhow::Error),
}

/// Convenience alias for functions returning a `CliError`.
pub type CliResult<T> = Result<T, CliError>;

impl CliError {
    /// Process exit code for this error
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_) => EXIT_CONFIG,
            Self::NetBox(err) if err.is_config() => EXIT_CONFIG,
            _ => EXIT_FAILURE,
        }
    }

    /// Extra guidance printed under the error message, if any
    #[must_use]
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            Self::Config(_) | Self::NetBox(NetBoxError::InvalidConfig(_)) => Some(
                "Make sure NETBOX_URL and NETBOX_TOKEN are set in your .env file or environment \
                 variables, or run `nbpull setup`.",
            ),
            Self::NetBox(NetBoxError::Status { status: 401 | 403, .. }) => {
                Some("Check that the API token is valid and has read permission.")
            }
            _ => None,
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        Self::Failure(err.into())
    }
}
