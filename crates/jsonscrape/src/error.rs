use jsonscrape_core::settings::SettingsError;

/// Error taxonomy for a scrape run.
///
/// Config errors are fatal and never retried. Fetch errors (`Http`,
/// `Network`, `Parse`) may be retried per the retry policy until
/// classified non-retryable or exhausted. Write errors are fatal.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Invalid settings: {0}")]
    Config(String),

    #[error(transparent)]
    Settings(#[from] SettingsError),

    #[error("HTTP {status} while requesting {url}")]
    Http { status: u16, url: String },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Failed to parse response: {0}")]
    Parse(String),

    #[error("Failed to write output: {0}")]
    Write(String),
}

impl Error {
    /// HTTP status attached to the failure, when there is one.
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}
