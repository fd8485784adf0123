use std::path::PathBuf;

/// Errors raised by the catalog, planning and rename pipeline.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid input: {0}")]
    Validation(String),

    #[error("malformed data: {0}")]
    MalformedData(String),

    #[error("missing column '{0}' in CSV header")]
    MissingColumn(String),

    #[error("could not find season {0}, try again")]
    SeasonNotFound(u32),

    #[error("could not find show '{0}'")]
    ShowNotFound(String),

    #[error("no episode list found at {0:?}, generate it first")]
    ListMissing(PathBuf),

    #[error("HTTP error {status} while fetching {url}")]
    HttpStatus {
        url: String,
        status: reqwest::StatusCode,
    },

    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("operation cancelled")]
    Cancelled,
}

pub type Result<T> = std::result::Result<T, Error>;

/// Rejects blank required string input before any I/O happens.
pub(crate) fn require_non_blank(value: &str, what: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(Error::Validation(format!("{} is required", what)));
    }
    Ok(())
}
