use thiserror::Error;

pub type Result<T> = std::result::Result<T, ReportError>;

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Period text that is neither `YYYY-MM`, `YYYY` nor `all`.
    #[error("Invalid period '{0}': expected YYYY-MM, YYYY or all")]
    InvalidPeriod(String),
}
