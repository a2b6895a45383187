use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("cannot read {path}: {source}")]
    Load {
        path: String,
        #[source]
        source: csv::Error,
    },

    #[error("missing required column(s): {}", .columns.join(", "))]
    MissingColumns { columns: Vec<String> },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("chart error: {0}")]
    Chart(String),
}

impl<E: std::error::Error + Send + Sync + 'static> From<plotters::drawing::DrawingAreaErrorKind<E>>
    for ReportError
{
    fn from(err: plotters::drawing::DrawingAreaErrorKind<E>) -> Self {
        ReportError::Chart(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ReportError>;
