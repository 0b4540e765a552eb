use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReportBoardError {
    #[error("Unknown {kind}: {label:?}")]
    UnknownLabel { kind: &'static str, label: String },

    #[error("Invalid filter criteria: {0}")]
    InvalidCriteria(String),

    #[error("Load error: {0}")]
    Load(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, ReportBoardError>;
