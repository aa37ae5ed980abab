use thiserror::Error;

#[derive(Error, Debug)]
pub enum MatchError {
    #[error("CSV read failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML deserialization failed: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Missing required field '{field}' for {row}")]
    MissingField { field: String, row: String },

    #[error("Participant '{0}' appears more than once in the survey")]
    DuplicateParticipant(String),

    #[error("Forced pairing violated: {creator} must create for {expected}, but was assigned {actual}")]
    ForcedPairingViolated {
        creator: String,
        expected: String,
        actual: String,
    },
}

pub type Result<T> = std::result::Result<T, MatchError>;
