//! Domain error types.

/// Top-level error type for putscout.
#[derive(Debug, thiserror::Error)]
pub enum PutscoutError {
    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("data unavailable for {symbol}: {reason}")]
    DataUnavailable { symbol: String, reason: String },

    #[error("insufficient data for {what}: have {have} observations, need {need}")]
    InsufficientData {
        what: String,
        have: usize,
        need: usize,
    },

    #[error("invalid price series: {reason}")]
    InvalidSeries { reason: String },

    #[error("trade log error: {reason}")]
    TradeLog { reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl PutscoutError {
    pub fn config_invalid(section: &str, key: &str, reason: impl Into<String>) -> Self {
        PutscoutError::ConfigInvalid {
            section: section.to_string(),
            key: key.to_string(),
            reason: reason.into(),
        }
    }
}

impl From<&PutscoutError> for std::process::ExitCode {
    fn from(err: &PutscoutError) -> Self {
        let code: u8 = match err {
            PutscoutError::Io(_) => 1,
            PutscoutError::ConfigParse { .. }
            | PutscoutError::ConfigMissing { .. }
            | PutscoutError::ConfigInvalid { .. } => 2,
            PutscoutError::TradeLog { .. } => 3,
            PutscoutError::DataUnavailable { .. }
            | PutscoutError::InsufficientData { .. }
            | PutscoutError::InvalidSeries { .. } => 5,
        };
        std::process::ExitCode::from(code)
    }
}
