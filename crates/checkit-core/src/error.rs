use thiserror::Error;

#[derive(Error, Debug)]
pub enum CheckitError {
    #[error("Deployment ID is missing. Please configure your settings.")]
    ConfigurationMissing,

    #[error("Network error: {0}")]
    Network(String),

    #[error("Format error: {0}")]
    Format(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CheckitError {
    /// Errors that come from the sheet endpoint and render as the inline
    /// "failed to load" panel.
    pub fn is_load_failure(&self) -> bool {
        matches!(self, Self::Network(_) | Self::Format(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_failure_classification() {
        assert!(CheckitError::Network("HTTP 500".into()).is_load_failure());
        assert!(CheckitError::Format("not an object".into()).is_load_failure());
        assert!(!CheckitError::ConfigurationMissing.is_load_failure());
        assert!(!CheckitError::Validation("title".into()).is_load_failure());
    }

    #[test]
    fn test_configuration_missing_message() {
        let message = CheckitError::ConfigurationMissing.to_string();
        assert!(message.contains("Deployment ID is missing"));
    }
}
