use thiserror::Error;

#[derive(Error, Debug)]
pub enum IngestError {
    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("NewsAPI returned status '{status}' ({code}): {message}")]
    ApiStatusError {
        status: String,
        code: String,
        message: String,
    },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Configuration validation failed for {field}: {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Data processing error: {message}")]
    ProcessingError { message: String },

    #[error("Validation error: {message}")]
    ValidationError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Api,
    Storage,
    Configuration,
    Data,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl IngestError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            IngestError::ApiError(_) => ErrorCategory::Network,
            IngestError::ApiStatusError { .. } => ErrorCategory::Api,
            IngestError::IoError(_) => ErrorCategory::Storage,
            IngestError::SerializationError(_)
            | IngestError::ProcessingError { .. }
            | IngestError::ValidationError { .. } => ErrorCategory::Data,
            IngestError::ConfigError { .. }
            | IngestError::MissingConfigError { .. }
            | IngestError::InvalidConfigValueError { .. }
            | IngestError::ConfigValidationError { .. } => ErrorCategory::Configuration,
        }
    }

    /// 嚴重程度決定 CLI 的退出碼
    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            // 網路問題通常重試即可
            ErrorCategory::Network | ErrorCategory::Api => ErrorSeverity::Medium,
            ErrorCategory::Data | ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::Storage => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            IngestError::ApiError(_) => {
                "Check network connectivity and that the NewsAPI endpoint is reachable".to_string()
            }
            IngestError::ApiStatusError { code, .. } => match code.as_str() {
                "apiKeyInvalid" | "apiKeyMissing" | "apiKeyDisabled" => {
                    "Verify the NEWSAPI_KEY value or pass --api-key".to_string()
                }
                "rateLimited" => "Wait for the NewsAPI rate limit window to reset".to_string(),
                _ => "Inspect the API message and the request parameters".to_string(),
            },
            IngestError::IoError(_) => {
                "Check that the data directory exists and is writable".to_string()
            }
            IngestError::SerializationError(_) => {
                "Remove the corrupt cache file and rerun".to_string()
            }
            IngestError::MissingConfigError { field } => {
                format!("Provide a value for '{}'", field)
            }
            IngestError::InvalidConfigValueError { field, .. }
            | IngestError::ConfigValidationError { field, .. } => {
                format!("Fix the value of '{}' in the configuration", field)
            }
            IngestError::ConfigError { .. } => "Review the configuration file".to_string(),
            IngestError::ProcessingError { .. } | IngestError::ValidationError { .. } => {
                "Rerun with --verbose for details".to_string()
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Network => format!("Could not reach the news API: {}", self),
            ErrorCategory::Api => format!("The news API rejected the request: {}", self),
            ErrorCategory::Storage => format!("Could not read or write local files: {}", self),
            ErrorCategory::Configuration => format!("Invalid configuration: {}", self),
            ErrorCategory::Data => format!("Could not process article data: {}", self),
        }
    }
}

pub type Result<T> = std::result::Result<T, IngestError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_errors_are_high_severity() {
        let err = IngestError::MissingConfigError {
            field: "api_key".to_string(),
        };
        assert_eq!(err.category(), ErrorCategory::Configuration);
        assert_eq!(err.severity(), ErrorSeverity::High);
        assert!(err.recovery_suggestion().contains("api_key"));
    }

    #[test]
    fn test_api_status_error_suggestions() {
        let err = IngestError::ApiStatusError {
            status: "error".to_string(),
            code: "apiKeyInvalid".to_string(),
            message: "Your API key is invalid or incorrect.".to_string(),
        };
        assert_eq!(err.severity(), ErrorSeverity::Medium);
        assert!(err.recovery_suggestion().contains("NEWSAPI_KEY"));

        let limited = IngestError::ApiStatusError {
            status: "error".to_string(),
            code: "rateLimited".to_string(),
            message: "slow down".to_string(),
        };
        assert!(limited.recovery_suggestion().contains("rate limit"));
    }

    #[test]
    fn test_processing_error_is_a_data_error() {
        let err = IngestError::ProcessingError {
            message: "allocation overshoot".to_string(),
        };
        assert_eq!(err.category(), ErrorCategory::Data);
        assert_eq!(err.severity(), ErrorSeverity::High);
    }

    #[test]
    fn test_io_error_is_critical() {
        let err = IngestError::from(std::io::Error::new(
            std::io::ErrorKind::PermissionDenied,
            "denied",
        ));
        assert_eq!(err.severity(), ErrorSeverity::Critical);
        assert!(err.user_friendly_message().starts_with("Could not read or write"));
    }
}
