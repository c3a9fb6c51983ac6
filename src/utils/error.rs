use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConsoleError {
    #[error("HTTP request failed: {0}")]
    TransportError(#[from] reqwest::Error),

    /// 後端回傳非 2xx 狀態
    #[error("{message}")]
    ApiError { status: u16, message: String },

    #[error("CSV export error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Invalid URL: {0}")]
    UrlError(#[from] url::ParseError),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration error in '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Validation error: {message}")]
    ValidationError { message: String },

    #[error("Invalid record id: {id}")]
    InvalidRecordId { id: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Api,
    Data,
    Configuration,
    Input,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl ConsoleError {
    pub fn config(message: impl Into<String>) -> Self {
        Self::ConfigError {
            message: message.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::ValidationError {
            message: message.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::TransportError(_) => ErrorCategory::Network,
            Self::ApiError { .. } => ErrorCategory::Api,
            Self::CsvError(_) | Self::SerializationError(_) => ErrorCategory::Data,
            Self::ConfigError { .. }
            | Self::ConfigValidationError { .. }
            | Self::InvalidConfigValueError { .. }
            | Self::UrlError(_) => ErrorCategory::Configuration,
            Self::ValidationError { .. } | Self::InvalidRecordId { .. } => ErrorCategory::Input,
            Self::IoError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            Self::ApiError { status, .. } if *status < 500 => ErrorSeverity::High,
            // 5xx 或連線問題，重試通常有用
            Self::ApiError { .. } | Self::TransportError(_) => ErrorSeverity::Medium,
            Self::CsvError(_) | Self::SerializationError(_) => ErrorSeverity::High,
            Self::ConfigError { .. }
            | Self::ConfigValidationError { .. }
            | Self::InvalidConfigValueError { .. }
            | Self::UrlError(_)
            | Self::ValidationError { .. }
            | Self::InvalidRecordId { .. } => ErrorSeverity::High,
            Self::IoError(_) => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            Self::TransportError(_) => "Check that the trials backend is running and reachable (--api / TRIAL_API)",
            Self::ApiError { status, .. } if *status == 404 => "Check the record id or endpoint path",
            Self::ApiError { status, .. } if *status < 500 => "Check the request parameters",
            Self::ApiError { .. } => "The backend failed; check its logs and try again",
            Self::CsvError(_) | Self::IoError(_) => "Check the export path and file permissions",
            Self::SerializationError(_) => "The backend returned an unexpected payload",
            Self::ConfigError { .. }
            | Self::ConfigValidationError { .. }
            | Self::InvalidConfigValueError { .. }
            | Self::UrlError(_) => "Fix the configuration file or command-line flags",
            Self::ValidationError { .. } => "Check the command arguments",
            Self::InvalidRecordId { .. } => "Record ids look like '트라이얼(Y):12'",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            Self::TransportError(_) => "Could not reach the trials backend".to_string(),
            Self::ApiError { status, message } => format!("Backend error ({}): {}", status, message),
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ConsoleError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_severity_depends_on_status() {
        let client_side = ConsoleError::ApiError {
            status: 400,
            message: "invalid id".to_string(),
        };
        let server_side = ConsoleError::ApiError {
            status: 502,
            message: "HTTP 502".to_string(),
        };

        assert_eq!(client_side.severity(), ErrorSeverity::High);
        assert_eq!(server_side.severity(), ErrorSeverity::Medium);
        assert_eq!(client_side.category(), ErrorCategory::Api);
    }

    #[test]
    fn test_api_error_displays_backend_message() {
        let err = ConsoleError::ApiError {
            status: 400,
            message: "이메일이 없습니다.".to_string(),
        };
        assert_eq!(err.to_string(), "이메일이 없습니다.");
        assert!(err.user_friendly_message().contains("400"));
    }

    #[test]
    fn test_config_errors_are_configuration_category() {
        let err = ConsoleError::config("missing [api] table");
        assert_eq!(err.category(), ErrorCategory::Configuration);
        assert!(err.to_string().contains("missing [api] table"));
    }
}
