use super::types::ConnectorError;

#[derive(Debug, Clone)]
pub struct ErrorClassification {
    pub error_type: &'static str,
    pub retryable: bool,
}

impl ConnectorError {
    /// Classify this error to determine its type and whether a request that
    /// produced it can be retried.
    pub fn classify(&self) -> ErrorClassification {
        match self {
            // Transient transport conditions
            ConnectorError::RateLimit(_) => ErrorClassification {
                error_type: "RateLimitError",
                retryable: true,
            },
            ConnectorError::Network(_) => ErrorClassification {
                error_type: "NetworkError",
                retryable: true,
            },
            ConnectorError::Timeout(_) => ErrorClassification {
                error_type: "TimeoutError",
                retryable: true,
            },
            ConnectorError::Api { status, .. } => ErrorClassification {
                error_type: "ApiError",
                retryable: *status >= 500,
            },

            // Everything below is deterministic
            ConnectorError::Authentication(_) => ErrorClassification {
                error_type: "AuthenticationError",
                retryable: false,
            },
            ConnectorError::Config(_) => ErrorClassification {
                error_type: "ConfigError",
                retryable: false,
            },
            ConnectorError::Scanner { .. } => ErrorClassification {
                error_type: "ScannerError",
                retryable: false,
            },
            ConnectorError::Observer { .. } => ErrorClassification {
                error_type: "ObserverError",
                retryable: false,
            },
            ConnectorError::Io(_) => ErrorClassification {
                error_type: "IoError",
                retryable: false,
            },
            ConnectorError::Json(_) => ErrorClassification {
                error_type: "JsonError",
                retryable: false,
            },
            ConnectorError::Yaml(_) => ErrorClassification {
                error_type: "YamlError",
                retryable: false,
            },
            ConnectorError::Internal(_) => ErrorClassification {
                error_type: "InternalError",
                retryable: false,
            },
        }
    }
}
