use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConnectorError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Scanner '{resource_type}' failed: {source}")]
    Scanner {
        resource_type: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("Observer for {event_type} failed: {source}")]
    Observer {
        event_type: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("Inventory API error ({status}): {message}")]
    Api {
        status: u16,
        message: String,
        code: Option<i64>,
    },

    #[error("Authentication error: {0}")]
    Authentication(String),

    #[error("Rate limited: {0}")]
    RateLimit(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Timeout: {0}")]
    Timeout(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ConnectorError {
    pub fn scanner(resource_type: &str, source: anyhow::Error) -> Self {
        Self::Scanner {
            resource_type: resource_type.to_string(),
            source,
        }
    }

    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
            code: None,
        }
    }
}
