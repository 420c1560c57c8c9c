use thiserror::Error;

/// Main error type for the epsilon-greedy policy
#[derive(Error, Debug)]
pub enum AgentError {
    #[error("invalid policy configuration: {message}")]
    Configuration { message: String },

    #[error("value estimator failed: {message}")]
    Estimator { message: String },
}

impl AgentError {
    /// Create a new configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create a new estimator error
    pub fn estimator(message: impl Into<String>) -> Self {
        Self::Estimator {
            message: message.into(),
        }
    }

    /// Whether this error was raised at construction time
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration { .. })
    }
}

/// Result type alias using AgentError
pub type AgentResult<T> = Result<T, AgentError>;
