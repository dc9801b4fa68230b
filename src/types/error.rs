use thiserror::Error;

/// A failure reported by the host evaluator while running a body.
///
/// The message is the host's own description of the problem.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct EvalError {
    message: String,
}

impl EvalError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<IdListError> for EvalError {
    fn from(err: IdListError) -> Self {
        Self::new(err.to_string())
    }
}

/// Errors from the common-event id list mini-syntax (`"1-3, 7"`).
#[derive(Debug, Error, PartialEq, Eq)]
pub enum IdListError {
    #[error("malformed id list '{input}' at offset {offset}")]
    Malformed { input: String, offset: usize },

    #[error("id list '{input}' expands to no ids")]
    Empty { input: String },

    #[error("id list '{input}' expands to more than {limit} ids")]
    TooLarge { input: String, limit: usize },
}

/// Errors from interpreting host configuration parameters.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("parameter '{key}' expects true or false, got '{value}'")]
    InvalidBool { key: String, value: String },
}
