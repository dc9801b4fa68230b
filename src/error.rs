use thiserror::Error;

use crate::{ConfigError, EvalError, Phase, Stage};

/// Unified error type for the aftermath sequence.
///
/// Malformed annotations and empty selections are not errors; the only
/// runtime failures are the host evaluator's own.
#[derive(Debug, Error)]
pub enum AftermathError {
    #[error("{stage} body of a {phase} action failed: {source}")]
    Eval {
        phase: Phase,
        stage: Stage,
        #[source]
        source: EvalError,
    },

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[cfg(feature = "binary-cache")]
    #[error(transparent)]
    Serialize(#[from] crate::serial::SerializeError),

    #[cfg(feature = "binary-cache")]
    #[error(transparent)]
    Deserialize(#[from] crate::serial::DeserializeError),
}

impl AftermathError {
    pub(crate) fn eval(phase: Phase, stage: Stage, source: EvalError) -> Self {
        Self::Eval {
            phase,
            stage,
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn eval_error_message_names_phase_and_stage() {
        let err = AftermathError::eval(
            Phase::Loot,
            Stage::Condition,
            EvalError::new("x is not defined"),
        );
        assert_eq!(
            err.to_string(),
            "condition body of a loot action failed: x is not defined"
        );
    }

    #[test]
    fn eval_error_exposes_source() {
        use std::error::Error as _;

        let err = AftermathError::eval(Phase::LevelUp, Stage::Effect, EvalError::new("boom"));
        assert_eq!(err.source().map(ToString::to_string), Some("boom".into()));
    }

    #[test]
    fn config_error_propagates_with_question_mark() {
        fn load() -> Result<crate::AftermathConfig, AftermathError> {
            Ok(crate::AftermathConfig::from_params([(
                "always_compact_exp",
                "sometimes",
            )])?)
        }

        let err = load().unwrap_err();
        assert!(matches!(err, AftermathError::Config(ConfigError::InvalidBool { .. })));
        assert_eq!(
            err.to_string(),
            "parameter 'always_compact_exp' expects true or false, got 'sometimes'"
        );
    }
}
