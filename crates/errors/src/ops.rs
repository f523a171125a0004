//! Operation orchestration error types

use std::borrow::Cow;

use crate::UserFacingError;
use thiserror::Error;

#[derive(Debug, Clone, Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[non_exhaustive]
pub enum OpsError {
    #[error("missing component: {component}")]
    MissingComponent { component: String },

    #[error("service returned {actual} item results for {expected} selected updates")]
    ResultCountMismatch { expected: usize, actual: usize },

    #[error("serialization error: {message}")]
    SerializationError { message: String },
}

impl UserFacingError for OpsError {
    fn user_message(&self) -> Cow<'_, str> {
        Cow::Owned(self.to_string())
    }

    fn user_hint(&self) -> Option<&'static str> {
        match self {
            Self::MissingComponent { .. } => {
                Some("This is a wiring bug in the caller; report it with the command you ran.")
            }
            Self::ResultCountMismatch { .. } => {
                Some("The update service misbehaved; inspect the service logs.")
            }
            Self::SerializationError { .. } => None,
        }
    }

    fn user_code(&self) -> Option<&'static str> {
        Some(match self {
            Self::MissingComponent { .. } => "ops.missing_component",
            Self::ResultCountMismatch { .. } => "ops.result_count_mismatch",
            Self::SerializationError { .. } => "ops.serialization_error",
        })
    }
}
