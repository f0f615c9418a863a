// ABOUTME: ConversionStatus, the idle/converting/success/error lifecycle seen by callers.
// ABOUTME: Transitions are methods; each conversion is atomic from the caller's side.

use serde::Serialize;

use crate::error::ConvertError;
use crate::result::NormalizedDocument;

/// Lifecycle of one conversion request as shown to a front end.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum ConversionStatus {
    #[default]
    Idle,
    Converting,
    Success { document: NormalizedDocument },
    Error { message: String },
}

impl ConversionStatus {
    /// Enters `converting`. Returns false (and stays put) unless idle.
    pub fn begin(&mut self) -> bool {
        if *self != ConversionStatus::Idle {
            return false;
        }
        *self = ConversionStatus::Converting;
        true
    }

    /// Leaves `converting` for `success` or `error`. Ignored in other states.
    pub fn finish(&mut self, outcome: Result<NormalizedDocument, ConvertError>) {
        if *self != ConversionStatus::Converting {
            return;
        }
        *self = match outcome {
            Ok(document) => ConversionStatus::Success { document },
            Err(err) => ConversionStatus::Error {
                message: err.to_string(),
            },
        };
    }

    /// Returns to `idle`, discarding any result.
    pub fn reset(&mut self) {
        *self = ConversionStatus::Idle;
    }

    pub fn is_finished(&self) -> bool {
        matches!(
            self,
            ConversionStatus::Success { .. } | ConversionStatus::Error { .. }
        )
    }

    pub fn document(&self) -> Option<&NormalizedDocument> {
        match self {
            ConversionStatus::Success { document } => Some(document),
            _ => None,
        }
    }
}
