//! Result of one booking attempt.

use std::path::{Path, PathBuf};

/// How a booking attempt ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The policy says not to book this date. Counts as success.
    Skipped,

    /// The reservation was submitted and a confirmation indicator appeared.
    Booked { indicator: String },

    /// The reservation was submitted but no confirmation indicator
    /// appeared. The booking may still have gone through.
    Unconfirmed { evidence: Option<PathBuf> },

    /// A step failed before the reservation was confirmed.
    Failed {
        error: String,
        evidence: Option<PathBuf>,
    },
}

impl Outcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Skipped | Outcome::Booked { .. })
    }

    /// Screenshot taken during the attempt, if any.
    pub fn evidence_path(&self) -> Option<&Path> {
        match self {
            Outcome::Unconfirmed { evidence } | Outcome::Failed { evidence, .. } => {
                evidence.as_deref()
            }
            Outcome::Skipped | Outcome::Booked { .. } => None,
        }
    }

    /// Description of what went wrong, if anything did.
    pub fn error(&self) -> Option<&str> {
        match self {
            Outcome::Failed { error, .. } => Some(error),
            Outcome::Unconfirmed { .. } => Some("no confirmation indicator found"),
            Outcome::Skipped | Outcome::Booked { .. } => None,
        }
    }
}
