//! Extraction job state machine.

use serde::{Deserialize, Serialize};
use std::fmt;

/// State of an extraction job.
///
/// `Queued → Running → {Done | Failed}`. Terminal states are never left.
/// `Failed` is reported as `"error"` on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobState {
    /// Created; the driver task has not picked it up yet.
    Queued,
    /// The extraction tool is running.
    Running,
    /// Extraction succeeded and the file list is recorded.
    Done,
    /// Extraction failed; an error detail is recorded.
    #[serde(rename = "error")]
    Failed,
}

impl JobState {
    /// Check if the job is in a terminal state.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done | Self::Failed)
    }

    /// Whether `self → next` is a legal transition.
    pub fn can_transition_to(&self, next: JobState) -> bool {
        matches!(
            (self, next),
            (Self::Queued, Self::Running)
                | (Self::Running, Self::Done)
                | (Self::Running, Self::Failed)
        )
    }

    /// Return the state as its wire string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Queued => "queued",
            Self::Running => "running",
            Self::Done => "done",
            Self::Failed => "error",
        }
    }
}

impl fmt::Display for JobState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
