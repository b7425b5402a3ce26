// Domain errors. None of these is fatal: each is scoped to one tick or one session.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SamplerError {
    /// An OS metrics subsystem could not be read at all.
    #[error("metrics source unavailable: {source_name}: {reason}")]
    SourceUnavailable {
        source_name: &'static str,
        reason: String,
    },
}

impl SamplerError {
    pub fn unavailable(source_name: &'static str, reason: impl ToString) -> Self {
        SamplerError::SourceUnavailable {
            source_name,
            reason: reason.to_string(),
        }
    }
}

/// A tick's snapshot could not be assembled; the tick is skipped.
#[derive(Debug, Error)]
pub enum AssemblyError {
    #[error("assembly failed: {0}")]
    Sampler(#[from] SamplerError),
    #[error("assembly failed: sampler task join: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// Rejected interval change. The session keeps its previous interval.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReconfigureError {
    #[error("invalid reconfigure request: interval is not an integer")]
    NotNumeric,
    #[error("invalid reconfigure request: interval {0} ms is negative")]
    Negative(i64),
    #[error("invalid reconfigure request: interval {requested} ms is below the {floor} ms floor")]
    BelowFloor { requested: u64, floor: u64 },
    #[error("unknown or disconnected session {0}")]
    UnknownSession(u64),
}
