use custody_types::{BatchId, ParticipantId};
use thiserror::Error;

/// Precondition failures of the custody ledger.
///
/// Every variant is raised before any state is touched, so a failed call
/// leaves the ledger exactly as it was.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CustodyError {
    #[error("participant {0} is not registered")]
    NotRegistered(ParticipantId),

    #[error("participant {0} is already registered")]
    AlreadyRegistered(ParticipantId),

    #[error("batch {0} already exists")]
    DuplicateId(BatchId),

    #[error("batch {0} not found")]
    UnknownId(BatchId),

    #[error("batch id must be non-zero")]
    InvalidId,

    #[error("quantity must be positive")]
    InvalidQuantity,

    #[error("{field} must not be empty")]
    InvalidText { field: &'static str },

    #[error("{caller} does not hold batch {batch}")]
    NotHolder { caller: ParticipantId, batch: BatchId },

    #[error("parent batch {0} has not been accepted by its holder")]
    ParentNotReady(BatchId),

    #[error("batch {0} has no pending transfer")]
    NotPendingTransfer(BatchId),

    #[error("cannot transfer batch {0} to its current holder")]
    SelfTransfer(BatchId),
}

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("snapshot decoding failed: {0}")]
    Decode(String),

    #[error("snapshot encoding failed: {0}")]
    Encode(String),

    #[error("snapshot hash does not match its content")]
    HashMismatch,

    #[error("snapshot content is inconsistent: {0}")]
    Inconsistent(String),

    #[error("unsupported snapshot version {0}")]
    UnsupportedVersion(u32),
}
