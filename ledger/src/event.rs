//! Audit events emitted after every successful mutation.

use custody_types::ParticipantId;
use serde::{Deserialize, Serialize};

use crate::record::BatchRecord;
use crate::registry::Participant;

/// One event per successful mutating call, carrying the full post-state of
/// the affected profile or record.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum LedgerEvent {
    /// A participant profile was stored.
    ParticipantRegistered { profile: Participant },
    /// A batch was minted. For a derivation mint the parent id is in
    /// `record.parent`; the parent record itself is unchanged.
    BatchMinted { record: BatchRecord },
    /// Custody moved from `from` to `record.holder`, pending confirmation.
    TransferInitiated {
        from: ParticipantId,
        record: BatchRecord,
    },
    /// The holder confirmed receipt.
    ReceiptConfirmed { record: BatchRecord },
}

impl LedgerEvent {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::ParticipantRegistered { .. } => "participant_registered",
            Self::BatchMinted { .. } => "batch_minted",
            Self::TransferInitiated { .. } => "transfer_initiated",
            Self::ReceiptConfirmed { .. } => "receipt_confirmed",
        }
    }
}

/// Synchronous fan-out event bus for ledger events.
///
/// Listeners run inline on the mutating call after the state change has been
/// applied; the ledger's correctness does not depend on them.
pub struct EventBus {
    listeners: Vec<Box<dyn Fn(&LedgerEvent) + Send + Sync>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self {
            listeners: Vec::new(),
        }
    }

    pub fn subscribe(&mut self, listener: Box<dyn Fn(&LedgerEvent) + Send + Sync>) {
        self.listeners.push(listener);
    }

    pub fn emit(&self, event: &LedgerEvent) {
        for listener in &self.listeners {
            listener(event);
        }
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}
