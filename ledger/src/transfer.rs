//! Custody transfer workflow — initiate, then confirm.
//!
//! Holdership moves on `initiate_transfer`; the receiver's confirmation only
//! flips the status from `InTransit` to `Accepted`. There is no reject or
//! cancel path: a batch in transit stays with its new holder until confirmed.

use custody_types::{BatchId, BatchStatus, ParticipantId};
use tracing::info;

use crate::error::CustodyError;
use crate::event::LedgerEvent;
use crate::ledger::{rejected, CustodyLedger};

impl CustodyLedger {
    /// Hand batch `id` from `caller` (its holder) to registered participant `to`.
    pub fn initiate_transfer(
        &mut self,
        caller: &ParticipantId,
        to: &ParticipantId,
        id: BatchId,
    ) -> Result<(), CustodyError> {
        rejected("initiate_transfer", self.check_transfer(caller, to, id))?;

        let record = self
            .assets
            .set_holder_and_status(id, to.clone(), BatchStatus::InTransit)?
            .clone();
        self.inventory.tombstone(caller, id);
        self.inventory.append(to, id);

        info!(from = %caller, to = %to, batch = %id, "transfer initiated");
        self.emit(LedgerEvent::TransferInitiated {
            from: caller.clone(),
            record,
        });
        Ok(())
    }

    /// Confirm receipt of an in-transit batch held by `caller`.
    pub fn confirm_receipt(&mut self, caller: &ParticipantId, id: BatchId) -> Result<(), CustodyError> {
        rejected("confirm_receipt", self.check_confirm(caller, id))?;

        let record = self
            .assets
            .set_holder_and_status(id, caller.clone(), BatchStatus::Accepted)?
            .clone();

        info!(holder = %caller, batch = %id, "receipt confirmed");
        self.emit(LedgerEvent::ReceiptConfirmed { record });
        Ok(())
    }

    fn check_transfer(
        &self,
        caller: &ParticipantId,
        to: &ParticipantId,
        id: BatchId,
    ) -> Result<(), CustodyError> {
        let record = self.assets.get(id)?;
        if record.holder != *caller {
            return Err(CustodyError::NotHolder {
                caller: caller.clone(),
                batch: id,
            });
        }
        if to == caller {
            return Err(CustodyError::SelfTransfer(id));
        }
        self.registry.ensure_registered(to)
    }

    fn check_confirm(&self, caller: &ParticipantId, id: BatchId) -> Result<(), CustodyError> {
        let record = self.assets.get(id)?;
        if record.holder != *caller {
            return Err(CustodyError::NotHolder {
                caller: caller.clone(),
                batch: id,
            });
        }
        if !record.status.is_pending() {
            return Err(CustodyError::NotPendingTransfer(id));
        }
        Ok(())
    }
}
