//! Mint engine — genesis and derivation mints.

use custody_types::{BatchId, ParticipantId};
use tracing::info;

use crate::error::CustodyError;
use crate::event::LedgerEvent;
use crate::ledger::{rejected, CustodyLedger};
use crate::record::NewRecord;

impl CustodyLedger {
    /// Mint batch `new_id`, held and created by `caller`.
    ///
    /// With `parent == BatchId::ZERO` this is a genesis mint. Otherwise the
    /// parent must be held by `caller` and accepted; it is consumed, which
    /// tombstones it in the caller's inventory but leaves its record as is.
    pub fn mint(
        &mut self,
        caller: &ParticipantId,
        parent: BatchId,
        new_id: BatchId,
        quantity: u64,
        product: impl Into<String>,
        unit: impl Into<String>,
    ) -> Result<(), CustodyError> {
        let new = NewRecord {
            id: new_id,
            creator: caller.clone(),
            parent,
            quantity,
            product: product.into(),
            unit: unit.into(),
        };
        rejected("mint", self.check_mint(&new))?;

        let record = self.assets.create(new)?.clone();
        if !parent.is_zero() {
            self.inventory.tombstone(caller, parent);
        }
        self.inventory.append(caller, new_id);

        info!(
            caller = %caller,
            batch = %new_id,
            parent = %parent,
            quantity,
            product = %record.product,
            "batch minted"
        );
        self.emit(LedgerEvent::BatchMinted { record });
        Ok(())
    }

    fn check_mint(&self, new: &NewRecord) -> Result<(), CustodyError> {
        self.registry.ensure_registered(&new.creator)?;
        self.assets.validate(new)?;
        if !new.parent.is_zero() {
            self.check_parent(&new.creator, new.parent)?;
        }
        Ok(())
    }

    /// A parent the caller does not hold is `NotHolder`, whether or not the
    /// id exists at all.
    fn check_parent(&self, caller: &ParticipantId, parent: BatchId) -> Result<(), CustodyError> {
        match self.assets.get(parent) {
            Ok(record) if record.holder == *caller => {
                if record.status.can_derive() {
                    Ok(())
                } else {
                    Err(CustodyError::ParentNotReady(parent))
                }
            }
            _ => Err(CustodyError::NotHolder {
                caller: caller.clone(),
                batch: parent,
            }),
        }
    }
}
