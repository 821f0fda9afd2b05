//! Asset ledger — the authoritative store of batch records.

use std::collections::{BTreeSet, HashMap};

use custody_types::{BatchId, BatchStatus, ParticipantId};
use serde::{Deserialize, Serialize};

use crate::error::CustodyError;

/// A batch of goods at some processing stage.
///
/// Records are never deleted. `parent` is the only lineage edge: zero for a
/// genesis batch, otherwise the batch consumed to produce this one.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchRecord {
    pub id: BatchId,
    /// Participant that minted the batch.
    pub creator: ParticipantId,
    /// Batch consumed by the mint, or [`BatchId::ZERO`] for genesis.
    pub parent: BatchId,
    /// Current holder. Moves on `initiate_transfer`, before confirmation.
    pub holder: ParticipantId,
    pub quantity: u64,
    pub product: String,
    /// Unit of measure for `quantity`.
    pub unit: String,
    pub status: BatchStatus,
}

impl BatchRecord {
    pub fn is_genesis(&self) -> bool {
        self.parent.is_zero()
    }
}

/// The attributes a caller supplies when a record is created.
#[derive(Clone, Debug)]
pub struct NewRecord {
    pub id: BatchId,
    pub creator: ParticipantId,
    pub parent: BatchId,
    pub quantity: u64,
    pub product: String,
    pub unit: String,
}

/// Batch id → record, plus a forward index parent → children.
#[derive(Clone, Debug, Default)]
pub struct AssetLedger {
    records: HashMap<BatchId, BatchRecord>,
    children: HashMap<BatchId, BTreeSet<BatchId>>,
}

impl AssetLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check everything `create` would reject, without mutating.
    pub fn validate(&self, new: &NewRecord) -> Result<(), CustodyError> {
        if new.id.is_zero() {
            return Err(CustodyError::InvalidId);
        }
        if self.contains(new.id) {
            return Err(CustodyError::DuplicateId(new.id));
        }
        check_attributes(new.quantity, &new.product, &new.unit)
    }

    /// Create a record with status `Created`, held by its creator.
    pub fn create(&mut self, new: NewRecord) -> Result<&BatchRecord, CustodyError> {
        self.validate(&new)?;
        let record = BatchRecord {
            id: new.id,
            holder: new.creator.clone(),
            creator: new.creator,
            parent: new.parent,
            quantity: new.quantity,
            product: new.product,
            unit: new.unit,
            status: BatchStatus::Created,
        };
        Ok(self.insert(record))
    }

    /// Callers have already rejected zero and duplicate ids.
    fn insert(&mut self, record: BatchRecord) -> &BatchRecord {
        let id = record.id;
        if !record.parent.is_zero() {
            self.children.entry(record.parent).or_default().insert(id);
        }
        self.records.entry(id).or_insert(record)
    }

    pub fn get(&self, id: BatchId) -> Result<&BatchRecord, CustodyError> {
        self.records.get(&id).ok_or(CustodyError::UnknownId(id))
    }

    pub fn contains(&self, id: BatchId) -> bool {
        self.records.contains_key(&id)
    }

    /// Move custody. Only the transfer workflow calls this, after its checks.
    pub(crate) fn set_holder_and_status(
        &mut self,
        id: BatchId,
        holder: ParticipantId,
        status: BatchStatus,
    ) -> Result<&BatchRecord, CustodyError> {
        let record = self.records.get_mut(&id).ok_or(CustodyError::UnknownId(id))?;
        record.holder = holder;
        record.status = status;
        Ok(record)
    }

    /// Batches minted from `id`, in ascending id order.
    pub fn children_of(&self, id: BatchId) -> Vec<BatchId> {
        self.children
            .get(&id)
            .map(|set| set.iter().copied().collect())
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &BatchRecord> {
        self.records.values()
    }

    /// Rebuild the ledger from previously exported records, applying the
    /// same id and attribute rules as [`AssetLedger::create`].
    pub(crate) fn from_records(
        records: impl IntoIterator<Item = BatchRecord>,
    ) -> Result<Self, CustodyError> {
        let mut ledger = Self::new();
        for record in records {
            if record.id.is_zero() {
                return Err(CustodyError::InvalidId);
            }
            if ledger.contains(record.id) {
                return Err(CustodyError::DuplicateId(record.id));
            }
            check_attributes(record.quantity, &record.product, &record.unit)?;
            ledger.insert(record);
        }
        Ok(ledger)
    }
}

fn check_attributes(quantity: u64, product: &str, unit: &str) -> Result<(), CustodyError> {
    if quantity == 0 {
        return Err(CustodyError::InvalidQuantity);
    }
    if product.trim().is_empty() {
        return Err(CustodyError::InvalidText { field: "product" });
    }
    if unit.trim().is_empty() {
        return Err(CustodyError::InvalidText { field: "unit" });
    }
    Ok(())
}
