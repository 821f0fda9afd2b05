//! Ledger snapshots — the complete ledger state at a point in time.
//!
//! A snapshot is what the CLI persists between invocations. Entries are
//! sorted so the encoding and the content hash are deterministic; the hash
//! covers registry, records and inventories but not `created_at`.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use custody_types::{BatchId, ParticipantId, Timestamp};

use crate::error::{CustodyError, SnapshotError};
use crate::inventory::InventoryIndex;
use crate::ledger::CustodyLedger;
use crate::record::{AssetLedger, BatchRecord};
use crate::registry::{Participant, ParticipantRegistry};

pub const SNAPSHOT_VERSION: u32 = 1;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LedgerSnapshot {
    /// Blake2b-256 of the content.
    pub hash: [u8; 32],
    pub version: u32,
    pub created_at: Timestamp,
    pub participants: Vec<Participant>,
    pub records: Vec<BatchRecord>,
    pub inventories: Vec<InventorySnapshot>,
}

/// One participant's inventory sequence, tombstones included.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventorySnapshot {
    pub holder: ParticipantId,
    pub slots: Vec<BatchId>,
}

impl LedgerSnapshot {
    pub fn create(
        mut participants: Vec<Participant>,
        mut records: Vec<BatchRecord>,
        mut inventories: Vec<InventorySnapshot>,
    ) -> Self {
        participants.sort_by(|a, b| a.identity.cmp(&b.identity));
        records.sort_by_key(|r| r.id);
        inventories.sort_by(|a, b| a.holder.cmp(&b.holder));

        let mut snap = Self {
            hash: [0u8; 32],
            version: SNAPSHOT_VERSION,
            created_at: Timestamp::now(),
            participants,
            records,
            inventories,
        };
        snap.hash = snap.compute_hash();
        snap
    }

    fn compute_hash(&self) -> [u8; 32] {
        use blake2::digest::consts::U32;
        use blake2::{Blake2b, Digest};

        fn put_str(hasher: &mut Blake2b<U32>, s: &str) {
            hasher.update((s.len() as u64).to_le_bytes());
            hasher.update(s.as_bytes());
        }

        let mut hasher = Blake2b::<U32>::new();
        hasher.update(self.version.to_le_bytes());
        for p in &self.participants {
            put_str(&mut hasher, p.identity.as_str());
            put_str(&mut hasher, &p.name);
            put_str(&mut hasher, &p.country);
            hasher.update(p.registered_at.as_u64().to_le_bytes());
            hasher.update([p.role.ordinal()]);
        }
        for r in &self.records {
            hasher.update(r.id.as_u64().to_le_bytes());
            put_str(&mut hasher, r.creator.as_str());
            hasher.update(r.parent.as_u64().to_le_bytes());
            put_str(&mut hasher, r.holder.as_str());
            hasher.update(r.quantity.to_le_bytes());
            put_str(&mut hasher, &r.product);
            put_str(&mut hasher, &r.unit);
            put_str(&mut hasher, r.status.as_str());
        }
        for inv in &self.inventories {
            put_str(&mut hasher, inv.holder.as_str());
            hasher.update((inv.slots.len() as u64).to_le_bytes());
            for slot in &inv.slots {
                hasher.update(slot.as_u64().to_le_bytes());
            }
        }

        let result = hasher.finalize();
        let mut out = [0u8; 32];
        out.copy_from_slice(&result);
        out
    }

    /// Verify the snapshot hash matches its content.
    pub fn verify(&self) -> bool {
        self.hash == self.compute_hash()
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, SnapshotError> {
        bincode::serialize(self).map_err(|e| SnapshotError::Encode(e.to_string()))
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, SnapshotError> {
        bincode::deserialize(bytes).map_err(|e| SnapshotError::Decode(e.to_string()))
    }

    pub fn hash_hex(&self) -> String {
        self.hash.iter().map(|b| format!("{b:02x}")).collect()
    }
}

impl CustodyLedger {
    /// Capture the full ledger state. Listeners are not part of a snapshot.
    pub fn snapshot(&self) -> LedgerSnapshot {
        LedgerSnapshot::create(
            self.registry.iter().cloned().collect(),
            self.assets.iter().cloned().collect(),
            self.inventory
                .iter()
                .map(|(holder, slots)| InventorySnapshot {
                    holder: holder.clone(),
                    slots: slots.clone(),
                })
                .collect(),
        )
    }

    /// Rebuild a ledger from a snapshot whose hash verifies.
    ///
    /// The hash only detects corruption, so the content is also checked
    /// against the ledger's own rules: unique registrations, valid records
    /// held and created by registered participants, parents present in the
    /// snapshot with no lineage cycles, and inventory slots that name
    /// recorded batches.
    pub fn from_snapshot(snapshot: LedgerSnapshot) -> Result<Self, SnapshotError> {
        if snapshot.version != SNAPSHOT_VERSION {
            return Err(SnapshotError::UnsupportedVersion(snapshot.version));
        }
        if !snapshot.verify() {
            return Err(SnapshotError::HashMismatch);
        }

        let mut registry = ParticipantRegistry::new();
        for profile in snapshot.participants {
            registry.register(profile).map_err(inconsistent)?;
        }

        let assets = AssetLedger::from_records(snapshot.records).map_err(inconsistent)?;
        for record in assets.iter() {
            registry.ensure_registered(&record.creator).map_err(inconsistent)?;
            registry.ensure_registered(&record.holder).map_err(inconsistent)?;
            check_lineage(&assets, record)?;
        }

        let mut holders = HashSet::new();
        for inv in &snapshot.inventories {
            if !holders.insert(&inv.holder) {
                return Err(SnapshotError::Inconsistent(format!(
                    "inventory of {} appears twice",
                    inv.holder
                )));
            }
            registry.ensure_registered(&inv.holder).map_err(inconsistent)?;
            if let Some(slot) = inv.slots.iter().find(|s| !s.is_zero() && !assets.contains(**s)) {
                return Err(SnapshotError::Inconsistent(format!(
                    "inventory of {} names unknown batch {slot}",
                    inv.holder
                )));
            }
        }

        let inventory = InventoryIndex::from_slots(
            snapshot
                .inventories
                .into_iter()
                .map(|inv| (inv.holder, inv.slots)),
        );
        Ok(Self::from_parts(registry, assets, inventory))
    }
}

fn inconsistent(err: CustodyError) -> SnapshotError {
    SnapshotError::Inconsistent(err.to_string())
}

/// Every parent chain must reach a genesis record within the ledger's size.
fn check_lineage(assets: &AssetLedger, record: &BatchRecord) -> Result<(), SnapshotError> {
    let mut cursor = record.parent;
    let mut steps = 0;
    while !cursor.is_zero() {
        let parent = assets.get(cursor).map_err(|_| {
            SnapshotError::Inconsistent(format!(
                "batch {} has parent {cursor} which is not recorded",
                record.id
            ))
        })?;
        steps += 1;
        if steps > assets.len() {
            return Err(SnapshotError::Inconsistent(format!(
                "lineage of batch {} loops",
                record.id
            )));
        }
        cursor = parent.parent;
    }
    Ok(())
}
