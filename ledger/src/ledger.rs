//! The custody ledger service object.
//!
//! Owns the participant registry, the asset ledger and the inventory index,
//! and is the only way to mutate them. Mutating operations take `&mut self`,
//! so writers are serialized by the borrow checker; each one validates every
//! precondition first and only then applies its changes, which makes a
//! failed call free of side effects.

use custody_types::{BatchId, BatchStatus, ParticipantId, Role, Timestamp};
use tracing::{debug, info};

use crate::error::CustodyError;
use crate::event::{EventBus, LedgerEvent};
use crate::inventory::InventoryIndex;
use crate::record::{AssetLedger, BatchRecord};
use crate::registry::{Participant, ParticipantRegistry};

pub struct CustodyLedger {
    pub(crate) registry: ParticipantRegistry,
    pub(crate) assets: AssetLedger,
    pub(crate) inventory: InventoryIndex,
    events: EventBus,
}

/// Summary statistics for the ledger.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct LedgerSummary {
    pub participants: usize,
    pub batches: usize,
    pub genesis_batches: usize,
    pub in_transit: usize,
}

impl CustodyLedger {
    pub fn new() -> Self {
        Self::from_parts(
            ParticipantRegistry::new(),
            AssetLedger::new(),
            InventoryIndex::new(),
        )
    }

    pub(crate) fn from_parts(
        registry: ParticipantRegistry,
        assets: AssetLedger,
        inventory: InventoryIndex,
    ) -> Self {
        Self {
            registry,
            assets,
            inventory,
            events: EventBus::new(),
        }
    }

    /// Attach an audit listener. It receives every event emitted from now on.
    pub fn subscribe(&mut self, listener: Box<dyn Fn(&LedgerEvent) + Send + Sync>) {
        self.events.subscribe(listener);
    }

    pub(crate) fn emit(&self, event: LedgerEvent) {
        self.events.emit(&event);
    }

    /// Store a participant profile. Identity and role are permanent.
    pub fn register(
        &mut self,
        identity: ParticipantId,
        name: impl Into<String>,
        country: impl Into<String>,
        registered_at: Timestamp,
        role: Role,
    ) -> Result<(), CustodyError> {
        rejected("register", self.registry.ensure_vacant(&identity))?;

        let profile = Participant {
            identity,
            name: name.into(),
            country: country.into(),
            registered_at,
            role,
        };
        self.registry.register(profile.clone())?;
        info!(participant = %profile.identity, role = %profile.role, "participant registered");
        self.emit(LedgerEvent::ParticipantRegistered { profile });
        Ok(())
    }

    pub fn profile(&self, identity: &ParticipantId) -> Result<Participant, CustodyError> {
        self.registry.get(identity).cloned()
    }

    pub fn record(&self, id: BatchId) -> Result<BatchRecord, CustodyError> {
        self.assets.get(id).cloned()
    }

    pub fn holder_of(&self, id: BatchId) -> Result<ParticipantId, CustodyError> {
        self.assets.get(id).map(|record| record.holder.clone())
    }

    /// Every batch id `holder` has handled, in order, with consumed and
    /// transferred-away slots zeroed.
    pub fn list_held(&self, holder: &ParticipantId) -> Vec<BatchId> {
        self.inventory.list_all(holder).to_vec()
    }

    /// The inventory of `holder` without tombstones.
    pub fn live_inventory(&self, holder: &ParticipantId) -> Vec<BatchId> {
        self.inventory.live(holder)
    }

    /// The chain of records from `id` back to its genesis batch, `id` first.
    pub fn lineage(&self, id: BatchId) -> Result<Vec<BatchRecord>, CustodyError> {
        let mut chain = Vec::new();
        let mut cursor = id;
        // Parents always predate their children, so a well-formed chain is
        // never longer than the ledger.
        while !cursor.is_zero() && chain.len() <= self.assets.len() {
            let record = self.assets.get(cursor)?;
            cursor = record.parent;
            chain.push(record.clone());
        }
        Ok(chain)
    }

    /// Batches derived directly from `id`, in ascending id order.
    pub fn children(&self, id: BatchId) -> Vec<BatchId> {
        self.assets.children_of(id)
    }

    pub fn summary(&self) -> LedgerSummary {
        let mut summary = LedgerSummary {
            participants: self.registry.len(),
            batches: self.assets.len(),
            genesis_batches: 0,
            in_transit: 0,
        };
        for record in self.assets.iter() {
            if record.is_genesis() {
                summary.genesis_batches += 1;
            }
            if record.status == BatchStatus::InTransit {
                summary.in_transit += 1;
            }
        }
        summary
    }
}

impl Default for CustodyLedger {
    fn default() -> Self {
        Self::new()
    }
}

/// Log a failed precondition check and pass the result through.
pub(crate) fn rejected<T>(op: &'static str, result: Result<T, CustodyError>) -> Result<T, CustodyError> {
    if let Err(err) = &result {
        debug!(op, error = %err, "operation rejected");
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    fn id(raw: &str) -> ParticipantId {
        ParticipantId::from(raw)
    }

    fn ledger_with(participants: &[(&str, Role)]) -> CustodyLedger {
        let mut ledger = CustodyLedger::new();
        for (name, role) in participants {
            ledger
                .register(id(name), *name, "El Salvador", Timestamp::new(1_700_000_000), *role)
                .unwrap();
        }
        ledger
    }

    #[test]
    fn profile_returns_registered_values() {
        let mut ledger = CustodyLedger::new();
        ledger
            .register(id("farmer"), "Juan", "El salvador", Timestamp::new(1_712_345_678_901), Role::Producer)
            .unwrap();
        let profile = ledger.profile(&id("farmer")).unwrap();
        assert_eq!(profile.name, "Juan");
        assert_eq!(profile.country, "El salvador");
        assert_eq!(profile.registered_at, Timestamp::new(1_712_345_678_901));
        assert_eq!(profile.role, Role::Producer);
    }

    #[test]
    fn re_registration_fails() {
        let mut ledger = ledger_with(&[("farmer", Role::Producer)]);
        let err = ledger
            .register(id("farmer"), "Other", "Peru", Timestamp::new(1), Role::Consumer)
            .unwrap_err();
        assert_eq!(err, CustodyError::AlreadyRegistered(id("farmer")));
        assert_eq!(ledger.profile(&id("farmer")).unwrap().role, Role::Producer);
    }

    #[test]
    fn unregistered_profile_lookup_fails() {
        let ledger = CustodyLedger::new();
        assert_eq!(
            ledger.profile(&id("ghost")).unwrap_err(),
            CustodyError::NotRegistered(id("ghost"))
        );
    }

    #[test]
    fn lineage_walks_back_to_genesis() {
        let mut ledger = ledger_with(&[("farmer", Role::Producer), ("processor", Role::Processor)]);
        ledger.mint(&id("farmer"), BatchId::ZERO, BatchId::new(1), 100, "Coffee", "Kg").unwrap();
        ledger.initiate_transfer(&id("farmer"), &id("processor"), BatchId::new(1)).unwrap();
        ledger.confirm_receipt(&id("processor"), BatchId::new(1)).unwrap();
        ledger.mint(&id("processor"), BatchId::new(1), BatchId::new(2), 80, "Green Coffee", "Kg").unwrap();
        let chain: Vec<BatchId> = ledger
            .lineage(BatchId::new(2))
            .unwrap()
            .into_iter()
            .map(|r| r.id)
            .collect();
        assert_eq!(chain, vec![BatchId::new(2), BatchId::new(1)]);
        assert_eq!(ledger.children(BatchId::new(1)), vec![BatchId::new(2)]);
        assert_eq!(
            ledger.lineage(BatchId::new(99)).unwrap_err(),
            CustodyError::UnknownId(BatchId::new(99))
        );
    }

    #[test]
    fn summary_counts_state() {
        let mut ledger = ledger_with(&[("farmer", Role::Producer), ("processor", Role::Processor)]);
        ledger.mint(&id("farmer"), BatchId::ZERO, BatchId::new(1), 100, "Coffee", "Kg").unwrap();
        ledger.mint(&id("farmer"), BatchId::ZERO, BatchId::new(2), 200, "Cacao", "Kg").unwrap();
        ledger.initiate_transfer(&id("farmer"), &id("processor"), BatchId::new(1)).unwrap();
        assert_eq!(
            ledger.summary(),
            LedgerSummary {
                participants: 2,
                batches: 2,
                genesis_batches: 2,
                in_transit: 1,
            }
        );
    }

    #[test]
    fn every_mutation_emits_one_event() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let mut ledger = CustodyLedger::new();
        let sink = Arc::clone(&seen);
        ledger.subscribe(Box::new(move |event| sink.lock().unwrap().push(event.clone())));

        ledger
            .register(id("farmer"), "Juan", "El Salvador", Timestamp::new(1), Role::Producer)
            .unwrap();
        ledger
            .register(id("processor"), "Jorge", "El Salvador", Timestamp::new(2), Role::Processor)
            .unwrap();
        ledger.mint(&id("farmer"), BatchId::ZERO, BatchId::new(7), 10, "Coffee", "Kg").unwrap();
        // Rejected calls emit nothing.
        assert!(ledger.mint(&id("farmer"), BatchId::ZERO, BatchId::new(7), 10, "Coffee", "Kg").is_err());
        assert!(ledger
            .register(id("farmer"), "Evil", "Nowhere", Timestamp::new(3), Role::Consumer)
            .is_err());
        assert!(ledger.confirm_receipt(&id("farmer"), BatchId::new(7)).is_err());
        assert!(ledger.initiate_transfer(&id("processor"), &id("farmer"), BatchId::new(7)).is_err());
        ledger.initiate_transfer(&id("farmer"), &id("processor"), BatchId::new(7)).unwrap();
        assert!(ledger.initiate_transfer(&id("farmer"), &id("processor"), BatchId::new(7)).is_err());
        ledger.confirm_receipt(&id("processor"), BatchId::new(7)).unwrap();
        assert!(ledger.confirm_receipt(&id("processor"), BatchId::new(7)).is_err());

        let events = seen.lock().unwrap();
        let kinds: Vec<&str> = events.iter().map(LedgerEvent::kind).collect();
        assert_eq!(
            kinds,
            vec![
                "participant_registered",
                "participant_registered",
                "batch_minted",
                "transfer_initiated",
                "receipt_confirmed",
            ]
        );
        match &events[4] {
            LedgerEvent::ReceiptConfirmed { record } => {
                assert_eq!(record.holder, id("processor"));
                assert_eq!(record.status, BatchStatus::Accepted);
            }
            other => panic!("unexpected event {other:?}"),
        }
    }
}
