//! Holder inventory index.
//!
//! Each participant has an append-only sequence of every batch id it has
//! held, in the order it received them. When a batch is consumed by a mint or
//! transferred away its slot is overwritten with [`BatchId::ZERO`]; slots are
//! never removed, so positions stay stable for audit reconstruction.

use std::collections::HashMap;

use custody_types::{BatchId, ParticipantId};

#[derive(Clone, Debug, Default)]
pub struct InventoryIndex {
    slots: HashMap<ParticipantId, Vec<BatchId>>,
}

impl InventoryIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `id` at the next free position of `holder`'s sequence.
    pub fn append(&mut self, holder: &ParticipantId, id: BatchId) {
        self.slots.entry(holder.clone()).or_default().push(id);
    }

    /// Zero the first live slot holding `id`. Returns the slot position, or
    /// `None` (and changes nothing) if `holder` has no live slot for `id`.
    pub fn tombstone(&mut self, holder: &ParticipantId, id: BatchId) -> Option<usize> {
        if id.is_zero() {
            return None;
        }
        let slots = self.slots.get_mut(holder)?;
        let pos = slots.iter().position(|slot| *slot == id)?;
        slots[pos] = BatchId::ZERO;
        Some(pos)
    }

    /// The full sequence for `holder`, tombstones included. Empty for a
    /// participant that never held anything.
    pub fn list_all(&self, holder: &ParticipantId) -> &[BatchId] {
        self.slots.get(holder).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Ids `holder` still holds as distinct deliverables, in slot order.
    pub fn live(&self, holder: &ParticipantId) -> Vec<BatchId> {
        self.list_all(holder)
            .iter()
            .copied()
            .filter(|id| !id.is_zero())
            .collect()
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = (&ParticipantId, &Vec<BatchId>)> {
        self.slots.iter()
    }

    pub(crate) fn from_slots(slots: impl IntoIterator<Item = (ParticipantId, Vec<BatchId>)>) -> Self {
        Self {
            slots: slots.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(raw: &[u64]) -> Vec<BatchId> {
        raw.iter().copied().map(BatchId::new).collect()
    }

    #[test]
    fn append_preserves_order() {
        let mut index = InventoryIndex::new();
        let farmer = ParticipantId::from("farmer");
        index.append(&farmer, BatchId::new(1234));
        index.append(&farmer, BatchId::new(12345));
        assert_eq!(index.list_all(&farmer), ids(&[1234, 12345]).as_slice());
    }

    #[test]
    fn tombstone_zeroes_in_place() {
        let mut index = InventoryIndex::new();
        let farmer = ParticipantId::from("farmer");
        for id in [1, 2, 3] {
            index.append(&farmer, BatchId::new(id));
        }
        assert_eq!(index.tombstone(&farmer, BatchId::new(2)), Some(1));
        assert_eq!(index.list_all(&farmer), ids(&[1, 0, 3]).as_slice());
        assert_eq!(index.live(&farmer), ids(&[1, 3]));
    }

    #[test]
    fn tombstone_hits_first_live_occurrence_only() {
        let mut index = InventoryIndex::new();
        let trader = ParticipantId::from("trader");
        // Received, passed on, received again.
        index.append(&trader, BatchId::new(9));
        index.tombstone(&trader, BatchId::new(9));
        index.append(&trader, BatchId::new(9));
        assert_eq!(index.tombstone(&trader, BatchId::new(9)), Some(1));
        assert_eq!(index.list_all(&trader), ids(&[0, 0]).as_slice());
    }

    #[test]
    fn tombstone_of_missing_id_is_noop() {
        let mut index = InventoryIndex::new();
        let farmer = ParticipantId::from("farmer");
        index.append(&farmer, BatchId::new(1));
        assert_eq!(index.tombstone(&farmer, BatchId::new(42)), None);
        assert_eq!(index.tombstone(&ParticipantId::from("nobody"), BatchId::new(1)), None);
        assert_eq!(index.tombstone(&farmer, BatchId::ZERO), None);
        assert_eq!(index.list_all(&farmer), ids(&[1]).as_slice());
    }

    #[test]
    fn unknown_holder_has_empty_inventory() {
        let index = InventoryIndex::new();
        assert!(index.list_all(&ParticipantId::from("nobody")).is_empty());
    }
}
