//! Chain-of-custody ledger.
//!
//! Tracks batches of physical goods as they move between registered
//! participants (producer → processor → exporter → operator → consumer):
//! - the **registry** holds participant identities and roles,
//! - the **asset ledger** holds batch records with their lineage pointer,
//! - the **inventory index** records, per participant, every batch it has
//!   handled, zeroing slots that were consumed or passed on,
//! - **mint** creates genesis batches or derives new ones from a held parent,
//! - **transfer** moves custody in two steps (initiate, confirm).
//!
//! Records are never deleted, so the full history of any batch can be
//! reconstructed from its lineage.

pub mod error;
pub mod event;
pub mod inventory;
pub mod ledger;
pub mod mint;
pub mod record;
pub mod registry;
pub mod snapshot;
pub mod transfer;

pub use error::{CustodyError, SnapshotError};
pub use event::{EventBus, LedgerEvent};
pub use inventory::InventoryIndex;
pub use ledger::{CustodyLedger, LedgerSummary};
pub use record::{AssetLedger, BatchRecord, NewRecord};
pub use registry::{Participant, ParticipantRegistry};
pub use snapshot::{InventorySnapshot, LedgerSnapshot, SNAPSHOT_VERSION};
