//! Fundamental types for the custody ledger.
//!
//! This crate defines the core types shared across every other crate in the workspace:
//! participant identities, batch identifiers, timestamps, and the role/status enums.

pub mod batch_id;
pub mod error;
pub mod identity;
pub mod state;
pub mod time;

pub use batch_id::BatchId;
pub use error::TypesError;
pub use identity::ParticipantId;
pub use state::{BatchStatus, Role};
pub use time::Timestamp;
