//! Subcommands and their execution against a loaded ledger.

use clap::Subcommand;
use custody_ledger::CustodyLedger;
use custody_types::{BatchId, ParticipantId, Role, Timestamp};
use serde::Serialize;

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Register a participant profile.
    Register {
        /// Identity key of the new participant.
        identity: ParticipantId,
        #[arg(long)]
        name: String,
        #[arg(long)]
        country: String,
        /// Role name ("producer" … "consumer") or code (0–4).
        #[arg(long)]
        role: Role,
        /// Registration timestamp; defaults to now.
        #[arg(long)]
        timestamp: Option<u64>,
    },
    /// Mint a batch, optionally consuming a held parent batch.
    Mint {
        /// Identity submitting the call.
        #[arg(long = "as")]
        caller: ParticipantId,
        /// Parent batch to consume; omit (or 0) for a genesis batch.
        #[arg(long, default_value = "0")]
        parent: BatchId,
        #[arg(long)]
        id: BatchId,
        #[arg(long)]
        quantity: u64,
        #[arg(long)]
        product: String,
        #[arg(long)]
        unit: String,
    },
    /// Hand a held batch to another participant.
    Transfer {
        #[arg(long = "as")]
        caller: ParticipantId,
        #[arg(long)]
        to: ParticipantId,
        #[arg(long)]
        id: BatchId,
    },
    /// Confirm receipt of an in-transit batch.
    Confirm {
        #[arg(long = "as")]
        caller: ParticipantId,
        #[arg(long)]
        id: BatchId,
    },
    /// Show a participant profile.
    Profile { identity: ParticipantId },
    /// Show a batch record.
    Record { id: BatchId },
    /// Show the current holder of a batch.
    Holder { id: BatchId },
    /// List every batch a participant has handled (0 = consumed or passed on).
    Inventory {
        identity: ParticipantId,
        /// Omit tombstoned slots.
        #[arg(long)]
        live: bool,
    },
    /// Show a batch and its ancestors back to the genesis batch.
    Lineage { id: BatchId },
    /// Show ledger counts.
    Summary,
}

impl Command {
    /// Whether the command changes ledger state and needs a snapshot write.
    pub fn mutates(&self) -> bool {
        matches!(
            self,
            Self::Register { .. } | Self::Mint { .. } | Self::Transfer { .. } | Self::Confirm { .. }
        )
    }
}

/// Execute `command`. Queries print JSON to stdout; mutations are reported
/// through the ledger's audit events.
pub fn execute(command: Command, ledger: &mut CustodyLedger) -> anyhow::Result<()> {
    match command {
        Command::Register {
            identity,
            name,
            country,
            role,
            timestamp,
        } => {
            let registered_at = timestamp.map(Timestamp::new).unwrap_or_else(Timestamp::now);
            ledger.register(identity, name, country, registered_at, role)?;
        }
        Command::Mint {
            caller,
            parent,
            id,
            quantity,
            product,
            unit,
        } => ledger.mint(&caller, parent, id, quantity, product, unit)?,
        Command::Transfer { caller, to, id } => ledger.initiate_transfer(&caller, &to, id)?,
        Command::Confirm { caller, id } => ledger.confirm_receipt(&caller, id)?,
        Command::Profile { identity } => print_json(&ledger.profile(&identity)?)?,
        Command::Record { id } => print_json(&ledger.record(id)?)?,
        Command::Holder { id } => print_json(&ledger.holder_of(id)?)?,
        Command::Inventory { identity, live } => {
            let slots = if live {
                ledger.live_inventory(&identity)
            } else {
                ledger.list_held(&identity)
            };
            print_json(&slots)?
        }
        Command::Lineage { id } => print_json(&ledger.lineage(id)?)?,
        Command::Summary => print_json(&ledger.summary())?,
    }
    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
