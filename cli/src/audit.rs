//! Audit events held back until the snapshot that records them is on disk.

use std::io::{self, Write};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use custody_ledger::{CustodyLedger, LedgerEvent};

#[derive(Clone, Default)]
pub struct PendingEvents(Arc<Mutex<Vec<LedgerEvent>>>);

impl PendingEvents {
    pub fn attach(&self, ledger: &mut CustodyLedger) {
        let sink = self.clone();
        ledger.subscribe(Box::new(move |event| sink.lock().push(event.clone())));
    }

    /// Write every buffered event as one JSON line and empty the buffer.
    pub fn flush_to(&self, out: &mut impl Write) -> io::Result<usize> {
        let events = std::mem::take(&mut *self.lock());
        for event in &events {
            match serde_json::to_string(event) {
                Ok(line) => writeln!(out, "{line}")?,
                Err(e) => tracing::warn!(kind = event.kind(), "cannot encode audit event: {e}"),
            }
        }
        Ok(events.len())
    }

    fn lock(&self) -> MutexGuard<'_, Vec<LedgerEvent>> {
        self.0.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
