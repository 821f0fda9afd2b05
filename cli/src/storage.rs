//! Snapshot persistence between CLI invocations.

use std::fs;
use std::path::Path;

use anyhow::Context;
use custody_ledger::{CustodyLedger, LedgerSnapshot};
use tracing::{debug, info};

/// Load the ledger at `path`, or an empty ledger if no snapshot exists yet.
pub fn load(path: &Path) -> anyhow::Result<CustodyLedger> {
    if !path.exists() {
        debug!(path = %path.display(), "no snapshot yet, starting empty");
        return Ok(CustodyLedger::new());
    }
    let bytes = fs::read(path).with_context(|| format!("reading snapshot {}", path.display()))?;
    let snapshot = LedgerSnapshot::from_bytes(&bytes)
        .with_context(|| format!("decoding snapshot {}", path.display()))?;
    let hash = snapshot.hash_hex();
    let ledger = CustodyLedger::from_snapshot(snapshot)
        .with_context(|| format!("restoring snapshot {}", path.display()))?;
    debug!(path = %path.display(), %hash, "snapshot loaded");
    Ok(ledger)
}

/// Write the ledger to `path`. The snapshot is written beside the target
/// and renamed over it, so a crash never leaves a half-written file.
pub fn save(ledger: &CustodyLedger, path: &Path) -> anyhow::Result<()> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
    }
    let snapshot = ledger.snapshot();
    let bytes = snapshot.to_bytes()?;
    let tmp = path.with_extension("tmp");
    fs::write(&tmp, &bytes).with_context(|| format!("writing {}", tmp.display()))?;
    fs::rename(&tmp, path).with_context(|| format!("replacing {}", path.display()))?;
    info!(path = %path.display(), hash = %snapshot.hash_hex(), "snapshot saved");
    Ok(())
}
