//! Batch identifiers.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::TypesError;

/// Identifier of a batch record, supplied externally at mint time.
///
/// Zero is reserved: as a parent pointer it means "no lineage" (genesis), and
/// in an inventory slot it marks a tombstone. A live batch never has id zero.
#[derive(Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BatchId(u64);

impl BatchId {
    pub const ZERO: Self = Self(0);

    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

impl fmt::Debug for BatchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BatchId({})", self.0)
    }
}

impl fmt::Display for BatchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for BatchId {
    fn from(raw: u64) -> Self {
        Self(raw)
    }
}

impl FromStr for BatchId {
    type Err = TypesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<u64>()
            .map(Self)
            .map_err(|_| TypesError::InvalidBatchId(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_is_sentinel() {
        assert!(BatchId::ZERO.is_zero());
        assert!(BatchId::default().is_zero());
        assert!(!BatchId::new(1234).is_zero());
    }

    #[test]
    fn parses_decimal() {
        assert_eq!("12345".parse::<BatchId>().unwrap(), BatchId::new(12345));
        assert!(matches!(
            "12a".parse::<BatchId>(),
            Err(TypesError::InvalidBatchId(_))
        ));
        assert!("-1".parse::<BatchId>().is_err());
    }
}
