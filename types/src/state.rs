//! State enums for participants and batches.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::TypesError;

/// The role a participant plays in the supply chain. Fixed at registration.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    /// Grows or extracts the raw goods.
    Producer,
    /// Transforms raw goods into processed goods.
    Processor,
    /// Moves goods across borders.
    Exporter,
    /// Regional operator receiving exported goods.
    Operator,
    /// End consumer.
    Consumer,
}

impl Role {
    pub const ALL: [Role; 5] = [
        Role::Producer,
        Role::Processor,
        Role::Exporter,
        Role::Operator,
        Role::Consumer,
    ];

    /// Stable numeric code of the role (Producer = 0 … Consumer = 4).
    pub fn ordinal(&self) -> u8 {
        match self {
            Self::Producer => 0,
            Self::Processor => 1,
            Self::Exporter => 2,
            Self::Operator => 3,
            Self::Consumer => 4,
        }
    }

    pub fn from_ordinal(code: u8) -> Option<Self> {
        Self::ALL.get(code as usize).copied()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Producer => "producer",
            Self::Processor => "processor",
            Self::Exporter => "exporter",
            Self::Operator => "operator",
            Self::Consumer => "consumer",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = TypesError;

    /// Accepts the lowercase role name (case-insensitive) or its numeric code.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if let Ok(code) = trimmed.parse::<u8>() {
            return Self::from_ordinal(code).ok_or_else(|| TypesError::UnknownRole(s.to_string()));
        }
        Self::ALL
            .iter()
            .find(|r| r.as_str().eq_ignore_ascii_case(trimmed))
            .copied()
            .ok_or_else(|| TypesError::UnknownRole(s.to_string()))
    }
}

/// Custody status of a batch record.
///
/// ```text
/// Created ──transfer──▶ InTransit ──confirm──▶ Accepted
///                           ▲                     │
///                           └──────transfer───────┘
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BatchStatus {
    /// Freshly minted; still with its creator.
    Created,
    /// Handed to a new holder who has not confirmed receipt yet.
    InTransit,
    /// Receipt confirmed by the current holder.
    Accepted,
}

impl BatchStatus {
    /// Whether the batch may be consumed as the parent of a derivation mint.
    pub fn can_derive(&self) -> bool {
        matches!(self, Self::Accepted)
    }

    /// Whether a transfer is waiting for the holder's confirmation.
    pub fn is_pending(&self) -> bool {
        matches!(self, Self::InTransit)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::InTransit => "in_transit",
            Self::Accepted => "accepted",
        }
    }
}

impl fmt::Display for BatchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BatchStatus {
    type Err = TypesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "created" => Ok(Self::Created),
            "in_transit" | "intransit" => Ok(Self::InTransit),
            "accepted" => Ok(Self::Accepted),
            _ => Err(TypesError::UnknownStatus(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_ordinals_are_stable() {
        assert_eq!(Role::Producer.ordinal(), 0);
        assert_eq!(Role::Consumer.ordinal(), 4);
        assert_eq!(Role::from_ordinal(1), Some(Role::Processor));
        assert_eq!(Role::from_ordinal(5), None);
    }

    #[test]
    fn role_parses_names_and_codes() {
        assert_eq!("Exporter".parse::<Role>().unwrap(), Role::Exporter);
        assert_eq!("3".parse::<Role>().unwrap(), Role::Operator);
        assert_eq!(
            "farmer".parse::<Role>(),
            Err(TypesError::UnknownRole("farmer".to_string()))
        );
        assert!("9".parse::<Role>().is_err());
    }

    #[test]
    fn only_accepted_batches_derive() {
        assert!(!BatchStatus::Created.can_derive());
        assert!(!BatchStatus::InTransit.can_derive());
        assert!(BatchStatus::Accepted.can_derive());
        assert!(BatchStatus::InTransit.is_pending());
    }

    #[test]
    fn status_display_parses_back() {
        for status in [BatchStatus::Created, BatchStatus::InTransit, BatchStatus::Accepted] {
            assert_eq!(status.to_string().parse::<BatchStatus>().unwrap(), status);
        }
    }
}
