//! Participant registry — identity and role records.

use std::collections::HashMap;

use custody_types::{ParticipantId, Role, Timestamp};
use serde::{Deserialize, Serialize};

use crate::error::CustodyError;

/// A registered supply-chain participant. Immutable once stored.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    pub identity: ParticipantId,
    /// Display name.
    pub name: String,
    /// Country of origin.
    pub country: String,
    /// Registration timestamp, as supplied by the registrant.
    pub registered_at: Timestamp,
    pub role: Role,
}

/// Identity → profile map. Profiles are inserted once and never updated.
#[derive(Clone, Debug, Default)]
pub struct ParticipantRegistry {
    profiles: HashMap<ParticipantId, Participant>,
}

impl ParticipantRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail with `AlreadyRegistered` if `identity` already has a profile.
    pub fn ensure_vacant(&self, identity: &ParticipantId) -> Result<(), CustodyError> {
        if self.profiles.contains_key(identity) {
            return Err(CustodyError::AlreadyRegistered(identity.clone()));
        }
        Ok(())
    }

    /// Fail with `NotRegistered` unless `identity` has a profile.
    pub fn ensure_registered(&self, identity: &ParticipantId) -> Result<(), CustodyError> {
        if !self.profiles.contains_key(identity) {
            return Err(CustodyError::NotRegistered(identity.clone()));
        }
        Ok(())
    }

    pub fn register(&mut self, profile: Participant) -> Result<(), CustodyError> {
        self.ensure_vacant(&profile.identity)?;
        self.profiles.insert(profile.identity.clone(), profile);
        Ok(())
    }

    pub fn get(&self, identity: &ParticipantId) -> Result<&Participant, CustodyError> {
        self.profiles
            .get(identity)
            .ok_or_else(|| CustodyError::NotRegistered(identity.clone()))
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Participant> {
        self.profiles.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(id: &str, role: Role) -> Participant {
        Participant {
            identity: ParticipantId::from(id),
            name: "Juan".into(),
            country: "El Salvador".into(),
            registered_at: Timestamp::new(1_700_000_000),
            role,
        }
    }

    #[test]
    fn register_then_get_returns_same_profile() {
        let mut registry = ParticipantRegistry::new();
        registry.register(profile("farmer", Role::Producer)).unwrap();
        assert_eq!(
            registry.get(&ParticipantId::from("farmer")).unwrap(),
            &profile("farmer", Role::Producer)
        );
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn second_registration_is_rejected_and_keeps_first() {
        let mut registry = ParticipantRegistry::new();
        registry.register(profile("farmer", Role::Producer)).unwrap();
        let err = registry.register(profile("farmer", Role::Consumer)).unwrap_err();
        assert_eq!(err, CustodyError::AlreadyRegistered(ParticipantId::from("farmer")));
        assert_eq!(registry.get(&ParticipantId::from("farmer")).unwrap().role, Role::Producer);
    }

    #[test]
    fn unknown_identity_is_not_registered() {
        let registry = ParticipantRegistry::new();
        let ghost = ParticipantId::from("ghost");
        assert_eq!(registry.get(&ghost), Err(CustodyError::NotRegistered(ghost.clone())));
        assert!(registry.ensure_registered(&ghost).is_err());
        assert!(registry.ensure_vacant(&ghost).is_ok());
    }
}
