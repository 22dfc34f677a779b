//! Entity identity and capability types shared with the host engine.

mod capability;
mod snapshot;

pub use capability::*;
pub use snapshot::*;

use serde::{Deserialize, Serialize};

/// Numeric handle the host engine assigns to every world entity.
///
/// Zero is reserved: the engine reports "no attacker" as entity id 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct EntityId(pub u64);

impl EntityId {
    /// Wrap a raw engine handle.
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// The null entity id ("no entity").
    pub fn nil() -> Self {
        Self(0)
    }

    /// Check whether this is the null entity id.
    pub fn is_nil(&self) -> bool {
        self.0 == 0
    }
}

impl std::fmt::Display for EntityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identity of a player account, distinct from the in-world character entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct PlayerId(pub u64);

impl PlayerId {
    /// Wrap a raw player identity.
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// The null player id (unowned).
    pub fn nil() -> Self {
        Self(0)
    }

    /// Check whether this is the null player id.
    pub fn is_nil(&self) -> bool {
        self.0 == 0
    }
}

impl std::fmt::Display for PlayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
