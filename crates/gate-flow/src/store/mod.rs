//! Session storage contract
//!
//! The controller reads a session once at the start of a request and writes
//! it once at the end (`set` then `save`). There is no compare-and-swap:
//! two concurrent requests for one session race, and the later write wins.

mod file;
mod memory;

pub use file::FileSessionStore;
pub use memory::MemorySessionStore;

use crate::error::StoreError;
use crate::state::FlowState;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;
use uuid::Uuid;

/// Opaque session identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub Uuid);

impl SessionId {
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for SessionId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for SessionId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

/// Keyed storage for [`FlowState`] records
pub trait SessionStore: Send + Sync {
    /// Load a session; `Ok(None)` when the id is unknown
    fn get(&self, id: &SessionId) -> Result<Option<FlowState>, StoreError>;

    /// Stage a record for `id`
    fn set(&self, id: &SessionId, state: &FlowState) -> Result<(), StoreError>;

    /// Drop a session
    fn delete(&self, id: &SessionId) -> Result<(), StoreError>;

    /// Make the staged record for `id` durable
    fn save(&self, id: &SessionId) -> Result<(), StoreError>;

    /// Remove every session idle for longer than `idle_timeout`, returning
    /// how many were removed
    fn purge_idle(&self, now: i64, idle_timeout: i64) -> Result<usize, StoreError>;
}
