use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of an agent in the simulated population.
///
/// Agents are not objects of their own: an agent is purely an index in
/// `[0, agent_count)`, and every per-agent table is indexed by it.
///
/// # Examples
///
/// ```
/// use island_currencies::core::agent::AgentId;
///
/// let a = AgentId::new(3);
/// let b = AgentId::new(7);
/// assert!(a < b);
/// assert_eq!(a.index(), 3);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AgentId(u32);

impl AgentId {
    pub fn new(id: u32) -> Self {
        Self(id)
    }

    /// The raw agent number.
    pub fn get(self) -> u32 {
        self.0
    }

    /// Position of this agent in per-agent tables.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for AgentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for AgentId {
    fn from(id: u32) -> Self {
        Self::new(id)
    }
}
