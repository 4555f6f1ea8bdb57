use crate::core::agent::AgentId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A currency island.
///
/// Index 0 is the universal currency (legal tender), available to every
/// agent as the settlement fallback. Indices `1..island_count` are local
/// currencies, each shared by one contiguous block of agents.
///
/// Serialized as its integer index.
///
/// # Examples
///
/// ```
/// use island_currencies::core::island::Island;
///
/// assert_eq!(Island::from_index(0), Island::Universal);
/// assert_eq!(Island::from_index(3), Island::Local(3));
/// assert_eq!(Island::Local(3).index(), 3);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "u32", into = "u32")]
pub enum Island {
    /// Legal tender, island 0.
    Universal,
    /// A local currency. The index is never 0; build islands from an
    /// index with [`Island::from_index`], which maps 0 to `Universal`.
    Local(u32),
}

impl Island {
    pub fn from_index(index: u32) -> Self {
        match index {
            0 => Island::Universal,
            k => Island::Local(k),
        }
    }

    pub fn index(self) -> u32 {
        match self {
            Island::Universal => 0,
            Island::Local(k) => k,
        }
    }

    /// Position of this island in per-island tables.
    pub fn slot(self) -> usize {
        debug_assert!(
            self != Island::Local(0),
            "Local(0) aliases legal tender; use Island::from_index"
        );
        self.index() as usize
    }

    pub fn is_universal(self) -> bool {
        matches!(self, Island::Universal)
    }
}

impl From<u32> for Island {
    fn from(index: u32) -> Self {
        Island::from_index(index)
    }
}

impl From<Island> for u32 {
    fn from(island: Island) -> Self {
        island.index()
    }
}

impl fmt::Display for Island {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Island::Universal => write!(f, "LT"),
            Island::Local(k) => write!(f, "L{}", k),
        }
    }
}

/// Maps agents onto islands.
///
/// Agents are split into `island_count` contiguous blocks of
/// `island_divisor = agent_count / island_count` agents:
/// `island_of(agent) = (agent / island_divisor) mod island_count`.
/// The mapping is pure and fixed for the lifetime of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IslandClassifier {
    island_divisor: u32,
    island_count: u32,
}

impl IslandClassifier {
    /// Build a classifier for a population.
    ///
    /// # Panics
    ///
    /// Panics if `island_count` is zero or does not divide `agent_count`
    /// into non-empty blocks. Configuration validation rules these out
    /// before a classifier is ever built.
    pub fn new(agent_count: u32, island_count: u32) -> Self {
        assert!(
            island_count > 0 && agent_count >= island_count,
            "cannot split {} agents into {} islands",
            agent_count,
            island_count
        );
        Self {
            island_divisor: agent_count / island_count,
            island_count,
        }
    }

    /// The island an agent belongs to. The agent must be in `[0, agent_count)`.
    pub fn classify(&self, agent: AgentId) -> Island {
        Island::from_index((agent.get() / self.island_divisor) % self.island_count)
    }

    pub fn island_divisor(&self) -> u32 {
        self.island_divisor
    }

    pub fn island_count(&self) -> u32 {
        self.island_count
    }

    /// Every island, universal first, in index order.
    pub fn islands(&self) -> impl Iterator<Item = Island> {
        (0..self.island_count).map(Island::from_index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_two_islands() {
        let classifier = IslandClassifier::new(20, 2);
        assert_eq!(classifier.island_divisor(), 10);
        assert_eq!(classifier.classify(AgentId::new(0)), Island::Universal);
        assert_eq!(classifier.classify(AgentId::new(5)), Island::Universal);
        assert_eq!(classifier.classify(AgentId::new(9)), Island::Universal);
        assert_eq!(classifier.classify(AgentId::new(10)), Island::Local(1));
        assert_eq!(classifier.classify(AgentId::new(15)), Island::Local(1));
        assert_eq!(classifier.classify(AgentId::new(19)), Island::Local(1));
    }

    #[test]
    fn test_single_island_is_all_legal_tender() {
        let classifier = IslandClassifier::new(7, 1);
        for a in 0..7 {
            assert_eq!(classifier.classify(AgentId::new(a)), Island::Universal);
        }
    }

    #[test]
    fn test_blocks_are_contiguous() {
        let classifier = IslandClassifier::new(12, 4);
        let islands: Vec<u32> = (0..12)
            .map(|a| classifier.classify(AgentId::new(a)).index())
            .collect();
        assert_eq!(islands, vec![0, 0, 0, 1, 1, 1, 2, 2, 2, 3, 3, 3]);
    }

    #[test]
    fn test_islands_iterates_in_order() {
        let classifier = IslandClassifier::new(9, 3);
        let islands: Vec<Island> = classifier.islands().collect();
        assert_eq!(
            islands,
            vec![Island::Universal, Island::Local(1), Island::Local(2)]
        );
    }

    #[test]
    fn test_island_serde_as_index() {
        assert_eq!(serde_json::to_string(&Island::Local(2)).unwrap(), "2");
        let back: Island = serde_json::from_str("0").unwrap();
        assert_eq!(back, Island::Universal);
    }

    #[test]
    fn test_island_display() {
        assert_eq!(Island::Universal.to_string(), "LT");
        assert_eq!(Island::Local(4).to_string(), "L4");
    }

    #[test]
    fn test_from_index_never_builds_local_zero() {
        assert_eq!(Island::from_index(0), Island::Universal);
        assert_eq!(Island::from(0u32), Island::Universal);
        let back: Island = serde_json::from_str("0").unwrap();
        assert!(back.is_universal());
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "Local(0) aliases legal tender")]
    fn test_local_zero_rejected_in_tables() {
        let _ = Island::Local(0).slot();
    }

    #[test]
    #[should_panic(expected = "cannot split")]
    fn test_zero_islands_panics() {
        IslandClassifier::new(10, 0);
    }
}
