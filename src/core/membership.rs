use crate::core::agent::AgentId;
use crate::core::island::Island;

/// Records which agents have ever settled a payment on which island.
///
/// Membership is distinct from eligibility: an agent may settle on its
/// own local island from the first pass, but it only becomes a member
/// once it actually does. Membership is monotonic; nothing unmarks an
/// agent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MembershipTracker {
    /// member[island][agent]
    member: Vec<Vec<bool>>,
}

impl MembershipTracker {
    pub fn new(agent_count: u32, island_count: u32) -> Self {
        Self {
            member: vec![vec![false; agent_count as usize]; island_count as usize],
        }
    }

    /// Mark an agent as a member of an island. Idempotent.
    pub fn mark(&mut self, island: Island, agent: AgentId) {
        self.member[island.slot()][agent.index()] = true;
    }

    pub fn is_member(&self, island: Island, agent: AgentId) -> bool {
        self.member[island.slot()][agent.index()]
    }

    /// Members of an island in ascending agent order.
    pub fn members_of(&self, island: Island) -> Vec<AgentId> {
        self.member[island.slot()]
            .iter()
            .enumerate()
            .filter(|(_, is_member)| **is_member)
            .map(|(agent, _)| AgentId::new(agent as u32))
            .collect()
    }

    pub fn member_count(&self, island: Island) -> usize {
        self.member[island.slot()].iter().filter(|m| **m).count()
    }

    pub fn island_count(&self) -> usize {
        self.member.len()
    }
}
