use crate::core::agent::AgentId;
use crate::core::island::Island;
use crate::core::settlement::{IslandEdges, Settlement};
use petgraph::dot::{Config, Dot};
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::Direction;
use std::collections::HashMap;

/// Edge colors, keyed by island index. Legal tender is black.
const ISLAND_COLORS: &[&str] = &[
    "black", "red", "blue", "green4", "orange", "purple", "brown", "cyan3", "magenta", "gold3",
];

/// DOT color used for an island's edges.
pub fn island_color(island: Island) -> &'static str {
    ISLAND_COLORS[island.slot() % ISLAND_COLORS.len()]
}

/// Directed multigraph of settlements: one node per agent that has
/// settled anything, one edge per settlement from payer to payee.
///
/// # Examples
///
/// ```
/// use island_currencies::prelude::*;
/// use island_currencies::graph::settlement_graph::SettlementGraph;
///
/// let mut graph = SettlementGraph::new();
/// graph.add_settlement(Settlement::new(
///     Island::Local(1), AgentId::new(12), AgentId::new(17), 1,
/// ));
/// graph.add_settlement(Settlement::new(
///     Island::Local(1), AgentId::new(17), AgentId::new(12), 1,
/// ));
///
/// assert_eq!(graph.node_count(), 2);
/// assert_eq!(graph.edge_count(), 2);
/// ```
#[derive(Debug, Clone, Default)]
pub struct SettlementGraph {
    graph: DiGraph<AgentId, Settlement>,
    nodes: HashMap<AgentId, NodeIndex>,
}

impl SettlementGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the graph of every edge recorded since run start.
    pub fn from_edges(edges: &IslandEdges) -> Self {
        let mut graph = Self::new();
        for settlement in edges.iter() {
            graph.add_settlement(*settlement);
        }
        graph
    }

    pub fn add_settlement(&mut self, settlement: Settlement) {
        let payer = self.node(settlement.payer);
        let payee = self.node(settlement.payee);
        self.graph.add_edge(payer, payee, settlement);
    }

    fn node(&mut self, agent: AgentId) -> NodeIndex {
        let graph = &mut self.graph;
        *self
            .nodes
            .entry(agent)
            .or_insert_with(|| graph.add_node(agent))
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Number of edges settled on one island.
    pub fn edge_count_on(&self, island: Island) -> usize {
        self.graph
            .edge_weights()
            .filter(|s| s.island == island)
            .count()
    }

    /// Payments an agent has made, across all islands.
    pub fn out_degree(&self, agent: AgentId) -> usize {
        self.degree(agent, Direction::Outgoing)
    }

    /// Payments an agent has received, across all islands.
    pub fn in_degree(&self, agent: AgentId) -> usize {
        self.degree(agent, Direction::Incoming)
    }

    fn degree(&self, agent: AgentId, direction: Direction) -> usize {
        self.nodes
            .get(&agent)
            .map_or(0, |&idx| self.graph.edges_directed(idx, direction).count())
    }

    /// Render as a Graphviz digraph with edges colored by island.
    pub fn to_dot(&self) -> String {
        let dot = Dot::with_attr_getters(
            &self.graph,
            &[Config::EdgeNoLabel],
            &|_, edge| format!("color = \"{}\"", island_color(edge.weight().island)),
            &|_, _| String::new(),
        );
        format!("{}", dot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settlement(island: u32, payer: u32, payee: u32) -> Settlement {
        Settlement::new(
            Island::from_index(island),
            AgentId::new(payer),
            AgentId::new(payee),
            1,
        )
    }

    #[test]
    fn test_from_island_edges() {
        let mut edges = IslandEdges::new(2);
        edges.record(settlement(0, 1, 2));
        edges.record(settlement(1, 12, 17));
        edges.record(settlement(0, 2, 1));
        edges.record(settlement(0, 1, 2));

        let graph = SettlementGraph::from_edges(&edges);
        assert_eq!(graph.node_count(), 4);
        assert_eq!(graph.edge_count(), 4);
        assert_eq!(graph.edge_count_on(Island::Universal), 3);
        assert_eq!(graph.edge_count_on(Island::Local(1)), 1);
        assert_eq!(graph.out_degree(AgentId::new(1)), 2);
        assert_eq!(graph.in_degree(AgentId::new(1)), 1);
        assert_eq!(graph.in_degree(AgentId::new(99)), 0);
    }

    #[test]
    fn test_dot_colors_edges_by_island() {
        let mut graph = SettlementGraph::new();
        graph.add_settlement(settlement(0, 1, 2));
        graph.add_settlement(settlement(1, 12, 17));

        let dot = graph.to_dot();
        assert!(dot.starts_with("digraph"));
        assert!(dot.contains("color = \"black\""));
        assert!(dot.contains("color = \"red\""));
        assert!(dot.contains("label = \"17\""));
    }

    #[test]
    fn test_color_palette_wraps() {
        assert_eq!(island_color(Island::Universal), "black");
        assert_eq!(
            island_color(Island::Local(ISLAND_COLORS.len() as u32)),
            "black"
        );
    }
}
