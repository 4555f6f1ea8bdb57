//! Settlement network graph built from per-island edges.

pub mod settlement_graph;
