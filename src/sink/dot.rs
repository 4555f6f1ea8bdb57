use crate::core::settlement::IslandEdges;
use crate::graph::settlement_graph::SettlementGraph;
use crate::sink::{SinkError, StepSink};
use log::debug;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Writes one Graphviz file per step, `step_NNN.dot`, holding every
/// settlement edge since run start with edges colored by island.
///
/// The file is opened and closed within each flush.
#[derive(Debug, Clone)]
pub struct DotSink {
    dir: PathBuf,
}

impl DotSink {
    /// The directory must already exist.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path_for_step(&self, step: u32) -> PathBuf {
        self.dir.join(format!("step_{:03}.dot", step))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl StepSink for DotSink {
    fn on_edges(&mut self, step: u32, edges: &IslandEdges) -> Result<(), SinkError> {
        let graph = SettlementGraph::from_edges(edges);
        let path = self.path_for_step(step);
        let mut out = BufWriter::new(File::create(&path)?);
        out.write_all(graph.to_dot().as_bytes())?;
        out.flush()?;
        debug!(
            "wrote {} edges across {} agents to {}",
            graph.edge_count(),
            graph.node_count(),
            path.display()
        );
        Ok(())
    }
}
