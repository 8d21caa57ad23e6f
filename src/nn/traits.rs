use candle_core::Result;

use super::graph::Graph;

pub trait GraphModule {
    fn forward_t(&self, graph: &Graph, train: bool) -> Result<Graph>;
    fn forward(&self, graph: &Graph) -> Result<Graph> {
        self.forward_t(graph, false)
    }
}

/// Whether a pooling operator reduces the filter along with the features.
/// Operators that do not leave the caller responsible for coarsening the
/// adjacency side separately.
pub trait GraphPooling {
    fn coarsens_adjacency(&self) -> bool;
}
