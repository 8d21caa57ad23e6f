use candle_core::{Result, Tensor, D};
use candle_nn::{ops, VarBuilder};

use super::{GcnConv, Graph, GraphModule, GraphPooling};

/// Hierarchical coarsening with a learned soft clustering.
/// https://arxiv.org/abs/1806.08804
///
/// Two internal convolutions run over the same input pair: `embed` refines
/// the node features, `pool` produces per-node cluster logits. The softmaxed
/// logits S fold the graph down to exactly `max_clusters` nodes via
/// `X' = Sᵗ·Z` and `A' = Sᵗ·(F·S)`, so both sides of the pair stay
/// consistent after pooling.
pub struct DiffPool {
    embed: GcnConv,
    pool: GcnConv,
    max_clusters: usize,
}

impl DiffPool {
    pub fn new(in_dim: usize, max_clusters: usize, vs: VarBuilder) -> Result<Self> {
        Ok(Self {
            embed: GcnConv::new(in_dim, in_dim, vs.pp("embed"))?,
            pool: GcnConv::new(in_dim, max_clusters, vs.pp("pool"))?,
            max_clusters,
        })
    }

    pub fn max_clusters(&self) -> usize {
        self.max_clusters
    }

    /// Row-normalized cluster memberships, `(N, max_clusters)` with each
    /// row summing to 1.
    pub fn soft_assignments(&self, graph: &Graph) -> Result<Tensor> {
        self.soft_assignments_t(graph, false)
    }

    pub fn soft_assignments_t(&self, graph: &Graph, train: bool) -> Result<Tensor> {
        let logits = self.pool.forward_t(graph, train)?.features;
        ops::softmax(&logits, D::Minus1)
    }
}

impl GraphModule for DiffPool {
    fn forward_t(&self, graph: &Graph, train: bool) -> Result<Graph> {
        let assignments = self.soft_assignments_t(graph, train)?;
        let embedded = self.embed.forward_t(graph, train)?.features;

        let assignments_t = assignments.t()?;
        let features = assignments_t.broadcast_matmul(&embedded)?;
        let filter =
            assignments_t.broadcast_matmul(&graph.filter.broadcast_matmul(&assignments)?)?;
        Graph::new(filter, features)
    }
}

impl GraphPooling for DiffPool {
    fn coarsens_adjacency(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use candle_core::{DType, Device, Result, Tensor};
    use candle_nn::{VarBuilder, VarMap};

    use super::DiffPool;
    use crate::nn::{Graph, GraphModule, GraphPooling};

    fn symmetric_graph(device: &Device) -> Result<Graph> {
        // arbitrary dense symmetric filter over six nodes
        let base = Tensor::arange(0f32, 36.0, device)?.reshape((6, 6))?;
        let filter = base.add(&base.t()?)?;
        let features = Tensor::arange(0f32, 24.0, device)?.reshape((6, 4))?;
        Graph::new(filter, features)
    }

    #[test]
    fn coarsens_to_fixed_cluster_count() -> Result<()> {
        let device = Device::Cpu;
        let varmap = VarMap::new();
        let vs = VarBuilder::from_varmap(&varmap, DType::F32, &device);
        let graph = symmetric_graph(&device)?;

        let pool = DiffPool::new(4, 3, vs.pp("diffpool"))?;
        let out = pool.forward(&graph)?;
        assert_eq!(out.filter.dims(), &[3, 3]);
        assert_eq!(out.features.dims(), &[3, 4]);
        assert_eq!(pool.max_clusters(), 3);
        assert!(pool.coarsens_adjacency());
        Ok(())
    }

    #[test]
    fn assignment_rows_sum_to_one() -> Result<()> {
        let device = Device::Cpu;
        let varmap = VarMap::new();
        let vs = VarBuilder::from_varmap(&varmap, DType::F32, &device);
        let graph = symmetric_graph(&device)?;

        let pool = DiffPool::new(4, 3, vs.pp("diffpool"))?;
        let assignments = pool.soft_assignments(&graph)?;
        assert_eq!(assignments.dims(), &[6, 3]);
        for row_sum in assignments.sum(1)?.to_vec1::<f32>()? {
            assert!((row_sum - 1.0).abs() < 1e-5);
        }
        Ok(())
    }

    #[test]
    fn symmetric_filter_stays_symmetric() -> Result<()> {
        let device = Device::Cpu;
        let varmap = VarMap::new();
        let vs = VarBuilder::from_varmap(&varmap, DType::F32, &device);
        let graph = symmetric_graph(&device)?;

        let pool = DiffPool::new(4, 3, vs.pp("diffpool"))?;
        let coarse = pool.forward(&graph)?.filter.to_vec2::<f32>()?;
        for i in 0..3 {
            for j in 0..3 {
                assert!((coarse[i][j] - coarse[j][i]).abs() < 1e-3);
            }
        }
        Ok(())
    }
}
