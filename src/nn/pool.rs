use std::collections::HashMap;
use std::str::FromStr;

use candle_core::{bail, DType, Result, Tensor};
use itertools::Itertools;

use super::{Graph, GraphPooling};

/// Reduction applied to each cluster's feature rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PoolMode {
    Max,
    Mean,
}

impl FromStr for PoolMode {
    type Err = candle_core::Error;
    fn from_str(s: &str) -> Result<Self> {
        match s {
            "max" => Ok(Self::Max),
            "mean" => Ok(Self::Mean),
            _ => bail!("pooling mode must be \"max\" or \"mean\", got {s:?}"),
        }
    }
}

/// Pools feature rows by an externally supplied clustering. The filter is
/// passed through unreduced, so a caller that keeps convolving afterwards
/// must coarsen the adjacency side itself (`coarsens_adjacency` says so).
pub struct SimplePool {
    mode: PoolMode,
}

impl SimplePool {
    pub fn new(mode: PoolMode) -> Self {
        Self { mode }
    }

    /// `clusters` assigns each of the `N` feature rows a contiguous id in
    /// `[0, K)`; the result has one row per cluster.
    pub fn forward(&self, graph: &Graph, clusters: &Tensor) -> Result<Graph> {
        let (num_nodes, _) = graph.features.dims2()?;
        let num_indicated = clusters.dims1()?;
        if num_indicated != num_nodes {
            bail!("cluster indicator covers {num_indicated} nodes, features have {num_nodes}");
        }
        let clusters = clusters.to_dtype(DType::U32)?.to_vec1::<u32>()?;
        let num_clusters = match clusters.iter().max() {
            Some(&max) => max as usize + 1,
            None => bail!("cluster indicator is empty"),
        };
        let members: HashMap<u32, Vec<u32>> = clusters
            .iter()
            .enumerate()
            .map(|(node, &cluster)| (cluster, node as u32))
            .into_group_map();

        let mut rows = Vec::with_capacity(num_clusters);
        for cluster in 0..num_clusters as u32 {
            let nodes = match members.get(&cluster) {
                Some(nodes) => nodes,
                None => bail!("cluster ids must be contiguous, cluster {cluster} has no members"),
            };
            let index = Tensor::from_vec(nodes.clone(), nodes.len(), graph.features.device())?;
            let selected = graph.features.index_select(&index, 0)?;
            rows.push(match self.mode {
                PoolMode::Max => selected.max(0)?,
                PoolMode::Mean => selected.mean(0)?,
            });
        }
        Ok(Graph {
            filter: graph.filter.clone(),
            features: Tensor::stack(&rows, 0)?,
        })
    }
}

impl GraphPooling for SimplePool {
    fn coarsens_adjacency(&self) -> bool {
        false
    }
}
