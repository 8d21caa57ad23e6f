use candle_core::{bail, Result, Tensor};

/// A propagation filter paired with the node features it acts on.
///
/// The two travel together through the whole pipeline: every layer consumes a
/// pair and emits a new pair, possibly with a different node or channel
/// count. Pairs are never mutated in place.
#[derive(Debug, Clone)]
pub struct Graph {
    /// Square propagation operator, `(N, N)` or `(B, N, N)`.
    pub filter: Tensor,
    /// Node features, `(N, C)` or `(B, N, C)`.
    pub features: Tensor,
}

impl Graph {
    /// Checks the pair before it enters the layer pipeline, so dimension
    /// errors surface here rather than deep inside a matmul.
    pub fn new(filter: Tensor, features: Tensor) -> Result<Self> {
        let fdims = filter.dims();
        if fdims.len() != 2 && fdims.len() != 3 {
            bail!("filter must be (N, N) or (B, N, N), got {fdims:?}");
        }
        let num_nodes = fdims[fdims.len() - 1];
        if fdims[fdims.len() - 2] != num_nodes {
            bail!("filter must be square, got {fdims:?}");
        }
        let xdims = features.dims();
        if xdims.len() != 2 && xdims.len() != 3 {
            bail!("features must be (N, C) or (B, N, C), got {xdims:?}");
        }
        let num_rows = xdims[xdims.len() - 2];
        if num_rows != num_nodes {
            bail!("filter covers {num_nodes} nodes but features have {num_rows} rows");
        }
        if fdims.len() == 3 && xdims.len() == 3 && fdims[0] != xdims[0] {
            bail!("batch mismatch between filter {fdims:?} and features {xdims:?}");
        }
        Ok(Self { filter, features })
    }

    pub fn num_nodes(&self) -> usize {
        let dims = self.features.dims();
        dims[dims.len() - 2]
    }

    pub fn num_features(&self) -> usize {
        let dims = self.features.dims();
        dims[dims.len() - 1]
    }
}

#[cfg(test)]
mod tests {
    use candle_core::{DType, Device, Result, Tensor};

    use super::Graph;

    #[test]
    fn accepts_matching_pair() -> Result<()> {
        let device = Device::Cpu;
        let filter = Tensor::ones((4, 4), DType::F32, &device)?;
        let features = Tensor::ones((4, 3), DType::F32, &device)?;
        let graph = Graph::new(filter, features)?;
        assert_eq!(graph.num_nodes(), 4);
        assert_eq!(graph.num_features(), 3);
        Ok(())
    }

    #[test]
    fn accepts_batched_features_with_shared_filter() -> Result<()> {
        let device = Device::Cpu;
        let filter = Tensor::ones((4, 4), DType::F32, &device)?;
        let features = Tensor::ones((2, 4, 3), DType::F32, &device)?;
        assert!(Graph::new(filter, features).is_ok());
        Ok(())
    }

    #[test]
    fn rejects_non_square_filter() -> Result<()> {
        let device = Device::Cpu;
        let filter = Tensor::ones((4, 5), DType::F32, &device)?;
        let features = Tensor::ones((5, 3), DType::F32, &device)?;
        assert!(Graph::new(filter, features).is_err());
        Ok(())
    }

    #[test]
    fn rejects_node_count_mismatch() -> Result<()> {
        let device = Device::Cpu;
        let filter = Tensor::ones((4, 4), DType::F32, &device)?;
        let features = Tensor::ones((5, 3), DType::F32, &device)?;
        assert!(Graph::new(filter, features).is_err());
        Ok(())
    }

    #[test]
    fn rejects_batch_mismatch() -> Result<()> {
        let device = Device::Cpu;
        let filter = Tensor::ones((2, 4, 4), DType::F32, &device)?;
        let features = Tensor::ones((3, 4, 3), DType::F32, &device)?;
        assert!(Graph::new(filter, features).is_err());
        Ok(())
    }

    #[test]
    fn rejects_flat_features() -> Result<()> {
        let device = Device::Cpu;
        let filter = Tensor::ones((4, 4), DType::F32, &device)?;
        let features = Tensor::ones(4, DType::F32, &device)?;
        assert!(Graph::new(filter, features).is_err());
        Ok(())
    }
}
