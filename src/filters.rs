use candle_core::{bail, Result, Tensor};

/// Symmetric renormalization `D^-1/2 (A + I) D^-1/2` of an adjacency
/// matrix, the standard single-hop propagation filter.
pub fn normalize_adjacency(adjacency: &Tensor) -> Result<Tensor> {
    let (num_nodes, num_cols) = adjacency.dims2()?;
    if num_nodes != num_cols {
        bail!("adjacency must be square, got ({num_nodes}, {num_cols})");
    }
    let with_loops = adjacency.add(&identity(num_nodes, adjacency)?)?;
    // self-loops keep every degree positive
    let inv_sqrt = with_loops.sum(1)?.powf(-0.5)?;
    let scaled = with_loops.broadcast_mul(&inv_sqrt.reshape((num_nodes, 1))?)?;
    scaled.broadcast_mul(&inv_sqrt.reshape((1, num_nodes))?)
}

fn identity(n: usize, like: &Tensor) -> Result<Tensor> {
    let mut data = vec![0f32; n * n];
    for i in 0..n {
        data[i * n + i] = 1.0;
    }
    Tensor::from_vec(data, (n, n), like.device())?.to_dtype(like.dtype())
}
