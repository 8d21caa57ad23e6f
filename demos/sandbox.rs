use candle_core::{DType, Device, Tensor};
use candle_nn::{VarBuilder, VarMap};

use candle_diffpool::filters::normalize_adjacency;
use candle_diffpool::nn::{Gcn, Graph, GraphModule};
use candle_diffpool::utils::CooMatrix;

// cargo run --example sandbox
fn main() -> anyhow::Result<()> {
    let device = Device::Cpu;

    // ring over six nodes, both edge directions
    let mut rows = Vec::new();
    let mut cols = Vec::new();
    for node in 0..6u32 {
        let next = (node + 1) % 6;
        rows.push(node);
        cols.push(next);
        rows.push(next);
        cols.push(node);
    }
    let values = vec![1f32; rows.len()];
    let adjacency = CooMatrix::new(rows, cols, values, (6, 6))?.to_dense(&device)?;
    let filter = normalize_adjacency(&adjacency)?;
    let features = Tensor::ones((6, 4), DType::F32, &device)?;
    let graph = Graph::new(filter, features)?;

    let varmap = VarMap::new();
    let vs = VarBuilder::from_varmap(&varmap, DType::F32, &device);
    let gcn = Gcn::new(&[4, 8, 2], vs.pp("gcn"))?;

    let out = gcn.forward(&graph)?;
    println!("{:?}", out.features.to_vec2::<f32>()?);
    Ok(())
}
