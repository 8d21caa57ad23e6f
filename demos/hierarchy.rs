use candle_core::{DType, Device, Result, Tensor};
use candle_nn::{VarBuilder, VarMap};

use candle_diffpool::filters::normalize_adjacency;
use candle_diffpool::nn::{DiffPool, Gcn, Graph, GraphModule};
use candle_diffpool::utils::CooMatrix;

struct Hierarchy {
    front: Gcn,
    coarsen: DiffPool,
    back: Gcn,
}

impl Hierarchy {
    fn new(vs: VarBuilder) -> Result<Self> {
        Ok(Self {
            front: Gcn::new(&[3, 8], vs.pp("front"))?,
            coarsen: DiffPool::new(8, 4, vs.pp("coarsen"))?,
            back: Gcn::new(&[8, 2], vs.pp("back"))?,
        })
    }

    fn forward(&self, graph: &Graph) -> Result<Tensor> {
        let graph = self.front.forward(graph)?;
        let graph = self.coarsen.forward(&graph)?;
        let graph = self.back.forward(&graph)?;
        // readout over the surviving clusters
        graph.features.mean(0)
    }
}

// cargo run --example hierarchy
fn main() -> anyhow::Result<()> {
    let device = Device::Cpu;

    // two triangles joined by a bridge edge
    let edges = [(0u32, 1u32), (1, 2), (0, 2), (3, 4), (4, 5), (3, 5), (2, 3)];
    let mut rows = Vec::new();
    let mut cols = Vec::new();
    for (u, v) in edges {
        rows.push(u);
        cols.push(v);
        rows.push(v);
        cols.push(u);
    }
    let values = vec![1f32; rows.len()];
    let adjacency = CooMatrix::new(rows, cols, values, (6, 6))?.to_dense(&device)?;
    let filter = normalize_adjacency(&adjacency)?;
    let features = Tensor::arange(0f32, 18.0, &device)?.reshape((6, 3))?;
    let graph = Graph::new(filter, features)?;

    let varmap = VarMap::new();
    let vs = VarBuilder::from_varmap(&varmap, DType::F32, &device);
    let model = Hierarchy::new(vs.pp("model"))?;

    let readout = model.forward(&graph)?;
    println!("readout: {:?}", readout.to_vec1::<f32>()?);
    Ok(())
}
