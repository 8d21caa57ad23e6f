use candle_core::{bail, Result, Tensor};
use candle_nn::{Dropout, Init, VarBuilder};

use super::{Graph, GraphModule};

pub struct GcnConv {
    weight: Tensor,
    dropout: Option<Dropout>,
}

impl GcnConv {
    pub fn new(in_dim: usize, out_dim: usize, vs: VarBuilder) -> Result<Self> {
        // Xavier Uniform
        let bound = (6.0 / (in_dim + out_dim) as f64).sqrt();
        let weight = vs.get_with_hints(
            (in_dim, out_dim),
            "weight",
            Init::Uniform {
                lo: -bound,
                up: bound,
            },
        )?;
        Ok(Self {
            weight,
            dropout: None,
        })
    }

    /// Same layer, with the input features dropped out at the given rate
    /// while training.
    pub fn with_dropout(
        in_dim: usize,
        out_dim: usize,
        dropout_rate: f32,
        vs: VarBuilder,
    ) -> Result<Self> {
        let mut conv = Self::new(in_dim, out_dim, vs)?;
        conv.dropout = Some(Dropout::new(dropout_rate));
        Ok(conv)
    }
}

impl GraphModule for GcnConv {
    /// One convolution hop: `relu(F · (X · W))`. The filter comes back
    /// untouched so the next layer can reuse it without recomputation.
    fn forward_t(&self, graph: &Graph, train: bool) -> Result<Graph> {
        let (in_dim, _) = self.weight.dims2()?;
        let channels = graph.num_features();
        if channels != in_dim {
            bail!("layer expects {in_dim} input channels, features have {channels}");
        }
        let xs = match &self.dropout {
            Some(dropout) => dropout.forward(&graph.features, train)?,
            None => graph.features.clone(),
        };
        let hidden = xs.broadcast_matmul(&self.weight)?;
        let hidden = graph.filter.broadcast_matmul(&hidden)?;
        Ok(Graph {
            filter: graph.filter.clone(),
            features: hidden.relu()?,
        })
    }
}

pub struct GcnParams {
    pub dropout_rate: f32,
}
impl Default for GcnParams {
    fn default() -> Self {
        Self { dropout_rate: 0.0 }
    }
}

pub struct Gcn {
    layers: Vec<GcnConv>,
}
impl Gcn {
    pub fn new(sizes: &[usize], vs: VarBuilder) -> Result<Self> {
        Self::with_params(sizes, GcnParams::default(), vs)
    }
    pub fn with_params(sizes: &[usize], params: GcnParams, vs: VarBuilder) -> Result<Self> {
        let mut layers = Vec::new();
        for i in 1..sizes.len() {
            let name = format!("layer_{}", i);
            layers.push(if params.dropout_rate > 0.0 {
                GcnConv::with_dropout(sizes[i - 1], sizes[i], params.dropout_rate, vs.pp(name))?
            } else {
                GcnConv::new(sizes[i - 1], sizes[i], vs.pp(name))?
            });
        }
        Ok(Self { layers })
    }
}
impl GraphModule for Gcn {
    fn forward_t(&self, graph: &Graph, train: bool) -> Result<Graph> {
        let mut graph = graph.clone();
        for layer in &self.layers {
            graph = layer.forward_t(&graph, train)?;
        }
        Ok(graph)
    }
}
