mod traits;
pub use traits::*;

mod graph;
pub use graph::Graph;

mod gcn;
pub use gcn::{Gcn, GcnConv, GcnParams};
mod pool;
pub use pool::{PoolMode, SimplePool};
mod diffpool;
pub use diffpool::DiffPool;
