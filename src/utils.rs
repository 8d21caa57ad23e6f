use candle_core::{bail, Device, Result, Tensor};

/// Coordinate-form sparse matrix, the exchange format for adjacency data
/// produced by external preprocessing.
#[derive(Debug, Clone)]
pub struct CooMatrix {
    rows: Vec<u32>,
    cols: Vec<u32>,
    values: Vec<f32>,
    shape: (usize, usize),
}

impl CooMatrix {
    pub fn new(
        rows: Vec<u32>,
        cols: Vec<u32>,
        values: Vec<f32>,
        shape: (usize, usize),
    ) -> Result<Self> {
        if rows.len() != cols.len() || rows.len() != values.len() {
            bail!(
                "coordinate arrays disagree: {} rows, {} cols, {} values",
                rows.len(),
                cols.len(),
                values.len()
            );
        }
        for (&row, &col) in rows.iter().zip(&cols) {
            if row as usize >= shape.0 || col as usize >= shape.1 {
                bail!("entry ({row}, {col}) outside shape {shape:?}");
            }
        }
        Ok(Self {
            rows,
            cols,
            values,
            shape,
        })
    }

    pub fn shape(&self) -> (usize, usize) {
        self.shape
    }

    /// Materializes the dense tensor the layers consume. Duplicate
    /// coordinates accumulate.
    pub fn to_dense(&self, device: &Device) -> Result<Tensor> {
        let (_, num_cols) = self.shape;
        let mut data = vec![0f32; self.shape.0 * self.shape.1];
        for ((&row, &col), &value) in self.rows.iter().zip(&self.cols).zip(&self.values) {
            data[row as usize * num_cols + col as usize] += value;
        }
        Tensor::from_vec(data, self.shape, device)
    }
}
