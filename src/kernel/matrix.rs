//! Symmetric kernel matrix stored as its lower triangle, diagonal included, row major.

use anyhow::anyhow;
use ndarray::Array2;

#[derive(Clone, Debug, PartialEq)]
pub struct KernelMatrix {
    size: usize,
    values: Vec<f32>,
}

#[inline]
fn tri_index(i: usize, j: usize) -> usize {
    let (i, j) = if i >= j { (i, j) } else { (j, i) };
    i * (i + 1) / 2 + j
}

impl KernelMatrix {
    /// zero matrix of dimension size x size
    pub fn new(size: usize) -> Self {
        KernelMatrix { size, values: vec![0.; size * (size + 1) / 2] }
    }

    /// Builds from rows of the lower triangle, row i must have i+1 values.
    pub fn from_rows(rows: Vec<Vec<f32>>) -> anyhow::Result<Self> {
        let size = rows.len();
        let mut values = Vec::<f32>::with_capacity(size * (size + 1) / 2);
        for (i, row) in rows.into_iter().enumerate() {
            if row.len() != i + 1 {
                log::error!("kernel matrix row {} has {} values, expecting {}", i, row.len(), i + 1);
                return Err(anyhow!("kernel matrix row {} has {} values, expecting {}", i, row.len(), i + 1));
            }
            values.extend(row);
        }
        Ok(KernelMatrix { size, values })
    }

    pub fn get_size(&self) -> usize {
        self.size
    }

    /// value at (i,j), same as (j,i)
    pub fn get(&self, i: usize, j: usize) -> f32 {
        self.values[tri_index(i, j)]
    }

    pub fn set(&mut self, i: usize, j: usize, v: f32) {
        self.values[tri_index(i, j)] = v;
    }

    /// row i of the lower triangle, columns 0..=i
    pub fn get_row(&self, i: usize) -> &[f32] {
        let start = tri_index(i, 0);
        &self.values[start..start + i + 1]
    }

    /// lower triangle in row major order
    pub fn get_values(&self) -> &[f32] {
        &self.values
    }

    /// full symmetric matrix
    pub fn to_dense(&self) -> Array2<f32> {
        Array2::<f32>::from_shape_fn((self.size, self.size), |(i, j)| self.get(i, j))
    }
} // end of impl KernelMatrix
