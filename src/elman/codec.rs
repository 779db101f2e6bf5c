//! Flat gene vector <-> weight matrices.
//!
//! Genes are laid out as every row of the input->hidden matrix, then every row of the
//! hidden->hidden matrix, then every row of the hidden->output matrix, each row-major.
//! Anything that builds a network from genes must go through this module so the meaning
//! of each gene stays the same for the trainer and for any viewer.

use std::ops::{Index, IndexMut};

use super::error::EngineError;
use super::shape::NetworkShape;

/// Dense row-major matrix.
#[derive(Clone, Debug, PartialEq)]
pub struct Matrix {
    rows: usize,
    cols: usize,
    data: Vec<f64>,
}

impl Matrix {
    pub fn zeros(rows: usize, cols: usize) -> Matrix {
        Matrix { rows, cols, data: vec![0.; rows * cols] }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn row(&self, row: usize) -> &[f64] {
        &self.data[row * self.cols..(row + 1) * self.cols]
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    fn as_mut_slice(&mut self) -> &mut [f64] {
        &mut self.data
    }
}

impl Index<(usize, usize)> for Matrix {
    type Output = f64;
    fn index(&self, (row, col): (usize, usize)) -> &Self::Output {
        debug_assert!(row < self.rows && col < self.cols);
        &self.data[row * self.cols + col]
    }
}

impl IndexMut<(usize, usize)> for Matrix {
    fn index_mut(&mut self, (row, col): (usize, usize)) -> &mut Self::Output {
        debug_assert!(row < self.rows && col < self.cols);
        &mut self.data[row * self.cols + col]
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WeightBlock {
    InputHidden,
    HiddenHidden,
    HiddenOutput,
}

#[derive(Clone, Debug, PartialEq)]
pub struct WeightMatrices {
    /// hidden_size x (input_size + 1), column 0 is the bias weight
    pub input_hidden: Matrix,
    /// hidden_size x hidden_size, row i reads the previous step's hidden j
    pub hidden_hidden: Matrix,
    /// output_size x hidden_size
    pub hidden_output: Matrix,
}

impl WeightMatrices {
    pub fn zeros(shape: &NetworkShape) -> WeightMatrices {
        WeightMatrices {
            input_hidden: Matrix::zeros(shape.hidden_size(), shape.input_width()),
            hidden_hidden: Matrix::zeros(shape.hidden_size(), shape.hidden_size()),
            hidden_output: Matrix::zeros(shape.output_size(), shape.hidden_size()),
        }
    }

    /// True when every block has the dimensions `shape` asks for.
    pub fn fits(&self, shape: &NetworkShape) -> bool {
        let dims = |m: &Matrix| (m.rows, m.cols, m.data.len());
        dims(&self.input_hidden) == (shape.hidden_size(), shape.input_width(), shape.hidden_size() * shape.input_width())
            && dims(&self.hidden_hidden) == (shape.hidden_size(), shape.hidden_size(), shape.hidden_size() * shape.hidden_size())
            && dims(&self.hidden_output) == (shape.output_size(), shape.hidden_size(), shape.output_size() * shape.hidden_size())
    }

    fn blocks(&self) -> [&Matrix; 3] {
        [&self.input_hidden, &self.hidden_hidden, &self.hidden_output]
    }

    fn blocks_mut(&mut self) -> [&mut Matrix; 3] {
        [&mut self.input_hidden, &mut self.hidden_hidden, &mut self.hidden_output]
    }
}

/// Position in the flat gene vector of weight `(row, col)` of `block`.
pub fn gene_index(shape: &NetworkShape, block: WeightBlock, row: usize, col: usize) -> usize {
    let input_hidden_len = shape.hidden_size() * shape.input_width();
    let hidden_hidden_len = shape.hidden_size() * shape.hidden_size();
    match block {
        WeightBlock::InputHidden => row * shape.input_width() + col,
        WeightBlock::HiddenHidden => input_hidden_len + row * shape.hidden_size() + col,
        WeightBlock::HiddenOutput => input_hidden_len + hidden_hidden_len + row * shape.hidden_size() + col,
    }
}

fn check_len(shape: &NetworkShape, genes: &[f64]) -> Result<(), EngineError> {
    let expected = shape.parameter_count();
    if genes.len() != expected {
        return Err(EngineError::ParameterCountMismatch { expected, actual: genes.len() });
    }
    Ok(())
}

/// Overwrites `weights` in place. Nothing is written when a check fails.
pub fn decode_into(shape: &NetworkShape, genes: &[f64], weights: &mut WeightMatrices) -> Result<(), EngineError> {
    check_len(shape, genes)?;
    if !weights.fits(shape) {
        return Err(EngineError::WeightShapeMismatch {
            input_size: shape.input_size(),
            hidden_size: shape.hidden_size(),
            output_size: shape.output_size(),
        });
    }

    let mut offset = 0;
    for matrix in weights.blocks_mut() {
        let len = matrix.as_slice().len();
        matrix.as_mut_slice().copy_from_slice(&genes[offset..offset + len]);
        offset += len;
    }
    Ok(())
}

pub fn decode(shape: &NetworkShape, genes: &[f64]) -> Result<WeightMatrices, EngineError> {
    let mut weights = WeightMatrices::zeros(shape);
    decode_into(shape, genes, &mut weights)?;
    Ok(weights)
}

pub fn encode(weights: &WeightMatrices) -> Vec<f64> {
    weights.blocks().into_iter().flat_map(|m| m.as_slice().iter().copied()).collect()
}
