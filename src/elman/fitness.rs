use serde::{Deserialize, Serialize};

use super::chromosome::Chromosome;
use super::error::EngineError;
use super::network::RecurrentCell;
use super::shape::NetworkShape;

pub trait Evaluator {
    /// Scores `chromosome` and stores the result in its fitness. `cell` is reset first.
    fn evaluate(&self, chromosome: &mut Chromosome, cell: &mut RecurrentCell) -> Result<(), EngineError>;
}

/// Next-symbol prediction over a fixed sequence of class indices.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SequenceTask {
    symbols: Vec<usize>,
}

/// One step of a prediction run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Prediction {
    pub input: usize,
    pub predicted: usize,
    pub expected: usize,
}

impl Prediction {
    pub fn is_correct(&self) -> bool {
        self.predicted == self.expected
    }
}

impl Default for SequenceTask {
    fn default() -> Self {
        SequenceTask::new(vec![0, 1, 2, 0, 1, 2, 0, 1, 2])
    }
}

impl SequenceTask {
    pub fn new(symbols: Vec<usize>) -> SequenceTask {
        SequenceTask { symbols }
    }

    /// `0, 1, .., period - 1, 0, 1, ..` truncated to `len`.
    pub fn cyclic(period: usize, len: usize) -> Result<SequenceTask, EngineError> {
        if period == 0 {
            return Err(EngineError::InvalidSettings("cycle period must be at least 1".to_string()));
        }
        Ok(SequenceTask::new((0..len).map(|i| i % period).collect()))
    }

    /// Parses one decimal digit per symbol, e.g. "012012".
    pub fn from_digits(digits: &str) -> Result<SequenceTask, EngineError> {
        let symbols = digits
            .chars()
            .enumerate()
            .map(|(position, c)| {
                c.to_digit(10).map(|d| d as usize).ok_or(EngineError::SequenceSymbolOutOfRange {
                    position,
                    symbol: c as usize,
                    limit: 10,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(SequenceTask::new(symbols))
    }

    pub fn symbols(&self) -> &[usize] {
        &self.symbols
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Every symbol must have a one-hot slot in the input and an output unit to be predicted by.
    pub fn validate(&self, shape: &NetworkShape) -> Result<(), EngineError> {
        let limit = shape.input_size().min(shape.output_size());
        match self.symbols.iter().position(|&s| s >= limit) {
            Some(position) => Err(EngineError::SequenceSymbolOutOfRange { position, symbol: self.symbols[position], limit }),
            None => Ok(()),
        }
    }

    /// Loads `genes`, resets the cell and feeds every symbol but the last, calling `observe`
    /// with the cell after each step and the symbol that should come next.
    fn run<F>(&self, cell: &mut RecurrentCell, genes: &[f64], mut observe: F) -> Result<(), EngineError>
    where
        F: FnMut(&RecurrentCell, usize),
    {
        self.validate(cell.shape())?;
        cell.load_parameters(genes)?;
        cell.reset();

        let shape = *cell.shape();
        for pair in self.symbols.windows(2) {
            let input = shape.one_hot(pair[0])?;
            cell.step(&input)?;
            observe(&*cell, pair[1]);
        }
        Ok(())
    }

    /// Sum over steps and output units of the squared difference to the one-hot target.
    pub fn squared_error(&self, cell: &mut RecurrentCell, genes: &[f64]) -> Result<f64, EngineError> {
        let mut total_error = 0.;
        self.run(cell, genes, |cell, target| {
            for (k, &output) in cell.output().iter().enumerate() {
                let expected = if k == target { 1. } else { 0. };
                let diff = expected - output;
                total_error += diff * diff;
            }
        })?;
        Ok(total_error)
    }

    pub fn predict(&self, cell: &mut RecurrentCell, genes: &[f64]) -> Result<Vec<Prediction>, EngineError> {
        let mut predictions = Vec::with_capacity(self.len().saturating_sub(1));
        let mut inputs = self.symbols.iter();
        self.run(cell, genes, |cell, expected| {
            if let Some(&input) = inputs.next() {
                predictions.push(Prediction { input, predicted: cell.predicted_class(), expected });
            }
        })?;
        Ok(predictions)
    }

    /// Fraction of correct predictions; 1.0 when there is nothing to predict.
    pub fn accuracy(predictions: &[Prediction]) -> f64 {
        if predictions.is_empty() {
            return 1.;
        }
        predictions.iter().filter(|p| p.is_correct()).count() as f64 / predictions.len() as f64
    }
}

impl Evaluator for SequenceTask {
    fn evaluate(&self, chromosome: &mut Chromosome, cell: &mut RecurrentCell) -> Result<(), EngineError> {
        let total_error = self.squared_error(cell, &chromosome.genes)?;
        chromosome.fitness = 1. / (1. + total_error);
        Ok(())
    }
}
