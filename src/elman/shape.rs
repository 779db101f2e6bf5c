use serde::{Deserialize, Serialize};

use super::error::EngineError;

/// Layer sizes of an Elman network. `input_size` does not count the bias neuron.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawShape")]
pub struct NetworkShape {
    input_size: usize,
    hidden_size: usize,
    output_size: usize,
}

#[derive(Deserialize)]
struct RawShape {
    input_size: usize,
    hidden_size: usize,
    output_size: usize,
}

impl TryFrom<RawShape> for NetworkShape {
    type Error = EngineError;

    fn try_from(raw: RawShape) -> Result<Self, Self::Error> {
        NetworkShape::new(raw.input_size, raw.hidden_size, raw.output_size)
    }
}

impl NetworkShape {
    pub fn new(input_size: usize, hidden_size: usize, output_size: usize) -> Result<NetworkShape, EngineError> {
        if input_size == 0 || hidden_size == 0 || output_size == 0 {
            return Err(EngineError::InvalidShape { input_size, hidden_size, output_size });
        }
        Ok(NetworkShape { input_size, hidden_size, output_size })
    }

    /// 6 inputs, 8 hidden, 6 outputs: 168 parameters.
    pub fn standard() -> NetworkShape {
        NetworkShape { input_size: 6, hidden_size: 8, output_size: 6 }
    }

    /// Same input and output layers with a different hidden layer.
    pub fn with_hidden_size(&self, hidden_size: usize) -> Result<NetworkShape, EngineError> {
        NetworkShape::new(self.input_size, hidden_size, self.output_size)
    }

    pub fn input_size(&self) -> usize {
        self.input_size
    }

    pub fn hidden_size(&self) -> usize {
        self.hidden_size
    }

    pub fn output_size(&self) -> usize {
        self.output_size
    }

    /// Length of the input buffer, bias included.
    pub fn input_width(&self) -> usize {
        self.input_size + 1
    }

    pub fn parameter_count(&self) -> usize {
        self.hidden_size * self.input_width()
            + self.hidden_size * self.hidden_size
            + self.output_size * self.hidden_size
    }

    /// Bias at index 0, then a single 1.0 at `symbol + 1`.
    pub fn one_hot(&self, symbol: usize) -> Result<Vec<f64>, EngineError> {
        if symbol >= self.input_size {
            return Err(EngineError::SymbolOutOfRange { symbol, limit: self.input_size });
        }
        let mut input = vec![0.; self.input_width()];
        input[0] = 1.;
        input[symbol + 1] = 1.;
        Ok(input)
    }
}
