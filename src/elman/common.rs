use serde::{Deserialize, Serialize};

use super::error::EngineError;
use super::reproduction::check_mutation;
use super::selection::Tournament;
use super::shape::NetworkShape;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    pub shape: NetworkShape,
    pub population_size: usize,
    pub generations: usize,
    pub mutation_rate: f64,
    pub mutation_amplitude: f64,
    pub tournament_size: usize,
}

impl Settings {
    pub fn standard(shape: NetworkShape) -> Settings {
        Settings {
            shape,
            population_size: 50,
            generations: 100,
            mutation_rate: 0.05,
            mutation_amplitude: 0.1,
            tournament_size: 2,
        }
    }

    pub fn validate(&self) -> Result<(), EngineError> {
        NetworkShape::new(self.shape.input_size(), self.shape.hidden_size(), self.shape.output_size())?;
        if self.population_size == 0 {
            return Err(EngineError::InvalidSettings("population size must be at least 1".to_string()));
        }
        if self.tournament_size == 0 {
            return Err(EngineError::InvalidSettings("tournament size must be at least 1".to_string()));
        }
        check_mutation(self.mutation_rate, self.mutation_amplitude)
    }

    pub fn tournament(&self) -> Tournament {
        Tournament { size: self.tournament_size }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Settings::standard(NetworkShape::standard())
    }
}
