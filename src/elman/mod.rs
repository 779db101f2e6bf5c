pub mod chromosome;
pub mod codec;
pub mod common;
pub mod error;
pub mod evolution;
pub mod fitness;
pub mod network;
pub mod population;
pub mod reproduction;
pub mod selection;
pub mod shape;

pub use chromosome::{Chromosome, ChromosomeIndex};
pub use common::Settings;
pub use error::EngineError;
pub use evolution::{run_generation, Evolution, EvolutionState, GenerationOutcome, GenerationRecord};
pub use fitness::{Evaluator, Prediction, SequenceTask};
pub use network::{Activations, RecurrentCell};
pub use population::Population;
pub use selection::{ParentSelector, Tournament};
pub use shape::NetworkShape;
