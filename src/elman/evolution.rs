use log::{debug, info};
use rand::RngCore;

use super::chromosome::{Chromosome, ChromosomeIndex};
use super::common::Settings;
use super::error::EngineError;
use super::fitness::{Evaluator, Prediction, SequenceTask};
use super::network::RecurrentCell;
use super::population::Population;
use super::reproduction::reproduce;

/// Result of one evaluate-then-reproduce cycle. Best and mean refer to the evaluated
/// population, `next` is its unevaluated offspring.
#[derive(Clone, Debug, PartialEq)]
pub struct GenerationOutcome {
    pub next: Population,
    pub best_index: ChromosomeIndex,
    pub best_fitness: f64,
    pub mean_fitness: f64,
}

/// Scores `population` in place, then breeds its replacement.
pub fn run_generation<R: RngCore, E: Evaluator>(
    rng: &mut R,
    population: &mut Population,
    cell: &mut RecurrentCell,
    evaluator: &E,
    settings: &Settings,
) -> Result<GenerationOutcome, EngineError> {
    population.evaluate(evaluator, cell)?;
    let (best_index, best_fitness) = population.best()?;
    let mean_fitness = population.mean_fitness()?;
    let next = reproduce(rng, population, &settings.tournament(), settings.mutation_rate, settings.mutation_amplitude)?;
    Ok(GenerationOutcome { next, best_index, best_fitness, mean_fitness })
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EvolutionState {
    Idle,
    Running,
    Finished,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GenerationRecord {
    pub generation: usize,
    pub best_index: ChromosomeIndex,
    pub best_fitness: f64,
    pub mean_fitness: f64,
}

/// A training run: owns the random source, the population and the cell used to score it.
pub struct Evolution<R: RngCore> {
    settings: Settings,
    task: SequenceTask,
    rng: R,
    cell: RecurrentCell,
    population: Population,
    state: EvolutionState,
    generation: usize,
    history: Vec<GenerationRecord>,
    best: Option<Chromosome>,
}

impl<R: RngCore> Evolution<R> {
    pub fn new(settings: Settings, task: SequenceTask, mut rng: R) -> Result<Evolution<R>, EngineError> {
        settings.validate()?;
        task.validate(&settings.shape)?;
        let cell = RecurrentCell::configure(settings.shape)?;
        let population = Population::init(&mut rng, settings.population_size, &settings.shape);
        Ok(Evolution {
            settings,
            task,
            rng,
            cell,
            population,
            state: EvolutionState::Idle,
            generation: 0,
            history: Vec::new(),
            best: None,
        })
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn task(&self) -> &SequenceTask {
        &self.task
    }

    pub fn state(&self) -> EvolutionState {
        self.state
    }

    /// Number of completed generations.
    pub fn generation(&self) -> usize {
        self.generation
    }

    pub fn population(&self) -> &Population {
        &self.population
    }

    pub fn history(&self) -> &[GenerationRecord] {
        &self.history
    }

    /// Fittest chromosome seen so far, with the fitness it scored before reproduction.
    pub fn best(&self) -> Option<&Chromosome> {
        self.best.as_ref()
    }

    /// Highest best fitness up to and including each generation.
    pub fn best_so_far(&self) -> Vec<f64> {
        self.history
            .iter()
            .scan(f64::NEG_INFINITY, |max, record| {
                *max = max.max(record.best_fitness);
                Some(*max)
            })
            .collect()
    }

    /// Runs one generation. Returns `None`, doing nothing, once the run is finished.
    pub fn step_generation(&mut self) -> Result<Option<GenerationRecord>, EngineError> {
        match self.state {
            EvolutionState::Finished => return Ok(None),
            EvolutionState::Idle if self.settings.generations == 0 => {
                self.state = EvolutionState::Finished;
                return Ok(None);
            }
            EvolutionState::Idle => self.state = EvolutionState::Running,
            EvolutionState::Running => {}
        }

        let outcome = run_generation(&mut self.rng, &mut self.population, &mut self.cell, &self.task, &self.settings)?;
        let record = GenerationRecord {
            generation: self.generation,
            best_index: outcome.best_index,
            best_fitness: outcome.best_fitness,
            mean_fitness: outcome.mean_fitness,
        };

        let improved = self.best.as_ref().map_or(true, |best| outcome.best_fitness > best.fitness());
        if improved {
            self.best = Some(self.population[outcome.best_index].clone());
        }
        self.population = outcome.next;
        self.history.push(record);
        self.generation += 1;

        info!("gen: {}; best fitness: {:.4}; mean fitness: {:.4}", record.generation, record.best_fitness, record.mean_fitness);

        if self.generation >= self.settings.generations {
            self.state = EvolutionState::Finished;
            info!("evolution finished after {} generations; best fitness: {:.4}", self.generation, self.best.as_ref().map_or(0., |b| b.fitness()));
        }
        Ok(Some(record))
    }

    /// Steps until finished and returns the fittest chromosome seen.
    pub fn run(&mut self) -> Result<Option<&Chromosome>, EngineError> {
        while self.step_generation()?.is_some() {}
        Ok(self.best.as_ref())
    }

    /// Runs the task with the best chromosome so far, `None` before the first generation.
    pub fn predict_with_best(&mut self) -> Result<Option<Vec<Prediction>>, EngineError> {
        match &self.best {
            Some(best) => self.task.predict(&mut self.cell, &best.genes).map(Some),
            None => Ok(None),
        }
    }

    /// Fresh random population for the current settings, history cleared.
    pub fn restart(&mut self) {
        self.population = Population::init(&mut self.rng, self.settings.population_size, &self.settings.shape);
        self.cell.reset();
        self.state = EvolutionState::Idle;
        self.generation = 0;
        self.history.clear();
        self.best = None;
    }

    /// Changes the hidden layer size. Existing chromosomes cannot be reinterpreted, so the run restarts.
    pub fn reshape_hidden(&mut self, hidden_size: usize) -> Result<(), EngineError> {
        let shape = self.settings.shape.with_hidden_size(hidden_size)?;
        self.task.validate(&shape)?;
        self.cell = RecurrentCell::configure(shape)?;
        self.settings.shape = shape;
        debug!("reshaped network to {} hidden neurons ({} genes)", hidden_size, shape.parameter_count());
        self.restart();
        Ok(())
    }

    /// Trains on a different sequence from scratch.
    pub fn set_task(&mut self, task: SequenceTask) -> Result<(), EngineError> {
        task.validate(&self.settings.shape)?;
        debug!("new task of {} symbols", task.len());
        self.task = task;
        self.restart();
        Ok(())
    }
}
