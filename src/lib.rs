//! Elman recurrent networks trained by a genetic algorithm instead of backpropagation.
//!
//! Each chromosome is the flat weight vector of one network. A generation scores every
//! chromosome on a next-symbol prediction task, then replaces the whole population with
//! children bred by tournament selection, uniform crossover and small uniform mutations.

pub mod elman;
