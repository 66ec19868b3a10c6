//! Evolver pipeline.
//!
//! Composes the operators of [`crate::ops`] into runnable evolutionary
//! algorithms. Users define their problem by implementing [`Evaluator`]
//! (or passing a closure); representation and variation come from the
//! operator structs.
//!
//! # Key Types
//!
//! - [`Individual`]: a bag of genotypes with an optional fitness
//! - [`EvolverConfig`]: population size, selection, probabilities, termination
//! - [`Evolver`]: generational loop with elitism and optional parallel evaluation
//! - [`OneFifthRule`]: success-rate step-size control, with [`run_one_plus_one`]
//!
//! Fitness is maximized throughout.
//!
//! # References
//!
//! - Holland (1975), *Adaptation in Natural and Artificial Systems*
//! - Goldberg (1989), *Genetic Algorithms in Search, Optimization, and Machine Learning*
//! - De Jong (2006), *Evolutionary Computation: A Unified Approach*

mod config;
pub mod one_fifth;
mod runner;
mod selection;
mod types;

pub use config::EvolverConfig;
pub use one_fifth::{run_one_plus_one, CounterPolicy, OneFifthRule, OnePlusOneResult};
pub use runner::{Evolver, EvolverResult};
pub use selection::Selection;
pub use types::{Evaluator, Individual};
