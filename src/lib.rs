//! Generic evolutionary computation framework.
//!
//! Provides interchangeable genotype representations, the genetic operators
//! that act on them, and an evolver that composes both into runnable
//! algorithms:
//!
//! - **Genotypes**: [`BitString`](genotype::BitString),
//!   [`IntegerVector`](genotype::IntegerVector) (also used for permutations),
//!   [`FloatVector`](genotype::FloatVector) and
//!   [`EsVector`](genotype::EsVector), all behind the
//!   [`Genotype`](genotype::Genotype) trait with a tagged string codec.
//! - **Decoding**: binary and reflected-Gray decoding of bit strings into
//!   bounded reals.
//! - **Operators**: initialization, mutation and crossover per
//!   representation, including permutation-preserving crossovers (CX, PMX,
//!   OX, NWOX, UPMX, non-Abelian), BLX-α and SBX, and quasi-random variants.
//! - **Evolver**: a generational loop with elitism and parallel evaluation,
//!   and one-fifth-rule step-size control for evolution strategies.
//!
//! # Architecture
//!
//! Operators hold read-only configuration and receive the random source
//! explicitly (see [`random::Randomizer`]); genotypes are owned by value by
//! the individual holding them. Fallible operations return
//! [`error::Result`].
//!
//! # Features
//!
//! - `parallel` (default): rayon-based parallel evaluation in the evolver
//! - `serde`: `Serialize`/`Deserialize` for genotypes and configurations

pub mod decoding;
pub mod error;
pub mod evolver;
pub mod genotype;
pub mod ops;
pub mod quasi_random;
pub mod random;

pub use error::{Error, Result};
