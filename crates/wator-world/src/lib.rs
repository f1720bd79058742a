//! World simulation engine.
//!
//! This module implements the toroidal ocean grid where fish and sharks live,
//! feed, breed and die, one tick at a time.

pub mod grid;
pub mod organism;
pub mod simulation;

pub use grid::Grid;
pub use organism::{Organism, OrganismKind};
pub use simulation::{RunReport, Simulation};
