//! Foundation types for decay-merge.
//!
//! This crate provides the energy unit ladder and the unit-aware arithmetic
//! used when two particle records are merged. Every other decay-merge crate
//! depends on `dmerge-types`.
//!
//! # Key Types
//!
//! - [`EnergyUnit`] -- One rung of the fixed meV..TeV ladder
//! - [`Energy`] -- A magnitude paired with its unit
//! - [`EnergyRange`] -- Lower and upper decay-energy bounds
//! - [`MeanMode`] -- Legacy (reference-compatible) or strict cross-unit mean

pub mod arith;
pub mod energy;
pub mod error;
pub mod unit;

pub use arith::{max_energy, mean, min_energy, re_express, MeanMode};
pub use energy::{Energy, EnergyRange};
pub use error::{UnitError, UnitResult};
pub use unit::{EnergyUnit, UNIT_LADDER};
