//! Energies and decay-energy ranges.

use std::fmt;
use std::str::FromStr;

use crate::arith::{max_energy, min_energy};
use crate::error::{UnitError, UnitResult};
use crate::unit::EnergyUnit;

/// A magnitude expressed in one unit of the ladder.
///
/// Energies are never normalized on construction: a value read as
/// `2000 keV` stays `2000 keV` until arithmetic re-expresses it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Energy {
    pub magnitude: f64,
    pub unit: EnergyUnit,
}

impl Energy {
    pub fn new(magnitude: f64, unit: EnergyUnit) -> Self {
        Self { magnitude, unit }
    }

    /// The magnitude converted to eV.
    pub fn to_ev(&self) -> f64 {
        self.magnitude * self.unit.factor()
    }

    /// Parse a bound such as `5 MeV`, `5MeV` or `1.5e-3 meV`.
    ///
    /// The unit is the trailing run of ASCII letters; everything before it
    /// is the magnitude.
    pub fn parse_bound(text: &str) -> UnitResult<Self> {
        let text = text.trim();
        let split = text
            .rfind(|c: char| !c.is_ascii_alphabetic())
            .map(|idx| idx + 1)
            .unwrap_or(0);
        let (value, unit) = text.split_at(split);
        if unit.is_empty() {
            return Err(UnitError::UnknownUnit(String::new()));
        }
        let unit = unit.parse::<EnergyUnit>()?;
        let value = value.trim();
        let magnitude = value
            .parse::<f64>()
            .map_err(|_| UnitError::InvalidMagnitude(value.to_string()))?;
        Ok(Self { magnitude, unit })
    }
}

impl fmt::Display for Energy {
    /// Shortest round-trip formatting of the magnitude, so `15.0 eV` and
    /// `1e-5 eV` both parse back to the same value.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} {}", self.magnitude, self.unit)
    }
}

impl FromStr for Energy {
    type Err = UnitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_bound(s)
    }
}

/// A decay-energy interval, textually `(lower --> upper)`.
///
/// Each bound keeps its own unit; bounds are compared by their eV value.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EnergyRange {
    pub lower: Energy,
    pub upper: Energy,
}

impl EnergyRange {
    pub fn new(lower: Energy, upper: Energy) -> Self {
        Self { lower, upper }
    }

    /// Union of two ranges.
    ///
    /// The new lower bound is the smallest of all four bounds and the new
    /// upper bound the largest, each kept in the unit it was written in.
    /// Ties keep the bound encountered first, starting with `self`.
    pub fn union(&self, other: &Self) -> Self {
        let bounds = [self.lower, self.upper, other.lower, other.upper];
        // Four bounds are always present, so neither fold can come back empty.
        let lower = min_energy(bounds).unwrap_or(self.lower);
        let upper = max_energy(bounds).unwrap_or(self.upper);
        Self { lower, upper }
    }

    /// Parse `(1 eV --> 5 eV)`. Surrounding parentheses are optional and
    /// spacing around the arrow and units is free.
    pub fn parse(text: &str) -> UnitResult<Self> {
        let trimmed = text.trim();
        let inner = trimmed.strip_prefix('(').unwrap_or(trimmed);
        let inner = inner.strip_suffix(')').unwrap_or(inner);
        let (lower, upper) = inner
            .split_once("-->")
            .ok_or_else(|| UnitError::MalformedRange(text.to_string()))?;
        let lower = Energy::parse_bound(lower)
            .map_err(|_| UnitError::MalformedRange(text.to_string()))?;
        let upper = Energy::parse_bound(upper)
            .map_err(|_| UnitError::MalformedRange(text.to_string()))?;
        Ok(Self { lower, upper })
    }
}

impl fmt::Display for EnergyRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({} --> {})", self.lower, self.upper)
    }
}

impl FromStr for EnergyRange {
    type Err = UnitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
