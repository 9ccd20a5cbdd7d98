//! The fixed energy unit ladder.
//!
//! Units run from `meV` to `TeV`. Each rung carries its multiplier to eV.
//! The ladder order matters: re-expression of a computed mean scans it from
//! the largest rung down (see [`crate::arith::re_express`]).

use std::fmt;
use std::str::FromStr;

use crate::error::UnitError;

/// One rung of the energy unit ladder.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EnergyUnit {
    MilliElectronVolt,
    ElectronVolt,
    KiloElectronVolt,
    MegaElectronVolt,
    GigaElectronVolt,
    TeraElectronVolt,
}

/// The ladder, smallest to largest, with each unit's multiplier to eV.
pub static UNIT_LADDER: [(EnergyUnit, f64); 6] = [
    (EnergyUnit::MilliElectronVolt, 1e-3),
    (EnergyUnit::ElectronVolt, 1.0),
    (EnergyUnit::KiloElectronVolt, 1e3),
    (EnergyUnit::MegaElectronVolt, 1e6),
    (EnergyUnit::GigaElectronVolt, 1e9),
    (EnergyUnit::TeraElectronVolt, 1e12),
];

impl EnergyUnit {
    /// Multiplier converting a magnitude in this unit to eV.
    pub fn factor(self) -> f64 {
        UNIT_LADDER[self as usize].1
    }

    /// The textual symbol used in data files (`"MeV"`, `"keV"`, ...).
    pub fn symbol(self) -> &'static str {
        match self {
            Self::MilliElectronVolt => "meV",
            Self::ElectronVolt => "eV",
            Self::KiloElectronVolt => "keV",
            Self::MegaElectronVolt => "MeV",
            Self::GigaElectronVolt => "GeV",
            Self::TeraElectronVolt => "TeV",
        }
    }

    /// Iterate the ladder from the largest unit to the smallest.
    pub fn descending() -> impl Iterator<Item = (EnergyUnit, f64)> {
        UNIT_LADDER.iter().rev().copied()
    }
}

impl FromStr for EnergyUnit {
    type Err = UnitError;

    /// Parse a unit symbol. Symbols are case-sensitive: `meV` and `MeV`
    /// differ by nine orders of magnitude.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        UNIT_LADDER
            .iter()
            .map(|(unit, _)| *unit)
            .find(|unit| unit.symbol() == s)
            .ok_or_else(|| UnitError::UnknownUnit(s.to_string()))
    }
}

impl fmt::Display for EnergyUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}
