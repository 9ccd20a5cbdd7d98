//! Unit-aware arithmetic over [`Energy`] values.
//!
//! Two operations feed the record merger: the pairwise mean of two mean
//! energies, and the min/max search used by [`EnergyRange::union`].
//!
//! The cross-unit mean has two modes. [`MeanMode::Legacy`] reproduces the
//! historical computation byte-for-byte, including its handling of the
//! second operand, which is added without conversion and has its unit
//! multiplier added on top:
//!
//! ```text
//! 0.5 * (a * f(a) + b + f(b))
//! ```
//!
//! [`MeanMode::Strict`] converts both operands: `0.5 * (a * f(a) + b * f(b))`.
//! Legacy stays the default so existing merged datasets are reproducible.
//!
//! [`EnergyRange::union`]: crate::energy::EnergyRange::union

use serde::{Deserialize, Serialize};

use crate::energy::Energy;
use crate::unit::EnergyUnit;

/// Which cross-unit mean computation to apply.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MeanMode {
    /// Reference-compatible: the second operand is not converted to eV.
    #[default]
    Legacy,
    /// Both operands converted to eV before averaging.
    Strict,
}

/// Mean of two energies.
///
/// Equal units average directly in that unit. Otherwise an eV value is
/// computed according to `mode` and handed to [`re_express`].
///
/// In legacy mode the cross-unit branch is not symmetric in its operands,
/// so a fold over many files may produce an order-dependent mean.
pub fn mean(a: Energy, b: Energy, mode: MeanMode) -> Energy {
    if a.unit == b.unit {
        return Energy::new(0.5 * (a.magnitude + b.magnitude), a.unit);
    }

    let value_ev = match mode {
        MeanMode::Legacy => 0.5 * (a.magnitude * a.unit.factor() + b.magnitude + b.unit.factor()),
        MeanMode::Strict => 0.5 * (a.to_ev() + b.to_ev()),
    };
    re_express(value_ev)
}

/// Express an eV value in the ladder.
///
/// Scans from `TeV` down and picks the first unit in which the scaled value
/// is strictly greater than one. This is a threshold search rather than a
/// nearest-magnitude choice: exactly `1.0` eV comes back as `1000 meV`.
/// When no unit qualifies the value is returned in eV unchanged.
pub fn re_express(value_ev: f64) -> Energy {
    for (unit, factor) in EnergyUnit::descending() {
        let scaled = value_ev * (1.0 / factor);
        if scaled > 1.0 {
            return Energy::new(scaled, unit);
        }
    }
    Energy::new(value_ev, EnergyUnit::ElectronVolt)
}

/// Smallest energy by eV value. Ties keep the first encountered.
pub fn min_energy<I>(energies: I) -> Option<Energy>
where
    I: IntoIterator<Item = Energy>,
{
    energies.into_iter().fold(None, |best, candidate| match best {
        Some(current) if candidate.to_ev() < current.to_ev() => Some(candidate),
        Some(current) => Some(current),
        None => Some(candidate),
    })
}

/// Largest energy by eV value. Ties keep the first encountered.
pub fn max_energy<I>(energies: I) -> Option<Energy>
where
    I: IntoIterator<Item = Energy>,
{
    energies.into_iter().fold(None, |best, candidate| match best {
        Some(current) if candidate.to_ev() > current.to_ev() => Some(candidate),
        Some(current) => Some(current),
        None => Some(candidate),
    })
}
