use serde::{Deserialize, Serialize};
use std::ops::Index;

pub const ENERGY_COMPONENT_COUNT: usize = 9;

pub const TOTAL: usize = 0;
pub const BOND: usize = 1;
pub const ANGLE: usize = 2;
pub const DIHEDRAL: usize = 3;
pub const ELECTROSTATIC: usize = 4;
pub const VAN_DER_WAALS: usize = 5;
pub const N_BONDS: usize = 6;
pub const N_ANGLES: usize = 7;
pub const N_DIHEDRALS: usize = 8;

/// The fixed-order component vector reported with every evaluation:
/// `[total, bond, angle, dihedral, electrostatic, van der Waals, n_bonds, n_angles, n_dihedrals]`.
///
/// Always exactly [`ENERGY_COMPONENT_COUNT`] entries, whichever backend produced it.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct EnergyComponents([f64; ENERGY_COMPONENT_COUNT]);

impl EnergyComponents {
    pub fn new(values: [f64; ENERGY_COMPONENT_COUNT]) -> Self {
        Self(values)
    }

    /// Takes the leading entries of a native buffer, zero-filling if it is short.
    pub fn from_slice(values: &[f64]) -> Self {
        let mut components = [0.0; ENERGY_COMPONENT_COUNT];
        let n = values.len().min(ENERGY_COMPONENT_COUNT);
        components[..n].copy_from_slice(&values[..n]);
        Self(components)
    }

    #[inline]
    pub fn total(&self) -> f64 {
        self.0[TOTAL]
    }
    #[inline]
    pub fn bond(&self) -> f64 {
        self.0[BOND]
    }
    #[inline]
    pub fn angle(&self) -> f64 {
        self.0[ANGLE]
    }
    #[inline]
    pub fn dihedral(&self) -> f64 {
        self.0[DIHEDRAL]
    }
    #[inline]
    pub fn electrostatic(&self) -> f64 {
        self.0[ELECTROSTATIC]
    }
    #[inline]
    pub fn van_der_waals(&self) -> f64 {
        self.0[VAN_DER_WAALS]
    }
    #[inline]
    pub fn n_bonds(&self) -> f64 {
        self.0[N_BONDS]
    }
    #[inline]
    pub fn n_angles(&self) -> f64 {
        self.0[N_ANGLES]
    }
    #[inline]
    pub fn n_dihedrals(&self) -> f64 {
        self.0[N_DIHEDRALS]
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    pub fn to_vec(&self) -> Vec<f64> {
        self.0.to_vec()
    }
}

impl From<[f64; ENERGY_COMPONENT_COUNT]> for EnergyComponents {
    fn from(values: [f64; ENERGY_COMPONENT_COUNT]) -> Self {
        Self(values)
    }
}

impl Index<usize> for EnergyComponents {
    type Output = f64;

    fn index(&self, index: usize) -> &Self::Output {
        &self.0[index]
    }
}

/// Counts of bonded terms in a force-field topology, split by whether a hydrogen is involved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TopologyCounts {
    pub bonds_with_hydrogen: usize,
    pub bonds_without_hydrogen: usize,
    pub angles_with_hydrogen: usize,
    pub angles_without_hydrogen: usize,
    pub dihedrals_with_hydrogen: usize,
    pub dihedrals_without_hydrogen: usize,
}

impl TopologyCounts {
    #[inline]
    pub fn n_bonds(&self) -> usize {
        self.bonds_with_hydrogen + self.bonds_without_hydrogen
    }

    #[inline]
    pub fn n_angles(&self) -> usize {
        self.angles_with_hydrogen + self.angles_without_hydrogen
    }

    #[inline]
    pub fn n_dihedrals(&self) -> usize {
        self.dihedrals_with_hydrogen + self.dihedrals_without_hydrogen
    }
}

/// Per-term energies reported by a live force-field process for one evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct EnergyBreakdown {
    pub total: f64,
    pub bond: f64,
    pub angle: f64,
    pub dihedral: f64,
    pub electrostatic: f64,
    #[serde(default)]
    pub electrostatic_14: f64,
    pub van_der_waals: f64,
    #[serde(default)]
    pub van_der_waals_14: f64,
}

impl EnergyBreakdown {
    /// Folds the 1-4 terms into their parent terms and appends the topology counts.
    pub fn to_components(&self, counts: &TopologyCounts) -> EnergyComponents {
        EnergyComponents([
            self.total,
            self.bond,
            self.angle,
            self.dihedral,
            self.electrostatic + self.electrostatic_14,
            self.van_der_waals + self.van_der_waals_14,
            counts.n_bonds() as f64,
            counts.n_angles() as f64,
            counts.n_dihedrals() as f64,
        ])
    }
}
