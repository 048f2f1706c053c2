use nalgebra::Point3;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DeviationError {
    #[error("Atom index {index} is out of range for {n_sites} sites")]
    AtomIndexOutOfRange { index: usize, n_sites: usize },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BondTerm {
    pub atom1: usize,
    pub atom2: usize,
    /// Equilibrium length in Å.
    pub equilibrium_length: f64,
}

/// A bond angle term; `atom2` is the vertex.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AngleTerm {
    pub atom1: usize,
    pub atom2: usize,
    pub atom3: usize,
    /// Equilibrium angle in radians.
    pub equilibrium_angle: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct GeometryDeviation {
    /// RMS bond length deviation in Å, `None` without bond terms.
    pub bond_rmsd: Option<f64>,
    /// RMS angle deviation in degrees, `None` without angle terms.
    pub angle_rmsd_degrees: Option<f64>,
}

fn site(sites: &[Point3<f64>], index: usize) -> Result<&Point3<f64>, DeviationError> {
    sites.get(index).ok_or(DeviationError::AtomIndexOutOfRange {
        index,
        n_sites: sites.len(),
    })
}

fn rms(deviations: impl ExactSizeIterator<Item = f64>) -> Option<f64> {
    let n = deviations.len();
    if n == 0 {
        return None;
    }
    let sum_of_squares: f64 = deviations.map(|d| d * d).sum();
    Some((sum_of_squares / n as f64).sqrt())
}

pub fn bond_rmsd(sites: &[Point3<f64>], bonds: &[BondTerm]) -> Result<Option<f64>, DeviationError> {
    let deviations = bonds
        .iter()
        .map(|bond| {
            let distance = (site(sites, bond.atom1)? - site(sites, bond.atom2)?).norm();
            Ok(bond.equilibrium_length - distance)
        })
        .collect::<Result<Vec<_>, DeviationError>>()?;
    Ok(rms(deviations.into_iter()))
}

pub fn angle_rmsd_degrees(
    sites: &[Point3<f64>],
    angles: &[AngleTerm],
) -> Result<Option<f64>, DeviationError> {
    let deviations = angles
        .iter()
        .map(|angle| {
            let vertex = site(sites, angle.atom2)?;
            let arm1 = site(sites, angle.atom1)? - vertex;
            let arm2 = site(sites, angle.atom3)? - vertex;
            Ok((angle.equilibrium_angle - arm1.angle(&arm2)).to_degrees())
        })
        .collect::<Result<Vec<_>, DeviationError>>()?;
    Ok(rms(deviations.into_iter()))
}

/// Bond-length and bond-angle RMS deviations of `sites` from their topology equilibria.
pub fn bond_angle_rmsd(
    sites: &[Point3<f64>],
    bonds: &[BondTerm],
    angles: &[AngleTerm],
) -> Result<GeometryDeviation, DeviationError> {
    Ok(GeometryDeviation {
        bond_rmsd: bond_rmsd(sites, bonds)?,
        angle_rmsd_degrees: angle_rmsd_degrees(sites, angles)?,
    })
}
