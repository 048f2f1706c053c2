use super::error::SymmetryError;
use nalgebra::{Matrix3, Point3, Vector3};

const DEGENERACY_TOLERANCE: f64 = 1e-10;

/// The repeating volume of a crystal lattice.
///
/// Stores the orthogonalization matrix that maps fractional coordinates onto Cartesian
/// (orthogonal) coordinates, following the usual crystallographic convention: the `a` axis
/// lies along `x`, the `b` axis lies in the `xy` plane, and `c` completes a right-handed
/// frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UnitCell {
    parameters: [f64; 6],
    orthogonalization: Matrix3<f64>,
    fractionalization: Matrix3<f64>,
}

impl UnitCell {
    /// Builds a unit cell from edge lengths (Å) and inter-axial angles (degrees).
    ///
    /// # Errors
    ///
    /// Returns [`SymmetryError::InvalidCell`] if any length is not strictly positive or
    /// the angles do not describe a cell with positive volume.
    pub fn new(
        a: f64,
        b: f64,
        c: f64,
        alpha: f64,
        beta: f64,
        gamma: f64,
    ) -> Result<Self, SymmetryError> {
        let parameters = [a, b, c, alpha, beta, gamma];

        if parameters.iter().any(|p| !p.is_finite()) {
            return Err(SymmetryError::InvalidCell {
                parameters,
                reason: "parameters must be finite",
            });
        }
        if a <= 0.0 || b <= 0.0 || c <= 0.0 {
            return Err(SymmetryError::InvalidCell {
                parameters,
                reason: "edge lengths must be positive",
            });
        }

        let (cos_a, cos_b, cos_g) = (
            alpha.to_radians().cos(),
            beta.to_radians().cos(),
            gamma.to_radians().cos(),
        );
        let sin_g = gamma.to_radians().sin();

        let radicand =
            1.0 - cos_a * cos_a - cos_b * cos_b - cos_g * cos_g + 2.0 * cos_a * cos_b * cos_g;
        if radicand <= DEGENERACY_TOLERANCE || sin_g.abs() < DEGENERACY_TOLERANCE {
            return Err(SymmetryError::InvalidCell {
                parameters,
                reason: "angles describe a degenerate cell",
            });
        }
        let volume = a * b * c * radicand.sqrt();

        #[rustfmt::skip]
        let orthogonalization = Matrix3::new(
            a,   b * cos_g, c * cos_b,
            0.0, b * sin_g, c * (cos_a - cos_b * cos_g) / sin_g,
            0.0, 0.0,       volume / (a * b * sin_g),
        );

        let fractionalization =
            orthogonalization
                .try_inverse()
                .ok_or(SymmetryError::InvalidCell {
                    parameters,
                    reason: "orthogonalization matrix is singular",
                })?;

        Ok(Self {
            parameters,
            orthogonalization,
            fractionalization,
        })
    }

    pub fn from_parameters(parameters: [f64; 6]) -> Result<Self, SymmetryError> {
        let [a, b, c, alpha, beta, gamma] = parameters;
        Self::new(a, b, c, alpha, beta, gamma)
    }

    pub fn cubic(edge: f64) -> Result<Self, SymmetryError> {
        Self::new(edge, edge, edge, 90.0, 90.0, 90.0)
    }

    #[inline]
    pub fn parameters(&self) -> [f64; 6] {
        self.parameters
    }

    #[inline]
    pub fn orthogonalization_matrix(&self) -> &Matrix3<f64> {
        &self.orthogonalization
    }

    #[inline]
    pub fn fractionalization_matrix(&self) -> &Matrix3<f64> {
        &self.fractionalization
    }

    pub fn volume(&self) -> f64 {
        self.orthogonalization.determinant()
    }

    /// Converts a fractional vector into orthogonal (Cartesian) units.
    #[inline]
    pub fn orthogonalize(&self, fractional: &Vector3<f64>) -> Vector3<f64> {
        self.orthogonalization * fractional
    }

    #[inline]
    pub fn fractionalize(&self, cartesian: &Vector3<f64>) -> Vector3<f64> {
        self.fractionalization * cartesian
    }

    pub fn orthogonalize_point(&self, fractional: &Point3<f64>) -> Point3<f64> {
        Point3::from(self.orthogonalize(&fractional.coords))
    }

    pub fn fractionalize_point(&self, cartesian: &Point3<f64>) -> Point3<f64> {
        Point3::from(self.fractionalize(&cartesian.coords))
    }
}
