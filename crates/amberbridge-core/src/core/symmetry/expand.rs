use super::error::SymmetryError;
use super::space_group::CrystalSymmetry;
use nalgebra::{Point3, Vector3};

/// Expands asymmetric-unit sites to the full unit cell.
///
/// The result holds `sites.len() * n_operations` points arranged as one contiguous block
/// per symmetry operation, in the space group's enumeration order. Block `i` is the image
/// of the asymmetric unit under operation `i`: each site is rotated first, then shifted by
/// the operation's translation converted to orthogonal units through the cell metric.
pub fn expand(sites: &[Point3<f64>], symmetry: &CrystalSymmetry) -> Vec<Point3<f64>> {
    let operations = symmetry.space_group().operations();
    let mut expanded = Vec::with_capacity(sites.len() * operations.len());

    for op in operations {
        let shift = symmetry.unit_cell().orthogonalize(&op.translation);
        expanded.extend(sites.iter().map(|site| op.apply(site, &shift)));
    }

    expanded
}

/// Folds per-image gradients back onto the asymmetric unit.
///
/// Each symmetry block is mapped back through the inverse rotation of its operation,
/// accumulated, and the sum divided by the number of operations. Translations do not
/// act on gradients.
///
/// # Errors
///
/// Returns [`SymmetryError::IncommensurateImages`] if the input length is not a multiple of
/// the operation count, or [`SymmetryError::SingularRotation`] if an operation cannot be
/// inverted.
pub fn collapse(
    expanded_gradients: &[Vector3<f64>],
    symmetry: &CrystalSymmetry,
) -> Result<Vec<Vector3<f64>>, SymmetryError> {
    let operations = symmetry.space_group().operations();
    let n_operations = operations.len();

    if expanded_gradients.len() % n_operations != 0 {
        return Err(SymmetryError::IncommensurateImages {
            len: expanded_gradients.len(),
            n_operations,
        });
    }
    let n_atoms = expanded_gradients.len() / n_operations;
    if n_atoms == 0 {
        return Ok(Vec::new());
    }

    let mut gradients = vec![Vector3::zeros(); n_atoms];
    for (index, (op, block)) in operations
        .iter()
        .zip(expanded_gradients.chunks_exact(n_atoms))
        .enumerate()
    {
        let inverse = op
            .inverse_rotation()
            .ok_or(SymmetryError::SingularRotation { index })?;
        for (accumulated, gradient) in gradients.iter_mut().zip(block) {
            *accumulated += inverse * gradient;
        }
    }

    let scale = 1.0 / n_operations as f64;
    for gradient in &mut gradients {
        *gradient *= scale;
    }

    Ok(gradients)
}
