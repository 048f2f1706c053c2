use super::cell::UnitCell;
use super::error::SymmetryError;
use super::operation::SymmetryOperation;

/// An ordered, non-empty list of symmetry operations.
///
/// The enumeration order returned by [`SpaceGroup::operations`] is stable and defines the
/// block layout of expanded coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct SpaceGroup {
    operations: Vec<SymmetryOperation>,
}

impl SpaceGroup {
    /// # Errors
    ///
    /// Returns [`SymmetryError::EmptySpaceGroup`] if `operations` is empty.
    pub fn new(operations: Vec<SymmetryOperation>) -> Result<Self, SymmetryError> {
        if operations.is_empty() {
            return Err(SymmetryError::EmptySpaceGroup);
        }
        Ok(Self { operations })
    }

    /// The trivial group containing only the identity.
    pub fn p1() -> Self {
        Self {
            operations: vec![SymmetryOperation::identity()],
        }
    }

    pub fn from_xyz<I, S>(expressions: I) -> Result<Self, SymmetryError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let operations = expressions
            .into_iter()
            .map(|e| SymmetryOperation::from_xyz(e.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(operations)
    }

    #[inline]
    pub fn operations(&self) -> &[SymmetryOperation] {
        &self.operations
    }

    #[inline]
    pub fn n_operations(&self) -> usize {
        self.operations.len()
    }

    pub fn is_p1(&self) -> bool {
        self.operations.len() == 1 && self.operations[0].is_identity()
    }
}

/// A unit cell together with the space group acting on it.
#[derive(Debug, Clone, PartialEq)]
pub struct CrystalSymmetry {
    unit_cell: UnitCell,
    space_group: SpaceGroup,
}

impl CrystalSymmetry {
    pub fn new(unit_cell: UnitCell, space_group: SpaceGroup) -> Self {
        Self {
            unit_cell,
            space_group,
        }
    }

    #[inline]
    pub fn unit_cell(&self) -> &UnitCell {
        &self.unit_cell
    }

    #[inline]
    pub fn space_group(&self) -> &SpaceGroup {
        &self.space_group
    }
}
