use super::error::SymmetryError;
use nalgebra::{Matrix3, Point3, Vector3};
use std::fmt;
use std::str::FromStr;

const AXES: [char; 3] = ['x', 'y', 'z'];
const FRACTION_DENOMINATORS: [i32; 5] = [2, 3, 4, 6, 12];
const FRACTION_TOLERANCE: f64 = 1e-9;

/// A crystallographic symmetry operation: a 3×3 rotation followed by a translation.
///
/// The translation is expressed in fractional units of the unit cell. Applying the
/// operation to Cartesian sites requires the cell metric to convert it first, which is
/// handled by [`super::expand::expand`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SymmetryOperation {
    pub rotation: Matrix3<f64>,
    pub translation: Vector3<f64>,
}

impl SymmetryOperation {
    pub fn new(rotation: Matrix3<f64>, translation: Vector3<f64>) -> Self {
        Self {
            rotation,
            translation,
        }
    }

    pub fn identity() -> Self {
        Self::new(Matrix3::identity(), Vector3::zeros())
    }

    pub fn translation_only(translation: Vector3<f64>) -> Self {
        Self::new(Matrix3::identity(), translation)
    }

    pub fn is_identity(&self) -> bool {
        self.rotation == Matrix3::identity() && self.translation == Vector3::zeros()
    }

    /// Rotates `site` and adds an already-orthogonalized shift, rotation first.
    #[inline]
    pub fn apply(&self, site: &Point3<f64>, shift: &Vector3<f64>) -> Point3<f64> {
        Point3::from(self.rotation * site.coords + shift)
    }

    pub fn inverse_rotation(&self) -> Option<Matrix3<f64>> {
        self.rotation.try_inverse()
    }

    /// Parses an operation written in xyz (Jones-faithful) notation, e.g. `-x,y+1/2,-z`.
    ///
    /// Each of the three comma-separated rows is a signed sum of axis symbols and
    /// constants; constants may be integers, decimals or simple fractions.
    ///
    /// # Errors
    ///
    /// Returns [`SymmetryError::InvalidOperation`] if the expression does not have exactly
    /// three rows or contains a term that is neither an axis nor a number.
    pub fn from_xyz(expression: &str) -> Result<Self, SymmetryError> {
        let invalid = |reason: String| SymmetryError::InvalidOperation {
            operation: expression.to_string(),
            reason,
        };

        let rows: Vec<&str> = expression.split(',').collect();
        if rows.len() != 3 {
            return Err(invalid(format!("expected 3 rows, found {}", rows.len())));
        }

        let mut rotation = Matrix3::zeros();
        let mut translation = Vector3::zeros();
        for (i, row) in rows.iter().enumerate() {
            let (coefficients, constant) = parse_row(row).map_err(invalid)?;
            for (j, coefficient) in coefficients.iter().enumerate() {
                rotation[(i, j)] = *coefficient;
            }
            translation[i] = constant;
        }

        Ok(Self::new(rotation, translation))
    }
}

impl Default for SymmetryOperation {
    fn default() -> Self {
        Self::identity()
    }
}

impl FromStr for SymmetryOperation {
    type Err = SymmetryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_xyz(s)
    }
}

impl fmt::Display for SymmetryOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rows: Vec<String> = (0..3)
            .map(|i| {
                let coefficients = [
                    self.rotation[(i, 0)],
                    self.rotation[(i, 1)],
                    self.rotation[(i, 2)],
                ];
                format_row(&coefficients, self.translation[i])
            })
            .collect();
        write!(f, "{}", rows.join(","))
    }
}

fn parse_row(row: &str) -> Result<([f64; 3], f64), String> {
    let chars: Vec<char> = row
        .chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| c.to_ascii_lowercase())
        .collect();
    if chars.is_empty() {
        return Err("empty row".to_string());
    }

    let mut coefficients = [0.0; 3];
    let mut constant = 0.0;
    let mut i = 0;

    while i < chars.len() {
        let mut sign = 1.0;
        if chars[i] == '+' || chars[i] == '-' {
            if chars[i] == '-' {
                sign = -1.0;
            }
            i += 1;
        }
        let Some(&c) = chars.get(i) else {
            return Err(format!("dangling sign in '{}'", row.trim()));
        };

        if let Some(axis) = AXES.iter().position(|&a| a == c) {
            coefficients[axis] += sign;
            i += 1;
        } else if c.is_ascii_digit() || c == '.' {
            let start = i;
            while i < chars.len() && (chars[i].is_ascii_digit() || chars[i] == '.' || chars[i] == '/')
            {
                i += 1;
            }
            let token: String = chars[start..i].iter().collect();
            let value = parse_number(&token)?;

            // Allow a multiplied axis such as `2x` or `1/2*x`.
            if chars.get(i) == Some(&'*') {
                i += 1;
            }
            match chars.get(i).and_then(|c| AXES.iter().position(|a| a == c)) {
                Some(axis) => {
                    coefficients[axis] += sign * value;
                    i += 1;
                }
                None => constant += sign * value,
            }
        } else {
            return Err(format!("unexpected character '{}' in '{}'", c, row.trim()));
        }
    }

    Ok((coefficients, constant))
}

fn parse_number(token: &str) -> Result<f64, String> {
    let parse = |s: &str| {
        s.parse::<f64>()
            .map_err(|_| format!("invalid number '{}'", token))
    };
    match token.split_once('/') {
        Some((numerator, denominator)) => {
            let denominator = parse(denominator)?;
            if denominator == 0.0 {
                return Err(format!("zero denominator in '{}'", token));
            }
            Ok(parse(numerator)? / denominator)
        }
        None => parse(token),
    }
}

fn format_row(coefficients: &[f64; 3], constant: f64) -> String {
    let mut out = String::new();
    for (axis, &coefficient) in AXES.iter().zip(coefficients) {
        if coefficient == 0.0 {
            continue;
        }
        let sign = if coefficient < 0.0 { '-' } else { '+' };
        let magnitude = coefficient.abs();
        if (magnitude - 1.0).abs() < FRACTION_TOLERANCE {
            out.push_str(&format!("{}{}", sign, axis));
        } else {
            out.push_str(&format!("{}{}*{}", sign, format_number(magnitude), axis));
        }
    }
    if constant != 0.0 {
        let sign = if constant < 0.0 { '-' } else { '+' };
        out.push_str(&format!("{}{}", sign, format_number(constant.abs())));
    }

    match out.strip_prefix('+') {
        Some(stripped) => stripped.to_string(),
        None if out.is_empty() => "0".to_string(),
        None => out,
    }
}

fn format_number(value: f64) -> String {
    if (value - value.round()).abs() < FRACTION_TOLERANCE {
        return format!("{}", value.round() as i64);
    }
    for denominator in FRACTION_DENOMINATORS {
        let numerator = value * denominator as f64;
        if (numerator - numerator.round()).abs() < FRACTION_TOLERANCE {
            return format!("{}/{}", numerator.round() as i64, denominator);
        }
    }
    format!("{}", value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_parses_from_xyz() {
        let op = SymmetryOperation::from_xyz("x,y,z").unwrap();
        assert!(op.is_identity());
        assert_eq!(op, SymmetryOperation::identity());
    }

    #[test]
    fn screw_axis_parses_rotation_and_fractional_translation() {
        let op: SymmetryOperation = "-x, y+1/2, -z".parse().unwrap();
        assert_eq!(
            op.rotation,
            Matrix3::new(-1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, -1.0)
        );
        assert_eq!(op.translation, Vector3::new(0.0, 0.5, 0.0));
    }

    #[test]
    fn leading_constant_and_mixed_axes_parse() {
        let op = SymmetryOperation::from_xyz("1/2+x-y, X, 0.25-z").unwrap();
        assert_eq!(op.rotation[(0, 0)], 1.0);
        assert_eq!(op.rotation[(0, 1)], -1.0);
        assert_eq!(op.rotation[(1, 0)], 1.0);
        assert_eq!(op.rotation[(2, 2)], -1.0);
        assert_eq!(op.translation, Vector3::new(0.5, 0.0, 0.25));
    }

    #[test]
    fn integer_translation_parses() {
        let op = SymmetryOperation::from_xyz("x+1,y,z").unwrap();
        assert_eq!(op.rotation, Matrix3::identity());
        assert_eq!(op.translation, Vector3::new(1.0, 0.0, 0.0));
    }

    #[test]
    fn wrong_row_count_is_rejected() {
        let result = SymmetryOperation::from_xyz("x,y");
        assert!(matches!(
            result,
            Err(SymmetryError::InvalidOperation { .. })
        ));
    }

    #[test]
    fn unknown_symbol_is_rejected() {
        let result = SymmetryOperation::from_xyz("x,w,z");
        assert!(matches!(
            result,
            Err(SymmetryError::InvalidOperation { .. })
        ));
    }

    #[test]
    fn zero_denominator_is_rejected() {
        let result = SymmetryOperation::from_xyz("x+1/0,y,z");
        assert!(matches!(
            result,
            Err(SymmetryError::InvalidOperation { .. })
        ));
    }

    #[test]
    fn dangling_sign_is_rejected() {
        let result = SymmetryOperation::from_xyz("x+,y,z");
        assert!(matches!(
            result,
            Err(SymmetryError::InvalidOperation { .. })
        ));
    }

    #[test]
    fn display_writes_xyz_notation() {
        let op = SymmetryOperation::from_xyz("-x,y+1/2,-z+3/4").unwrap();
        assert_eq!(op.to_string(), "-x,y+1/2,-z+3/4");
        assert_eq!(SymmetryOperation::identity().to_string(), "x,y,z");
    }

    #[test]
    fn display_output_parses_back_to_same_operation() {
        let op = SymmetryOperation::from_xyz("x-y,x,z+1/6").unwrap();
        let reparsed = SymmetryOperation::from_xyz(&op.to_string()).unwrap();
        assert_eq!(op, reparsed);
    }

    #[test]
    fn apply_rotates_before_adding_shift() {
        let op = SymmetryOperation::from_xyz("-x,-y,z").unwrap();
        let moved = op.apply(&Point3::new(1.0, 2.0, 3.0), &Vector3::new(10.0, 0.0, 0.0));
        assert_eq!(moved, Point3::new(9.0, -2.0, 3.0));
    }

    #[test]
    fn inverse_rotation_undoes_rotation() {
        let op = SymmetryOperation::from_xyz("y,-x,z").unwrap();
        let inverse = op.inverse_rotation().unwrap();
        assert_eq!(inverse * op.rotation, Matrix3::identity());
    }
}
