//! Validated measurement sets.
//!
//! Every constructor enforces the same contract before any computation runs:
//! exactly two coordinates per point, at least [`MIN_POINTS`] points, and only
//! finite values. JSON input additionally rejects non-numeric entries.

use crate::error::InputError;
use nalgebra::Vector2;
use serde_json::Value;

/// Smallest point set the growth loop can start from.
pub const MIN_POINTS: usize = 4;

/// Ordered 2-D measurements. Index identity is preserved by every stage.
#[derive(Clone, Debug, PartialEq)]
pub struct PointSet {
    points: Vec<Vector2<f64>>,
}

impl PointSet {
    /// Builds a point set from `[x, y]` pairs.
    pub fn from_points(points: &[[f64; 2]]) -> Result<Self, InputError> {
        Self::validated(points.iter().map(|p| Vector2::new(p[0], p[1])).collect())
    }

    /// Builds a point set from parallel x and y sequences.
    pub fn from_xy(xs: &[f64], ys: &[f64]) -> Result<Self, InputError> {
        if xs.len() != ys.len() {
            return Err(InputError::LengthMismatch {
                x: xs.len(),
                y: ys.len(),
            });
        }
        Self::validated(
            xs.iter()
                .zip(ys)
                .map(|(&x, &y)| Vector2::new(x, y))
                .collect(),
        )
    }

    /// Builds a point set from a `2 x n` row layout (`rows[0]` = x, `rows[1]` = y).
    pub fn from_rows<R: AsRef<[f64]>>(rows: &[R]) -> Result<Self, InputError> {
        if rows.len() != 2 {
            return Err(InputError::Shape { rows: rows.len() });
        }
        Self::from_xy(rows[0].as_ref(), rows[1].as_ref())
    }

    /// Parses either a `2 x n` nested array or an object `{"x": [...], "y": [...]}`.
    ///
    /// A flat numeric array is treated as a single row and rejected as a shape
    /// error.
    pub fn from_json_value(value: &Value) -> Result<Self, InputError> {
        match value {
            Value::Array(items) => {
                if items.iter().all(Value::is_array) {
                    let rows = items
                        .iter()
                        .enumerate()
                        .map(|(row, item)| json_row(row, item))
                        .collect::<Result<Vec<_>, _>>()?;
                    Self::from_rows(&rows)
                } else {
                    let row = json_row(0, value)?;
                    Err(InputError::Shape {
                        rows: usize::from(!row.is_empty()),
                    })
                }
            }
            Value::Object(map) => {
                let (Some(x), Some(y)) = (map.get("x"), map.get("y")) else {
                    return Err(InputError::UnsupportedJson);
                };
                let xs = json_row(0, x)?;
                let ys = json_row(1, y)?;
                Self::from_xy(&xs, &ys)
            }
            _ => Err(InputError::UnsupportedJson),
        }
    }

    fn validated(points: Vec<Vector2<f64>>) -> Result<Self, InputError> {
        if points.len() < MIN_POINTS {
            return Err(InputError::TooFewPoints {
                got: points.len(),
                min: MIN_POINTS,
            });
        }
        if let Some(index) = points
            .iter()
            .position(|p| !p.x.is_finite() || !p.y.is_finite())
        {
            return Err(InputError::NonFinite { index });
        }
        Ok(Self { points })
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Always false for a validated set; provided for API symmetry.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Vector2<f64>> {
        self.points.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Vector2<f64>> {
        self.points.iter()
    }

    pub fn as_slice(&self) -> &[Vector2<f64>] {
        &self.points
    }
}

impl std::ops::Index<usize> for PointSet {
    type Output = Vector2<f64>;

    fn index(&self, index: usize) -> &Self::Output {
        &self.points[index]
    }
}

impl<'a> IntoIterator for &'a PointSet {
    type Item = &'a Vector2<f64>;
    type IntoIter = std::slice::Iter<'a, Vector2<f64>>;

    fn into_iter(self) -> Self::IntoIter {
        self.points.iter()
    }
}

fn json_row(row: usize, value: &Value) -> Result<Vec<f64>, InputError> {
    let Value::Array(items) = value else {
        return Err(InputError::NonNumeric { row, col: 0 });
    };
    items
        .iter()
        .enumerate()
        .map(|(col, item)| item.as_f64().ok_or(InputError::NonNumeric { row, col }))
        .collect()
}
