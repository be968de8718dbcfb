//! Desk-grid placement with periodic aisles.
//!
//! Each axis is generated independently: a cursor walks `0..count`, moving
//! by the base spacing per step and by an extra aisle width whenever the
//! index is a positive multiple of the aisle period.  The raw axis is then
//! shifted so the midpoint of its first and last value sits on the origin,
//! which keeps the grid symmetric no matter where the aisles fall.
//!
//! The 2-D placement is the row-major cross product of both axes.  The whole
//! thing is a pure function of [`LayoutSpec`]: equal specs give bit-identical
//! placements.

use glam::Vec2;
use thiserror::Error;

/*──────────────────────────── Error type ───────────────────────────*/

/// Which grid axis a configuration problem refers to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Axis {
    X,
    Z,
}

#[derive(Error, Debug, PartialEq)]
pub enum LayoutError {
    #[error("layout needs at least one column")]
    NoColumns,

    #[error("layout needs at least one row")]
    NoRows,

    #[error("base spacing on {axis:?} must be positive and finite, got {value}")]
    BadSpacing { axis: Axis, value: f32 },

    #[error("aisle width on {axis:?} must be non-negative and finite, got {value}")]
    BadAisleWidth { axis: Axis, value: f32 },
}

/*──────────────────────────── Parameters ───────────────────────────*/

/// Grid parameters.  An aisle period of `0` disables aisles on that axis.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LayoutSpec {
    pub columns: usize,
    pub rows: usize,
    pub base_spacing_x: f32,
    pub base_spacing_z: f32,
    pub aisle_every_cols: usize,
    pub aisle_every_rows: usize,
    pub aisle_width_x: f32,
    pub aisle_width_z: f32,
}

impl LayoutSpec {
    /// Reject bad parameters before any position is computed.
    pub fn validate(&self) -> Result<(), LayoutError> {
        if self.columns == 0 {
            return Err(LayoutError::NoColumns);
        }
        if self.rows == 0 {
            return Err(LayoutError::NoRows);
        }
        for (axis, value) in [(Axis::X, self.base_spacing_x), (Axis::Z, self.base_spacing_z)] {
            if !(value.is_finite() && value > 0.0) {
                return Err(LayoutError::BadSpacing { axis, value });
            }
        }
        for (axis, value) in [(Axis::X, self.aisle_width_x), (Axis::Z, self.aisle_width_z)] {
            if !(value.is_finite() && value >= 0.0) {
                return Err(LayoutError::BadAisleWidth { axis, value });
            }
        }
        Ok(())
    }
}

/*──────────────────────────── Output ───────────────────────────────*/

/// Row-major `(x, z)` positions, centred on the origin.
#[derive(Clone, Debug, PartialEq)]
pub struct Placement {
    columns: usize,
    rows: usize,
    xs: Vec<f32>,
    zs: Vec<f32>,
    points: Vec<Vec2>,
}

impl Placement {
    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    #[inline]
    pub fn columns(&self) -> usize {
        self.columns
    }

    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// All positions; `x` is world X and `y` is world Z.
    #[inline]
    pub fn points(&self) -> &[Vec2] {
        &self.points
    }

    /// Recentred column positions along X.
    #[inline]
    pub fn column_positions(&self) -> &[f32] {
        &self.xs
    }

    /// Recentred row positions along Z.
    #[inline]
    pub fn row_positions(&self) -> &[f32] {
        &self.zs
    }

    pub fn get(&self, column: usize, row: usize) -> Option<Vec2> {
        if column >= self.columns || row >= self.rows {
            return None;
        }
        self.points.get(row * self.columns + column).copied()
    }

    /// Smallest axis-aligned rectangle holding every position.
    pub fn bounds(&self) -> (Vec2, Vec2) {
        // both axes are non-empty and sorted ascending
        let min = Vec2::new(self.xs[0], self.zs[0]);
        let max = Vec2::new(self.xs[self.xs.len() - 1], self.zs[self.zs.len() - 1]);
        (min, max)
    }
}

/*──────────────────────────── Generator ────────────────────────────*/

/// Build the placement table for `spec`.
pub fn generate(spec: &LayoutSpec) -> Result<Placement, LayoutError> {
    spec.validate()?;

    let xs = centre(raw_axis(
        spec.columns,
        spec.base_spacing_x,
        spec.aisle_every_cols,
        spec.aisle_width_x,
    ));
    let zs = centre(raw_axis(
        spec.rows,
        spec.base_spacing_z,
        spec.aisle_every_rows,
        spec.aisle_width_z,
    ));

    let mut points = Vec::with_capacity(spec.columns * spec.rows);
    for &z in &zs {
        for &x in &xs {
            points.push(Vec2::new(x, z));
        }
    }

    Ok(Placement {
        columns: spec.columns,
        rows: spec.rows,
        xs,
        zs,
        points,
    })
}

/// Cursor positions before recentring.  Strictly increasing for a valid spec.
pub fn raw_axis(count: usize, spacing: f32, aisle_every: usize, aisle_width: f32) -> Vec<f32> {
    let mut values = Vec::with_capacity(count);
    let mut cursor = 0.0f32;
    for index in 0..count {
        if index > 0 {
            cursor += spacing;
            if aisle_every > 0 && index % aisle_every == 0 {
                cursor += aisle_width;
            }
        }
        values.push(cursor);
    }
    values
}

/// Shift so the midpoint of the first and last value lands on zero.
fn centre(mut values: Vec<f32>) -> Vec<f32> {
    if let (Some(&first), Some(&last)) = (values.first(), values.last()) {
        let midpoint = (first + last) / 2.0;
        for v in &mut values {
            *v -= midpoint;
        }
    }
    values
}

/*====================================================================*/
/*                                Tests                                */
/*====================================================================*/
#[cfg(test)]
mod tests {
    use super::*;

    fn office() -> LayoutSpec {
        LayoutSpec {
            columns: 20,
            rows: 12,
            base_spacing_x: 1.2,
            base_spacing_z: 1.4,
            aisle_every_cols: 5,
            aisle_every_rows: 4,
            aisle_width_x: 2.2,
            aisle_width_z: 2.0,
        }
    }

    fn single_row(columns: usize) -> LayoutSpec {
        LayoutSpec {
            columns,
            rows: 1,
            base_spacing_x: 1.0,
            base_spacing_z: 1.0,
            aisle_every_cols: 5,
            aisle_every_rows: 0,
            aisle_width_x: 2.0,
            aisle_width_z: 0.0,
        }
    }

    #[test]
    fn five_columns_never_reach_the_aisle() {
        assert_eq!(raw_axis(5, 1.0, 5, 2.0), vec![0.0, 1.0, 2.0, 3.0, 4.0]);
        let p = generate(&single_row(5)).unwrap();
        assert_eq!(p.column_positions(), &[-2.0, -1.0, 0.0, 1.0, 2.0]);
        assert_eq!(p.row_positions(), &[0.0]);
    }

    #[test]
    fn aisle_opens_at_period_multiple() {
        // index 5 gets spacing + aisle width
        let raw = raw_axis(7, 1.0, 5, 2.0);
        assert_eq!(raw, vec![0.0, 1.0, 2.0, 3.0, 4.0, 7.0, 8.0]);
        let p = generate(&single_row(7)).unwrap();
        assert_eq!(p.column_positions()[0], -4.0);
        assert_eq!(p.column_positions()[6], 4.0);
    }

    #[test]
    fn length_is_columns_times_rows() {
        for (c, r) in [(1, 1), (3, 7), (20, 12)] {
            let spec = LayoutSpec {
                columns: c,
                rows: r,
                ..office()
            };
            assert_eq!(generate(&spec).unwrap().len(), c * r);
        }
    }

    #[test]
    fn raw_axes_strictly_increase_and_recentre_symmetrically() {
        let spec = office();
        let raw = raw_axis(spec.columns, spec.base_spacing_x, spec.aisle_every_cols, spec.aisle_width_x);
        assert!(raw.windows(2).all(|w| w[0] < w[1]));

        let p = generate(&spec).unwrap();
        for axis in [p.column_positions(), p.row_positions()] {
            let min = axis[0];
            let max = axis[axis.len() - 1];
            assert!((min + max).abs() < 1e-4, "min {min} max {max}");
        }
        let (lo, hi) = p.bounds();
        assert!((lo + hi).length() < 1e-4);
    }

    #[test]
    fn row_major_order() {
        let p = generate(&office()).unwrap();
        let xs = p.column_positions();
        let zs = p.row_positions();
        assert_eq!(p.points()[0], Vec2::new(xs[0], zs[0]));
        assert_eq!(p.points()[1], Vec2::new(xs[1], zs[0]));
        assert_eq!(p.points()[20], Vec2::new(xs[0], zs[1]));
        assert_eq!(p.get(3, 2), Some(Vec2::new(xs[3], zs[2])));
        assert_eq!(p.get(20, 0), None);
    }

    #[test]
    fn repeated_generation_is_bit_identical() {
        let a = generate(&office()).unwrap();
        let b = generate(&office()).unwrap();
        let bits = |p: &Placement| -> Vec<(u32, u32)> {
            p.points().iter().map(|v| (v.x.to_bits(), v.y.to_bits())).collect()
        };
        assert_eq!(bits(&a), bits(&b));
    }

    #[test]
    fn centre_aisle_is_clear_in_the_office_grid() {
        // the walkway through x = 0 separates columns 9 and 10
        let p = generate(&office()).unwrap();
        let xs = p.column_positions();
        assert!(xs[9] < -1.0 && xs[10] > 1.0);
    }

    #[test]
    fn invalid_parameters_fail_fast() {
        let zero_cols = LayoutSpec { columns: 0, ..office() };
        assert_eq!(generate(&zero_cols), Err(LayoutError::NoColumns));

        let zero_rows = LayoutSpec { rows: 0, ..office() };
        assert_eq!(generate(&zero_rows), Err(LayoutError::NoRows));

        let flat = LayoutSpec { base_spacing_z: 0.0, ..office() };
        assert_eq!(
            generate(&flat),
            Err(LayoutError::BadSpacing { axis: Axis::Z, value: 0.0 })
        );

        let negative_aisle = LayoutSpec { aisle_width_x: -1.0, ..office() };
        assert!(matches!(
            generate(&negative_aisle),
            Err(LayoutError::BadAisleWidth { axis: Axis::X, .. })
        ));
    }
}
