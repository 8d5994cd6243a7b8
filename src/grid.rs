//! # Grid Column Calculation
//!
//! Forms are laid out on a fixed 12-unit grid: labels take `col_left` units
//! and widgets `col_right`. A nested fieldset (sub-layout) is `sub_width`
//! units wide and carries its own 12-unit grid, so its columns have to be
//! rescaled to line up with the outer widget column.

use serde::Serialize;

use crate::error::{FormError, FormResult};

/// Width of the whole page in grid units.
pub const GRID_UNITS: u32 = 12;

/// Column spans of a nested sub-layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SubColumns {
    pub sub_left: i64,
    pub sub_right: i64,
    /// Negative when the sub-layout is wider than the outer columns.
    pub offset: i64,
}

impl SubColumns {
    /// Offset class for the sub-layout, only when an offset is needed.
    pub fn offset_class(&self) -> Option<String> {
        if self.offset > 0 {
            Some(format!("col-lg-offset-{}", self.offset))
        } else {
            None
        }
    }
}

/// Check the outer widths against the grid.
pub fn validate_widths(col_left: u32, col_right: u32, sub_width: u32) -> FormResult<()> {
    let outer = col_left.checked_add(col_right);
    if outer.map_or(true, |units| units > GRID_UNITS) {
        return Err(FormError::InvalidConfiguration {
            reason: format!(
                "col_left ({}) + col_right ({}) exceeds the {}-unit grid",
                col_left, col_right, GRID_UNITS
            ),
        });
    }
    if sub_width == 0 {
        return Err(FormError::InvalidConfiguration {
            reason: "sub_width must be greater than zero".to_string(),
        });
    }
    Ok(())
}

/// Compute sub-layout columns so that the right sub-column lines up with the
/// outer widget column.
pub fn compute_sub_columns(col_left: u32, col_right: u32, sub_width: u32) -> FormResult<SubColumns> {
    validate_widths(col_left, col_right, sub_width)?;

    let grid = i64::from(GRID_UNITS);
    let (left, right, width) = (i64::from(col_left), i64::from(col_right), i64::from(sub_width));

    let sub_left = ceil_div(grid * (width - right), width);
    Ok(SubColumns {
        sub_left,
        sub_right: grid - sub_left,
        offset: left + right - width,
    })
}

/// Ceiling division for a positive divisor.
fn ceil_div(numerator: i64, divisor: i64) -> i64 {
    let quotient = numerator.div_euclid(divisor);
    if numerator.rem_euclid(divisor) == 0 {
        quotient
    } else {
        quotient + 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_widths() {
        let cols = compute_sub_columns(3, 6, 8).unwrap();
        assert_eq!(
            cols,
            SubColumns {
                sub_left: 3,
                sub_right: 9,
                offset: 1
            }
        );
        assert_eq!(cols.offset_class(), Some("col-lg-offset-1".to_string()));
    }

    #[test]
    fn test_columns_always_fill_grid() {
        for col_left in 0..=12u32 {
            for col_right in 0..=(12 - col_left) {
                for sub_width in 1..=12 {
                    let cols = compute_sub_columns(col_left, col_right, sub_width).unwrap();
                    assert_eq!(cols.sub_left + cols.sub_right, 12);
                }
            }
        }
    }

    #[test]
    fn test_non_positive_offset_has_no_class() {
        let cols = compute_sub_columns(2, 6, 8).unwrap();
        assert_eq!(cols.offset, 0);
        assert_eq!(cols.offset_class(), None);

        let cols = compute_sub_columns(2, 4, 8).unwrap();
        assert_eq!(cols.offset, -2);
        assert_eq!(cols.offset_class(), None);
    }

    #[test]
    fn test_narrow_sub_layout_rounds_up() {
        // 12 * (5 - 4) / 5 = 2.4
        let cols = compute_sub_columns(3, 4, 5).unwrap();
        assert_eq!(cols.sub_left, 3);
        assert_eq!(cols.sub_right, 9);
    }

    #[test]
    fn test_wide_sub_layout_stays_on_grid() {
        let cols = compute_sub_columns(3, 6, 400_000_000).unwrap();
        assert_eq!(cols.sub_left, 12);
        assert_eq!(cols.sub_right, 0);
        assert_eq!(cols.offset, 9 - 400_000_000);

        let cols = compute_sub_columns(0, 12, u32::MAX).unwrap();
        assert_eq!(cols.sub_left + cols.sub_right, 12);
        assert_eq!(cols.offset, 12 - i64::from(u32::MAX));
    }

    #[test]
    fn test_overflowing_outer_widths_rejected() {
        assert!(matches!(
            compute_sub_columns(u32::MAX, 1, 8),
            Err(FormError::InvalidConfiguration { .. })
        ));
        assert!(matches!(
            validate_widths(1, u32::MAX, 8),
            Err(FormError::InvalidConfiguration { .. })
        ));
    }

    #[test]
    fn test_invalid_widths() {
        assert!(matches!(
            compute_sub_columns(6, 7, 8),
            Err(FormError::InvalidConfiguration { .. })
        ));
        assert!(matches!(
            compute_sub_columns(3, 6, 0),
            Err(FormError::InvalidConfiguration { .. })
        ));
    }
}
