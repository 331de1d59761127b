//! Conversion between terminal cells and virtual pixels.
//!
//! Effects work in virtual pixels so that distances are isotropic even though
//! terminal cells are roughly twice as tall as they are wide.

/// Width of one terminal cell in virtual pixels.
pub const CELL_WIDTH_PX: f32 = 8.0;
/// Height of one terminal cell in virtual pixels.
pub const CELL_HEIGHT_PX: f32 = 16.0;

/// Pixel x coordinate of the centre of column `col`.
pub fn col_center_px(col: u16) -> f32 {
    (col as f32 + 0.5) * CELL_WIDTH_PX
}

/// Pixel y coordinate of the centre of row `row`.
pub fn row_center_px(row: u16) -> f32 {
    (row as f32 + 0.5) * CELL_HEIGHT_PX
}

/// Column containing pixel x coordinate `x`, if non-negative.
pub fn px_to_col(x: f32) -> Option<u16> {
    (x >= 0.0).then(|| (x / CELL_WIDTH_PX) as u16)
}

/// Row containing pixel y coordinate `y`, if non-negative.
pub fn px_to_row(y: f32) -> Option<u16> {
    (y >= 0.0).then(|| (y / CELL_HEIGHT_PX) as u16)
}

/// Size of an area of `cols` by `rows` cells in virtual pixels.
pub fn area_px(cols: u16, rows: u16) -> (f32, f32) {
    (cols as f32 * CELL_WIDTH_PX, rows as f32 * CELL_HEIGHT_PX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_round_trip() {
        assert_eq!(px_to_col(col_center_px(7)), Some(7));
        assert_eq!(px_to_row(row_center_px(3)), Some(3));
        assert_eq!(px_to_col(-1.0), None);
        assert_eq!(area_px(10, 5), (80.0, 80.0));
    }
}
