/// A position on the logical text grid, addressed by row and column.
///
/// Positions may lie outside the current grid; such cells are kept but never
/// produce geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CellPos {
    /// Row, counted from the top
    pub row: i32,
    /// Column, counted from the left
    pub col: i32,
}

impl CellPos {
    /// A position at `row`, `col`.
    pub fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }
}

impl From<(i32, i32)> for CellPos {
    /// Converts a `(row, col)` pair.
    fn from((row, col): (i32, i32)) -> Self {
        Self::new(row, col)
    }
}
