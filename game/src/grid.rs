use serde::{Deserialize, Serialize};

use crate::shapes::{COLOR_COUNT, Shape};

pub const GRID_SIZE: usize = 9;

pub type PieceId = u32;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "kind")]
pub enum Cell {
    #[default]
    Empty,
    #[serde(rename_all = "camelCase")]
    Occupied { piece_id: PieceId, color_index: u8 },
}

impl Cell {
    /// Occupied cell with the colour index wrapped into the palette.
    pub fn occupied(piece_id: PieceId, color_index: usize) -> Self {
        Cell::Occupied {
            piece_id,
            color_index: (color_index % COLOR_COUNT) as u8,
        }
    }

    pub fn is_empty(self) -> bool {
        matches!(self, Cell::Empty)
    }

    pub fn is_occupied(self) -> bool {
        !self.is_empty()
    }
}

/// Top-left corner of a shape's bounding box on the grid.
///
/// Signed so pointer-derived anchors (target minus shape centre) can fall off
/// the board; those are simply not placeable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Anchor {
    pub row: i32,
    pub col: i32,
}

impl Anchor {
    pub const fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }
}

/// Square board of cells. The side length is fixed for the grid's lifetime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "GridRepr")]
pub struct Grid {
    size: usize,
    cells: Vec<Cell>,
}

#[derive(Deserialize)]
struct GridRepr {
    size: usize,
    cells: Vec<Cell>,
}

impl TryFrom<GridRepr> for Grid {
    type Error = String;

    fn try_from(repr: GridRepr) -> Result<Self, Self::Error> {
        let expected = repr
            .size
            .checked_mul(repr.size)
            .ok_or_else(|| format!("grid size {} is too large", repr.size))?;
        if repr.cells.len() != expected {
            return Err(format!(
                "grid of size {} needs {expected} cells, got {}",
                repr.size,
                repr.cells.len()
            ));
        }
        if let Some(bad) = repr.cells.iter().position(|cell| {
            matches!(cell, Cell::Occupied { color_index, .. } if usize::from(*color_index) >= COLOR_COUNT)
        }) {
            return Err(format!("cell {bad} has a colour outside the palette"));
        }
        Ok(Grid {
            size: repr.size,
            cells: repr.cells,
        })
    }
}

impl Grid {
    pub fn new(size: usize) -> Self {
        Self {
            size,
            cells: vec![Cell::Empty; size * size],
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn cell(&self, row: usize, col: usize) -> Option<Cell> {
        if row >= self.size || col >= self.size {
            return None;
        }
        Some(self.cells[row * self.size + col])
    }

    pub fn row(&self, row: usize) -> &[Cell] {
        let start = row.min(self.size) * self.size;
        let end = (start + self.size).min(self.cells.len());
        &self.cells[start..end]
    }

    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> {
        self.cells.chunks(self.size.max(1))
    }

    pub fn is_occupied(&self, row: usize, col: usize) -> bool {
        self.cell(row, col).is_some_and(Cell::is_occupied)
    }

    pub fn occupied_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_occupied()).count()
    }

    pub fn is_clear(&self) -> bool {
        self.cells.iter().all(|c| c.is_empty())
    }

    /// Writes a single cell. Out-of-range coordinates are ignored.
    pub fn set_cell(&mut self, row: usize, col: usize, cell: Cell) {
        if row < self.size && col < self.size {
            self.cells[row * self.size + col] = cell;
        }
    }

    /// True iff the shape's whole bounding box lies on the grid and every
    /// filled shape cell lands on an empty grid cell.
    pub fn can_place(&self, shape: &Shape, row: i32, col: i32) -> bool {
        let Some((row, col)) = self.bounded_anchor(shape, row, col) else {
            return false;
        };
        shape
            .filled_cells()
            .all(|(dr, dc)| self.cells[(row + dr) * self.size + col + dc].is_empty())
    }

    /// Stamps `shape` at the anchor, tagging each cell with the piece id and
    /// colour. Re-validates first: an unplaceable request leaves the grid
    /// untouched and returns `false`.
    pub fn place(
        &mut self,
        shape: &Shape,
        row: i32,
        col: i32,
        piece_id: PieceId,
        color_index: usize,
    ) -> bool {
        if !self.can_place(shape, row, col) {
            return false;
        }
        let (row, col) = (row as usize, col as usize);
        let cell = Cell::occupied(piece_id, color_index);
        for (dr, dc) in shape.filled_cells() {
            self.cells[(row + dr) * self.size + col + dc] = cell;
        }
        true
    }

    /// Bounds precondition for placement; checked before any cell is read.
    fn bounded_anchor(&self, shape: &Shape, row: i32, col: i32) -> Option<(usize, usize)> {
        if row < 0 || col < 0 {
            return None;
        }
        let (row, col) = (row as usize, col as usize);
        if row + shape.rows() > self.size || col + shape.cols() > self.size {
            return None;
        }
        Some((row, col))
    }
}

/// Floored centroid of a shape's filled cells, in shape-local coordinates.
///
/// Converts "pointer is over this cell" into an anchor: `target - center`.
pub fn shape_center(shape: &Shape) -> Anchor {
    let (mut sum_r, mut sum_c, mut count) = (0usize, 0usize, 0usize);
    for (r, c) in shape.filled_cells() {
        sum_r += r;
        sum_c += c;
        count += 1;
    }
    if count == 0 {
        return Anchor::new(0, 0);
    }
    Anchor::new((sum_r / count) as i32, (sum_c / count) as i32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes::shape_at;

    #[test]
    fn new_grid_is_empty() {
        let grid = Grid::new(GRID_SIZE);
        assert_eq!(grid.size(), GRID_SIZE);
        assert_eq!(grid.occupied_count(), 0);
        assert_eq!(grid.rows().count(), GRID_SIZE);
    }

    #[test]
    fn occupied_colour_index_wraps() {
        assert_eq!(
            Cell::occupied(1, COLOR_COUNT + 2),
            Cell::Occupied {
                piece_id: 1,
                color_index: 2
            }
        );
    }

    #[test]
    fn centre_of_t_is_top_middle() {
        let t = shape_at(5).unwrap();
        assert_eq!(shape_center(t), Anchor::new(0, 1));
    }

    #[test]
    fn centre_of_vertical_bar_is_middle() {
        let bar = shape_at(12).unwrap();
        assert_eq!(shape_center(bar), Anchor::new(1, 0));
    }

    #[test]
    fn grid_json_with_wrong_cell_count_is_rejected() {
        let err = serde_json::from_str::<Grid>(r#"{"size":2,"cells":[{"kind":"empty"}]}"#);
        assert!(err.is_err());

        let grid = Grid::new(2);
        let json = serde_json::to_string(&grid).unwrap();
        assert_eq!(serde_json::from_str::<Grid>(&json).unwrap(), grid);
    }

    #[test]
    fn grid_json_with_overflowing_size_is_rejected() {
        let err = serde_json::from_str::<Grid>(r#"{"size":4294967296,"cells":[]}"#);
        assert!(err.is_err());
        let err = serde_json::from_str::<Grid>(&format!(r#"{{"size":{},"cells":[]}}"#, usize::MAX));
        assert!(err.is_err());
    }

    #[test]
    fn grid_json_with_colour_outside_palette_is_rejected() {
        let json = format!(
            r#"{{"size":1,"cells":[{{"kind":"occupied","pieceId":1,"colorIndex":{COLOR_COUNT}}}]}}"#
        );
        assert!(serde_json::from_str::<Grid>(&json).is_err());

        let json = r#"{"size":1,"cells":[{"kind":"occupied","pieceId":1,"colorIndex":11}]}"#;
        let grid = serde_json::from_str::<Grid>(json).expect("palette colour is accepted");
        assert_eq!(grid.cell(0, 0), Some(Cell::occupied(1, 11)));
    }

    #[test]
    fn cell_serializes_with_kind_tag() {
        let json = serde_json::to_string(&Cell::occupied(7, 3)).unwrap();
        assert_eq!(json, r#"{"kind":"occupied","pieceId":7,"colorIndex":3}"#);
        let back: Cell = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Cell::occupied(7, 3));
    }
}
