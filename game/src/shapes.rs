//! Fixed polyomino catalog and palette.
//!
//! The catalog is a process-wide constant table. Shapes are referenced by their
//! index; lookups never panic and unknown indices come back as `None`.

/// An immutable filled/empty matrix. Rows and columns are both at least one and
/// at least one cell is filled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Shape {
    cells: &'static [&'static [u8]],
}

impl Shape {
    const fn new(cells: &'static [&'static [u8]]) -> Self {
        Self { cells }
    }

    pub fn rows(&self) -> usize {
        self.cells.len()
    }

    pub fn cols(&self) -> usize {
        self.cells.first().map_or(0, |row| row.len())
    }

    pub fn is_filled(&self, row: usize, col: usize) -> bool {
        self.cells
            .get(row)
            .and_then(|r| r.get(col))
            .is_some_and(|&v| v != 0)
    }

    /// `(row, col)` offsets of every filled cell in row-major order.
    pub fn filled_cells(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.cells.iter().enumerate().flat_map(|(r, row)| {
            row.iter()
                .enumerate()
                .filter(|(_, v)| **v != 0)
                .map(move |(c, _)| (r, c))
        })
    }

    pub fn cell_count(&self) -> usize {
        self.filled_cells().count()
    }
}

pub const SHAPES: [Shape; 15] = [
    Shape::new(&[&[1]]),
    Shape::new(&[&[1, 1]]),
    Shape::new(&[&[1, 1, 1]]),
    Shape::new(&[&[1, 1], &[1, 1]]),
    Shape::new(&[&[1, 1, 1, 1]]),
    // T
    Shape::new(&[&[1, 1, 1], &[0, 1, 0]]),
    // L
    Shape::new(&[&[1, 1, 1], &[1, 0, 0]]),
    // J
    Shape::new(&[&[1, 1, 1], &[0, 0, 1]]),
    Shape::new(&[&[1, 1], &[1, 1], &[1, 0]]),
    // Z
    Shape::new(&[&[1, 1, 0], &[0, 1, 1]]),
    // S
    Shape::new(&[&[0, 1, 1], &[1, 1, 0]]),
    // T again; doubles its draw weight
    Shape::new(&[&[1, 1, 1], &[0, 1, 0]]),
    Shape::new(&[&[1], &[1], &[1]]),
    Shape::new(&[&[1, 1], &[1, 0]]),
    Shape::new(&[&[1, 0], &[1, 1], &[1, 0]]),
];

pub const SHAPE_COUNT: usize = SHAPES.len();

/// Pastel palette; occupied cells carry an index into this table.
pub const BLOCK_COLORS: [&str; 12] = [
    "#a8b5ff", "#c5a3ff", "#ffb3e6", "#7fdfd4", "#ffd89b", "#ff9f9f", "#b5c4ff", "#d4b3ff",
    "#ffc4e6", "#8fefdf", "#ffe0ab", "#ffafaf",
];

pub const COLOR_COUNT: usize = BLOCK_COLORS.len();

pub fn shape_at(index: usize) -> Option<&'static Shape> {
    SHAPES.get(index)
}

/// Maps a seed to a catalog index with a sine hash.
///
/// Always in `[0, SHAPE_COUNT)`, including for NaN or infinite seeds (the
/// float-to-int cast saturates and maps NaN to zero).
pub fn random_shape_index(seed: f64) -> usize {
    let hashed = (seed.sin() * 1e6).floor().abs() as u64;
    (hashed % SHAPE_COUNT as u64) as usize
}

pub fn color_for(index: usize) -> &'static str {
    BLOCK_COLORS[color_index_for(index)]
}

pub fn color_index_for(index: usize) -> usize {
    index % COLOR_COUNT
}
