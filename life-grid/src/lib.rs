#![deny(clippy::all)]
#![forbid(unsafe_code)]

//! Fixed-size, double-buffered Game of Life grid.
//!
//! The grid owns both the authoritative cell matrix and the scratch matrix
//! used while computing the next generation. Nothing outside this crate gets a
//! reference into either matrix: callers work with [`Loc`] coordinate pairs.

use std::error::Error;
use std::fmt;
use std::ops::{Index, IndexMut};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Cell {
    pub alive: bool,
}

impl Cell {
    pub const DEAD: Cell = Cell { alive: false };
    pub const ALIVE: Cell = Cell { alive: true };

    pub fn toggle(&mut self) {
        self.alive = !self.alive;
    }

    /// The state this cell takes in the next generation, given how many of its
    /// neighbors are alive now.
    pub fn next(&self, live_neighbors: u32) -> Cell {
        let alive = if self.alive {
            (2..=3).contains(&live_neighbors)
        } else {
            live_neighbors == 3
        };
        Cell { alive }
    }
}

/// Column/row coordinate of a cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Loc {
    pub col: u32,
    pub row: u32,
}

impl Loc {
    pub fn new(col: u32, row: u32) -> Self {
        Self { col, row }
    }

    pub fn grid_index(&self, size: GridSize) -> Option<usize> {
        if size.contains(*self) {
            Some(self.row as usize * size.width as usize + self.col as usize)
        } else {
            None
        }
    }
}

/// Grid dimensions in cells.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GridSize {
    pub width: u32,
    pub height: u32,
}

impl GridSize {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Number of whole `cell_size` squares that fit in a pixel area, plus the
    /// leftover pixel rows at the bottom (`pixel_height % cell_size`).
    ///
    /// The panel layout relies on the remainder: whatever the grid cannot use
    /// vertically is handed to the control panel.
    pub fn fit(pixel_width: u32, pixel_height: u32, cell_size: u32) -> (GridSize, u32) {
        assert!(cell_size > 0);
        let size = GridSize::new(pixel_width / cell_size, pixel_height / cell_size);
        (size, pixel_height % cell_size)
    }

    pub fn num_cells(&self) -> usize {
        self.width as usize * self.height as usize
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub fn contains(&self, loc: Loc) -> bool {
        loc.col < self.width && loc.row < self.height
    }
}

/// Position in window pixels. May lie outside the grid, or be negative.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PixelPos {
    pub x: i32,
    pub y: i32,
}

impl PixelPos {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// A cell coordinate was used that does not lie inside the grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct IndexOutOfRange {
    pub loc: Loc,
    pub size: GridSize,
}

impl fmt::Display for IndexOutOfRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "cell ({}, {}) is out of range for a {}x{} grid",
            self.loc.col, self.loc.row, self.size.width, self.size.height
        )
    }
}

impl Error for IndexOutOfRange {}

#[derive(Clone, Debug)]
pub struct LifeGrid {
    size: GridSize,
    cell_size: u32,
    generation: u64,
    cells: GridCells,
    next_cells: GridCells,
}

impl LifeGrid {
    pub fn new(size: GridSize, cell_size: u32) -> Self {
        assert!(!size.is_empty() && cell_size > 0);
        Self {
            size,
            cell_size,
            generation: 0,
            cells: GridCells::new(size),
            next_cells: GridCells::new(size),
        }
    }

    /// Sizes an all-dead grid to fill the pixel area and returns it together
    /// with the pixel rows left over below the last full row of cells.
    pub fn initialize(pixel_width: u32, pixel_height: u32, cell_size: u32) -> (Self, u32) {
        let (size, remainder) = GridSize::fit(pixel_width, pixel_height, cell_size);
        (Self::new(size, cell_size), remainder)
    }

    pub fn size(&self) -> GridSize {
        self.size
    }

    pub fn cell_size(&self) -> u32 {
        self.cell_size
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn num_cells(&self) -> usize {
        self.cells.num_cells()
    }

    /// Cells in row-major order.
    pub fn cells_iter(&self) -> impl DoubleEndedIterator<Item = &Cell> + Clone {
        self.cells.cells_iter()
    }

    pub fn live_count(&self) -> usize {
        self.cells_iter().filter(|cell| cell.alive).count()
    }

    pub fn cell(&self, loc: Loc) -> Option<&Cell> {
        self.cells.get(loc)
    }

    pub fn is_alive(&self, loc: Loc) -> bool {
        self[loc].alive
    }

    /// Flips a cell. Panics if `loc` is outside the grid; pointer positions
    /// must go through [`LifeGrid::resolve_coordinate`] first.
    pub fn toggle(&mut self, loc: Loc) {
        self[loc].toggle();
    }

    pub fn try_toggle(&mut self, loc: Loc) -> Result<(), IndexOutOfRange> {
        self.cell_mut(loc).map(Cell::toggle)
    }

    pub fn set_alive(&mut self, loc: Loc, alive: bool) -> Result<(), IndexOutOfRange> {
        self.cell_mut(loc).map(|cell| cell.alive = alive)
    }

    fn cell_mut(&mut self, loc: Loc) -> Result<&mut Cell, IndexOutOfRange> {
        let size = self.size;
        self.cells
            .get_mut(loc)
            .ok_or(IndexOutOfRange { loc, size })
    }

    /// Maps a pixel position to the cell under it. Positions outside the grid
    /// area, including negative ones, are clamped to the nearest edge cell, so
    /// the result is always a valid index.
    pub fn resolve_coordinate(&self, pixel: PixelPos) -> Loc {
        Loc::new(
            Self::clamp_axis(pixel.x, self.cell_size, self.size.width),
            Self::clamp_axis(pixel.y, self.cell_size, self.size.height),
        )
    }

    fn clamp_axis(pixel: i32, cell_size: u32, count: u32) -> u32 {
        let index = i64::from(pixel).div_euclid(i64::from(cell_size));
        index.clamp(0, i64::from(count) - 1) as u32
    }

    /// Top-left pixel of a cell.
    pub fn pixel_origin(&self, loc: Loc) -> PixelPos {
        PixelPos::new(
            (loc.col * self.cell_size) as i32,
            (loc.row * self.cell_size) as i32,
        )
    }

    pub fn pixel_width(&self) -> u32 {
        self.size.width * self.cell_size
    }

    /// Pixel height covered by whole rows of cells.
    pub fn pixel_height(&self) -> u32 {
        self.size.height * self.cell_size
    }

    /// Whether a pixel lies over a cell rather than outside the grid area.
    pub fn covers_pixel(&self, pixel: PixelPos) -> bool {
        pixel.x >= 0
            && pixel.y >= 0
            && (pixel.x as u32) < self.pixel_width()
            && (pixel.y as u32) < self.pixel_height()
    }

    /// Computes one generation. Every neighbor count is taken from the
    /// pre-advance matrix; results go to the scratch matrix, which is then
    /// copied back in full.
    pub fn advance(&mut self) {
        for row in 0..self.size.height {
            for col in 0..self.size.width {
                self.advance_cell(Loc::new(col, row));
            }
        }
        self.cells.copy_from(&self.next_cells);
        self.generation += 1;
    }

    fn advance_cell(&mut self, loc: Loc) {
        let live_neighbors = Neighborhood::new(&self.cells, loc).num_live_neighbors();
        self.next_cells[loc] = self.cells[loc].next(live_neighbors);
    }
}

impl Index<Loc> for LifeGrid {
    type Output = Cell;

    fn index(&self, loc: Loc) -> &Self::Output {
        &self.cells[loc]
    }
}

impl IndexMut<Loc> for LifeGrid {
    fn index_mut(&mut self, loc: Loc) -> &mut Self::Output {
        &mut self.cells[loc]
    }
}

#[derive(Clone, Debug)]
struct GridCells {
    cells: Vec<Cell>,
    size: GridSize,
}

impl GridCells {
    fn new(size: GridSize) -> Self {
        Self {
            cells: vec![Cell::DEAD; size.num_cells()],
            size,
        }
    }

    fn num_cells(&self) -> usize {
        self.cells.len()
    }

    fn cells_iter(&self) -> impl DoubleEndedIterator<Item = &Cell> + Clone {
        self.cells.iter()
    }

    fn get(&self, loc: Loc) -> Option<&Cell> {
        loc.grid_index(self.size).map(|index| &self.cells[index])
    }

    fn get_mut(&mut self, loc: Loc) -> Option<&mut Cell> {
        loc.grid_index(self.size).map(|index| &mut self.cells[index])
    }

    fn copy_from(&mut self, source: &Self) {
        self.cells.copy_from_slice(&source.cells);
    }

    fn out_of_range(&self, loc: Loc) -> IndexOutOfRange {
        IndexOutOfRange {
            loc,
            size: self.size,
        }
    }
}

impl Index<Loc> for GridCells {
    type Output = Cell;

    fn index(&self, loc: Loc) -> &Self::Output {
        match loc.grid_index(self.size) {
            Some(index) => &self.cells[index],
            None => panic!("{}", self.out_of_range(loc)),
        }
    }
}

impl IndexMut<Loc> for GridCells {
    fn index_mut(&mut self, loc: Loc) -> &mut Self::Output {
        match loc.grid_index(self.size) {
            Some(index) => &mut self.cells[index],
            None => panic!("{}", self.out_of_range(loc)),
        }
    }
}

/// The up-to-eight in-bounds neighbors of a cell. Edges do not wrap.
struct Neighborhood<'a> {
    cells: &'a GridCells,
    rows: [Option<u32>; 3],
    cols: [Option<u32>; 3],
}

impl<'a> Neighborhood<'a> {
    fn new(cells: &'a GridCells, center: Loc) -> Self {
        let (row_above, row_below) = Self::adjacent_indexes(center.row, cells.size.height);
        let (col_left, col_right) = Self::adjacent_indexes(center.col, cells.size.width);
        Self {
            cells,
            rows: [row_above, Some(center.row), row_below],
            cols: [col_left, Some(center.col), col_right],
        }
    }

    fn num_live_neighbors(&self) -> u32 {
        let mut result = 0;
        self.for_neighbor_cells(|neighbor| {
            if neighbor.alive {
                result += 1;
            }
        });
        result
    }

    fn for_neighbor_cells<F>(&self, mut f: F)
    where
        F: FnMut(&Cell),
    {
        self.for_cell(0, 0, &mut f);
        self.for_cell(0, 1, &mut f);
        self.for_cell(0, 2, &mut f);

        self.for_cell(1, 0, &mut f);
        self.for_cell(1, 2, &mut f);

        self.for_cell(2, 0, &mut f);
        self.for_cell(2, 1, &mut f);
        self.for_cell(2, 2, &mut f);
    }

    fn for_cell<F>(&self, row: usize, col: usize, f: &mut F)
    where
        F: FnMut(&Cell),
    {
        if let (Some(row), Some(col)) = (self.rows[row], self.cols[col]) {
            f(&self.cells[Loc::new(col, row)]);
        }
    }

    fn adjacent_indexes(index: u32, max: u32) -> (Option<u32>, Option<u32>) {
        let after = index + 1;
        (index.checked_sub(1), (after < max).then_some(after))
    }
}
