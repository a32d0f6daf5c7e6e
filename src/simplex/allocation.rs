use std::fmt;
use std::ops::{Index, IndexMut};

/// Coordinate of an edge of the bipartite network.
///
/// Ordering is row-major, which is the order used by every lowest-index
/// tie-break of the solver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Cell {
    pub row: usize,
    pub col: usize,
}

impl Cell {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Dense flow matrix, stored row-major.
#[derive(Debug, Clone, PartialEq)]
pub struct Allocation {
    rows: usize,
    cols: usize,
    values: Vec<f64>,
}

impl Allocation {
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            values: vec![0.0; rows * cols],
        }
    }

    pub fn from_rows(rows: &[Vec<f64>]) -> Self {
        let cols = rows.first().map_or(0, |r| r.len());
        let mut alloc = Self::zeros(rows.len(), cols);
        for (i, row) in rows.iter().enumerate() {
            for (j, &x) in row.iter().enumerate().take(cols) {
                alloc[Cell::new(i, j)] = x;
            }
        }
        alloc
    }

    pub fn num_rows(&self) -> usize {
        self.rows
    }

    pub fn num_cols(&self) -> usize {
        self.cols
    }

    pub fn row_sum(&self, i: usize) -> f64 {
        self.values[i * self.cols..(i + 1) * self.cols].iter().sum()
    }

    pub fn col_sum(&self, j: usize) -> f64 {
        (0..self.rows).map(|i| self.values[i * self.cols + j]).sum()
    }

    /// Iterates over all cells in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = Cell> + '_ {
        (0..self.rows).flat_map(move |i| (0..self.cols).map(move |j| Cell::new(i, j)))
    }

    /// Total cost `sum c_ij * x_ij`.
    pub fn cost(&self, costs: &[Vec<f64>]) -> f64 {
        self.cells().map(|c| costs[c.row][c.col] * self[c]).sum()
    }

    /// Copies the top-left `rows x cols` block as nested vectors.
    pub fn to_rows(&self, rows: usize, cols: usize) -> Vec<Vec<f64>> {
        (0..rows.min(self.rows))
            .map(|i| (0..cols.min(self.cols)).map(|j| self[Cell::new(i, j)]).collect())
            .collect()
    }
}

impl Index<Cell> for Allocation {
    type Output = f64;

    fn index(&self, c: Cell) -> &f64 {
        &self.values[c.row * self.cols + c.col]
    }
}

impl IndexMut<Cell> for Allocation {
    fn index_mut(&mut self, c: Cell) -> &mut f64 {
        &mut self.values[c.row * self.cols + c.col]
    }
}
