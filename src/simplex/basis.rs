//! Spanning-tree basis of the transportation simplex.
//!
//! The bipartite network has one node per origin (`0..rows`) and one node per
//! destination (`rows..rows + cols`). A basis is a set of cells, i.e. edges of
//! that network, forming a spanning tree. The tree is kept as an arena of node
//! indices with parent arrays, so potentials and pivot cycles are found in
//! `O(rows + cols)` without linked nodes.

use std::collections::VecDeque;

use super::allocation::Cell;
use crate::domain::solver_service::{Result, SolverError};

/// Set of basic cells.
#[derive(Debug, Clone)]
pub struct Basis {
    rows: usize,
    cols: usize,
    cells: Vec<Cell>,
    member: Vec<bool>,
}

impl Basis {
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            cells: Vec::with_capacity(rows + cols - 1),
            member: vec![false; rows * cols],
        }
    }

    pub fn num_rows(&self) -> usize {
        self.rows
    }

    pub fn num_cols(&self) -> usize {
        self.cols
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// A spanning tree over `rows + cols` nodes has `rows + cols - 1` edges.
    pub fn is_complete(&self) -> bool {
        self.cells.len() == self.rows + self.cols - 1
    }

    pub fn contains(&self, c: Cell) -> bool {
        self.member[c.row * self.cols + c.col]
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Adds `c`, returns `false` if it was already basic.
    pub fn insert(&mut self, c: Cell) -> bool {
        let idx = c.row * self.cols + c.col;
        if self.member[idx] {
            return false;
        }
        self.member[idx] = true;
        self.cells.push(c);
        true
    }

    /// Swaps `leaving` out and `entering` in.
    pub fn exchange(&mut self, leaving: Cell, entering: Cell) {
        let pos = self.cells.iter().position(|&c| c == leaving);
        if let Some(pos) = pos {
            self.cells[pos] = entering;
            self.member[leaving.row * self.cols + leaving.col] = false;
            self.member[entering.row * self.cols + entering.col] = true;
        }
    }

    /// Builds the rooted tree view of this basis together with its potentials.
    pub fn tree(&self, costs: &[Vec<f64>]) -> Result<SpanningTree> {
        SpanningTree::build(self, costs)
    }
}

/// Dual potentials `u` (origins) and `v` (destinations).
#[derive(Debug, Clone, PartialEq)]
pub struct Potentials {
    pub u: Vec<f64>,
    pub v: Vec<f64>,
}

impl Potentials {
    /// `c_ij - u_i - v_j`
    pub fn reduced_cost(&self, costs: &[Vec<f64>], c: Cell) -> f64 {
        costs[c.row][c.col] - self.u[c.row] - self.v[c.col]
    }
}

/// Cells of the pivot cycle, split by the sign of their flow change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cycle {
    /// Cells gaining flow, the entering cell first
    pub plus: Vec<Cell>,
    /// Cells losing flow
    pub minus: Vec<Cell>,
}

/// Basis rooted at origin 0.
#[derive(Debug, Clone)]
pub struct SpanningTree {
    rows: usize,
    parent: Vec<usize>,
    parent_cell: Vec<Option<Cell>>,
    depth: Vec<usize>,
    potentials: Potentials,
}

impl SpanningTree {
    fn build(basis: &Basis, costs: &[Vec<f64>]) -> Result<Self> {
        let rows = basis.rows;
        let cols = basis.cols;
        let num_nodes = rows + cols;

        let mut adjacency: Vec<Vec<Cell>> = vec![Vec::new(); num_nodes];
        for &c in &basis.cells {
            adjacency[c.row].push(c);
            adjacency[rows + c.col].push(c);
        }

        let mut parent = vec![usize::MAX; num_nodes];
        let mut parent_cell = vec![None; num_nodes];
        let mut depth = vec![0; num_nodes];
        let mut visited = vec![false; num_nodes];
        let mut u = vec![0.0; rows];
        let mut v = vec![0.0; cols];

        let root = 0;
        visited[root] = true;
        parent[root] = root;
        let mut queue = VecDeque::from([root]);
        while let Some(node) = queue.pop_front() {
            for &c in &adjacency[node] {
                if parent_cell[node] == Some(c) {
                    continue;
                }
                let other = if node < rows { rows + c.col } else { c.row };
                if visited[other] {
                    return Err(SolverError::ExecutionFailed(format!(
                        "basis contains a cycle through cell {}",
                        c
                    )));
                }
                visited[other] = true;
                parent[other] = node;
                parent_cell[other] = Some(c);
                depth[other] = depth[node] + 1;
                // u_i + v_j = c_ij along every tree edge
                if node < rows {
                    v[c.col] = costs[c.row][c.col] - u[c.row];
                } else {
                    u[c.row] = costs[c.row][c.col] - v[c.col];
                }
                queue.push_back(other);
            }
        }

        if let Some(node) = visited.iter().position(|&seen| !seen) {
            return Err(SolverError::ExecutionFailed(format!(
                "basis does not span node {} of {}",
                node, num_nodes
            )));
        }

        Ok(Self {
            rows,
            parent,
            parent_cell,
            depth,
            potentials: Potentials { u, v },
        })
    }

    pub fn potentials(&self) -> &Potentials {
        &self.potentials
    }

    pub fn into_potentials(self) -> Potentials {
        self.potentials
    }

    /// Returns the unique cycle closed by adding the non-basic `entering` cell.
    ///
    /// Signs alternate along the cycle, starting with `+` at `entering`.
    pub fn cycle(&self, entering: Cell) -> Cycle {
        let mut a = entering.row;
        let mut b = self.rows + entering.col;
        let mut from_row = Vec::new();
        let mut from_col = Vec::new();

        while a != b {
            if self.depth[a] >= self.depth[b] {
                from_row.extend(self.parent_cell[a]);
                a = self.parent[a];
            } else {
                from_col.extend(self.parent_cell[b]);
                b = self.parent[b];
            }
        }

        // tree path from the destination node to the origin node of `entering`
        let path = from_col.into_iter().chain(from_row.into_iter().rev());

        let mut plus = vec![entering];
        let mut minus = Vec::new();
        for (k, c) in path.enumerate() {
            if k % 2 == 0 {
                minus.push(c);
            } else {
                plus.push(c);
            }
        }
        Cycle { plus, minus }
    }
}

/// Union-find over the nodes of the bipartite network.
#[derive(Clone, Copy)]
enum Component {
    /// The root element with the tree's depth.
    Root(usize),
    /// An inner node with the parent node.
    Node(usize),
}

/// Disjoint sets of network nodes, used to keep candidate bases acyclic.
pub struct Forest {
    rows: usize,
    comps: Vec<Component>,
}

impl Forest {
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            comps: vec![Component::Root(0); rows + cols],
        }
    }

    fn find_root(&self, u: usize) -> (usize, usize) {
        let mut v = u;
        loop {
            match self.comps[v] {
                Component::Node(parent) => v = parent,
                Component::Root(depth) => return (v, depth),
            }
        }
    }

    /// Whether `c` joins two different components.
    pub fn connects(&self, c: Cell) -> bool {
        self.find_root(c.row).0 != self.find_root(self.rows + c.col).0
    }

    /// Merges the components of both endpoints of `c`; returns `false` if
    /// they were already connected, i.e. `c` would close a cycle.
    pub fn union(&mut self, c: Cell) -> bool {
        let (uroot, udepth) = self.find_root(c.row);
        let (vroot, vdepth) = self.find_root(self.rows + c.col);
        if uroot == vroot {
            return false;
        }
        if udepth < vdepth {
            self.comps[uroot] = Component::Node(vroot);
        } else {
            self.comps[vroot] = Component::Node(uroot);
            if udepth == vdepth {
                self.comps[uroot] = Component::Root(udepth + 1);
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn basis_of(rows: usize, cols: usize, cells: &[(usize, usize)]) -> Basis {
        let mut basis = Basis::new(rows, cols);
        for &(i, j) in cells {
            assert!(basis.insert(Cell::new(i, j)));
        }
        basis
    }

    #[test]
    fn potentials_satisfy_basic_cells() {
        let costs = vec![vec![4.0, 6.0], vec![5.0, 3.0]];
        let basis = basis_of(2, 2, &[(0, 0), (1, 0), (1, 1)]);
        let tree = basis.tree(&costs).unwrap();
        let p = tree.potentials();
        assert_eq!(p.u[0], 0.0);
        for &c in basis.cells() {
            assert_eq!(p.reduced_cost(&costs, c), 0.0);
        }
        // u = [0, 1], v = [4, 2]
        assert_eq!(p.reduced_cost(&costs, Cell::new(0, 1)), 4.0);
    }

    #[test]
    fn cycle_alternates_signs() {
        let costs = vec![vec![1.0; 3]; 3];
        // staircase: (0,0) (0,1) (1,1) (1,2) (2,2)
        let basis = basis_of(3, 3, &[(0, 0), (0, 1), (1, 1), (1, 2), (2, 2)]);
        let tree = basis.tree(&costs).unwrap();
        let cycle = tree.cycle(Cell::new(2, 0));
        assert_eq!(cycle.plus, vec![Cell::new(2, 0), Cell::new(0, 1), Cell::new(1, 2)]);
        assert_eq!(cycle.minus, vec![Cell::new(0, 0), Cell::new(1, 1), Cell::new(2, 2)]);
    }

    #[test]
    fn short_cycle() {
        let costs = vec![vec![1.0; 2]; 2];
        let basis = basis_of(2, 2, &[(0, 0), (0, 1), (1, 1)]);
        let cycle = basis.tree(&costs).unwrap().cycle(Cell::new(1, 0));
        assert_eq!(cycle.plus, vec![Cell::new(1, 0), Cell::new(0, 1)]);
        assert_eq!(cycle.minus, vec![Cell::new(0, 0), Cell::new(1, 1)]);
    }

    #[test]
    fn rejects_non_spanning_basis() {
        let costs = vec![vec![1.0; 2]; 2];
        let basis = basis_of(2, 2, &[(0, 0), (1, 1)]);
        assert!(matches!(
            basis.tree(&costs),
            Err(SolverError::ExecutionFailed(_))
        ));
    }

    #[test]
    fn rejects_cyclic_basis() {
        let costs = vec![vec![1.0; 2]; 2];
        let basis = basis_of(2, 2, &[(0, 0), (0, 1), (1, 0), (1, 1)]);
        assert!(basis.tree(&costs).is_err());
    }

    #[test]
    fn exchange_keeps_membership() {
        let mut basis = basis_of(2, 2, &[(0, 0), (0, 1), (1, 1)]);
        basis.exchange(Cell::new(0, 0), Cell::new(1, 0));
        assert!(!basis.contains(Cell::new(0, 0)));
        assert!(basis.contains(Cell::new(1, 0)));
        assert_eq!(basis.len(), 3);
        assert!(basis.is_complete());
    }

    #[test]
    fn forest_detects_cycles() {
        let mut forest = Forest::new(2, 2);
        assert!(forest.union(Cell::new(0, 0)));
        assert!(forest.union(Cell::new(0, 1)));
        assert!(forest.union(Cell::new(1, 1)));
        assert!(!forest.connects(Cell::new(1, 0)));
        assert!(!forest.union(Cell::new(1, 0)));
    }
}
