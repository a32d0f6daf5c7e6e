//! Starting basic feasible solutions.

use super::allocation::{Allocation, Cell};
use super::balancer::BalancedProblem;
use super::basis::{Basis, Forest};
use crate::domain::{
    solver_service::{Result, SolverError},
    value_objects::InitialMethod,
};

/// Builds an allocation and a complete spanning-tree basis for `problem`.
pub fn initial_solution(
    problem: &BalancedProblem,
    method: InitialMethod,
) -> Result<(Allocation, Basis)> {
    let (allocation, cells) = match method {
        InitialMethod::Vogel => vogel(problem),
        InitialMethod::NorthwestCorner => northwest_corner(problem),
    };

    let rows = problem.num_rows();
    let cols = problem.num_cols();
    let mut basis = Basis::new(rows, cols);
    let mut forest = Forest::new(rows, cols);
    for c in cells {
        if !forest.union(c) || !basis.insert(c) {
            return Err(SolverError::ExecutionFailed(format!(
                "initial allocation closes a cycle at cell {}",
                c
            )));
        }
    }

    if !basis.is_complete() {
        log::debug!(
            "degenerate start: {} of {} basic cells",
            basis.len(),
            rows + cols - 1
        );
        complete_degenerate(problem, &mut basis, &mut forest);
    }

    Ok((allocation, basis))
}

/// Adds zero-valued cells joining different components, cheapest first.
fn complete_degenerate(problem: &BalancedProblem, basis: &mut Basis, forest: &mut Forest) {
    let mut candidates: Vec<Cell> = (0..problem.num_rows())
        .flat_map(|i| (0..problem.num_cols()).map(move |j| Cell::new(i, j)))
        .filter(|&c| !basis.contains(c))
        .collect();
    candidates.sort_by(|a, b| {
        problem
            .cost(a.row, a.col)
            .total_cmp(&problem.cost(b.row, b.col))
            .then(a.cmp(b))
    });

    for c in candidates {
        if basis.is_complete() {
            break;
        }
        if forest.union(c) {
            basis.insert(c);
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Line {
    Row(usize),
    Col(usize),
}

/// Candidate line of a Vogel step: penalty, cheapest cost and the line itself.
#[derive(Debug, Clone, Copy)]
struct Candidate {
    penalty: f64,
    min_cost: f64,
    line: Line,
}

impl Candidate {
    /// Larger penalty wins, then smaller cost, then rows before columns,
    /// then lower index.
    fn beats(&self, other: &Candidate) -> bool {
        if self.penalty != other.penalty {
            return self.penalty > other.penalty;
        }
        if self.min_cost != other.min_cost {
            return self.min_cost < other.min_cost;
        }
        match (self.line, other.line) {
            (Line::Row(a), Line::Row(b)) | (Line::Col(a), Line::Col(b)) => a < b,
            (Line::Row(_), Line::Col(_)) => true,
            (Line::Col(_), Line::Row(_)) => false,
        }
    }
}

/// Penalty and cheapest entry of `costs` (lowest index on ties).
fn penalty(costs: impl Iterator<Item = (usize, f64)>) -> Option<(f64, f64, usize)> {
    let mut first: Option<(f64, usize)> = None;
    let mut second: Option<f64> = None;
    for (k, c) in costs {
        match first {
            None => first = Some((c, k)),
            Some((best, _)) if c < best => {
                second = Some(best);
                first = Some((c, k));
            }
            Some(_) => {
                if second.map_or(true, |s| c < s) {
                    second = Some(c);
                }
            }
        }
    }
    first.map(|(best, k)| match second {
        Some(s) => (s - best, best, k),
        None => (best, best, k),
    })
}

/// Vogel's approximation method.
///
/// Every step deactivates exactly one line. When a row and a column deplete
/// together the other line stays active with nothing left, so it later
/// receives a zero-valued basic cell.
fn vogel(problem: &BalancedProblem) -> (Allocation, Vec<Cell>) {
    let rows = problem.num_rows();
    let cols = problem.num_cols();
    let mut remaining_supply = problem.supply.clone();
    let mut remaining_demand = problem.demand.clone();
    let mut row_active = vec![true; rows];
    let mut col_active = vec![true; cols];
    let mut active_rows = rows;
    let mut active_cols = cols;

    let mut allocation = Allocation::zeros(rows, cols);
    let mut cells = Vec::with_capacity(rows + cols - 1);

    while active_rows > 0 && active_cols > 0 {
        let mut best: Option<(Candidate, usize)> = None;

        for i in (0..rows).filter(|&i| row_active[i]) {
            let line = (0..cols)
                .filter(|&j| col_active[j])
                .map(|j| (j, problem.cost(i, j)));
            if let Some((penalty, min_cost, j)) = penalty(line) {
                let cand = Candidate {
                    penalty,
                    min_cost,
                    line: Line::Row(i),
                };
                if best.as_ref().map_or(true, |(b, _)| cand.beats(b)) {
                    best = Some((cand, j));
                }
            }
        }
        for j in (0..cols).filter(|&j| col_active[j]) {
            let line = (0..rows)
                .filter(|&i| row_active[i])
                .map(|i| (i, problem.cost(i, j)));
            if let Some((penalty, min_cost, i)) = penalty(line) {
                let cand = Candidate {
                    penalty,
                    min_cost,
                    line: Line::Col(j),
                };
                if best.as_ref().map_or(true, |(b, _)| cand.beats(b)) {
                    best = Some((cand, i));
                }
            }
        }

        let Some((cand, k)) = best else {
            break;
        };
        let cell = match cand.line {
            Line::Row(i) => Cell::new(i, k),
            Line::Col(j) => Cell::new(k, j),
        };

        let amount = remaining_supply[cell.row].min(remaining_demand[cell.col]);
        allocation[cell] = amount;
        remaining_supply[cell.row] -= amount;
        remaining_demand[cell.col] -= amount;
        cells.push(cell);

        let row_done = remaining_supply[cell.row] <= problem.flow_tolerance;
        let col_done = remaining_demand[cell.col] <= problem.flow_tolerance;
        let close_row = if row_done && col_done {
            !(active_rows == 1 && active_cols > 1)
        } else {
            row_done
        };

        if close_row {
            row_active[cell.row] = false;
            active_rows -= 1;
            if col_done && active_rows > 0 {
                remaining_demand[cell.col] = 0.0;
            }
        } else {
            col_active[cell.col] = false;
            active_cols -= 1;
            if row_done {
                remaining_supply[cell.row] = 0.0;
            }
        }
    }

    (allocation, cells)
}

/// Northwest-corner rule: walk from the top-left cell, moving down when the
/// current origin is exhausted and right otherwise.
fn northwest_corner(problem: &BalancedProblem) -> (Allocation, Vec<Cell>) {
    let rows = problem.num_rows();
    let cols = problem.num_cols();
    let mut remaining_supply = problem.supply.clone();
    let mut remaining_demand = problem.demand.clone();

    let mut allocation = Allocation::zeros(rows, cols);
    let mut cells = Vec::with_capacity(rows + cols - 1);

    let (mut i, mut j) = (0, 0);
    while i < rows && j < cols {
        let cell = Cell::new(i, j);
        let amount = remaining_supply[i].min(remaining_demand[j]).max(0.0);
        allocation[cell] = amount;
        remaining_supply[i] -= amount;
        remaining_demand[j] -= amount;
        cells.push(cell);

        if remaining_supply[i] <= problem.flow_tolerance && i + 1 < rows {
            i += 1;
        } else {
            j += 1;
        }
    }

    (allocation, cells)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::TransportProblem;
    use crate::domain::value_objects::EPSILON;
    use crate::simplex::balancer::balance;

    fn balanced(costs: Vec<Vec<f64>>, supply: Vec<f64>, demand: Vec<f64>) -> BalancedProblem {
        balance(&TransportProblem::new(costs, supply, demand)).unwrap()
    }

    fn assert_feasible(problem: &BalancedProblem, alloc: &Allocation) {
        for (i, &s) in problem.supply.iter().enumerate() {
            assert!((alloc.row_sum(i) - s).abs() < EPSILON, "row {}", i);
        }
        for (j, &d) in problem.demand.iter().enumerate() {
            assert!((alloc.col_sum(j) - d).abs() < EPSILON, "col {}", j);
        }
    }

    #[test]
    fn penalty_of_line() {
        let line = [3.0, 1.0, 2.0, 1.0].into_iter().enumerate();
        assert_eq!(penalty(line), Some((0.0, 1.0, 1)));
        let line = [4.0, 7.0].into_iter().enumerate();
        assert_eq!(penalty(line), Some((3.0, 4.0, 0)));
        let single = [5.0].into_iter().enumerate();
        assert_eq!(penalty(single), Some((5.0, 5.0, 0)));
    }

    #[test]
    fn vogel_on_two_by_two() {
        let p = balanced(
            vec![vec![4.0, 6.0], vec![5.0, 3.0]],
            vec![20.0, 30.0],
            vec![25.0, 25.0],
        );
        let (alloc, basis) = initial_solution(&p, InitialMethod::Vogel).unwrap();
        assert!(basis.is_complete());
        assert_feasible(&p, &alloc);
        assert_eq!(alloc.to_rows(2, 2), vec![vec![20.0, 0.0], vec![5.0, 25.0]]);
    }

    #[test]
    fn vogel_textbook_instance() {
        let p = balanced(
            vec![
                vec![19.0, 30.0, 50.0, 10.0],
                vec![70.0, 30.0, 40.0, 60.0],
                vec![40.0, 8.0, 70.0, 20.0],
            ],
            vec![7.0, 9.0, 18.0],
            vec![5.0, 8.0, 7.0, 14.0],
        );
        let (alloc, basis) = initial_solution(&p, InitialMethod::Vogel).unwrap();
        assert!(basis.is_complete());
        assert_feasible(&p, &alloc);
        assert_eq!(alloc.cost(&p.costs), 779.0);
    }

    #[test]
    fn northwest_corner_staircase() {
        let p = balanced(
            vec![vec![1.0; 3]; 3],
            vec![10.0, 10.0, 10.0],
            vec![5.0, 15.0, 10.0],
        );
        let (alloc, basis) = initial_solution(&p, InitialMethod::NorthwestCorner).unwrap();
        assert!(basis.is_complete());
        assert_feasible(&p, &alloc);
        assert_eq!(
            alloc.to_rows(3, 3),
            vec![
                vec![5.0, 5.0, 0.0],
                vec![0.0, 10.0, 0.0],
                vec![0.0, 0.0, 10.0]
            ]
        );
    }

    #[test]
    fn simultaneous_depletion_keeps_basis_spanning() {
        // every step depletes a row and a column together
        let p = balanced(
            vec![vec![1.0, 5.0, 9.0], vec![5.0, 1.0, 9.0], vec![9.0, 9.0, 1.0]],
            vec![10.0, 20.0, 30.0],
            vec![10.0, 20.0, 30.0],
        );
        for method in [InitialMethod::Vogel, InitialMethod::NorthwestCorner] {
            let (alloc, basis) = initial_solution(&p, method).unwrap();
            assert_eq!(basis.len(), 5, "{:?}", method);
            assert_feasible(&p, &alloc);
            assert!(basis.tree(&p.costs).is_ok());
        }
    }

    #[test]
    fn zero_supply_and_demand() {
        let p = balanced(vec![vec![2.0, 3.0], vec![1.0, 4.0]], vec![0.0, 0.0], vec![0.0, 0.0]);
        let (alloc, basis) = initial_solution(&p, InitialMethod::Vogel).unwrap();
        assert!(basis.is_complete());
        assert!(basis.tree(&p.costs).is_ok());
        assert_eq!(alloc.cost(&p.costs), 0.0);
    }
}
