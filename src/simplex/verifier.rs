//! Independent optimality certificate for a transportation plan.
//!
//! Nothing here looks at the engine's basis: potentials are rebuilt from the
//! support of the allocation alone.

use std::collections::VecDeque;

use super::allocation::{Allocation, Cell};
use super::balancer::{cost_tolerance, flow_tolerance, BalancedProblem};
use crate::domain::value_objects::scaled_tolerance;

/// Certifies `allocation` as an optimal plan of a balanced problem.
pub fn verify(problem: &BalancedProblem, allocation: &Allocation) -> bool {
    feasible_within(
        &problem.supply,
        &problem.demand,
        allocation,
        problem.flow_tolerance,
    ) && slackness_within(
        &problem.costs,
        allocation,
        problem.flow_tolerance,
        problem.cost_tolerance,
    )
}

/// Supply, demand, non-negativity and complementary slackness.
///
/// Tolerances scale with total supply and demand and with the largest cost.
pub fn is_optimal(
    costs: &[Vec<f64>],
    supply: &[f64],
    demand: &[f64],
    allocation: &Allocation,
) -> bool {
    let flow_tol = flow_tolerance(supply, demand);
    feasible_within(supply, demand, allocation, flow_tol)
        && slackness_within(costs, allocation, flow_tol, cost_tolerance(costs))
}

/// Row sums match supply, column sums match demand, no negative flow.
pub fn is_feasible(supply: &[f64], demand: &[f64], allocation: &Allocation) -> bool {
    feasible_within(supply, demand, allocation, flow_tolerance(supply, demand))
}

fn feasible_within(supply: &[f64], demand: &[f64], allocation: &Allocation, tol: f64) -> bool {
    if allocation.num_rows() != supply.len() || allocation.num_cols() != demand.len() {
        return false;
    }
    let supply_ok = supply
        .iter()
        .enumerate()
        .all(|(i, &s)| (allocation.row_sum(i) - s).abs() <= tol);
    let demand_ok = demand
        .iter()
        .enumerate()
        .all(|(j, &d)| (allocation.col_sum(j) - d).abs() <= tol);
    let non_negative = allocation.cells().all(|c| allocation[c] >= -tol);
    supply_ok && demand_ok && non_negative
}

/// Dual feasibility of potentials derived from the support.
///
/// Each connected component of the support fixes its potentials up to one
/// free shift. Cells inside a component must price non-negatively as they
/// are; cells between components give difference constraints on the shifts,
/// which are consistent iff their constraint graph has no negative cycle.
pub fn satisfies_slackness(costs: &[Vec<f64>], allocation: &Allocation) -> bool {
    let shipped: f64 = allocation.cells().map(|c| allocation[c].abs()).sum();
    slackness_within(
        costs,
        allocation,
        scaled_tolerance(shipped),
        cost_tolerance(costs),
    )
}

fn slackness_within(
    costs: &[Vec<f64>],
    allocation: &Allocation,
    flow_tol: f64,
    cost_tol: f64,
) -> bool {
    let rows = allocation.num_rows();
    let cols = allocation.num_cols();
    if costs.len() != rows || costs.iter().any(|row| row.len() != cols) {
        return false;
    }
    let num_nodes = rows + cols;

    let mut adjacency: Vec<Vec<Cell>> = vec![Vec::new(); num_nodes];
    for c in allocation.cells().filter(|&c| allocation[c] > flow_tol) {
        adjacency[c.row].push(c);
        adjacency[rows + c.col].push(c);
    }

    // potentials per node, u for origins then v for destinations
    let mut potential = vec![0.0; num_nodes];
    let mut component = vec![usize::MAX; num_nodes];
    let mut num_components = 0;
    for root in 0..num_nodes {
        if component[root] != usize::MAX {
            continue;
        }
        component[root] = num_components;
        let mut queue = VecDeque::from([root]);
        while let Some(node) = queue.pop_front() {
            for &c in &adjacency[node] {
                let other = if node < rows { rows + c.col } else { c.row };
                if component[other] == usize::MAX {
                    component[other] = num_components;
                    potential[other] = costs[c.row][c.col] - potential[node];
                    queue.push_back(other);
                }
            }
        }
        num_components += 1;
    }

    let reduced = |c: Cell| costs[c.row][c.col] - potential[c.row] - potential[rows + c.col];

    // a support cycle with non-zero cost breaks u_i + v_j = c_ij
    let support_priced = allocation
        .cells()
        .filter(|&c| allocation[c] > flow_tol)
        .all(|c| reduced(c).abs() <= cost_tol);
    if !support_priced {
        return false;
    }

    // shift_a - shift_b <= reduced + cost_tol for a zero cell with its origin
    // in component a and its destination in component b
    let mut constraints = Vec::new();
    for c in allocation.cells().filter(|&c| allocation[c] <= flow_tol) {
        let a = component[c.row];
        let b = component[rows + c.col];
        let r = reduced(c);
        if a == b {
            if r < -cost_tol {
                return false;
            }
        } else {
            constraints.push((b, a, r + cost_tol));
        }
    }

    // Bellman-Ford from a virtual source connected to every component
    let mut shift = vec![0.0; num_components];
    for _ in 0..num_components {
        let mut changed = false;
        for &(from, to, w) in &constraints {
            if shift[from] + w < shift[to] {
                shift[to] = shift[from] + w;
                changed = true;
            }
        }
        if !changed {
            return true;
        }
    }
    false
}
