//! Transportation simplex (MODI / stepping-stone) iterations.

use std::time::{Duration, Instant};

use super::allocation::{Allocation, Cell};
use super::balancer::BalancedProblem;
use super::basis::{Basis, Potentials, SpanningTree};
use crate::domain::{
    solver_service::{Result, SolverError},
    value_objects::PricingRule,
};

/// Caller-controlled knobs of the pivot loop.
#[derive(Debug, Clone, Default)]
pub struct EngineOptions {
    pub pricing: PricingRule,
    pub iteration_limit: Option<u64>,
    pub time_limit: Option<Duration>,
}

/// Why the pivot loop stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    /// No non-basic cell has a negative reduced cost.
    Optimal,
    IterationLimit,
    TimeLimit,
}

#[derive(Debug, Clone)]
pub struct EngineOutcome {
    pub allocation: Allocation,
    pub basis: Basis,
    /// Potentials of the final basis
    pub potentials: Potentials,
    pub termination: Termination,
    pub iterations: u64,
    pub degenerate_pivots: u64,
    /// Cost before the first pivot followed by the cost after each pivot
    pub cost_trace: Vec<f64>,
}

/// Pivots a basic feasible solution of a balanced problem to optimality.
pub struct TransportSimplex<'a> {
    problem: &'a BalancedProblem,
    allocation: Allocation,
    basis: Basis,
    options: EngineOptions,
    /// Pivots allowed before the loop is declared cycling
    pivot_bound: u64,
    iterations: u64,
    degenerate_pivots: u64,
    cost_trace: Vec<f64>,
}

impl<'a> TransportSimplex<'a> {
    pub fn new(
        problem: &'a BalancedProblem,
        allocation: Allocation,
        basis: Basis,
        options: EngineOptions,
    ) -> Self {
        Self {
            problem,
            allocation,
            basis,
            options,
            pivot_bound: (problem.num_rows() * problem.num_cols()) as u64,
            iterations: 0,
            degenerate_pivots: 0,
            cost_trace: Vec::new(),
        }
    }

    #[cfg(test)]
    fn with_pivot_bound(mut self, bound: u64) -> Self {
        self.pivot_bound = bound;
        self
    }

    /// Runs the pivot loop.
    ///
    /// Fails with `CycleDetected` after `rows * cols` pivots without reaching
    /// optimality.
    pub fn solve(mut self) -> Result<EngineOutcome> {
        let start = Instant::now();
        let problem = self.problem;
        let costs = &problem.costs;
        self.cost_trace.push(self.allocation.cost(costs));

        let (termination, tree) = loop {
            let tree = self.basis.tree(costs)?;
            let Some((entering, reduced)) = self.find_entering(tree.potentials()) else {
                break (Termination::Optimal, tree);
            };

            if self
                .options
                .iteration_limit
                .map_or(false, |limit| self.iterations >= limit)
            {
                log::warn!("iteration limit reached after {} pivots", self.iterations);
                break (Termination::IterationLimit, tree);
            }
            if self
                .options
                .time_limit
                .map_or(false, |limit| start.elapsed() >= limit)
            {
                log::warn!("time limit reached after {} pivots", self.iterations);
                break (Termination::TimeLimit, tree);
            }
            if self.iterations >= self.pivot_bound {
                return Err(SolverError::CycleDetected {
                    iterations: self.iterations,
                });
            }

            self.pivot(&tree, entering, reduced);
        };

        log::info!(
            "transportation simplex stopped ({:?}) after {} pivots, {} degenerate, cost {}",
            termination,
            self.iterations,
            self.degenerate_pivots,
            self.cost_trace.last().copied().unwrap_or_default()
        );

        Ok(EngineOutcome {
            allocation: self.allocation,
            basis: self.basis,
            potentials: tree.into_potentials(),
            termination,
            iterations: self.iterations,
            degenerate_pivots: self.degenerate_pivots,
            cost_trace: self.cost_trace,
        })
    }

    /// Non-basic cell with a reduced cost below the cost tolerance, chosen
    /// by the pricing rule. Row-major scanning makes the lowest index win ties.
    fn find_entering(&self, potentials: &Potentials) -> Option<(Cell, f64)> {
        let costs = &self.problem.costs;
        let tolerance = self.problem.cost_tolerance;
        let mut best: Option<(Cell, f64)> = None;
        for c in self.allocation.cells() {
            if self.basis.contains(c) {
                continue;
            }
            let reduced = potentials.reduced_cost(costs, c);
            if reduced >= -tolerance {
                continue;
            }
            match self.options.pricing {
                PricingRule::LowestIndex => return Some((c, reduced)),
                PricingRule::MostNegative => {
                    if best.map_or(true, |(_, r)| reduced < r) {
                        best = Some((c, reduced));
                    }
                }
            }
        }
        best
    }

    fn pivot(&mut self, tree: &SpanningTree, entering: Cell, reduced: f64) {
        let tolerance = self.problem.flow_tolerance;
        let cycle = tree.cycle(entering);

        // the cycle through a tree always has at least two '-' cells
        let Some((leaving, theta)) = cycle
            .minus
            .iter()
            .map(|&c| (c, self.allocation[c]))
            .min_by(|a, b| a.1.total_cmp(&b.1).then(a.0.cmp(&b.0)))
        else {
            return;
        };
        let theta = theta.max(0.0);

        for &c in &cycle.plus {
            self.allocation[c] += theta;
        }
        for &c in &cycle.minus {
            let x = &mut self.allocation[c];
            *x -= theta;
            if x.abs() <= tolerance {
                *x = 0.0;
            }
        }
        self.allocation[leaving] = 0.0;
        self.basis.exchange(leaving, entering);

        self.iterations += 1;
        if theta <= tolerance {
            self.degenerate_pivots += 1;
        }
        let cost = self.allocation.cost(&self.problem.costs);
        self.cost_trace.push(cost);

        log::debug!(
            "pivot {}: {} enters (reduced cost {}), {} leaves, theta {}, cost {}",
            self.iterations,
            entering,
            reduced,
            leaving,
            theta,
            cost
        );
    }
}
