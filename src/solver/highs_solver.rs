// HiGHS Solver Adapter
// Implements the SolverService interface for HiGHS
// This is an adapter pattern - translates the balanced transportation problem to a HiGHS LP

use crate::domain::{
    models::{SolverStatistics, TransportProblem, TransportSolution},
    solver_service::{Result, SolverError, SolverService},
    value_objects::SolutionStatus,
};
use crate::simplex::{assemble, balance, Allocation};
use std::time::Instant;

pub struct HighsSolver;

impl HighsSolver {
    pub fn new() -> Self {
        Self
    }
}

impl Default for HighsSolver {
    fn default() -> Self {
        Self::new()
    }
}

impl SolverService for HighsSolver {
    fn solve(&self, problem: &TransportProblem) -> Result<TransportSolution> {
        // Validate first
        self.validate(problem)?;

        let start_time = Instant::now();
        let balanced = balance(problem)?;
        let rows = balanced.num_rows();
        let cols = balanced.num_cols();

        // Use HiGHS RowProblem (add variables first, then constraints)
        use highs::{HighsModelStatus, RowProblem, Sense};

        let mut pb = RowProblem::default();

        // One column per shipment lane, row-major
        let mut vars = Vec::with_capacity(rows * cols);
        for row in &balanced.costs {
            for &cost in row {
                vars.push(pb.add_column(cost, 0..));
            }
        }

        // Supply rows
        for (i, &supply) in balanced.supply.iter().enumerate() {
            let terms: Vec<_> = (0..cols).map(|j| (vars[i * cols + j], 1.0)).collect();
            pb.add_row(supply..=supply, &terms);
        }

        // Demand rows
        for (j, &demand) in balanced.demand.iter().enumerate() {
            let terms: Vec<_> = (0..rows).map(|i| (vars[i * cols + j], 1.0)).collect();
            pb.add_row(demand..=demand, &terms);
        }

        let solved = pb.optimise(Sense::Minimise).solve();

        match solved.status() {
            HighsModelStatus::Optimal => {
                let solution_data = solved.get_solution();
                let values: Vec<Vec<f64>> = solution_data
                    .columns()
                    .chunks(cols)
                    .map(|chunk| chunk.to_vec())
                    .collect();
                let allocation = Allocation::from_rows(&values);

                let statistics = SolverStatistics {
                    solve_time_ms: start_time.elapsed().as_secs_f64() * 1000.0,
                    num_origins: problem.num_origins() as u32,
                    num_destinations: problem.num_destinations() as u32,
                    ..Default::default()
                };

                let mut solution = assemble(&balanced, &allocation, None, SolutionStatus::Optimal)
                    .with_statistics(statistics);
                if !problem.name.is_empty() {
                    let message = format!("{} for '{}'", solution.message, problem.name);
                    solution = solution.with_message(message);
                }
                Ok(solution)
            }
            status => Err(SolverError::ExecutionFailed(format!(
                "HiGHS solver returned status: {:?}",
                status
            ))),
        }
    }

    fn name(&self) -> &str {
        "HiGHS"
    }

    fn reports_potentials(&self) -> bool {
        false
    }
}
