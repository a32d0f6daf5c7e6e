// Native transportation simplex adapter
// Implements the SolverService interface with the MODI engine in `crate::simplex`

use std::time::{Duration, Instant};

use crate::domain::{
    models::{SolverStatistics, TransportProblem, TransportSolution},
    solver_service::{Result, SolverService},
    value_objects::SolutionStatus,
};
use crate::simplex::{
    assemble, balance, initial_solution, EngineOptions, Termination, TransportSimplex,
};

pub struct TransportSimplexSolver;

impl TransportSimplexSolver {
    pub fn new() -> Self {
        Self
    }
}

impl Default for TransportSimplexSolver {
    fn default() -> Self {
        Self::new()
    }
}

impl SolverService for TransportSimplexSolver {
    fn solve(&self, problem: &TransportProblem) -> Result<TransportSolution> {
        // Validate first
        self.validate(problem)?;

        let start_time = Instant::now();
        let config = &problem.solver_config;

        let balanced = balance(problem)?;
        let (allocation, basis) = initial_solution(&balanced, config.initial_method)?;
        let initial_cost = allocation.cost(&balanced.costs);

        let options = EngineOptions {
            pricing: config.pricing,
            iteration_limit: config.iteration_limit,
            time_limit: config
                .time_limit
                .and_then(|secs| Duration::try_from_secs_f64(secs).ok()),
        };
        let outcome = TransportSimplex::new(&balanced, allocation, basis, options).solve()?;

        let status = match outcome.termination {
            Termination::Optimal => SolutionStatus::Optimal,
            Termination::IterationLimit => SolutionStatus::IterationLimit,
            Termination::TimeLimit => SolutionStatus::TimeLimit,
        };

        let statistics = SolverStatistics {
            iterations: outcome.iterations,
            degenerate_pivots: outcome.degenerate_pivots,
            solve_time_ms: start_time.elapsed().as_secs_f64() * 1000.0,
            num_origins: problem.num_origins() as u32,
            num_destinations: problem.num_destinations() as u32,
            initial_cost,
            cost_trace: outcome.cost_trace,
        };

        let mut solution = assemble(
            &balanced,
            &outcome.allocation,
            Some(&outcome.potentials),
            status,
        )
        .with_statistics(statistics);

        if !problem.name.is_empty() {
            let message = format!("{} for '{}'", solution.message, problem.name);
            solution = solution.with_message(message);
        }
        if config.verbose {
            log::info!(
                "{}: cost {} after {} pivots ({} degenerate) in {:.3} ms",
                solution.message,
                solution.optimal_cost,
                solution.statistics.iterations,
                solution.statistics.degenerate_pivots,
                solution.statistics.solve_time_ms
            );
        }

        Ok(solution)
    }

    fn name(&self) -> &str {
        "Transportation Simplex"
    }

    fn reports_potentials(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{value_objects::InitialMethod, SolverConfig, SolverError};

    #[test]
    fn solves_balanced_problem() {
        let problem = TransportProblem::new(
            vec![vec![4.0, 6.0], vec![5.0, 3.0]],
            vec![20.0, 30.0],
            vec![25.0, 25.0],
        )
        .with_name("two by two");
        let solution = TransportSimplexSolver::new().solve(&problem).unwrap();
        assert_eq!(solution.status, SolutionStatus::Optimal);
        assert_eq!(solution.solution, vec![vec![20.0, 0.0], vec![5.0, 25.0]]);
        assert_eq!(solution.optimal_cost, 180.0);
        assert!(solution.is_optimal);
        assert!(solution.message.ends_with("for 'two by two'"));
        assert_eq!(solution.statistics.initial_cost, 180.0);
        assert_eq!(solution.statistics.num_origins, 2);
    }

    #[test]
    fn validation_runs_before_balancing() {
        let problem = TransportProblem::new(vec![vec![1.0, 2.0]], vec![1.0, 2.0], vec![3.0, 0.0]);
        assert!(matches!(
            TransportSimplexSolver::new().solve(&problem),
            Err(SolverError::ShapeMismatch(_))
        ));
    }

    #[test]
    fn reports_iteration_limit() {
        let problem = TransportProblem::new(
            vec![
                vec![19.0, 30.0, 50.0, 10.0],
                vec![70.0, 30.0, 40.0, 60.0],
                vec![40.0, 8.0, 70.0, 20.0],
            ],
            vec![7.0, 9.0, 18.0],
            vec![5.0, 8.0, 7.0, 14.0],
        )
        .with_config(
            SolverConfig::default()
                .with_initial_method(InitialMethod::NorthwestCorner)
                .with_iteration_limit(1),
        );
        let solution = TransportSimplexSolver::new().solve(&problem).unwrap();
        assert_eq!(solution.status, SolutionStatus::IterationLimit);
        assert_eq!(solution.statistics.iterations, 1);
        assert!(!solution.is_optimal);
        assert_eq!(solution.optimal_cost, 807.0);
    }

    #[test]
    fn ignores_invalid_time_limit() {
        let problem = TransportProblem::new(vec![vec![2.0]], vec![3.0], vec![3.0])
            .with_config(SolverConfig::default().with_time_limit(-1.0));
        let solution = TransportSimplexSolver::new().solve(&problem).unwrap();
        assert_eq!(solution.status, SolutionStatus::Optimal);
        assert_eq!(solution.optimal_cost, 6.0);
    }
}
