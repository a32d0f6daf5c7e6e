// Domain service interface for solving transportation problems
// Defines the contract that any solver implementation must follow (Dependency Inversion Principle)

use super::models::{TransportProblem, TransportSolution};

/// Error types for the solver service
#[derive(Debug, thiserror::Error)]
pub enum SolverError {
    #[error("Shape mismatch: {0}")]
    ShapeMismatch(String),

    #[error("Negative input: {0}")]
    NegativeInput(String),

    #[error("Non-finite input: {0}")]
    NonFiniteInput(String),

    #[error("Imbalanced input: total supply {supply} cannot be reconciled with total demand {demand}")]
    ImbalancedInput { supply: f64, demand: f64 },

    #[error("Cycle detected: no optimum reached after {iterations} iterations")]
    CycleDetected { iterations: u64 },

    #[error("Solver not available: {0}")]
    SolverNotAvailable(String),

    #[error("Solver execution failed: {0}")]
    ExecutionFailed(String),
}

impl SolverError {
    /// Whether the error is caused by the caller's input rather than the solver
    pub fn is_invalid_input(&self) -> bool {
        matches!(
            self,
            SolverError::ShapeMismatch(_)
                | SolverError::NegativeInput(_)
                | SolverError::NonFiniteInput(_)
                | SolverError::ImbalancedInput { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, SolverError>;

/// Domain service interface for transportation solvers
///
/// This trait defines the contract that all solver implementations must follow.
/// It allows us to swap solver backends without changing business logic (Open/Closed Principle).
pub trait SolverService: Send + Sync {
    /// Solve a transportation problem
    fn solve(&self, problem: &TransportProblem) -> Result<TransportSolution>;

    /// Validate a problem without solving it
    fn validate(&self, problem: &TransportProblem) -> Result<()> {
        validate_problem(problem)
    }

    /// Get the name of this solver backend
    fn name(&self) -> &str;

    /// Check if this solver reports dual potentials
    fn reports_potentials(&self) -> bool;
}

/// Checks shapes first, then finiteness, then signs.
pub fn validate_problem(problem: &TransportProblem) -> Result<()> {
    let rows = problem.num_origins();
    let cols = problem.num_destinations();

    let mut errors = Vec::new();

    if rows == 0 {
        errors.push("Supply must have at least one origin".to_string());
    }
    if cols == 0 {
        errors.push("Demand must have at least one destination".to_string());
    }
    if problem.costs.len() != rows {
        errors.push(format!(
            "Cost matrix has {} rows but supply has {} entries",
            problem.costs.len(),
            rows
        ));
    }
    for (i, row) in problem.costs.iter().enumerate() {
        if row.len() != cols {
            errors.push(format!(
                "Cost row {} has {} entries but demand has {} entries",
                i,
                row.len(),
                cols
            ));
        }
    }
    if !errors.is_empty() {
        return Err(SolverError::ShapeMismatch(errors.join("; ")));
    }

    let entries = || {
        let costs = problem.costs.iter().enumerate().flat_map(|(i, row)| {
            row.iter()
                .enumerate()
                .map(move |(j, &c)| (format!("cost[{}][{}]", i, j), c))
        });
        let supply = problem
            .supply
            .iter()
            .enumerate()
            .map(|(i, &s)| (format!("supply[{}]", i), s));
        let demand = problem
            .demand
            .iter()
            .enumerate()
            .map(|(j, &d)| (format!("demand[{}]", j), d));
        costs.chain(supply).chain(demand)
    };

    let non_finite: Vec<String> = entries()
        .filter(|(_, value)| !value.is_finite())
        .map(|(name, value)| format!("{} = {}", name, value))
        .collect();
    if !non_finite.is_empty() {
        return Err(SolverError::NonFiniteInput(non_finite.join("; ")));
    }

    let negative: Vec<String> = entries()
        .filter(|(_, value)| *value < 0.0)
        .map(|(name, value)| format!("{} = {}", name, value))
        .collect();
    if !negative.is_empty() {
        return Err(SolverError::NegativeInput(negative.join("; ")));
    }

    Ok(())
}
