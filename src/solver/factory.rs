use crate::domain::{
    models::TransportProblem, solver_service::SolverService, value_objects::SolverBackend,
};
use crate::solver::{HighsSolver, TransportSimplexSolver};
use std::sync::Arc;

/// Factory for creating solver instances based on configuration
pub struct SolverFactory;

impl SolverFactory {
    /// Create a solver based on the problem configuration, using `fallback`
    /// when the problem asks for `Auto`
    pub fn create_solver(
        problem: &TransportProblem,
        fallback: SolverBackend,
    ) -> Arc<dyn SolverService> {
        match problem.solver_config.backend {
            SolverBackend::Auto => Self::create_from_backend(fallback),
            backend => Self::create_from_backend(backend),
        }
    }

    /// Create a solver for a specific backend
    pub fn create_from_backend(backend: SolverBackend) -> Arc<dyn SolverService> {
        match backend {
            SolverBackend::Auto | SolverBackend::TransportSimplex => {
                Arc::new(TransportSimplexSolver::new())
            }
            SolverBackend::Highs => Arc::new(HighsSolver::new()),
        }
    }

    /// Get the default solver (native transportation simplex)
    pub fn default_solver() -> Arc<dyn SolverService> {
        Arc::new(TransportSimplexSolver::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::SolverConfig;

    #[test]
    fn auto_falls_back_to_server_default() {
        let problem = TransportProblem::new(vec![vec![1.0]], vec![1.0], vec![1.0]);
        assert_eq!(
            SolverFactory::create_solver(&problem, SolverBackend::Highs).name(),
            "HiGHS"
        );

        let problem = problem
            .with_config(SolverConfig::default().with_backend(SolverBackend::TransportSimplex));
        assert_eq!(
            SolverFactory::create_solver(&problem, SolverBackend::Highs).name(),
            "Transportation Simplex"
        );
    }
}
