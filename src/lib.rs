// Domain layer: Business logic and rules
pub mod domain;

// Native engine: balancing, initial basis, MODI pivots, optimality certificate
pub mod simplex;

// Application layer: Use cases and service orchestration
pub mod application;

// Infrastructure layer: External concerns (gRPC, server)
#[cfg(feature = "server")]
pub mod infrastructure;

// Solver adapters: Concrete implementations of SolverService
pub mod solver;

// Re-export commonly used types
pub use domain::{
    DummyNode, InitialMethod, PricingRule, SolutionStatus, SolverBackend, SolverConfig,
    SolverError, SolverService, SolverStatistics, TransportProblem, TransportSolution, EPSILON,
};

pub use application::GrpcTransportService;

pub use solver::TransportSimplexSolver;

#[cfg(feature = "server")]
pub use infrastructure::{init_logging, start_server, ServerConfig};

#[cfg(feature = "server")]
pub use solver::{HighsSolver, SolverFactory};

/// Solve `problem` with the native transportation simplex engine
///
/// The engine reports progress through the `log` facade; library callers
/// install their own logger to see it.
pub fn solve(problem: &TransportProblem) -> domain::Result<TransportSolution> {
    TransportSimplexSolver::new().solve(problem)
}
