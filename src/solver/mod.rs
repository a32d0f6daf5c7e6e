// Solver adapters module

pub mod transport_simplex_solver;

#[cfg(feature = "server")]
pub mod factory;
#[cfg(feature = "server")]
pub mod highs_solver;

pub use transport_simplex_solver::TransportSimplexSolver;

#[cfg(feature = "server")]
pub use factory::SolverFactory;
#[cfg(feature = "server")]
pub use highs_solver::HighsSolver;
