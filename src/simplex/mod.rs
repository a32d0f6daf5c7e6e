// Native transportation simplex engine
//
// balance -> initial basic solution -> MODI pivots -> certificate -> result

pub mod allocation;
pub mod assembler;
pub mod balancer;
pub mod basis;
pub mod engine;
pub mod initial;
pub mod verifier;

pub use allocation::{Allocation, Cell};
pub use assembler::assemble;
pub use balancer::{balance, BalancedProblem};
pub use basis::{Basis, Potentials, SpanningTree};
pub use engine::{EngineOptions, EngineOutcome, Termination, TransportSimplex};
pub use initial::initial_solution;
