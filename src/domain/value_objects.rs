// Domain value objects representing core business concepts

use std::fmt;
use std::str::FromStr;

/// Tolerance shared by balancing, feasibility and optimality checks
pub const EPSILON: f64 = 1e-9;

/// `EPSILON` relative to the magnitude of the quantities being compared,
/// never below `EPSILON` itself
pub fn scaled_tolerance(magnitude: f64) -> f64 {
    EPSILON * magnitude.abs().max(1.0)
}

/// Status of the transportation solution
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolutionStatus {
    /// Simplex terminated with no improving direction left
    Optimal,
    /// Feasible plan whose optimality was not established
    Feasible,
    /// Caller-supplied iteration limit reached
    IterationLimit,
    /// Caller-supplied time limit reached
    TimeLimit,
}

impl fmt::Display for SolutionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SolutionStatus::Optimal => write!(f, "Optimal"),
            SolutionStatus::Feasible => write!(f, "Feasible"),
            SolutionStatus::IterationLimit => write!(f, "Iteration Limit Reached"),
            SolutionStatus::TimeLimit => write!(f, "Time Limit Reached"),
        }
    }
}

/// Solver backend to use
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolverBackend {
    /// Let the server pick its default backend
    Auto,
    /// Native transportation simplex (MODI) engine
    TransportSimplex,
    /// HiGHS LP solver on the balanced problem
    Highs,
}

impl fmt::Display for SolverBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SolverBackend::Auto => write!(f, "Auto"),
            SolverBackend::TransportSimplex => write!(f, "Transportation Simplex"),
            SolverBackend::Highs => write!(f, "HiGHS"),
        }
    }
}

impl FromStr for SolverBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "auto" => Ok(SolverBackend::Auto),
            "transport-simplex" | "transport_simplex" | "modi" => Ok(SolverBackend::TransportSimplex),
            "highs" => Ok(SolverBackend::Highs),
            other => Err(format!("unknown solver backend '{}'", other)),
        }
    }
}

/// How the starting basic feasible solution is built
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InitialMethod {
    /// Vogel's approximation method
    #[default]
    Vogel,
    /// Northwest-corner rule
    NorthwestCorner,
}

/// Rule used to choose the entering cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PricingRule {
    /// Most negative reduced cost, lowest row then column on ties
    #[default]
    MostNegative,
    /// First negative reduced cost in row-major order (Bland's rule)
    LowestIndex,
}

/// Artificial node added to balance total supply and demand
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DummyNode {
    /// Extra origin carrying the supply shortfall
    Origin(f64),
    /// Extra destination absorbing the excess supply
    Destination(f64),
}

impl DummyNode {
    pub fn amount(&self) -> f64 {
        match *self {
            DummyNode::Origin(amount) | DummyNode::Destination(amount) => amount,
        }
    }
}

impl fmt::Display for DummyNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DummyNode::Origin(amount) => write!(f, "dummy origin supplying {}", amount),
            DummyNode::Destination(amount) => write!(f, "dummy destination absorbing {}", amount),
        }
    }
}
