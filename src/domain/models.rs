use super::value_objects::{
    DummyNode, InitialMethod, PricingRule, SolutionStatus, SolverBackend,
};

/// Configuration for the solver
#[derive(Debug, Clone)]
pub struct SolverConfig {
    pub backend: SolverBackend,
    pub initial_method: InitialMethod,
    pub pricing: PricingRule,
    pub iteration_limit: Option<u64>,
    /// Wall-clock limit in seconds
    pub time_limit: Option<f64>,
    pub verbose: bool,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            backend: SolverBackend::Auto,
            initial_method: InitialMethod::Vogel,
            pricing: PricingRule::MostNegative,
            iteration_limit: None,
            time_limit: None,
            verbose: false,
        }
    }
}

impl SolverConfig {
    pub fn with_backend(mut self, backend: SolverBackend) -> Self {
        self.backend = backend;
        self
    }

    pub fn with_initial_method(mut self, method: InitialMethod) -> Self {
        self.initial_method = method;
        self
    }

    pub fn with_pricing(mut self, pricing: PricingRule) -> Self {
        self.pricing = pricing;
        self
    }

    pub fn with_iteration_limit(mut self, limit: u64) -> Self {
        self.iteration_limit = Some(limit);
        self
    }

    pub fn with_time_limit(mut self, seconds: f64) -> Self {
        self.time_limit = Some(seconds);
        self
    }
}

/// Transportation problem: ship `supply` from origins to meet `demand` at
/// destinations at minimum total cost
#[derive(Debug, Clone)]
pub struct TransportProblem {
    pub name: String,
    /// `costs[i][j]` is the unit cost from origin `i` to destination `j`
    pub costs: Vec<Vec<f64>>,
    pub supply: Vec<f64>,
    pub demand: Vec<f64>,
    pub solver_config: SolverConfig,
}

impl TransportProblem {
    pub fn new(costs: Vec<Vec<f64>>, supply: Vec<f64>, demand: Vec<f64>) -> Self {
        Self {
            name: String::new(),
            costs,
            supply,
            demand,
            solver_config: SolverConfig::default(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_config(mut self, config: SolverConfig) -> Self {
        self.solver_config = config;
        self
    }

    pub fn num_origins(&self) -> usize {
        self.supply.len()
    }

    pub fn num_destinations(&self) -> usize {
        self.demand.len()
    }

    pub fn total_supply(&self) -> f64 {
        self.supply.iter().sum()
    }

    pub fn total_demand(&self) -> f64 {
        self.demand.iter().sum()
    }
}

/// Statistics about the solve process
#[derive(Debug, Clone, Default)]
pub struct SolverStatistics {
    pub iterations: u64,
    pub degenerate_pivots: u64,
    pub solve_time_ms: f64,
    pub num_origins: u32,
    pub num_destinations: u32,
    /// Cost of the starting allocation
    pub initial_cost: f64,
    /// Balanced-problem cost after every pivot, starting with the initial cost
    pub cost_trace: Vec<f64>,
}

/// Solution to a transportation problem
#[derive(Debug, Clone)]
pub struct TransportSolution {
    pub status: SolutionStatus,
    /// Shipment plan over the original origins and destinations
    pub solution: Vec<Vec<f64>>,
    pub optimal_cost: f64,
    pub is_optimal: bool,
    pub row_potentials: Vec<f64>,
    pub column_potentials: Vec<f64>,
    pub dummy: Option<DummyNode>,
    pub message: String,
    pub statistics: SolverStatistics,
}

impl TransportSolution {
    pub fn with_statistics(mut self, statistics: SolverStatistics) -> Self {
        self.statistics = statistics;
        self
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Amount shipped from origin `i`
    pub fn shipped_from(&self, i: usize) -> f64 {
        self.solution.get(i).map(|row| row.iter().sum()).unwrap_or(0.0)
    }

    /// Amount received by destination `j`
    pub fn received_by(&self, j: usize) -> f64 {
        self.solution.iter().filter_map(|row| row.get(j)).sum()
    }
}
