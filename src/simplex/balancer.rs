//! Supply/demand balancing.

use crate::domain::{
    solver_service::{Result, SolverError},
    value_objects::{scaled_tolerance, DummyNode},
    TransportProblem,
};

/// A problem whose total supply equals its total demand within
/// `flow_tolerance`.
#[derive(Debug, Clone)]
pub struct BalancedProblem {
    pub costs: Vec<Vec<f64>>,
    pub supply: Vec<f64>,
    pub demand: Vec<f64>,
    pub dummy: Option<DummyNode>,
    /// Number of origins before balancing
    pub original_rows: usize,
    /// Number of destinations before balancing
    pub original_cols: usize,
    /// Tolerance for comparing flows, supplies and demands
    pub flow_tolerance: f64,
    /// Tolerance for comparing costs, potentials and reduced costs
    pub cost_tolerance: f64,
}

impl BalancedProblem {
    pub fn num_rows(&self) -> usize {
        self.supply.len()
    }

    pub fn num_cols(&self) -> usize {
        self.demand.len()
    }

    pub fn cost(&self, row: usize, col: usize) -> f64 {
        self.costs[row][col]
    }
}

/// Flow tolerance for a problem with these supplies and demands.
pub fn flow_tolerance(supply: &[f64], demand: &[f64]) -> f64 {
    let total_supply: f64 = supply.iter().sum();
    let total_demand: f64 = demand.iter().sum();
    scaled_tolerance(total_supply.max(total_demand))
}

/// Cost tolerance for a problem with these unit costs.
pub fn cost_tolerance(costs: &[Vec<f64>]) -> f64 {
    let largest = costs
        .iter()
        .flatten()
        .fold(0.0_f64, |acc, &c| acc.max(c.abs()));
    scaled_tolerance(largest)
}

/// Appends a zero-cost dummy origin or destination when totals differ.
///
/// The input must already be validated.
pub fn balance(problem: &TransportProblem) -> Result<BalancedProblem> {
    let total_supply = problem.total_supply();
    let total_demand = problem.total_demand();

    if !total_supply.is_finite()
        || !total_demand.is_finite()
        || total_supply < 0.0
        || total_demand < 0.0
    {
        return Err(SolverError::ImbalancedInput {
            supply: total_supply,
            demand: total_demand,
        });
    }

    let flow_tolerance = flow_tolerance(&problem.supply, &problem.demand);
    let mut costs = problem.costs.clone();
    let mut supply = problem.supply.clone();
    let mut demand = problem.demand.clone();
    let cols = demand.len();

    let dummy = if total_demand - total_supply > flow_tolerance {
        let shortfall = total_demand - total_supply;
        costs.push(vec![0.0; cols]);
        supply.push(shortfall);
        Some(DummyNode::Origin(shortfall))
    } else if total_supply - total_demand > flow_tolerance {
        let excess = total_supply - total_demand;
        for row in costs.iter_mut() {
            row.push(0.0);
        }
        demand.push(excess);
        Some(DummyNode::Destination(excess))
    } else {
        None
    };

    if let Some(d) = dummy {
        log::debug!("balanced problem with {}", d);
    }

    let cost_tolerance = cost_tolerance(&costs);

    Ok(BalancedProblem {
        costs,
        supply,
        demand,
        dummy,
        original_rows: problem.num_origins(),
        original_cols: problem.num_destinations(),
        flow_tolerance,
        cost_tolerance,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_objects::EPSILON;

    fn totals(p: &BalancedProblem) -> (f64, f64) {
        (p.supply.iter().sum(), p.demand.iter().sum())
    }

    #[test]
    fn balanced_input_is_unchanged() {
        let problem = TransportProblem::new(
            vec![vec![4.0, 6.0], vec![5.0, 3.0]],
            vec![20.0, 30.0],
            vec![25.0, 25.0],
        );
        let balanced = balance(&problem).unwrap();
        assert!(balanced.dummy.is_none());
        assert_eq!(balanced.num_rows(), 2);
        assert_eq!(balanced.num_cols(), 2);
    }

    #[test]
    fn excess_supply_adds_dummy_destination() {
        let problem = TransportProblem::new(
            vec![vec![1.0, 2.0], vec![3.0, 4.0]],
            vec![10.0, 10.0],
            vec![5.0, 10.0],
        );
        let balanced = balance(&problem).unwrap();
        assert_eq!(balanced.dummy, Some(DummyNode::Destination(5.0)));
        assert_eq!(balanced.demand, vec![5.0, 10.0, 5.0]);
        assert!(balanced.costs.iter().all(|row| row.len() == 3 && row[2] == 0.0));
        let (s, d) = totals(&balanced);
        assert!((s - d).abs() < EPSILON);
    }

    #[test]
    fn excess_demand_adds_dummy_origin() {
        let problem = TransportProblem::new(vec![vec![2.0, 3.0]], vec![4.0], vec![3.0, 3.0]);
        let balanced = balance(&problem).unwrap();
        assert_eq!(balanced.dummy, Some(DummyNode::Origin(2.0)));
        assert_eq!(balanced.costs[1], vec![0.0, 0.0]);
        assert_eq!(balanced.original_rows, 1);
        let (s, d) = totals(&balanced);
        assert!((s - d).abs() < EPSILON);
    }

    #[test]
    fn rounding_noise_does_not_add_dummy() {
        // totals differ by far less than the flow tolerance
        let problem = TransportProblem::new(
            vec![vec![1.0], vec![2.0]],
            vec![0.1e8, 0.2e8],
            vec![0.3e8 + 1e-3],
        );
        let balanced = balance(&problem).unwrap();
        assert!(balanced.dummy.is_none());
        assert!(balanced.flow_tolerance > 1e-3);
        assert_eq!(balanced.cost_tolerance, EPSILON * 2.0);
    }

    #[test]
    fn infinite_totals_cannot_be_balanced() {
        let problem = TransportProblem::new(
            vec![vec![1.0, 1.0]],
            vec![f64::MAX],
            vec![f64::MAX, f64::MAX],
        );
        assert!(matches!(
            balance(&problem),
            Err(SolverError::ImbalancedInput { .. })
        ));
    }
}
