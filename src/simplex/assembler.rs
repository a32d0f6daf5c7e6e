use super::allocation::{Allocation, Cell};
use super::balancer::BalancedProblem;
use super::basis::Potentials;
use super::verifier;
use crate::domain::{SolutionStatus, SolverStatistics, TransportSolution};

/// Packages a balanced-problem allocation as a solution of the original
/// problem: dummy rows and columns are dropped, the cost is recomputed over
/// the original cells and optimality is certified independently. A plan
/// reported `Optimal` that fails the certificate is downgraded to `Feasible`.
pub fn assemble(
    problem: &BalancedProblem,
    allocation: &Allocation,
    potentials: Option<&Potentials>,
    status: SolutionStatus,
) -> TransportSolution {
    let rows = problem.original_rows;
    let cols = problem.original_cols;

    let is_optimal = verifier::verify(problem, allocation);
    let status = if status == SolutionStatus::Optimal && !is_optimal {
        log::warn!("solver reported optimality but the certificate failed");
        SolutionStatus::Feasible
    } else {
        status
    };

    let solution: Vec<Vec<f64>> = allocation
        .to_rows(rows, cols)
        .into_iter()
        .map(|row| row.into_iter().map(|x| x.max(0.0)).collect())
        .collect();

    let optimal_cost = (0..rows)
        .flat_map(|i| (0..cols).map(move |j| Cell::new(i, j)))
        .map(|c| problem.cost(c.row, c.col) * allocation[c])
        .sum();

    let (row_potentials, column_potentials) = match potentials {
        Some(p) => (p.u[..rows].to_vec(), p.v[..cols].to_vec()),
        None => (Vec::new(), Vec::new()),
    };

    let message = match status {
        SolutionStatus::Optimal => "Optimal solution found".to_string(),
        SolutionStatus::Feasible => "Feasible solution found, optimality not certified".to_string(),
        SolutionStatus::IterationLimit | SolutionStatus::TimeLimit => {
            format!("{}, returning best solution so far", status)
        }
    };

    TransportSolution {
        status,
        solution,
        optimal_cost,
        is_optimal,
        row_potentials,
        column_potentials,
        dummy: problem.dummy,
        message,
        statistics: SolverStatistics {
            num_origins: rows as u32,
            num_destinations: cols as u32,
            ..Default::default()
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{DummyNode, TransportProblem};
    use crate::simplex::balancer::balance;

    #[test]
    fn drops_dummy_destination() {
        let problem = balance(&TransportProblem::new(
            vec![vec![1.0, 2.0], vec![3.0, 4.0]],
            vec![10.0, 10.0],
            vec![5.0, 10.0],
        ))
        .unwrap();
        let allocation = Allocation::from_rows(&[vec![5.0, 5.0, 0.0], vec![0.0, 5.0, 5.0]]);
        let potentials = Potentials {
            u: vec![0.0, 2.0],
            v: vec![1.0, 2.0, -2.0],
        };
        let solution = assemble(&problem, &allocation, Some(&potentials), SolutionStatus::Optimal);

        assert_eq!(solution.solution, vec![vec![5.0, 5.0], vec![0.0, 5.0]]);
        assert_eq!(solution.optimal_cost, 35.0);
        assert!(solution.is_optimal);
        assert_eq!(solution.dummy, Some(DummyNode::Destination(5.0)));
        assert_eq!(solution.row_potentials, vec![0.0, 2.0]);
        assert_eq!(solution.column_potentials, vec![1.0, 2.0]);
        assert_eq!(solution.received_by(0), 5.0);
        assert_eq!(solution.received_by(1), 10.0);
    }

    #[test]
    fn limit_status_keeps_plan_but_is_not_certified() {
        let problem = balance(&TransportProblem::new(
            vec![vec![4.0, 6.0], vec![5.0, 3.0]],
            vec![20.0, 30.0],
            vec![25.0, 25.0],
        ))
        .unwrap();
        let allocation = Allocation::from_rows(&[vec![0.0, 20.0], vec![25.0, 5.0]]);
        let solution = assemble(&problem, &allocation, None, SolutionStatus::IterationLimit);
        assert!(!solution.is_optimal);
        assert_eq!(solution.optimal_cost, 260.0);
        assert!(solution.row_potentials.is_empty());
        assert!(solution.message.contains("Iteration Limit"));
    }

    #[test]
    fn uncertified_optimum_is_downgraded() {
        let problem = balance(&TransportProblem::new(
            vec![vec![4.0, 6.0], vec![5.0, 3.0]],
            vec![20.0, 30.0],
            vec![25.0, 25.0],
        ))
        .unwrap();
        let allocation = Allocation::from_rows(&[vec![0.0, 20.0], vec![25.0, 5.0]]);
        let solution = assemble(&problem, &allocation, None, SolutionStatus::Optimal);
        assert_eq!(solution.status, SolutionStatus::Feasible);
        assert!(!solution.is_optimal);
        assert!(solution.message.starts_with("Feasible"));
    }
}
