// Mappers: Convert between gRPC protobuf types and domain models
// This keeps protobuf dependencies isolated from business logic (Dependency Inversion)

use crate::domain::{
    models::{SolverConfig, TransportProblem, TransportSolution},
    solver_service::SolverError,
    value_objects::{DummyNode, InitialMethod, PricingRule, SolutionStatus, SolverBackend},
};
use tonic::Status;

pub mod transport_solver {
    tonic::include_proto!("transport_solver");
}

use transport_solver as proto;

/// Convert protobuf SolverConfig to domain SolverConfig
pub fn proto_to_domain_config(
    cfg: &proto::SolverConfig,
) -> std::result::Result<SolverConfig, Box<Status>> {
    let backend = match proto::solver_config::SolverBackend::try_from(cfg.solver) {
        Ok(proto::solver_config::SolverBackend::Auto) => SolverBackend::Auto,
        Ok(proto::solver_config::SolverBackend::TransportSimplex) => SolverBackend::TransportSimplex,
        Ok(proto::solver_config::SolverBackend::Highs) => SolverBackend::Highs,
        Err(_) => return Err(Box::new(Status::invalid_argument("Invalid solver backend"))),
    };

    let initial_method = match proto::solver_config::InitialMethod::try_from(cfg.initial_method) {
        Ok(proto::solver_config::InitialMethod::Vogel) => InitialMethod::Vogel,
        Ok(proto::solver_config::InitialMethod::NorthwestCorner) => InitialMethod::NorthwestCorner,
        Err(_) => {
            return Err(Box::new(Status::invalid_argument(
                "Invalid initial solution method",
            )))
        }
    };

    let pricing = match proto::solver_config::PricingRule::try_from(cfg.pricing) {
        Ok(proto::solver_config::PricingRule::MostNegative) => PricingRule::MostNegative,
        Ok(proto::solver_config::PricingRule::LowestIndex) => PricingRule::LowestIndex,
        Err(_) => return Err(Box::new(Status::invalid_argument("Invalid pricing rule"))),
    };

    Ok(SolverConfig {
        backend,
        initial_method,
        pricing,
        iteration_limit: if cfg.iteration_limit > 0 {
            Some(cfg.iteration_limit)
        } else {
            None
        },
        time_limit: if cfg.time_limit > 0.0 {
            Some(cfg.time_limit)
        } else {
            None
        },
        verbose: cfg.verbose,
    })
}

/// Convert protobuf TransportProblem to domain TransportProblem
pub fn proto_to_domain_problem(
    proto_prob: proto::TransportProblem,
) -> std::result::Result<TransportProblem, Box<Status>> {
    let solver_config = match proto_prob.solver_config.as_ref() {
        Some(cfg) => proto_to_domain_config(cfg)?,
        None => SolverConfig::default(),
    };

    let costs = proto_prob
        .costs
        .into_iter()
        .map(|row| row.values)
        .collect();

    Ok(TransportProblem {
        name: proto_prob.problem_name,
        costs,
        supply: proto_prob.supply,
        demand: proto_prob.demand,
        solver_config,
    })
}

/// Assemble a problem from a metadata chunk and the cost rows that followed it
pub fn chunks_to_proto_problem(
    metadata: Option<proto::ProblemMetadata>,
    cost_rows: Vec<proto::Row>,
) -> std::result::Result<proto::TransportProblem, Box<Status>> {
    let metadata = metadata
        .ok_or_else(|| Box::new(Status::invalid_argument("Problem metadata is required")))?;

    Ok(proto::TransportProblem {
        costs: cost_rows,
        supply: metadata.supply,
        demand: metadata.demand,
        solver_config: metadata.solver_config,
        problem_name: metadata.problem_name,
    })
}

/// Convert a domain error to the gRPC status returned to the caller
pub fn solver_error_to_status(err: &SolverError) -> Status {
    if err.is_invalid_input() {
        return Status::invalid_argument(err.to_string());
    }
    match err {
        SolverError::SolverNotAvailable(_) => Status::unavailable(err.to_string()),
        _ => Status::internal(format!("Solver error: {}", err)),
    }
}

/// Convert domain TransportSolution to protobuf TransportResult
pub fn domain_to_proto_solution(
    solution: TransportSolution,
    solver_name: &str,
    problem_name: &str,
) -> proto::TransportResult {
    let status = match solution.status {
        SolutionStatus::Optimal => proto::SolutionStatus::Optimal as i32,
        SolutionStatus::Feasible => proto::SolutionStatus::Feasible as i32,
        SolutionStatus::IterationLimit => proto::SolutionStatus::IterationLimit as i32,
        SolutionStatus::TimeLimit => proto::SolutionStatus::TimeLimit as i32,
    };

    let dummy = match solution.dummy {
        None => proto::DummyKind::NoDummy,
        Some(DummyNode::Origin(_)) => proto::DummyKind::Origin,
        Some(DummyNode::Destination(_)) => proto::DummyKind::Destination,
    };
    let dummy_amount = solution.dummy.map_or(0.0, |d| d.amount());

    proto::TransportResult {
        status,
        solution: solution
            .solution
            .into_iter()
            .map(|values| proto::Row { values })
            .collect(),
        optimal_cost: solution.optimal_cost,
        is_optimal: solution.is_optimal,
        row_potentials: solution.row_potentials,
        column_potentials: solution.column_potentials,
        dummy: dummy as i32,
        dummy_amount,
        message: solution.message,
        statistics: Some(proto::SolverStatistics {
            iterations: solution.statistics.iterations,
            degenerate_pivots: solution.statistics.degenerate_pivots,
            solve_time_ms: solution.statistics.solve_time_ms,
            num_origins: solution.statistics.num_origins,
            num_destinations: solution.statistics.num_destinations,
            initial_cost: solution.statistics.initial_cost,
            solver_backend: solver_name.to_string(),
        }),
        problem_name: problem_name.to_string(),
    }
}

/// Result entry for a batch problem that could not be solved
pub fn failed_result(problem_name: &str, message: &str) -> proto::TransportResult {
    proto::TransportResult {
        status: proto::SolutionStatus::Error as i32,
        message: message.to_string(),
        problem_name: problem_name.to_string(),
        ..Default::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::SolverStatistics;
    use tonic::Code;

    fn row(values: &[f64]) -> proto::Row {
        proto::Row {
            values: values.to_vec(),
        }
    }

    #[test]
    fn problem_with_config() {
        let proto_prob = proto::TransportProblem {
            costs: vec![row(&[4.0, 6.0]), row(&[5.0, 3.0])],
            supply: vec![20.0, 30.0],
            demand: vec![25.0, 25.0],
            solver_config: Some(proto::SolverConfig {
                solver: proto::solver_config::SolverBackend::Highs as i32,
                initial_method: proto::solver_config::InitialMethod::NorthwestCorner as i32,
                pricing: proto::solver_config::PricingRule::LowestIndex as i32,
                iteration_limit: 0,
                time_limit: 2.5,
                verbose: true,
            }),
            problem_name: "depots".to_string(),
        };
        let problem = proto_to_domain_problem(proto_prob).unwrap();
        assert_eq!(problem.name, "depots");
        assert_eq!(problem.costs, vec![vec![4.0, 6.0], vec![5.0, 3.0]]);
        assert_eq!(problem.solver_config.backend, SolverBackend::Highs);
        assert_eq!(
            problem.solver_config.initial_method,
            InitialMethod::NorthwestCorner
        );
        assert_eq!(problem.solver_config.pricing, PricingRule::LowestIndex);
        assert_eq!(problem.solver_config.iteration_limit, None);
        assert_eq!(problem.solver_config.time_limit, Some(2.5));
    }

    #[test]
    fn invalid_pricing_is_rejected() {
        let cfg = proto::SolverConfig {
            pricing: 42,
            ..Default::default()
        };
        let status = proto_to_domain_config(&cfg).unwrap_err();
        assert_eq!(status.code(), Code::InvalidArgument);
    }

    #[test]
    fn unknown_enum_values_are_rejected() {
        let configs = [
            proto::SolverConfig {
                solver: 7,
                ..Default::default()
            },
            proto::SolverConfig {
                initial_method: 7,
                ..Default::default()
            },
            proto::SolverConfig {
                pricing: 7,
                ..Default::default()
            },
        ];
        for cfg in &configs {
            let status = proto_to_domain_config(cfg).unwrap_err();
            assert_eq!(status.code(), Code::InvalidArgument);
        }
        assert!(proto_to_domain_config(&proto::SolverConfig::default()).is_ok());
    }

    #[test]
    fn stream_without_metadata_is_rejected() {
        let status = chunks_to_proto_problem(None, vec![row(&[1.0])]).unwrap_err();
        assert_eq!(status.code(), Code::InvalidArgument);
    }

    #[test]
    fn errors_map_to_status_codes() {
        let status = solver_error_to_status(&SolverError::ShapeMismatch("2x3".into()));
        assert_eq!(status.code(), Code::InvalidArgument);
        let status = solver_error_to_status(&SolverError::CycleDetected { iterations: 9 });
        assert_eq!(status.code(), Code::Internal);
        let status = solver_error_to_status(&SolverError::SolverNotAvailable("cbc".into()));
        assert_eq!(status.code(), Code::Unavailable);
    }

    #[test]
    fn solution_reports_dummy() {
        let solution = TransportSolution {
            status: SolutionStatus::Optimal,
            solution: vec![vec![5.0, 5.0], vec![0.0, 5.0]],
            optimal_cost: 35.0,
            is_optimal: true,
            row_potentials: vec![0.0, 2.0],
            column_potentials: vec![1.0, 2.0],
            dummy: Some(DummyNode::Destination(5.0)),
            message: "Optimal solution found".to_string(),
            statistics: SolverStatistics::default(),
        };
        let result = domain_to_proto_solution(solution, "Transportation Simplex", "b");
        assert_eq!(result.dummy, proto::DummyKind::Destination as i32);
        assert_eq!(result.dummy_amount, 5.0);
        assert_eq!(result.solution[1].values, vec![0.0, 5.0]);
        assert_eq!(
            result.statistics.unwrap().solver_backend,
            "Transportation Simplex"
        );
    }
}
