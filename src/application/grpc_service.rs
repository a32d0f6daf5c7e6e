#[cfg(feature = "server")]
use tokio::sync::mpsc;
#[cfg(feature = "server")]
use tokio_stream::wrappers::ReceiverStream;
#[cfg(feature = "server")]
use tonic::{Request, Response, Status};

#[cfg(feature = "server")]
use super::mappers::{self, transport_solver};

use crate::domain::value_objects::SolverBackend;
#[cfg(feature = "server")]
use crate::domain::{
    models::{TransportProblem, TransportSolution},
    value_objects::scaled_tolerance,
};
#[cfg(feature = "server")]
use crate::solver::SolverFactory;

/// Results buffered per batch stream before the sender waits for the client
#[cfg(feature = "server")]
const BATCH_CHANNEL_CAPACITY: usize = 4;

/// Problems above this many lanes get a size warning on validation
#[cfg(feature = "server")]
const LARGE_PROBLEM_LANES: usize = 250_000;

/// gRPC service implementation
pub struct GrpcTransportService {
    default_backend: SolverBackend,
}

impl GrpcTransportService {
    pub fn new(default_backend: SolverBackend) -> Self {
        Self { default_backend }
    }

    /// Backend used for problems that ask for `Auto`
    pub fn default_backend(&self) -> SolverBackend {
        self.default_backend
    }
}

impl Default for GrpcTransportService {
    fn default() -> Self {
        Self::new(SolverBackend::TransportSimplex)
    }
}

/// Pivot and timing summary printed for problems that ask for verbose output
#[cfg(feature = "server")]
fn verbose_summary(solution: &TransportSolution) -> String {
    let stats = &solution.statistics;
    let mut summary = format!(
        "   {} pivots ({} degenerate), initial cost {}, {:.3} ms",
        stats.iterations, stats.degenerate_pivots, stats.initial_cost, stats.solve_time_ms
    );
    if let Some(dummy) = solution.dummy {
        summary.push_str(&format!(", {}", dummy));
    }
    summary
}

/// Solve on the calling thread and convert the outcome for the wire
#[cfg(feature = "server")]
fn solve_with(
    fallback: SolverBackend,
    problem: TransportProblem,
) -> Result<transport_solver::TransportResult, Status> {
    let solver = SolverFactory::create_solver(&problem, fallback);
    println!("   Using solver: {}", solver.name());

    let solution = solver
        .solve(&problem)
        .map_err(|e| mappers::solver_error_to_status(&e))?;

    println!("✓ Status: {} (cost {})", solution.status, solution.optimal_cost);
    if problem.solver_config.verbose {
        println!("{}", verbose_summary(&solution));
    }

    Ok(mappers::domain_to_proto_solution(
        solution,
        solver.name(),
        &problem.name,
    ))
}

#[cfg(feature = "server")]
impl GrpcTransportService {
    /// Run one solve on the blocking pool so pivots never stall the runtime
    async fn solve_blocking(
        &self,
        proto_problem: transport_solver::TransportProblem,
    ) -> Result<transport_solver::TransportResult, Status> {
        println!("📦 Solving problem: {}", proto_problem.problem_name);

        // Convert protobuf to domain model
        let domain_problem = mappers::proto_to_domain_problem(proto_problem).map_err(|e| *e)?;
        println!(
            "   Origins: {}, destinations: {}",
            domain_problem.num_origins(),
            domain_problem.num_destinations()
        );

        let fallback = self.default_backend();
        tokio::task::spawn_blocking(move || solve_with(fallback, domain_problem))
            .await
            .map_err(|e| Status::internal(format!("Solve task failed: {}", e)))?
    }
}

#[cfg(feature = "server")]
#[tonic::async_trait]
impl transport_solver::transportation_solver_server::TransportationSolver for GrpcTransportService {
    async fn solve_problem(
        &self,
        request: Request<transport_solver::TransportProblem>,
    ) -> Result<Response<transport_solver::TransportResult>, Status> {
        let result = self.solve_blocking(request.into_inner()).await?;
        Ok(Response::new(result))
    }

    async fn solve_problem_stream(
        &self,
        request: Request<tonic::Streaming<transport_solver::ProblemChunk>>,
    ) -> Result<Response<transport_solver::TransportResult>, Status> {
        let mut stream = request.into_inner();

        let mut metadata: Option<transport_solver::ProblemMetadata> = None;
        let mut cost_rows = Vec::new();

        // Collect all chunks
        while let Some(chunk) = stream.message().await? {
            match chunk.chunk {
                Some(transport_solver::problem_chunk::Chunk::Metadata(m)) => {
                    metadata = Some(m);
                }
                Some(transport_solver::problem_chunk::Chunk::CostRow(row)) => {
                    cost_rows.push(row);
                }
                None => {}
            }
        }

        // Build complete problem and reuse the single-message path
        let proto_problem =
            mappers::chunks_to_proto_problem(metadata, cost_rows).map_err(|e| *e)?;
        let result = self.solve_blocking(proto_problem).await?;
        Ok(Response::new(result))
    }

    type SolveBatchStream = ReceiverStream<Result<transport_solver::TransportResult, Status>>;

    async fn solve_batch(
        &self,
        request: Request<transport_solver::ProblemBatch>,
    ) -> Result<Response<Self::SolveBatchStream>, Status> {
        let batch = request.into_inner();
        println!("📦 Solving batch of {} problems", batch.problems.len());

        // Solves are independent, so they all start at once on the blocking pool
        let fallback = self.default_backend();
        let handles: Vec<_> = batch
            .problems
            .into_iter()
            .map(|proto_problem| {
                let name = proto_problem.problem_name.clone();
                let handle = tokio::task::spawn_blocking(move || {
                    let problem =
                        mappers::proto_to_domain_problem(proto_problem).map_err(|e| *e)?;
                    solve_with(fallback, problem)
                });
                (name, handle)
            })
            .collect();

        let (tx, rx) = mpsc::channel(BATCH_CHANNEL_CAPACITY);
        tokio::spawn(async move {
            for (name, handle) in handles {
                let result = match handle.await {
                    Ok(Ok(result)) => result,
                    Ok(Err(status)) => mappers::failed_result(&name, status.message()),
                    Err(e) => mappers::failed_result(&name, &format!("Solve task failed: {}", e)),
                };
                if tx.send(Ok(result)).await.is_err() {
                    // client went away
                    break;
                }
            }
        });

        Ok(Response::new(ReceiverStream::new(rx)))
    }

    async fn validate_problem(
        &self,
        request: Request<transport_solver::TransportProblem>,
    ) -> Result<Response<transport_solver::ValidationResult>, Status> {
        let proto_problem = request.into_inner();
        let domain_problem = mappers::proto_to_domain_problem(proto_problem).map_err(|e| *e)?;

        // Use the default solver for validation
        let solver = SolverFactory::default_solver();

        let mut errors = Vec::new();
        let mut warnings = Vec::new();

        let total_supply = domain_problem.total_supply();
        let total_demand = domain_problem.total_demand();
        let tolerance = scaled_tolerance(total_supply.max(total_demand));

        // Use domain service validation
        match solver.validate(&domain_problem) {
            Ok(()) => {
                if total_demand - total_supply > tolerance {
                    warnings.push(format!(
                        "Demand exceeds supply by {}; a dummy origin will cover the shortfall",
                        total_demand - total_supply
                    ));
                } else if total_supply - total_demand > tolerance {
                    warnings.push(format!(
                        "Supply exceeds demand by {}; a dummy destination will absorb the excess",
                        total_supply - total_demand
                    ));
                }

                if total_supply <= tolerance && total_demand <= tolerance {
                    warnings.push("Problem ships nothing; the empty plan is optimal".to_string());
                }

                let lanes = domain_problem.num_origins() * domain_problem.num_destinations();
                if lanes > LARGE_PROBLEM_LANES {
                    warnings.push(format!(
                        "Problem has {} shipment lanes, may be slow to solve",
                        lanes
                    ));
                }
            }
            Err(e) => {
                errors.push(e.to_string());
            }
        }

        Ok(Response::new(transport_solver::ValidationResult {
            is_valid: errors.is_empty(),
            errors,
            warnings,
            num_origins: domain_problem.num_origins() as u32,
            num_destinations: domain_problem.num_destinations() as u32,
            total_supply,
            total_demand,
        }))
    }

    async fn get_available_solvers(
        &self,
        _request: Request<transport_solver::Empty>,
    ) -> Result<Response<transport_solver::AvailableSolvers>, Status> {
        let solvers = vec![
            transport_solver::SolverInfo {
                name: "Transportation Simplex".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                capabilities: vec![
                    "Vogel's Approximation Method".to_string(),
                    "Northwest-Corner Rule".to_string(),
                    "MODI Pivoting".to_string(),
                    "Dual Potentials".to_string(),
                ],
            },
            transport_solver::SolverInfo {
                name: "HiGHS".to_string(),
                version: "1.7+".to_string(),
                capabilities: vec![
                    "Linear Programming".to_string(),
                    "Primal/Dual Simplex".to_string(),
                    "Interior Point".to_string(),
                ],
            },
        ];

        Ok(Response::new(transport_solver::AvailableSolvers { solvers }))
    }
}
