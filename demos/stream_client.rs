// Example: Regional distribution using gRPC streaming and batch solves
//
// A distributor with 12 depots serves 40 retail sites. The cost matrix is
// streamed one row per chunk after a metadata chunk carrying supplies and
// demands, so large matrices never have to fit in a single message.
//
// The same network is then re-solved as a batch under several demand
// forecasts; results come back in the order the scenarios were sent.

use futures::stream;
use tonic::Request;

pub mod transport_solver {
    tonic::include_proto!("transport_solver");
}

use transport_solver::{
    problem_chunk, solver_config::InitialMethod, solver_config::SolverBackend,
    transportation_solver_client::TransportationSolverClient, DummyKind, Empty, ProblemBatch,
    ProblemChunk, ProblemMetadata, Row, SolutionStatus, SolverConfig, TransportProblem,
};

const NUM_DEPOTS: usize = 12;
const NUM_SITES: usize = 40;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut client = TransportationSolverClient::connect("http://127.0.0.1:50051").await?;

    println!("=== Regional Distribution (streaming) ===\n");

    let solvers = client
        .get_available_solvers(Request::new(Empty {}))
        .await?
        .into_inner()
        .solvers;
    println!("Available solvers:");
    for solver in &solvers {
        println!("  • {} (v{})", solver.name, solver.version);
    }
    println!();

    let supply = generate_supply();
    let demand = generate_demand(1.0);
    let costs = generate_costs();

    println!(
        "Total supply: {:.0}, total demand: {:.0}\n",
        supply.iter().sum::<f64>(),
        demand.iter().sum::<f64>()
    );

    let chunks = create_chunks(supply.clone(), demand, costs.clone());
    println!("Sending {} chunks...\n", chunks.len());

    let response = client
        .solve_problem_stream(Request::new(stream::iter(chunks)))
        .await?;
    let result = response.into_inner();

    match SolutionStatus::try_from(result.status) {
        Ok(SolutionStatus::Optimal) | Ok(SolutionStatus::Feasible) => {
            println!("✓ Plan found (certified optimal: {})", result.is_optimal);

            let mut lanes: Vec<(usize, usize, f64)> = Vec::new();
            for (i, row) in result.solution.iter().enumerate() {
                for (j, &qty) in row.values.iter().enumerate() {
                    if qty > 0.0 {
                        lanes.push((i, j, qty));
                    }
                }
            }
            lanes.sort_by(|a, b| b.2.total_cmp(&a.2));

            println!("\nLargest shipments:");
            for (i, j, qty) in lanes.iter().take(8) {
                println!(
                    "  D{} → S{}: {:.0} units @ ${}/u",
                    i + 1,
                    j + 1,
                    qty,
                    costs[*i][*j]
                );
            }
            if lanes.len() > 8 {
                println!("  ... and {} more lanes", lanes.len() - 8);
            }

            println!("\nTotal cost: ${:.0}", result.optimal_cost);
            if let Some(stats) = result.statistics {
                println!(
                    "Pivots: {} ({} degenerate), initial cost ${:.0}, {:.1} ms",
                    stats.iterations, stats.degenerate_pivots, stats.initial_cost, stats.solve_time_ms
                );
            }
        }
        _ => println!("✗ No plan found: {}", result.message),
    }

    println!("\n=== Demand forecasts (batch) ===\n");

    let forecasts = [0.8, 1.0, 1.2, 1.5];
    let problems = forecasts
        .iter()
        .map(|&factor| TransportProblem {
            costs: costs
                .iter()
                .map(|values| Row {
                    values: values.clone(),
                })
                .collect(),
            supply: supply.clone(),
            demand: generate_demand(factor),
            solver_config: Some(SolverConfig {
                solver: SolverBackend::TransportSimplex as i32,
                initial_method: InitialMethod::Vogel as i32,
                ..Default::default()
            }),
            problem_name: format!("forecast x{}", factor),
        })
        .collect();

    let mut results = client
        .solve_batch(Request::new(ProblemBatch { problems }))
        .await?
        .into_inner();

    while let Some(result) = results.message().await? {
        let shortfall = match DummyKind::try_from(result.dummy) {
            Ok(DummyKind::Origin) => format!(", unmet demand {:.0}", result.dummy_amount),
            Ok(DummyKind::Destination) => format!(", idle supply {:.0}", result.dummy_amount),
            _ => String::new(),
        };
        match SolutionStatus::try_from(result.status) {
            Ok(SolutionStatus::Error) => {
                println!("  {:<16} ✗ {}", result.problem_name, result.message)
            }
            _ => println!(
                "  {:<16} cost ${:>8.0}{}",
                result.problem_name, result.optimal_cost, shortfall
            ),
        }
    }

    Ok(())
}

fn generate_supply() -> Vec<f64> {
    (0..NUM_DEPOTS)
        .map(|i| 150.0 + (i % 5) as f64 * 40.0)
        .collect()
}

fn generate_demand(factor: f64) -> Vec<f64> {
    (0..NUM_SITES)
        .map(|j| ((30.0 + (j % 7) as f64 * 10.0) * factor).round())
        .collect()
}

fn generate_costs() -> Vec<Vec<f64>> {
    (0..NUM_DEPOTS)
        .map(|i| {
            (0..NUM_SITES)
                .map(|j| 3.0 + ((i as i32 * 3 - j as i32).abs() % 17) as f64)
                .collect()
        })
        .collect()
}

fn create_chunks(supply: Vec<f64>, demand: Vec<f64>, costs: Vec<Vec<f64>>) -> Vec<ProblemChunk> {
    let mut chunks = Vec::with_capacity(costs.len() + 1);

    // Metadata
    chunks.push(ProblemChunk {
        chunk: Some(problem_chunk::Chunk::Metadata(ProblemMetadata {
            problem_name: "Regional Distribution".to_string(),
            supply,
            demand,
            solver_config: Some(SolverConfig {
                solver: SolverBackend::Auto as i32,
                time_limit: 30.0,
                ..Default::default()
            }),
        })),
    });

    // Cost rows, in origin order
    for values in costs {
        chunks.push(ProblemChunk {
            chunk: Some(problem_chunk::Chunk::CostRow(Row { values })),
        });
    }

    chunks
}
