// Example client demonstrating how to use the transportation solver gRPC service
//
// Four warehouses ship a single product to four stores:
//
//            | Store 1 | Store 2 | Store 3 | Store 4 | Supply
// -----------|---------|---------|---------|---------|-------
// Warehouse 1|    5    |    2    |    7    |    3    |   80
// Warehouse 2|    3    |    5    |    6    |    1    |   30
// Warehouse 3|    6    |    1    |    2    |    4    |   60
// Warehouse 4|    4    |    3    |    6    |    6    |   45
// -----------|---------|---------|---------|---------|-------
// Demand     |   70    |   40    |   70    |   35    |
//
// Objective: ship everything at the lowest total cost

use tonic::Request;

pub mod transport_solver {
    tonic::include_proto!("transport_solver");
}

use transport_solver::{
    transportation_solver_client::TransportationSolverClient, DummyKind, Row, SolutionStatus,
    TransportProblem,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Connect to the gRPC server
    let mut client = TransportationSolverClient::connect("http://127.0.0.1:50051").await?;

    println!("=== Warehouse Distribution Problem ===\n");

    let costs = vec![
        vec![5.0, 2.0, 7.0, 3.0],
        vec![3.0, 5.0, 6.0, 1.0],
        vec![6.0, 1.0, 2.0, 4.0],
        vec![4.0, 3.0, 6.0, 6.0],
    ];

    let problem = TransportProblem {
        costs: costs
            .iter()
            .map(|values| Row {
                values: values.clone(),
            })
            .collect(),
        supply: vec![80.0, 30.0, 60.0, 45.0],
        demand: vec![70.0, 40.0, 70.0, 35.0],
        solver_config: None, // Use default solver
        problem_name: "Warehouse Distribution".to_string(),
    };

    // Check the problem before solving it
    let validation = client
        .validate_problem(Request::new(problem.clone()))
        .await?
        .into_inner();
    if !validation.is_valid {
        println!("✗ Problem rejected:");
        for error in &validation.errors {
            println!("  - {}", error);
        }
        return Ok(());
    }
    for warning in &validation.warnings {
        println!("⚠ {}", warning);
    }

    // Solve the problem
    println!("Sending problem to solver...\n");
    let response = client.solve_problem(Request::new(problem)).await?;
    let result = response.into_inner();

    // Display results
    println!("=== Solution ===\n");

    match SolutionStatus::try_from(result.status) {
        Ok(SolutionStatus::Optimal) | Ok(SolutionStatus::Feasible) => {
            if result.is_optimal {
                println!("✓ Optimal shipment plan found!");
            } else {
                println!("⚠ Feasible plan found (not certified optimal)");
            }

            println!("\nShipments:");
            for (i, row) in result.solution.iter().enumerate() {
                for (j, &qty) in row.values.iter().enumerate() {
                    if qty > 0.0 {
                        println!(
                            "  Warehouse {} → Store {}: {:>5.1} units @ ${}/u",
                            i + 1,
                            j + 1,
                            qty,
                            costs[i][j]
                        );
                    }
                }
            }
            println!("\nTotal Cost: ${:.2}", result.optimal_cost);

            match DummyKind::try_from(result.dummy) {
                Ok(DummyKind::Origin) => {
                    println!("Unmet demand: {:.1} units", result.dummy_amount)
                }
                Ok(DummyKind::Destination) => {
                    println!("Unused supply: {:.1} units", result.dummy_amount)
                }
                _ => {}
            }

            if let Some(stats) = result.statistics {
                println!("\nSolver Statistics:");
                println!("  Backend:      {}", stats.solver_backend);
                println!("  Initial cost: {:.2}", stats.initial_cost);
                println!("  Pivots:       {}", stats.iterations);
                println!("  Degenerate:   {}", stats.degenerate_pivots);
                println!("  Solve Time:   {:.2} ms", stats.solve_time_ms);
            }
        }
        Ok(SolutionStatus::IterationLimit) | Ok(SolutionStatus::TimeLimit) => {
            println!("⚠ Solver stopped early at cost ${:.2}", result.optimal_cost);
        }
        _ => {
            println!("✗ Solver error");
        }
    }

    println!("\nMessage: {}", result.message);

    Ok(())
}
