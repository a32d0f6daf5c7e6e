// Infrastructure: Server setup and configuration
// Single Responsibility: Manage server lifecycle and configuration

use std::net::SocketAddr;
use tonic::transport::Server;

use crate::application::mappers::transport_solver::transportation_solver_server::TransportationSolverServer;
use crate::application::GrpcTransportService;
use crate::domain::value_objects::SolverBackend;

/// Listen address used when `TRANSOPT_ADDRESS` is not set
pub const DEFAULT_ADDRESS: &str = "0.0.0.0:50051";

/// Log filter used when `RUST_LOG` is not set
pub const DEFAULT_LOG_FILTER: &str = "warn";

/// Route the engine's `log` records to stderr, filtered by `RUST_LOG`.
///
/// Returns `false` if a logger was already installed.
pub fn init_logging() -> bool {
    let env = env_logger::Env::default().default_filter_or(DEFAULT_LOG_FILTER);
    env_logger::Builder::from_env(env).try_init().is_ok()
}

pub struct ServerConfig {
    pub address: SocketAddr,
    pub default_backend: SolverBackend,
}

impl ServerConfig {
    pub fn new(address: SocketAddr) -> Self {
        Self {
            address,
            default_backend: SolverBackend::TransportSimplex,
        }
    }

    pub fn with_default_backend(mut self, backend: SolverBackend) -> Self {
        // Auto would resolve to itself
        if backend != SolverBackend::Auto {
            self.default_backend = backend;
        }
        self
    }

    /// Read `TRANSOPT_ADDRESS` and `TRANSOPT_BACKEND` from the environment
    pub fn from_env() -> Result<Self, Box<dyn std::error::Error>> {
        let address = std::env::var("TRANSOPT_ADDRESS")
            .unwrap_or_else(|_| DEFAULT_ADDRESS.to_string())
            .parse()?;

        let mut config = Self::new(address);
        if let Ok(backend) = std::env::var("TRANSOPT_BACKEND") {
            config = config.with_default_backend(backend.parse()?);
        }
        Ok(config)
    }
}

pub async fn start_server(config: ServerConfig) -> Result<(), Box<dyn std::error::Error>> {
    let service = GrpcTransportService::new(config.default_backend);

    print_banner(&config);

    Server::builder()
        .add_service(TransportationSolverServer::new(service))
        .serve(config.address)
        .await?;

    Ok(())
}

fn print_banner(config: &ServerConfig) {
    println!("\n╔═══════════════════════════════════════════════════════════╗");
    println!("║  TransOpt - Transportation Problem Solver                 ║");
    println!("╠═══════════════════════════════════════════════════════════╣");
    println!("║  Default backend: {:39} ║", config.default_backend.to_string());
    println!("║  Listening on: {:42} ║", config.address);
    println!("╠═══════════════════════════════════════════════════════════╣");
    println!("║  Supported Features:                                      ║");
    println!("║    ✓ Automatic supply/demand balancing                    ║");
    println!("║    ✓ Vogel / northwest-corner starting solutions          ║");
    println!("║    ✓ MODI pivoting with dual potentials                   ║");
    println!("║    ✓ Independent optimality certificate                   ║");
    println!("║    ✓ Streaming and batch solves                           ║");
    println!("╚═══════════════════════════════════════════════════════════╝");
    println!("\n🚚 Ready to solve transportation problems!\n");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn logger_is_installed_once() {
        init_logging();
        assert!(!init_logging());
    }

    #[test]
    fn auto_does_not_replace_default_backend() {
        let config = ServerConfig::new(DEFAULT_ADDRESS.parse().unwrap())
            .with_default_backend(SolverBackend::Auto);
        assert_eq!(config.default_backend, SolverBackend::TransportSimplex);

        let config = config.with_default_backend(SolverBackend::Highs);
        assert_eq!(config.default_backend, SolverBackend::Highs);
    }
}
