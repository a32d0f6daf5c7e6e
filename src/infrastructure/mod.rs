// Infrastructure module: gRPC server lifecycle

pub mod server;

pub use server::{init_logging, start_server, ServerConfig};
