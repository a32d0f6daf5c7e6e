// Application module: gRPC use cases

pub mod grpc_service;
pub mod mappers;

pub use grpc_service::GrpcTransportService;
