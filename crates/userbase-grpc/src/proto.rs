//! Generated protobuf types.

/// `userbase.user` package.
pub mod user {
    tonic::include_proto!("userbase.user");
}

/// Standard gRPC health checking protocol.
pub mod health {
    tonic::include_proto!("grpc.health.v1");
}
