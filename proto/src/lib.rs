//! Wire types and the `Racing` gRPC service, generated from `proto/racing.proto`.

tonic::include_proto!("racing");
