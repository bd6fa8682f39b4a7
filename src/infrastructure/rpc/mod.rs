//! Orders-Service gRPC Client

pub mod order_gateway;

pub use order_gateway::{
    GatewayError, GrpcOrdersApi, OrderGateway, OrderGatewayConfig, OrdersApi,
};

pub mod proto {
    pub mod order {
        pub mod v1 {
            tonic::include_proto!("order.v1");
        }
    }
}
