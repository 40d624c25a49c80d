use std::net::SocketAddr;

use async_trait::async_trait;
use axum::extract::{ConnectInfo, Request};

use super::{Flow, Interceptor};

/// Logs method, path and client address of each request it sees.
#[derive(Debug, Default, Clone, Copy)]
pub struct RequestLogger;

#[async_trait]
impl Interceptor for RequestLogger {
    fn name(&self) -> &'static str {
        "logging"
    }

    async fn intercept(&self, request: Request) -> Flow {
        let client = request
            .extensions()
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| addr.to_string())
            .unwrap_or_else(|| "unknown".to_string());

        tracing::info!(
            method = %request.method(),
            path = %request.uri().path(),
            client = %client,
            "request"
        );

        Flow::Continue(request)
    }
}
