//! Ordered request interceptors.
//!
//! Each route gets its own [`Pipeline`]. Interceptors run in registration
//! order; any one of them may answer the request itself, in which case the
//! rest of the chain and the handler are skipped.

pub mod auth;
pub mod logging;
pub mod validate;

use std::convert::Infallible;
use std::sync::Arc;
use std::task::{Context, Poll};

use async_trait::async_trait;
use axum::extract::Request;
use axum::response::{IntoResponse, Response};
use futures::future::BoxFuture;
use tower::{Layer, Service};

pub use auth::{AuthInterceptor, AuthUser};
pub use logging::RequestLogger;
pub use validate::SchemaValidation;

/// Outcome of a single interceptor.
pub enum Flow {
    /// Hand the (possibly rewritten) request to the next stage.
    Continue(Request),
    /// Stop here and send this response.
    Respond(Response),
}

#[async_trait]
pub trait Interceptor: Send + Sync {
    fn name(&self) -> &'static str;

    async fn intercept(&self, request: Request) -> Flow;
}

#[derive(Clone, Default)]
pub struct Pipeline {
    interceptors: Vec<Arc<dyn Interceptor>>,
}

impl Pipeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an interceptor to the end of the chain.
    pub fn with(mut self, interceptor: impl Interceptor + 'static) -> Self {
        self.interceptors.push(Arc::new(interceptor));
        self
    }

    pub fn with_shared(mut self, interceptor: Arc<dyn Interceptor>) -> Self {
        self.interceptors.push(interceptor);
        self
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.interceptors.iter().map(|i| i.name()).collect()
    }

    /// Run every interceptor in order, stopping at the first that responds.
    pub async fn run(&self, mut request: Request) -> Flow {
        for interceptor in &self.interceptors {
            match interceptor.intercept(request).await {
                Flow::Continue(next) => request = next,
                Flow::Respond(response) => {
                    tracing::debug!("{} answered the request", interceptor.name());
                    return Flow::Respond(response);
                }
            }
        }
        Flow::Continue(request)
    }

    pub fn layer(&self) -> PipelineLayer {
        PipelineLayer {
            pipeline: Arc::new(self.clone()),
        }
    }
}

/// Tower layer that runs a [`Pipeline`] in front of the wrapped service.
#[derive(Clone)]
pub struct PipelineLayer {
    pipeline: Arc<Pipeline>,
}

impl<S> Layer<S> for PipelineLayer {
    type Service = PipelineService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        PipelineService {
            inner,
            pipeline: self.pipeline.clone(),
        }
    }
}

#[derive(Clone)]
pub struct PipelineService<S> {
    inner: S,
    pipeline: Arc<Pipeline>,
}

impl<S> Service<Request> for PipelineService<S>
where
    S: Service<Request, Error = Infallible> + Clone + Send + 'static,
    S::Response: IntoResponse,
    S::Future: Send + 'static,
{
    type Response = Response;
    type Error = Infallible;
    type Future = BoxFuture<'static, Result<Response, Infallible>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, request: Request) -> Self::Future {
        // Take the service that was driven to readiness and leave a clone behind.
        let clone = self.inner.clone();
        let mut inner = std::mem::replace(&mut self.inner, clone);
        let pipeline = self.pipeline.clone();

        Box::pin(async move {
            match pipeline.run(request).await {
                Flow::Respond(response) => Ok(response),
                Flow::Continue(request) => {
                    let response = inner.call(request).await?;
                    Ok(response.into_response())
                }
            }
        })
    }
}
