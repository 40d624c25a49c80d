use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    extract::Request,
    response::IntoResponse,
};
use jsonschema::Validator;
use serde_json::Value;

use crate::error::ApiError;
use crate::schema::{self, SchemaError};

use super::{Flow, Interceptor};

/// Checks a JSON request body against a compiled schema.
///
/// The body is buffered, validated and put back so the handler can read it
/// again.
pub struct SchemaValidation {
    validator: Arc<Validator>,
    body_limit: usize,
}

impl SchemaValidation {
    /// Compile `raw` up front. Empty text accepts any object.
    pub fn new(raw: &str, body_limit: usize) -> Result<Self, SchemaError> {
        Ok(Self {
            validator: Arc::new(schema::compile(raw)?),
            body_limit,
        })
    }

    fn check(&self, bytes: &[u8]) -> Result<(), ApiError> {
        let document: Value = serde_json::from_slice(bytes)
            .map_err(|_| ApiError::invalid_json("Invalid Request Payload"))?;
        if !document.is_object() {
            return Err(ApiError::invalid_json("Invalid Request Payload"));
        }

        let violations: Vec<String> = self
            .validator
            .iter_errors(&document)
            .map(|error| error.to_string())
            .collect();

        if violations.is_empty() {
            Ok(())
        } else {
            Err(ApiError::validation_error(violations.join(", ")))
        }
    }
}

#[async_trait]
impl Interceptor for SchemaValidation {
    fn name(&self) -> &'static str {
        "schema"
    }

    async fn intercept(&self, request: Request) -> Flow {
        let (parts, body) = request.into_parts();

        let bytes = match to_bytes(body, self.body_limit).await {
            Ok(bytes) => bytes,
            Err(err) => {
                tracing::debug!("could not read request body: {}", err);
                return Flow::Respond(ApiError::invalid_json("Invalid Request Payload").into_response());
            }
        };

        if let Err(err) = self.check(&bytes) {
            tracing::debug!("{} {} failed validation: {}", parts.method, parts.uri.path(), err);
            return Flow::Respond(err.into_response());
        }

        Flow::Continue(Request::from_parts(parts, Body::from(bytes)))
    }
}
