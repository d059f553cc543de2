//! HTTP plumbing for the pipeline API.
//!
//! Every request is built here, decorated by the [`RequestAuthenticator`]
//! exactly once, and handed to an [`HttpTransport`]. Nothing is retried: a
//! failure is returned to the caller as-is.

use crate::{
    config::ApiConfig,
    errors::ApiError,
    models::{ErrorPayload, SessionAuditEvent, SessionEventOutcome, SessionEventType},
    services::{authenticator::RequestAuthenticator, metrics::ApiMetrics, session::SessionStore},
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::{
    Client, Method, Request, Response,
    header::{CONTENT_TYPE, HeaderValue},
};
use serde::{Serialize, de::DeserializeOwned};
use std::{sync::Arc, time::Duration};
use tracing::{error, info, warn};
use url::Url;
use uuid::Uuid;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Sends a fully built request. The seam tests replace.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn execute(&self, request: Request) -> Result<Response, reqwest::Error>;
}

#[async_trait]
impl HttpTransport for Client {
    async fn execute(&self, request: Request) -> Result<Response, reqwest::Error> {
        Client::execute(self, request).await
    }
}

/// Request context for logging and metrics
#[derive(Debug, Clone)]
pub struct RequestContext {
    pub operation: &'static str,
    pub method: Method,
    pub url: String,
    pub request_id: String,
    pub start_time: DateTime<Utc>,
}

/// Client for the pipeline API
#[derive(Clone)]
pub struct ApiClient {
    base_url: Url,
    builder: Client,
    transport: Arc<dyn HttpTransport>,
    authenticator: RequestAuthenticator,
    session: SessionStore,
    metrics: Option<ApiMetrics>,
    detailed_logging: bool,
}

impl ApiClient {
    /// Create a client that talks to the network
    pub fn new(config: &ApiConfig, session: SessionStore) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_seconds))
            .connect_timeout(Duration::from_secs(config.connect_timeout_seconds))
            .build()?;
        let transport: Arc<dyn HttpTransport> = Arc::new(client.clone());
        Self::with_transport(config, session, client, transport)
    }

    /// Create a client that sends through `transport`
    pub fn with_transport(
        config: &ApiConfig,
        session: SessionStore,
        builder: Client,
        transport: Arc<dyn HttpTransport>,
    ) -> Result<Self, ApiError> {
        let base_url = Url::parse(&config.base_url)?;
        Ok(Self {
            base_url,
            builder,
            transport,
            authenticator: RequestAuthenticator::new(session.clone()),
            session,
            metrics: None,
            detailed_logging: config.enable_detailed_logging,
        })
    }

    pub fn with_metrics(mut self, metrics: ApiMetrics) -> Self {
        self.metrics = Some(metrics);
        self
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Absolute URL for `segments` under the base path. Segments are
    /// percent-encoded, so ids cannot escape their path position.
    pub fn endpoint(&self, segments: &[&str]) -> Result<Url, ApiError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ApiError::InvalidUrl(url::ParseError::RelativeUrlWithCannotBeABaseBase))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// GET and decode a JSON body
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        operation: &'static str,
        segments: &[&str],
    ) -> Result<T, ApiError> {
        let response = self
            .send(operation, Method::GET, segments, None::<&()>)
            .await?;
        decode(response).await
    }

    /// Send `body` and decode a JSON response
    pub async fn send_json<B, T>(
        &self,
        operation: &'static str,
        method: Method,
        segments: &[&str],
        body: &B,
    ) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self.send(operation, method, segments, Some(body)).await?;
        decode(response).await
    }

    /// Send an optional body and ignore the response body
    pub async fn send_empty<B>(
        &self,
        operation: &'static str,
        method: Method,
        segments: &[&str],
        body: Option<&B>,
    ) -> Result<(), ApiError>
    where
        B: Serialize + ?Sized,
    {
        self.send(operation, method, segments, body).await.map(|_| ())
    }

    /// Build, authenticate and send one request; non-2xx becomes `ApiError::Status`
    pub async fn send<B>(
        &self,
        operation: &'static str,
        method: Method,
        segments: &[&str],
        body: Option<&B>,
    ) -> Result<Response, ApiError>
    where
        B: Serialize + ?Sized,
    {
        let url = self.endpoint(segments)?;
        let context = RequestContext {
            operation,
            method: method.clone(),
            url: url.to_string(),
            request_id: Uuid::new_v4().to_string(),
            start_time: Utc::now(),
        };

        let mut builder = self.builder.request(method, url);
        if let Some(body) = body {
            let bytes = serde_json::to_vec(body)
                .map_err(|e| ApiError::SerializationError(e.to_string()))?;
            builder = builder
                .header(CONTENT_TYPE, HeaderValue::from_static("application/json"))
                .body(bytes);
        }
        let request = builder.header(REQUEST_ID_HEADER, &context.request_id).build()?;

        let transport = Arc::clone(&self.transport);
        let result = self
            .authenticator
            .intercept(request, |req| async move { transport.execute(req).await })
            .await;

        let outcome = match result {
            Ok(response) if response.status().is_success() => {
                self.log_completion(&context, response.status().as_u16());
                Ok(response)
            }
            Ok(response) => Err(self.status_error(&context, response).await),
            Err(e) => {
                error!(
                    operation = context.operation,
                    method = %context.method,
                    url = %context.url,
                    request_id = %context.request_id,
                    error = %e,
                    "Request failed with network error"
                );
                Err(ApiError::NetworkError(e))
            }
        };

        self.record_metrics(&context, &outcome);
        outcome
    }

    async fn status_error(&self, context: &RequestContext, response: Response) -> ApiError {
        let status = response.status().as_u16();
        let message = response
            .bytes()
            .await
            .ok()
            .and_then(|raw| serde_json::from_slice::<ErrorPayload>(&raw).ok())
            .and_then(|payload| payload.message)
            .filter(|m| !m.is_empty());

        warn!(
            operation = context.operation,
            method = %context.method,
            url = %context.url,
            request_id = %context.request_id,
            status,
            message = ?message,
            "Request rejected by server"
        );

        // A 401 does not clear the session.
        if status == 401 && self.session.is_logged_in() {
            SessionAuditEvent::new(SessionEventType::UnauthorizedResponse, SessionEventOutcome::Failure)
                .with_role(self.session.role())
                .with_details(Some(format!("{} {}", context.method, context.url)))
                .log();
        }

        ApiError::Status { status, message }
    }

    fn log_completion(&self, context: &RequestContext, status: u16) {
        if self.detailed_logging {
            let elapsed_ms = (Utc::now() - context.start_time).num_milliseconds();
            info!(
                operation = context.operation,
                method = %context.method,
                url = %context.url,
                request_id = %context.request_id,
                status,
                duration_ms = elapsed_ms,
                "Request completed successfully"
            );
        }
    }

    fn record_metrics(&self, context: &RequestContext, outcome: &Result<Response, ApiError>) {
        let Some(metrics) = &self.metrics else {
            return;
        };
        let label = match outcome {
            Ok(_) => "success",
            Err(ApiError::Status { .. }) => "http_error",
            Err(ApiError::NetworkError(_)) => "network_error",
            Err(_) => "error",
        };
        let elapsed = (Utc::now() - context.start_time)
            .to_std()
            .unwrap_or_default();
        metrics.record(context.operation, label, elapsed);
    }
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    let raw = response.bytes().await?;
    serde_json::from_slice(&raw).map_err(|e| ApiError::Decode(e.to_string()))
}
