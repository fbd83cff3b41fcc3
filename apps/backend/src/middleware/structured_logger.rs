//! Access log: one `request_completed` event per request.
//!
//! Paths are logged by route template (`/api/leagues/{league_id}`) when the
//! router matched one, so ids don't explode log cardinality. `/health` probes
//! drop to debug.

use std::future::{ready, Ready};
use std::time::Instant;

use actix_web::dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::http::StatusCode;
use actix_web::{Error as ActixError, HttpMessage};
use futures_util::future::LocalBoxFuture;
use tracing::{debug, error, info, warn};

pub struct StructuredLogger;

impl<S, B> Transform<S, ServiceRequest> for StructuredLogger
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = ActixError>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = ActixError;
    type InitError = ();
    type Transform = StructuredLoggerMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(StructuredLoggerMiddleware { service }))
    }
}

pub struct StructuredLoggerMiddleware<S> {
    service: S,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Level {
    Debug,
    Info,
    Warn,
    Error,
}

fn level_for(route: &str, status: StatusCode) -> Level {
    if status.is_server_error() {
        Level::Error
    } else if status.is_client_error() {
        Level::Warn
    } else if route == "/health" {
        Level::Debug
    } else {
        Level::Info
    }
}

impl<S, B> Service<ServiceRequest> for StructuredLoggerMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = ActixError>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = ActixError;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let start = Instant::now();
        let method = req.method().to_string();
        let route = req
            .match_pattern()
            .unwrap_or_else(|| req.path().to_string());
        let trace_id = req
            .extensions()
            .get::<String>()
            .cloned()
            .unwrap_or_else(|| "unknown".to_string());

        let fut = self.service.call(req);

        Box::pin(async move {
            let result = fut.await;

            let status = match &result {
                Ok(res) => res.status(),
                Err(err) => err.as_response_error().status_code(),
            };
            let code = status.as_u16();
            let duration_us = start.elapsed().as_micros() as u64;

            match level_for(&route, status) {
                Level::Error => error!(http.method = %method, http.route = %route, http.status_code = code, duration_us, trace_id = %trace_id, "request_completed"),
                Level::Warn => warn!(http.method = %method, http.route = %route, http.status_code = code, duration_us, trace_id = %trace_id, "request_completed"),
                Level::Info => info!(http.method = %method, http.route = %route, http.status_code = code, duration_us, trace_id = %trace_id, "request_completed"),
                Level::Debug => debug!(http.method = %method, http.route = %route, http.status_code = code, duration_us, trace_id = %trace_id, "request_completed"),
            }

            result
        })
    }
}
