//! Per-request trace id.
//!
//! The id is stored in the request extensions as a `String`, made task-local
//! through [`trace_ctx`] for the rest of the chain, and returned in
//! `x-trace-id` on every response. Clients may supply their own id through
//! `x-request-id`; it is reused when it looks sane.

use actix_web::dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::http::header::{HeaderName, HeaderValue};
use actix_web::HttpMessage;
use futures_util::future::{ready, LocalBoxFuture, Ready};
use lazy_regex::regex_is_match;
use uuid::Uuid;

use crate::trace_ctx;

pub const TRACE_ID_HEADER: &str = "x-trace-id";
pub const CLIENT_REQUEST_ID_HEADER: &str = "x-request-id";

pub struct RequestTrace;

impl<S, B> Transform<S, ServiceRequest> for RequestTrace
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = actix_web::Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = actix_web::Error;
    type InitError = ();
    type Transform = RequestTraceMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequestTraceMiddleware { service }))
    }
}

pub struct RequestTraceMiddleware<S> {
    service: S,
}

/// Client-supplied id, if it is 8-64 characters of `[A-Za-z0-9-]`.
pub fn accepted_client_id(raw: &str) -> Option<&str> {
    regex_is_match!(r"^[A-Za-z0-9-]{8,64}$", raw).then_some(raw)
}

fn assign_trace_id(req: &ServiceRequest) -> String {
    req.headers()
        .get(CLIENT_REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .and_then(accepted_client_id)
        .map(str::to_string)
        .unwrap_or_else(|| Uuid::new_v4().to_string())
}

impl<S, B> Service<ServiceRequest> for RequestTraceMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = actix_web::Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let trace_id = assign_trace_id(&req);
        req.extensions_mut().insert(trace_id.clone());

        // Error responses built synchronously inside inner middleware read the
        // task-local too, so the call itself runs inside the scope.
        let fut = trace_ctx::sync_with_trace_id(trace_id.clone(), || self.service.call(req));

        Box::pin(trace_ctx::with_trace_id(trace_id.clone(), async move {
            let mut res = fut.await?;
            let headers = res.headers_mut();
            if !headers.contains_key(TRACE_ID_HEADER) {
                if let Ok(value) = HeaderValue::from_str(&trace_id) {
                    headers.insert(HeaderName::from_static(TRACE_ID_HEADER), value);
                }
            }
            Ok(res)
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_ids_are_screened() {
        assert_eq!(accepted_client_id("abcd-1234"), Some("abcd-1234"));
        assert_eq!(accepted_client_id("short"), None);
        assert_eq!(accepted_client_id("has space in it"), None);
        assert_eq!(accepted_client_id(&"a".repeat(65)), None);
    }
}
