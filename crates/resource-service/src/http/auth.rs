//! Caller identification.
//!
//! Credentials are checked upstream. The proxy in front of this service forwards the
//! caller's roles in a single header (default `x-roles: USER,ADMIN`); [`identify_caller`]
//! turns that header into a [`Caller`] request extension. No header means anonymous.

use async_trait::async_trait;
use axum::extract::{FromRequestParts, Request, State};
use axum::http::request::Parts;
use axum::http::HeaderName;
use axum::middleware::Next;
use axum::response::Response;
use resource_framework::Roles;
use std::convert::Infallible;
use tracing::debug;

/// Identity attached to one request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Caller {
    pub roles: Roles,
}

/// Name of the header the roles are read from.
#[derive(Debug, Clone)]
pub struct RoleHeader(pub HeaderName);

/// Middleware that reads the role header into a [`Caller`] extension.
///
/// Repeated headers are merged; unknown role names are ignored.
pub async fn identify_caller(
    State(header): State<RoleHeader>,
    mut request: Request,
    next: Next,
) -> Response {
    let list = request
        .headers()
        .get_all(&header.0)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .collect::<Vec<_>>()
        .join(",");
    let roles = Roles::parse_list(&list);
    debug!(%roles, method = %request.method(), uri = %request.uri(), "Caller identified");

    request.extensions_mut().insert(Caller { roles });
    next.run(request).await
}

#[async_trait]
impl<S: Send + Sync> FromRequestParts<S> for Caller {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(parts.extensions.get::<Caller>().cloned().unwrap_or_default())
    }
}
