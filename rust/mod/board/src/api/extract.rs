use axum::extract::{FromRequest, FromRequestParts};
use axum::http::HeaderMap;
use axum::http::request::Parts;
use tracing::warn;

use dearbaby_core::ServiceError;

use crate::api::AppState;
use crate::identity::Identity;

/// JSON body whose rejection renders as the `{"error": ...}` envelope.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(ServiceError))]
pub struct Payload<T>(pub T);

/// The caller behind `Authorization: Bearer <token>`, resolved by the
/// identity provider.
///
/// Handlers that take a `Caller` reject with 401 before running when the
/// header is missing or the token does not verify.
#[derive(Debug, Clone)]
pub struct Caller(pub Identity);

impl FromRequestParts<AppState> for Caller {
    type Rejection = ServiceError;

    async fn from_request_parts(parts: &mut Parts, svc: &AppState) -> Result<Self, Self::Rejection> {
        let token = extract_bearer(&parts.headers)
            .ok_or_else(|| ServiceError::Unauthorized("Unauthorized".into()))?;

        svc.identity().get_user(token).map(Caller).map_err(|e| {
            warn!(path = %parts.uri.path(), error = %e, "bearer token rejected");
            ServiceError::Unauthorized("Unauthorized".into())
        })
    }
}

/// Extract the Bearer token from the Authorization header.
fn extract_bearer(headers: &HeaderMap) -> Option<&str> {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .filter(|t| !t.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bearer_parsing() {
        let mut headers = HeaderMap::new();
        assert_eq!(extract_bearer(&headers), None);

        headers.insert("authorization", "Basic abc".parse().unwrap());
        assert_eq!(extract_bearer(&headers), None);

        headers.insert("authorization", "Bearer ".parse().unwrap());
        assert_eq!(extract_bearer(&headers), None);

        headers.insert("authorization", "Bearer tok".parse().unwrap());
        assert_eq!(extract_bearer(&headers), Some("tok"));
    }
}
