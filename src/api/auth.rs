use async_trait::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::error::ApiError;

/// Authenticated caller identity.
///
/// Token verification happens upstream; the auth gateway injects the
/// resolved account id as `x-user-id`. Requests without it are rejected
/// before any handler logic runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthUser(pub i32);

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .headers
            .get("x-user-id")
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.parse::<i32>().ok())
            .map(AuthUser)
            .ok_or(ApiError::Unauthorized)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    fn parts_with_header(value: Option<&str>) -> Parts {
        let mut builder = Request::builder().uri("/api/feed");
        if let Some(v) = value {
            builder = builder.header("x-user-id", v);
        }
        let (parts, _) = builder.body(()).expect("request builds").into_parts();
        parts
    }

    #[tokio::test]
    async fn extracts_the_caller_id() {
        let mut parts = parts_with_header(Some("42"));
        let user = AuthUser::from_request_parts(&mut parts, &())
            .await
            .expect("valid header");
        assert_eq!(user, AuthUser(42));
    }

    #[tokio::test]
    async fn missing_header_is_unauthorized() {
        let mut parts = parts_with_header(None);
        let err = AuthUser::from_request_parts(&mut parts, &())
            .await
            .expect_err("no identity");
        assert!(matches!(err, ApiError::Unauthorized));
    }

    #[tokio::test]
    async fn garbage_header_is_unauthorized() {
        let mut parts = parts_with_header(Some("not-a-number"));
        let err = AuthUser::from_request_parts(&mut parts, &())
            .await
            .expect_err("unparseable identity");
        assert!(matches!(err, ApiError::Unauthorized));
    }
}
