// src/middleware/actor.rs

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::models::history::DEFAULT_ACTOR;

pub const ACTOR_HEADER: &str = "x-user-info";

/// Label written to `user_info` on history entries created by this request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor(pub String);

impl Default for Actor {
    fn default() -> Self {
        Actor(DEFAULT_ACTOR.to_string())
    }
}

impl<S> FromRequestParts<S> for Actor
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let actor = parts
            .headers
            .get(ACTOR_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(|value| Actor(value.to_string()))
            .unwrap_or_default();

        Ok(actor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    async fn extract(header: Option<&str>) -> Actor {
        let mut builder = Request::builder().uri("/api/products/1");
        if let Some(value) = header {
            builder = builder.header(ACTOR_HEADER, value);
        }
        let (mut parts, _) = builder.body(()).unwrap().into_parts();
        Actor::from_request_parts(&mut parts, &()).await.unwrap()
    }

    #[tokio::test]
    async fn defaults_to_system() {
        assert_eq!(extract(None).await, Actor("System".into()));
        assert_eq!(extract(Some("   ")).await, Actor("System".into()));
    }

    #[tokio::test]
    async fn reads_trimmed_header() {
        assert_eq!(extract(Some(" warehouse-2 ")).await, Actor("warehouse-2".into()));
    }
}
