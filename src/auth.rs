use async_trait::async_trait;
use axum::{extract::FromRequestParts, http::request::Parts};
use std::convert::Infallible;
use uuid::Uuid;

/// Actor identity propagated by the upstream auth layer. This service trusts
/// the identity it is handed; token validation and session issuance live in
/// the auth service in front of it.
const ACTOR_HEADER: &str = "x-actor-id";

#[derive(Debug, Clone, Copy, Default)]
pub struct Actor {
    pub id: Option<Uuid>,
}

#[async_trait]
impl<S> FromRequestParts<S> for Actor
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let id = parts
            .headers
            .get(ACTOR_HEADER)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| Uuid::parse_str(v).ok());
        Ok(Actor { id })
    }
}
