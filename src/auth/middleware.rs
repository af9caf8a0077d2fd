// Bearer token extraction from the Authorization header

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header, request::Parts},
};
use std::convert::Infallible;

/// Extracts the bearer token from `Authorization: Bearer <token>`, if any.
///
/// Extraction never rejects: a missing or non-Bearer header yields `None`
/// and the auth service decides the failure (`MissingToken`), keeping the
/// whole token lifecycle behind one boundary instead of splitting it
/// between middleware and service.
#[derive(Debug, Clone)]
pub struct Bearer(pub Option<String>);

#[async_trait]
impl<S> FromRequestParts<S> for Bearer
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .filter(|token| !token.is_empty())
            .map(str::to_string);

        Ok(Bearer(token))
    }
}
