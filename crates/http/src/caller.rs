//! Verified caller identity.
//!
//! The identity layer in front of this service authenticates the request and
//! forwards the caller's address in a header. The address is trusted as-is.

use axum::{extract::FromRequestParts, http::request::Parts};
use shelf_authz::Address;

use crate::error::AppError;

pub const DEFAULT_CALLER_HEADER: &str = "x-caller-address";

/// Name of the header carrying the caller address, stored in request extensions.
#[derive(Debug, Clone)]
pub struct CallerHeader(pub String);

impl Default for CallerHeader {
    fn default() -> Self {
        Self(DEFAULT_CALLER_HEADER.to_string())
    }
}

/// Extractor for the address the current call is made from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Caller(pub Address);

impl<S> FromRequestParts<S> for Caller
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let header = parts
            .extensions
            .get::<CallerHeader>()
            .cloned()
            .unwrap_or_default();

        let raw = parts
            .headers
            .get(header.0.as_str())
            .ok_or_else(|| {
                AppError::unauthorized(format!("missing caller header '{}'", header.0))
            })?
            .to_str()
            .map_err(|_| AppError::bad_request("caller header is not valid ASCII"))?;

        let address = raw
            .trim()
            .parse::<Address>()
            .map_err(|e| AppError::bad_request(format!("invalid caller address: {e}")))?;

        Ok(Caller(address))
    }
}
