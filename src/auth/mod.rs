//! Identity: turn a request credential into the owner all data is scoped to.
//!
//! Token issuance lives elsewhere; this side only verifies HS256 tokens whose
//! `id` claim names the owner.

use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{ApiError, ApiResult};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct Claims {
    /// Owner identifier.
    pub(crate) id: String,
    pub(crate) exp: u64,
}

/// Verified caller for one request. Built fresh from the credential on
/// every request and dropped with it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Session {
    pub(crate) owner: String,
}

pub(crate) struct JwtVerifier {
    key: DecodingKey,
    validation: Validation,
}

impl JwtVerifier {
    pub(crate) fn new(secret: &str) -> Self {
        Self {
            key: DecodingKey::from_secret(secret.as_bytes()),
            validation: Validation::new(Algorithm::HS256),
        }
    }

    /// `authorization` is the raw header value, e.g. `"Bearer <token>"`.
    pub(crate) fn verify(&self, authorization: Option<&str>) -> ApiResult<Session> {
        let token = authorization
            .and_then(credential_from_header)
            .ok_or(ApiError::MissingCredential)?;

        let data = decode::<Claims>(token, &self.key, &self.validation).map_err(|e| {
            warn!(error = %e, "rejected credential");
            ApiError::InvalidCredential
        })?;

        if data.claims.id.trim().is_empty() {
            warn!("credential has an empty owner id");
            return Err(ApiError::InvalidCredential);
        }
        Ok(Session {
            owner: data.claims.id,
        })
    }
}

/// The credential is the second space-separated part of the header.
pub(crate) fn credential_from_header(value: &str) -> Option<&str> {
    value.split(' ').nth(1).filter(|token| !token.is_empty())
}
