// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Viewer identity and role
//!
//! Identity resolution happens upstream; the resolved user key and the
//! viewer's role on the repository arrive as request headers.

use crate::error::ServerError;
use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{request::Parts, HeaderMap},
};
use sp_core::SecurityPolicy;
use sp_domain_types::{Identity, RepositoryAction, RepositoryRole};
use std::str::FromStr;

pub const USER_KEY_HEADER: &str = "x-user-key";
pub const ROLE_HEADER: &str = "x-repository-role";

/// Who is looking at the page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Viewer {
    pub identity: Option<Identity>,
    pub role: RepositoryRole,
}

impl Viewer {
    /// Missing headers mean an anonymous viewer
    pub fn from_headers(headers: &HeaderMap) -> Result<Self, ServerError> {
        let identity = header_value(headers, USER_KEY_HEADER)?
            .filter(|key| !key.is_empty())
            .map(Identity::new);
        let role = match header_value(headers, ROLE_HEADER)? {
            Some(role) => RepositoryRole::from_str(role)
                .map_err(|_| ServerError::BadRequest(format!("Unknown repository role '{}'", role)))?,
            None => RepositoryRole::default(),
        };
        Ok(Self { identity, role })
    }

    pub fn identity(&self) -> Result<&Identity, ServerError> {
        self.identity
            .as_ref()
            .ok_or_else(|| ServerError::Auth(format!("Missing {} header", USER_KEY_HEADER)))
    }

    pub fn authorize(
        &self,
        policy: &dyn SecurityPolicy,
        action: RepositoryAction,
    ) -> Result<(), ServerError> {
        if policy.is_allowed(action, self.role) {
            Ok(())
        } else {
            Err(ServerError::Authorization(format!(
                "Role '{}' may not perform '{}'",
                self.role, action
            )))
        }
    }
}

fn header_value<'a>(headers: &'a HeaderMap, name: &str) -> Result<Option<&'a str>, ServerError> {
    headers
        .get(name)
        .map(|value| {
            value
                .to_str()
                .map(str::trim)
                .map_err(|_| ServerError::BadRequest(format!("Header {} is not valid text", name)))
        })
        .transpose()
}

#[async_trait]
impl<S> FromRequestParts<S> for Viewer
where
    S: Send + Sync,
{
    type Rejection = ServerError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Self::from_headers(&parts.headers)
    }
}
