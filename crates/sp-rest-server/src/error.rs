// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Server error types and handling

use crate::in_memory::StoreError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use sp_core::CoreError;
use sp_rest_api_contract::{field_errors, ApiContractError, ProblemDetails};

/// Server result type
pub type ServerResult<T> = Result<T, ServerError>;

/// Server error types
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("Authentication error: {0}")]
    Auth(String),

    #[error("Authorization error: {0}")]
    Authorization(String),

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("Repository not found: {0}")]
    RepositoryNotFound(String),

    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error("Unsupported action: {0}")]
    UnsupportedAction(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl ServerError {
    /// Convert error to Problem+JSON response
    pub fn to_problem(&self) -> ProblemDetails {
        match self {
            ServerError::Auth(msg) => ProblemDetails {
                problem_type: "https://docs.example.com/errors/auth".to_string(),
                title: "Authentication Failed".to_string(),
                status: Some(StatusCode::UNAUTHORIZED.as_u16()),
                detail: msg.clone(),
                errors: Default::default(),
            },
            ServerError::Authorization(msg) => ProblemDetails {
                problem_type: "https://docs.example.com/errors/authz".to_string(),
                title: "Authorization Failed".to_string(),
                status: Some(StatusCode::FORBIDDEN.as_u16()),
                detail: msg.clone(),
                errors: Default::default(),
            },
            ServerError::Validation(err) => ProblemDetails {
                problem_type: "https://docs.example.com/errors/validation".to_string(),
                title: "Validation Error".to_string(),
                status: Some(StatusCode::BAD_REQUEST.as_u16()),
                detail: "Request validation failed".to_string(),
                errors: field_errors(err),
            },
            ServerError::RepositoryNotFound(key) => ProblemDetails {
                problem_type: "https://docs.example.com/errors/not-found".to_string(),
                title: "Repository Not Found".to_string(),
                status: Some(StatusCode::NOT_FOUND.as_u16()),
                detail: format!("Repository '{}' not found", key),
                errors: Default::default(),
            },
            ServerError::BadRequest(msg) => ProblemDetails {
                problem_type: "https://docs.example.com/errors/bad-request".to_string(),
                title: "Bad Request".to_string(),
                status: Some(StatusCode::BAD_REQUEST.as_u16()),
                detail: msg.clone(),
                errors: Default::default(),
            },
            ServerError::UnsupportedAction(action) => ProblemDetails {
                problem_type: "https://docs.example.com/errors/unsupported-action".to_string(),
                title: "Unsupported Action".to_string(),
                status: Some(StatusCode::INTERNAL_SERVER_ERROR.as_u16()),
                detail: format!("Action '{}' is not supported", action),
                errors: Default::default(),
            },
            ServerError::Internal(msg) => ProblemDetails {
                problem_type: "https://docs.example.com/errors/internal".to_string(),
                title: "Internal Server Error".to_string(),
                status: Some(StatusCode::INTERNAL_SERVER_ERROR.as_u16()),
                detail: msg.clone(),
                errors: Default::default(),
            },
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let problem = self.to_problem();
        let status = StatusCode::from_u16(problem.status.unwrap_or(500))
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        }
        (status, Json(problem)).into_response()
    }
}

impl From<CoreError> for ServerError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::UnsupportedAction(action) => ServerError::UnsupportedAction(action),
            CoreError::MissingBranch(branch) => {
                ServerError::Internal(format!("Branch '{}' disappeared during the update", branch))
            }
            CoreError::Collaborator(err) => err.into(),
        }
    }
}

/// Store errors keep their meaning; anything else is internal
impl From<anyhow::Error> for ServerError {
    fn from(err: anyhow::Error) -> Self {
        match err.downcast_ref::<StoreError>() {
            Some(StoreError::NotOwner { .. }) => ServerError::Authorization(err.to_string()),
            Some(StoreError::UnknownRepository(key)) => ServerError::RepositoryNotFound(key.clone()),
            _ => ServerError::Internal(err.to_string()),
        }
    }
}

impl From<ApiContractError> for ServerError {
    fn from(err: ApiContractError) -> Self {
        match err {
            ApiContractError::Validation(errors) => ServerError::Validation(errors),
            ApiContractError::Json(err) => ServerError::BadRequest(err.to_string()),
        }
    }
}

/// Convert IO errors
impl From<std::io::Error> for ServerError {
    fn from(err: std::io::Error) -> Self {
        ServerError::Internal(format!("IO error: {}", err))
    }
}
