// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! HTTP rendering of command results

use axum::{
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    Json,
};
use sp_core::ActionResult;
use sp_rest_api_contract::{FieldErrors, ProblemDetails, RedirectResponse};

/// Name of the page model carried by a view response
pub const VIEW_HEADER: &str = "x-sapphire-view";

/// Wrapper rendering an [`ActionResult`]
pub struct ActionResponse(pub ActionResult);

impl From<ActionResult> for ActionResponse {
    fn from(result: ActionResult) -> Self {
        Self(result)
    }
}

impl IntoResponse for ActionResponse {
    fn into_response(self) -> Response {
        match self.0 {
            ActionResult::View(view) => ([(VIEW_HEADER, view.name())], Json(view)).into_response(),
            ActionResult::Redirect(location) => Redirect::to(&location).into_response(),
            ActionResult::ScriptRedirect(location) => Json(RedirectResponse {
                redirect_url: location,
            })
            .into_response(),
            ActionResult::Json(payload) => Json(payload).into_response(),
            ActionResult::Invalid(errors) => invalid(errors).into_response(),
            ActionResult::NotFound => not_found().into_response(),
            ActionResult::Empty => StatusCode::NO_CONTENT.into_response(),
        }
    }
}

fn invalid(errors: FieldErrors) -> (StatusCode, Json<ProblemDetails>) {
    (
        StatusCode::BAD_REQUEST,
        Json(ProblemDetails {
            problem_type: "https://docs.example.com/errors/validation".to_string(),
            title: "Validation Error".to_string(),
            status: Some(StatusCode::BAD_REQUEST.as_u16()),
            detail: "Request validation failed".to_string(),
            errors,
        }),
    )
}

fn not_found() -> (StatusCode, Json<ProblemDetails>) {
    (
        StatusCode::NOT_FOUND,
        Json(ProblemDetails {
            problem_type: "https://docs.example.com/errors/not-found".to_string(),
            title: "Not Found".to_string(),
            status: Some(StatusCode::NOT_FOUND.as_u16()),
            detail: "The requested branch or file does not exist".to_string(),
            errors: Default::default(),
        }),
    )
}
