// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Decision core of the Sapphire repository pages
//!
//! Every command follows the same shape: query the collaborators it needs,
//! plan the state change as a pure function producing an outcome and an
//! ordered list of [`effects::Effect`]s, then run the effects in order
//! against the collaborators. The [`orchestrator::RepositoryOrchestrator`]
//! turns the outcome into an [`result::ActionResult`] for the transport.

pub mod analysis;
pub mod branches;
pub mod collaborators;
pub mod context;
pub mod effects;
pub mod error;
pub mod ignore;
pub mod normalize;
pub mod orchestrator;
pub mod patterns;
pub mod rename;
pub mod result;
pub mod security;
pub mod urls;

pub use collaborators::*;
pub use context::PageContext;
pub use error::{CoreError, CoreResult};
pub use orchestrator::{Collaborators, RepositoryCommand, RepositoryOrchestrator};
pub use result::{ActionResult, JsonPayload, PageView};
pub use urls::{RoutePaths, UrlBuilder};
