// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Sapphire repository-page REST API server
//!
//! Exposes the repository page commands of `sp-core` over HTTP. Each request
//! resolves a page context from the path and the viewer headers, runs one
//! command through the orchestrator and renders the resulting action.

pub mod auth;
pub mod config;
pub mod context;
pub mod dependencies;
pub mod error;
pub mod handlers;
pub mod in_memory;
pub mod response;
pub mod server;
pub mod state;

pub use config::ServerConfig;
pub use error::{ServerError, ServerResult};
pub use server::Server;
