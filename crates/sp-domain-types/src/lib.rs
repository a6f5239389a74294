// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Domain types for Sapphire repository pages
//!
//! This crate contains the entities shared between the request-handling core
//! and the REST server: repositories, branches, code files, the routing key
//! derived from a repository, and the exclude-pattern set.
//!
//! These types carry no behavior beyond keeping their own invariants; the
//! decisions made on top of them live in `sp-core`.

pub mod branch;
pub mod code_file;
pub mod patterns;
pub mod repository;

pub use branch::*;
pub use code_file::*;
pub use patterns::PatternSet;
pub use repository::*;
