// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Request authorization.
//!
//! - [`request`]: the transport-independent [`RequestDescriptor`]
//! - [`routes`]: bypass and system route tables
//! - [`rules`]: per-resource ownership and creation rules
//! - [`verdict`]: [`Verdict`] and [`DenialKind`]
//! - [`engine`]: the [`AuthorizationEngine`] that ties them together

pub mod engine;
pub mod request;
pub mod routes;
pub mod rules;
pub mod verdict;

#[cfg(test)]
mod scenarios;

pub use engine::{AuthorizationEngine, Decision, EngineError, DEFAULT_LOOKUP_TIMEOUT};
pub use request::RequestDescriptor;
pub use rules::{CreationRule, OwnershipRule};
pub use verdict::{DenialKind, Verdict};
