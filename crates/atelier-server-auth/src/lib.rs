// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Identity tokens and request authorization for the Atelier API.
//!
//! Every request to the API passes through [`AuthorizationEngine`] before it
//! reaches a handler. The engine authenticates the caller from a bearer token
//! issued by [`TokenCodec`], then applies ownership rules per resource type,
//! consulting an [`EntityLookupGateway`] for the rows those rules depend on.
//!
//! # Modules
//!
//! - [`types`]: [`UserId`], [`Role`], [`ResourceType`]
//! - [`secret`]: [`SigningSecret`], the redacted HMAC key
//! - [`token`]: [`TokenCodec`] and [`Claims`]
//! - [`caller`]: bearer extraction and [`CallerContext`]
//! - [`gateway`]: the [`EntityLookupGateway`] seam and [`OwnershipProjection`]
//! - [`authz`]: descriptor, rules, verdicts and the engine
//! - [`testing`]: [`testing::InMemoryGateway`] (`testing` feature)

pub mod authz;
pub mod caller;
pub mod gateway;
pub mod secret;
#[cfg(any(test, feature = "testing"))]
pub mod testing;
pub mod token;
pub mod types;

pub use authz::{
	AuthorizationEngine, CreationRule, Decision, DenialKind, EngineError, OwnershipRule,
	RequestDescriptor, Verdict, DEFAULT_LOOKUP_TIMEOUT,
};
pub use caller::{extract_bearer_token, parse_bearer, CallerContext};
pub use gateway::{EntityLookupGateway, LookupError, OwnershipProjection};
pub use secret::SigningSecret;
pub use token::{Claims, TokenCodec, TokenError, DEFAULT_TOKEN_TTL};
pub use types::{ResourceType, Role, UserId};
