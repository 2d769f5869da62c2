// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Request authorization engine.
//!
//! [`AuthorizationEngine::evaluate`] runs a fixed pipeline and stops at the
//! first step that produces a verdict:
//!
//! 1. **Bypass**: `POST /users` and `POST /login` are allowed without a token
//! 2. **Authentication**: bearer token present, signature valid, and the
//!    current time inside `[iat, exp)`; otherwise `Unauthorized`
//! 3. **Admin shortcut**: `ADMIN` callers are allowed
//! 4. **Subject sanity**: the subject must be a non-empty UUID; otherwise
//!    `Forbidden`
//! 5. **Method dispatch**: reads are open, PUT/DELETE run the resource's
//!    [`OwnershipRule`], POST runs the system allowlist and then the resource's
//!    [`CreationRule`]. Any other method is `Forbidden`.
//!
//! Expected denials are [`Verdict`]s. Only gateway failures and timeouts are
//! errors, and they are never folded into a denial.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use http::{Method, StatusCode};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, error, info, instrument};
use uuid::Uuid;

use super::request::RequestDescriptor;
use super::routes;
use super::rules::{self, CreationRule, OwnershipRule};
use super::verdict::Verdict;
use crate::caller::{parse_bearer, CallerContext};
use crate::gateway::{EntityLookupGateway, LookupError, OwnershipProjection};
use crate::token::TokenCodec;
use crate::types::{ResourceType, UserId};

/// Default upper bound on a single entity lookup.
pub const DEFAULT_LOOKUP_TIMEOUT: Duration = Duration::from_secs(2);

const NO_MATCHING_RULE: &str = "no authorization rule matches this request";

#[derive(Debug, Error)]
pub enum EngineError {
	#[error("lookup of {resource_type} failed: {source}")]
	Lookup {
		resource_type: ResourceType,
		#[source]
		source: LookupError,
	},

	#[error("lookup of {resource_type} timed out after {timeout:?}")]
	LookupTimeout {
		resource_type: ResourceType,
		timeout: Duration,
	},
}

impl EngineError {
	pub fn status_code(&self) -> StatusCode {
		StatusCode::INTERNAL_SERVER_ERROR
	}

	pub fn is_timeout(&self) -> bool {
		matches!(self, EngineError::LookupTimeout { .. })
	}
}

/// A verdict plus the caller it was reached for, if a token was accepted.
#[derive(Debug, Clone)]
pub struct Decision {
	pub verdict: Verdict,
	pub caller: Option<CallerContext>,
}

impl Decision {
	fn anonymous(verdict: Verdict) -> Self {
		Self {
			verdict,
			caller: None,
		}
	}
}

#[derive(Clone)]
pub struct AuthorizationEngine {
	codec: TokenCodec,
	gateway: Arc<dyn EntityLookupGateway>,
	lookup_timeout: Duration,
}

impl AuthorizationEngine {
	pub fn new(codec: TokenCodec, gateway: Arc<dyn EntityLookupGateway>) -> Self {
		Self {
			codec,
			gateway,
			lookup_timeout: DEFAULT_LOOKUP_TIMEOUT,
		}
	}

	pub fn with_lookup_timeout(mut self, timeout: Duration) -> Self {
		self.lookup_timeout = timeout;
		self
	}

	/// Decide whether the request may proceed.
	pub async fn decide(&self, request: &RequestDescriptor) -> Result<Verdict, EngineError> {
		self.evaluate(request).await.map(|decision| decision.verdict)
	}

	/// Decide and also return the authenticated caller.
	pub async fn evaluate(&self, request: &RequestDescriptor) -> Result<Decision, EngineError> {
		self.evaluate_at(request, Utc::now()).await
	}

	/// Evaluate against an explicit clock. Token validity windows are checked
	/// against `now`.
	#[instrument(
		level = "debug",
		skip(self, request, now),
		fields(method = %request.method, path = %request.path)
	)]
	pub async fn evaluate_at(
		&self,
		request: &RequestDescriptor,
		now: DateTime<Utc>,
	) -> Result<Decision, EngineError> {
		if routes::is_unauthenticated_route(&request.method, &request.path) {
			debug!("unauthenticated route, token not inspected");
			return Ok(Decision::anonymous(Verdict::Allow));
		}

		let caller = match self.authenticate(request, now) {
			Ok(caller) => caller,
			Err(verdict) => {
				debug!(%verdict, "authentication failed");
				return Ok(Decision::anonymous(verdict));
			}
		};

		let verdict = self.authorize(request, &caller).await?;
		match &verdict {
			Verdict::Allow => debug!(subject_id = %caller.subject_id, "access allowed"),
			Verdict::Deny { kind, reason } => info!(
				subject_id = %caller.subject_id,
				kind = %kind,
				reason,
				"access denied"
			),
		}

		Ok(Decision {
			verdict,
			caller: Some(caller),
		})
	}

	fn authenticate(
		&self,
		request: &RequestDescriptor,
		now: DateTime<Utc>,
	) -> Result<CallerContext, Verdict> {
		let token = request
			.authorization
			.as_deref()
			.and_then(parse_bearer)
			.ok_or_else(|| Verdict::unauthorized("missing or malformed bearer token"))?;

		let claims = self.codec.validate(token).map_err(|e| {
			debug!(error = %e, "token rejected");
			Verdict::unauthorized("invalid token")
		})?;

		if !claims.is_within_window(now) {
			return Err(Verdict::unauthorized("token expired or not yet valid"));
		}

		Ok(CallerContext::from_claims(claims, token))
	}

	async fn authorize(
		&self,
		request: &RequestDescriptor,
		caller: &CallerContext,
	) -> Result<Verdict, EngineError> {
		if caller.is_admin() {
			return Ok(Verdict::Allow);
		}

		if caller.subject_id.is_empty() {
			return Ok(Verdict::forbidden("token has no subject"));
		}
		let Some(subject) = caller.user_id() else {
			return Ok(Verdict::forbidden("token subject is not a user id"));
		};

		let method = &request.method;
		if *method == Method::GET {
			self.authorize_read(request).await
		} else if *method == Method::PUT || *method == Method::DELETE {
			self.authorize_mutation(request, subject).await
		} else if *method == Method::POST {
			self.authorize_creation(request, subject).await
		} else {
			Ok(Verdict::forbidden(NO_MATCHING_RULE))
		}
	}

	async fn authorize_read(&self, request: &RequestDescriptor) -> Result<Verdict, EngineError> {
		let resource_type = match request.resource_type() {
			Some(
				resource_type @ (ResourceType::RecruiterInfos | ResourceType::ProfessionalArtistInfos),
			) => resource_type,
			_ => return Ok(Verdict::Allow),
		};

		let Some(raw_id) = request.path_param(resource_type.id_param()) else {
			return Ok(Verdict::Allow);
		};
		let id = match parse_id(raw_id) {
			Ok(id) => id,
			Err(verdict) => return Ok(verdict),
		};

		Ok(match self.lookup(resource_type, id).await? {
			Some(_) => Verdict::Allow,
			None => Verdict::not_found("resource does not exist"),
		})
	}

	async fn authorize_mutation(
		&self,
		request: &RequestDescriptor,
		subject: UserId,
	) -> Result<Verdict, EngineError> {
		let Some(resource_type) = request.resource_type() else {
			return Ok(Verdict::forbidden(NO_MATCHING_RULE));
		};
		let Some(raw_id) = request.path_param(resource_type.id_param()) else {
			return Ok(Verdict::forbidden("resource id is required"));
		};
		let id = match parse_id(raw_id) {
			Ok(id) => id,
			Err(verdict) => return Ok(verdict),
		};

		match rules::ownership_rule(resource_type) {
			OwnershipRule::SelfIdentity => self.check_self(id, subject).await,
			OwnershipRule::AttachedToSelf(attachment) => {
				let verdict = self.check_self(id, subject).await?;
				if !verdict.is_allowed() {
					return Ok(verdict);
				}
				Ok(match self.lookup(attachment, id).await? {
					Some(_) => Verdict::Allow,
					None => Verdict::not_found("resource does not exist"),
				})
			}
			OwnershipRule::RecordedOwner => self.check_recorded_owner(resource_type, id, subject).await,
			OwnershipRule::PostAuthor => {
				let Some(post) = self.lookup(resource_type, id).await? else {
					return Ok(Verdict::not_found("post does not exist"));
				};
				if post.is_owned_by(subject) || rules::is_like_counter_update(&request.body) {
					Ok(Verdict::Allow)
				} else {
					Ok(Verdict::forbidden("only the author may change this post"))
				}
			}
			OwnershipRule::ParentOwner(parent_type) => {
				let Some(child) = self.lookup(resource_type, id).await? else {
					return Ok(Verdict::not_found("resource does not exist"));
				};
				let Some(parent_id) = child.parent_id else {
					return Ok(Verdict::forbidden("resource has no recorded parent"));
				};
				self.check_recorded_owner(parent_type, parent_id, subject)
					.await
			}
		}
	}

	async fn authorize_creation(
		&self,
		request: &RequestDescriptor,
		subject: UserId,
	) -> Result<Verdict, EngineError> {
		if routes::is_system_post_route(&request.path) {
			return Ok(Verdict::Allow);
		}
		let Some(resource_type) = request.resource_type() else {
			return Ok(Verdict::forbidden(NO_MATCHING_RULE));
		};

		match rules::creation_rule(resource_type) {
			CreationRule::Registration => Ok(Verdict::forbidden(NO_MATCHING_RULE)),
			CreationRule::OwnerFields(fields) => {
				self.check_claimed_owner(request, fields, subject).await
			}
			CreationRule::ParentField { field, parent } => {
				let Some(value) = request.body_field(field) else {
					return Ok(Verdict::bad_request("request body does not name a parent"));
				};
				let parent_id = match parse_id_value(value) {
					Ok(id) => id,
					Err(verdict) => return Ok(verdict),
				};
				self.check_recorded_owner(parent, parent_id, subject).await
			}
		}
	}

	/// The id names a user that must exist and be the caller.
	async fn check_self(&self, id: Uuid, subject: UserId) -> Result<Verdict, EngineError> {
		if self.lookup(ResourceType::Users, id).await?.is_none() {
			return Ok(Verdict::not_found("user does not exist"));
		}
		if id == subject.into_inner() {
			Ok(Verdict::Allow)
		} else {
			Ok(Verdict::forbidden("caller does not own this resource"))
		}
	}

	async fn check_recorded_owner(
		&self,
		resource_type: ResourceType,
		id: Uuid,
		subject: UserId,
	) -> Result<Verdict, EngineError> {
		Ok(match self.lookup(resource_type, id).await? {
			None => Verdict::not_found("resource does not exist"),
			Some(projection) if projection.is_owned_by(subject) => Verdict::Allow,
			Some(_) => Verdict::forbidden("caller does not own this resource"),
		})
	}

	/// POST ownership: one of `fields` must name the caller.
	///
	/// A field naming the caller allows the request whatever the other fields
	/// hold. Otherwise every present field is shape-checked before any lookup,
	/// and the named users are looked up so that a request naming only
	/// nonexistent users is `NotFound` rather than `Forbidden`.
	async fn check_claimed_owner(
		&self,
		request: &RequestDescriptor,
		fields: &[&str],
		subject: UserId,
	) -> Result<Verdict, EngineError> {
		let values: Vec<&Value> = fields
			.iter()
			.filter_map(|field| request.body_field(field))
			.collect();

		if values.is_empty() {
			return Ok(Verdict::bad_request("request body does not name an owner"));
		}
		if values
			.iter()
			.any(|value| parse_id_value(value).is_ok_and(|id| id == subject.into_inner()))
		{
			return Ok(Verdict::Allow);
		}

		let mut claimed = Vec::with_capacity(values.len());
		for value in values {
			match parse_id_value(value) {
				Ok(id) => claimed.push(id),
				Err(verdict) => return Ok(verdict),
			}
		}

		for id in claimed {
			if self.lookup(ResourceType::Users, id).await?.is_some() {
				return Ok(Verdict::forbidden("request body names another user"));
			}
		}
		Ok(Verdict::not_found("user named in request body does not exist"))
	}

	async fn lookup(
		&self,
		resource_type: ResourceType,
		id: Uuid,
	) -> Result<Option<OwnershipProjection>, EngineError> {
		match tokio::time::timeout(self.lookup_timeout, self.gateway.lookup(resource_type, id)).await
		{
			Ok(Ok(projection)) => Ok(projection),
			Ok(Err(source)) => {
				error!(%resource_type, %id, error = %source, "entity lookup failed");
				Err(EngineError::Lookup {
					resource_type,
					source,
				})
			}
			Err(_) => {
				error!(%resource_type, %id, timeout = ?self.lookup_timeout, "entity lookup timed out");
				Err(EngineError::LookupTimeout {
					resource_type,
					timeout: self.lookup_timeout,
				})
			}
		}
	}
}

impl std::fmt::Debug for AuthorizationEngine {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("AuthorizationEngine")
			.field("codec", &self.codec)
			.field("lookup_timeout", &self.lookup_timeout)
			.finish_non_exhaustive()
	}
}

fn parse_id(raw: &str) -> Result<Uuid, Verdict> {
	Uuid::parse_str(raw).map_err(|_| Verdict::bad_request("malformed resource id"))
}

fn parse_id_value(value: &Value) -> Result<Uuid, Verdict> {
	value
		.as_str()
		.ok_or_else(|| Verdict::bad_request("malformed resource id"))
		.and_then(parse_id)
}
