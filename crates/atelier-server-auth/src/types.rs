// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Core type definitions for authentication and authorization.
//!
//! - **[`UserId`]**: type-safe wrapper around the UUID that identifies a user
//! - **[`Role`]**: the two roles a token can carry
//! - **[`ResourceType`]**: the closed set of resource collections exposed by the
//!   API, keyed by the first path segment of a request

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

// =============================================================================
// User identity
// =============================================================================

/// Unique identifier for a user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(Uuid);

impl UserId {
	/// Create a new ID from a UUID.
	pub fn new(id: Uuid) -> Self {
		Self(id)
	}

	/// Generate a new random ID.
	pub fn generate() -> Self {
		Self(Uuid::new_v4())
	}

	/// Get the underlying UUID.
	pub fn into_inner(self) -> Uuid {
		self.0
	}

	/// Get a reference to the underlying UUID.
	pub fn as_uuid(&self) -> &Uuid {
		&self.0
	}
}

impl fmt::Display for UserId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.0)
	}
}

impl FromStr for UserId {
	type Err = uuid::Error;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Uuid::parse_str(s).map(Self)
	}
}

impl From<Uuid> for UserId {
	fn from(id: Uuid) -> Self {
		Self(id)
	}
}

impl From<UserId> for Uuid {
	fn from(id: UserId) -> Self {
		id.0
	}
}

// =============================================================================
// Roles
// =============================================================================

/// Role carried inside an identity token.
///
/// Serialized as `ADMIN` / `NONADMIN`, the values the account service writes
/// into the `role` claim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
	/// Unrestricted access to every authenticated route.
	#[serde(rename = "ADMIN")]
	Admin,
	/// Access governed by ownership rules.
	#[serde(rename = "NONADMIN")]
	NonAdmin,
}

impl Role {
	pub fn is_admin(self) -> bool {
		matches!(self, Role::Admin)
	}

	pub fn as_str(self) -> &'static str {
		match self {
			Role::Admin => "ADMIN",
			Role::NonAdmin => "NONADMIN",
		}
	}
}

impl fmt::Display for Role {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

// =============================================================================
// Resource types
// =============================================================================

/// Resource collections known to the authorization engine.
///
/// Each variant maps one-to-one onto the first segment of the request path
/// (`/posts/{id}` is [`ResourceType::Posts`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ResourceType {
	Users,
	Profiles,
	Portfolios,
	PortfolioItems,
	Posts,
	PostLikes,
	Commissions,
	Comments,
	Followings,
	RecruiterInfos,
	ProfessionalArtistInfos,
}

impl ResourceType {
	/// Every resource type, in route-table order.
	pub const ALL: [ResourceType; 11] = [
		ResourceType::Users,
		ResourceType::Profiles,
		ResourceType::Portfolios,
		ResourceType::PortfolioItems,
		ResourceType::Posts,
		ResourceType::PostLikes,
		ResourceType::Commissions,
		ResourceType::Comments,
		ResourceType::Followings,
		ResourceType::RecruiterInfos,
		ResourceType::ProfessionalArtistInfos,
	];

	/// The path segment that names this collection.
	pub fn path_segment(self) -> &'static str {
		match self {
			ResourceType::Users => "users",
			ResourceType::Profiles => "profiles",
			ResourceType::Portfolios => "portfolios",
			ResourceType::PortfolioItems => "portfolioItems",
			ResourceType::Posts => "posts",
			ResourceType::PostLikes => "postLikes",
			ResourceType::Commissions => "commissions",
			ResourceType::Comments => "comments",
			ResourceType::Followings => "followings",
			ResourceType::RecruiterInfos => "recruiterInfos",
			ResourceType::ProfessionalArtistInfos => "professionalArtistInfos",
		}
	}

	/// Resolve a path segment to a resource type. Matching is exact and
	/// case-sensitive.
	pub fn from_path_segment(segment: &str) -> Option<Self> {
		Self::ALL
			.iter()
			.copied()
			.find(|resource_type| resource_type.path_segment() == segment)
	}

	/// Name of the path parameter holding the resource id.
	///
	/// Profiles are addressed by the owning user's id.
	pub fn id_param(self) -> &'static str {
		match self {
			ResourceType::Profiles => "userId",
			_ => "id",
		}
	}
}

impl fmt::Display for ResourceType {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.path_segment())
	}
}
