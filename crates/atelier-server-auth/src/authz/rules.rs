// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Per-resource ownership rules.
//!
//! Both tables are exhaustive matches over [`ResourceType`], so adding a
//! resource type does not compile until it has a rule for mutation and one
//! for creation.

use serde_json::{Map, Value};

use crate::types::ResourceType;

/// Body field that carries a post's like counter.
pub const LIKE_COUNTER_FIELD: &str = "num_likes";

/// How a caller proves ownership of an existing resource on PUT and DELETE.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OwnershipRule {
	/// The resource id is a user id, which must exist and be the caller's own.
	SelfIdentity,
	/// As [`OwnershipRule::SelfIdentity`], and the user must also have this
	/// per-user resource attached.
	AttachedToSelf(ResourceType),
	/// The caller must be one of the owners recorded on the row.
	RecordedOwner,
	/// The author may do anything; anyone else may only update the like counter.
	PostAuthor,
	/// The row's parent, of the given type, must be owned by the caller.
	ParentOwner(ResourceType),
}

/// How the owner of a resource about to be created is read from the body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreationRule {
	/// Only creatable through the unauthenticated registration route.
	Registration,
	/// Any of these fields naming the caller authorizes the create. Each field
	/// holds a user id.
	OwnerFields(&'static [&'static str]),
	/// The field names a parent of the given type that the caller must own.
	ParentField {
		field: &'static str,
		parent: ResourceType,
	},
}

pub fn ownership_rule(resource_type: ResourceType) -> OwnershipRule {
	match resource_type {
		ResourceType::Users => OwnershipRule::SelfIdentity,
		ResourceType::RecruiterInfos => OwnershipRule::AttachedToSelf(ResourceType::RecruiterInfos),
		ResourceType::ProfessionalArtistInfos => {
			OwnershipRule::AttachedToSelf(ResourceType::ProfessionalArtistInfos)
		}
		ResourceType::Profiles
		| ResourceType::Portfolios
		| ResourceType::PostLikes
		| ResourceType::Comments
		| ResourceType::Followings
		| ResourceType::Commissions => OwnershipRule::RecordedOwner,
		ResourceType::Posts => OwnershipRule::PostAuthor,
		ResourceType::PortfolioItems => OwnershipRule::ParentOwner(ResourceType::Portfolios),
	}
}

pub fn creation_rule(resource_type: ResourceType) -> CreationRule {
	match resource_type {
		ResourceType::Users => CreationRule::Registration,
		ResourceType::Profiles | ResourceType::Portfolios => CreationRule::OwnerFields(&["user_id"]),
		ResourceType::Posts | ResourceType::PostLikes | ResourceType::Comments => {
			CreationRule::OwnerFields(&["userId"])
		}
		ResourceType::Followings => CreationRule::OwnerFields(&["follower_id"]),
		ResourceType::Commissions => CreationRule::OwnerFields(&["artist_id", "commissioner_id"]),
		ResourceType::RecruiterInfos | ResourceType::ProfessionalArtistInfos => {
			CreationRule::OwnerFields(&["id"])
		}
		ResourceType::PortfolioItems => CreationRule::ParentField {
			field: "portfolioId",
			parent: ResourceType::Portfolios,
		},
	}
}

/// Whether a post update touches nothing but the like counter.
///
/// The body must contain exactly one field, `num_likes`, with a non-null value.
pub fn is_like_counter_update(body: &Map<String, Value>) -> bool {
	body.len() == 1
		&& body
			.get(LIKE_COUNTER_FIELD)
			.is_some_and(|value| !value.is_null())
}
