// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Read-only access to the ownership data authorization decisions depend on.
//!
//! The engine never touches storage directly. It asks an
//! [`EntityLookupGateway`] for the [`OwnershipProjection`] of a single row and
//! treats `Ok(None)` as "does not exist".
//!
//! # Projection contract
//!
//! | Resource type              | Keyed by      | `owner_ids`                   | `parent_id`  |
//! |----------------------------|---------------|-------------------------------|--------------|
//! | `users`                    | user id       | the user itself               | -            |
//! | `profiles`                 | user id       | the profile's user            | -            |
//! | `recruiterInfos`           | user id       | the user it is attached to    | -            |
//! | `professionalArtistInfos`  | user id       | the user it is attached to    | -            |
//! | `portfolios`               | portfolio id  | the portfolio's user          | -            |
//! | `portfolioItems`           | item id       | (empty)                       | portfolio id |
//! | `posts`                    | post id       | the author                    | -            |
//! | `postLikes`                | like id       | the liking user               | -            |
//! | `comments`                 | comment id    | the commenter                 | -            |
//! | `followings`               | following id  | the follower                  | -            |
//! | `commissions`              | commission id | the artist and the commissioner | -          |

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::types::{ResourceType, UserId};

#[derive(Debug, Error)]
pub enum LookupError {
	#[error("lookup backend failure: {0}")]
	Backend(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl LookupError {
	pub fn backend(err: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
		LookupError::Backend(err.into())
	}
}

/// The ownership-relevant slice of a stored row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OwnershipProjection {
	pub id: Uuid,
	pub owner_ids: Vec<UserId>,
	pub parent_id: Option<Uuid>,
}

impl OwnershipProjection {
	pub fn owned_by(id: Uuid, owner: UserId) -> Self {
		Self {
			id,
			owner_ids: vec![owner],
			parent_id: None,
		}
	}

	pub fn with_owners(id: Uuid, owners: impl IntoIterator<Item = UserId>) -> Self {
		Self {
			id,
			owner_ids: owners.into_iter().collect(),
			parent_id: None,
		}
	}

	pub fn child_of(id: Uuid, parent_id: Uuid) -> Self {
		Self {
			id,
			owner_ids: Vec::new(),
			parent_id: Some(parent_id),
		}
	}

	pub fn is_owned_by(&self, user: UserId) -> bool {
		self.owner_ids.contains(&user)
	}
}

/// Fetches ownership projections by resource type and id.
#[async_trait]
pub trait EntityLookupGateway: Send + Sync {
	async fn lookup(
		&self,
		resource_type: ResourceType,
		id: Uuid,
	) -> Result<Option<OwnershipProjection>, LookupError>;
}

#[async_trait]
impl<T: EntityLookupGateway + ?Sized> EntityLookupGateway for Arc<T> {
	async fn lookup(
		&self,
		resource_type: ResourceType,
		id: Uuid,
	) -> Result<Option<OwnershipProjection>, LookupError> {
		(**self).lookup(resource_type, id).await
	}
}
