// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! SQLite implementation of [`EntityLookupGateway`].
//!
//! Each resource type is one indexed primary-key read returning up to two
//! owner columns and an optional parent column.

use async_trait::async_trait;
use atelier_server_auth::{
	EntityLookupGateway, LookupError, OwnershipProjection, ResourceType, UserId,
};
use sqlx::sqlite::SqlitePool;
use uuid::Uuid;

use crate::error::DbError;

type ProjectionRow = (Option<String>, Option<String>, Option<String>);

/// Ownership lookups over the application database.
#[derive(Debug, Clone)]
pub struct SqliteLookupGateway {
	pool: SqlitePool,
}

impl SqliteLookupGateway {
	pub fn new(pool: SqlitePool) -> Self {
		Self { pool }
	}

	pub fn pool(&self) -> &SqlitePool {
		&self.pool
	}

	/// Fetch the projection for one row.
	#[tracing::instrument(skip(self))]
	pub async fn fetch_projection(
		&self,
		resource_type: ResourceType,
		id: Uuid,
	) -> Result<Option<OwnershipProjection>, DbError> {
		let row: Option<ProjectionRow> = sqlx::query_as(projection_query(resource_type))
			.bind(id.to_string())
			.fetch_optional(&self.pool)
			.await?;

		let Some((first_owner, second_owner, parent)) = row else {
			return Ok(None);
		};

		let mut owner_ids = Vec::with_capacity(2);
		for owner in [first_owner, second_owner].into_iter().flatten() {
			owner_ids.push(parse_stored_id::<UserId>(resource_type, &owner)?);
		}
		let parent_id = parent
			.map(|parent| parse_stored_id::<Uuid>(resource_type, &parent))
			.transpose()?;

		Ok(Some(OwnershipProjection {
			id,
			owner_ids,
			parent_id,
		}))
	}

	pub async fn health_check(&self) -> Result<(), DbError> {
		sqlx::query("SELECT 1")
			.execute(&self.pool)
			.await
			.map(|_| ())
			.map_err(Into::into)
	}
}

#[async_trait]
impl EntityLookupGateway for SqliteLookupGateway {
	async fn lookup(
		&self,
		resource_type: ResourceType,
		id: Uuid,
	) -> Result<Option<OwnershipProjection>, LookupError> {
		self.fetch_projection(resource_type, id)
			.await
			.map_err(LookupError::from)
	}
}

fn projection_query(resource_type: ResourceType) -> &'static str {
	match resource_type {
		ResourceType::Users => "SELECT id, NULL, NULL FROM users WHERE id = ?",
		ResourceType::Profiles => "SELECT user_id, NULL, NULL FROM profiles WHERE user_id = ?",
		ResourceType::RecruiterInfos => {
			"SELECT user_id, NULL, NULL FROM recruiter_infos WHERE user_id = ?"
		}
		ResourceType::ProfessionalArtistInfos => {
			"SELECT user_id, NULL, NULL FROM professional_artist_infos WHERE user_id = ?"
		}
		ResourceType::Portfolios => "SELECT user_id, NULL, NULL FROM portfolios WHERE id = ?",
		ResourceType::PortfolioItems => {
			"SELECT NULL, NULL, portfolio_id FROM portfolio_items WHERE id = ?"
		}
		ResourceType::Posts => "SELECT user_id, NULL, NULL FROM posts WHERE id = ?",
		ResourceType::PostLikes => "SELECT user_id, NULL, NULL FROM post_likes WHERE id = ?",
		ResourceType::Comments => "SELECT user_id, NULL, NULL FROM comments WHERE id = ?",
		ResourceType::Followings => "SELECT follower_id, NULL, NULL FROM followings WHERE id = ?",
		ResourceType::Commissions => {
			"SELECT artist_id, commissioner_id, NULL FROM commissions WHERE id = ?"
		}
	}
}

fn parse_stored_id<T: std::str::FromStr>(
	resource_type: ResourceType,
	raw: &str,
) -> Result<T, DbError> {
	raw.parse().map_err(|_| {
		DbError::Internal(format!(
			"stored id '{raw}' on {resource_type} is not a UUID"
		))
	})
}
