// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Tables read by [`SqliteLookupGateway`](crate::SqliteLookupGateway).
//!
//! Only the columns ownership lookups touch are declared. Ids are stored as
//! hyphenated UUID text.

use sqlx::sqlite::SqlitePool;

use crate::error::DbError;

const PROJECTION_TABLES: &[&str] = &[
	r#"
	CREATE TABLE IF NOT EXISTS users (
		id TEXT PRIMARY KEY
	)
	"#,
	r#"
	CREATE TABLE IF NOT EXISTS profiles (
		user_id TEXT PRIMARY KEY REFERENCES users(id) ON DELETE CASCADE
	)
	"#,
	r#"
	CREATE TABLE IF NOT EXISTS recruiter_infos (
		user_id TEXT PRIMARY KEY REFERENCES users(id) ON DELETE CASCADE
	)
	"#,
	r#"
	CREATE TABLE IF NOT EXISTS professional_artist_infos (
		user_id TEXT PRIMARY KEY REFERENCES users(id) ON DELETE CASCADE
	)
	"#,
	r#"
	CREATE TABLE IF NOT EXISTS portfolios (
		id TEXT PRIMARY KEY,
		user_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE
	)
	"#,
	r#"
	CREATE TABLE IF NOT EXISTS portfolio_items (
		id TEXT PRIMARY KEY,
		portfolio_id TEXT NOT NULL REFERENCES portfolios(id) ON DELETE CASCADE
	)
	"#,
	r#"
	CREATE TABLE IF NOT EXISTS posts (
		id TEXT PRIMARY KEY,
		user_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE
	)
	"#,
	r#"
	CREATE TABLE IF NOT EXISTS post_likes (
		id TEXT PRIMARY KEY,
		user_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE
	)
	"#,
	r#"
	CREATE TABLE IF NOT EXISTS comments (
		id TEXT PRIMARY KEY,
		user_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE
	)
	"#,
	r#"
	CREATE TABLE IF NOT EXISTS followings (
		id TEXT PRIMARY KEY,
		follower_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE
	)
	"#,
	r#"
	CREATE TABLE IF NOT EXISTS commissions (
		id TEXT PRIMARY KEY,
		artist_id TEXT NOT NULL REFERENCES users(id),
		commissioner_id TEXT NOT NULL REFERENCES users(id)
	)
	"#,
];

/// Create every table ownership lookups read from, if missing.
#[tracing::instrument(skip(pool))]
pub async fn create_projection_tables(pool: &SqlitePool) -> Result<(), DbError> {
	for statement in PROJECTION_TABLES {
		sqlx::query(statement).execute(pool).await?;
	}
	tracing::debug!(tables = PROJECTION_TABLES.len(), "projection tables ready");
	Ok(())
}
