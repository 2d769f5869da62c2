// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Database layer for the Atelier API server.
//!
//! Provides the SQLite connection pool and the [`SqliteLookupGateway`] the
//! authorization engine uses to read ownership data.

pub mod error;
pub mod lookup;
pub mod pool;
pub mod schema;

pub use error::{DbError, Result};
pub use lookup::SqliteLookupGateway;
pub use pool::create_pool;
pub use schema::create_projection_tables;
