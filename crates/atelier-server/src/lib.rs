// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Atelier API server: every request passes the authorization engine before
//! it reaches a handler.

pub mod api;
pub mod authz_middleware;
pub mod error;
pub mod routes;
pub mod state;

pub use api::{api_routes, create_router};
pub use authz_middleware::authorize_request;
pub use error::ErrorResponse;
pub use state::{create_app_state, AppState};
