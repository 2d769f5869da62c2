// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Atelier API server binary.

use std::path::PathBuf;

use atelier_server::{api_routes, create_app_state, create_router};
use atelier_server_db::{create_pool, create_projection_tables, SqliteLookupGateway};
use clap::Parser;
use tower_http::{
	cors::{Any, CorsLayer},
	trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Atelier server - authorizes and serves the Atelier API.
#[derive(Parser, Debug)]
#[command(name = "atelier-server", about = "Atelier API server", version)]
struct Args {
	/// Configuration file to use instead of /etc/atelier/server.toml
	#[arg(long, env = "ATELIER_SERVER_CONFIG")]
	config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
	let args = Args::parse();

	// Load .env file if present
	dotenvy::dotenv().ok();

	let config = match &args.config {
		Some(path) => atelier_server_config::load_config_with_file(path)?,
		None => atelier_server_config::load_config()?,
	};

	tracing_subscriber::registry()
		.with(
			tracing_subscriber::EnvFilter::try_from_default_env()
				.unwrap_or_else(|_| config.logging.level.clone().into()),
		)
		.with(tracing_subscriber::fmt::layer())
		.init();

	tracing::info!(
		host = %config.http.host,
		port = config.http.port,
		database = %config.database.url,
		"starting atelier-server"
	);

	let pool = create_pool(&config.database.url).await?;
	create_projection_tables(&pool).await?;
	let gateway = SqliteLookupGateway::new(pool);

	let state = create_app_state(&config, gateway).ok_or("auth signing secret is not configured")?;

	let app = create_router(state, api_routes())
		.layer(TraceLayer::new_for_http())
		.layer(
			CorsLayer::new()
				.allow_origin(Any)
				.allow_methods(Any)
				.allow_headers(Any),
		);

	let addr = config.socket_addr();
	tracing::info!("listening on {}", addr);

	let listener = tokio::net::TcpListener::bind(&addr).await?;

	tokio::select! {
		result = axum::serve(listener, app) => {
			if let Err(e) = result {
				tracing::error!(error = %e, "server error");
			}
		}
		_ = tokio::signal::ctrl_c() => {
			tracing::info!("received shutdown signal");
		}
	}

	tracing::info!("server shutdown complete");
	Ok(())
}
