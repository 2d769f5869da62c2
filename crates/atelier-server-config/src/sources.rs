// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Configuration sources: built-in defaults, TOML files and environment variables.

use std::path::PathBuf;

use tracing::{debug, trace};

use crate::error::ConfigError;
use crate::layer::ServerConfigLayer;
use crate::sections::{AuthConfigLayer, DatabaseConfigLayer, HttpConfigLayer, LoggingConfigLayer};

/// Source precedence levels (higher = overrides lower).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Precedence {
	Defaults = 10,
	ConfigFile = 20,
	Environment = 50,
}

/// Trait for configuration sources.
pub trait ConfigSource: Send + Sync {
	fn name(&self) -> &'static str;
	fn precedence(&self) -> Precedence;
	fn load(&self) -> Result<ServerConfigLayer, ConfigError>;
}

/// Built-in defaults source.
pub struct DefaultsSource;

impl ConfigSource for DefaultsSource {
	fn name(&self) -> &'static str {
		"defaults"
	}

	fn precedence(&self) -> Precedence {
		Precedence::Defaults
	}

	fn load(&self) -> Result<ServerConfigLayer, ConfigError> {
		debug!("loading defaults");
		Ok(ServerConfigLayer::default())
	}
}

/// TOML file configuration source. A missing file is an empty layer.
pub struct TomlSource {
	path: PathBuf,
}

impl TomlSource {
	pub fn new(path: impl Into<PathBuf>) -> Self {
		Self { path: path.into() }
	}

	pub fn system() -> Self {
		Self::new("/etc/atelier/server.toml")
	}
}

impl ConfigSource for TomlSource {
	fn name(&self) -> &'static str {
		"toml-config"
	}

	fn precedence(&self) -> Precedence {
		Precedence::ConfigFile
	}

	fn load(&self) -> Result<ServerConfigLayer, ConfigError> {
		if !self.path.exists() {
			debug!(path = %self.path.display(), "config file not found, skipping");
			return Ok(ServerConfigLayer::default());
		}

		debug!(path = %self.path.display(), "loading config file");
		let content = std::fs::read_to_string(&self.path).map_err(|e| ConfigError::FileRead {
			path: self.path.clone(),
			source: e,
		})?;

		let layer: ServerConfigLayer =
			toml::from_str(&content).map_err(|e| ConfigError::TomlParse {
				path: self.path.clone(),
				source: e,
			})?;

		trace!("parsed config layer from TOML");
		Ok(layer)
	}
}

/// Environment variable source.
///
/// Convention: `ATELIER_SERVER_<FIELD>`. Empty values count as unset.
pub struct EnvSource;

impl ConfigSource for EnvSource {
	fn name(&self) -> &'static str {
		"environment"
	}

	fn precedence(&self) -> Precedence {
		Precedence::Environment
	}

	fn load(&self) -> Result<ServerConfigLayer, ConfigError> {
		debug!("loading environment variables");
		Ok(ServerConfigLayer {
			http: Some(load_http_from_env()?),
			auth: Some(load_auth_from_env()?),
			database: Some(load_database_from_env()),
			logging: Some(load_logging_from_env()),
		})
	}
}

fn env_var(name: &str) -> Option<String> {
	std::env::var(name).ok().filter(|s| !s.is_empty())
}

fn env_parse<T: std::str::FromStr>(name: &str, kind: &str) -> Result<Option<T>, ConfigError> {
	match env_var(name) {
		Some(v) => v.parse().map(Some).map_err(|_| ConfigError::InvalidValue {
			key: name.to_string(),
			message: format!("invalid {kind} value '{v}'"),
		}),
		None => Ok(None),
	}
}

fn load_http_from_env() -> Result<HttpConfigLayer, ConfigError> {
	Ok(HttpConfigLayer {
		host: env_var("ATELIER_SERVER_HOST"),
		port: env_parse("ATELIER_SERVER_PORT", "u16")?,
		body_limit_bytes: env_parse("ATELIER_SERVER_BODY_LIMIT_BYTES", "usize")?,
	})
}

fn load_auth_from_env() -> Result<AuthConfigLayer, ConfigError> {
	Ok(AuthConfigLayer {
		token_ttl_secs: env_parse("ATELIER_SERVER_TOKEN_TTL_SECS", "u64")?,
		lookup_timeout_ms: env_parse("ATELIER_SERVER_LOOKUP_TIMEOUT_MS", "u64")?,
	})
}

fn load_database_from_env() -> DatabaseConfigLayer {
	DatabaseConfigLayer {
		url: env_var("ATELIER_SERVER_DATABASE_URL"),
	}
}

fn load_logging_from_env() -> LoggingConfigLayer {
	LoggingConfigLayer {
		level: env_var("ATELIER_SERVER_LOG_LEVEL"),
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::io::Write;

	mod toml_source {
		use super::*;

		#[test]
		fn missing_file_is_empty_layer() {
			let layer = TomlSource::new("/nonexistent/atelier/server.toml")
				.load()
				.unwrap();
			assert!(layer.http.is_none());
			assert!(layer.auth.is_none());
		}

		#[test]
		fn reads_sections_from_file() {
			let mut file = tempfile::NamedTempFile::new().unwrap();
			writeln!(file, "[http]\nhost = \"127.0.0.1\"\n\n[logging]\nlevel = \"debug\"").unwrap();

			let layer = TomlSource::new(file.path()).load().unwrap();
			assert_eq!(layer.http.unwrap().host.as_deref(), Some("127.0.0.1"));
			assert_eq!(layer.logging.unwrap().level.as_deref(), Some("debug"));
		}

		#[test]
		fn invalid_toml_is_parse_error() {
			let mut file = tempfile::NamedTempFile::new().unwrap();
			writeln!(file, "[http\nport = ").unwrap();

			let err = TomlSource::new(file.path()).load().unwrap_err();
			assert!(matches!(err, ConfigError::TomlParse { .. }));
		}
	}

	mod env_helpers {
		use super::*;

		#[test]
		fn parse_rejects_garbage() {
			std::env::set_var("ATELIER_TEST_CONFIG_PORT", "eighty");
			let result: Result<Option<u16>, _> = env_parse("ATELIER_TEST_CONFIG_PORT", "u16");
			assert!(matches!(result, Err(ConfigError::InvalidValue { .. })));
			std::env::remove_var("ATELIER_TEST_CONFIG_PORT");
		}

		#[test]
		fn empty_is_unset() {
			std::env::set_var("ATELIER_TEST_CONFIG_EMPTY", "");
			assert_eq!(env_var("ATELIER_TEST_CONFIG_EMPTY"), None);
			std::env::remove_var("ATELIER_TEST_CONFIG_EMPTY");
		}
	}

	#[test]
	fn precedence_orders_sources() {
		assert!(Precedence::Defaults < Precedence::ConfigFile);
		assert!(Precedence::ConfigFile < Precedence::Environment);
	}
}
