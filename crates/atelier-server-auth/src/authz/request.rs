// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Transport-independent description of an incoming request.

use std::collections::HashMap;
use std::fmt;

use http::Method;
use serde_json::{Map, Value};

use super::routes::normalize_path;
use crate::types::ResourceType;

/// Everything the engine needs to know about a request.
///
/// The engine only reads from this; it never modifies the request it was
/// built from.
#[derive(Clone)]
pub struct RequestDescriptor {
	pub method: Method,
	pub path: String,
	pub path_params: HashMap<String, String>,
	pub query_params: HashMap<String, String>,
	pub body: Map<String, Value>,
	pub authorization: Option<String>,
}

impl RequestDescriptor {
	pub fn new(method: Method, path: impl Into<String>) -> Self {
		Self {
			method,
			path: path.into(),
			path_params: HashMap::new(),
			query_params: HashMap::new(),
			body: Map::new(),
			authorization: None,
		}
	}

	/// Build a descriptor and derive the id path parameter from a
	/// `/{resourceType}/{id}` path.
	pub fn from_route(method: Method, path: impl Into<String>) -> Self {
		let mut descriptor = Self::new(method, path);
		let mut segments = normalize_path(&descriptor.path)
			.trim_start_matches('/')
			.split('/');
		let resource_type = segments.next().and_then(ResourceType::from_path_segment);
		let id = segments.next().filter(|segment| !segment.is_empty());

		if let (Some(resource_type), Some(id)) = (resource_type, id) {
			let id = id.to_string();
			descriptor
				.path_params
				.insert(resource_type.id_param().to_string(), id);
		}
		descriptor
	}

	pub fn with_path_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
		self.path_params.insert(name.into(), value.into());
		self
	}

	pub fn with_query_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
		self.query_params.insert(name.into(), value.into());
		self
	}

	/// Attach a JSON body. Anything other than an object is treated as empty.
	pub fn with_body(mut self, body: Value) -> Self {
		self.body = match body {
			Value::Object(map) => map,
			_ => Map::new(),
		};
		self
	}

	/// Attach the raw `Authorization` header value.
	pub fn with_authorization(mut self, header: impl Into<String>) -> Self {
		self.authorization = Some(header.into());
		self
	}

	pub fn with_bearer(self, token: &str) -> Self {
		self.with_authorization(format!("Bearer {token}"))
	}

	/// The first path segment, compared exactly against the resource table.
	pub fn resource_type(&self) -> Option<ResourceType> {
		normalize_path(&self.path)
			.trim_start_matches('/')
			.split('/')
			.next()
			.and_then(ResourceType::from_path_segment)
	}

	pub fn path_param(&self, name: &str) -> Option<&str> {
		self.path_params.get(name).map(String::as_str)
	}

	/// A body field, treating JSON `null` as absent.
	pub fn body_field(&self, name: &str) -> Option<&Value> {
		self.body.get(name).filter(|value| !value.is_null())
	}
}

impl fmt::Debug for RequestDescriptor {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("RequestDescriptor")
			.field("method", &self.method)
			.field("path", &self.path)
			.field("path_params", &self.path_params)
			.field("query_params", &self.query_params)
			.field("body_fields", &self.body.keys().collect::<Vec<_>>())
			.field(
				"authorization",
				&self.authorization.as_ref().map(|_| "[REDACTED]"),
			)
			.finish()
	}
}
