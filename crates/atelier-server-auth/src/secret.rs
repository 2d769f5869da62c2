// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Token signing secret.
//!
//! [`SigningSecret`] never prints its contents through `Debug` or `Display`
//! and wipes its buffer on drop. Use [`SigningSecret::expose`] to reach the
//! raw bytes at the single point where a key is built from them.

use std::fmt;
use zeroize::Zeroize;

pub struct SigningSecret {
	bytes: Vec<u8>,
}

impl SigningSecret {
	pub fn new(secret: impl Into<String>) -> Self {
		Self {
			bytes: secret.into().into_bytes(),
		}
	}

	pub fn from_bytes(bytes: Vec<u8>) -> Self {
		Self { bytes }
	}

	/// Access the raw secret bytes.
	pub fn expose(&self) -> &[u8] {
		&self.bytes
	}

	pub fn is_empty(&self) -> bool {
		self.bytes.is_empty()
	}

	pub fn len(&self) -> usize {
		self.bytes.len()
	}
}

impl Clone for SigningSecret {
	fn clone(&self) -> Self {
		Self {
			bytes: self.bytes.clone(),
		}
	}
}

impl Drop for SigningSecret {
	fn drop(&mut self) {
		self.bytes.zeroize();
	}
}

impl fmt::Debug for SigningSecret {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str("SigningSecret([REDACTED])")
	}
}

impl fmt::Display for SigningSecret {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str("[REDACTED]")
	}
}
