// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! In-memory [`EntityLookupGateway`] for tests.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use async_trait::async_trait;
use uuid::Uuid;

use crate::gateway::{EntityLookupGateway, LookupError, OwnershipProjection};
use crate::types::{ResourceType, UserId};

#[derive(Debug, Default)]
struct GatewayState {
	entities: HashMap<(ResourceType, Uuid), OwnershipProjection>,
	failing: HashSet<ResourceType>,
	delay: Option<Duration>,
	lookups: Vec<(ResourceType, Uuid)>,
}

/// Gateway backed by a map, with failure and latency injection.
///
/// Clones share state, so a test can keep a handle after giving one to the
/// engine.
#[derive(Debug, Clone, Default)]
pub struct InMemoryGateway {
	state: Arc<Mutex<GatewayState>>,
}

impl InMemoryGateway {
	pub fn new() -> Self {
		Self::default()
	}

	fn state(&self) -> MutexGuard<'_, GatewayState> {
		self.state.lock().unwrap_or_else(|e| e.into_inner())
	}

	pub fn insert(&self, resource_type: ResourceType, projection: OwnershipProjection) {
		self.state()
			.entities
			.insert((resource_type, projection.id), projection);
	}

	/// Register a new user and return its id.
	pub fn add_user(&self) -> UserId {
		let user = UserId::generate();
		self.insert(
			ResourceType::Users,
			OwnershipProjection::owned_by(user.into_inner(), user),
		);
		user
	}

	/// Register a row owned by `owner` and return its id.
	pub fn add_owned(&self, resource_type: ResourceType, owner: UserId) -> Uuid {
		let id = Uuid::new_v4();
		self.insert(resource_type, OwnershipProjection::owned_by(id, owner));
		id
	}

	/// Register a row with several owners and return its id.
	pub fn add_shared(&self, resource_type: ResourceType, owners: &[UserId]) -> Uuid {
		let id = Uuid::new_v4();
		self.insert(
			resource_type,
			OwnershipProjection::with_owners(id, owners.iter().copied()),
		);
		id
	}

	/// Register a row whose ownership comes from `parent_id`.
	pub fn add_child(&self, resource_type: ResourceType, parent_id: Uuid) -> Uuid {
		let id = Uuid::new_v4();
		self.insert(resource_type, OwnershipProjection::child_of(id, parent_id));
		id
	}

	/// Attach a per-user resource (profile, recruiter info...) keyed by the
	/// user's own id.
	pub fn attach(&self, resource_type: ResourceType, user: UserId) {
		self.insert(
			resource_type,
			OwnershipProjection::owned_by(user.into_inner(), user),
		);
	}

	/// Make every lookup of `resource_type` fail.
	pub fn fail_lookups_for(&self, resource_type: ResourceType) {
		self.state().failing.insert(resource_type);
	}

	/// Delay every lookup by `delay`.
	pub fn delay_lookups(&self, delay: Duration) {
		self.state().delay = Some(delay);
	}

	pub fn lookup_count(&self) -> usize {
		self.state().lookups.len()
	}

	pub fn lookups(&self) -> Vec<(ResourceType, Uuid)> {
		self.state().lookups.clone()
	}
}

#[async_trait]
impl EntityLookupGateway for InMemoryGateway {
	async fn lookup(
		&self,
		resource_type: ResourceType,
		id: Uuid,
	) -> Result<Option<OwnershipProjection>, LookupError> {
		let delay = {
			let mut state = self.state();
			state.lookups.push((resource_type, id));
			state.delay
		};
		if let Some(delay) = delay {
			tokio::time::sleep(delay).await;
		}

		let state = self.state();
		if state.failing.contains(&resource_type) {
			return Err(LookupError::backend(format!(
				"injected failure for {resource_type}"
			)));
		}
		Ok(state.entities.get(&(resource_type, id)).cloned())
	}
}
