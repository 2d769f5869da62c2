// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Table-driven authorization scenarios across every resource type.

use std::sync::Arc;

use http::Method;
use proptest::prelude::*;
use serde_json::{json, Value};
use uuid::Uuid;

use super::engine::AuthorizationEngine;
use super::request::RequestDescriptor;
use super::verdict::{DenialKind, Verdict};
use crate::secret::SigningSecret;
use crate::testing::InMemoryGateway;
use crate::token::{TokenCodec, DEFAULT_TOKEN_TTL};
use crate::types::{ResourceType, Role, UserId};

#[derive(Debug, Clone)]
enum Caller {
	Anonymous,
	User(UserId),
	Admin,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Expected {
	Allow,
	Deny(DenialKind),
}

struct AuthzCase {
	name: &'static str,
	method: Method,
	path: String,
	caller: Caller,
	body: Option<Value>,
	expected: Expected,
}

impl AuthzCase {
	fn new(
		name: &'static str,
		method: Method,
		path: impl Into<String>,
		caller: Caller,
		expected: Expected,
	) -> Self {
		Self {
			name,
			method,
			path: path.into(),
			caller,
			body: None,
			expected,
		}
	}

	fn with_body(mut self, body: Value) -> Self {
		self.body = Some(body);
		self
	}
}

/// Two users, Alice and Bob, each owning one row of every resource type.
struct Fixture {
	gateway: InMemoryGateway,
	engine: AuthorizationEngine,
	codec: TokenCodec,
	alice: UserId,
	bob: UserId,
	alice_rows: Rows,
	bob_rows: Rows,
}

struct Rows {
	portfolio: Uuid,
	portfolio_item: Uuid,
	post: Uuid,
	post_like: Uuid,
	comment: Uuid,
	following: Uuid,
	commission: Uuid,
}

impl Fixture {
	fn new() -> Self {
		let gateway = InMemoryGateway::new();
		let codec = TokenCodec::new(&SigningSecret::new("scenario-secret"), DEFAULT_TOKEN_TTL);
		let engine = AuthorizationEngine::new(codec.clone(), Arc::new(gateway.clone()));

		let alice = gateway.add_user();
		let bob = gateway.add_user();
		let alice_rows = Self::seed(&gateway, alice);
		let bob_rows = Self::seed(&gateway, bob);

		Self {
			gateway,
			engine,
			codec,
			alice,
			bob,
			alice_rows,
			bob_rows,
		}
	}

	fn seed(gateway: &InMemoryGateway, user: UserId) -> Rows {
		gateway.attach(ResourceType::Profiles, user);
		gateway.attach(ResourceType::RecruiterInfos, user);
		gateway.attach(ResourceType::ProfessionalArtistInfos, user);
		let portfolio = gateway.add_owned(ResourceType::Portfolios, user);
		let counterpart = gateway.add_user();
		Rows {
			portfolio,
			portfolio_item: gateway.add_child(ResourceType::PortfolioItems, portfolio),
			post: gateway.add_owned(ResourceType::Posts, user),
			post_like: gateway.add_owned(ResourceType::PostLikes, user),
			comment: gateway.add_owned(ResourceType::Comments, user),
			following: gateway.add_owned(ResourceType::Followings, user),
			commission: gateway.add_shared(ResourceType::Commissions, &[user, counterpart]),
		}
	}

	fn request(&self, case: &AuthzCase) -> RequestDescriptor {
		let mut request = RequestDescriptor::from_route(case.method.clone(), case.path.clone());
		if let Some(body) = &case.body {
			request = request.with_body(body.clone());
		}
		match &case.caller {
			Caller::Anonymous => request,
			Caller::User(user) => {
				let token = self.codec.issue(&user.to_string(), Role::NonAdmin).unwrap();
				request.with_bearer(&token)
			}
			Caller::Admin => {
				let token = self
					.codec
					.issue(&UserId::generate().to_string(), Role::Admin)
					.unwrap();
				request.with_bearer(&token)
			}
		}
	}

	async fn run(&self, cases: Vec<AuthzCase>) {
		let mut failures = Vec::new();
		for case in &cases {
			let verdict = self.engine.decide(&self.request(case)).await.unwrap();
			let actual = match verdict {
				Verdict::Allow => Expected::Allow,
				Verdict::Deny { kind, .. } => Expected::Deny(kind),
			};
			if actual != case.expected {
				failures.push(format!(
					"{}: {} {} expected {:?}, got {:?}",
					case.name, case.method, case.path, case.expected, actual
				));
			}
		}
		assert!(failures.is_empty(), "failing cases:\n{}", failures.join("\n"));
	}
}

fn paths_for(rows: &Rows, user: UserId) -> Vec<(ResourceType, String)> {
	vec![
		(ResourceType::Users, format!("/users/{user}")),
		(ResourceType::Profiles, format!("/profiles/{user}")),
		(ResourceType::RecruiterInfos, format!("/recruiterInfos/{user}")),
		(
			ResourceType::ProfessionalArtistInfos,
			format!("/professionalArtistInfos/{user}"),
		),
		(ResourceType::Portfolios, format!("/portfolios/{}", rows.portfolio)),
		(
			ResourceType::PortfolioItems,
			format!("/portfolioItems/{}", rows.portfolio_item),
		),
		(ResourceType::Posts, format!("/posts/{}", rows.post)),
		(ResourceType::PostLikes, format!("/postLikes/{}", rows.post_like)),
		(ResourceType::Comments, format!("/comments/{}", rows.comment)),
		(ResourceType::Followings, format!("/followings/{}", rows.following)),
		(ResourceType::Commissions, format!("/commissions/{}", rows.commission)),
	]
}

mod unauthenticated {
	use super::*;

	#[tokio::test]
	async fn only_bypass_routes_admit_anonymous_callers() {
		let f = Fixture::new();
		let post = f.alice_rows.post;
		f.run(vec![
			AuthzCase::new("register", Method::POST, "/users", Caller::Anonymous, Expected::Allow),
			AuthzCase::new("login", Method::POST, "/login", Caller::Anonymous, Expected::Allow),
			AuthzCase::new(
				"list posts",
				Method::GET,
				"/posts",
				Caller::Anonymous,
				Expected::Deny(DenialKind::Unauthorized),
			),
			AuthzCase::new(
				"delete post",
				Method::DELETE,
				format!("/posts/{post}"),
				Caller::Anonymous,
				Expected::Deny(DenialKind::Unauthorized),
			),
			AuthzCase::new(
				"search",
				Method::POST,
				"/search",
				Caller::Anonymous,
				Expected::Deny(DenialKind::Unauthorized),
			),
			AuthzCase::new(
				"get users",
				Method::GET,
				"/users",
				Caller::Anonymous,
				Expected::Deny(DenialKind::Unauthorized),
			),
		])
		.await;
	}
}

mod ownership_round_trip {
	use super::*;

	#[tokio::test]
	async fn owner_may_update_and_delete() {
		let f = Fixture::new();
		let mut cases = Vec::new();
		for (_, path) in paths_for(&f.alice_rows, f.alice) {
			for method in [Method::PUT, Method::DELETE] {
				cases.push(AuthzCase::new(
					"owner",
					method,
					path.clone(),
					Caller::User(f.alice),
					Expected::Allow,
				));
			}
		}
		f.run(cases).await;
	}

	#[tokio::test]
	async fn other_user_is_forbidden() {
		let f = Fixture::new();
		let mut cases = Vec::new();
		for (_, path) in paths_for(&f.alice_rows, f.alice) {
			for method in [Method::PUT, Method::DELETE] {
				cases.push(AuthzCase::new(
					"other user",
					method,
					path.clone(),
					Caller::User(f.bob),
					Expected::Deny(DenialKind::Forbidden),
				));
			}
		}
		f.run(cases).await;
	}

	#[tokio::test]
	async fn nonexistent_ids_are_not_found() {
		let f = Fixture::new();
		let mut cases = Vec::new();
		for resource_type in ResourceType::ALL {
			let path = format!("/{}/{}", resource_type.path_segment(), Uuid::new_v4());
			for method in [Method::PUT, Method::DELETE] {
				cases.push(AuthzCase::new(
					"nonexistent",
					method,
					path.clone(),
					Caller::User(f.alice),
					Expected::Deny(DenialKind::NotFound),
				));
			}
		}
		f.run(cases).await;
	}

	#[tokio::test]
	async fn malformed_ids_are_bad_request_without_lookup() {
		let f = Fixture::new();
		let mut cases = Vec::new();
		for resource_type in ResourceType::ALL {
			let path = format!("/{}/not-a-uuid", resource_type.path_segment());
			for method in [Method::PUT, Method::DELETE] {
				cases.push(AuthzCase::new(
					"malformed",
					method,
					path.clone(),
					Caller::User(f.alice),
					Expected::Deny(DenialKind::BadRequest),
				));
			}
		}
		f.run(cases).await;
		assert_eq!(f.gateway.lookup_count(), 0);
	}

	#[tokio::test]
	async fn either_commission_party_may_mutate() {
		let f = Fixture::new();
		let artist = f.gateway.add_user();
		let commissioner = f.gateway.add_user();
		let commission = f
			.gateway
			.add_shared(ResourceType::Commissions, &[artist, commissioner]);
		let path = format!("/commissions/{commission}");
		f.run(vec![
			AuthzCase::new("artist", Method::PUT, path.clone(), Caller::User(artist), Expected::Allow),
			AuthzCase::new(
				"commissioner",
				Method::DELETE,
				path.clone(),
				Caller::User(commissioner),
				Expected::Allow,
			),
			AuthzCase::new(
				"bystander",
				Method::PUT,
				path,
				Caller::User(f.alice),
				Expected::Deny(DenialKind::Forbidden),
			),
		])
		.await;
	}

	#[tokio::test]
	async fn missing_attachment_is_not_found_for_owner() {
		let f = Fixture::new();
		let carol = f.gateway.add_user();
		f.run(vec![
			AuthzCase::new(
				"no recruiter info",
				Method::PUT,
				format!("/recruiterInfos/{carol}"),
				Caller::User(carol),
				Expected::Deny(DenialKind::NotFound),
			),
			AuthzCase::new(
				"no artist info",
				Method::DELETE,
				format!("/professionalArtistInfos/{carol}"),
				Caller::User(carol),
				Expected::Deny(DenialKind::NotFound),
			),
			AuthzCase::new(
				"someone else's user",
				Method::PUT,
				format!("/recruiterInfos/{carol}"),
				Caller::User(f.alice),
				Expected::Deny(DenialKind::Forbidden),
			),
		])
		.await;
	}
}

mod posts {
	use super::*;

	#[tokio::test]
	async fn like_counter_is_open_to_any_caller() {
		let f = Fixture::new();
		let post = format!("/posts/{}", f.bob_rows.post);
		f.run(vec![
			AuthzCase::new(
				"delete someone else's post",
				Method::DELETE,
				post.clone(),
				Caller::User(f.alice),
				Expected::Deny(DenialKind::Forbidden),
			),
			AuthzCase::new(
				"delete with like counter",
				Method::DELETE,
				post.clone(),
				Caller::User(f.alice),
				Expected::Allow,
			)
			.with_body(json!({ "num_likes": 3 })),
			AuthzCase::new(
				"like someone else's post",
				Method::PUT,
				post.clone(),
				Caller::User(f.alice),
				Expected::Allow,
			)
			.with_body(json!({ "num_likes": 3 })),
			AuthzCase::new(
				"null like counter",
				Method::PUT,
				post.clone(),
				Caller::User(f.alice),
				Expected::Deny(DenialKind::Forbidden),
			)
			.with_body(json!({ "num_likes": null })),
			AuthzCase::new(
				"like counter plus caption",
				Method::PUT,
				post,
				Caller::User(f.alice),
				Expected::Deny(DenialKind::Forbidden),
			)
			.with_body(json!({ "num_likes": 3, "caption": "mine now" })),
		])
		.await;
	}
}

mod creation {
	use super::*;

	#[tokio::test]
	async fn owner_field_must_name_caller() {
		let f = Fixture::new();
		let alice = f.alice.to_string();
		let bob = f.bob.to_string();
		let ghost = Uuid::new_v4().to_string();
		let me = || Caller::User(f.alice);

		f.run(vec![
			AuthzCase::new("own post", Method::POST, "/posts", me(), Expected::Allow)
				.with_body(json!({ "userId": alice, "caption": "hi" })),
			AuthzCase::new(
				"post as bob",
				Method::POST,
				"/posts",
				me(),
				Expected::Deny(DenialKind::Forbidden),
			)
			.with_body(json!({ "userId": bob })),
			AuthzCase::new(
				"post as ghost",
				Method::POST,
				"/posts",
				me(),
				Expected::Deny(DenialKind::NotFound),
			)
			.with_body(json!({ "userId": ghost })),
			AuthzCase::new(
				"post with malformed owner",
				Method::POST,
				"/posts",
				me(),
				Expected::Deny(DenialKind::BadRequest),
			)
			.with_body(json!({ "userId": "nope" })),
			AuthzCase::new(
				"post with numeric owner",
				Method::POST,
				"/posts",
				me(),
				Expected::Deny(DenialKind::BadRequest),
			)
			.with_body(json!({ "userId": 42 })),
			AuthzCase::new(
				"post without owner",
				Method::POST,
				"/posts",
				me(),
				Expected::Deny(DenialKind::BadRequest),
			)
			.with_body(json!({ "caption": "hi" })),
			AuthzCase::new("own profile", Method::POST, "/profiles", me(), Expected::Allow)
				.with_body(json!({ "user_id": alice })),
			AuthzCase::new("own portfolio", Method::POST, "/portfolios", me(), Expected::Allow)
				.with_body(json!({ "user_id": alice })),
			AuthzCase::new("own like", Method::POST, "/postLikes", me(), Expected::Allow)
				.with_body(json!({ "userId": alice })),
			AuthzCase::new("own comment", Method::POST, "/comments", me(), Expected::Allow)
				.with_body(json!({ "userId": alice })),
			AuthzCase::new("follow", Method::POST, "/followings", me(), Expected::Allow)
				.with_body(json!({ "follower_id": alice })),
			AuthzCase::new(
				"follow on behalf of bob",
				Method::POST,
				"/followings",
				me(),
				Expected::Deny(DenialKind::Forbidden),
			)
			.with_body(json!({ "follower_id": bob })),
			AuthzCase::new("recruiter info", Method::POST, "/recruiterInfos", me(), Expected::Allow)
				.with_body(json!({ "id": alice })),
			AuthzCase::new(
				"artist info for bob",
				Method::POST,
				"/professionalArtistInfos",
				me(),
				Expected::Deny(DenialKind::Forbidden),
			)
			.with_body(json!({ "id": bob })),
		])
		.await;
	}

	#[tokio::test]
	async fn commissions_accept_either_party() {
		let f = Fixture::new();
		let alice = f.alice.to_string();
		let bob = f.bob.to_string();
		let carol = f.gateway.add_user().to_string();
		let me = || Caller::User(f.alice);

		f.run(vec![
			AuthzCase::new("as artist", Method::POST, "/commissions", me(), Expected::Allow)
				.with_body(json!({ "artist_id": alice, "commissioner_id": Uuid::new_v4().to_string() })),
			AuthzCase::new("as commissioner", Method::POST, "/commissions", me(), Expected::Allow)
				.with_body(json!({ "artist_id": bob, "commissioner_id": alice })),
			AuthzCase::new(
				"as artist beside a malformed commissioner",
				Method::POST,
				"/commissions",
				me(),
				Expected::Allow,
			)
			.with_body(json!({ "artist_id": alice, "commissioner_id": "X" })),
			AuthzCase::new(
				"malformed party between others",
				Method::POST,
				"/commissions",
				me(),
				Expected::Deny(DenialKind::BadRequest),
			)
			.with_body(json!({ "artist_id": bob, "commissioner_id": "X" })),
			AuthzCase::new(
				"between others",
				Method::POST,
				"/commissions",
				me(),
				Expected::Deny(DenialKind::Forbidden),
			)
			.with_body(json!({ "artist_id": bob, "commissioner_id": carol })),
			AuthzCase::new(
				"between ghosts",
				Method::POST,
				"/commissions",
				me(),
				Expected::Deny(DenialKind::NotFound),
			)
			.with_body(json!({
				"artist_id": Uuid::new_v4().to_string(),
				"commissioner_id": Uuid::new_v4().to_string(),
			})),
		])
		.await;
	}

	#[tokio::test]
	async fn portfolio_items_need_own_portfolio() {
		let f = Fixture::new();
		let me = || Caller::User(f.alice);
		f.run(vec![
			AuthzCase::new("own portfolio", Method::POST, "/portfolioItems", me(), Expected::Allow)
				.with_body(json!({ "portfolioId": f.alice_rows.portfolio.to_string() })),
			AuthzCase::new(
				"bob's portfolio",
				Method::POST,
				"/portfolioItems",
				me(),
				Expected::Deny(DenialKind::Forbidden),
			)
			.with_body(json!({ "portfolioId": f.bob_rows.portfolio.to_string() })),
			AuthzCase::new(
				"missing portfolio",
				Method::POST,
				"/portfolioItems",
				me(),
				Expected::Deny(DenialKind::NotFound),
			)
			.with_body(json!({ "portfolioId": Uuid::new_v4().to_string() })),
			AuthzCase::new(
				"no portfolio field",
				Method::POST,
				"/portfolioItems",
				me(),
				Expected::Deny(DenialKind::BadRequest),
			)
			.with_body(json!({ "title": "x" })),
		])
		.await;
	}

	#[tokio::test]
	async fn system_routes_and_unknown_collections() {
		let f = Fixture::new();
		let me = || Caller::User(f.alice);
		let mut cases: Vec<AuthzCase> = super::super::routes::SYSTEM_POST_ROUTES
			.iter()
			.map(|path| AuthzCase::new("system route", Method::POST, *path, me(), Expected::Allow))
			.collect();
		cases.push(AuthzCase::new(
			"unknown collection",
			Method::POST,
			"/widgets",
			me(),
			Expected::Deny(DenialKind::Forbidden),
		));
		cases.push(AuthzCase::new(
			"user creation with token",
			Method::POST,
			"/users/extra",
			me(),
			Expected::Deny(DenialKind::Forbidden),
		));
		f.run(cases).await;
	}
}

mod reads {
	use super::*;

	#[tokio::test]
	async fn reads_are_open_except_missing_singletons() {
		let f = Fixture::new();
		let carol = f.gateway.add_user();
		let me = || Caller::User(f.alice);
		f.run(vec![
			AuthzCase::new("bob's post", Method::GET, format!("/posts/{}", f.bob_rows.post), me(), Expected::Allow),
			AuthzCase::new("any post id", Method::GET, format!("/posts/{}", Uuid::new_v4()), me(), Expected::Allow),
			AuthzCase::new("users", Method::GET, "/users", me(), Expected::Allow),
			AuthzCase::new(
				"bob's artist info",
				Method::GET,
				format!("/professionalArtistInfos/{}", f.bob),
				me(),
				Expected::Allow,
			),
			AuthzCase::new(
				"missing artist info",
				Method::GET,
				format!("/professionalArtistInfos/{}", Uuid::new_v4()),
				me(),
				Expected::Deny(DenialKind::NotFound),
			),
			AuthzCase::new(
				"user without recruiter info",
				Method::GET,
				format!("/recruiterInfos/{carol}"),
				me(),
				Expected::Deny(DenialKind::NotFound),
			),
			AuthzCase::new(
				"malformed artist info id",
				Method::GET,
				"/professionalArtistInfos/xyz",
				me(),
				Expected::Deny(DenialKind::BadRequest),
			),
			AuthzCase::new("artist info listing", Method::GET, "/professionalArtistInfos", me(), Expected::Allow),
		])
		.await;
	}
}

fn method_strategy() -> impl Strategy<Value = Method> {
	prop_oneof![
		Just(Method::GET),
		Just(Method::POST),
		Just(Method::PUT),
		Just(Method::DELETE),
		Just(Method::PATCH),
	]
}

fn path_strategy() -> impl Strategy<Value = String> {
	let segment = prop_oneof![
		Just("users".to_string()),
		Just("posts".to_string()),
		Just("portfolioItems".to_string()),
		Just("search".to_string()),
		"[a-zA-Z]{1,12}",
	];
	let id = prop_oneof![
		Just(String::new()),
		Just(Uuid::new_v4().to_string()),
		"[a-z0-9-]{1,36}",
	];
	(segment, id).prop_map(|(segment, id)| {
		if id.is_empty() {
			format!("/{segment}")
		} else {
			format!("/{segment}/{id}")
		}
	})
}

proptest! {
	#![proptest_config(ProptestConfig::with_cases(64))]

	#[test]
	fn admin_is_allowed_everywhere(method in method_strategy(), path in path_strategy()) {
		let f = Fixture::new();
		let case = AuthzCase::new("admin", method, path, Caller::Admin, Expected::Allow);
		let verdict = tokio_test::block_on(f.engine.decide(&f.request(&case))).unwrap();
		prop_assert_eq!(verdict, Verdict::Allow);
	}

	#[test]
	fn decisions_are_repeatable(method in method_strategy(), path in path_strategy(), owner in any::<bool>()) {
		let f = Fixture::new();
		let caller = if owner { f.alice } else { f.bob };
		let case = AuthzCase::new("repeat", method, path, Caller::User(caller), Expected::Allow)
			.with_body(json!({ "userId": f.alice.to_string() }));
		let request = f.request(&case);
		let first = tokio_test::block_on(f.engine.decide(&request)).unwrap();
		let second = tokio_test::block_on(f.engine.decide(&request)).unwrap();
		prop_assert_eq!(first, second);
	}

	#[test]
	fn non_admin_reads_outside_singletons_are_allowed(path in path_strategy()) {
		let f = Fixture::new();
		let case = AuthzCase::new("read", Method::GET, path, Caller::User(f.alice), Expected::Allow);
		let verdict = tokio_test::block_on(f.engine.decide(&f.request(&case))).unwrap();
		prop_assert_eq!(verdict, Verdict::Allow);
	}
}
