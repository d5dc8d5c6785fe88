#![warn(clippy::pedantic)]

pub mod error;
pub mod extract;
pub mod model;
pub mod openapi;
pub mod repo;
pub mod route;
pub mod storage;

use std::sync::Arc;

use aide::{axum::ApiRouter, openapi::OpenApi};
use axum::{Extension, Router};
use tower::Layer as _;
use tower_http::{
	cors::CorsLayer,
	normalize_path::{NormalizePath, NormalizePathLayer},
	trace::TraceLayer,
};

pub use error::Error;

use repo::PostRepository;

pub type AppState = State;

/// The shared application state.
///
/// This should contain all shared dependencies that handlers need to access,
/// such as the post repository. For dependencies only used by a single
/// handler, you can combine states instead.
#[derive(Clone, axum::extract::FromRef)]
pub struct State {
	pub repo: PostRepository,
}

/// Builds the application router, with the generated API documentation
/// attached under `/docs`.
pub fn router(state: State) -> Router {
	let mut api = OpenApi::default();

	ApiRouter::new()
		.nest("/posts", route::post::routes())
		.nest("/docs", route::docs::routes())
		.finish_api_with(&mut api, openapi::docs)
		.layer(Extension(Arc::new(api)))
		.layer(CorsLayer::permissive())
		.layer(TraceLayer::new_for_http())
		.with_state(state)
}

/// Wraps [`router`] so trailing slashes are trimmed before routing,
/// making `/posts/` and `/posts` interchangeable.
///
/// The normalization sits outside the router, so serve the result with
/// [`axum::ServiceExt::into_make_service`] rather than
/// [`Router::into_make_service`].
pub fn app(state: State) -> NormalizePath<Router> {
	NormalizePathLayer::trim_trailing_slash().layer(router(state))
}
