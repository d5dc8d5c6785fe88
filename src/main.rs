#![warn(clippy::pedantic)]

use axum::{extract::Request, ServiceExt};
use masterblog::{app, repo::PostRepository, storage::Storage, State};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() {
	tracing_subscriber::registry()
		.with(
			EnvFilter::try_from_default_env()
				.unwrap_or_else(|_| EnvFilter::new("info,masterblog=debug")),
		)
		.with(tracing_subscriber::fmt::layer())
		.init();

	dotenvy::dotenv().ok();

	let path = std::env::var("POSTS_FILE").unwrap_or_else(|_| "posts.json".to_owned());
	let state = State {
		repo: PostRepository::new(Storage::new(path)),
	};
	let app = app(state);

	let port = std::env::var("PORT").map_or_else(
		|_| 5002,
		|port| port.parse().expect("PORT must be a number"),
	);

	let listener = tokio::net::TcpListener::bind(("0.0.0.0", port))
		.await
		.expect("failed to bind to port");

	tracing::info!("listening on port {}", port);

	axum::serve(listener, ServiceExt::<Request>::into_make_service(app))
		.await
		.unwrap();
}
