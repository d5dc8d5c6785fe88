use aide::{
	axum::{
		routing::{get_with, put_with},
		ApiRouter, IntoApiResponse,
	},
	transform::TransformOperation,
};
use axum::{extract::State, http::StatusCode, response::IntoResponse};

use crate::{
	extract::{Json, Path, Query},
	model::{
		CreatePostInput, DeletedPost, ListPostsInput, Post, SearchPostsInput, UpdatePostInput,
	},
	openapi::tag,
	repo::PostRepository,
	AppState, Error,
};

pub fn routes() -> ApiRouter<AppState> {
	ApiRouter::new()
		.api_route(
			"/",
			get_with(list_posts, list_posts_docs).post_with(create_post, create_post_docs),
		)
		.api_route("/search", get_with(search_posts, search_posts_docs))
		.api_route(
			"/:id",
			put_with(update_post, update_post_docs).delete_with(delete_post, delete_post_docs),
		)
}

fn list_posts_docs(op: TransformOperation) -> TransformOperation {
	op.summary("List posts")
		.description("Returns all posts, optionally filtered and sorted.")
		.tag(tag::POST)
		.response::<200, Json<Vec<Post>>>()
}

/// Returns all posts, optionally filtered and sorted.
async fn list_posts(
	State(repo): State<PostRepository>,
	Query(input): Query<ListPostsInput>,
) -> Result<impl IntoApiResponse, Error> {
	Ok(Json(repo.list(&input).await?))
}

fn create_post_docs(op: TransformOperation) -> TransformOperation {
	op.summary("Create post")
		.description("Creates a new post and returns it.")
		.tag(tag::POST)
		.response::<201, Json<Post>>()
}

/// Creates a new post and returns it.
async fn create_post(
	State(repo): State<PostRepository>,
	Json(input): Json<CreatePostInput>,
) -> Result<impl IntoApiResponse, Error> {
	let post = repo.create(input).await?;

	Ok((StatusCode::CREATED, Json(post)).into_response())
}

fn search_posts_docs(op: TransformOperation) -> TransformOperation {
	op.summary("Search posts")
		.description("Returns the posts matching the given queries.")
		.tag(tag::POST)
		.response::<200, Json<Vec<Post>>>()
}

/// Returns the posts matching the given queries.
async fn search_posts(
	State(repo): State<PostRepository>,
	Query(input): Query<SearchPostsInput>,
) -> Result<impl IntoApiResponse, Error> {
	Ok(Json(repo.search(&input).await?))
}

fn update_post_docs(op: TransformOperation) -> TransformOperation {
	op.summary("Update post")
		.description("Applies the supplied fields to an existing post.")
		.tag(tag::POST)
		.response::<200, Json<Post>>()
}

/// Applies the supplied fields to an existing post.
async fn update_post(
	State(repo): State<PostRepository>,
	Path(id): Path<u64>,
	Json(input): Json<UpdatePostInput>,
) -> Result<impl IntoApiResponse, Error> {
	Ok(Json(repo.update(id, input).await?))
}

fn delete_post_docs(op: TransformOperation) -> TransformOperation {
	op.summary("Delete post")
		.description("Deletes an existing post by its unique id.")
		.tag(tag::POST)
		.response::<200, Json<DeletedPost>>()
}

/// Deletes an existing post by its unique id.
async fn delete_post(
	State(repo): State<PostRepository>,
	Path(id): Path<u64>,
) -> Result<impl IntoApiResponse, Error> {
	let post = repo.delete(id).await?;

	Ok(Json(DeletedPost::new(post.id)))
}
