use aide::OperationIo;
use axum::{
	body::Body,
	extract::{FromRequest, FromRequestParts, Request},
	http::{request, Response},
	response::IntoResponse,
};
use serde::de;

use crate::Error;

/// Extractor that deserializes a JSON body.
///
/// The same as [`axum::extract::Json`], except that it rejects with this
/// crate's [`Error`] so every failure shares one response shape.
///
/// ```
/// use masterblog::{extract::Json, model::CreatePostInput};
///
/// async fn route(Json(input): Json<CreatePostInput>) {
///   // ...
/// }
/// ```
#[derive(OperationIo)]
#[aide(
	input_with = "axum::extract::Json<T>",
	output_with = "axum::extract::Json<T>",
	json_schema
)]
pub struct Json<T>(pub T);

impl<T> IntoResponse for Json<T>
where
	T: serde::Serialize,
{
	fn into_response(self) -> Response<Body> {
		axum::extract::Json(self.0).into_response()
	}
}

#[axum::async_trait]
impl<T, S> FromRequest<S> for Json<T>
where
	T: de::DeserializeOwned,
	S: Send + Sync,
{
	type Rejection = Error;

	async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
		Ok(Self(
			axum::extract::Json::<T>::from_request(req, state).await?.0,
		))
	}
}

/// Extractor that deserializes a query string.
///
/// This is similar to [`Json<T>`], but does not consume the body.
///
/// ```
/// use masterblog::{extract::Query, model::ListPostsInput};
///
/// async fn route(Query(input): Query<ListPostsInput>) {
///   // ...
/// }
/// ```
#[derive(OperationIo)]
#[aide(
	input_with = "axum::extract::Query<T>",
	output_with = "axum::extract::Json<T>",
	json_schema
)]
pub struct Query<T>(pub T);

#[axum::async_trait]
impl<T, S> FromRequestParts<S> for Query<T>
where
	T: de::DeserializeOwned,
	S: Send + Sync,
{
	type Rejection = Error;

	async fn from_request_parts(
		parts: &mut request::Parts,
		state: &S,
	) -> Result<Self, Self::Rejection> {
		Ok(Self(
			axum::extract::Query::<T>::from_request_parts(parts, state)
				.await?
				.0,
		))
	}
}

/// Extractor that deserializes a path parameter.
#[derive(OperationIo)]
#[aide(
	input_with = "axum::extract::Path<T>",
	output_with = "axum::extract::Json<T>",
	json_schema
)]
pub struct Path<T>(pub T);

#[axum::async_trait]
impl<T, S> FromRequestParts<S> for Path<T>
where
	T: de::DeserializeOwned + Send,
	S: Send + Sync,
{
	type Rejection = Error;

	async fn from_request_parts(
		parts: &mut request::Parts,
		state: &S,
	) -> Result<Self, Self::Rejection> {
		Ok(Self(
			axum::extract::Path::<T>::from_request_parts(parts, state)
				.await?
				.0,
		))
	}
}
