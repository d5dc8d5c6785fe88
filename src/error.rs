use axum::{
	body::Body,
	extract::rejection,
	http::{Response, StatusCode},
	response::IntoResponse,
	Json,
};
use schemars::JsonSchema;
use serde::Serialize;

/// Error type for the application.
///
/// The [`Display`](std::fmt::Display) output of the 4xx variants is sent to
/// the client verbatim, so those messages must stay stable and free of
/// internal detail. Server errors are logged in full and answered with a
/// generic message instead.
#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Missing title or content")]
	MissingTitleOrContent,
	#[error("Post with id {0} not found.")]
	UnknownPost(u64),
	#[error("Invalid sort field '{0}'. Expected 'title', 'content', 'author' or 'date'.")]
	InvalidSortField(String),
	#[error("Invalid sort direction '{0}'. Expected 'asc' or 'desc'.")]
	InvalidSortDirection(String),
	#[error("json error: {0}")]
	Json(#[from] rejection::JsonRejection),
	#[error("query error: {0}")]
	Query(#[from] rejection::QueryRejection),
	#[error("path error: {0}")]
	Path(#[from] rejection::PathRejection),
	#[error("no post ids left")]
	IdsExhausted,
	#[error("storage error: {0}")]
	Io(#[from] std::io::Error),
	#[error("storage encoding error: {0}")]
	Encode(#[from] serde_json::Error),
}

/// The JSON body of every error response.
#[derive(Debug, Serialize, JsonSchema)]
pub struct ErrorResponse {
	pub error: String,
}

impl Error {
	pub fn status(&self) -> StatusCode {
		match self {
			Self::MissingTitleOrContent
			| Self::InvalidSortField(..)
			| Self::InvalidSortDirection(..)
			| Self::Json(..)
			| Self::Query(..)
			| Self::Path(..) => StatusCode::BAD_REQUEST,
			Self::UnknownPost(..) => StatusCode::NOT_FOUND,
			Self::IdsExhausted | Self::Io(..) | Self::Encode(..) => {
				StatusCode::INTERNAL_SERVER_ERROR
			}
		}
	}
}

impl IntoResponse for Error {
	fn into_response(self) -> Response<Body> {
		let status = self.status();
		let error = if status.is_server_error() {
			tracing::error!(error = %self, "request failed");
			"internal server error".to_owned()
		} else {
			self.to_string()
		};

		(status, Json(ErrorResponse { error })).into_response()
	}
}

impl aide::OperationOutput for Error {
	type Inner = ErrorResponse;

	fn operation_response(
		ctx: &mut aide::gen::GenContext,
		operation: &mut aide::openapi::Operation,
	) -> Option<aide::openapi::Response> {
		Json::<ErrorResponse>::operation_response(ctx, operation)
	}

	fn inferred_responses(
		ctx: &mut aide::gen::GenContext,
		operation: &mut aide::openapi::Operation,
	) -> Vec<(Option<u16>, aide::openapi::Response)> {
		Json::<ErrorResponse>::inferred_responses(ctx, operation)
	}
}
