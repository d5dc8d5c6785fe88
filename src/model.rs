use chrono::NaiveDate;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A single blog post.
///
/// This is both the persisted record and the shape returned to the client;
/// the two are identical by design.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Post {
	/// The unique identifier of the post. Assigned once, never reassigned
	/// while the post exists.
	pub id: u64,
	/// The title of the post.
	pub title: String,
	/// The content of the post.
	pub content: String,
	/// The author of the post, `"Unknown"` when none was supplied.
	pub author: String,
	/// The publication date of the post in `YYYY-MM-DD` form.
	pub date: NaiveDate,
}

/// Input for creating a new post.
///
/// `title` and `content` are required, but declared optional here so the
/// repository can answer with its canonical "Missing title or content"
/// message instead of a deserialization rejection.
#[derive(Debug, Default, Deserialize, JsonSchema)]
pub struct CreatePostInput {
	pub title: Option<String>,
	pub content: Option<String>,
	/// Defaults to `"Unknown"` when omitted.
	pub author: Option<String>,
	/// Defaults to the current date when omitted.
	pub date: Option<NaiveDate>,
}

/// A partial update for an existing post. Fields that are absent are left
/// unchanged.
#[derive(Debug, Default, Deserialize, JsonSchema)]
pub struct UpdatePostInput {
	pub title: Option<String>,
	pub content: Option<String>,
	pub author: Option<String>,
	pub date: Option<NaiveDate>,
}

/// Query parameters accepted by the listing endpoint.
#[derive(Debug, Default, Deserialize, JsonSchema)]
pub struct ListPostsInput {
	/// Case-insensitive substring matched against title or author.
	pub title: Option<String>,
	/// Case-insensitive substring matched against content or date.
	pub content: Option<String>,
	/// Field to sort by: `title`, `content`, `author` or `date`.
	pub sort: Option<String>,
	/// Sort direction, `asc` (the default) or `desc`.
	pub direction: Option<String>,
}

/// Query parameters accepted by the search endpoint. Same filter as
/// [`ListPostsInput`], without the sort controls.
#[derive(Debug, Default, Deserialize, JsonSchema)]
pub struct SearchPostsInput {
	pub title: Option<String>,
	pub content: Option<String>,
}

/// Confirmation returned after a post has been deleted.
#[derive(Debug, Serialize, JsonSchema)]
pub struct DeletedPost {
	pub id: u64,
	pub message: String,
}

impl DeletedPost {
	pub fn new(id: u64) -> Self {
		Self {
			id,
			message: format!("Post with id {id} has been deleted successfully."),
		}
	}
}
