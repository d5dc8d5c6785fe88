use std::{str::FromStr, sync::Arc};

use chrono::Utc;
use tokio::sync::Mutex;

use crate::{
	model::{CreatePostInput, ListPostsInput, Post, SearchPostsInput, UpdatePostInput},
	storage::Storage,
	Error,
};

/// Author recorded for posts created without one.
pub const UNKNOWN_AUTHOR: &str = "Unknown";

/// A field posts can be sorted by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
	Title,
	Content,
	Author,
	Date,
}

impl FromStr for SortField {
	type Err = Error;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"title" => Ok(Self::Title),
			"content" => Ok(Self::Content),
			"author" => Ok(Self::Author),
			"date" => Ok(Self::Date),
			_ => Err(Error::InvalidSortField(s.to_owned())),
		}
	}
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortDirection {
	#[default]
	Ascending,
	Descending,
}

impl FromStr for SortDirection {
	type Err = Error;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"asc" => Ok(Self::Ascending),
			"desc" => Ok(Self::Descending),
			_ => Err(Error::InvalidSortDirection(s.to_owned())),
		}
	}
}

/// The canonical owner of the post collection.
///
/// Every operation loads the collection from [`Storage`] first, so disk is
/// the single source of truth across restarts. Mutations run a full
/// load-modify-save cycle under [`Self::write_lock`].
#[derive(Debug, Clone)]
pub struct PostRepository {
	storage: Storage,
	/// Serializes the load-modify-save cycle of mutating operations.
	write_lock: Arc<Mutex<()>>,
}

impl PostRepository {
	pub fn new(storage: Storage) -> Self {
		Self {
			storage,
			write_lock: Arc::new(Mutex::new(())),
		}
	}

	/// Lists posts, optionally filtered and sorted.
	///
	/// The sort field and direction are validated before anything is
	/// loaded; the direction is only consulted when a sort field is
	/// present. Without a sort, posts come back in insertion order.
	pub async fn list(&self, input: &ListPostsInput) -> Result<Vec<Post>, Error> {
		let sort = match &input.sort {
			Some(field) => Some((
				field.parse::<SortField>()?,
				match &input.direction {
					Some(direction) => direction.parse()?,
					None => SortDirection::default(),
				},
			)),
			None => None,
		};

		let mut posts = self.storage.load().await?;

		retain_matches(&mut posts, input.title.as_deref(), input.content.as_deref());

		if let Some((field, direction)) = sort {
			sort_posts(&mut posts, field, direction);
		}

		Ok(posts)
	}

	/// Searches posts with the same filter semantics as [`Self::list`],
	/// without the sort controls.
	pub async fn search(&self, input: &SearchPostsInput) -> Result<Vec<Post>, Error> {
		let mut posts = self.storage.load().await?;

		retain_matches(&mut posts, input.title.as_deref(), input.content.as_deref());

		Ok(posts)
	}

	/// Creates a new post and persists it.
	///
	/// `title` and `content` must be present and non-empty. The new id is
	/// one above the highest existing id, starting at 1 for an empty
	/// collection.
	pub async fn create(&self, input: CreatePostInput) -> Result<Post, Error> {
		let (Some(title), Some(content)) = (
			input.title.filter(|title| !title.is_empty()),
			input.content.filter(|content| !content.is_empty()),
		) else {
			return Err(Error::MissingTitleOrContent);
		};

		let _guard = self.write_lock.lock().await;
		let mut posts = self.storage.load().await?;
		let id = posts
			.iter()
			.map(|post| post.id)
			.max()
			.unwrap_or(0)
			.checked_add(1)
			.ok_or(Error::IdsExhausted)?;
		let post = Post {
			id,
			title,
			content,
			author: input.author.unwrap_or_else(|| UNKNOWN_AUTHOR.to_owned()),
			date: input.date.unwrap_or_else(|| Utc::now().date_naive()),
		};

		posts.push(post.clone());
		self.storage.save(&posts).await?;

		Ok(post)
	}

	/// Applies the supplied fields to an existing post and persists it.
	pub async fn update(&self, id: u64, input: UpdatePostInput) -> Result<Post, Error> {
		let _guard = self.write_lock.lock().await;
		let mut posts = self.storage.load().await?;
		let post = posts
			.iter_mut()
			.find(|post| post.id == id)
			.ok_or(Error::UnknownPost(id))?;

		if let Some(title) = input.title {
			post.title = title;
		}

		if let Some(content) = input.content {
			post.content = content;
		}

		if let Some(author) = input.author {
			post.author = author;
		}

		if let Some(date) = input.date {
			post.date = date;
		}

		let post = post.clone();

		self.storage.save(&posts).await?;

		Ok(post)
	}

	/// Removes a post and persists the remaining collection, returning the
	/// removed post.
	pub async fn delete(&self, id: u64) -> Result<Post, Error> {
		let _guard = self.write_lock.lock().await;
		let mut posts = self.storage.load().await?;
		let index = posts
			.iter()
			.position(|post| post.id == id)
			.ok_or(Error::UnknownPost(id))?;
		let post = posts.remove(index);

		self.storage.save(&posts).await?;

		Ok(post)
	}
}

/// Keeps the posts matching the given queries.
///
/// A title query matches case-insensitively against the title or the
/// author, a content query against the content or the date. With no
/// queries, every post is kept.
fn retain_matches(posts: &mut Vec<Post>, title_query: Option<&str>, content_query: Option<&str>) {
	let title_query = title_query.unwrap_or_default().to_lowercase();
	let content_query = content_query.unwrap_or_default().to_lowercase();

	if title_query.is_empty() && content_query.is_empty() {
		return;
	}

	posts.retain(|post| {
		(!title_query.is_empty()
			&& (post.title.to_lowercase().contains(&title_query)
				|| post.author.to_lowercase().contains(&title_query)))
			|| (!content_query.is_empty()
				&& (post.content.to_lowercase().contains(&content_query)
					|| post.date.to_string().contains(&content_query)))
	});
}

/// Sorts posts in place. Text fields compare case-insensitively, dates by
/// calendar value. Equal posts keep their relative order.
fn sort_posts(posts: &mut [Post], field: SortField, direction: SortDirection) {
	posts.sort_by(|a, b| {
		let ordering = match field {
			SortField::Title => a.title.to_lowercase().cmp(&b.title.to_lowercase()),
			SortField::Content => a.content.to_lowercase().cmp(&b.content.to_lowercase()),
			SortField::Author => a.author.to_lowercase().cmp(&b.author.to_lowercase()),
			SortField::Date => a.date.cmp(&b.date),
		};

		match direction {
			SortDirection::Ascending => ordering,
			SortDirection::Descending => ordering.reverse(),
		}
	});
}

#[cfg(test)]
mod test {
	use chrono::NaiveDate;
	use tempfile::TempDir;

	use super::*;

	fn repo() -> (TempDir, PostRepository) {
		let dir = tempfile::tempdir().unwrap();
		let repo = PostRepository::new(Storage::new(dir.path().join("posts.json")));

		(dir, repo)
	}

	fn create(title: &str, content: &str) -> CreatePostInput {
		CreatePostInput {
			title: Some(title.to_owned()),
			content: Some(content.to_owned()),
			..Default::default()
		}
	}

	fn date(value: &str) -> NaiveDate {
		value.parse().unwrap()
	}

	#[tokio::test]
	async fn ids_start_at_one_and_increase() {
		let (_dir, repo) = repo();

		for expected in 1..=3 {
			let post = repo
				.create(create(&format!("Post {expected}"), "content"))
				.await
				.unwrap();

			assert_eq!(post.id, expected);
		}
	}

	#[tokio::test]
	async fn create_applies_defaults() {
		let (_dir, repo) = repo();
		let post = repo.create(create("T", "C")).await.unwrap();

		assert_eq!(post.id, 1);
		assert_eq!(post.title, "T");
		assert_eq!(post.content, "C");
		assert_eq!(post.author, UNKNOWN_AUTHOR);
		assert_eq!(post.date, Utc::now().date_naive());
	}

	#[tokio::test]
	async fn create_preserves_explicit_author_and_date() {
		let (_dir, repo) = repo();

		repo.create(create("T", "C")).await.unwrap();

		let post = repo
			.create(CreatePostInput {
				author: Some("Ann".to_owned()),
				date: Some(date("2024-01-01")),
				..create("T2", "C2")
			})
			.await
			.unwrap();

		assert_eq!(post.id, 2);
		assert_eq!(post.author, "Ann");
		assert_eq!(post.date, date("2024-01-01"));
	}

	#[tokio::test]
	async fn create_without_title_is_rejected() {
		let (_dir, repo) = repo();
		let error = repo
			.create(CreatePostInput {
				content: Some("C".to_owned()),
				..Default::default()
			})
			.await
			.unwrap_err();

		assert!(matches!(error, Error::MissingTitleOrContent));
	}

	#[tokio::test]
	async fn create_with_empty_content_is_rejected() {
		let (_dir, repo) = repo();
		let error = repo.create(create("T", "")).await.unwrap_err();

		assert!(matches!(error, Error::MissingTitleOrContent));
	}

	#[tokio::test]
	async fn create_fails_when_no_ids_are_left() {
		let dir = tempfile::tempdir().unwrap();
		let storage = Storage::new(dir.path().join("posts.json"));

		storage
			.save(&[Post {
				id: u64::MAX,
				title: "Last".to_owned(),
				content: "c".to_owned(),
				author: UNKNOWN_AUTHOR.to_owned(),
				date: date("2024-01-01"),
			}])
			.await
			.unwrap();

		let repo = PostRepository::new(storage);
		let error = repo.create(create("T", "C")).await.unwrap_err();

		assert!(matches!(error, Error::IdsExhausted));
	}

	#[tokio::test]
	async fn list_returns_insertion_order() {
		let (_dir, repo) = repo();

		repo.create(create("Banana", "b")).await.unwrap();
		repo.create(create("apple", "a")).await.unwrap();

		let posts = repo.list(&ListPostsInput::default()).await.unwrap();
		let titles = posts.iter().map(|post| post.title.as_str()).collect::<Vec<_>>();

		assert_eq!(titles, ["Banana", "apple"]);
	}

	#[tokio::test]
	async fn update_with_empty_payload_changes_nothing() {
		let (_dir, repo) = repo();
		let before = repo.create(create("T", "C")).await.unwrap();
		let after = repo.update(before.id, UpdatePostInput::default()).await.unwrap();

		assert_eq!(after, before);
	}

	#[tokio::test]
	async fn update_applies_partial_fields() {
		let (_dir, repo) = repo();
		let before = repo.create(create("T", "C")).await.unwrap();
		let after = repo
			.update(
				before.id,
				UpdatePostInput {
					title: Some("New title".to_owned()),
					date: Some(date("2023-12-31")),
					..Default::default()
				},
			)
			.await
			.unwrap();

		assert_eq!(after.title, "New title");
		assert_eq!(after.content, before.content);
		assert_eq!(after.author, before.author);
		assert_eq!(after.date, date("2023-12-31"));
	}

	#[tokio::test]
	async fn update_unknown_id_is_not_found() {
		let (_dir, repo) = repo();
		let error = repo.update(99, UpdatePostInput::default()).await.unwrap_err();

		assert!(matches!(error, Error::UnknownPost(99)));
	}

	#[tokio::test]
	async fn delete_removes_the_post() {
		let (_dir, repo) = repo();
		let first = repo.create(create("First", "a")).await.unwrap();
		let second = repo.create(create("Second", "b")).await.unwrap();

		let removed = repo.delete(first.id).await.unwrap();

		assert_eq!(removed, first);

		let posts = repo.list(&ListPostsInput::default()).await.unwrap();

		assert_eq!(posts, vec![second]);
	}

	#[tokio::test]
	async fn delete_unknown_id_is_not_found() {
		let (_dir, repo) = repo();
		let error = repo.delete(7).await.unwrap_err();

		assert!(matches!(error, Error::UnknownPost(7)));
	}

	#[tokio::test]
	async fn delete_then_create_reuses_the_highest_id() {
		let (_dir, repo) = repo();

		repo.create(create("First", "a")).await.unwrap();

		let second = repo.create(create("Second", "b")).await.unwrap();

		repo.delete(second.id).await.unwrap();

		let third = repo.create(create("Third", "c")).await.unwrap();

		assert_eq!(third.id, second.id);
	}

	#[tokio::test]
	async fn sort_by_title_is_case_insensitive() {
		let (_dir, repo) = repo();

		repo.create(create("Banana", "b")).await.unwrap();
		repo.create(create("apple", "a")).await.unwrap();

		let posts = repo
			.list(&ListPostsInput {
				sort: Some("title".to_owned()),
				..Default::default()
			})
			.await
			.unwrap();
		let titles = posts.iter().map(|post| post.title.as_str()).collect::<Vec<_>>();

		assert_eq!(titles, ["apple", "Banana"]);
	}

	#[tokio::test]
	async fn sort_by_date_uses_calendar_order() {
		let (_dir, repo) = repo();

		for day in ["2024-03-01", "2023-01-15", "2024-01-02"] {
			repo.create(CreatePostInput {
				date: Some(date(day)),
				..create(day, "c")
			})
			.await
			.unwrap();
		}

		let posts = repo
			.list(&ListPostsInput {
				sort: Some("date".to_owned()),
				..Default::default()
			})
			.await
			.unwrap();
		let dates = posts.iter().map(|post| post.date.to_string()).collect::<Vec<_>>();

		assert_eq!(dates, ["2023-01-15", "2024-01-02", "2024-03-01"]);
	}

	#[tokio::test]
	async fn sort_direction_desc_reverses_the_order() {
		let (_dir, repo) = repo();

		repo.create(create("apple", "a")).await.unwrap();
		repo.create(create("Banana", "b")).await.unwrap();

		let posts = repo
			.list(&ListPostsInput {
				sort: Some("title".to_owned()),
				direction: Some("desc".to_owned()),
				..Default::default()
			})
			.await
			.unwrap();
		let titles = posts.iter().map(|post| post.title.as_str()).collect::<Vec<_>>();

		assert_eq!(titles, ["Banana", "apple"]);
	}

	#[tokio::test]
	async fn sort_keeps_ties_in_insertion_order() {
		let (_dir, repo) = repo();

		repo.create(create("Same", "first")).await.unwrap();
		repo.create(create("same", "second")).await.unwrap();

		let posts = repo
			.list(&ListPostsInput {
				sort: Some("title".to_owned()),
				..Default::default()
			})
			.await
			.unwrap();
		let contents = posts
			.iter()
			.map(|post| post.content.as_str())
			.collect::<Vec<_>>();

		assert_eq!(contents, ["first", "second"]);
	}

	#[tokio::test]
	async fn sort_by_date_with_a_single_post_returns_it_unchanged() {
		let (_dir, repo) = repo();
		let post = repo
			.create(CreatePostInput {
				author: Some("Bob".to_owned()),
				date: Some(date("2024-01-01")),
				..create("Hello", "World")
			})
			.await
			.unwrap();
		let posts = repo
			.list(&ListPostsInput {
				sort: Some("date".to_owned()),
				..Default::default()
			})
			.await
			.unwrap();

		assert_eq!(posts, vec![post]);
	}

	#[tokio::test]
	async fn invalid_sort_field_is_rejected() {
		let (_dir, repo) = repo();
		let error = repo
			.list(&ListPostsInput {
				sort: Some("bogus".to_owned()),
				..Default::default()
			})
			.await
			.unwrap_err();

		assert!(matches!(error, Error::InvalidSortField(field) if field == "bogus"));
	}

	#[tokio::test]
	async fn invalid_sort_direction_is_rejected() {
		let (_dir, repo) = repo();
		let error = repo
			.list(&ListPostsInput {
				sort: Some("title".to_owned()),
				direction: Some("sideways".to_owned()),
				..Default::default()
			})
			.await
			.unwrap_err();

		assert!(matches!(error, Error::InvalidSortDirection(direction) if direction == "sideways"));
	}

	#[tokio::test]
	async fn direction_without_sort_is_ignored() {
		let (_dir, repo) = repo();

		repo.create(create("T", "C")).await.unwrap();

		let posts = repo
			.list(&ListPostsInput {
				direction: Some("sideways".to_owned()),
				..Default::default()
			})
			.await
			.unwrap();

		assert_eq!(posts.len(), 1);
	}

	#[tokio::test]
	async fn title_query_matches_a_title_substring() {
		let (_dir, repo) = repo();

		repo.create(create("Hello", "World")).await.unwrap();

		let posts = repo
			.search(&SearchPostsInput {
				title: Some("ell".to_owned()),
				..Default::default()
			})
			.await
			.unwrap();

		assert_eq!(posts.len(), 1);
		assert_eq!(posts[0].title, "Hello");
	}

	#[tokio::test]
	async fn title_query_also_matches_the_author() {
		let (_dir, repo) = repo();

		repo.create(CreatePostInput {
			author: Some("Alice".to_owned()),
			..create("Hello", "World")
		})
		.await
		.unwrap();
		repo.create(create("Other", "Post")).await.unwrap();

		let posts = repo
			.search(&SearchPostsInput {
				title: Some("alice".to_owned()),
				..Default::default()
			})
			.await
			.unwrap();

		assert_eq!(posts.len(), 1);
		assert_eq!(posts[0].title, "Hello");
	}

	#[tokio::test]
	async fn content_query_also_matches_the_date() {
		let (_dir, repo) = repo();

		repo.create(CreatePostInput {
			date: Some(date("2024-06-15")),
			..create("Hello", "World")
		})
		.await
		.unwrap();
		repo.create(CreatePostInput {
			date: Some(date("2023-02-02")),
			..create("Other", "Post")
		})
		.await
		.unwrap();

		let posts = repo
			.search(&SearchPostsInput {
				content: Some("2024-06".to_owned()),
				..Default::default()
			})
			.await
			.unwrap();

		assert_eq!(posts.len(), 1);
		assert_eq!(posts[0].title, "Hello");
	}

	#[tokio::test]
	async fn query_without_match_returns_an_empty_list() {
		let (_dir, repo) = repo();

		repo.create(create("Hello", "World")).await.unwrap();

		let posts = repo
			.search(&SearchPostsInput {
				title: Some("xyz".to_owned()),
				..Default::default()
			})
			.await
			.unwrap();

		assert!(posts.is_empty());
	}

	#[tokio::test]
	async fn list_applies_the_same_filter_as_search() {
		let (_dir, repo) = repo();

		repo.create(create("Hello", "World")).await.unwrap();
		repo.create(create("Bye", "Moon")).await.unwrap();

		let posts = repo
			.list(&ListPostsInput {
				content: Some("moo".to_owned()),
				..Default::default()
			})
			.await
			.unwrap();

		assert_eq!(posts.len(), 1);
		assert_eq!(posts[0].title, "Bye");
	}
}
