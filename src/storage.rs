use std::path::PathBuf;

use tokio::fs;

use crate::{model::Post, Error};

/// File-backed persistence for the post collection.
///
/// The whole collection is stored as one pretty-printed JSON array. Reads
/// are lenient so a missing or unreadable file never takes the service
/// down; writes go through a temporary file and a rename so a crash
/// mid-write cannot leave a half-written collection behind.
#[derive(Debug, Clone)]
pub struct Storage {
	path: PathBuf,
}

impl Storage {
	pub fn new(path: impl Into<PathBuf>) -> Self {
		Self { path: path.into() }
	}

	/// Reads the full post collection from disk.
	///
	/// A missing file or undecodable content yields an empty collection.
	/// Other io failures are real faults and propagate.
	pub async fn load(&self) -> Result<Vec<Post>, Error> {
		let bytes = match fs::read(&self.path).await {
			Ok(bytes) => bytes,
			Err(error) if error.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
			Err(error) => return Err(error.into()),
		};

		match serde_json::from_slice(&bytes) {
			Ok(posts) => Ok(posts),
			Err(error) => {
				tracing::warn!(
					path = %self.path.display(),
					%error,
					"unreadable post file, treating as empty"
				);

				Ok(Vec::new())
			}
		}
	}

	/// Replaces the post collection on disk.
	pub async fn save(&self, posts: &[Post]) -> Result<(), Error> {
		if let Some(parent) = self.path.parent() {
			if !parent.as_os_str().is_empty() {
				fs::create_dir_all(parent).await?;
			}
		}

		let bytes = serde_json::to_vec_pretty(posts)?;
		let tmp = self.path.with_extension("tmp");

		fs::write(&tmp, &bytes).await?;
		fs::rename(&tmp, &self.path).await?;

		Ok(())
	}
}
