//! Image files attached to generated users and events.
//!
//! Images are optional. A missing directory, an unreadable file or a failed
//! blob write only costs the record its picture.

use std::path::{Path, PathBuf};

use leisurelink_core::{entity::BlobRef, store::SeedStore};
use rand::{Rng, seq::SliceRandom as _};

const IMAGE_EXTENSIONS: [&str; 3] = ["png", "jpg", "jpeg"];

/// The image files of one directory.
#[derive(Debug, Clone, Default)]
pub struct ImagePool {
  paths: Vec<PathBuf>,
}

impl ImagePool {
  pub fn empty() -> Self { Self::default() }

  /// List the `.png`, `.jpg` and `.jpeg` files directly inside `dir`.
  pub fn scan(dir: &Path) -> Self {
    let entries = match std::fs::read_dir(dir) {
      Ok(entries) => entries,
      Err(err) => {
        tracing::warn!(dir = %dir.display(), error = %err, "image directory unreadable; continuing without images");
        return Self::empty();
      }
    };

    let mut paths: Vec<PathBuf> = entries
      .filter_map(|e| e.ok().map(|e| e.path()))
      .filter(|p| p.is_file() && has_image_extension(p))
      .collect();
    // Directory order is unspecified; sort so seeded runs pick the same files.
    paths.sort();

    if paths.is_empty() {
      tracing::info!(dir = %dir.display(), "no images found");
    }
    Self { paths }
  }

  /// Scan `dir` if given, otherwise return an empty pool.
  pub fn from_dir(dir: Option<&Path>) -> Self {
    dir.map(Self::scan).unwrap_or_default()
  }

  pub fn len(&self) -> usize { self.paths.len() }

  pub fn is_empty(&self) -> bool { self.paths.is_empty() }

  pub fn pick<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<&Path> {
    self.paths.choose(rng).map(PathBuf::as_path)
  }
}

fn has_image_extension(path: &Path) -> bool {
  path
    .extension()
    .and_then(|e| e.to_str())
    .is_some_and(|e| IMAGE_EXTENSIONS.contains(&e))
}

/// Pick an image from `pool` and store it as a blob. `None` when the pool
/// is empty or anything on the way fails.
pub async fn store_random_image<S, R>(
  store: &S,
  pool: &ImagePool,
  rng: &mut R,
) -> Option<BlobRef>
where
  S: SeedStore,
  R: Rng + ?Sized,
{
  let path = pool.pick(rng)?.to_path_buf();

  let bytes = match tokio::fs::read(&path).await {
    Ok(bytes) => bytes,
    Err(err) => {
      tracing::warn!(path = %path.display(), error = %err, "cannot read image");
      return None;
    }
  };

  match store.store_blob(bytes).await {
    Ok(blob) => Some(blob),
    Err(err) => {
      tracing::warn!(path = %path.display(), error = %err, "cannot store image");
      None
    }
  }
}
