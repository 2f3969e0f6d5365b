//! Shared helpers for the generator's integration tests.

#![allow(dead_code)]

use std::sync::{
  Mutex,
  atomic::{AtomicUsize, Ordering},
};

use chrono::{TimeZone as _, Utc};
use leisurelink_core::{
  entity::{
    BlobRef, Category, Comment, Event, EventImage, Membership, User,
    UserDetails,
  },
  store::{SeedStore, Table},
};
use leisurelink_seed::{GenContext, SeedConfig, hash::Argon2Hasher};
use leisurelink_store_sqlite::SqliteStore;
use thiserror::Error;
use uuid::Uuid;

pub async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

/// Minimum-cost argon2 so hundreds of users hash quickly.
pub fn cheap_hasher() -> Argon2Hasher {
  Argon2Hasher::new(argon2::Params::MIN_M_COST, 1).unwrap()
}

pub fn ctx(seed: u64) -> GenContext {
  GenContext::seeded(seed).at(Utc.with_ymd_and_hms(2026, 10, 17, 9, 0, 0).unwrap())
}

/// A directory holding two small "images".
pub fn image_dir() -> tempfile::TempDir {
  let dir = tempfile::tempdir().unwrap();
  std::fs::write(dir.path().join("a.png"), b"not really a png").unwrap();
  std::fs::write(dir.path().join("b.jpg"), b"nor a jpeg").unwrap();
  dir
}

/// A small run with every phase on.
pub fn small_config() -> SeedConfig {
  SeedConfig {
    users: 20,
    events: 40,
    categories: 6,
    comments: 30,
    ..Default::default()
  }
}

// ─── Fault injection ─────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum FlakyError {
  #[error("injected failure in {0}")]
  Injected(&'static str),

  #[error(transparent)]
  Inner(#[from] leisurelink_store_sqlite::Error),
}

/// Wraps a [`SqliteStore`] and fails selected calls.
pub struct FlakyStore {
  pub inner:           SqliteStore,
  /// Fail every n-th `insert_user` call (1-based); 0 disables.
  pub fail_user_every: usize,
  /// Fail every n-th guest `insert_membership` call; 0 disables.
  pub fail_guest_every: usize,
  /// Tables whose `list_ids` fails.
  pub broken_lists:    Mutex<Vec<Table>>,
  /// Every `store_blob` call fails.
  pub fail_blobs:      bool,
  user_calls:          AtomicUsize,
  guest_calls:         AtomicUsize,
}

impl FlakyStore {
  pub fn new(inner: SqliteStore) -> Self {
    Self {
      inner,
      fail_user_every: 0,
      fail_guest_every: 0,
      broken_lists: Mutex::new(Vec::new()),
      fail_blobs: false,
      user_calls: AtomicUsize::new(0),
      guest_calls: AtomicUsize::new(0),
    }
  }

  pub fn break_list(&self, table: Table) {
    self.broken_lists.lock().unwrap().push(table);
  }

  fn nth_fails(counter: &AtomicUsize, every: usize) -> bool {
    let n = counter.fetch_add(1, Ordering::SeqCst) + 1;
    every != 0 && n % every == 0
  }
}

type R<T> = Result<T, FlakyError>;

impl SeedStore for FlakyStore {
  type Error = FlakyError;

  async fn begin(&self) -> R<()> { Ok(self.inner.begin().await?) }

  async fn commit(&self) -> R<()> { Ok(self.inner.commit().await?) }

  async fn rollback(&self) -> R<()> { Ok(self.inner.rollback().await?) }

  async fn begin_unit(&self) -> R<()> { Ok(self.inner.begin_unit().await?) }

  async fn commit_unit(&self) -> R<()> { Ok(self.inner.commit_unit().await?) }

  async fn rollback_unit(&self) -> R<()> { Ok(self.inner.rollback_unit().await?) }

  async fn insert_user(&self, user: &User) -> R<()> {
    if Self::nth_fails(&self.user_calls, self.fail_user_every) {
      return Err(FlakyError::Injected("insert_user"));
    }
    Ok(self.inner.insert_user(user).await?)
  }

  async fn insert_user_details(&self, details: &UserDetails) -> R<()> {
    Ok(self.inner.insert_user_details(details).await?)
  }

  async fn attach_user_details(&self, user_id: Uuid, details_id: Uuid) -> R<()> {
    Ok(self.inner.attach_user_details(user_id, details_id).await?)
  }

  async fn insert_event(&self, event: &Event) -> R<()> {
    Ok(self.inner.insert_event(event).await?)
  }

  async fn insert_event_image(&self, image: &EventImage) -> R<()> {
    Ok(self.inner.insert_event_image(image).await?)
  }

  async fn insert_category(&self, category: &Category) -> R<()> {
    Ok(self.inner.insert_category(category).await?)
  }

  async fn insert_comment(&self, comment: &Comment) -> R<()> {
    Ok(self.inner.insert_comment(comment).await?)
  }

  async fn insert_membership(&self, membership: &Membership) -> R<()> {
    use leisurelink_core::entity::MembershipRole;
    if membership.role == MembershipRole::Guest
      && Self::nth_fails(&self.guest_calls, self.fail_guest_every)
    {
      return Err(FlakyError::Injected("insert_membership"));
    }
    Ok(self.inner.insert_membership(membership).await?)
  }

  async fn link_event_category(&self, event_id: Uuid, category_id: Uuid) -> R<()> {
    Ok(self.inner.link_event_category(event_id, category_id).await?)
  }

  async fn link_event_comment(&self, event_id: Uuid, comment_id: Uuid) -> R<()> {
    Ok(self.inner.link_event_comment(event_id, comment_id).await?)
  }

  async fn store_blob(&self, bytes: Vec<u8>) -> R<BlobRef> {
    if self.fail_blobs {
      return Err(FlakyError::Injected("store_blob"));
    }
    Ok(self.inner.store_blob(bytes).await?)
  }

  async fn list_ids(&self, table: Table) -> R<Vec<Uuid>> {
    if self.broken_lists.lock().unwrap().contains(&table) {
      return Err(FlakyError::Injected("list_ids"));
    }
    Ok(self.inner.list_ids(table).await?)
  }

  async fn count_hosts(&self, event_id: Uuid) -> R<u64> {
    Ok(self.inner.count_hosts(event_id).await?)
  }

  async fn get_user(&self, id: Uuid) -> R<Option<User>> {
    Ok(self.inner.get_user(id).await?)
  }

  async fn get_user_details(&self, id: Uuid) -> R<Option<UserDetails>> {
    Ok(self.inner.get_user_details(id).await?)
  }

  async fn event_image_ids(&self, event_id: Uuid) -> R<Vec<Uuid>> {
    Ok(self.inner.event_image_ids(event_id).await?)
  }

  async fn get_event(&self, id: Uuid) -> R<Option<Event>> {
    Ok(self.inner.get_event(id).await?)
  }

  async fn event_category_ids(&self, event_id: Uuid) -> R<Vec<Uuid>> {
    Ok(self.inner.event_category_ids(event_id).await?)
  }

  async fn event_members(&self, event_id: Uuid) -> R<Vec<Membership>> {
    Ok(self.inner.event_members(event_id).await?)
  }

  async fn event_comment_ids(&self, event_id: Uuid) -> R<Vec<Uuid>> {
    Ok(self.inner.event_comment_ids(event_id).await?)
  }
}
