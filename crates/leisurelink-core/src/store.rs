//! The `SeedStore` trait, the persistence boundary of a generation run.
//!
//! The trait is implemented by storage backends (e.g.
//! `leisurelink-store-sqlite`). The generator depends on this abstraction,
//! not on any concrete backend.
//!
//! Two levels of unit of work exist. A *phase* is wrapped in
//! [`begin`](SeedStore::begin) / [`commit`](SeedStore::commit); inside it,
//! each attempted record is wrapped in
//! [`begin_unit`](SeedStore::begin_unit) /
//! [`commit_unit`](SeedStore::commit_unit), so a failed record can be rolled
//! back alone with [`rollback_unit`](SeedStore::rollback_unit) while the rest
//! of the phase survives.
//!
//! Backends assume a single writer: [`count_hosts`](SeedStore::count_hosts)
//! followed by an insert is a read-modify-write with no isolation.

use std::future::Future;

use strum::{AsRefStr, EnumIter};
use uuid::Uuid;

use crate::entity::{
  BlobRef, Category, Comment, Event, EventImage, Membership, User, UserDetails,
};

// ─── Table ───────────────────────────────────────────────────────────────────

/// Entity tables whose identifiers can be read back with
/// [`SeedStore::list_ids`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, AsRefStr, EnumIter)]
#[strum(serialize_all = "snake_case")]
pub enum Table {
  Users,
  Events,
  Categories,
  Comments,
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over a fixture database backend.
pub trait SeedStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Units of work ─────────────────────────────────────────────────────

  /// Open the phase-level transaction.
  fn begin(&self) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Commit everything written since [`begin`](Self::begin).
  fn commit(&self) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Discard everything written since [`begin`](Self::begin).
  fn rollback(
    &self,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Open a record-level unit nested in the current phase.
  fn begin_unit(
    &self,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Keep the current record-level unit.
  fn commit_unit(
    &self,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Discard the current record-level unit only.
  fn rollback_unit(
    &self,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  // ── Inserts ───────────────────────────────────────────────────────────

  fn insert_user<'a>(
    &'a self,
    user: &'a User,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;

  fn insert_user_details<'a>(
    &'a self,
    details: &'a UserDetails,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;

  /// Set the `user_details_id` back-reference of an existing user.
  fn attach_user_details(
    &self,
    user_id: Uuid,
    details_id: Uuid,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Insert an event; its location is stored as an SRID 4326 point.
  fn insert_event<'a>(
    &'a self,
    event: &'a Event,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;

  fn insert_event_image<'a>(
    &'a self,
    image: &'a EventImage,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;

  fn insert_category<'a>(
    &'a self,
    category: &'a Category,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;

  fn insert_comment<'a>(
    &'a self,
    comment: &'a Comment,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;

  fn insert_membership<'a>(
    &'a self,
    membership: &'a Membership,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;

  fn link_event_category(
    &self,
    event_id: Uuid,
    category_id: Uuid,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  fn link_event_comment(
    &self,
    event_id: Uuid,
    comment_id: Uuid,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Store raw bytes and return a reference usable as a foreign key.
  fn store_blob(
    &self,
    bytes: Vec<u8>,
  ) -> impl Future<Output = Result<BlobRef, Self::Error>> + Send + '_;

  // ── Reads ─────────────────────────────────────────────────────────────

  /// All persisted identifiers of `table`, in insertion order.
  fn list_ids(
    &self,
    table: Table,
  ) -> impl Future<Output = Result<Vec<Uuid>, Self::Error>> + Send + '_;

  /// Number of host memberships recorded for `event_id`.
  fn count_hosts(
    &self,
    event_id: Uuid,
  ) -> impl Future<Output = Result<u64, Self::Error>> + Send + '_;

  fn get_user(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<User>, Self::Error>> + Send + '_;

  fn get_user_details(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<UserDetails>, Self::Error>> + Send + '_;

  /// Images attached to `event_id`.
  fn event_image_ids(
    &self,
    event_id: Uuid,
  ) -> impl Future<Output = Result<Vec<Uuid>, Self::Error>> + Send + '_;

  fn get_event(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Event>, Self::Error>> + Send + '_;

  /// Categories linked to `event_id`.
  fn event_category_ids(
    &self,
    event_id: Uuid,
  ) -> impl Future<Output = Result<Vec<Uuid>, Self::Error>> + Send + '_;

  /// All memberships (host and guests) of `event_id`.
  fn event_members(
    &self,
    event_id: Uuid,
  ) -> impl Future<Output = Result<Vec<Membership>, Self::Error>> + Send + '_;

  /// Comments linked to `event_id` through the event/comment join table.
  fn event_comment_ids(
    &self,
    event_id: Uuid,
  ) -> impl Future<Output = Result<Vec<Uuid>, Self::Error>> + Send + '_;
}
