//! [`SqliteStore`]: the SQLite implementation of [`SeedStore`].

use std::path::Path;

use rusqlite::OptionalExtension as _;
use uuid::Uuid;

use leisurelink_core::{
  entity::{
    BlobRef, Category, Comment, Event, EventImage, Membership,
    MembershipRole, User, UserDetails,
  },
  store::{SeedStore, Table},
};

use crate::{
  encode::{
    decode_uuid, encode_date, encode_dt, encode_point, encode_uuid, RawEvent,
    RawMembership, RawUser, RawUserDetails,
  },
  schema::SCHEMA,
  Error, Result,
};

/// Name of the savepoint wrapping a single record.
const UNIT_SAVEPOINT: &str = "seed_unit";

fn table_name(table: Table) -> &'static str {
  match table {
    Table::Users => "users",
    Table::Events => "events",
    Table::Categories => "event_categories",
    Table::Comments => "comments",
  }
}

// ─── Store ───────────────────────────────────────────────────────────────────

/// A fixture database backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted. Clones share
/// the same transaction state, so a store must only be driven by one run.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store, used by the tests.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Run a batch of transaction-control SQL.
  async fn batch(&self, sql: &'static str) -> Result<()> {
    self
      .conn
      .call(move |conn| {
        conn.execute_batch(sql)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Like [`batch`](Self::batch), but fails with [`Error::NoTransaction`]
  /// when the connection is in autocommit mode.
  async fn batch_in_tx(&self, sql: String) -> Result<()> {
    let ran = self
      .conn
      .call(move |conn| {
        if conn.is_autocommit() {
          return Ok(false);
        }
        conn.execute_batch(&sql)?;
        Ok(true)
      })
      .await?;

    if ran { Ok(()) } else { Err(Error::NoTransaction) }
  }

  /// Single-column UUID query with one bound UUID parameter.
  async fn query_uuids(&self, sql: &'static str, param: Uuid) -> Result<Vec<Uuid>> {
    let param_str = encode_uuid(param);

    let raws: Vec<String> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(sql)?;
        let rows = stmt
          .query_map(rusqlite::params![param_str], |row| row.get(0))?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.iter().map(|s| decode_uuid(s)).collect()
  }
}

// ─── SeedStore impl ──────────────────────────────────────────────────────────

impl SeedStore for SqliteStore {
  type Error = Error;

  // ── Units of work ─────────────────────────────────────────────────────────

  async fn begin(&self) -> Result<()> { self.batch("BEGIN").await }

  async fn commit(&self) -> Result<()> {
    self.batch_in_tx("COMMIT".to_owned()).await
  }

  async fn rollback(&self) -> Result<()> {
    // Rolling back with nothing open is a no-op rather than an error; this
    // runs on failure paths where the transaction may already be gone.
    self
      .conn
      .call(|conn| {
        if !conn.is_autocommit() {
          conn.execute_batch("ROLLBACK")?;
        }
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn begin_unit(&self) -> Result<()> {
    self.batch_in_tx(format!("SAVEPOINT {UNIT_SAVEPOINT}")).await
  }

  async fn commit_unit(&self) -> Result<()> {
    self.batch_in_tx(format!("RELEASE SAVEPOINT {UNIT_SAVEPOINT}")).await
  }

  async fn rollback_unit(&self) -> Result<()> {
    self
      .batch_in_tx(format!(
        "ROLLBACK TO SAVEPOINT {UNIT_SAVEPOINT};
         RELEASE SAVEPOINT {UNIT_SAVEPOINT};"
      ))
      .await
  }

  // ── Inserts ───────────────────────────────────────────────────────────────

  async fn insert_user(&self, user: &User) -> Result<()> {
    let id_str      = encode_uuid(user.id);
    let roles       = user.role.bits();
    let activated   = user.is_activated;
    let email       = user.email.clone();
    let password    = user.password_hash.clone();
    let details_str = user.user_details_id.map(encode_uuid);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO users (id, app_user_roles, is_activated, email, password, user_details_id)
           VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
          rusqlite::params![id_str, roles, activated, email, password, details_str],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn insert_user_details(&self, details: &UserDetails) -> Result<()> {
    let id_str       = encode_uuid(details.id);
    let user_id_str  = encode_uuid(details.user_id);
    let address      = details.address.clone();
    let birth_date   = encode_date(details.birth_date);
    let last_name    = details.last_name.clone();
    let name         = details.name.clone();
    let phone_number = details.phone_number.clone();
    let photo        = details.photo.map(|b| b.0);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO user_details (
             id, address, birth_date, last_name, name, phone_number, photo, user_id
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
          rusqlite::params![
            id_str,
            address,
            birth_date,
            last_name,
            name,
            phone_number,
            photo,
            user_id_str,
          ],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn attach_user_details(&self, user_id: Uuid, details_id: Uuid) -> Result<()> {
    let user_id_str    = encode_uuid(user_id);
    let details_id_str = encode_uuid(details_id);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "UPDATE users SET user_details_id = ?1 WHERE id = ?2",
          rusqlite::params![details_id_str, user_id_str],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn insert_event(&self, event: &Event) -> Result<()> {
    let id_str      = encode_uuid(event.id);
    let name        = event.name.clone();
    let description = event.description.clone();
    let address     = event.address.clone();
    let start_str   = encode_dt(event.start_date);
    let end_str     = encode_dt(event.end_date);
    let location    = encode_point(&event.location);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO events (id, name, description, address, start_date, end_date, location)
           VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
          rusqlite::params![
            id_str,
            name,
            description,
            address,
            start_str,
            end_str,
            location,
          ],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn insert_event_image(&self, image: &EventImage) -> Result<()> {
    let id_str       = encode_uuid(image.id);
    let event_id_str = encode_uuid(image.event_id);
    let oid          = image.image.0;

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO event_images (id, image, event_id) VALUES (?1, ?2, ?3)",
          rusqlite::params![id_str, oid, event_id_str],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn insert_category(&self, category: &Category) -> Result<()> {
    let id_str = encode_uuid(category.id);
    let name   = category.name.clone();

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO event_categories (id, name) VALUES (?1, ?2)",
          rusqlite::params![id_str, name],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn insert_comment(&self, comment: &Comment) -> Result<()> {
    let id_str       = encode_uuid(comment.id);
    let content      = comment.content.clone();
    let date_str     = encode_dt(comment.comment_date);
    let grade        = i64::from(comment.grade);
    let event_id_str = encode_uuid(comment.event_id);
    let user_id_str  = encode_uuid(comment.user_id);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO comments (id, content, comment_date, grade, event_id, user_id)
           VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
          rusqlite::params![id_str, content, date_str, grade, event_id_str, user_id_str],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn insert_membership(&self, membership: &Membership) -> Result<()> {
    let id_str       = encode_uuid(membership.id);
    let status       = membership.status.as_ref().to_owned();
    let role         = membership.role.as_ref().to_owned();
    let event_id_str = encode_uuid(membership.event_id);
    let user_id_str  = encode_uuid(membership.user_id);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO members (id, status, type, event_id, user_id)
           VALUES (?1, ?2, ?3, ?4, ?5)",
          rusqlite::params![id_str, status, role, event_id_str, user_id_str],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn link_event_category(&self, event_id: Uuid, category_id: Uuid) -> Result<()> {
    let event_id_str    = encode_uuid(event_id);
    let category_id_str = encode_uuid(category_id);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO events_categories (events_id, categories_id) VALUES (?1, ?2)",
          rusqlite::params![event_id_str, category_id_str],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn link_event_comment(&self, event_id: Uuid, comment_id: Uuid) -> Result<()> {
    let event_id_str   = encode_uuid(event_id);
    let comment_id_str = encode_uuid(comment_id);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO events_comments (event_id, comments_id) VALUES (?1, ?2)",
          rusqlite::params![event_id_str, comment_id_str],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn store_blob(&self, bytes: Vec<u8>) -> Result<BlobRef> {
    let oid = self
      .conn
      .call(move |conn| {
        conn.execute("INSERT INTO blobs (data) VALUES (?1)", rusqlite::params![bytes])?;
        Ok(conn.last_insert_rowid())
      })
      .await?;
    Ok(BlobRef(oid))
  }

  // ── Reads ─────────────────────────────────────────────────────────────────

  async fn list_ids(&self, table: Table) -> Result<Vec<Uuid>> {
    let sql = format!("SELECT id FROM {} ORDER BY rowid", table_name(table));

    let raws: Vec<String> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map([], |row| row.get(0))?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.iter().map(|s| decode_uuid(s)).collect()
  }

  async fn count_hosts(&self, event_id: Uuid) -> Result<u64> {
    let event_id_str = encode_uuid(event_id);
    let host         = MembershipRole::Host.as_ref().to_owned();

    let count: i64 = self
      .conn
      .call(move |conn| {
        Ok(conn.query_row(
          "SELECT COUNT(*) FROM members WHERE event_id = ?1 AND type = ?2",
          rusqlite::params![event_id_str, host],
          |row| row.get(0),
        )?)
      })
      .await?;

    Ok(count.max(0) as u64)
  }

  async fn get_user(&self, id: Uuid) -> Result<Option<User>> {
    let id_str = encode_uuid(id);

    let raw: Option<RawUser> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            "SELECT id, app_user_roles, is_activated, email, password, user_details_id
             FROM users WHERE id = ?1",
            rusqlite::params![id_str],
            |row| {
              Ok(RawUser {
                id:              row.get(0)?,
                app_user_roles:  row.get(1)?,
                is_activated:    row.get(2)?,
                email:           row.get(3)?,
                password:        row.get(4)?,
                user_details_id: row.get(5)?,
              })
            },
          )
          .optional()?)
      })
      .await?;

    raw.map(RawUser::into_user).transpose()
  }

  async fn get_user_details(&self, id: Uuid) -> Result<Option<UserDetails>> {
    let id_str = encode_uuid(id);

    let raw: Option<RawUserDetails> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            "SELECT id, user_id, name, last_name, address, birth_date, phone_number, photo
             FROM user_details WHERE id = ?1",
            rusqlite::params![id_str],
            |row| {
              Ok(RawUserDetails {
                id:           row.get(0)?,
                user_id:      row.get(1)?,
                name:         row.get(2)?,
                last_name:    row.get(3)?,
                address:      row.get(4)?,
                birth_date:   row.get(5)?,
                phone_number: row.get(6)?,
                photo:        row.get(7)?,
              })
            },
          )
          .optional()?)
      })
      .await?;

    raw.map(RawUserDetails::into_user_details).transpose()
  }

  async fn event_image_ids(&self, event_id: Uuid) -> Result<Vec<Uuid>> {
    self
      .query_uuids(
        "SELECT id FROM event_images WHERE event_id = ?1 ORDER BY rowid",
        event_id,
      )
      .await
  }

  async fn get_event(&self, id: Uuid) -> Result<Option<Event>> {
    let id_str = encode_uuid(id);

    let raw: Option<RawEvent> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            "SELECT id, name, description, address, start_date, end_date, location
             FROM events WHERE id = ?1",
            rusqlite::params![id_str],
            |row| {
              Ok(RawEvent {
                id:          row.get(0)?,
                name:        row.get(1)?,
                description: row.get(2)?,
                address:     row.get(3)?,
                start_date:  row.get(4)?,
                end_date:    row.get(5)?,
                location:    row.get(6)?,
              })
            },
          )
          .optional()?)
      })
      .await?;

    raw.map(RawEvent::into_event).transpose()
  }

  async fn event_category_ids(&self, event_id: Uuid) -> Result<Vec<Uuid>> {
    self
      .query_uuids(
        "SELECT categories_id FROM events_categories WHERE events_id = ?1 ORDER BY rowid",
        event_id,
      )
      .await
  }

  async fn event_members(&self, event_id: Uuid) -> Result<Vec<Membership>> {
    let event_id_str = encode_uuid(event_id);

    let raws: Vec<RawMembership> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT id, status, type, event_id, user_id
           FROM members WHERE event_id = ?1 ORDER BY rowid",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![event_id_str], |row| {
            Ok(RawMembership {
              id:       row.get(0)?,
              status:   row.get(1)?,
              role:     row.get(2)?,
              event_id: row.get(3)?,
              user_id:  row.get(4)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawMembership::into_membership).collect()
  }

  async fn event_comment_ids(&self, event_id: Uuid) -> Result<Vec<Uuid>> {
    self
      .query_uuids(
        "SELECT comments_id FROM events_comments WHERE event_id = ?1 ORDER BY rowid",
        event_id,
      )
      .await
  }
}
