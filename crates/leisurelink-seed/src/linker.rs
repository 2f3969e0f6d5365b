//! The relationship linker: wires persisted events to categories, users
//! (memberships) and comments.
//!
//! Every event (or comment) is one unit of work. When a write inside a unit
//! fails the unit is rolled back and counted as failed; the pass continues
//! with the next event.
//!
//! Host assignment is check-then-create against the store with no locking.
//! Two linkers running against the same database can both see "no host" and
//! both create one, so only a single writer is supported.

use leisurelink_core::{
  entity::{Membership, MembershipRole, MembershipStatus},
  store::SeedStore,
};
use rand::{Rng, seq::SliceRandom as _};
use uuid::Uuid;

use crate::{
  Error, Result,
  context::GenContext,
  fake::FakeSource,
  report::Tally,
  unit::{self, InsertOutcome, in_unit},
};

const STATUSES: [MembershipStatus; 2] =
  [MembershipStatus::Active, MembershipStatus::Inactive];

/// Cardinality limits for one linking pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LinkPolicy {
  /// Each event gets 1 to this many categories (fewer if fewer exist).
  pub max_categories: usize,
  /// Each event gets 0 to this many guests (fewer if fewer users exist).
  pub max_guests:     usize,
}

impl Default for LinkPolicy {
  fn default() -> Self { Self { max_categories: 3, max_guests: 10 } }
}

// ─── Sampling ────────────────────────────────────────────────────────────────

/// 1 to `min(max_categories, |categories|)` distinct categories; none if
/// there are no categories.
pub fn pick_categories<R: Rng + ?Sized>(
  rng: &mut R,
  categories: &[Uuid],
  policy: &LinkPolicy,
) -> Vec<Uuid> {
  let upper = policy.max_categories.min(categories.len());
  if upper == 0 {
    return Vec::new();
  }
  let n = rng.gen_range(1..=upper);
  categories.choose_multiple(rng, n).copied().collect()
}

/// 0 to `min(max_guests, |users| - 1)` distinct guests, never including
/// `exclude`.
pub fn pick_guests<R: Rng + ?Sized>(
  rng: &mut R,
  users: &[Uuid],
  exclude: Option<Uuid>,
  policy: &LinkPolicy,
) -> Vec<Uuid> {
  let upper = policy.max_guests.min(users.len().saturating_sub(1));
  let n = rng.gen_range(0..=upper);
  if n == 0 {
    return Vec::new();
  }

  let pool: Vec<Uuid> = users
    .iter()
    .copied()
    .filter(|u| Some(*u) != exclude)
    .collect();
  pool.choose_multiple(rng, n).copied().collect()
}

// ─── Linker ──────────────────────────────────────────────────────────────────

/// Links persisted records. Every pass writes through [`in_unit`], so it
/// must run inside a phase opened with [`SeedStore::begin`].
pub struct Linker<'a, S> {
  pub store:  &'a S,
  pub policy: LinkPolicy,
}

impl<'a, S: SeedStore> Linker<'a, S> {
  pub fn new(store: &'a S) -> Self {
    Self { store, policy: LinkPolicy::default() }
  }

  /// Attach categories to every event. With no categories this writes
  /// nothing and is not an error.
  pub async fn link_categories<F: FakeSource>(
    &self,
    ctx: &mut GenContext<F>,
    event_ids: &[Uuid],
    category_ids: &[Uuid],
  ) -> Result<Tally> {
    let mut tally = Tally::default();
    if category_ids.is_empty() {
      tracing::info!("no categories available; nothing to link");
      return Ok(tally);
    }

    for &event_id in event_ids {
      let chosen = pick_categories(&mut ctx.rng, category_ids, &self.policy);
      let work = async {
        for &category_id in &chosen {
          self
            .store
            .link_event_category(event_id, category_id)
            .await
            .map_err(Error::store)?;
        }
        Ok::<_, Error>(chosen.len())
      };
      let outcome = in_unit(self.store, work).await?;
      add_rows(&mut tally, "event category links", outcome);
    }
    Ok(tally)
  }

  /// Make sure `event_id` has a host. Returns the user made host, or `None`
  /// if the event already had one (or there is nobody to choose).
  ///
  /// Running this twice for the same event never creates a second host.
  pub async fn ensure_host<F: FakeSource>(
    &self,
    ctx: &mut GenContext<F>,
    event_id: Uuid,
    user_ids: &[Uuid],
  ) -> Result<Option<Uuid>> {
    let hosts = self.store.count_hosts(event_id).await.map_err(Error::store)?;
    if hosts > 0 {
      return Ok(None);
    }

    let Some(&host_id) = user_ids.choose(&mut ctx.rng) else {
      return Ok(None);
    };

    let membership = Membership {
      id: ctx.new_id(),
      status: MembershipStatus::Active,
      role: MembershipRole::Host,
      event_id,
      user_id: host_id,
    };
    self
      .store
      .insert_membership(&membership)
      .await
      .map_err(Error::store)?;

    Ok(Some(host_id))
  }

  /// Give every event exactly one host and a random set of guests.
  ///
  /// The host is written in its own unit first, so a failed guest write
  /// never costs an event its host. Guests exclude a host chosen in this
  /// pass; if the event already had a host, guests are drawn from everyone.
  pub async fn link_memberships<F: FakeSource>(
    &self,
    ctx: &mut GenContext<F>,
    event_ids: &[Uuid],
    user_ids: &[Uuid],
  ) -> Result<Tally> {
    let mut tally = Tally::default();
    if user_ids.is_empty() {
      tracing::info!("no users available; no memberships to link");
      return Ok(tally);
    }

    for &event_id in event_ids {
      tally.attempted += 1;

      let new_host = match in_unit(self.store, self.ensure_host(ctx, event_id, user_ids)).await? {
        InsertOutcome::Inserted(host) => host,
        InsertOutcome::Skipped(err) => {
          tracing::warn!(%event_id, error = %err, "skipping event: host not assigned");
          continue;
        }
      };
      let host_rows = usize::from(new_host.is_some());

      let guests: Vec<Membership> = pick_guests(&mut ctx.rng, user_ids, new_host, &self.policy)
        .into_iter()
        .map(|user_id| Membership {
          id: ctx.new_id(),
          status: STATUSES[ctx.rng.gen_range(0..STATUSES.len())],
          role: MembershipRole::Guest,
          event_id,
          user_id,
        })
        .collect();

      let work = async {
        for guest in &guests {
          self.store.insert_membership(guest).await.map_err(Error::store)?;
        }
        Ok::<_, Error>(guests.len())
      };

      match in_unit(self.store, work).await? {
        InsertOutcome::Inserted(rows) => {
          tally.succeeded += 1;
          tally.rows += host_rows + rows;
        }
        InsertOutcome::Skipped(err) => {
          tally.rows += host_rows;
          tracing::warn!(%event_id, error = %err, "guests not linked");
        }
      }
    }
    Ok(tally)
  }

  /// Assign each comment to one uniformly random event, independently.
  pub async fn link_comments<F: FakeSource>(
    &self,
    ctx: &mut GenContext<F>,
    event_ids: &[Uuid],
    comment_ids: &[Uuid],
  ) -> Result<Tally> {
    let mut tally = Tally::default();
    if event_ids.is_empty() {
      tracing::info!("no events available; comments left unlinked");
      return Ok(tally);
    }

    for &comment_id in comment_ids {
      let Some(&event_id) = event_ids.choose(&mut ctx.rng) else {
        break;
      };
      let work = async {
        self
          .store
          .link_event_comment(event_id, comment_id)
          .await
          .map(|()| 1)
          .map_err(Error::store)
      };
      let outcome = in_unit(self.store, work).await?;
      add_rows(&mut tally, "event comment link", outcome);
    }
    Ok(tally)
  }
}

fn add_rows(tally: &mut Tally, what: &'static str, outcome: InsertOutcome<usize>) {
  unit::record(tally, what, &outcome);
  if let InsertOutcome::Inserted(rows) = outcome {
    tally.rows += rows;
  }
}
