//! The entity factory: builds fully populated records and writes each one in
//! its own unit of work.
//!
//! The `build_*` functions are pure apart from drawing from the context.
//! The [`Factory`] methods persist `count` of them, skipping (and counting)
//! any record whose unit fails.

use chrono::{DateTime, Duration, Utc};
use leisurelink_core::{
  entity::{
    AppRole, BlobRef, Category, Comment, Event, EventImage, User, UserDetails,
  },
  geo::POLISH_CITIES,
  store::SeedStore,
};
use rand::{Rng as _, seq::SliceRandom as _};
use uuid::Uuid;

use crate::{
  Error, Result,
  assets::{ImagePool, store_random_image},
  context::GenContext,
  fake::FakeSource,
  geo::GeoSampler,
  hash::CredentialHasher,
  report::Tally,
  unit::{self, InsertOutcome, in_unit},
};

/// Events start somewhere between now and this many days from now.
pub const EVENT_HORIZON_DAYS: i64 = 2 * 365;

/// Events last this many whole days, inclusive.
pub const EVENT_LENGTH_DAYS: std::ops::RangeInclusive<i64> = 1..=14;

pub const GRADES: std::ops::RangeInclusive<u8> = 1..=5;

// ─── Builders ────────────────────────────────────────────────────────────────

/// A new, inactive, ordinary user plus profile. The back-reference
/// `user_details_id` is left unset; it is filled in once both rows exist.
pub fn build_user<F: FakeSource>(
  ctx: &mut GenContext<F>,
  password_hash: String,
) -> (User, UserDetails) {
  let user = User {
    id: ctx.new_id(),
    email: ctx.fake.email(&mut ctx.rng),
    password_hash,
    is_activated: false,
    role: AppRole::default(),
    user_details_id: None,
  };

  let today = ctx.now.date_naive();
  let details = UserDetails {
    id:           ctx.new_id(),
    user_id:      user.id,
    name:         ctx.fake.first_name(&mut ctx.rng),
    last_name:    ctx.fake.last_name(&mut ctx.rng),
    address:      ctx.fake.address(&mut ctx.rng),
    birth_date:   ctx.fake.date_of_birth(&mut ctx.rng, today),
    phone_number: ctx.fake.phone_number(&mut ctx.rng),
    photo:        None,
  };

  (user, details)
}

/// An event near a random reference city, starting within the next two
/// years and lasting 1 to 14 days.
pub fn build_event<F: FakeSource>(
  ctx: &mut GenContext<F>,
  sampler: &GeoSampler,
) -> Result<Event> {
  let city = POLISH_CITIES[ctx.rng.gen_range(0..POLISH_CITIES.len())];
  let location = sampler.sample(&mut ctx.rng, city.center)?;

  let horizon = ctx.now + Duration::days(EVENT_HORIZON_DAYS);
  let start_date = ctx.fake.date_time_between(&mut ctx.rng, ctx.now, horizon);
  let end_date = start_date + Duration::days(ctx.rng.gen_range(EVENT_LENGTH_DAYS));

  Ok(Event {
    id: ctx.new_id(),
    name: ctx.fake.sentence(&mut ctx.rng),
    description: ctx.fake.paragraph(&mut ctx.rng),
    address: ctx.fake.address(&mut ctx.rng),
    start_date,
    end_date,
    location,
  })
}

pub fn build_category<F: FakeSource>(ctx: &mut GenContext<F>, name: String) -> Category {
  Category { id: ctx.new_id(), name }
}

/// A comment by a random user on a random event, dated any time up to now.
/// `None` if either pool is empty.
pub fn build_comment<F: FakeSource>(
  ctx: &mut GenContext<F>,
  event_ids: &[Uuid],
  user_ids: &[Uuid],
) -> Option<Comment> {
  let event_id = *event_ids.choose(&mut ctx.rng)?;
  let user_id = *user_ids.choose(&mut ctx.rng)?;

  Some(Comment {
    id: ctx.new_id(),
    content: ctx.fake.paragraph(&mut ctx.rng),
    comment_date: ctx
      .fake
      .date_time_between(&mut ctx.rng, DateTime::<Utc>::UNIX_EPOCH, ctx.now),
    grade: ctx.rng.gen_range(GRADES),
    event_id,
    user_id,
  })
}

// ─── Factory ─────────────────────────────────────────────────────────────────

/// Writes generated entities to a store, one unit of work per record.
/// The `generate_*` methods must run inside a phase opened with
/// [`SeedStore::begin`].
pub struct Factory<'a, S, H> {
  pub store:        &'a S,
  pub hasher:       &'a H,
  /// The one plaintext every user gets, hashed per user.
  pub password:     &'a str,
  pub sampler:      GeoSampler,
  pub user_photos:  &'a ImagePool,
  pub event_images: &'a ImagePool,
}

impl<S, H> Factory<'_, S, H>
where
  S: SeedStore,
  H: CredentialHasher,
{
  pub async fn generate_users<F: FakeSource>(
    &self,
    ctx: &mut GenContext<F>,
    count: usize,
  ) -> Result<Tally> {
    let mut tally = Tally::default();
    for _ in 0..count {
      let outcome = in_unit(self.store, self.create_user(ctx)).await?;
      tally_rows(&mut tally, "user", outcome);
    }
    Ok(tally)
  }

  async fn create_user<F: FakeSource>(&self, ctx: &mut GenContext<F>) -> Result<usize> {
    let hash = self.hasher.hash(self.password)?;
    let (user, mut details) = build_user(ctx, hash);
    details.photo = store_random_image(self.store, self.user_photos, &mut ctx.rng).await;

    self.store.insert_user(&user).await.map_err(Error::store)?;
    self.store.insert_user_details(&details).await.map_err(Error::store)?;
    self
      .store
      .attach_user_details(user.id, details.id)
      .await
      .map_err(Error::store)?;

    Ok(2 + usize::from(details.photo.is_some()))
  }

  /// Categories with pairwise distinct one-word names, so the unique name
  /// constraint only rejects names that already exist in the store.
  pub async fn generate_categories<F: FakeSource>(
    &self,
    ctx: &mut GenContext<F>,
    count: usize,
  ) -> Result<Tally> {
    let names = ctx.fake.distinct_words(&mut ctx.rng, count);
    if names.len() < count {
      tracing::warn!(
        requested = count,
        available = names.len(),
        "not enough distinct category names"
      );
    }

    let mut tally = Tally::default();
    for name in names {
      let category = build_category(ctx, name);
      let work = async {
        self.store.insert_category(&category).await.map(|()| 1).map_err(Error::store)
      };
      let outcome = in_unit(self.store, work).await?;
      tally_rows(&mut tally, "category", outcome);
    }
    Ok(tally)
  }

  pub async fn generate_events<F: FakeSource>(
    &self,
    ctx: &mut GenContext<F>,
    count: usize,
  ) -> Result<Tally> {
    let mut tally = Tally::default();
    for _ in 0..count {
      let outcome = in_unit(self.store, self.create_event(ctx)).await?;
      tally_rows(&mut tally, "event", outcome);
    }
    Ok(tally)
  }

  async fn create_event<F: FakeSource>(&self, ctx: &mut GenContext<F>) -> Result<usize> {
    let event = build_event(ctx, &self.sampler)?;
    self.store.insert_event(&event).await.map_err(Error::store)?;

    let Some(blob) = store_random_image(self.store, self.event_images, &mut ctx.rng).await
    else {
      return Ok(1);
    };
    self.attach_image(ctx.new_id(), event.id, blob).await?;
    Ok(2)
  }

  async fn attach_image(&self, id: Uuid, event_id: Uuid, image: BlobRef) -> Result<()> {
    let image = EventImage { id, event_id, image };
    self.store.insert_event_image(&image).await.map_err(Error::store)
  }

  /// Comments by random users on random events. Nothing is attempted when
  /// either pool is empty.
  pub async fn generate_comments<F: FakeSource>(
    &self,
    ctx: &mut GenContext<F>,
    count: usize,
    event_ids: &[Uuid],
    user_ids: &[Uuid],
  ) -> Result<Tally> {
    let mut tally = Tally::default();
    for _ in 0..count {
      let Some(comment) = build_comment(ctx, event_ids, user_ids) else {
        break;
      };
      let work = async {
        self.store.insert_comment(&comment).await.map(|()| 1).map_err(Error::store)
      };
      let outcome = in_unit(self.store, work).await?;
      tally_rows(&mut tally, "comment", outcome);
    }
    Ok(tally)
  }
}

fn tally_rows(tally: &mut Tally, what: &'static str, outcome: InsertOutcome<usize>) {
  unit::record(tally, what, &outcome);
  if let InsertOutcome::Inserted(rows) = outcome {
    tally.rows += rows;
  }
}
