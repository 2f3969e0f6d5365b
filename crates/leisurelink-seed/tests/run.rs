mod common;

use std::collections::HashSet;

use leisurelink_core::{
  entity::MembershipRole,
  geo::POLISH_CITIES,
  store::{SeedStore, Table},
};
use leisurelink_seed::{
  Orchestrator, Phase, SeedConfig,
  factory::{EVENT_HORIZON_DAYS, EVENT_LENGTH_DAYS},
  geo::GeoSampler,
  linker::{LinkPolicy, Linker},
};

use common::{FlakyStore, cheap_hasher, ctx, image_dir, small_config, store};

// ─── Full runs ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn full_run_links_every_event() {
  let store = store().await;
  let config = SeedConfig {
    users: 100,
    events: 1000,
    ..Default::default()
  };
  let now = ctx(1).now;

  let report = Orchestrator::new(&store, cheap_hasher(), ctx(1), config)
    .unwrap()
    .run()
    .await
    .unwrap();

  let phases: Vec<Phase> = report.phases.iter().map(|p| p.phase).collect();
  assert_eq!(phases, vec![
    Phase::UsersGenerated,
    Phase::CategoriesGenerated,
    Phase::EventsGenerated,
    Phase::CategoriesLinked,
    Phase::MembershipsLinked,
    Phase::CommentsGenerated,
    Phase::CommentsLinked,
  ]);
  for p in &report.phases {
    assert!(p.skipped.is_none(), "{} was skipped", p.phase);
    assert!(p.tally.succeeded <= p.tally.attempted);
  }

  let categories = report.tally(Phase::CategoriesGenerated);
  assert_eq!(categories.attempted, 12);
  assert_eq!(categories.succeeded, 12);

  let users = store.list_ids(Table::Users).await.unwrap();
  let events = store.list_ids(Table::Events).await.unwrap();
  assert_eq!(users.len(), report.tally(Phase::UsersGenerated).succeeded);
  assert_eq!(events.len(), 1000);
  let user_set: HashSet<_> = users.iter().copied().collect();

  let sampler = GeoSampler::new(20.0).unwrap();
  for &event_id in &events {
    let event = store.get_event(event_id).await.unwrap().unwrap();
    assert!(event.end_date > event.start_date);
    assert!(event.start_date >= now);
    assert!(
      event.start_date <= now + chrono::Duration::days(EVENT_HORIZON_DAYS)
    );
    let days = (event.end_date - event.start_date).num_days();
    assert!(EVENT_LENGTH_DAYS.contains(&days));
    assert!(POLISH_CITIES.iter().any(|c| {
      event.location.planar_offset_degrees(&c.center)
        <= sampler.radius_degrees() + 1e-9
    }));

    let categories = store.event_category_ids(event_id).await.unwrap();
    assert!((1..=3).contains(&categories.len()), "{} categories", categories.len());

    let members = store.event_members(event_id).await.unwrap();
    let hosts: Vec<_> =
      members.iter().filter(|m| m.role == MembershipRole::Host).collect();
    assert_eq!(hosts.len(), 1, "event {event_id} has {} hosts", hosts.len());
    assert!(members.len() <= 11);
    assert!(members.iter().all(|m| user_set.contains(&m.user_id)));

    let distinct: HashSet<_> = members.iter().map(|m| m.user_id).collect();
    assert_eq!(distinct.len(), members.len(), "a user joined twice");
  }

  let comments = store.list_ids(Table::Comments).await.unwrap();
  assert_eq!(comments.len(), 20);
  assert_eq!(report.tally(Phase::CommentsLinked).succeeded, 20);
}

#[tokio::test]
async fn users_get_profiles_and_hashed_passwords() {
  let store = store().await;
  Orchestrator::new(&store, cheap_hasher(), ctx(2), small_config())
    .unwrap()
    .run()
    .await
    .unwrap();

  for id in store.list_ids(Table::Users).await.unwrap() {
    let user = store.get_user(id).await.unwrap().unwrap();
    assert!(!user.is_activated);
    assert!(user.user_details_id.is_some());
    assert!(user.password_hash.starts_with("$argon2id$"));
    assert!(!user.password_hash.contains("123456789"));
  }
}

#[tokio::test]
async fn same_seed_same_dataset() {
  async fn events_of(seed: u64) -> Vec<uuid::Uuid> {
    let store = store().await;
    Orchestrator::new(&store, cheap_hasher(), ctx(seed), small_config())
      .unwrap()
      .run()
      .await
      .unwrap();
    store.list_ids(Table::Events).await.unwrap()
  }

  assert_eq!(events_of(9).await, events_of(9).await);
  assert_ne!(events_of(9).await, events_of(10).await);
}

#[tokio::test]
async fn disabled_phases_are_reported_as_skipped() {
  let store = store().await;
  let config = SeedConfig {
    link_memberships: false,
    generate_comments: false,
    ..small_config()
  };

  let report = Orchestrator::new(&store, cheap_hasher(), ctx(3), config)
    .unwrap()
    .run()
    .await
    .unwrap();

  let memberships = report.get(Phase::MembershipsLinked).unwrap();
  assert_eq!(memberships.skipped.as_deref(), Some("disabled"));
  assert!(report.get(Phase::CommentsGenerated).unwrap().skipped.is_some());
  assert_eq!(report.tally(Phase::CommentsLinked).attempted, 0);
  assert!(store.list_ids(Table::Comments).await.unwrap().is_empty());

  for id in store.list_ids(Table::Events).await.unwrap() {
    assert!(store.event_members(id).await.unwrap().is_empty());
  }
}

#[tokio::test]
async fn event_images_are_attached_when_available() {
  let dir = image_dir();

  let store = store().await;
  let config = SeedConfig {
    event_image_dir: Some(dir.path().to_path_buf()),
    ..small_config()
  };

  let report = Orchestrator::new(&store, cheap_hasher(), ctx(4), config)
    .unwrap()
    .run()
    .await
    .unwrap();

  let events = report.tally(Phase::EventsGenerated);
  assert_eq!(events.succeeded, 40);
  assert_eq!(events.rows, 80);
  for id in store.list_ids(Table::Events).await.unwrap() {
    assert_eq!(store.event_image_ids(id).await.unwrap().len(), 1);
  }
}

#[tokio::test]
async fn user_photos_fill_profiles() {
  let dir = image_dir();

  let store = store().await;
  let config = SeedConfig {
    user_photo_dir: Some(dir.path().to_path_buf()),
    ..small_config()
  };

  let report = Orchestrator::new(&store, cheap_hasher(), ctx(16), config)
    .unwrap()
    .run()
    .await
    .unwrap();

  let users = report.tally(Phase::UsersGenerated);
  assert_eq!(users.succeeded, 20);
  assert_eq!(users.rows, 3 * users.succeeded);
  for id in store.list_ids(Table::Users).await.unwrap() {
    let user = store.get_user(id).await.unwrap().unwrap();
    let details = store
      .get_user_details(user.user_details_id.unwrap())
      .await
      .unwrap()
      .unwrap();
    assert_eq!(details.user_id, id);
    assert!(details.photo.is_some());
  }
}

#[tokio::test]
async fn invalid_config_is_rejected_up_front() {
  let config = SeedConfig { radius_km: 0.0, ..small_config() };
  let store = store().await;

  assert!(Orchestrator::new(&store, cheap_hasher(), ctx(5), config).is_err());
}

// ─── Edge cases ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn no_categories_links_nothing() {
  let store = store().await;
  let config = SeedConfig { categories: 0, ..small_config() };

  let report = Orchestrator::new(&store, cheap_hasher(), ctx(6), config)
    .unwrap()
    .run()
    .await
    .unwrap();

  assert_eq!(
    report.get(Phase::CategoriesGenerated).unwrap().skipped.as_deref(),
    Some("no categories requested")
  );
  let linked = report.get(Phase::CategoriesLinked).unwrap();
  assert!(linked.skipped.is_none());
  assert_eq!(linked.tally.rows, 0);
}

#[tokio::test]
async fn single_user_hosts_alone() {
  let store = store().await;
  let config = SeedConfig { users: 1, ..small_config() };

  Orchestrator::new(&store, cheap_hasher(), ctx(7), config)
    .unwrap()
    .run()
    .await
    .unwrap();

  let user = store.list_ids(Table::Users).await.unwrap()[0];
  for id in store.list_ids(Table::Events).await.unwrap() {
    let members = store.event_members(id).await.unwrap();
    assert_eq!(members.len(), 1);
    assert_eq!(members[0].role, MembershipRole::Host);
    assert_eq!(members[0].user_id, user);
  }
}

#[tokio::test]
async fn ensure_host_is_idempotent() {
  let store = store().await;
  let config = SeedConfig {
    link_memberships: false,
    generate_comments: false,
    ..small_config()
  };
  Orchestrator::new(&store, cheap_hasher(), ctx(8), config)
    .unwrap()
    .run()
    .await
    .unwrap();

  let users = store.list_ids(Table::Users).await.unwrap();
  let event = store.list_ids(Table::Events).await.unwrap()[0];
  let linker = Linker::new(&store);
  let mut ctx = ctx(8);

  let first = linker.ensure_host(&mut ctx, event, &users).await.unwrap();
  let second = linker.ensure_host(&mut ctx, event, &users).await.unwrap();

  assert!(first.is_some());
  assert_eq!(second, None);
  assert_eq!(store.count_hosts(event).await.unwrap(), 1);
}

#[tokio::test]
async fn relinking_memberships_keeps_one_host() {
  let store = store().await;
  Orchestrator::new(&store, cheap_hasher(), ctx(11), small_config())
    .unwrap()
    .run()
    .await
    .unwrap();

  let users = store.list_ids(Table::Users).await.unwrap();
  let events = store.list_ids(Table::Events).await.unwrap();
  let linker = Linker {
    store:  &store,
    policy: LinkPolicy { max_categories: 3, max_guests: 0 },
  };
  let before: usize = {
    let mut n = 0;
    for &id in &events {
      n += store.event_members(id).await.unwrap().len();
    }
    n
  };
  store.begin().await.unwrap();
  let tally = linker
    .link_memberships(&mut ctx(12), &events, &users)
    .await
    .unwrap();
  store.commit().await.unwrap();

  assert_eq!(tally.attempted, events.len());
  assert_eq!(tally.succeeded, events.len());
  assert_eq!(tally.rows, 0);
  let mut after = 0;
  for &id in &events {
    assert_eq!(store.count_hosts(id).await.unwrap(), 1);
    after += store.event_members(id).await.unwrap().len();
  }
  assert_eq!(after, before);
}

#[tokio::test]
async fn record_units_need_an_open_phase() {
  let store = store().await;
  let config = SeedConfig {
    link_memberships: false,
    generate_comments: false,
    ..small_config()
  };
  Orchestrator::new(&store, cheap_hasher(), ctx(17), config)
    .unwrap()
    .run()
    .await
    .unwrap();

  let users = store.list_ids(Table::Users).await.unwrap();
  let events = store.list_ids(Table::Events).await.unwrap();
  let linker = Linker::new(&store);

  let outside = linker.link_memberships(&mut ctx(18), &events, &users).await;
  assert!(matches!(outside, Err(leisurelink_seed::Error::Store(_))));

  store.begin().await.unwrap();
  let inside = linker
    .link_memberships(&mut ctx(18), &events, &users)
    .await
    .unwrap();
  store.commit().await.unwrap();
  assert_eq!(inside.succeeded, events.len());
}

// ─── Failures ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn failed_records_are_skipped_and_counted() {
  let mut flaky = FlakyStore::new(store().await);
  flaky.fail_user_every = 3;
  let config = SeedConfig { users: 10, ..small_config() };

  let report = Orchestrator::new(&flaky, cheap_hasher(), ctx(13), config)
    .unwrap()
    .run()
    .await
    .unwrap();

  let users = report.tally(Phase::UsersGenerated);
  assert_eq!(users.attempted, 10);
  assert_eq!(users.succeeded, 7);
  assert_eq!(users.failed(), 3);
  assert_eq!(flaky.inner.list_ids(Table::Users).await.unwrap().len(), 7);
}

#[tokio::test]
async fn failed_guests_keep_the_host() {
  let mut flaky = FlakyStore::new(store().await);
  flaky.fail_guest_every = 1;

  let report = Orchestrator::new(&flaky, cheap_hasher(), ctx(14), small_config())
    .unwrap()
    .run()
    .await
    .unwrap();

  let tally = report.tally(Phase::MembershipsLinked);
  assert_eq!(tally.attempted, 40);
  assert_eq!(tally.rows, 40);
  for id in flaky.inner.list_ids(Table::Events).await.unwrap() {
    let members = flaky.inner.event_members(id).await.unwrap();
    assert_eq!(members.len(), 1);
    assert_eq!(members[0].role, MembershipRole::Host);
  }
}

#[tokio::test]
async fn failed_blob_writes_leave_records_without_images() {
  let user_photos = image_dir();
  let event_images = image_dir();
  let mut flaky = FlakyStore::new(store().await);
  flaky.fail_blobs = true;
  let config = SeedConfig {
    user_photo_dir: Some(user_photos.path().to_path_buf()),
    event_image_dir: Some(event_images.path().to_path_buf()),
    ..small_config()
  };

  let report = Orchestrator::new(&flaky, cheap_hasher(), ctx(19), config)
    .unwrap()
    .run()
    .await
    .unwrap();

  let users = report.tally(Phase::UsersGenerated);
  assert_eq!(users.succeeded, 20);
  assert_eq!(users.rows, 2 * users.succeeded);
  let events = report.tally(Phase::EventsGenerated);
  assert_eq!(events.succeeded, 40);
  assert_eq!(events.rows, 40);

  for id in flaky.inner.list_ids(Table::Users).await.unwrap() {
    let user = flaky.inner.get_user(id).await.unwrap().unwrap();
    let details = flaky
      .inner
      .get_user_details(user.user_details_id.unwrap())
      .await
      .unwrap()
      .unwrap();
    assert_eq!(details.photo, None);
  }
  for id in flaky.inner.list_ids(Table::Events).await.unwrap() {
    assert!(flaky.inner.event_image_ids(id).await.unwrap().is_empty());
  }
}

#[tokio::test]
async fn phase_failure_stops_the_run_and_keeps_earlier_phases() {
  let flaky = FlakyStore::new(store().await);
  flaky.break_list(Table::Events);

  let failure = Orchestrator::new(&flaky, cheap_hasher(), ctx(15), small_config())
    .unwrap()
    .run()
    .await
    .unwrap_err();

  assert_eq!(failure.phase, Phase::CategoriesLinked);
  let done: Vec<Phase> = failure.report.phases.iter().map(|p| p.phase).collect();
  assert_eq!(done, vec![
    Phase::UsersGenerated,
    Phase::CategoriesGenerated,
    Phase::EventsGenerated,
  ]);

  let events = flaky.inner.list_ids(Table::Events).await.unwrap();
  assert_eq!(events.len(), 40);
  assert!(flaky.inner.event_category_ids(events[0]).await.unwrap().is_empty());

  // The phase transaction was closed; the store accepts a new one.
  flaky.inner.begin().await.unwrap();
  flaky.inner.commit().await.unwrap();
}
