//! The dataset orchestrator: runs the generation phases in order.
//!
//! ```text
//! INIT → USERS_GENERATED → CATEGORIES_GENERATED → EVENTS_GENERATED
//!      → CATEGORIES_LINKED → MEMBERSHIPS_LINKED
//!      → COMMENTS_GENERATED → COMMENTS_LINKED → DONE
//! ```
//!
//! Each phase runs in its own transaction and commits before the next one
//! starts. Phases that need identifiers read them back from the store rather
//! than reusing what the previous phase produced in memory. A phase that
//! fails outright is rolled back and the run stops there; phases already
//! committed stay committed.

use leisurelink_core::store::{SeedStore, Table};
use serde::Serialize;
use strum::{AsRefStr, Display, EnumIter};
use thiserror::Error;
use uuid::Uuid;

use crate::{
  Error, Result,
  assets::ImagePool,
  config::SeedConfig,
  context::GenContext,
  factory::Factory,
  fake::{FakeSource, WordLists},
  geo::GeoSampler,
  hash::CredentialHasher,
  linker::{LinkPolicy, Linker},
  report::{PhaseReport, RunReport, Tally},
};

// ─── Phase ───────────────────────────────────────────────────────────────────

/// Where a run is. Phases only ever move forward.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize,
  AsRefStr, Display, EnumIter,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum Phase {
  Init,
  UsersGenerated,
  CategoriesGenerated,
  EventsGenerated,
  CategoriesLinked,
  MembershipsLinked,
  CommentsGenerated,
  CommentsLinked,
  Done,
}

impl Phase {
  pub fn next(self) -> Option<Self> {
    use Phase::*;
    match self {
      Init => Some(UsersGenerated),
      UsersGenerated => Some(CategoriesGenerated),
      CategoriesGenerated => Some(EventsGenerated),
      EventsGenerated => Some(CategoriesLinked),
      CategoriesLinked => Some(MembershipsLinked),
      MembershipsLinked => Some(CommentsGenerated),
      CommentsGenerated => Some(CommentsLinked),
      CommentsLinked => Some(Done),
      Done => None,
    }
  }
}

// ─── Failure ─────────────────────────────────────────────────────────────────

/// A phase failed and the run was aborted. `report` covers the phases that
/// were committed before it.
#[derive(Debug, Error)]
#[error("phase {phase} failed: {source}")]
pub struct RunFailure {
  pub phase:  Phase,
  #[source]
  pub source: Error,
  pub report: RunReport,
}

// ─── Orchestrator ────────────────────────────────────────────────────────────

pub struct Orchestrator<'a, S, H, F = WordLists> {
  store:        &'a S,
  hasher:       H,
  ctx:          GenContext<F>,
  config:       SeedConfig,
  policy:       LinkPolicy,
  sampler:      GeoSampler,
  user_photos:  ImagePool,
  event_images: ImagePool,
  phase:        Phase,
  report:       RunReport,
}

impl<'a, S, H, F> Orchestrator<'a, S, H, F>
where
  S: SeedStore,
  H: CredentialHasher,
  F: FakeSource,
{
  /// Validate `config` and prepare a run. Image directories are scanned
  /// here, once.
  pub fn new(
    store: &'a S,
    hasher: H,
    ctx: GenContext<F>,
    config: SeedConfig,
  ) -> Result<Self> {
    config.validate()?;
    let sampler = GeoSampler::new(config.radius_km)?;
    let user_photos = ImagePool::from_dir(config.user_photo_dir.as_deref());
    let event_images = ImagePool::from_dir(config.event_image_dir.as_deref());

    Ok(Self {
      store,
      hasher,
      ctx,
      config,
      policy: LinkPolicy::default(),
      sampler,
      user_photos,
      event_images,
      phase: Phase::Init,
      report: RunReport::default(),
    })
  }

  pub fn with_policy(mut self, policy: LinkPolicy) -> Self {
    self.policy = policy;
    self
  }

  pub fn phase(&self) -> Phase { self.phase }

  /// Run every remaining phase in order.
  pub async fn run(mut self) -> Result<RunReport, RunFailure> {
    tracing::info!(
      users = self.config.users,
      categories = self.config.categories,
      events = self.config.events,
      comments = self.config.comments,
      "starting generation run"
    );

    while let Some(next) = self.phase.next() {
      if next == Phase::Done {
        self.advance(next);
        break;
      }

      match self.run_phase(next).await {
        Ok(report) => {
          self.log_phase(&report);
          self.report.phases.push(report);
          self.advance(next);
        }
        Err(source) => {
          tracing::error!(phase = %next, error = %source, "phase failed; aborting run");
          if let Err(err) = self.store.rollback().await {
            tracing::error!(phase = %next, error = %err, "rollback failed");
          }
          return Err(RunFailure { phase: next, source, report: self.report });
        }
      }
    }

    let totals = self.report.totals();
    tracing::info!(
      attempted = totals.attempted,
      succeeded = totals.succeeded,
      rows = totals.rows,
      "generation run done"
    );
    Ok(self.report)
  }

  fn advance(&mut self, to: Phase) {
    debug_assert!(to > self.phase, "phase went backwards: {} -> {to}", self.phase);
    self.phase = to;
  }

  /// Why `phase` does nothing under the current config, if it doesn't.
  fn skip_reason(&self, phase: Phase) -> Option<&'static str> {
    let c = &self.config;
    match phase {
      Phase::UsersGenerated if c.users == 0 => Some("no users requested"),
      Phase::CategoriesGenerated if c.categories == 0 => Some("no categories requested"),
      Phase::EventsGenerated if c.events == 0 => Some("no events requested"),
      Phase::CategoriesLinked if !c.link_categories => Some("disabled"),
      Phase::MembershipsLinked if !c.link_memberships => Some("disabled"),
      Phase::CommentsGenerated if !c.generate_comments => Some("disabled"),
      Phase::CommentsGenerated if c.comments == 0 => Some("no comments requested"),
      Phase::CommentsLinked if !c.link_comments => Some("disabled"),
      _ => None,
    }
  }

  async fn run_phase(&mut self, phase: Phase) -> Result<PhaseReport> {
    if let Some(reason) = self.skip_reason(phase) {
      return Ok(PhaseReport {
        phase,
        skipped: Some(reason.to_owned()),
        tally: Tally::default(),
      });
    }

    tracing::info!(phase = %phase, "phase starting");
    self.store.begin().await.map_err(Error::store)?;
    let tally = self.execute(phase).await?;
    self.store.commit().await.map_err(Error::store)?;

    Ok(PhaseReport { phase, skipped: None, tally })
  }

  async fn ids(&self, table: Table) -> Result<Vec<Uuid>> {
    self.store.list_ids(table).await.map_err(Error::store)
  }

  async fn execute(&mut self, phase: Phase) -> Result<Tally> {
    let factory = Factory {
      store:        self.store,
      hasher:       &self.hasher,
      password:     &self.config.password,
      sampler:      self.sampler,
      user_photos:  &self.user_photos,
      event_images: &self.event_images,
    };
    let linker = Linker { store: self.store, policy: self.policy };

    match phase {
      Phase::UsersGenerated => {
        factory.generate_users(&mut self.ctx, self.config.users).await
      }
      Phase::CategoriesGenerated => {
        factory.generate_categories(&mut self.ctx, self.config.categories).await
      }
      Phase::EventsGenerated => {
        factory.generate_events(&mut self.ctx, self.config.events).await
      }
      Phase::CategoriesLinked => {
        let events = self.ids(Table::Events).await?;
        let categories = self.ids(Table::Categories).await?;
        linker.link_categories(&mut self.ctx, &events, &categories).await
      }
      Phase::MembershipsLinked => {
        let events = self.ids(Table::Events).await?;
        let users = self.ids(Table::Users).await?;
        linker.link_memberships(&mut self.ctx, &events, &users).await
      }
      Phase::CommentsGenerated => {
        let events = self.ids(Table::Events).await?;
        let users = self.ids(Table::Users).await?;
        factory
          .generate_comments(&mut self.ctx, self.config.comments, &events, &users)
          .await
      }
      Phase::CommentsLinked => {
        let events = self.ids(Table::Events).await?;
        let comments = self.ids(Table::Comments).await?;
        linker.link_comments(&mut self.ctx, &events, &comments).await
      }
      Phase::Init | Phase::Done => Ok(Tally::default()),
    }
  }

  fn log_phase(&self, report: &PhaseReport) {
    let t = report.tally;
    match &report.skipped {
      Some(reason) => tracing::info!(phase = %report.phase, reason = %reason, "phase skipped"),
      None if t.failed() > 0 => tracing::warn!(
        phase = %report.phase,
        attempted = t.attempted,
        succeeded = t.succeeded,
        rows = t.rows,
        "phase complete with skipped records"
      ),
      None => tracing::info!(
        phase = %report.phase,
        attempted = t.attempted,
        succeeded = t.succeeded,
        rows = t.rows,
        "phase complete"
      ),
    }
  }
}
