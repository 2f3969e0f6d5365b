//! Record-level units of work.

use std::future::Future;

use leisurelink_core::store::SeedStore;

use crate::{Error, Result, report::Tally};

/// What happened to one attempted record.
#[derive(Debug)]
pub enum InsertOutcome<T> {
  Inserted(T),
  /// The record failed and its unit was rolled back.
  Skipped(Error),
}

impl<T> InsertOutcome<T> {
  pub fn is_inserted(&self) -> bool { matches!(self, Self::Inserted(_)) }
}

/// Run `work` inside a record-level unit: keep it on success, roll back just
/// this unit on failure.
///
/// The caller must already have opened a phase with
/// [`SeedStore::begin`]; units nest inside it, and a backend may refuse a
/// unit with no phase open.
///
/// Only a failure to open, release or roll back the unit itself is returned
/// as an error; that leaves the phase transaction in an unknown state.
pub async fn in_unit<S, T, W>(store: &S, work: W) -> Result<InsertOutcome<T>>
where
  S: SeedStore,
  W: Future<Output = Result<T>>,
{
  store.begin_unit().await.map_err(Error::store)?;

  match work.await {
    Ok(value) => {
      store.commit_unit().await.map_err(Error::store)?;
      Ok(InsertOutcome::Inserted(value))
    }
    Err(err) => {
      store.rollback_unit().await.map_err(Error::store)?;
      Ok(InsertOutcome::Skipped(err))
    }
  }
}

/// Fold an outcome into `tally`, logging skipped records.
pub fn record<T>(tally: &mut Tally, what: &'static str, outcome: &InsertOutcome<T>) {
  tally.attempted += 1;
  match outcome {
    InsertOutcome::Inserted(_) => tally.succeeded += 1,
    InsertOutcome::Skipped(err) => {
      tracing::warn!(record = what, error = %err, "skipping record");
    }
  }
}
