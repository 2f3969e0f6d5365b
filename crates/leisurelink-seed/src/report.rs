//! Success/attempt accounting for a run.

use serde::Serialize;

use crate::orchestrator::Phase;

/// Attempted vs. succeeded units for one phase, plus the rows they wrote.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Tally {
  pub attempted: usize,
  pub succeeded: usize,
  /// Rows written by the succeeded units; a linked event may write several.
  pub rows:      usize,
}

impl Tally {
  pub fn failed(&self) -> usize { self.attempted - self.succeeded }

  /// Merge another tally into this one.
  pub fn absorb(&mut self, other: Tally) {
    self.attempted += other.attempted;
    self.succeeded += other.succeeded;
    self.rows += other.rows;
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PhaseReport {
  pub phase:   Phase,
  /// Why the phase did no work, if it was passed through.
  pub skipped: Option<String>,
  pub tally:   Tally,
}

/// Per-phase results of a run, in phase order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunReport {
  pub phases: Vec<PhaseReport>,
}

impl RunReport {
  pub fn get(&self, phase: Phase) -> Option<&PhaseReport> {
    self.phases.iter().find(|p| p.phase == phase)
  }

  /// Tally of `phase`, or an empty one if it never ran.
  pub fn tally(&self, phase: Phase) -> Tally {
    self.get(phase).map(|p| p.tally).unwrap_or_default()
  }

  pub fn totals(&self) -> Tally {
    let mut total = Tally::default();
    for p in &self.phases {
      total.absorb(p.tally);
    }
    total
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn totals_sum_phases() {
    let report = RunReport {
      phases: vec![
        PhaseReport {
          phase:   Phase::UsersGenerated,
          skipped: None,
          tally:   Tally { attempted: 10, succeeded: 9, rows: 27 },
        },
        PhaseReport {
          phase:   Phase::EventsGenerated,
          skipped: None,
          tally:   Tally { attempted: 5, succeeded: 5, rows: 5 },
        },
      ],
    };

    let t = report.totals();
    assert_eq!(t, Tally { attempted: 15, succeeded: 14, rows: 32 });
    assert_eq!(t.failed(), 1);
    assert_eq!(report.tally(Phase::CommentsLinked), Tally::default());
  }
}
