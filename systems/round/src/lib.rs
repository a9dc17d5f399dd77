#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Turn-based round driver.
//!
//! A [`Round`] owns the [`Field`] together with the strategy steering each
//! drive. Every tick it asks each strategy for a move and applies the moves
//! one at a time in drive order, so later drives observe the tiles vacated by
//! earlier ones.

mod summary;

use std::collections::BTreeMap;

use podfield_core::{DriveId, DriveMove, DriveStrategy, Event, RoundOutcome, SensorSnapshot};
use podfield_world::{query, Field};
use tracing::{debug, info};

pub use summary::RoundSummary;

/// Strategy that never moves.
#[derive(Clone, Copy, Debug, Default)]
pub struct HoldPosition;

impl DriveStrategy for HoldPosition {
    fn next_move(&mut self, _snapshot: &SensorSnapshot) -> DriveMove {
        DriveMove::None
    }
}

/// Drives a single round until it is won, lost or runs out of ticks.
pub struct Round {
    field: Field,
    strategies: BTreeMap<DriveId, Box<dyn DriveStrategy>>,
    max_ticks: u32,
    outcome: RoundOutcome,
    summary: RoundSummary,
}

impl Round {
    /// Creates a round over `field` that ends after `max_ticks` ticks at the latest.
    #[must_use]
    pub fn new(field: Field, max_ticks: u32) -> Self {
        Self {
            field,
            strategies: BTreeMap::new(),
            max_ticks,
            outcome: RoundOutcome::InProgress,
            summary: RoundSummary::default(),
        }
    }

    /// Hands control of `drive` to `strategy`, replacing any previous assignment.
    ///
    /// Drives without a strategy stay where they are.
    pub fn assign(&mut self, drive: DriveId, strategy: Box<dyn DriveStrategy>) {
        let _ = self.strategies.insert(drive, strategy);
    }

    /// Provides read-only access to the field.
    #[must_use]
    pub fn field(&self) -> &Field {
        &self.field
    }

    /// Consumes the round and returns the field in its final state.
    #[must_use]
    pub fn into_field(self) -> Field {
        self.field
    }

    /// Outcome after the most recent tick.
    #[must_use]
    pub const fn outcome(&self) -> RoundOutcome {
        self.outcome
    }

    /// Counters aggregated so far.
    #[must_use]
    pub const fn summary(&self) -> RoundSummary {
        self.summary
    }

    /// Evaluates a single tick and appends the generated events to `out`.
    ///
    /// Once the round has ended the stored outcome is returned without
    /// touching the field.
    pub fn step(&mut self, out: &mut Vec<Event>) -> RoundOutcome {
        if self.outcome.is_terminal() {
            return self.outcome;
        }
        if self.field.is_won() {
            return self.finish(RoundOutcome::Won);
        }
        if self.summary.ticks >= self.max_ticks {
            return self.finish(RoundOutcome::Exhausted);
        }

        self.summary.ticks += 1;
        let tick_start = out.len();

        for drive in query::drive_ids(&self.field) {
            let Some(strategy) = self.strategies.get_mut(&drive) else {
                continue;
            };
            let Some(snapshot) = self.field.sensor_snapshot(drive) else {
                continue;
            };
            let mv = strategy.next_move(&snapshot);
            if !self.field.apply_move(drive, mv, out) {
                self.summary.record(&out[tick_start..]);
                return self.finish(RoundOutcome::PlayerCrashed);
            }
        }
        self.summary.record(&out[tick_start..]);
        debug!(tick = self.summary.ticks, events = out.len() - tick_start, "tick applied");

        if self.field.is_won() {
            self.finish(RoundOutcome::Won)
        } else if self.summary.ticks >= self.max_ticks {
            self.finish(RoundOutcome::Exhausted)
        } else {
            RoundOutcome::InProgress
        }
    }

    /// Runs ticks until the round ends and returns the final outcome.
    pub fn run(&mut self) -> RoundOutcome {
        let mut events = Vec::new();
        loop {
            events.clear();
            let outcome = self.step(&mut events);
            if outcome.is_terminal() {
                return outcome;
            }
        }
    }

    fn finish(&mut self, outcome: RoundOutcome) -> RoundOutcome {
        self.outcome = outcome;
        info!(?outcome, ticks = self.summary.ticks, "round finished");
        outcome
    }
}

impl std::fmt::Debug for Round {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Round")
            .field("field", &self.field)
            .field("drives", &self.strategies.keys().collect::<Vec<_>>())
            .field("max_ticks", &self.max_ticks)
            .field("outcome", &self.outcome)
            .field("summary", &self.summary)
            .finish()
    }
}
