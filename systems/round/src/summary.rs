//! Event-derived counters for a single round.

use std::fmt;

use podfield_core::Event;

/// Counters aggregated from the events of a round.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct RoundSummary {
    /// Ticks fully or partially evaluated.
    pub ticks: u32,
    /// Drive displacements applied.
    pub moves: u32,
    /// Pods lifted during play.
    pub lifts: u32,
    /// Pods delivered to their target goal.
    pub deliveries: u32,
    /// Lift requests on tiles without a liftable pod.
    pub rejected_lifts: u32,
    /// Drop requests that did not deliver a pod.
    pub rejected_drops: u32,
    /// Crashing AI moves that were discarded.
    pub skipped_moves: u32,
}

impl RoundSummary {
    /// Folds `events` into the counters.
    pub fn record(&mut self, events: &[Event]) {
        for event in events {
            let counter = match event {
                Event::DriveMoved { .. } => &mut self.moves,
                Event::PodLifted { .. } => &mut self.lifts,
                Event::PodDelivered { .. } => &mut self.deliveries,
                Event::LiftRejected { .. } => &mut self.rejected_lifts,
                Event::DropRejected { .. } => &mut self.rejected_drops,
                Event::MoveSkipped { .. } => &mut self.skipped_moves,
                Event::PlayerCrashed { .. } => continue,
            };
            *counter = counter.saturating_add(1);
        }
    }
}

impl fmt::Display for RoundSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ticks, {} moves, {} lifts, {} deliveries, {} rejected lifts, {} rejected drops, {} skipped moves",
            self.ticks,
            self.moves,
            self.lifts,
            self.deliveries,
            self.rejected_lifts,
            self.rejected_drops,
            self.skipped_moves
        )
    }
}
