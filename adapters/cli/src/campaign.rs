//! Level selection and headless round execution.

use clap::ValueEnum;
use podfield_core::{DriveStrategy, FieldConfig, GameLevel, RoundOutcome};
use podfield_system_planner::Planner;
use podfield_system_round::{HoldPosition, Round, RoundSummary};
use podfield_world::{query, DriveRole, Field, SetupError};
use tracing::{info, warn};

/// Behaviour assigned to AI drives.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub(crate) enum AiStrategy {
    /// AI drives never move.
    Parked,
    /// AI drives collect pods with the pathfinding planner.
    Planner,
}

/// Result of playing a single level.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct LevelReport {
    pub(crate) name: String,
    pub(crate) outcome: RoundOutcome,
    pub(crate) summary: RoundSummary,
}

/// Sets up `level` on top of `base` and plays it to completion.
///
/// The player is always steered by a [`Planner`].
pub(crate) fn play_level(
    base: &FieldConfig,
    level: &GameLevel,
    max_moves: u32,
    ai: AiStrategy,
) -> Result<LevelReport, SetupError> {
    let config = base.clone().with_level(level);
    let field = Field::setup(&config)?;
    info!(
        level = %level.name,
        columns = config.columns,
        rows = config.rows,
        ai_drives = config.ai_drives,
        pods = config.pods,
        "level ready"
    );
    let undeliverable = query::undeliverable_pods(&field);
    if !undeliverable.is_empty() {
        warn!(count = undeliverable.len(), "level contains pods without a goal");
    }

    let drives = query::drive_ids(&field);
    let mut round = Round::new(field, max_moves);
    for drive in drives {
        let strategy: Box<dyn DriveStrategy> = match (query::drive_role(round.field(), drive), ai) {
            (Some(DriveRole::Player), _) | (_, AiStrategy::Planner) => {
                Box::new(Planner::new(drive))
            }
            _ => Box::new(HoldPosition),
        };
        round.assign(drive, strategy);
    }

    let outcome = round.run();
    Ok(LevelReport {
        name: level.name.clone(),
        outcome,
        summary: round.summary(),
    })
}

/// Picks the levels to play from `levels`.
///
/// `index` is one-based. Returns `None` when it does not name a level.
pub(crate) fn select_levels(
    levels: Vec<GameLevel>,
    index: usize,
    all: bool,
) -> Option<Vec<GameLevel>> {
    if all {
        return Some(levels);
    }
    let level = levels.into_iter().nth(index.checked_sub(1)?)?;
    Some(vec![level])
}
