#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure helpers that estimate how much defender fire a route attracts.

use breach_planner_core::{Battlefield, Location, Player};
use thiserror::Error;

/// Reasons a threat query may fail.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum ThreatError {
    /// No candidate locations were supplied.
    #[error("no candidate locations to choose from")]
    NoCandidates,
}

/// Sums the expected incoming damage along `path`.
///
/// Each cell contributes the number of opposing defenders able to hit it
/// multiplied by the defenders' per-shot damage. Empty paths are harmless.
#[must_use]
pub fn estimate_path_damage<B>(board: &B, path: &[Location], turret_damage: f32) -> f32
where
    B: Battlefield + ?Sized,
{
    path.iter()
        .map(|&cell| board.attackers_of(cell, Player::Own) as f32 * turret_damage)
        .sum()
}

/// Picks the candidate whose path to the edge takes the least damage.
///
/// Ties resolve to the earliest candidate.
pub fn safest_of<B>(
    board: &B,
    candidates: &[Location],
    turret_damage: f32,
) -> Result<Location, ThreatError>
where
    B: Battlefield + ?Sized,
{
    let mut best: Option<(Location, f32)> = None;

    for &candidate in candidates {
        let path = board.path_to_edge(candidate);
        let damage = estimate_path_damage(board, &path, turret_damage);
        tracing::trace!(?candidate, damage, "path damage estimated");

        match best {
            Some((_, best_damage)) if damage >= best_damage => {}
            _ => best = Some((candidate, damage)),
        }
    }

    best.map(|(location, _)| location)
        .ok_or(ThreatError::NoCandidates)
}
