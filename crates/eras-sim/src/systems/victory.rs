//! Game-over evaluation, run after cleanup.

use eras_core::events::Outcome;
use eras_core::nation::Nation;

/// Objective thresholds for the player nation.
#[derive(Debug, Clone, Copy)]
pub struct Objectives {
    pub minutes: f64,
    pub kills: u32,
}

/// Decide whether the match is over.
///
/// With a player nation: its fall is an immediate defeat (which covers every
/// base falling) and meeting both objectives is victory. Without one the
/// match ends once at most one nation is alive.
pub fn evaluate(
    nations: &[Nation],
    player: Option<usize>,
    minutes: f64,
    zombies_slain: u32,
    objectives: Objectives,
) -> Option<Outcome> {
    let Some(player) = player else {
        let mut living = nations.iter().filter(|n| n.is_alive());
        let first = living.next();
        return match (first, living.next()) {
            (None, _) => Some(Outcome::Extinction),
            (Some(winner), None) => Some(Outcome::Winner { nation: winner.id }),
            (Some(_), Some(_)) => None,
        };
    };

    let player_alive = nations.get(player).is_some_and(|n| n.is_alive());
    if !player_alive {
        return Some(Outcome::Defeat);
    }
    if minutes >= objectives.minutes && zombies_slain >= objectives.kills {
        return Some(Outcome::Victory);
    }
    None
}
