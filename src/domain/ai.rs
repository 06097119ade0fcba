/// Defense AI — per-tick random walk with collision avoidance.
///
/// Each tick, every standing defender moves with probability 0.4: one random
/// axis, one random direction, one cell. Referees do the same with
/// probability 0.3, after all defenders. A defender stepping onto the
/// player's cell tackles immediately and the rest of the tick is abandoned.
/// Referees never tackle.
///
/// Every function is generic over `rand::Rng` so tests can drive the walk
/// with a seeded generator.

use rand::Rng;

use super::entity::{cell_occupied, Defender, Facing, Referee};
use super::field;

pub const DEFENDER_MOVE_CHANCE: f64 = 0.4;
pub const REFEREE_MOVE_CHANCE: f64 = 0.3;

/// What the tick produced.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum TickOutcome {
    Clear,
    /// Index of the defender that walked onto the player's cell.
    Tackle { defender: usize },
}

/// One random axis-aligned step: (±1, 0) or (0, ±1), uniform.
fn random_step<R: Rng>(rng: &mut R) -> (i32, i32) {
    let unit = if rng.gen_bool(0.5) { 1 } else { -1 };
    if rng.gen_bool(0.5) {
        (unit, 0)
    } else {
        (0, unit)
    }
}

/// Advance every defender, then every referee, by one tick.
///
/// On a tackle the whole tick aborts: remaining defenders and all referees
/// stay put for this call.
pub fn step_defense<R: Rng>(
    defenders: &mut [Defender],
    referees: &mut [Referee],
    player: (i32, i32),
    rng: &mut R,
) -> TickOutcome {
    for i in 0..defenders.len() {
        if defenders[i].knocked_down {
            continue;
        }
        if !rng.gen_bool(DEFENDER_MOVE_CHANCE) {
            continue;
        }

        let (dx, dy) = random_step(rng);

        // Facing updates even when the step is rejected.
        if dx > 0 {
            defenders[i].facing = Facing::Right;
        } else if dx < 0 {
            defenders[i].facing = Facing::Left;
        }

        let tx = defenders[i].x + dx;
        let ty = defenders[i].y + dy;
        if !field::walkable(tx, ty) {
            continue;
        }

        if (tx, ty) == player {
            return TickOutcome::Tackle { defender: i };
        }

        if !cell_occupied(Some(player), defenders, referees, tx, ty) {
            defenders[i].x = tx;
            defenders[i].y = ty;
        }
    }

    for i in 0..referees.len() {
        if !rng.gen_bool(REFEREE_MOVE_CHANCE) {
            continue;
        }

        let (dx, dy) = random_step(rng);

        if dx > 0 {
            referees[i].facing = Facing::Right;
        } else if dx < 0 {
            referees[i].facing = Facing::Left;
        }

        let tx = referees[i].x + dx;
        let ty = referees[i].y + dy;
        if !field::walkable(tx, ty) {
            continue;
        }

        // Referees stop short of everyone, the player included.
        if !cell_occupied(Some(player), defenders, referees, tx, ty) {
            referees[i].x = tx;
            referees[i].y = ty;
        }
    }

    TickOutcome::Clear
}
