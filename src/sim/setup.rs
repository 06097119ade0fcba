/// Field preparation and entity spawning.
///
/// Entities are built fresh for every down. The player is the only thing
/// that survives a down, and only as a position: after a tackle it keeps its
/// column and is re-centered vertically.

use rand::Rng;

use crate::domain::entity::{cell_occupied, Defender, Facing, Player, PlayerState, Referee};
use crate::domain::field::{
    FIELD_END_X, FIELD_START_X, GRID_W, START_ATTEMPTS, VIEW_H, VIEW_W,
};
use super::world::World;

/// Reset session stats for a brand-new game.
pub fn reset_session(world: &mut World) {
    world.score = 0;
    world.attempts = START_ATTEMPTS;
    world.time_remaining = world.timing.game_duration_secs;
    world.touchdowns = 0;
}

/// Full field reset: player at own goal line, camera snapped right,
/// fresh defense, fresh possession. Used at session start and after a
/// touchdown.
pub fn prepare_field<R: Rng>(world: &mut World, rng: &mut R) {
    world.player = Player::new(FIELD_END_X, VIEW_H / 2);
    world.camera.snap_to_right();
    world.tackle_source = None;

    spawn_defense(world, rng);
    world.downs.setup(world.player.x);

    world.schedule.cancel_all();
}

/// Next down after a tackle: the player keeps its column, everything else
/// is rebuilt.
pub fn respawn_after_down<R: Rng>(world: &mut World, rng: &mut R) {
    world.player.y = VIEW_H / 2;
    world.player.facing = Facing::Left;
    world.player.state = PlayerState::Stand;
    world.tackle_source = None;

    spawn_defense(world, rng);
    world.camera.follow(world.player.x);
}

/// Defender density scales with touchdowns; referees are roughly one per
/// five defenders, never zero.
fn spawn_defense<R: Rng>(world: &mut World, rng: &mut R) {
    world.defenders.clear();
    world.referees.clear();

    let per_view = (world.defense_base_density + world.touchdowns * 2)
        .min(world.defense_max_density);
    let field_ratio = GRID_W as f64 / VIEW_W as f64;
    let total_defenders = (per_view as f64 * field_ratio).round() as usize;
    let total_referees = (total_defenders / 5).max(1);

    let player = (world.player.x, world.player.y);

    for _ in 0..total_defenders {
        let (x, y) = free_cell(world, player, rng);
        world.defenders.push(Defender::new(x, y));
    }
    for _ in 0..total_referees {
        let (x, y) = free_cell(world, player, rng);
        world.referees.push(Referee::new(x, y));
    }
}

/// Rejection-sample an unoccupied playable cell.
fn free_cell<R: Rng>(world: &World, player: (i32, i32), rng: &mut R) -> (i32, i32) {
    loop {
        let x = rng.gen_range(FIELD_START_X..FIELD_END_X);
        let y = rng.gen_range(0..VIEW_H);
        if !cell_occupied(Some(player), &world.defenders, &world.referees, x, y) {
            return (x, y);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn fresh_world() -> World {
        World::new(&GameConfig::default())
    }

    #[test]
    fn prepare_field_places_player_at_own_goal() {
        let mut w = fresh_world();
        prepare_field(&mut w, &mut StdRng::seed_from_u64(1));
        assert_eq!(w.player.x, FIELD_END_X);
        assert_eq!(w.player.y, VIEW_H / 2);
        assert_eq!(w.camera.x, GRID_W - VIEW_W);
        assert_eq!(w.downs.marker_x, FIELD_END_X - 10);
        assert_eq!(w.downs.attempts_remaining, START_ATTEMPTS);
    }

    #[test]
    fn spawn_avoids_collisions_and_bounds() {
        let mut w = fresh_world();
        prepare_field(&mut w, &mut StdRng::seed_from_u64(2));

        let mut cells: Vec<(i32, i32)> = w.defenders.iter().map(|d| (d.x, d.y)).collect();
        cells.extend(w.referees.iter().map(|r| (r.x, r.y)));
        cells.push((w.player.x, w.player.y));
        let len = cells.len();
        cells.sort_unstable();
        cells.dedup();
        assert_eq!(cells.len(), len, "spawn produced overlapping entities");

        for &(x, y) in &cells {
            assert!(x >= FIELD_START_X || (x, y) == (w.player.x, w.player.y));
            assert!(x < GRID_W - 1 && y >= 0 && y < VIEW_H);
        }
    }

    #[test]
    fn density_scales_with_touchdowns() {
        let mut w = fresh_world();
        prepare_field(&mut w, &mut StdRng::seed_from_u64(3));
        let base = w.defenders.len();

        w.touchdowns = 3;
        prepare_field(&mut w, &mut StdRng::seed_from_u64(3));
        assert!(w.defenders.len() > base);

        // Density is capped.
        w.touchdowns = 100;
        prepare_field(&mut w, &mut StdRng::seed_from_u64(3));
        let expected = (20.0 * GRID_W as f64 / VIEW_W as f64).round() as usize;
        assert_eq!(w.defenders.len(), expected);
    }

    #[test]
    fn respawn_after_down_keeps_player_column() {
        let mut w = fresh_world();
        prepare_field(&mut w, &mut StdRng::seed_from_u64(4));
        w.player.x = 25;
        w.player.y = 0;
        respawn_after_down(&mut w, &mut StdRng::seed_from_u64(5));
        assert_eq!(w.player.x, 25);
        assert_eq!(w.player.y, VIEW_H / 2);
        assert_eq!(w.player.facing, Facing::Left);
        assert_eq!(w.player.state, PlayerState::Stand);
    }

    #[test]
    fn referee_headcount_follows_defenders() {
        let mut w = fresh_world();
        prepare_field(&mut w, &mut StdRng::seed_from_u64(6));
        assert_eq!(w.referees.len(), (w.defenders.len() / 5).max(1));
    }
}
