/// State transitions and update functions.
///
/// Two entry points drive the whole simulation:
///   - `move_player` — a discrete movement intent from the keyboard
///   - `on_timer`    — a scheduled event came due (AI tick, clock, delays)
///
/// Both return the `GameEvent`s they produced; the frame loop feeds those to
/// the sound engine. Every transition out of a timed state goes through
/// `Scheduler::cancel_all`, so no timer survives the state it was armed in.

use std::time::Duration;

use rand::Rng;

use crate::domain::ai::{self, TickOutcome};
use crate::domain::downs::DownOutcome;
use crate::domain::entity::{Facing, MoveDir, PlayerState};
use crate::domain::field::{self, START_ATTEMPTS};
use super::event::GameEvent;
use super::schedule::TimerKind;
use super::setup;
use super::world::{Phase, World};

/// Phases of the touchdown celebration blink.
const TD_BLINK_PHASES: u32 = 8;

// ══════════════════════════════════════════════════════════════
// Session start / restart
// ══════════════════════════════════════════════════════════════

/// MENU start action, or GAMEOVER restart: full session reset, then the
/// opening drive with the kickoff fanfare.
pub fn start_game<R: Rng>(world: &mut World, rng: &mut R) -> Vec<GameEvent> {
    let mut events = Vec::new();
    setup::reset_session(world);
    begin_drive(world, rng, true, &mut events);
    events
}

/// Prepare a fresh drive and wait at READY for the kickoff.
fn begin_drive<R: Rng>(world: &mut World, rng: &mut R, fanfare: bool, events: &mut Vec<GameEvent>) {
    setup::prepare_field(world, rng);
    world.phase = Phase::Ready;

    if fanfare {
        events.push(GameEvent::Cheer);
        world.schedule.once(
            TimerKind::SealCall,
            Duration::from_millis(world.timing.seal_delay_ms),
        );
    }
    world.schedule.once(
        TimerKind::Kickoff,
        Duration::from_millis(world.timing.ready_delay_ms),
    );
}

// ══════════════════════════════════════════════════════════════
// Player action resolver
// ══════════════════════════════════════════════════════════════

/// Resolve one movement intent. Exactly one axis is nonzero.
///
/// Order matters and mirrors the play rules: sprite state updates happen
/// even for rejected moves; an intent past the attacking boundary scores;
/// referees silently block; a defender in the target cell triggers juke
/// resolution; and a completed move re-checks the endzone.
pub fn move_player(world: &mut World, dir: MoveDir) -> Vec<GameEvent> {
    let mut events = Vec::new();
    if world.phase != Phase::Playing {
        return events;
    }

    let (dx, dy) = dir.delta();

    if dx != 0 {
        world.player.facing = if dx < 0 { Facing::Left } else { Facing::Right };
        world.player.state = if world.player.state == PlayerState::RunSide {
            PlayerState::Stand
        } else {
            PlayerState::RunSide
        };
    }
    if dy != 0 {
        world.player.state = if dy < 0 { PlayerState::RunUp } else { PlayerState::RunDown };
        world.player.step_left_foot = !world.player.step_left_foot;
    }

    let tx = world.player.x + dx;
    let ty = world.player.y + dy;

    if !field::walkable(tx, ty) {
        // Crossing the attacking boundary is the one legal way off the grid.
        if tx <= 0 {
            score_touchdown(world, &mut events);
        }
        return events;
    }

    // A referee in the way: silently rejected, no state change.
    if world.referees.iter().any(|r| r.x == tx && r.y == ty) {
        return events;
    }

    let blocking = world
        .defenders
        .iter()
        .position(|d| !d.knocked_down && d.x == tx && d.y == ty);

    if let Some(idx) = blocking {
        // Juke: the cell one further step decides it.
        let bx = tx + dx;
        let by = ty + dy;
        let backup_defender = world.defenders.iter().enumerate().any(|(j, d)| {
            j != idx && !d.knocked_down && d.x == bx && d.y == by
        });

        if backup_defender || !field::walkable(bx, by) {
            player_tackled(world, (tx, ty), &mut events);
            return events;
        }

        world.defenders[idx].knocked_down = true;
        world.score += 1;
        events.push(GameEvent::Juke);
        world.player.x = tx;
        world.player.y = ty;
    } else {
        world.player.x = tx;
        world.player.y = ty;
    }

    events.push(GameEvent::Step);
    world.camera.follow(world.player.x);

    if field::in_endzone(world.player.x) {
        score_touchdown(world, &mut events);
    }
    events
}

// ══════════════════════════════════════════════════════════════
// Timer dispatch
// ══════════════════════════════════════════════════════════════

/// A scheduled event came due. Each handler re-checks the phase: cancel_all
/// on every exit makes stale timers impossible, and the guard keeps a
/// mis-scheduled event from corrupting a new state.
pub fn on_timer<R: Rng>(world: &mut World, kind: TimerKind, rng: &mut R) -> Vec<GameEvent> {
    let mut events = Vec::new();
    match kind {
        TimerKind::Kickoff => kickoff(world, &mut events),
        TimerKind::SealCall => events.push(GameEvent::SealCall),
        TimerKind::DefenderTick => tick_defense(world, rng, &mut events),
        TimerKind::ClockTick => tick_clock(world, &mut events),
        TimerKind::DownResolution => resolve_down(world, rng, &mut events),
        TimerKind::TouchdownBlink => tick_blink(world, rng, &mut events),
    }
    events
}

/// READY -> PLAYING: whistle, then the AI tick and the game clock start.
fn kickoff(world: &mut World, events: &mut Vec<GameEvent>) {
    if world.phase != Phase::Ready {
        return;
    }
    world.phase = Phase::Playing;
    events.push(GameEvent::Whistle);
    world.schedule.every(
        TimerKind::DefenderTick,
        Duration::from_millis(world.timing.turn_delay_ms),
    );
    world.schedule.every(
        TimerKind::ClockTick,
        Duration::from_millis(world.timing.clock_period_ms),
    );
}

fn tick_defense<R: Rng>(world: &mut World, rng: &mut R, events: &mut Vec<GameEvent>) {
    if world.phase != Phase::Playing {
        return;
    }
    let player = (world.player.x, world.player.y);
    match ai::step_defense(&mut world.defenders, &mut world.referees, player, rng) {
        TickOutcome::Clear => {}
        TickOutcome::Tackle { defender } => {
            let d = &world.defenders[defender];
            let source = (d.x, d.y);
            player_tackled(world, source, events);
        }
    }
}

fn tick_clock(world: &mut World, events: &mut Vec<GameEvent>) {
    if world.phase != Phase::Playing || world.time_remaining == 0 {
        return;
    }
    world.time_remaining -= 1;
    if world.time_remaining == 0 {
        events.push(GameEvent::TimeExpired);
        game_over(world);
    }
}

// ══════════════════════════════════════════════════════════════
// Down resolution
// ══════════════════════════════════════════════════════════════

fn player_tackled(world: &mut World, source: (i32, i32), events: &mut Vec<GameEvent>) {
    events.push(GameEvent::Tackled);
    world.phase = Phase::Tackled;
    world.tackle_source = Some(source);

    world.schedule.cancel_all();
    world.schedule.once(
        TimerKind::DownResolution,
        Duration::from_millis(world.timing.tackle_delay_ms),
    );
}

/// The tackle freeze ended: settle the first-down bookkeeping and move on
/// to the next down, a touchdown, or the end of the game.
fn resolve_down<R: Rng>(world: &mut World, rng: &mut R, events: &mut Vec<GameEvent>) {
    if world.phase != Phase::Tackled {
        return;
    }

    match world.downs.resolve(world.player.x) {
        DownOutcome::Touchdown => score_touchdown(world, events),
        DownOutcome::Turnover => {
            events.push(GameEvent::Turnover);
            game_over(world);
        }
        DownOutcome::Converted | DownOutcome::Short => {
            setup::respawn_after_down(world, rng);
            world.phase = Phase::Ready;
            world.schedule.cancel_all();
            world.schedule.once(
                TimerKind::Kickoff,
                Duration::from_millis(world.timing.ready_delay_ms),
            );
        }
    }
}

fn score_touchdown(world: &mut World, events: &mut Vec<GameEvent>) {
    events.push(GameEvent::Touchdown);
    world.phase = Phase::Touchdown;
    world.score += 7;
    world.touchdowns += 1;
    world.downs.attempts_remaining = START_ATTEMPTS;
    world.attempts = START_ATTEMPTS;

    world.schedule.cancel_all();
    world.td_blink_count = 0;
    world.show_td_sprite = true;
    world.schedule.every(
        TimerKind::TouchdownBlink,
        Duration::from_millis(world.timing.blink_phase_ms),
    );
}

fn tick_blink<R: Rng>(world: &mut World, rng: &mut R, events: &mut Vec<GameEvent>) {
    if world.phase != Phase::Touchdown {
        return;
    }
    world.td_blink_count += 1;
    world.show_td_sprite = world.td_blink_count % 2 != 0;

    if world.td_blink_count >= TD_BLINK_PHASES {
        world.schedule.cancel_all();
        begin_drive(world, rng, false, events);
    }
}

fn game_over(world: &mut World) {
    world.phase = Phase::GameOver;
    world.schedule.cancel_all();
}

// ══════════════════════════════════════════════════════════════
// Tests
// ══════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use crate::domain::entity::{Defender, Referee};
    use crate::domain::field::{FIELD_START_X, GRID_W, VIEW_W};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(1234)
    }

    /// A world in PLAYING with a hand-placed defense.
    fn playing_world() -> World {
        let mut w = World::new(&GameConfig::default());
        start_game(&mut w, &mut rng());
        w.phase = Phase::Playing;
        w.schedule.cancel_all();
        w.defenders.clear();
        w.referees.clear();
        w
    }

    #[test]
    fn plain_move_steps_and_scrolls() {
        let mut w = playing_world();
        w.player.x = 30;
        w.player.y = 3;
        w.camera.x = 22;
        let events = move_player(&mut w, MoveDir::Left);
        assert_eq!((w.player.x, w.player.y), (29, 3));
        assert!(events.contains(&GameEvent::Step));
        assert_eq!(w.camera.x, 21); // screen col 7 is left of the dead zone
    }

    #[test]
    fn vertical_bounds_reject_silently() {
        let mut w = playing_world();
        w.player.y = 0;
        let before_x = w.player.x;
        let events = move_player(&mut w, MoveDir::Up);
        assert!(events.is_empty());
        assert_eq!((w.player.x, w.player.y), (before_x, 0));
        assert_eq!(w.phase, Phase::Playing);
    }

    #[test]
    fn referee_blocks_silently() {
        let mut w = playing_world();
        w.player.x = 20;
        w.player.y = 3;
        w.referees.push(Referee::new(19, 3));
        let events = move_player(&mut w, MoveDir::Left);
        assert!(events.is_empty());
        assert_eq!(w.player.x, 20);
        assert_eq!(w.phase, Phase::Playing);
    }

    #[test]
    fn juke_succeeds_with_open_cell_behind() {
        let mut w = playing_world();
        w.player.x = 20;
        w.player.y = 3;
        w.defenders.push(Defender::new(19, 3));
        let score_before = w.score;

        let events = move_player(&mut w, MoveDir::Left);
        assert!(events.contains(&GameEvent::Juke));
        assert_eq!(w.score, score_before + 1);
        assert!(w.defenders[0].knocked_down);
        assert_eq!((w.player.x, w.player.y), (19, 3));
        assert_eq!(w.phase, Phase::Playing);
    }

    #[test]
    fn juke_fails_into_backup_defender() {
        let mut w = playing_world();
        w.player.x = 20;
        w.player.y = 3;
        w.defenders.push(Defender::new(19, 3));
        w.defenders.push(Defender::new(18, 3));
        let score_before = w.score;

        let events = move_player(&mut w, MoveDir::Left);
        assert!(events.contains(&GameEvent::Tackled));
        assert_eq!(w.phase, Phase::Tackled);
        assert_eq!(w.score, score_before);
        assert!(!w.defenders[0].knocked_down);
        assert_eq!(w.player.x, 20); // never moved
        assert_eq!(w.tackle_source, Some((19, 3)));
        assert!(w.schedule.is_scheduled(TimerKind::DownResolution));
        assert!(!w.schedule.is_scheduled(TimerKind::DefenderTick));
    }

    #[test]
    fn juke_fails_at_field_edge() {
        let mut w = playing_world();
        w.player.x = 20;
        w.player.y = 1;
        w.defenders.push(Defender::new(20, 0));
        let events = move_player(&mut w, MoveDir::Up);
        assert!(events.contains(&GameEvent::Tackled));
        assert_eq!(w.phase, Phase::Tackled);
    }

    #[test]
    fn knocked_down_defender_is_passable() {
        let mut w = playing_world();
        w.player.x = 20;
        w.player.y = 3;
        let mut d = Defender::new(19, 3);
        d.knocked_down = true;
        w.defenders.push(d);
        move_player(&mut w, MoveDir::Left);
        assert_eq!(w.player.x, 19);
        assert_eq!(w.phase, Phase::Playing);
    }

    #[test]
    fn reaching_endzone_scores_seven() {
        let mut w = playing_world();
        w.player.x = FIELD_START_X;
        w.player.y = 3;
        let score_before = w.score;
        let tds_before = w.touchdowns;

        let events = move_player(&mut w, MoveDir::Left);
        assert!(events.contains(&GameEvent::Touchdown));
        assert_eq!(w.phase, Phase::Touchdown);
        assert_eq!(w.score, score_before + 7);
        assert_eq!(w.touchdowns, tds_before + 1);
        assert_eq!(w.downs.attempts_remaining, START_ATTEMPTS);
        assert!(w.schedule.is_scheduled(TimerKind::TouchdownBlink));
        assert!(!w.schedule.is_scheduled(TimerKind::ClockTick));
    }

    #[test]
    fn boundary_intent_from_column_one_scores() {
        // x = 1 is walkable but an intent to x = 0 scores immediately.
        let mut w = playing_world();
        w.player.x = 1;
        w.player.y = 3;
        let events = move_player(&mut w, MoveDir::Left);
        assert!(events.contains(&GameEvent::Touchdown));
        assert_eq!(w.phase, Phase::Touchdown);
        assert_eq!(w.player.x, 1); // never left the grid
    }

    #[test]
    fn moves_ignored_outside_playing() {
        let mut w = playing_world();
        w.phase = Phase::Ready;
        let x = w.player.x;
        assert!(move_player(&mut w, MoveDir::Left).is_empty());
        assert_eq!(w.player.x, x);
    }

    #[test]
    fn kickoff_arms_clock_and_defense() {
        let mut w = World::new(&GameConfig::default());
        start_game(&mut w, &mut rng());
        assert_eq!(w.phase, Phase::Ready);

        let events = on_timer(&mut w, TimerKind::Kickoff, &mut rng());
        assert_eq!(w.phase, Phase::Playing);
        assert!(events.contains(&GameEvent::Whistle));
        assert!(w.schedule.is_scheduled(TimerKind::DefenderTick));
        assert!(w.schedule.is_scheduled(TimerKind::ClockTick));
    }

    #[test]
    fn stale_kickoff_is_a_no_op() {
        let mut w = playing_world();
        on_timer(&mut w, TimerKind::Kickoff, &mut rng());
        assert_eq!(w.phase, Phase::Playing);
        assert!(!w.schedule.is_scheduled(TimerKind::DefenderTick));
    }

    #[test]
    fn clock_expiry_ends_game() {
        let mut w = playing_world();
        w.time_remaining = 1;
        let events = on_timer(&mut w, TimerKind::ClockTick, &mut rng());
        assert!(events.contains(&GameEvent::TimeExpired));
        assert_eq!(w.phase, Phase::GameOver);
        assert_eq!(w.time_remaining, 0);
    }

    #[test]
    fn defense_tick_can_tackle() {
        let mut w = playing_world();
        w.player.x = 10;
        w.player.y = 3;
        // Box the player in so the first accepted defender step tackles.
        w.defenders.push(Defender::new(11, 3));
        w.defenders.push(Defender::new(9, 3));
        w.defenders.push(Defender::new(10, 2));
        w.defenders.push(Defender::new(10, 4));

        let mut r = rng();
        let mut tackled = false;
        for _ in 0..300 {
            let events = on_timer(&mut w, TimerKind::DefenderTick, &mut r);
            if events.contains(&GameEvent::Tackled) {
                tackled = true;
                break;
            }
        }
        assert!(tackled);
        assert_eq!(w.phase, Phase::Tackled);
        assert!(w.tackle_source.is_some());
        assert!(w.schedule.is_scheduled(TimerKind::DownResolution));
    }

    #[test]
    fn down_resolution_short_respawns_and_rearms_kickoff() {
        let mut w = playing_world();
        w.player.x = 15;
        w.player.y = 2;
        w.downs.marker_x = 10;
        w.downs.attempts_remaining = 3;
        w.defenders.push(Defender::new(15, 1));
        w.phase = Phase::Tackled;

        on_timer(&mut w, TimerKind::DownResolution, &mut rng());
        assert_eq!(w.phase, Phase::Ready);
        assert_eq!(w.downs.attempts_remaining, 2);
        assert_eq!(w.downs.yards_to_go, 5);
        assert_eq!(w.player.x, 15);
        assert_eq!(w.player.y, crate::domain::field::VIEW_H / 2);
        assert!(!w.defenders.is_empty()); // fresh defense spawned
        assert!(w.schedule.is_scheduled(TimerKind::Kickoff));
    }

    #[test]
    fn down_resolution_turnover_ends_game() {
        let mut w = playing_world();
        w.player.x = 15;
        w.downs.marker_x = 10;
        w.downs.attempts_remaining = 1;
        w.phase = Phase::Tackled;

        let events = on_timer(&mut w, TimerKind::DownResolution, &mut rng());
        assert!(events.contains(&GameEvent::Turnover));
        assert_eq!(w.phase, Phase::GameOver);
        assert!(!w.schedule.is_scheduled(TimerKind::Kickoff));
    }

    #[test]
    fn blink_runs_eight_phases_then_next_drive() {
        let mut w = playing_world();
        w.player.x = FIELD_START_X;
        w.player.y = 3;
        move_player(&mut w, MoveDir::Left);
        assert_eq!(w.phase, Phase::Touchdown);

        let mut r = rng();
        for i in 1..=7 {
            on_timer(&mut w, TimerKind::TouchdownBlink, &mut r);
            assert_eq!(w.phase, Phase::Touchdown);
            assert_eq!(w.show_td_sprite, i % 2 != 0);
        }
        on_timer(&mut w, TimerKind::TouchdownBlink, &mut r);
        assert_eq!(w.phase, Phase::Ready);
        // Fresh field: player back at own goal, camera snapped right.
        assert_eq!(w.player.x, crate::domain::field::FIELD_END_X);
        assert_eq!(w.camera.x, GRID_W - VIEW_W);
        assert!(w.schedule.is_scheduled(TimerKind::Kickoff));
        assert!(!w.schedule.is_scheduled(TimerKind::TouchdownBlink));
    }

    #[test]
    fn restart_resets_session_stats() {
        let mut w = playing_world();
        w.score = 33;
        w.touchdowns = 4;
        w.time_remaining = 0;
        w.phase = Phase::GameOver;

        let events = start_game(&mut w, &mut rng());
        assert_eq!(w.phase, Phase::Ready);
        assert_eq!(w.score, 0);
        assert_eq!(w.touchdowns, 0);
        assert_eq!(w.time_remaining, w.timing.game_duration_secs);
        assert!(events.contains(&GameEvent::Cheer));
        assert!(w.schedule.is_scheduled(TimerKind::SealCall));
    }
}
