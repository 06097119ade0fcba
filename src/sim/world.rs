/// World: the complete state of a running game session.
///
/// One mutable struct passed explicitly to every subsystem call — there is
/// no ambient global. The renderer only ever receives `&World`, so the
/// simulation is the sole writer.
///
/// ## Camera
///
/// One-dimensional horizontal scroll. `camera.x` is the leftmost visible
/// grid column. The player has a dead zone on screen columns 9–11 of 14;
/// leaving it shifts the camera by at most one column per movement update.

use crate::config::{GameConfig, TimingConfig};
use crate::domain::downs::DownTracker;
use crate::domain::entity::{Defender, Player, Referee};
use crate::domain::field::{GRID_W, VIEW_W};
use super::schedule::Scheduler;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Phase {
    Menu,
    Ready,
    Playing,
    Tackled,
    Touchdown,
    GameOver,
}

/// Dead-zone bounds in screen columns.
const DEAD_ZONE_LEFT: i32 = 9;
const DEAD_ZONE_RIGHT: i32 = 11;

#[derive(Clone, Debug)]
pub struct Camera {
    /// Leftmost visible grid column. Always in `[0, GRID_W - VIEW_W]`.
    pub x: i32,
}

impl Camera {
    pub fn new() -> Self {
        Camera { x: 0 }
    }

    /// Snap to the rightmost view (where the drive starts).
    pub fn snap_to_right(&mut self) {
        self.x = GRID_W - VIEW_W;
    }

    /// Follow the player: shift one column when outside the dead zone.
    pub fn follow(&mut self, player_x: i32) {
        let screen_x = player_x - self.x;
        if screen_x < DEAD_ZONE_LEFT && self.x > 0 {
            self.x -= 1;
        }
        if screen_x > DEAD_ZONE_RIGHT && self.x < GRID_W - VIEW_W {
            self.x += 1;
        }
    }
}

pub struct World {
    // ── State machine ──
    pub phase: Phase,

    // ── Entities (rebuilt every down; player repositioned in place) ──
    pub player: Player,
    pub defenders: Vec<Defender>,
    pub referees: Vec<Referee>,

    // ── Possession ──
    pub downs: DownTracker,

    // ── Session stats ──
    pub score: u32,
    /// Session attempt budget; mirrors the scoreboard's down counter.
    pub attempts: i32,
    pub time_remaining: u32,
    pub touchdowns: u32,

    // ── Camera ──
    pub camera: Camera,

    // ── Tackle presentation ──
    /// Cell of the defender that made the stop, for the tackling pose.
    pub tackle_source: Option<(i32, i32)>,

    // ── Touchdown celebration ──
    pub show_td_sprite: bool,
    pub td_blink_count: u32,

    // ── Timers & configuration ──
    pub schedule: Scheduler,
    pub timing: TimingConfig,
    pub defense_base_density: u32,
    pub defense_max_density: u32,
}

impl World {
    pub fn new(config: &GameConfig) -> Self {
        World {
            phase: Phase::Menu,
            player: Player::new(0, 0),
            defenders: vec![],
            referees: vec![],
            downs: DownTracker::new(),
            score: 0,
            attempts: crate::domain::field::START_ATTEMPTS,
            time_remaining: config.timing.game_duration_secs,
            touchdowns: 0,
            camera: Camera::new(),
            tackle_source: None,
            show_td_sprite: false,
            td_blink_count: 0,
            schedule: Scheduler::new(),
            timing: config.timing.clone(),
            defense_base_density: config.defense.base_density,
            defense_max_density: config.defense.max_density,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn camera_dead_zone() {
        let mut cam = Camera { x: 10 };
        // Screen column 10: inside the dead zone, no scroll.
        cam.follow(20);
        assert_eq!(cam.x, 10);
        // Screen column 8: left of the dead zone.
        cam.follow(18);
        assert_eq!(cam.x, 9);
        // Screen column 12: right of the dead zone.
        cam.follow(21);
        assert_eq!(cam.x, 10);
    }

    #[test]
    fn camera_clamps_to_field() {
        let mut cam = Camera { x: 0 };
        cam.follow(0); // would scroll left of the field
        assert_eq!(cam.x, 0);

        let mut cam = Camera { x: GRID_W - VIEW_W };
        cam.follow(GRID_W - 1); // would scroll past the right edge
        assert_eq!(cam.x, GRID_W - VIEW_W);
    }

    #[test]
    fn camera_stays_in_range_for_any_walk() {
        let mut cam = Camera::new();
        cam.snap_to_right();
        let mut x = GRID_W - 2;
        // March the player across the whole field and back.
        for _ in 0..2 {
            for _ in 0..GRID_W {
                x = (x - 1).max(1);
                cam.follow(x);
                assert!(cam.x >= 0 && cam.x <= GRID_W - VIEW_W);
            }
            for _ in 0..GRID_W {
                x = (x + 1).min(GRID_W - 2);
                cam.follow(x);
                assert!(cam.x >= 0 && cam.x <= GRID_W - VIEW_W);
            }
        }
    }
}
