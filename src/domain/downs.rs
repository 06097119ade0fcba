/// Possession and first-down bookkeeping.
///
/// The tracker holds the first-down marker column, the derived yards-to-go,
/// and the remaining attempts. It is recomputed on down setup and on every
/// down resolution (tackle stop or touchdown).

use super::field::{FIELD_START_X, FIRST_DOWN_DISTANCE, START_ATTEMPTS};

/// Result of resolving a down at the player's stopping column.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum DownOutcome {
    /// Stopped in the endzone — down-resolution math is bypassed entirely.
    Touchdown,
    /// Reached the marker: fresh set of attempts, marker advanced.
    Converted,
    /// Short of the marker: one attempt spent.
    Short,
    /// Attempts exhausted — possession lost.
    Turnover,
}

#[derive(Clone, Debug)]
pub struct DownTracker {
    /// Column the player must reach (or pass) to renew attempts.
    /// Invariant: never below `FIELD_START_X`.
    pub marker_x: i32,
    /// Derived, non-negative; recomputed whenever the marker or the
    /// player's stopping column changes.
    pub yards_to_go: i32,
    pub attempts_remaining: i32,
}

impl DownTracker {
    pub fn new() -> Self {
        DownTracker { marker_x: 0, yards_to_go: 0, attempts_remaining: START_ATTEMPTS }
    }

    /// Fresh possession: marker a full first-down distance ahead of the
    /// player, full set of attempts.
    pub fn setup(&mut self, player_x: i32) {
        self.marker_x = player_x - FIRST_DOWN_DISTANCE;
        self.attempts_remaining = START_ATTEMPTS;
        self.clamp_marker();
        self.recompute_yards(player_x);
    }

    /// Resolve the down at the player's stopping column.
    pub fn resolve(&mut self, stopping_x: i32) -> DownOutcome {
        if stopping_x < FIELD_START_X {
            return DownOutcome::Touchdown;
        }

        let outcome = if stopping_x <= self.marker_x {
            self.marker_x = stopping_x - FIRST_DOWN_DISTANCE;
            self.attempts_remaining = START_ATTEMPTS;
            DownOutcome::Converted
        } else {
            self.attempts_remaining -= 1;
            DownOutcome::Short
        };

        self.clamp_marker();

        if self.attempts_remaining <= 0 {
            return DownOutcome::Turnover;
        }

        self.recompute_yards(stopping_x);
        outcome
    }

    fn clamp_marker(&mut self) {
        if self.marker_x < FIELD_START_X {
            self.marker_x = FIELD_START_X;
        }
    }

    /// Goal-line asymmetry is intentional: the boundary column itself is not
    /// a valid stopping line, so with the marker clamped to `FIELD_START_X`
    /// the distance measures to one column before the boundary.
    fn recompute_yards(&mut self, from_x: i32) {
        self.yards_to_go = if self.marker_x == FIELD_START_X {
            from_x - (FIELD_START_X - 1)
        } else {
            from_x - self.marker_x
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn setup_places_marker_a_first_down_ahead() {
        let mut t = DownTracker::new();
        t.setup(30);
        assert_eq!(t.marker_x, 20);
        assert_eq!(t.attempts_remaining, START_ATTEMPTS);
        assert_eq!(t.yards_to_go, 10);
    }

    #[test]
    fn setup_clamps_marker_near_goal_line() {
        let mut t = DownTracker::new();
        t.setup(8); // 8 - 10 would be off the field
        assert_eq!(t.marker_x, FIELD_START_X);
        // Goal-line formula: measured to one column before the boundary.
        assert_eq!(t.yards_to_go, 8 - (FIELD_START_X - 1));
    }

    #[test]
    fn conversion_at_exact_marker() {
        let mut t = DownTracker::new();
        t.setup(30);
        t.attempts_remaining = 2;
        assert_eq!(t.resolve(20), DownOutcome::Converted);
        assert_eq!(t.marker_x, 10);
        assert_eq!(t.attempts_remaining, START_ATTEMPTS);
        assert_eq!(t.yards_to_go, 10);
    }

    #[test]
    fn short_of_marker_spends_attempt() {
        let mut t = DownTracker::new();
        t.marker_x = 10;
        t.attempts_remaining = 3;
        assert_eq!(t.resolve(12), DownOutcome::Short);
        assert_eq!(t.marker_x, 10);
        assert_eq!(t.attempts_remaining, 2);
        assert_eq!(t.yards_to_go, 2);
    }

    #[test]
    fn endzone_stop_bypasses_down_math() {
        let mut t = DownTracker::new();
        t.setup(11);
        let before = t.clone();
        assert_eq!(t.resolve(FIELD_START_X - 1), DownOutcome::Touchdown);
        assert_eq!(t.marker_x, before.marker_x);
        assert_eq!(t.attempts_remaining, before.attempts_remaining);
    }

    #[test]
    fn last_attempt_missed_is_turnover() {
        let mut t = DownTracker::new();
        t.marker_x = 10;
        t.attempts_remaining = 1;
        assert_eq!(t.resolve(15), DownOutcome::Turnover);
        assert_eq!(t.attempts_remaining, 0);
    }

    #[test]
    fn yards_to_go_non_negative_across_field() {
        for marker in FIELD_START_X..=30 {
            for stop in marker..=40 {
                let mut t = DownTracker::new();
                t.marker_x = marker;
                t.attempts_remaining = START_ATTEMPTS;
                if t.resolve(stop) != DownOutcome::Turnover {
                    assert!(t.yards_to_go >= 0, "marker={marker} stop={stop}");
                }
            }
        }
    }

    #[test]
    fn conversion_at_goal_line_boundary() {
        let mut t = DownTracker::new();
        t.marker_x = FIELD_START_X;
        t.attempts_remaining = 2;
        assert_eq!(t.resolve(FIELD_START_X), DownOutcome::Converted);
        assert_eq!(t.marker_x, FIELD_START_X);
        assert_eq!(t.yards_to_go, 1);
    }
}
