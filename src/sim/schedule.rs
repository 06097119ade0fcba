/// Central timer scheduler.
///
/// Every timed behavior in the game is an explicit scheduled-event record:
/// a kind, a due instant, and an optional re-arm period. The frame loop
/// calls `fire_due` once per frame and dispatches whatever came due.
///
/// State-machine exits call `cancel_all()` — one deterministic operation —
/// so a stale timer can never fire into a state it no longer belongs to.

use std::time::{Duration, Instant};

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum TimerKind {
    /// READY -> PLAYING after the pre-snap delay.
    Kickoff,
    /// Delayed seal bark during the kickoff cheer.
    SealCall,
    /// Periodic defense AI tick.
    DefenderTick,
    /// Periodic one-second game clock.
    ClockTick,
    /// Post-tackle down resolution.
    DownResolution,
    /// Touchdown celebration blink phase.
    TouchdownBlink,
}

#[derive(Clone, Debug)]
struct Entry {
    kind: TimerKind,
    due: Instant,
    period: Option<Duration>,
}

#[derive(Debug)]
pub struct Scheduler {
    pending: Vec<Entry>,
}

impl Scheduler {
    pub fn new() -> Self {
        Scheduler { pending: Vec::with_capacity(8) }
    }

    /// One-shot event `delay` from now.
    pub fn once(&mut self, kind: TimerKind, delay: Duration) {
        self.once_at(kind, Instant::now() + delay);
    }

    /// One-shot event at an explicit instant.
    pub fn once_at(&mut self, kind: TimerKind, due: Instant) {
        self.pending.push(Entry { kind, due, period: None });
    }

    /// Periodic event, first firing one period from now.
    pub fn every(&mut self, kind: TimerKind, period: Duration) {
        self.every_at(kind, Instant::now() + period, period);
    }

    /// Periodic event with an explicit first due instant.
    pub fn every_at(&mut self, kind: TimerKind, first_due: Instant, period: Duration) {
        self.pending.push(Entry { kind, due: first_due, period: Some(period) });
    }

    /// Drop every pending event. The single "stop all timers" operation.
    pub fn cancel_all(&mut self) {
        self.pending.clear();
    }

    pub fn is_scheduled(&self, kind: TimerKind) -> bool {
        self.pending.iter().any(|e| e.kind == kind)
    }

    /// Pop everything due at `now`, in due order. One-shots are removed,
    /// periodics are re-armed one period past their previous due time.
    pub fn fire_due(&mut self, now: Instant) -> Vec<TimerKind> {
        let mut fired: Vec<(Instant, TimerKind)> = Vec::new();

        let mut i = 0;
        while i < self.pending.len() {
            if self.pending[i].due <= now {
                fired.push((self.pending[i].due, self.pending[i].kind));
                match self.pending[i].period {
                    Some(p) => {
                        self.pending[i].due += p;
                        i += 1;
                    }
                    None => {
                        self.pending.remove(i);
                    }
                }
            } else {
                i += 1;
            }
        }

        fired.sort_by_key(|&(due, _)| due);
        fired.into_iter().map(|(_, kind)| kind).collect()
    }
}
