/// Events emitted during simulation updates.
/// The presentation layer consumes these for sound.

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum GameEvent {
    /// Crowd cheer at the start of a drive (and on touchdowns).
    Cheer,
    /// The mascot barks mid-cheer.
    SealCall,
    /// Snap whistle: the play is live.
    Whistle,
    /// Player completed a move.
    Step,
    /// A defender got flattened by a juke.
    Juke,
    /// The player went down.
    Tackled,
    Touchdown,
    /// Clock hit zero.
    TimeExpired,
    /// Attempts exhausted.
    Turnover,
}
