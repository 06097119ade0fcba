/// Entities: Player, Defender, Referee.
///
/// All three live on integer grid cells. Knocked-down defenders stay on the
/// field as scenery for the rest of the down: they never move again and never
/// count as occupying their cell for collision purposes.

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Facing {
    Left,
    Right,
}

/// Player sprite state. Sideways moves toggle RunSide <-> Stand; vertical
/// moves pick RunUp/RunDown and alternate the stepping foot.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum PlayerState {
    Stand,
    RunSide,
    RunUp,
    RunDown,
}

/// A discrete movement intent; exactly one axis at a time.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum MoveDir {
    Left,
    Right,
    Up,
    Down,
}

impl MoveDir {
    pub fn delta(self) -> (i32, i32) {
        match self {
            MoveDir::Left => (-1, 0),
            MoveDir::Right => (1, 0),
            MoveDir::Up => (0, -1),
            MoveDir::Down => (0, 1),
        }
    }
}

#[derive(Clone, Debug)]
pub struct Player {
    pub x: i32,
    pub y: i32,
    pub facing: Facing,
    pub state: PlayerState,
    pub step_left_foot: bool,
}

impl Player {
    pub fn new(x: i32, y: i32) -> Self {
        Player {
            x,
            y,
            facing: Facing::Left,
            state: PlayerState::RunSide,
            step_left_foot: false,
        }
    }
}

#[derive(Clone, Debug)]
pub struct Defender {
    pub x: i32,
    pub y: i32,
    pub facing: Facing,
    /// Terminal for the rest of the down: immovable, non-blocking scenery.
    pub knocked_down: bool,
}

impl Defender {
    pub fn new(x: i32, y: i32) -> Self {
        Defender { x, y, facing: Facing::Right, knocked_down: false }
    }
}

#[derive(Clone, Debug)]
pub struct Referee {
    pub x: i32,
    pub y: i32,
    pub facing: Facing,
}

impl Referee {
    pub fn new(x: i32, y: i32) -> Self {
        Referee { x, y, facing: Facing::Right }
    }
}

/// Does anything block (x, y)?
///
/// Occupancy = the player (if given), standing defenders, and referees.
/// Knocked-down defenders are excluded: they render but do not collide.
pub fn cell_occupied(
    player: Option<(i32, i32)>,
    defenders: &[Defender],
    referees: &[Referee],
    x: i32,
    y: i32,
) -> bool {
    if player == Some((x, y)) {
        return true;
    }
    if defenders.iter().any(|d| !d.knocked_down && d.x == x && d.y == y) {
        return true;
    }
    referees.iter().any(|r| r.x == x && r.y == y)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standing_defender_occupies() {
        let defs = vec![Defender::new(5, 3)];
        assert!(cell_occupied(None, &defs, &[], 5, 3));
        assert!(!cell_occupied(None, &defs, &[], 5, 4));
    }

    #[test]
    fn knocked_down_defender_does_not_occupy() {
        let mut d = Defender::new(5, 3);
        d.knocked_down = true;
        assert!(!cell_occupied(None, &[d], &[], 5, 3));
    }

    #[test]
    fn referee_and_player_occupy() {
        let refs = vec![Referee::new(7, 1)];
        assert!(cell_occupied(None, &[], &refs, 7, 1));
        assert!(cell_occupied(Some((2, 2)), &[], &refs, 2, 2));
        assert!(!cell_occupied(Some((2, 2)), &[], &refs, 2, 3));
    }
}
