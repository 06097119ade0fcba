/// Static field geometry and game-rule constants.
///
/// The field is a 44-column, 7-row grid. Columns `FIELD_START_X..FIELD_END_X`
/// are playable turf; columns below `FIELD_START_X` are the scoring endzone
/// (the attack runs toward decreasing x). Column 0 and column `GRID_W - 1`
/// are out of bounds for every entity.

/// Total grid columns, including both endzones.
pub const GRID_W: i32 = 44;
/// Visible columns (camera viewport width).
pub const VIEW_W: i32 = 14;
/// Grid rows (the whole field height is always visible).
pub const VIEW_H: i32 = 7;

/// First playable column; everything left of it is the scoring endzone.
pub const FIELD_START_X: i32 = 2;
/// Own endzone column, where each drive starts.
pub const FIELD_END_X: i32 = GRID_W - 2;

pub const START_ATTEMPTS: i32 = 4;
pub const FIRST_DOWN_DISTANCE: i32 = 10;
/// Game clock, in seconds.
pub const GAME_DURATION: u32 = 60;

/// Can an entity stand on (x, y)? Columns 0 and GRID_W-1 are out of bounds.
#[inline]
pub fn walkable(x: i32, y: i32) -> bool {
    x > 0 && x < GRID_W - 1 && y >= 0 && y < VIEW_H
}

/// Is this column inside the scoring endzone?
#[inline]
pub fn in_endzone(x: i32) -> bool {
    x < FIELD_START_X
}
