//! Collision detection
//!
//! All geometry comes from the data model: the player is a fixed-size box at
//! a fixed left offset, obstacles are fixed-width barrier pairs. An obstacle
//! can only collide while its horizontal extent overlaps the player's; when
//! it does, the player survives iff its vertical extent is fully contained in
//! the passable gap.

use super::state::Obstacle;
use crate::consts::*;

/// Whether two closed 1-D spans `[a0, a1]` and `[b0, b1]` overlap.
#[inline]
pub fn spans_overlap(a0: f32, a1: f32, b0: f32, b1: f32) -> bool {
    a0 <= b1 && b0 <= a1
}

/// Check the player against one obstacle.
///
/// `player_y` is the player's top edge as a percent of `field_height`.
/// Returns `false` outright when the obstacle does not horizontally overlap
/// the player, so an off-screen barrier can never clip the player.
pub fn player_hits_obstacle(player_y: f32, obstacle: &Obstacle, field_height: f32) -> bool {
    let player_left = PLAYER_X;
    let player_right = PLAYER_X + PLAYER_SIZE;
    if !spans_overlap(player_left, player_right, obstacle.x, obstacle.x + OBSTACLE_WIDTH) {
        return false;
    }

    let player_top = crate::pct_to_px(player_y, field_height);
    let player_bottom = player_top + PLAYER_SIZE;
    let (gap_top, gap_bottom) = obstacle.gap_px(field_height);

    // Safe only when fully inside the gap
    player_top < gap_top || player_bottom > gap_bottom
}
