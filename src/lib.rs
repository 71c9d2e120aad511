//! Konami Flap - a landing-page easter egg game
//!
//! Core modules:
//! - `konami`: Sliding-window key-sequence detector that unlocks the game
//! - `sim`: Pure per-frame simulation (gravity, obstacle recycling, collision)
//! - `animate`: Minimal animation capability interface for the host page

pub mod animate;
pub mod konami;
pub mod sim;

pub use animate::{Animator, Easing, NoopAnimator};
pub use konami::{KONAMI_CODE, SequenceMatcher, konami_matcher};

/// Game configuration constants
pub mod consts {
    /// Player vertical start position (percent of field height)
    pub const PLAYER_Y_START: f32 = 50.0;
    /// Largest allowed `player_y` (percent); keeps the player on screen
    pub const PLAYER_Y_MAX: f32 = 90.0;
    /// Vertical step applied per up/down key press (percent)
    pub const MOVE_STEP: f32 = 10.0;
    /// Constant downward drift per tick (percent)
    pub const GRAVITY_PER_TICK: f32 = 0.4;

    /// Leftward obstacle movement per tick (pixels)
    pub const SCROLL_SPEED: f32 = 3.0;
    /// Obstacles past this x are recycled to the right edge
    pub const RECYCLE_X: f32 = -50.0;
    /// Horizontal distance between a recycled obstacle and the rightmost one
    pub const RESPAWN_SPACING: f32 = 300.0;
    /// Initial obstacle offsets past the right field edge
    pub const SPAWN_OFFSETS: [f32; OBSTACLE_COUNT] = [50.0, 200.0, 350.0];
    /// Live obstacles at steady state
    pub const OBSTACLE_COUNT: usize = 3;

    /// Top-barrier height range (percent of field height)
    pub const GAP_TOP_MIN: f32 = 20.0;
    pub const GAP_TOP_MAX: f32 = 70.0;
    /// Passable gap height (percent), fixed for the session
    pub const GAP_SIZE: f32 = 30.0;

    /// Obstacle width (pixels)
    pub const OBSTACLE_WIDTH: f32 = 60.0;
    /// Player left edge (pixels from field left)
    pub const PLAYER_X: f32 = 80.0;
    /// Player bounding-box side length (pixels)
    pub const PLAYER_SIZE: f32 = 48.0;

    /// Ticks between a crash and the automatic restart (~1s at 60fps)
    pub const RECOVERY_TICKS: u32 = 60;
    /// Exit animation length before the close callback fires
    pub const EXIT_ANIM_MS: u32 = 300;
}

/// Convert a percentage of a pixel extent to pixels
#[inline]
pub fn pct_to_px(pct: f32, extent: f32) -> f32 {
    pct / 100.0 * extent
}
