//! Game state and core simulation types

use rand::Rng;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use crate::consts::*;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    /// Mounted but not yet started
    Idle,
    /// Active gameplay
    Running,
    /// Collision happened; waiting out the recovery delay before restart
    Crashed,
    /// Player closed the game; terminal for this instance
    Closed,
}

/// Play-field pixel dimensions, captured at run start
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Field {
    pub width: f32,
    pub height: f32,
}

/// A paired top/bottom barrier with a vertical passable gap
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Obstacle {
    /// Unique within the live set; allocated from a monotonic counter
    pub id: u32,
    /// Left edge in pixels; decreases each tick
    pub x: f32,
    /// Top barrier height (percent of field height), in [20, 70]
    pub gap_top: f32,
}

impl Obstacle {
    /// Bottom barrier height (percent of field height)
    pub fn bottom_height(&self) -> f32 {
        100.0 - self.gap_top - GAP_SIZE
    }

    /// Passable gap as a pixel interval `(top, bottom)` from the field top
    pub fn gap_px(&self, field_height: f32) -> (f32, f32) {
        let top = crate::pct_to_px(self.gap_top, field_height);
        let bottom = crate::pct_to_px(self.gap_top + GAP_SIZE, field_height);
        (top, bottom)
    }
}

/// Complete game state for one mounted session
#[derive(Debug, Clone)]
pub struct GameState {
    /// Current phase
    pub phase: GamePhase,
    /// Player top edge (percent of field height), clamped to [0, 90]
    pub player_y: f32,
    /// Live obstacles, left-to-right
    pub obstacles: Vec<Obstacle>,
    /// Obstacles passed this run
    pub score: u32,
    /// Play-field dimensions from the last `start_run`
    pub field: Field,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Ticks until the automatic restart while `Crashed`
    pub recovery_ticks: u32,
    rng: Pcg32,
    next_id: u32,
}

impl GameState {
    /// Create an idle game state with the given RNG seed.
    pub fn new(seed: u64) -> Self {
        Self {
            phase: GamePhase::Idle,
            player_y: PLAYER_Y_START,
            obstacles: Vec::with_capacity(OBSTACLE_COUNT),
            score: 0,
            field: Field {
                width: 0.0,
                height: 0.0,
            },
            time_ticks: 0,
            recovery_ticks: 0,
            rng: Pcg32::seed_from_u64(seed),
            next_id: 1,
        }
    }

    /// Whether the update loop should keep ticking gameplay.
    pub fn active(&self) -> bool {
        self.phase == GamePhase::Running
    }

    /// Start a fresh run: reset score, center the player, seed the three
    /// staggered obstacles past the right field edge.
    ///
    /// Also serves as the restart path after a crash.
    pub fn start_run(&mut self, field: Field) {
        self.field = field;
        self.score = 0;
        self.player_y = PLAYER_Y_START;
        self.recovery_ticks = 0;
        self.obstacles.clear();
        for offset in SPAWN_OFFSETS {
            let obstacle = self.spawn_obstacle(field.width + offset);
            self.obstacles.push(obstacle);
        }
        self.phase = GamePhase::Running;
        log::debug!("run started ({}x{})", field.width, field.height);
    }

    /// Build an obstacle at `x` with a fresh random gap position.
    pub fn spawn_obstacle(&mut self, x: f32) -> Obstacle {
        Obstacle {
            id: self.next_entity_id(),
            x,
            gap_top: self.rng.random_range(GAP_TOP_MIN..=GAP_TOP_MAX),
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Rightmost live obstacle x, or the field's right edge when empty.
    pub fn rightmost_x(&self) -> f32 {
        self.obstacles
            .iter()
            .map(|o| o.x)
            .reduce(f32::max)
            .unwrap_or(self.field.width)
    }
}
