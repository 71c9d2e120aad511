//! Per-frame game simulation
//!
//! All gameplay logic lives here. This module must be pure:
//! - One tick per host animation frame
//! - Seeded RNG only
//! - Geometry tracked in the data model, never read back from the page
//! - No rendering or platform dependencies

pub mod collision;
pub mod state;
pub mod tick;

pub use collision::{player_hits_obstacle, spans_overlap};
pub use state::{Field, GamePhase, GameState, Obstacle};
pub use tick::{TickEvent, TickInput, tick};
