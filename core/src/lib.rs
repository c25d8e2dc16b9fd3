use core::time::Duration;
use serde::{Deserialize, Serialize};

pub use assets::*;
pub use controller::*;
pub use deck::*;
pub use engine::*;
pub use error::*;
pub use layout::*;
pub use manifest::*;
pub use types::*;
pub use view::*;

mod assets;
mod controller;
mod deck;
mod engine;
mod error;
mod layout;
mod manifest;
mod types;
mod view;

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MemoryConfig {
    /// Cards per side, the board holds `grid_size * grid_size` cards.
    pub grid_size: usize,
    pub time_limit: Duration,
    /// How long a flipped pair stays visible before it is resolved.
    pub flip_delay: Duration,
    pub cell_size: Px,
    pub top_margin: Px,
    pub tick_rate: u32,
    /// How long a win or timeout message stays up before the next game.
    pub message_pause: Duration,
}

impl MemoryConfig {
    pub const DEFAULT: Self = Self {
        grid_size: 4,
        time_limit: Duration::from_secs(120),
        flip_delay: Duration::from_secs(1),
        cell_size: 100,
        top_margin: 50,
        tick_rate: 60,
        message_pause: Duration::from_secs(2),
    };

    pub const fn cell_count(&self) -> usize {
        self.grid_size * self.grid_size
    }

    pub const fn pair_count(&self) -> usize {
        self.cell_count() / 2
    }

    /// Side of the square card image drawn inside each cell.
    pub const fn card_size(&self) -> u32 {
        (self.cell_size - 2 * CARD_INSET) as u32
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_secs(1) / self.tick_rate.max(1)
    }
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}
