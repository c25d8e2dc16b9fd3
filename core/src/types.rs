use serde::{Deserialize, Serialize};

/// Linear board position, `row * grid_size + col`.
pub type CellIndex = usize;

/// Single screen axis in pixels. Signed, pointer positions may fall left of or above the surface.
pub type Px = i32;

/// Screen position `(x, y)` in pixels.
pub type Px2 = (Px, Px);

/// Splits a linear index into `(row, col)`.
pub const fn row_col(index: CellIndex, grid_size: usize) -> (usize, usize) {
    (index / grid_size, index % grid_size)
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rect {
    pub x: Px,
    pub y: Px,
    pub width: Px,
    pub height: Px,
}

impl Rect {
    pub const fn new(x: Px, y: Px, width: Px, height: Px) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Whether `(x, y)` is strictly inside, the border itself does not count.
    pub const fn contains_strict(&self, (x, y): Px2) -> bool {
        self.x < x && x < self.x + self.width && self.y < y && y < self.y + self.height
    }

    pub const fn center(&self) -> Px2 {
        (self.x + self.width / 2, self.y + self.height / 2)
    }

    pub const fn inset(&self, by: Px) -> Self {
        Self::new(
            self.x + by,
            self.y + by,
            self.width - 2 * by,
            self.height - 2 * by,
        )
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color(pub u8, pub u8, pub u8);

impl Color {
    pub const WHITE: Self = Self(255, 255, 255);
    pub const BLACK: Self = Self(0, 0, 0);
    pub const GOLD: Self = Self(255, 215, 0);

    /// CSS `rgb()` notation.
    pub fn css(self) -> String {
        format!("rgb({}, {}, {})", self.0, self.1, self.2)
    }
}
