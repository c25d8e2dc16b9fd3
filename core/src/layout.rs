use crate::*;

/// Gap between a cell's border and the card image drawn inside it.
pub const CARD_INSET: Px = 5;

/// What a pointer press landed on.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Hit {
    Restart,
    Cell(CellIndex),
}

/// Screen geometry: HUD strip on top, square grid of cells below it.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct BoardLayout {
    grid_size: usize,
    cell_size: Px,
    top_margin: Px,
}

impl BoardLayout {
    pub const fn new(config: &MemoryConfig) -> Self {
        Self {
            grid_size: config.grid_size,
            cell_size: config.cell_size,
            top_margin: config.top_margin,
        }
    }

    pub const fn width(&self) -> Px {
        self.grid_size as Px * self.cell_size
    }

    pub const fn height(&self) -> Px {
        self.top_margin + self.grid_size as Px * self.cell_size
    }

    pub const fn restart_rect(&self) -> Rect {
        Rect::new(self.width() - 110, 10, 100, 30)
    }

    pub const fn moves_origin(&self) -> Px2 {
        (10, 10)
    }

    pub const fn timer_origin(&self) -> Px2 {
        (10, 30)
    }

    pub const fn center(&self) -> Px2 {
        (self.width() / 2, self.height() / 2)
    }

    pub const fn cell_rect(&self, index: CellIndex) -> Rect {
        let (row, col) = row_col(index, self.grid_size);
        Rect::new(
            col as Px * self.cell_size,
            self.top_margin + row as Px * self.cell_size,
            self.cell_size,
            self.cell_size,
        )
    }

    /// Top-left corner of the card image inside the cell.
    pub const fn card_origin(&self, index: CellIndex) -> Px2 {
        let rect = self.cell_rect(index).inset(CARD_INSET);
        (rect.x, rect.y)
    }

    pub fn hit_test(&self, pos: Px2) -> Option<Hit> {
        if self.restart_rect().contains_strict(pos) {
            return Some(Hit::Restart);
        }

        let (x, y) = pos;
        let row = (y - self.top_margin).div_euclid(self.cell_size);
        let col = x.div_euclid(self.cell_size);
        let grid = self.grid_size as Px;
        if (0..grid).contains(&row) && (0..grid).contains(&col) {
            Some(Hit::Cell((row * grid + col) as CellIndex))
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layout() -> BoardLayout {
        BoardLayout::new(&MemoryConfig::default())
    }

    #[test]
    fn default_surface_is_400_by_450() {
        let layout = layout();

        assert_eq!((layout.width(), layout.height()), (400, 450));
        assert_eq!(layout.restart_rect(), Rect::new(290, 10, 100, 30));
    }

    #[test]
    fn press_inside_restart_control_restarts() {
        assert_eq!(layout().hit_test((340, 25)), Some(Hit::Restart));
    }

    #[test]
    fn press_off_surface_past_restart_control_is_ignored() {
        assert_eq!(layout().hit_test((405, 5)), None);
    }

    #[test]
    fn press_maps_to_row_and_column() {
        let layout = layout();

        assert_eq!(layout.hit_test((5, 55)), Some(Hit::Cell(0)));
        assert_eq!(layout.hit_test((150, 160)), Some(Hit::Cell(5)));
        assert_eq!(layout.hit_test((399, 449)), Some(Hit::Cell(15)));
    }

    #[test]
    fn press_on_margin_or_outside_grid_is_ignored() {
        let layout = layout();

        assert_eq!(layout.hit_test((50, 20)), None);
        assert_eq!(layout.hit_test((50, 450)), None);
        assert_eq!(layout.hit_test((-1, 100)), None);
    }

    #[test]
    fn column_past_the_grid_does_not_wrap_into_next_row() {
        assert_eq!(layout().hit_test((420, 60)), None);
    }

    #[test]
    fn card_sits_inside_cell_border() {
        let layout = layout();

        assert_eq!(layout.cell_rect(6), Rect::new(200, 150, 100, 100));
        assert_eq!(layout.card_origin(6), (205, 155));
    }
}
