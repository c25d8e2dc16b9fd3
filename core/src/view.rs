use hashbrown::HashMap;
use web_time::Instant;

use crate::*;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TextAnchor {
    TopLeft,
    Center,
}

/// Drawing primitives of the platform the game runs on.
pub trait Surface {
    fn clear(&mut self, color: Color);
    fn fill_rect(&mut self, rect: Rect, color: Color);
    fn stroke_rect(&mut self, rect: Rect, color: Color, width: Px);
    fn draw_text(&mut self, text: &str, pos: Px2, anchor: TextAnchor, color: Color);
    fn blit(&mut self, sprite: &Sprite, pos: Px2);
    /// Shows everything drawn since the last call.
    fn present(&mut self);
}

/// `M:SS`, as shown by the countdown.
pub fn format_clock(secs: u64) -> String {
    format!("{}:{:02}", secs / 60, secs % 60)
}

/// Redraws the whole board from the game state every frame.
///
/// Card faces are decoded on first use and kept for the rest of the session. The cache is never evicted, a session
/// only ever shows the faces of its manifest.
#[derive(Debug)]
pub struct MemoryView<S> {
    layout: BoardLayout,
    card_size: u32,
    loader: AssetLoader<S>,
    card_back: Sprite,
    faces: HashMap<CardId, Sprite>,
}

impl<S: AssetStore> MemoryView<S> {
    const CELL_BORDER: Px = 3;
    const BUTTON_BORDER: Px = 2;
    const RESTART_LABEL: &'static str = "Restart";

    /// Loads the card back up front, a game cannot be shown without it.
    pub fn new(config: &MemoryConfig, loader: AssetLoader<S>) -> Result<Self> {
        let card_size = config.card_size();
        let card_back = Sprite::from_image(&loader.load_card_back()?, card_size);
        Ok(Self {
            layout: BoardLayout::new(config),
            card_size,
            loader,
            card_back,
            faces: HashMap::new(),
        })
    }

    pub fn layout(&self) -> &BoardLayout {
        &self.layout
    }

    pub fn cached_faces(&self) -> usize {
        self.faces.len()
    }

    fn face_sprite<'a>(
        faces: &'a mut HashMap<CardId, Sprite>,
        loader: &AssetLoader<S>,
        card_size: u32,
        id: &CardId,
    ) -> Result<&'a Sprite> {
        if !faces.contains_key(id) {
            let image = loader.load_image(id)?;
            log::debug!("decoded card face {}", id);
            faces.insert(id.clone(), Sprite::from_image(&image, card_size));
        }
        Ok(&faces[id])
    }

    pub fn render<T: Surface + ?Sized>(
        &mut self,
        game: &MemoryGame,
        now: Instant,
        surface: &mut T,
    ) -> Result<()> {
        surface.clear(Color::WHITE);

        for index in 0..game.cell_count() {
            let rect = self.layout.cell_rect(index);
            surface.fill_rect(rect, Color::WHITE);
            surface.stroke_rect(rect, Color::GOLD, Self::CELL_BORDER);

            let sprite = if game.is_face_up(index) {
                Self::face_sprite(
                    &mut self.faces,
                    &self.loader,
                    self.card_size,
                    game.card_at(index),
                )?
            } else {
                &self.card_back
            };
            surface.blit(sprite, self.layout.card_origin(index));
        }

        surface.draw_text(
            &format!("Moves: {}", game.moves()),
            self.layout.moves_origin(),
            TextAnchor::TopLeft,
            Color::BLACK,
        );
        self.draw_restart_button(surface);
        surface.draw_text(
            &format!("Time: {}", format_clock(game.seconds_remaining(now))),
            self.layout.timer_origin(),
            TextAnchor::TopLeft,
            Color::BLACK,
        );

        surface.present();
        Ok(())
    }

    fn draw_restart_button<T: Surface + ?Sized>(&self, surface: &mut T) {
        let rect = self.layout.restart_rect();
        surface.fill_rect(rect, Color::WHITE);
        surface.stroke_rect(rect, Color::GOLD, Self::BUTTON_BORDER);
        surface.draw_text(
            Self::RESTART_LABEL,
            rect.center(),
            TextAnchor::Center,
            Color::BLACK,
        );
    }

    /// Draws `message` centred over whatever is on the surface.
    pub fn show_message<T: Surface + ?Sized>(&self, message: &str, surface: &mut T) {
        surface.draw_text(message, self.layout.center(), TextAnchor::Center, Color::BLACK);
        surface.present();
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::assets::tests::{MemoryStore, png};

    #[derive(Clone, Debug, PartialEq)]
    pub(crate) enum Op {
        Clear(Color),
        Fill(Rect, Color),
        Stroke(Rect, Color, Px),
        Text(String, Px2, TextAnchor),
        Blit(u32, Px2),
        Present,
    }

    /// Surface that records draw calls instead of drawing.
    #[derive(Default, Debug)]
    pub(crate) struct RecordingSurface {
        pub ops: Vec<Op>,
    }

    impl RecordingSurface {
        pub(crate) fn texts(&self) -> Vec<&str> {
            self.ops
                .iter()
                .filter_map(|op| match op {
                    Op::Text(text, _, _) => Some(text.as_str()),
                    _ => None,
                })
                .collect()
        }

        pub(crate) fn blits(&self) -> usize {
            self.ops
                .iter()
                .filter(|op| matches!(op, Op::Blit(..)))
                .count()
        }
    }

    impl Surface for RecordingSurface {
        fn clear(&mut self, color: Color) {
            self.ops.push(Op::Clear(color));
        }

        fn fill_rect(&mut self, rect: Rect, color: Color) {
            self.ops.push(Op::Fill(rect, color));
        }

        fn stroke_rect(&mut self, rect: Rect, color: Color, width: Px) {
            self.ops.push(Op::Stroke(rect, color, width));
        }

        fn draw_text(&mut self, text: &str, pos: Px2, anchor: TextAnchor, _color: Color) {
            self.ops.push(Op::Text(text.to_string(), pos, anchor));
        }

        fn blit(&mut self, sprite: &Sprite, pos: Px2) {
            self.ops.push(Op::Blit(sprite.width(), pos));
        }

        fn present(&mut self) {
            self.ops.push(Op::Present);
        }
    }

    pub(crate) fn card_store() -> MemoryStore {
        ["A", "B", "C", "D", "E", "F", "G", "H"]
            .into_iter()
            .fold(
                MemoryStore::default().with_local(CARD_BACK_FILE, png([0, 0, 0, 255])),
                |store, name| store.with_local(name, png([200, 10, 10, 255])),
            )
    }

    fn scenario_game(now: Instant) -> MemoryGame {
        let order = [
            "A", "B", "C", "D", "B", "A", "C", "D", "E", "F", "G", "H", "E", "F", "G", "H",
        ];
        let deck = Deck::from_cards(order.into_iter().map(CardId::from).collect());
        MemoryGame::with_layout(MemoryConfig::default(), deck, 1, now)
    }

    #[test]
    fn format_clock_pads_seconds() {
        assert_eq!(format_clock(120), "2:00");
        assert_eq!(format_clock(65), "1:05");
        assert_eq!(format_clock(9), "0:09");
        assert_eq!(format_clock(0), "0:00");
    }

    #[test]
    fn render_draws_every_cell_and_hud() {
        let now = Instant::now();
        let game = scenario_game(now);
        let store = card_store();
        let mut view = MemoryView::new(&MemoryConfig::default(), AssetLoader::new(&store)).unwrap();
        let mut surface = RecordingSurface::default();

        view.render(&game, now, &mut surface).unwrap();

        assert_eq!(surface.ops.first(), Some(&Op::Clear(Color::WHITE)));
        assert_eq!(surface.ops.last(), Some(&Op::Present));
        assert_eq!(surface.blits(), 16);
        assert!(surface.ops.contains(&Op::Blit(90, (5, 55))));
        assert!(surface.ops.contains(&Op::Stroke(Rect::new(300, 350, 100, 100), Color::GOLD, 3)));
        assert_eq!(surface.texts(), vec!["Moves: 0", "Restart", "Time: 2:00"]);
        assert!(surface.ops.contains(&Op::Text(
            "Restart".to_string(),
            (340, 25),
            TextAnchor::Center
        )));
        assert_eq!(view.cached_faces(), 0);
    }

    #[test]
    fn face_images_are_loaded_once() {
        let now = Instant::now();
        let mut game = scenario_game(now);
        let store = card_store();
        let mut view = MemoryView::new(&MemoryConfig::default(), AssetLoader::new(&store)).unwrap();
        game.flip_card(0, now);
        game.flip_card(5, now);

        let mut surface = RecordingSurface::default();
        view.render(&game, now, &mut surface).unwrap();
        view.render(&game, now, &mut surface).unwrap();

        assert_eq!(view.cached_faces(), 1);
        let face_lookups = store
            .requests
            .borrow()
            .iter()
            .filter(|request| request.as_str() == "local:A")
            .count();
        assert_eq!(face_lookups, 1);
    }

    #[test]
    fn broken_face_surfaces_as_error() {
        let now = Instant::now();
        let mut game = scenario_game(now);
        let store = MemoryStore::default().with_local(CARD_BACK_FILE, png([0, 0, 0, 255]));
        let mut view = MemoryView::new(&MemoryConfig::default(), AssetLoader::new(&store)).unwrap();
        game.flip_card(0, now);

        let err = view
            .render(&game, now, &mut RecordingSurface::default())
            .unwrap_err();

        assert!(matches!(err, MemoryError::FetchFailed { ref url, .. } if url == "A"));
    }

    #[test]
    fn missing_card_back_fails_construction() {
        let err = MemoryView::new(&MemoryConfig::default(), AssetLoader::new(MemoryStore::default()))
            .unwrap_err();

        assert!(matches!(err, MemoryError::FetchFailed { ref url, .. } if url == CARD_BACK_URL));
    }

    #[test]
    fn show_message_is_centred() {
        let store = card_store();
        let view = MemoryView::new(&MemoryConfig::default(), AssetLoader::new(&store)).unwrap();
        let mut surface = RecordingSurface::default();

        view.show_message("Time's up!", &mut surface);

        assert_eq!(
            surface.ops,
            vec![
                Op::Text("Time's up!".to_string(), (200, 225), TextAnchor::Center),
                Op::Present
            ]
        );
    }
}
