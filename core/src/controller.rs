use web_time::Instant;

use crate::*;

pub const WIN_MESSAGE: &str = "Congratulations!";
pub const TIMEOUT_MESSAGE: &str = "Time's up!";

/// Input collected by the platform between two ticks.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum InputEvent {
    Close,
    PointerPress { x: Px, y: Px },
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Phase {
    Playing,
    /// A win or timeout message is up, the next game starts at `until`.
    Announcing { until: Instant },
    Stopped,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TickOutcome {
    Running,
    Announcing,
    Stopped,
}

/// Owns one session's game and view and steps them once per tick.
#[derive(Debug)]
pub struct MemoryController<S> {
    game: MemoryGame,
    view: MemoryView<S>,
    phase: Phase,
}

impl<S: AssetStore> MemoryController<S> {
    pub fn new(game: MemoryGame, view: MemoryView<S>) -> Self {
        Self {
            game,
            view,
            phase: Phase::Playing,
        }
    }

    /// Builds a session from the manifest, loading the card back before any game exists.
    pub fn start(
        config: MemoryConfig,
        manifest: &CardManifest,
        loader: AssetLoader<S>,
        seed: u64,
        now: Instant,
    ) -> Result<Self> {
        let faces = manifest.card_faces(config.pair_count())?;
        Self::with_faces(config, faces, loader, seed, now)
    }

    /// Builds a session from faces already taken from the manifest with [`CardManifest::card_faces`].
    pub fn with_faces(
        config: MemoryConfig,
        faces: Vec<CardId>,
        loader: AssetLoader<S>,
        seed: u64,
        now: Instant,
    ) -> Result<Self> {
        let view = MemoryView::new(&config, loader)?;
        let game = MemoryGame::new(config, faces, seed, now);
        log::debug!("session started with seed {}", seed);
        Ok(Self::new(game, view))
    }

    pub fn game(&self) -> &MemoryGame {
        &self.game
    }

    pub fn view(&self) -> &MemoryView<S> {
        &self.view
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_stopped(&self) -> bool {
        matches!(self.phase, Phase::Stopped)
    }

    /// Handles input, advances the game and redraws the frame.
    pub fn tick<T: Surface + ?Sized>(
        &mut self,
        events: impl IntoIterator<Item = InputEvent>,
        now: Instant,
        surface: &mut T,
    ) -> Result<TickOutcome> {
        match self.phase {
            Phase::Stopped => return Ok(TickOutcome::Stopped),
            Phase::Announcing { until } => {
                if events.into_iter().any(|event| event == InputEvent::Close) {
                    return Ok(self.stop());
                }
                if now < until {
                    return Ok(TickOutcome::Announcing);
                }
                self.game.reset(now);
                self.phase = Phase::Playing;
                self.view.render(&self.game, now, surface)?;
                return Ok(TickOutcome::Running);
            }
            Phase::Playing => {}
        }

        if self.handle_events(events, now) {
            return Ok(self.stop());
        }

        if self.game.resolution_due(now) {
            self.game.update_match_logic();
        }

        let message = if self.game.is_game_over() {
            log::info!("won in {} moves", self.game.moves());
            Some(WIN_MESSAGE)
        } else if self.game.out_of_time(now) {
            log::info!(
                "out of time with {}/{} pairs",
                self.game.matched_pairs(),
                self.game.pair_count()
            );
            Some(TIMEOUT_MESSAGE)
        } else {
            None
        };

        self.view.render(&self.game, now, surface)?;

        if let Some(message) = message {
            self.view.show_message(message, surface);
            let until = now + self.game.config().message_pause;
            self.phase = Phase::Announcing { until };
            return Ok(TickOutcome::Announcing);
        }

        Ok(TickOutcome::Running)
    }

    /// Returns whether a close was requested.
    fn handle_events(&mut self, events: impl IntoIterator<Item = InputEvent>, now: Instant) -> bool {
        for event in events {
            log::trace!("input: {:?}", event);
            match event {
                InputEvent::Close => return true,
                InputEvent::PointerPress { .. } if self.game.is_resolving() => {}
                InputEvent::PointerPress { x, y } => match self.view.layout().hit_test((x, y)) {
                    Some(Hit::Restart) => {
                        log::debug!("restart requested");
                        self.game.reset(now);
                        return false;
                    }
                    Some(Hit::Cell(index)) if self.game.can_flip(index) => {
                        self.game.flip_card(index, now);
                    }
                    Some(Hit::Cell(_)) | None => {}
                },
            }
        }
        false
    }

    fn stop(&mut self) -> TickOutcome {
        log::debug!("session closed");
        self.phase = Phase::Stopped;
        TickOutcome::Stopped
    }
}
