use core::time::Duration;
use rand::SeedableRng;
use rand::rngs::SmallRng;
use web_time::Instant;

use crate::*;

/// Face-up cards still waiting to be compared, at most two.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Flipped {
    None,
    One(CellIndex),
    Pair {
        first: CellIndex,
        second: CellIndex,
        flipped_at: Instant,
    },
}

impl Flipped {
    pub const fn len(&self) -> usize {
        match self {
            Self::None => 0,
            Self::One(_) => 1,
            Self::Pair { .. } => 2,
        }
    }

    pub const fn is_empty(&self) -> bool {
        matches!(self, Self::None)
    }

    pub fn contains(&self, index: CellIndex) -> bool {
        match *self {
            Self::None => false,
            Self::One(first) => first == index,
            Self::Pair { first, second, .. } => first == index || second == index,
        }
    }

    /// When the second card went up, if there is one.
    pub const fn pending_since(&self) -> Option<Instant> {
        match *self {
            Self::Pair { flipped_at, .. } => Some(flipped_at),
            _ => None,
        }
    }
}

impl Default for Flipped {
    fn default() -> Self {
        Self::None
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum GameStatus {
    /// Zero or one unresolved card face-up.
    Idle,
    /// Two cards face-up, waiting out the flip delay.
    Resolving,
    Won,
    TimedOut,
}

impl GameStatus {
    pub const fn is_finished(self) -> bool {
        matches!(self, Self::Won | Self::TimedOut)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MatchOutcome {
    NoChange,
    Matched,
    Mismatched,
}

impl MatchOutcome {
    pub const fn has_update(self) -> bool {
        match self {
            Self::NoChange => false,
            Self::Matched | Self::Mismatched => true,
        }
    }
}

/// Countdown measured against the wall clock.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Countdown {
    started_at: Instant,
    limit: Duration,
}

impl Countdown {
    pub const fn new(started_at: Instant, limit: Duration) -> Self {
        Self { started_at, limit }
    }

    pub fn elapsed(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.started_at)
    }

    pub fn remaining(&self, now: Instant) -> Duration {
        self.limit.saturating_sub(self.elapsed(now))
    }

    /// Limit seconds minus whole elapsed seconds, so the display reads `2:00` for the whole first second.
    pub fn remaining_secs(&self, now: Instant) -> u64 {
        self.limit.as_secs().saturating_sub(self.elapsed(now).as_secs())
    }
}

/// Board, flip buffer, scores and countdown of one memory game session.
#[derive(Clone, Debug)]
pub struct MemoryGame {
    config: MemoryConfig,
    faces: Vec<CardId>,
    deck: Deck,
    face_up: Vec<bool>,
    flipped: Flipped,
    matched_pairs: usize,
    moves: u32,
    countdown: Countdown,
    rng: SmallRng,
}

impl MemoryGame {
    /// Starts a game over `faces`, which should hold one identifier per pair.
    pub fn new(config: MemoryConfig, faces: Vec<CardId>, seed: u64, now: Instant) -> Self {
        let mut rng = SmallRng::seed_from_u64(seed);
        let deck = Deck::shuffled(&faces, &mut rng);
        Self::with_deck(config, faces, deck, rng, now)
    }

    /// Starts a game over a fixed layout, `reset` still reshuffles.
    pub fn with_layout(config: MemoryConfig, deck: Deck, seed: u64, now: Instant) -> Self {
        let mut faces: Vec<CardId> = deck.iter().cloned().collect();
        faces.sort();
        faces.dedup();
        Self::with_deck(config, faces, deck, SmallRng::seed_from_u64(seed), now)
    }

    fn with_deck(
        config: MemoryConfig,
        faces: Vec<CardId>,
        deck: Deck,
        rng: SmallRng,
        now: Instant,
    ) -> Self {
        if deck.len() != config.cell_count() {
            log::warn!(
                "Deck holds {} cards for a board of {} cells",
                deck.len(),
                config.cell_count()
            );
        }
        Self {
            face_up: vec![false; deck.len()],
            config,
            faces,
            deck,
            flipped: Flipped::None,
            matched_pairs: 0,
            moves: 0,
            countdown: Countdown::new(now, config.time_limit),
            rng,
        }
    }

    pub fn config(&self) -> &MemoryConfig {
        &self.config
    }

    pub fn grid_size(&self) -> usize {
        self.config.grid_size
    }

    pub fn cell_count(&self) -> usize {
        self.deck.len()
    }

    pub fn pair_count(&self) -> usize {
        self.cell_count() / 2
    }

    pub fn deck(&self) -> &Deck {
        &self.deck
    }

    pub fn card_at(&self, index: CellIndex) -> &CardId {
        &self.deck[index]
    }

    pub fn is_face_up(&self, index: CellIndex) -> bool {
        self.face_up[index]
    }

    pub fn face_up(&self) -> &[bool] {
        &self.face_up
    }

    pub fn flipped(&self) -> Flipped {
        self.flipped
    }

    pub fn matched_pairs(&self) -> usize {
        self.matched_pairs
    }

    pub fn moves(&self) -> u32 {
        self.moves
    }

    pub fn is_resolving(&self) -> bool {
        matches!(self.flipped, Flipped::Pair { .. })
    }

    pub fn can_flip(&self, index: CellIndex) -> bool {
        !self.face_up[index] && self.flipped.len() < 2
    }

    /// Turns the card at `index` face-up. Callers must check [`Self::can_flip`] first.
    pub fn flip_card(&mut self, index: CellIndex, now: Instant) {
        assert!(
            self.can_flip(index),
            "flip_card({index}) while the card is face-up or a pair is pending"
        );

        self.face_up[index] = true;
        self.moves = self.moves.saturating_add(1);
        self.flipped = match self.flipped {
            Flipped::None => Flipped::One(index),
            Flipped::One(first) => Flipped::Pair {
                first,
                second: index,
                flipped_at: now,
            },
            Flipped::Pair { .. } => unreachable!("can_flip rejects a third card"),
        };
        log::debug!("flip card {}: {}", index, self.deck[index]);
    }

    /// Whether a pending pair has been visible for at least the flip delay.
    pub fn resolution_due(&self, now: Instant) -> bool {
        self.flipped
            .pending_since()
            .is_some_and(|since| now.saturating_duration_since(since) >= self.config.flip_delay)
    }

    /// Compares the pending pair: a match stays face-up, a mismatch turns back over.
    pub fn update_match_logic(&mut self) -> MatchOutcome {
        let Flipped::Pair { first, second, .. } = self.flipped else {
            return MatchOutcome::NoChange;
        };

        self.flipped = Flipped::None;
        if self.deck[first] == self.deck[second] {
            self.matched_pairs += 1;
            log::debug!(
                "matched {} ({}/{})",
                self.deck[first],
                self.matched_pairs,
                self.pair_count()
            );
            MatchOutcome::Matched
        } else {
            self.face_up[first] = false;
            self.face_up[second] = false;
            log::trace!("mismatch at {} and {}", first, second);
            MatchOutcome::Mismatched
        }
    }

    pub fn is_game_over(&self) -> bool {
        self.matched_pairs == self.pair_count()
    }

    pub fn time_remaining(&self, now: Instant) -> Duration {
        self.countdown.remaining(now)
    }

    pub fn seconds_remaining(&self, now: Instant) -> u64 {
        self.countdown.remaining_secs(now)
    }

    pub fn out_of_time(&self, now: Instant) -> bool {
        self.time_remaining(now).is_zero()
    }

    pub fn status(&self, now: Instant) -> GameStatus {
        if self.is_game_over() {
            GameStatus::Won
        } else if self.out_of_time(now) {
            GameStatus::TimedOut
        } else if self.is_resolving() {
            GameStatus::Resolving
        } else {
            GameStatus::Idle
        }
    }

    /// Deals a fresh shuffle of the same faces and restarts the countdown.
    pub fn reset(&mut self, now: Instant) {
        self.deck = Deck::shuffled(&self.faces, &mut self.rng);
        self.face_up = vec![false; self.deck.len()];
        self.flipped = Flipped::None;
        self.matched_pairs = 0;
        self.moves = 0;
        self.countdown = Countdown::new(now, self.config.time_limit);
        log::debug!("new game dealt");
    }
}
