use core::fmt;
use core::ops::Index;
use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use crate::*;

/// Names a card face: a file under the asset root or a remote URL.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CardId(String);

impl CardId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CardId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for CardId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Shuffled card faces laid out on the board, every face exactly twice.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Deck {
    cards: Vec<CardId>,
}

impl Deck {
    /// Duplicates `faces` into pairs and shuffles them uniformly.
    pub fn shuffled<R: Rng + ?Sized>(faces: &[CardId], rng: &mut R) -> Self {
        let mut cards: Vec<CardId> = faces.iter().chain(faces).cloned().collect();
        cards.shuffle(rng);
        Self { cards }
    }

    /// Lays out `cards` in the given order, used to build known boards.
    pub fn from_cards(cards: Vec<CardId>) -> Self {
        Self { cards }
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &CardId> {
        self.cards.iter()
    }

    pub fn as_slice(&self) -> &[CardId] {
        &self.cards
    }
}

impl Index<CellIndex> for Deck {
    type Output = CardId;

    fn index(&self, index: CellIndex) -> &Self::Output {
        &self.cards[index]
    }
}
