//! The 52-card universe: suits, ranks, cards, and the shuffled deck.
//!
//! Grounded on the teacher's `game/entities.rs` `Card`/`Suit` shape (a
//! `(Rank, Suit)` pair with ordered `Rank` for straight/tiebreaker math),
//! minus the teacher's `Suit::Wild` placeholder — that variant exists there
//! only to give a fixed-size array a `Default`; this deck is always built
//! from the canonical 52-card enumeration so no placeholder card is needed.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::rng::SecureRng;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Suit {
    Clubs,
    Diamonds,
    Hearts,
    Spades,
}

impl Suit {
    pub const ALL: [Suit; 4] = [Suit::Clubs, Suit::Diamonds, Suit::Hearts, Suit::Spades];
}

impl fmt::Display for Suit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Suit::Clubs => "c",
            Suit::Diamonds => "d",
            Suit::Hearts => "h",
            Suit::Spades => "s",
        };
        write!(f, "{s}")
    }
}

/// Ascending so that `Rank` comparisons double as card-rank comparisons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Rank {
    Two,
    Three,
    Four,
    Five,
    Six,
    Seven,
    Eight,
    Nine,
    Ten,
    Jack,
    Queen,
    King,
    Ace,
}

impl Rank {
    pub const ALL: [Rank; 13] = [
        Rank::Two,
        Rank::Three,
        Rank::Four,
        Rank::Five,
        Rank::Six,
        Rank::Seven,
        Rank::Eight,
        Rank::Nine,
        Rank::Ten,
        Rank::Jack,
        Rank::Queen,
        Rank::King,
        Rank::Ace,
    ];

    /// 2..14, Ace high. Used as the tiebreaker unit throughout the evaluator.
    pub fn value(self) -> u8 {
        self as u8 + 2
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Rank::Two => "2",
            Rank::Three => "3",
            Rank::Four => "4",
            Rank::Five => "5",
            Rank::Six => "6",
            Rank::Seven => "7",
            Rank::Eight => "8",
            Rank::Nine => "9",
            Rank::Ten => "T",
            Rank::Jack => "J",
            Rank::Queen => "Q",
            Rank::King => "K",
            Rank::Ace => "A",
        };
        write!(f, "{s}")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Card {
    pub rank: Rank,
    pub suit: Suit,
}

impl Card {
    pub fn new(rank: Rank, suit: Suit) -> Self {
        Self { rank, suit }
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.rank, self.suit)
    }
}

/// A shuffled, drawable stack of the 52 canonical cards.
///
/// Cards are drawn from the end of the backing `Vec` (treated as the top of
/// the stack), matching spec 3's "drawn from one end" wording.
#[derive(Debug, Clone)]
pub struct Deck {
    cards: Vec<Card>,
}

impl Deck {
    /// The canonical, unshuffled 52-card enumeration.
    pub fn ordered() -> Self {
        let mut cards = Vec::with_capacity(52);
        for suit in Suit::ALL {
            for rank in Rank::ALL {
                cards.push(Card::new(rank, suit));
            }
        }
        Self { cards }
    }

    /// A freshly shuffled deck, built and shuffled in one step.
    pub fn shuffled(rng: &mut impl SecureRng) -> Self {
        let mut deck = Self::ordered();
        deck.shuffle(rng);
        deck
    }

    /// Fisher-Yates per spec 4.1: for `i` from 51 down to 1, draw `j` in
    /// `[0, i]` and swap. `SecureRng::below` is unbiased by construction.
    pub fn shuffle(&mut self, rng: &mut impl SecureRng) {
        for i in (1..self.cards.len()).rev() {
            let j = rng.below(i as u32 + 1) as usize;
            self.cards.swap(i, j);
        }
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Remove and return the top card, if any remain.
    pub fn draw(&mut self) -> Option<Card> {
        self.cards.pop()
    }

    /// Draw and discard one card (the burn before flop/turn/river).
    pub fn burn(&mut self) -> Option<Card> {
        self.draw()
    }
}
