//! Stimulus pool primitives shared by both tasks: seedable sampling without
//! replacement, side draws and ink colours.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Production randomness. Tests pass `StdRng::seed_from_u64` instead.
pub fn entropy_rng() -> StdRng {
    StdRng::from_entropy()
}

/// Full shuffle of a copy of `pool`.
pub fn shuffled<T: Clone, R: Rng + ?Sized>(pool: &[T], rng: &mut R) -> Vec<T> {
    let mut items = pool.to_vec();
    items.shuffle(rng);
    items
}

/// `min(n, pool.len())` items, each pool entry at most once.
pub fn sample_distinct<T: Clone, R: Rng + ?Sized>(pool: &[T], n: usize, rng: &mut R) -> Vec<T> {
    let mut items = shuffled(pool, rng);
    items.truncate(n);
    items
}

/// Trial identifier derived from the supplied rng so seeded runs reproduce ids.
pub fn trial_id<R: Rng + ?Sized>(rng: &mut R) -> String {
    let bytes: [u8; 16] = rng.gen();
    uuid::Builder::from_random_bytes(bytes)
        .into_uuid()
        .to_string()
}

/// Fresh attempt identifier.
pub fn attempt_id() -> String {
    Uuid::new_v4().to_string()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Left,
    Right,
}

impl Side {
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        if rng.gen_bool(0.5) {
            Side::Left
        } else {
            Side::Right
        }
    }

    pub fn opposite(self) -> Self {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Side::Left => "Left",
            Side::Right => "Right",
        }
    }
}

/// Response inks offered to the participant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum InkColor {
    Red,
    Blue,
    Green,
    Yellow,
}

impl InkColor {
    pub const ALL: [InkColor; 4] = [
        InkColor::Red,
        InkColor::Blue,
        InkColor::Green,
        InkColor::Yellow,
    ];

    pub fn key(self) -> &'static str {
        match self {
            InkColor::Red => "RED",
            InkColor::Blue => "BLUE",
            InkColor::Green => "GREEN",
            InkColor::Yellow => "YELLOW",
        }
    }

    pub fn css(self) -> &'static str {
        match self {
            InkColor::Red => "#ff4d5a",
            InkColor::Blue => "#4aa3ff",
            InkColor::Green => "#3ddc84",
            InkColor::Yellow => "#ffd24a",
        }
    }

    /// Ink named by a colour word, if it is one of the supported inks.
    pub fn from_word(word: &str) -> Option<Self> {
        InkColor::ALL
            .into_iter()
            .find(|ink| ink.key().eq_ignore_ascii_case(word))
    }

    /// Uniform draw over the supported inks, optionally excluding one.
    pub fn random<R: Rng + ?Sized>(rng: &mut R, except: Option<InkColor>) -> Self {
        let candidates: Vec<InkColor> = InkColor::ALL
            .into_iter()
            .filter(|ink| Some(*ink) != except)
            .collect();
        candidates[rng.gen_range(0..candidates.len())]
    }
}
