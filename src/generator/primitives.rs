//! Primitive randomness sources
//!
//! Every random decision made by the generator is drawn from one
//! [`RandomSource`], so a seed fully determines the output.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, RngCore, SeedableRng};

use crate::config::{DEFAULT_MAX_IDENTIFIER_LENGTH, DEFAULT_MAX_INT};

/// Characters identifiers are built from
pub const ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Words the output language reserves; never used as variable names
pub const RESERVED_WORDS: &[&str] = &[
    "as", "do", "if", "in", "is", "of", "for", "int", "let", "new", "try", "var", "byte", "case",
    "char", "else", "enum", "eval", "goto", "long", "null", "this", "true", "void", "with",
    "await", "break", "catch", "class", "const", "false", "final", "float", "short", "super",
    "throw", "while", "yield", "delete", "double", "export", "import", "native", "public",
    "return", "static", "switch", "throws", "typeof", "boolean", "default", "extends",
    "finally", "package", "private", "continue", "debugger", "function", "abstract",
    "volatile", "arguments", "interface", "protected", "transient", "implements",
    "instanceof", "synchronized", "undefined", "NaN", "Infinity",
];

/// Whether `word` is reserved in the output language
#[must_use]
pub fn is_reserved(word: &str) -> bool {
    RESERVED_WORDS.contains(&word)
}

/// Seeded random number source
#[derive(Debug, Clone)]
pub struct RandomSource {
    rng: StdRng,
}

impl RandomSource {
    /// Create a source that replays the same sequence for the same seed
    #[must_use]
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Integer drawn uniformly from `[0, bound)`
    ///
    /// `None` uses [`DEFAULT_MAX_INT`]. A zero bound is treated as 1.
    pub fn int(&mut self, bound: Option<u64>) -> u64 {
        let bound = bound.unwrap_or(DEFAULT_MAX_INT).max(1);
        self.rng.gen_range(0..bound)
    }

    /// Fair coin
    pub fn boolean(&mut self) -> bool {
        self.rng.gen_bool(0.5)
    }

    /// Letters-only string whose length is uniform in `[1, max_length]`
    ///
    /// `None` uses [`DEFAULT_MAX_IDENTIFIER_LENGTH`].
    pub fn identifier(&mut self, max_length: Option<usize>) -> String {
        let max_length = max_length.unwrap_or(DEFAULT_MAX_IDENTIFIER_LENGTH).max(1);
        let length = self.rng.gen_range(1..=max_length);
        (0..length)
            .filter_map(|_| self.choose(ALPHABET).map(|&byte| char::from(byte)))
            .collect()
    }

    /// One element of `items`, or `None` if it is empty
    pub fn choose<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        items.choose(&mut self.rng)
    }
}

impl RngCore for RandomSource {
    fn next_u32(&mut self) -> u32 {
        self.rng.next_u32()
    }

    fn next_u64(&mut self) -> u64 {
        self.rng.next_u64()
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        self.rng.fill_bytes(dest);
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.rng.try_fill_bytes(dest)
    }
}
