//! Key-sequence detection
//!
//! A sliding window over the key-press stream, compared against a fixed
//! target pattern. Pure data structure: the platform layer owns the actual
//! event listener and feeds keys into `observe`.

use std::collections::VecDeque;

/// The canonical unlock sequence
pub const KONAMI_CODE: [&str; 10] = [
    "ArrowUp",
    "ArrowUp",
    "ArrowDown",
    "ArrowDown",
    "ArrowLeft",
    "ArrowRight",
    "ArrowLeft",
    "ArrowRight",
    "b",
    "a",
];

/// Detects a fixed ordered key sequence in a live key stream.
///
/// Keeps at most `pattern.len()` recent keys; a match is declared exactly
/// when the window equals the pattern element-by-element. Matching clears
/// the window, so overlapping matches cannot occur.
#[derive(Debug, Clone)]
pub struct SequenceMatcher {
    pattern: Vec<String>,
    window: VecDeque<String>,
}

impl SequenceMatcher {
    /// Create a matcher for the given target pattern.
    pub fn new<I, S>(pattern: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let pattern: Vec<String> = pattern.into_iter().map(Into::into).collect();
        let cap = pattern.len();
        Self {
            pattern,
            window: VecDeque::with_capacity(cap),
        }
    }

    /// Feed one key-press identifier. Returns `true` exactly when the most
    /// recent keys equal the target pattern; the window is cleared on match.
    ///
    /// Unknown or malformed identifiers simply never match; there is no
    /// error channel.
    pub fn observe(&mut self, key: &str) -> bool {
        if self.pattern.is_empty() {
            return false;
        }

        self.window.push_back(key.to_string());
        if self.window.len() > self.pattern.len() {
            self.window.pop_front();
        }

        let matched = self.window.len() == self.pattern.len()
            && self.window.iter().zip(&self.pattern).all(|(k, p)| k == p);

        if matched {
            self.window.clear();
        }
        matched
    }

    /// Discard any partially matched state.
    pub fn reset(&mut self) {
        self.window.clear();
    }

    /// Length of the target pattern.
    pub fn pattern_len(&self) -> usize {
        self.pattern.len()
    }

    /// Number of keys currently buffered (at most `pattern_len`).
    pub fn window_len(&self) -> usize {
        self.window.len()
    }
}

/// Matcher for the canonical Konami code.
pub fn konami_matcher() -> SequenceMatcher {
    SequenceMatcher::new(KONAMI_CODE)
}
