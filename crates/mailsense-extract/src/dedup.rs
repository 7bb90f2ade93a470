use mailsense_core::normalize_phrase;
use std::collections::HashSet;

/// Normalized phrases already surfaced during one extraction pass.
#[derive(Debug, Default)]
pub struct SeenPhrases {
    seen: HashSet<String>,
}

impl SeenPhrases {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `phrase` and returns `true` unless an equivalent phrase was seen.
    pub fn insert(&mut self, phrase: &str) -> bool {
        self.seen.insert(normalize_phrase(phrase))
    }
}
