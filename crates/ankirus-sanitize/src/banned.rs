//! Banned word list and the fixed-point scrub.

use std::path::Path;

use crate::error::SanitizeError;

/// Words removed from every sanitized text, longest first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BannedWords {
    words: Vec<String>,
}

impl BannedWords {
    /// Build from raw lines: trimmed, blanks dropped, longest first.
    ///
    /// Ordering by length makes multi-word phrases win over their substrings.
    pub fn from_lines<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut words: Vec<String> = lines
            .into_iter()
            .map(|line| line.as_ref().trim().to_string())
            .filter(|word| !word.is_empty())
            .collect();
        words.sort_by_key(|word| std::cmp::Reverse(word.chars().count()));
        Self { words }
    }

    /// Load a UTF-8 word list, one entry per line.
    ///
    /// # Errors
    ///
    /// Returns `SanitizeError::WordList` if the file cannot be read.
    pub fn load(path: &Path) -> Result<Self, SanitizeError> {
        let content = std::fs::read_to_string(path).map_err(|source| SanitizeError::WordList {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::from_lines(content.lines()))
    }

    #[must_use]
    pub fn words(&self) -> &[String] {
        &self.words
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.words.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Remove every banned word until a full pass changes nothing.
    ///
    /// A removal can join two fragments into a new banned word, so one pass
    /// is not enough.
    #[must_use]
    pub fn scrub(&self, text: &str) -> String {
        let mut current = text.to_string();
        loop {
            let mut next = current.clone();
            for word in &self.words {
                if next.contains(word.as_str()) {
                    next = next.replace(word.as_str(), "");
                }
            }
            if next == current {
                return current;
            }
            current = next;
        }
    }
}
