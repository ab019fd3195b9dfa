//! Text normalization: character filtering and whitespace collapsing.
//!
//! Output never has leading/trailing whitespace and normalizing twice is a
//! no-op for both layouts.

use medsignal_core::ScriptBlock;

/// Punctuation kept verbatim; every other non-alphanumeric ASCII character is dropped.
const PUNCTUATION: &str = ".,!?@#$%&*()-+=<>[]{}|;:'\"";

/// How line breaks are treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    /// Every whitespace run, newlines included, becomes a single space.
    Flat,
    /// Newlines survive as single `\n` separators; empty lines are dropped.
    Lines,
}

/// Both layouts of one message, computed once per assembly.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NormalizedText {
    pub flat: String,
    pub lines: String,
}

impl NormalizedText {
    pub fn is_empty(&self) -> bool {
        self.flat.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct Normalizer {
    script: ScriptBlock,
}

impl Normalizer {
    pub fn new(script: ScriptBlock) -> Self {
        Self { script }
    }

    /// Whether `c` survives filtering. Whitespace is handled separately.
    pub fn is_allowed(&self, c: char) -> bool {
        c.is_ascii_alphanumeric()
            || c == '_'
            || PUNCTUATION.contains(c)
            || self.script.contains(c)
    }

    pub fn normalize(&self, raw: &str, layout: Layout) -> String {
        match layout {
            Layout::Flat => self.clean_line(raw),
            Layout::Lines => raw
                .split('\n')
                .map(|line| self.clean_line(line))
                .filter(|line| !line.is_empty())
                .collect::<Vec<_>>()
                .join("\n"),
        }
    }

    /// Absent text normalizes to the empty string.
    pub fn normalize_opt(&self, raw: Option<&str>, layout: Layout) -> String {
        raw.map(|r| self.normalize(r, layout)).unwrap_or_default()
    }

    pub fn normalize_both(&self, raw: &str) -> NormalizedText {
        NormalizedText {
            flat: self.normalize(raw, Layout::Flat),
            lines: self.normalize(raw, Layout::Lines),
        }
    }

    /// Drop disallowed characters and fold whitespace runs into one space.
    fn clean_line(&self, raw: &str) -> String {
        let mut out = String::with_capacity(raw.len());
        let mut pending_space = false;
        for c in raw.chars() {
            if c.is_whitespace() {
                pending_space = !out.is_empty();
                continue;
            }
            if !self.is_allowed(c) {
                continue;
            }
            if pending_space {
                out.push(' ');
                pending_space = false;
            }
            out.push(c);
        }
        out
    }
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::new(ScriptBlock::ETHIOPIC)
    }
}

/// Normalize with the default (Ethiopic) script block.
pub fn normalize(raw: &str, layout: Layout) -> String {
    Normalizer::default().normalize(raw, layout)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flat_collapses_whitespace() {
        assert_eq!(
            normalize("  Addis   Pharmacy \t\n\n  Amoxicillin 500mg  ", Layout::Flat),
            "Addis Pharmacy Amoxicillin 500mg"
        );
    }

    #[test]
    fn test_lines_keeps_single_separators() {
        assert_eq!(
            normalize("  Addis   Pharmacy \t\n\n  Amoxicillin 500mg  \n", Layout::Lines),
            "Addis Pharmacy\nAmoxicillin 500mg"
        );
    }

    #[test]
    fn test_disallowed_characters_are_deleted() {
        assert_eq!(normalize("emoji☺in☺between", Layout::Flat), "emojiinbetween");
        assert_eq!(normalize("$20 / 30% off — call now", Layout::Flat), "$20 30% off call now");
        assert_eq!(normalize("Ελληνικά mixed", Layout::Flat), "mixed");
    }

    #[test]
    fn test_ethiopic_survives() {
        assert_eq!(normalize("ዋጋ 150 ብር 😀", Layout::Flat), "ዋጋ 150 ብር");
    }

    #[test]
    fn test_configured_block_replaces_default() {
        let arabic = Normalizer::new(ScriptBlock { start: '\u{0600}', end: '\u{06FF}' });
        assert_eq!(arabic.normalize("سعر ብር 10", Layout::Flat), "سعر 10");
    }

    #[test]
    fn test_unicode_whitespace_folds() {
        let once = normalize("a \u{00A0} b \u{2003}\r\n c", Layout::Lines);
        assert_eq!(once, "a b\nc");
        assert_eq!(normalize(&once, Layout::Lines), once);
    }

    #[test]
    fn test_absent_text_is_empty() {
        assert_eq!(Normalizer::default().normalize_opt(None, Layout::Lines), "");
    }
}
