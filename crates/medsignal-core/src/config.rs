//! Extraction configuration.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;

use crate::error::{Error, Result};

/// An inclusive range of Unicode scalar values kept by the normalizer
/// alongside ASCII.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScriptBlock {
    pub start: char,
    pub end: char,
}

impl ScriptBlock {
    /// Ethiopic (U+1200–U+137F), the script mixed into the channels we read.
    pub const ETHIOPIC: ScriptBlock = ScriptBlock {
        start: '\u{1200}',
        end: '\u{137F}',
    };

    pub fn contains(&self, c: char) -> bool {
        (self.start..=self.end).contains(&c)
    }

    /// Parse a `"1200-137F"` style hex range.
    pub fn parse_hex_range(s: &str) -> Result<Self> {
        let (lo, hi) = s
            .split_once('-')
            .ok_or_else(|| Error::Config(format!("script block '{}' is not START-END", s)))?;
        let to_char = |part: &str| {
            u32::from_str_radix(part.trim().trim_start_matches("U+"), 16)
                .ok()
                .and_then(char::from_u32)
                .ok_or_else(|| Error::Config(format!("invalid code point '{}'", part)))
        };
        Ok(Self {
            start: to_char(lo)?,
            end: to_char(hi)?,
        })
    }
}

/// Knobs for the extraction pipeline. Defaults reproduce the canonical
/// rule set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Non-Latin block preserved by normalization.
    pub script_block: ScriptBlock,
    /// How many leading lines are considered for name candidates.
    pub name_scan_lines: usize,
    /// Minimum name line length, in characters.
    pub name_min_chars: usize,
    /// Maximum name line length, in characters.
    pub name_max_chars: usize,
    /// Messages with fewer lines than this get no name candidates.
    pub name_min_lines: usize,
    /// Additional place names appended to the address gazetteer.
    pub extra_places: Vec<String>,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            script_block: ScriptBlock::ETHIOPIC,
            name_scan_lines: 3,
            name_min_chars: 6,
            name_max_chars: 99,
            name_min_lines: 2,
            extra_places: Vec::new(),
        }
    }
}

impl ExtractionConfig {
    /// Create configuration from `MEDSIGNAL_*` environment variables and defaults.
    pub fn from_env() -> Result<Self> {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) with an injectable variable lookup.
    pub fn from_vars(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();

        if let Some(block) = lookup("MEDSIGNAL_SCRIPT_BLOCK") {
            config.script_block = ScriptBlock::parse_hex_range(&block)?;
        }
        if let Some(n) = parse_var(&lookup, "MEDSIGNAL_NAME_SCAN_LINES")? {
            config.name_scan_lines = n;
        }
        if let Some(n) = parse_var(&lookup, "MEDSIGNAL_NAME_MIN_CHARS")? {
            config.name_min_chars = n;
        }
        if let Some(n) = parse_var(&lookup, "MEDSIGNAL_NAME_MAX_CHARS")? {
            config.name_max_chars = n;
        }
        if let Some(n) = parse_var(&lookup, "MEDSIGNAL_NAME_MIN_LINES")? {
            config.name_min_lines = n;
        }
        if let Some(places) = lookup("MEDSIGNAL_EXTRA_PLACES") {
            config.extra_places = places
                .split(',')
                .map(str::trim)
                .filter(|p| !p.is_empty())
                .map(String::from)
                .collect();
        }

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a JSON file. Missing keys take defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        let config: Self = serde_json::from_str(&raw)?;
        config.validate()?;
        tracing::debug!("Loaded extraction config from {}", path.as_ref().display());
        Ok(config)
    }

    /// Reject settings under which the name heuristic cannot behave sensibly.
    pub fn validate(&self) -> Result<()> {
        if self.script_block.start > self.script_block.end {
            return Err(Error::Config(format!(
                "script block start U+{:04X} is after end U+{:04X}",
                self.script_block.start as u32, self.script_block.end as u32
            )));
        }
        if self.name_min_chars > self.name_max_chars {
            return Err(Error::Config(format!(
                "name_min_chars ({}) exceeds name_max_chars ({})",
                self.name_min_chars, self.name_max_chars
            )));
        }
        if self.name_scan_lines == 0 {
            return Err(Error::Config("name_scan_lines must be at least 1".into()));
        }
        if self.extra_places.iter().any(|p| p.trim().is_empty()) {
            return Err(Error::Config("extra_places contains an empty entry".into()));
        }
        Ok(())
    }
}

/// Parse a variable if set. A value that does not parse is an error naming the variable.
fn parse_var<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|e| Error::Config(format!("{}={:?}: {}", key, raw, e))),
    }
}
