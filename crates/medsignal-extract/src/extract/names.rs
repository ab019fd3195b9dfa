//! Line-based business/product name heuristic.

use medsignal_core::ExtractionConfig;

/// Name candidates taken from the leading lines of a message.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NameCandidates {
    pub business_name: Option<String>,
    pub product_name: Option<String>,
}

/// Thresholds for picking name lines. Lengths are counted in characters,
/// not bytes, so Ethiopic lines measure the same as Latin ones.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameHeuristic {
    pub scan_lines: usize,
    pub min_chars: usize,
    pub max_chars: usize,
    pub min_lines: usize,
}

impl NameHeuristic {
    pub fn from_config(config: &ExtractionConfig) -> Self {
        Self {
            scan_lines: config.name_scan_lines,
            min_chars: config.name_min_chars,
            max_chars: config.name_max_chars,
            min_lines: config.name_min_lines,
        }
    }

    pub fn qualifies(&self, line: &str) -> bool {
        let len = line.chars().count();
        (self.min_chars..=self.max_chars).contains(&len) && line.chars().any(char::is_alphabetic)
    }

    /// First qualifying line is the business, the next qualifying line that
    /// differs from it is the product. Only the first `scan_lines` lines are
    /// looked at, and texts shorter than `min_lines` yield nothing.
    pub fn extract(&self, lined_text: &str) -> NameCandidates {
        let lines: Vec<&str> = lined_text
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .collect();

        let mut names = NameCandidates::default();
        if lines.len() < self.min_lines {
            return names;
        }

        for line in lines.iter().take(self.scan_lines) {
            if !self.qualifies(line) {
                continue;
            }
            if names.business_name.is_none() {
                names.business_name = Some(line.to_string());
            } else if names.business_name.as_deref() != Some(*line) {
                names.product_name = Some(line.to_string());
                break;
            }
        }
        names
    }
}

impl Default for NameHeuristic {
    fn default() -> Self {
        Self::from_config(&ExtractionConfig::default())
    }
}
