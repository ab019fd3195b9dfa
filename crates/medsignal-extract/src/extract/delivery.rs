//! Delivery sentence extraction.

use crate::patterns::{PatternLibrary, RuleName};

/// Segment delimiters: Latin and Ethiopic full stops, and line breaks.
fn is_delimiter(c: char) -> bool {
    matches!(c, '.' | '።' | '\n')
}

/// The segment holding the first delivery keyword, trimmed.
///
/// Segments are delimited by `.`, `።` and line breaks; text with no
/// delimiter is one segment.
pub fn extract_delivery_info(patterns: &PatternLibrary, lined_text: &str) -> Option<String> {
    let hit = patterns.rule(RuleName::DeliveryKeyword).first_hit(lined_text)?;

    let start = lined_text[..hit.start()]
        .char_indices()
        .rev()
        .find(|&(_, c)| is_delimiter(c))
        .map(|(i, c)| i + c.len_utf8())
        .unwrap_or(0);
    let end = lined_text[hit.end()..]
        .find(is_delimiter)
        .map(|i| hit.end() + i)
        .unwrap_or(lined_text.len());

    Some(lined_text[start..end].trim().to_string())
}
