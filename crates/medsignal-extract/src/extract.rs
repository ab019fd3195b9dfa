//! Field extractors, one function per business field.
//!
//! Pattern-backed fields read the flat normalized text; the name heuristic
//! and the delivery sentence read the line-preserving layout. None of them
//! fail: no match is `None`.

pub mod delivery;
pub mod names;

use crate::patterns::{PatternLibrary, RuleName};

pub use delivery::extract_delivery_info;
pub use names::{NameCandidates, NameHeuristic};

/// Every phone-like token, joined in order of appearance.
pub fn extract_contact_info(patterns: &PatternLibrary, text: &str) -> Option<String> {
    patterns.rule(RuleName::Phone).apply(text)
}

/// First price token, keyword-led form before amount-led form.
pub fn extract_price(patterns: &PatternLibrary, text: &str) -> Option<String> {
    patterns.rule(RuleName::Price).apply(text)
}

/// Every gazetteer place mentioned.
pub fn extract_address(patterns: &PatternLibrary, text: &str) -> Option<String> {
    patterns.rule(RuleName::AddressKeyword).apply(text)
}

/// Every time-of-day token.
pub fn extract_opening_hours(patterns: &PatternLibrary, text: &str) -> Option<String> {
    patterns.rule(RuleName::Time).apply(text)
}

pub fn extract_business_name(heuristic: &NameHeuristic, lined_text: &str) -> Option<String> {
    heuristic.extract(lined_text).business_name
}

pub fn extract_product_name(heuristic: &NameHeuristic, lined_text: &str) -> Option<String> {
    heuristic.extract(lined_text).product_name
}
