//! Pattern library: the named extraction rules and their match policies.
//!
//! Every regex literal used by the field extractors lives here.

use once_cell::sync::Lazy;
use regex::{Match, Regex};
use serde::Serialize;

use medsignal_core::{Error, Result};

/// Local mobile (`09…`/`07…`) or `+251`-prefixed numbers, or any bare 10-digit run.
const PHONE: &str = r"(?:\+251|0)[79]\d{8}|\b\d{10}\b";

/// Currency marker before the amount: `birr 150`, `ብር 150`, `$ 20`.
const PRICE_KEYWORD_LED: &str = r"(?i)(?:ብር|birr|ETB|\$)\s*\d+(?:[.,]\d+)?";

/// Amount before the currency marker: `150 birr`, `1,500 ETB`.
const PRICE_AMOUNT_LED: &str = r"(?i)\d+(?:[.,]\d+)?\s*(?:ብር|birr|ETB|\$)";

const TIME: &str = r"(?i)\d{1,2}:\d{2}(?:\s*(?:AM|PM|ጠዋት|ማታ))?";

const DELIVERY: &str = r"(?i)delivery|ዴሊቨሪ|መላክ|ማድረስ";

/// Known places, native and transliterated spellings.
pub const GAZETTEER: &[&str] = &[
    "አዲስ አበባ",
    "Addis Ababa",
    "ቦሌ",
    "Bole",
    "ፒያሳ",
    "Piassa",
    "መርካቶ",
    "Mercato",
];

static STANDARD: Lazy<PatternLibrary> =
    Lazy::new(|| PatternLibrary::new(&[]).expect("built-in patterns compile"));

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleName {
    Phone,
    Price,
    AddressKeyword,
    Time,
    DeliveryKeyword,
}

impl RuleName {
    pub fn as_str(&self) -> &'static str {
        match self {
            RuleName::Phone => "phone",
            RuleName::Price => "price",
            RuleName::AddressKeyword => "address_keyword",
            RuleName::Time => "time",
            RuleName::DeliveryKeyword => "delivery_keyword",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum MatchPolicy {
    /// Leftmost match across all forms; declaration order breaks ties.
    FirstMatch,
    /// Every match, in order of appearance, joined with `", "`.
    AllMatchesJoined,
    /// Only whether something matched; the value is the matched keyword.
    Presence,
}

/// One named rule: one or more alternative forms.
#[derive(Debug, Clone)]
pub struct PatternRule {
    name: RuleName,
    forms: Vec<Regex>,
    policy: MatchPolicy,
}

impl PatternRule {
    fn compile(name: RuleName, sources: &[&str], policy: MatchPolicy) -> Result<Self> {
        let forms = sources
            .iter()
            .map(|src| {
                Regex::new(src)
                    .map_err(|e| Error::Pattern(format!("rule '{}': {}", name.as_str(), e)))
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { name, forms, policy })
    }

    pub fn name(&self) -> RuleName {
        self.name
    }

    pub fn policy(&self) -> MatchPolicy {
        self.policy
    }

    /// Earliest hit in `text` across all forms. On equal starts the form
    /// declared first wins.
    pub fn first_hit<'t>(&self, text: &'t str) -> Option<Match<'t>> {
        self.forms
            .iter()
            .filter_map(|re| re.find(text))
            .min_by_key(|m| m.start())
    }

    pub fn is_match(&self, text: &str) -> bool {
        self.forms.iter().any(|re| re.is_match(text))
    }

    /// Apply the rule under its policy. `None` means no match.
    pub fn apply(&self, text: &str) -> Option<String> {
        match self.policy {
            MatchPolicy::FirstMatch | MatchPolicy::Presence => {
                self.first_hit(text).map(|m| m.as_str().to_string())
            }
            MatchPolicy::AllMatchesJoined => {
                let mut hits: Vec<Match<'_>> =
                    self.forms.iter().flat_map(|re| re.find_iter(text)).collect();
                if hits.is_empty() {
                    return None;
                }
                hits.sort_by_key(|m| m.start());
                Some(hits.iter().map(|m| m.as_str()).collect::<Vec<_>>().join(", "))
            }
        }
    }
}

/// The fixed, ordered rule table.
#[derive(Debug, Clone)]
pub struct PatternLibrary {
    phone: PatternRule,
    price: PatternRule,
    address: PatternRule,
    time: PatternRule,
    delivery: PatternRule,
}

impl PatternLibrary {
    /// Compile the rule table. `extra_places` extends the gazetteer.
    pub fn new(extra_places: &[String]) -> Result<Self> {
        let address = gazetteer_pattern(
            GAZETTEER
                .iter()
                .copied()
                .chain(extra_places.iter().map(String::as_str)),
        );

        Ok(Self {
            phone: PatternRule::compile(
                RuleName::Phone,
                &[PHONE],
                MatchPolicy::AllMatchesJoined,
            )?,
            price: PatternRule::compile(
                RuleName::Price,
                &[PRICE_KEYWORD_LED, PRICE_AMOUNT_LED],
                MatchPolicy::FirstMatch,
            )?,
            address: PatternRule::compile(
                RuleName::AddressKeyword,
                &[address.as_str()],
                MatchPolicy::AllMatchesJoined,
            )?,
            time: PatternRule::compile(RuleName::Time, &[TIME], MatchPolicy::AllMatchesJoined)?,
            delivery: PatternRule::compile(
                RuleName::DeliveryKeyword,
                &[DELIVERY],
                MatchPolicy::Presence,
            )?,
        })
    }

    /// The built-in table, compiled on first use.
    pub fn standard() -> &'static PatternLibrary {
        &STANDARD
    }

    pub fn rule(&self, name: RuleName) -> &PatternRule {
        match name {
            RuleName::Phone => &self.phone,
            RuleName::Price => &self.price,
            RuleName::AddressKeyword => &self.address,
            RuleName::Time => &self.time,
            RuleName::DeliveryKeyword => &self.delivery,
        }
    }

    /// All rules, in table order.
    pub fn rules(&self) -> [&PatternRule; 5] {
        [&self.phone, &self.price, &self.address, &self.time, &self.delivery]
    }

    /// True if any rule matches anywhere in `text`.
    pub fn any_match(&self, text: &str) -> bool {
        self.rules().iter().any(|r| r.is_match(text))
    }
}

/// Case-insensitive alternation over place names; inner spaces match any whitespace run.
fn gazetteer_pattern<'a>(places: impl Iterator<Item = &'a str>) -> String {
    let alternatives: Vec<String> = places
        .map(|place| {
            place
                .split_whitespace()
                .map(regex::escape)
                .collect::<Vec<_>>()
                .join(r"\s*")
        })
        .filter(|alt| !alt.is_empty())
        .collect();
    format!("(?i)(?:{})", alternatives.join("|"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn apply(name: RuleName, text: &str) -> Option<String> {
        PatternLibrary::standard().rule(name).apply(text)
    }

    #[test]
    fn test_rule_table_order() {
        let names: Vec<&str> = PatternLibrary::standard()
            .rules()
            .iter()
            .map(|r| r.name().as_str())
            .collect();
        assert_eq!(
            names,
            vec!["phone", "price", "address_keyword", "time", "delivery_keyword"]
        );
    }

    #[test]
    fn test_phone_shapes() {
        assert_eq!(apply(RuleName::Phone, "call 0911223344").as_deref(), Some("0911223344"));
        assert_eq!(
            apply(RuleName::Phone, "tel +251911223344").as_deref(),
            Some("+251911223344")
        );
        assert_eq!(apply(RuleName::Phone, "office 0712345678").as_deref(), Some("0712345678"));
        assert_eq!(apply(RuleName::Phone, "id 1234567890 here").as_deref(), Some("1234567890"));
        assert_eq!(apply(RuleName::Phone, "short 09112233"), None);
    }

    #[test]
    fn test_phone_joins_all() {
        assert_eq!(
            apply(RuleName::Phone, "Call 0911223344 or 0922334455").as_deref(),
            Some("0911223344, 0922334455")
        );
    }

    #[test]
    fn test_price_leftmost_form_wins() {
        assert_eq!(
            apply(RuleName::Price, "was 20 ETB, now birr 15").as_deref(),
            Some("20 ETB")
        );
        assert_eq!(
            apply(RuleName::Price, "now birr 15, was 20 ETB").as_deref(),
            Some("birr 15")
        );
    }

    #[test]
    fn test_price_ignores_quantity_after_currency() {
        // Flat text joins the lines, so the currency word sits right before the next count.
        assert_eq!(
            apply(RuleName::Price, "Paracetamol 150 birr 2 boxes left").as_deref(),
            Some("150 birr")
        );
        assert_eq!(
            apply(RuleName::Price, "Amoxicillin 500mg 120 ETB 30 capsules, call 0911223344")
                .as_deref(),
            Some("120 ETB")
        );
    }

    #[test]
    fn test_price_amount_led() {
        assert_eq!(apply(RuleName::Price, "price 150 birr only").as_deref(), Some("150 birr"));
        assert_eq!(apply(RuleName::Price, "1,500 ETB").as_deref(), Some("1,500 ETB"));
        assert_eq!(apply(RuleName::Price, "ዋጋ 250 ብር").as_deref(), Some("250 ብር"));
        assert_eq!(apply(RuleName::Price, "costs $ 12.5").as_deref(), Some("$ 12.5"));
        assert_eq!(apply(RuleName::Price, "just 150 units"), None);
    }

    #[test]
    fn test_address_gazetteer() {
        assert_eq!(
            apply(RuleName::AddressKeyword, "shops in BOLE and addis   ababa").as_deref(),
            Some("BOLE, addis   ababa")
        );
        assert_eq!(apply(RuleName::AddressKeyword, "ቦሌ መድሃኒት ቤት").as_deref(), Some("ቦሌ"));
        assert_eq!(apply(RuleName::AddressKeyword, "Addis Medical Center"), None);
    }

    #[test]
    fn test_extra_places() {
        let places = ["Kazanchis".to_string(), "Gerji Mebrat".to_string()];
        let lib = PatternLibrary::new(&places).unwrap();
        let rule = lib.rule(RuleName::AddressKeyword);
        assert_eq!(
            rule.apply("kazanchis near gerji mebrat").as_deref(),
            Some("kazanchis, gerji mebrat")
        );
    }

    #[test]
    fn test_extra_places_are_escaped() {
        let lib = PatternLibrary::new(&["St. Mary (Arat Kilo)".to_string()]).unwrap();
        let rule = lib.rule(RuleName::AddressKeyword);
        assert!(rule.is_match("near st. mary (arat kilo)"));
        assert!(!rule.is_match("near stX mary"));
    }

    #[test]
    fn test_time() {
        assert_eq!(
            apply(RuleName::Time, "open 9:00 AM - 10:30pm").as_deref(),
            Some("9:00 AM, 10:30pm")
        );
        assert_eq!(apply(RuleName::Time, "ከ 2:00 ጠዋት").as_deref(), Some("2:00 ጠዋት"));
    }

    #[test]
    fn test_delivery_presence() {
        let rule = PatternLibrary::standard().rule(RuleName::DeliveryKeyword);
        assert_eq!(rule.policy(), MatchPolicy::Presence);
        assert_eq!(rule.apply("Free DELIVERY today").as_deref(), Some("DELIVERY"));
        assert!(rule.is_match("በነጻ መላክ"));
        assert!(!rule.is_match("pickup only"));
    }

    #[test]
    fn test_any_match() {
        let lib = PatternLibrary::standard();
        assert!(!lib.any_match("Just a casual comment with no structured info"));
        assert!(lib.any_match("see you at 8:30"));
    }
}
