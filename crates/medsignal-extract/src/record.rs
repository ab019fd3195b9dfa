//! Record assembly: one message in, at most one business record out.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use tracing::debug;

use medsignal_core::{ExtractionConfig, MalformedInput, Result};

use crate::extract::{self, NameHeuristic};
use crate::message::Message;
use crate::normalize::{NormalizedText, Normalizer};
use crate::patterns::PatternLibrary;

static DEFAULT_EXTRACTOR: Lazy<Extractor> = Lazy::new(Extractor::default);

/// Business/medical signals found in one message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusinessRecord {
    /// Back-reference to the originating message.
    pub source_id: String,
    pub business_name: Option<String>,
    pub product_name: Option<String>,
    /// Price token as written, e.g. `"150 birr"`.
    pub price: Option<String>,
    pub contact_info: Option<String>,
    pub address: Option<String>,
    pub opening_hours: Option<String>,
    pub delivery_info: Option<String>,
}

impl BusinessRecord {
    /// True if at least one extracted field is set.
    pub fn has_signal(&self) -> bool {
        self.business_name.is_some()
            || self.product_name.is_some()
            || self.price.is_some()
            || self.contact_info.is_some()
            || self.address.is_some()
            || self.opening_hours.is_some()
            || self.delivery_info.is_some()
    }

    /// Channel half of a `<channel>/<id>` source id.
    pub fn channel(&self) -> Option<&str> {
        self.source_id
            .rsplit_once('/')
            .map(|(channel, _)| channel)
            .filter(|channel| !channel.is_empty())
    }
}

/// Compiled pipeline: normalizer, pattern table and name heuristic.
#[derive(Debug, Clone)]
pub struct Extractor {
    normalizer: Normalizer,
    patterns: PatternLibrary,
    names: NameHeuristic,
}

impl Extractor {
    /// Build from configuration. Pattern compile failures surface here.
    pub fn new(config: &ExtractionConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            normalizer: Normalizer::new(config.script_block),
            patterns: PatternLibrary::new(&config.extra_places)?,
            names: NameHeuristic::from_config(config),
        })
    }

    pub fn patterns(&self) -> &PatternLibrary {
        &self.patterns
    }

    pub fn normalize(&self, raw: &str) -> NormalizedText {
        self.normalizer.normalize_both(raw)
    }

    /// Run every field extractor over `raw`. `None` if nothing was found.
    pub fn extract_record(&self, source_id: &str, raw: &str) -> Option<BusinessRecord> {
        let text = self.normalize(raw);
        if text.is_empty() {
            return None;
        }

        let names = self.names.extract(&text.lines);
        let record = BusinessRecord {
            source_id: source_id.to_string(),
            business_name: names.business_name,
            product_name: names.product_name,
            price: extract::extract_price(&self.patterns, &text.flat),
            contact_info: extract::extract_contact_info(&self.patterns, &text.flat),
            address: extract::extract_address(&self.patterns, &text.flat),
            opening_hours: extract::extract_opening_hours(&self.patterns, &text.flat),
            delivery_info: extract::extract_delivery_info(&self.patterns, &text.lines),
        };

        record.has_signal().then_some(record)
    }

    /// Assemble a record for `message`.
    ///
    /// Absent or empty text yields `Ok(None)`; text that is not a string is
    /// [`MalformedInput`].
    pub fn assemble(
        &self,
        message: &Message,
    ) -> std::result::Result<Option<BusinessRecord>, MalformedInput> {
        let Some(raw) = message.resolve_text()? else {
            debug!("No text in {}", message.source_id);
            return Ok(None);
        };

        let record = self.extract_record(&message.source_id, &raw);
        if record.is_none() {
            debug!("Discarded {}: no business signal", message.source_id);
        }
        Ok(record)
    }
}

impl Default for Extractor {
    fn default() -> Self {
        Self {
            normalizer: Normalizer::default(),
            patterns: PatternLibrary::standard().clone(),
            names: NameHeuristic::default(),
        }
    }
}

/// Assemble with the default configuration.
pub fn assemble(
    message: &Message,
) -> std::result::Result<Option<BusinessRecord>, MalformedInput> {
    DEFAULT_EXTRACTOR.assemble(message)
}
