//! medsignal extract — rule-based business signal extraction from channel messages.
//!
//! Flow: raw text → [`normalize`] → field extractors ([`extract`], driven by
//! the [`patterns`] table) → [`record`] assembly → [`batch`] iteration.

pub mod batch;
pub mod export;
pub mod extract;
pub mod insights;
pub mod message;
pub mod normalize;
pub mod patterns;
pub mod record;

pub use batch::{BatchDriver, BatchOutcome, BatchSummary, Extractions};
pub use export::{
    load_csv, load_dir, load_export, load_file, load_path, parse_csv, parse_export, ChannelExport,
};
pub use insights::BusinessInsights;
pub use message::{MediaKind, Message};
pub use normalize::{normalize, Layout, Normalizer};
pub use patterns::{MatchPolicy, PatternLibrary, RuleName};
pub use record::{assemble, BusinessRecord, Extractor};
