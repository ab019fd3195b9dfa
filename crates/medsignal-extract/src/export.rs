//! Channel export readers: JSON exports and CSV message dumps into [`Message`]s.
//!
//! JSON shape: `{ "name", "id", "messages": [ { "id", "date", "text",
//! "photo" | "video" | "document" } ] }`. Message text is kept raw so that
//! odd shapes are reported by the assembler rather than dropped here.
//!
//! CSV dumps carry one message per row with a header line; the columns used
//! are `text`, `date`, and optionally `id` and `media_type`. The file stem
//! names the channel.

use std::io::Read;
use std::path::Path;

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::Deserialize;
use serde_json::Value;
use tracing::{error, info, warn};

use medsignal_core::Result;

use crate::message::{MediaKind, Message};

/// One channel's messages, ready for the batch driver.
#[derive(Debug, Clone)]
pub struct ChannelExport {
    pub channel_name: String,
    pub channel_id: String,
    pub messages: Vec<Message>,
}

#[derive(Deserialize)]
struct RawExport {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    id: Option<Value>,
    #[serde(default)]
    messages: Vec<Value>,
}

#[derive(Deserialize)]
struct RawMessage {
    #[serde(default)]
    id: Option<Value>,
    #[serde(default)]
    date: Option<String>,
    #[serde(default)]
    text: Option<Value>,
    #[serde(default)]
    photo: Option<Value>,
    #[serde(default)]
    video: Option<Value>,
    #[serde(default)]
    document: Option<Value>,
}

#[derive(Deserialize)]
struct CsvRow {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    date: Option<String>,
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    media_type: Option<String>,
}

/// Parse an export. `fallback_name` is used when the dump has no `name`.
///
/// Entries that are not message objects are logged and skipped.
pub fn parse_export(raw: &str, fallback_name: &str) -> Result<ChannelExport> {
    let export: RawExport = serde_json::from_str(raw)?;
    let channel_name = export
        .name
        .filter(|n| !n.trim().is_empty())
        .unwrap_or_else(|| fallback_name.to_string());
    let channel_id = export.id.as_ref().map(scalar_to_string).unwrap_or_default();

    let mut messages = Vec::with_capacity(export.messages.len());
    for (index, entry) in export.messages.into_iter().enumerate() {
        let msg: RawMessage = match serde_json::from_value(entry) {
            Ok(m) => m,
            Err(e) => {
                warn!("Skipping entry {} in {}: {}", index, channel_name, e);
                continue;
            }
        };

        let local_id = msg
            .id
            .as_ref()
            .map(scalar_to_string)
            .filter(|id| !id.is_empty())
            .unwrap_or_else(|| format!("#{}", index));

        messages.push(Message {
            source_id: format!("{}/{}", channel_name, local_id),
            media: media_kind(&msg),
            date: msg.date.as_deref().and_then(parse_date),
            text: msg.text,
        });
    }

    info!("Read {} messages from channel {}", messages.len(), channel_name);
    Ok(ChannelExport {
        channel_name,
        channel_id,
        messages,
    })
}

/// Read and parse an export file; the file stem names channels without a `name`.
pub fn load_export(path: &Path) -> Result<ChannelExport> {
    let raw = std::fs::read_to_string(path)?;
    parse_export(&raw, file_stem(path))
}

/// Parse a CSV message dump. Rows that do not fit the header are logged and
/// skipped; rows without an `id` are numbered `#<row>`.
pub fn parse_csv<R: Read>(reader: R, channel_name: &str) -> Result<ChannelExport> {
    let mut rows = csv::ReaderBuilder::new().has_headers(true).from_reader(reader);

    let mut messages = Vec::new();
    for (index, row) in rows.deserialize::<CsvRow>().enumerate() {
        let row = match row {
            Ok(row) => row,
            Err(e) => {
                warn!("Skipping row {} in {}: {}", index, channel_name, e);
                continue;
            }
        };

        let local_id = row
            .id
            .filter(|id| !id.trim().is_empty())
            .unwrap_or_else(|| format!("#{}", index));

        messages.push(Message {
            source_id: format!("{}/{}", channel_name, local_id),
            text: row.text.map(Value::String),
            date: row.date.as_deref().and_then(parse_date),
            media: row.media_type.as_deref().and_then(media_from_label),
        });
    }

    info!("Read {} CSV rows from channel {}", messages.len(), channel_name);
    Ok(ChannelExport {
        channel_name: channel_name.to_string(),
        channel_id: channel_name.to_string(),
        messages,
    })
}

/// Read a CSV dump; the file stem is the channel name.
pub fn load_csv(path: &Path) -> Result<ChannelExport> {
    let file = std::fs::File::open(path)?;
    parse_csv(file, file_stem(path))
}

/// Load one file, choosing the reader by extension (`.csv`, otherwise JSON).
pub fn load_file(path: &Path) -> Result<ChannelExport> {
    match extension(path).as_deref() {
        Some("csv") => load_csv(path),
        _ => load_export(path),
    }
}

/// Every `*.json` export and then every `*.csv` dump in `dir`, each group in
/// file-name order. Files that fail to load are logged and skipped.
pub fn load_dir(dir: &Path) -> Result<Vec<ChannelExport>> {
    let mut json_files = Vec::new();
    let mut csv_files = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if !path.is_file() {
            continue;
        }
        match extension(&path).as_deref() {
            Some("json") => json_files.push(path),
            Some("csv") => csv_files.push(path),
            _ => {}
        }
    }
    json_files.sort();
    csv_files.sort();

    let mut exports = Vec::with_capacity(json_files.len() + csv_files.len());
    for path in json_files.iter().chain(&csv_files) {
        match load_file(path) {
            Ok(export) => exports.push(export),
            Err(e) => error!("Skipping {}: {}", path.display(), e),
        }
    }
    info!("Loaded {} channel files from {}", exports.len(), dir.display());
    Ok(exports)
}

/// A directory is scanned with [`load_dir`]; anything else is one file.
pub fn load_path(path: &Path) -> Result<Vec<ChannelExport>> {
    if path.is_dir() {
        load_dir(path)
    } else {
        Ok(vec![load_file(path)?])
    }
}

fn file_stem(path: &Path) -> &str {
    path.file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("unknown")
}

fn extension(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
}

/// Accepts RFC 3339, `YYYY-MM-DDTHH:MM:SS` and `YYYY-MM-DD HH:MM:SS` (naive times are UTC).
pub fn parse_date(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S")
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S"))
        .ok()
        .map(|naive| naive.and_utc())
}

fn media_kind(msg: &RawMessage) -> Option<MediaKind> {
    if is_present(&msg.photo) {
        Some(MediaKind::Photo)
    } else if is_present(&msg.video) {
        Some(MediaKind::Video)
    } else if is_present(&msg.document) {
        Some(MediaKind::Document)
    } else {
        None
    }
}

fn media_from_label(label: &str) -> Option<MediaKind> {
    match label.trim().to_ascii_lowercase().as_str() {
        "photo" => Some(MediaKind::Photo),
        "video" => Some(MediaKind::Video),
        "document" => Some(MediaKind::Document),
        _ => None,
    }
}

fn is_present(value: &Option<Value>) -> bool {
    match value {
        None | Some(Value::Null) | Some(Value::Bool(false)) => false,
        Some(Value::String(s)) => !s.is_empty(),
        Some(_) => true,
    }
}

fn scalar_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
