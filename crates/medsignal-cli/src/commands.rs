//! Command implementations, kept free of process setup so they can be tested.

use std::io::Write;
use std::path::PathBuf;

use anyhow::Context;

use medsignal_extract::{load_path, BatchDriver, BatchSummary, BusinessInsights, Extractor, Message};

/// Read every export, dump or directory, in argument order.
fn read_messages(paths: &[PathBuf]) -> anyhow::Result<Vec<Message>> {
    let mut messages = Vec::new();
    for path in paths {
        let exports = load_path(path).with_context(|| format!("reading {}", path.display()))?;
        for export in exports {
            messages.extend(export.messages);
        }
    }
    Ok(messages)
}

/// Stream records to `out` as JSON lines. Returns the batch summary.
pub fn extract(
    extractor: &Extractor,
    files: &[PathBuf],
    out: &mut impl Write,
) -> anyhow::Result<BatchSummary> {
    let messages = read_messages(files)?;
    let mut run = BatchDriver::new(extractor).run(&messages);
    for record in run.by_ref() {
        serde_json::to_writer(&mut *out, &record)?;
        out.write_all(b"\n")?;
    }
    out.flush()?;
    Ok(run.summary())
}

pub fn insights(extractor: &Extractor, files: &[PathBuf]) -> anyhow::Result<BusinessInsights> {
    let messages = read_messages(files)?;
    let outcome = BatchDriver::new(extractor).collect(&messages);
    Ok(BusinessInsights::from_records(&outcome.records))
}
