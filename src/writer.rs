//! JSON serialization of the link graph.

use crate::LinkRecord;
use crate::error::PipelineError;
use crate::storage::Storage;
use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};
use std::path::Path;

const INDENT: &[u8] = b"    ";

/// Render links as a JSON array, one object per link, indented by four spaces.
pub fn to_pretty_json(links: &[LinkRecord]) -> Result<Vec<u8>, serde_json::Error> {
    let mut out = Vec::with_capacity(links.len() * 160);
    let mut serializer = Serializer::with_formatter(&mut out, PrettyFormatter::with_indent(INDENT));
    links.serialize(&mut serializer)?;
    Ok(out)
}

/// Write the link graph to `path`, replacing any existing file.
///
/// The write is not atomic.
pub fn write_graph(
    storage: &dyn Storage,
    path: &Path,
    links: &[LinkRecord],
) -> Result<(), PipelineError> {
    let bytes = to_pretty_json(links)?;
    storage
        .write(path, &bytes)
        .map_err(|e| PipelineError::io(path, e))?;
    log::info!("wrote {} link(s) to {}", links.len(), path.display());
    Ok(())
}
