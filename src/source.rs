//! Reading benchmark logs into a collection
//!
//! Any unreadable source aborts the whole run: a comparison built from
//! partial data would be misleading.

use anyhow::{Context, Result};
use std::path::Path;

use crate::collection::Collection;

/// Read one benchmark log as UTF-8 text
pub fn read_source(path: &Path) -> Result<String> {
    let bytes = std::fs::read(path)
        .with_context(|| format!("Failed to read benchmark log {}", path.display()))?;
    String::from_utf8(bytes)
        .with_context(|| format!("Benchmark log {} is not valid UTF-8", path.display()))
}

/// Ingest every path in order and finalize the collection
///
/// The first path is the "old" configuration, the second the "new" one.
pub fn load_collection<P: AsRef<Path>>(paths: &[P]) -> Result<Collection> {
    let mut collection = Collection::new();

    for path in paths {
        let path = path.as_ref();
        let text = read_source(path)?;
        let name = path.display().to_string();
        if collection.ingest(&name, &text) == 0 {
            tracing::warn!("{} contains no benchmark results", name);
        }
    }

    collection.finalize();
    Ok(collection)
}
