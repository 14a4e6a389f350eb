//! Loading of `.lay` maze files.

use std::{fs, path::Path};

use anyhow::{Context, Result};

/// Reads a layout file and splits it into rows, top row first.
pub(crate) fn load_layout(path: &Path) -> Result<Vec<String>> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read layout file {}", path.display()))?;
    let rows = parse_rows(&text);
    if rows.is_empty() {
        anyhow::bail!("layout file {} contains no rows", path.display());
    }
    Ok(rows)
}

/// Splits layout text into rows. A trailing newline does not add an empty row.
pub(crate) fn parse_rows(text: &str) -> Vec<String> {
    text.lines().map(str::to_owned).collect()
}
