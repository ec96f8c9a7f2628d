//! JSON renderer: serializes the documentation tree for downstream tooling.
//!
//! Key order follows the model's field order; absent descriptions are `null`.

use crate::model::Documentation;
use anyhow::{Context, Result};

/// Render `doc` as JSON, indented when `pretty` is set. Output ends with a newline.
pub fn render_json(doc: &Documentation, pretty: bool) -> Result<String> {
    let mut out = if pretty {
        serde_json::to_string_pretty(doc)
    } else {
        serde_json::to_string(doc)
    }
    .context("failed to serialize documentation")?;
    out.push('\n');
    Ok(out)
}
