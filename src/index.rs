use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use globset::Glob;
use walkdir::WalkDir;

pub const INDEX_FILENAME: &str = "index.html";
const REPORT_SUFFIX: &str = ".html";

/// Build the index document: one link per generated report, link text is the
/// filename with the exact trailing `.html` removed. The index never links
/// to itself.
pub fn build(dir: &Path) -> Result<String> {
    let matcher = Glob::new(&format!("*{REPORT_SUFFIX}"))
        .context("invalid report glob")?
        .compile_matcher();

    let mut html = String::new();
    for entry in WalkDir::new(dir).min_depth(1).max_depth(1) {
        let entry =
            entry.with_context(|| format!("failed to scan directory {}", dir.display()))?;
        if !entry.file_type().is_file() {
            continue;
        }
        let name = entry.file_name().to_string_lossy();
        if name == INDEX_FILENAME || !matcher.is_match(name.as_ref()) {
            continue;
        }
        let Some(stem) = name.strip_suffix(REPORT_SUFFIX) else {
            continue;
        };
        html.push_str(&format!("<p><a href=\"{name}\"> {stem}</a></p>\n"));
    }

    Ok(html)
}

/// Write (fully overwriting) the index document into `dir`.
pub fn write(dir: &Path) -> Result<PathBuf> {
    let html = build(dir)?;
    let path = dir.join(INDEX_FILENAME);
    std::fs::write(&path, html)
        .with_context(|| format!("failed to write {}", path.display()))?;
    Ok(path)
}
