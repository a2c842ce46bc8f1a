use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use globset::Glob;
use walkdir::WalkDir;

pub const LSLPP_SUFFIX: &str = "_lslpp.info";
pub const EMGR_SUFFIX: &str = "_emgr.info";

/// One scanned host, identified by the inventory file it left behind.
#[derive(Debug, Clone)]
pub struct HostRecord {
    pub hostname: String,
    pub lslpp: PathBuf,
    pub emgr: PathBuf,
}

impl HostRecord {
    pub fn lslpp_filename(&self) -> String {
        format!("{}{LSLPP_SUFFIX}", self.hostname)
    }

    pub fn emgr_filename(&self) -> String {
        format!("{}{EMGR_SUFFIX}", self.hostname)
    }

    pub fn report_filename(&self) -> String {
        format!("{}.html", self.hostname)
    }
}

/// Scan `dir` (non-recursive) for `<hostname>_lslpp.info` files.
///
/// The hostname is the filename with the exact trailing suffix removed, never
/// a character-set trim; a host named `foo_ppl` keeps its full name.
/// Enumeration order is filesystem order.
pub fn discover(dir: &Path) -> Result<Vec<HostRecord>> {
    let matcher = Glob::new(&format!("*{LSLPP_SUFFIX}"))
        .context("invalid lslpp glob")?
        .compile_matcher();

    let mut hosts = Vec::new();
    for entry in WalkDir::new(dir).min_depth(1).max_depth(1) {
        let entry =
            entry.with_context(|| format!("failed to scan directory {}", dir.display()))?;
        if !entry.file_type().is_file() {
            continue;
        }
        let name = entry.file_name().to_string_lossy();
        if !matcher.is_match(name.as_ref()) {
            continue;
        }
        let Some(hostname) = name.strip_suffix(LSLPP_SUFFIX) else {
            continue;
        };
        if hostname.is_empty() {
            continue;
        }
        hosts.push(HostRecord {
            hostname: hostname.to_string(),
            lslpp: entry.path().to_path_buf(),
            emgr: dir.join(format!("{hostname}{EMGR_SUFFIX}")),
        });
    }

    Ok(hosts)
}
