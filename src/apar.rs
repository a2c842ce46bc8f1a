use std::path::Path;
use std::time::{Duration, SystemTime};

use anyhow::{Context, Result};
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

use crate::config::AparConfig;
use crate::exit;
use crate::ui::UiConfig;

pub const APAR_FILENAME: &str = "apar.csv";

/// True if the reference file is absent or older than `max_age`.
///
/// Falls back to the modification time on filesystems that do not expose a
/// creation timestamp.
pub fn needs_refresh(path: &Path, max_age: Duration) -> Result<bool> {
    if !path.exists() {
        return Ok(true);
    }
    let age = file_age(path)?;
    Ok(age.map(|age| age > max_age).unwrap_or(false))
}

fn file_age(path: &Path) -> Result<Option<Duration>> {
    let meta = std::fs::metadata(path)
        .with_context(|| format!("failed to stat {}", path.display()))?;
    let stamp = meta.created().or_else(|_| meta.modified()).with_context(|| {
        format!(
            "filesystem reports no timestamps for {}",
            path.display()
        )
    })?;
    // A file stamped in the future counts as fresh.
    Ok(SystemTime::now().duration_since(stamp).ok())
}

pub fn refresh(path: &Path, url: &str) -> Result<()> {
    let response = reqwest::blocking::get(url)
        .with_context(|| format!("failed to fetch {url}"))?
        .error_for_status()
        .with_context(|| format!("server rejected request for {url}"))?;
    let body = response
        .bytes()
        .with_context(|| format!("failed to read response body from {url}"))?;
    std::fs::write(path, &body)
        .with_context(|| format!("failed to write {}", path.display()))?;
    Ok(())
}

/// Check the cached reference file in `workdir` and replace it when stale.
/// One global check per run; the per-host analyzer is always told to skip
/// its own download.
pub fn ensure_fresh(workdir: &Path, cfg: &AparConfig, ui: &UiConfig) -> Result<()> {
    ui.status("Checking apar.csv");
    let path = workdir.join(APAR_FILENAME);
    let max_age = Duration::from_secs(cfg.max_age_days * 24 * 60 * 60);

    if !needs_refresh(&path, max_age)? {
        ui.note("apar.csv is fresh enough, keeping it");
        return Ok(());
    }

    if let Ok(Some(age)) = file_age(&path) {
        let stamp = SystemTime::now() - age;
        if let Ok(formatted) = OffsetDateTime::from(stamp).format(&Rfc3339) {
            ui.note(&format!("apar.csv dates from {formatted}"));
        }
    }
    ui.warn(&format!(
        "apar.csv is more than {} days old or missing",
        cfg.max_age_days
    ));
    ui.status("Downloading fresh one from IBM");

    let pb = if ui.stderr_is_tty && !ui.quiet {
        let pb = indicatif::ProgressBar::new_spinner();
        pb.set_draw_target(indicatif::ProgressDrawTarget::stderr());
        pb.set_message("downloading apar.csv...");
        pb.enable_steady_tick(Duration::from_millis(120));
        Some(pb)
    } else {
        None
    };

    let result = refresh(&path, &cfg.url).map_err(exit::download_failed_err);

    if let Some(pb) = pb {
        pb.finish_and_clear();
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use std::sync::atomic::{AtomicU64, Ordering};

    fn make_temp_dir() -> PathBuf {
        static SEQ: AtomicU64 = AtomicU64::new(0);
        let seq = SEQ.fetch_add(1, Ordering::Relaxed);
        let dir = std::env::temp_dir().join(format!(
            "flrt2html-apar-test-{}-{seq}",
            std::process::id()
        ));
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).expect("create temp dir");
        dir
    }

    #[test]
    fn missing_file_needs_refresh() {
        let dir = make_temp_dir();
        let path = dir.join(APAR_FILENAME);
        assert!(needs_refresh(&path, Duration::from_secs(1)).unwrap());
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn freshly_written_file_does_not_need_refresh() {
        let dir = make_temp_dir();
        let path = dir.join(APAR_FILENAME);
        std::fs::write(&path, b"header\n").expect("write apar.csv");
        assert!(!needs_refresh(&path, Duration::from_secs(5 * 24 * 60 * 60)).unwrap());
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn zero_max_age_always_refreshes_existing_file() {
        let dir = make_temp_dir();
        let path = dir.join(APAR_FILENAME);
        std::fs::write(&path, b"header\n").expect("write apar.csv");
        std::thread::sleep(Duration::from_millis(20));
        assert!(needs_refresh(&path, Duration::ZERO).unwrap());
        let _ = std::fs::remove_dir_all(&dir);
    }
}
