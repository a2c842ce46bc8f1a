use std::path::Path;
use std::process::{Command, Stdio};

use anyhow::{Context, Result};

use crate::exit;
use crate::hosts::HostRecord;

#[derive(Debug, Clone)]
pub struct AnalyzerOutput {
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

/// Run the external analyzer for one host, blocking until it finishes.
///
/// `-s` is always passed: the apar.csv freshness check happened once,
/// globally, before the batch started. There is deliberately no timeout; a
/// hung analyzer hangs the batch.
pub fn run(command: &str, workdir: &Path, host: &HostRecord) -> Result<AnalyzerOutput> {
    let lslpp = host.lslpp_filename();
    let emgr = host.emgr_filename();

    let output = Command::new(command)
        .args(["-s", "-l", &lslpp, "-e", &emgr])
        .current_dir(workdir)
        .stdin(Stdio::null())
        .output()
        .with_context(|| format!("failed to start analyzer: {command}"))
        .map_err(exit::analyzer_failed_err)?;

    Ok(AnalyzerOutput {
        exit_code: output.status.code().unwrap_or(-1),
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
    })
}

/// Run the analyzer and return its stdout, the pipe-delimited table.
///
/// Any byte on stderr aborts the whole batch. There is no warning-only path:
/// a single noisy host stops everything.
pub fn analyze(command: &str, workdir: &Path, host: &HostRecord) -> Result<String> {
    let output = run(command, workdir, host)?;

    if !output.stderr.is_empty() {
        return Err(exit::analyzer_failed(format!(
            "analyzer wrote to stderr for host {} (exit code {}): {}",
            host.hostname,
            output.exit_code,
            output.stderr.trim_end()
        )));
    }

    Ok(output.stdout)
}
