use std::io::IsTerminal;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;

use crate::ui::UiConfig;
use crate::{analyzer, apar, config, exit, hosts, index, render, table};

#[derive(Debug, Parser)]
#[command(
    name = "flrt2html",
    version,
    about = "Convert flrtvc.ksh output to browsable HTML reports, one per host, plus an index"
)]
pub struct Cli {
    /// Parse all files (accepted for compatibility; batch discovery is always active)
    #[arg(short = 'b', long)]
    pub batch: bool,

    /// Skip downloading 'apar.csv'
    #[arg(short = 's', long)]
    pub skip_download: bool,

    /// Directory containing files for mass processing
    #[arg(short = 'd', value_name = "DIR", default_value = "./")]
    pub dir: PathBuf,

    /// Output directory (accepted for compatibility; reports are written next to the inputs)
    #[arg(short = 'o', long, value_name = "DIR", default_value = "/tmp/flrt2html")]
    pub output: PathBuf,

    /// 'lslpp -Lqc' output for a single host (unused by the batch path)
    #[arg(short = 'l', long, value_name = "PATH")]
    pub lslpp: Option<PathBuf>,

    /// 'emgr -lv3' output for a single host (unused by the batch path)
    #[arg(short = 'e', long, value_name = "PATH")]
    pub emgr: Option<PathBuf>,

    /// Echo the parsed arguments
    #[arg(long)]
    pub debug: bool,

    /// Suppress status output
    #[arg(long)]
    pub quiet: bool,

    /// Print extra diagnostics
    #[arg(long)]
    pub verbose: bool,

    /// Config file (default: ~/.config/flrt2html/config.toml)
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    if cli.debug {
        println!("{cli:?}");
    }

    let home_dir = config::home_dir().map_err(exit::invalid_args_err)?;
    let env_config_path = std::env::var_os("FLRT2HTML_CONFIG").map(PathBuf::from);
    let cfg = config::load(
        cli.config.as_deref().or(env_config_path.as_deref()),
        &home_dir,
    )
    .map_err(exit::invalid_args_err)?;

    let stdout_is_tty = std::io::stdout().is_terminal();
    let stderr_is_tty = std::io::stderr().is_terminal();
    let ui = UiConfig {
        color: stdout_is_tty && cfg.ui.color,
        quiet: cli.quiet,
        verbose: cli.verbose,
        stdout_is_tty,
        stderr_is_tty,
    };

    if let Some(path) = &cfg.config_path {
        ui.note(&format!("config loaded from {path}"));
    }
    if let Ok(dump) = toml::to_string(&cfg) {
        ui.note(&format!("effective config:\n{dump}"));
    }

    let workdir = cli.dir;
    if !workdir.is_dir() {
        return Err(exit::invalid_args(format!(
            "working directory does not exist: {}",
            workdir.display()
        )));
    }

    if cli.skip_download {
        ui.status("Skipping download of apar.csv");
    } else {
        apar::ensure_fresh(&workdir, &cfg.apar, &ui)?;
    }

    let hosts = hosts::discover(&workdir)?;
    ui.note(&format!(
        "discovered {} host(s) in {}",
        hosts.len(),
        workdir.display()
    ));

    let pb = if ui.stderr_is_tty && !ui.quiet && !hosts.is_empty() {
        let pb = indicatif::ProgressBar::new(hosts.len() as u64);
        pb.set_draw_target(indicatif::ProgressDrawTarget::stderr());
        pb.enable_steady_tick(Duration::from_millis(120));
        Some(pb)
    } else {
        None
    };

    // One host at a time, in enumeration order. The first failure stops the
    // whole batch.
    for host in &hosts {
        if let Some(pb) = &pb {
            pb.set_message(host.hostname.clone());
        }

        let stdout = analyzer::analyze(&cfg.analyzer.command, &workdir, host)?;
        let parsed = table::parse(&stdout)
            .with_context(|| format!("bad analyzer output for host {}", host.hostname))?;
        let html = render::render_report(&host.hostname, &parsed)
            .with_context(|| format!("failed to render report for host {}", host.hostname))?;

        let report_path = workdir.join(host.report_filename());
        std::fs::write(&report_path, html)
            .with_context(|| format!("failed to write {}", report_path.display()))?;
        ui.status(&format!("written {}", host.report_filename()));

        if let Some(pb) = &pb {
            pb.inc(1);
        }
    }

    if let Some(pb) = pb {
        pb.finish_and_clear();
    }

    index::write(&workdir)?;
    ui.status("written index.html");

    Ok(())
}
