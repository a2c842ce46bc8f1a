use std::io::{self, Write};

use anyhow::Error;

#[derive(Debug, Clone)]
pub struct UiConfig {
    pub color: bool,
    pub quiet: bool,
    pub verbose: bool,
    pub stdout_is_tty: bool,
    pub stderr_is_tty: bool,
}

pub fn eprintln_error(err: &Error) {
    let mut stderr = io::stderr().lock();
    let _ = writeln!(stderr, "error:");
    let _ = writeln!(stderr, "  {err}");

    let mut causes = err.chain().skip(1).peekable();
    if causes.peek().is_some() {
        let _ = writeln!(stderr, "caused by:");
        for cause in causes {
            let _ = writeln!(stderr, "  - {cause}");
        }
    }

    let _ = writeln!(stderr, "next steps:");
    let _ = writeln!(stderr, "  - rerun with `--verbose` for more detail");
    let _ = writeln!(
        stderr,
        "  - see `flrt2html --help` for available options"
    );
}

impl UiConfig {
    pub fn status(&self, message: &str) {
        if self.quiet {
            return;
        }
        println!("{message}");
    }

    pub fn warn(&self, message: &str) {
        if self.quiet {
            return;
        }
        if self.color {
            println!("\x1b[33m{message}\x1b[0m");
        } else {
            println!("{message}");
        }
    }

    pub fn note(&self, message: &str) {
        if !self.verbose || self.quiet {
            return;
        }
        println!("{message}");
    }
}
