fn main() {
    if let Err(err) = flrt2html::cli::run() {
        flrt2html::ui::eprintln_error(&err);
        std::process::exit(flrt2html::exit::exit_code(&err));
    }
}
