//! Binary entrypoint for check-style

fn main() {
    match pkgprep_cli::run_check_style(std::env::args_os()) {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("error: {err:#}");
            std::process::exit(pkgprep_cli::exit_code(&err));
        }
    }
}
