//! Binary entrypoint for inject-encodings

fn main() {
    if let Err(err) = pkgprep_cli::run_inject_encodings(std::env::args_os()) {
        eprintln!("error: {err:#}");
        std::process::exit(pkgprep_cli::exit_code(&err));
    }
}
