//! Binary entrypoint for generate-manifest

fn main() {
    if let Err(err) = pkgprep_cli::run_generate_manifest(std::env::args_os()) {
        eprintln!("error: {err:#}");
        std::process::exit(pkgprep_cli::exit_code(&err));
    }
}
