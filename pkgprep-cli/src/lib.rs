//! pkgprep build-step executables

use std::ffi::OsString;
use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::error::ErrorKind;
use clap::{ArgAction, CommandFactory, Parser, ValueHint};
use tracing_subscriber::EnvFilter;

use pkgprep_core::encodings::{inject_file, list_with, EncodingSet};
use pkgprep_core::error::{ToolError, EXIT_FAILURE};
use pkgprep_core::manifest::{render, ManifestRequest};
use pkgprep_core::style::{locate_checker, run_checker};
use pkgprep_core::template::AppLiterals;

/// Environment variable holding the log filter (`tracing_subscriber` syntax).
pub const LOG_ENV: &str = "PKGPREP_LOG";

/// Positional arguments `generate-manifest` takes, no more and no fewer.
pub const MANIFEST_ARG_COUNT: usize = 7;

/// Fill a manifest template from a spec file.
///
/// Every argument is a value, so there are no flags: `--help` or `-v` in the
/// label position is a label.
#[derive(Debug, Parser)]
#[command(
    name = "generate-manifest",
    about = "Substitute package metadata into a manifest template",
    disable_help_flag = true,
    disable_version_flag = true
)]
pub struct GenerateManifestCli {
    /// RPM-style spec file providing `Version:` and `%define <key>`
    #[arg(value_hint = ValueHint::FilePath)]
    spec: PathBuf,

    /// Template containing @PLACEHOLDER@ tokens
    #[arg(value_hint = ValueHint::FilePath)]
    origin: PathBuf,

    /// Macro name whose value is the package name
    package_name_key: String,

    /// Replacement for @APP_ID@
    app_id: String,

    /// Replacement for @PACKAGE_EXEC@
    package_exec: String,

    /// Replacement for @PACKAGE_LABEL@
    package_label: String,

    /// Where to write the rendered manifest
    #[arg(value_hint = ValueHint::FilePath)]
    output: PathBuf,
}

impl GenerateManifestCli {
    fn into_request(self) -> ManifestRequest {
        ManifestRequest {
            spec_path: self.spec,
            origin_path: self.origin,
            package_name_key: self.package_name_key,
            literals: AppLiterals {
                app_id: self.app_id,
                package_exec: self.package_exec,
                package_label: self.package_label,
            },
            output_path: self.output,
        }
    }
}

/// Splice the host's encoding list into a JavaScript module.
#[derive(Debug, Parser)]
#[command(
    name = "inject-encodings",
    version,
    about = "Replace `var encodings = ...` with the supported encoding table"
)]
pub struct InjectEncodingsCli {
    /// JavaScript source containing the `var encodings = ` line
    #[arg(value_hint = ValueHint::FilePath)]
    source: PathBuf,

    /// Generated JavaScript file
    #[arg(value_hint = ValueHint::FilePath)]
    dest: PathBuf,

    /// Read the encoding list from a file instead of running iconv
    #[arg(long = "encodings-file", value_hint = ValueHint::FilePath)]
    encodings_file: Option<PathBuf>,

    /// Program whose `-l` output lists the supported encodings
    #[arg(
        long = "iconv",
        env = "PKGPREP_ICONV",
        default_value = "iconv",
        value_hint = ValueHint::CommandName
    )]
    iconv: OsString,

    /// Log debug details to stderr
    #[arg(short = 'v', long = "verbose", action = ArgAction::SetTrue)]
    verbose: bool,
}

/// Run the coding-style checker that ships next to this executable.
#[derive(Debug, Parser)]
#[command(
    name = "check-style",
    version,
    about = "Run the bundled style checker and propagate its exit status"
)]
pub struct CheckStyleCli {
    /// Checker to run instead of the sibling `style-checker`
    #[arg(long = "checker", env = "PKGPREP_STYLE_CHECKER", value_hint = ValueHint::ExecutablePath)]
    checker: Option<PathBuf>,

    /// Log debug details to stderr
    #[arg(short = 'v', long = "verbose", action = ArgAction::SetTrue)]
    verbose: bool,

    /// Arguments forwarded to the checker
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    args: Vec<OsString>,
}

/// Parse `args`, turning every clap failure except help/version into
/// [`ToolError::Usage`].
pub fn parse_args<T, I, A>(args: I) -> Result<T>
where
    T: Parser,
    I: IntoIterator<Item = A>,
    A: Into<OsString> + Clone,
{
    T::try_parse_from(args).map_err(|err| match err.kind() {
        ErrorKind::DisplayHelp
        | ErrorKind::DisplayVersion
        | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand => err.exit(),
        _ => ToolError::Usage(usage_message(&err)).into(),
    })
}

/// clap's rendered diagnostic without its own `error: ` prefix.
fn usage_message(err: &clap::Error) -> String {
    let rendered = err.render().to_string();
    let trimmed = rendered.trim();
    trimmed.strip_prefix("error: ").unwrap_or(trimmed).to_string()
}

/// Parse the fixed `generate-manifest` argument list.
///
/// The count is checked before clap sees anything, and the values are then
/// passed after `--` so none of them is read as an option.
pub fn parse_manifest_args<I, A>(args: I) -> Result<GenerateManifestCli>
where
    I: IntoIterator<Item = A>,
    A: Into<OsString> + Clone,
{
    let mut args: Vec<OsString> = args.into_iter().map(Into::into).collect();
    let given = args.len().saturating_sub(1);
    if given != MANIFEST_ARG_COUNT {
        let usage = GenerateManifestCli::command().render_usage().to_string();
        let message = format!("expected {MANIFEST_ARG_COUNT} arguments, got {given}\n{usage}");
        return Err(ToolError::Usage(message).into());
    }

    args.insert(1, OsString::from("--"));
    parse_args(args)
}

/// Exit code for an error returned by one of the `run_*` functions.
pub fn exit_code(err: &anyhow::Error) -> i32 {
    err.chain()
        .find_map(|cause| cause.downcast_ref::<ToolError>())
        .map_or(EXIT_FAILURE, ToolError::exit_code)
}

/// Install the stderr logger. Later calls are no-ops.
pub fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

pub fn run_generate_manifest<I, A>(args: I) -> Result<()>
where
    I: IntoIterator<Item = A>,
    A: Into<OsString> + Clone,
{
    let cli = parse_manifest_args(args)?;
    init_logging(false);

    let req = cli.into_request();
    render(&req).with_context(|| format!("generating {}", req.output_path.display()))?;
    Ok(())
}

pub fn run_inject_encodings<I, A>(args: I) -> Result<()>
where
    I: IntoIterator<Item = A>,
    A: Into<OsString> + Clone,
{
    let cli: InjectEncodingsCli = parse_args(args)?;
    init_logging(cli.verbose);

    let raw = match &cli.encodings_file {
        Some(path) => fs::read_to_string(path)
            .map_err(|e| ToolError::io(path, e))
            .context("reading encoding list")?,
        None => list_with(&cli.iconv).context("listing supported encodings")?,
    };
    let encodings = EncodingSet::parse(&raw);
    tracing::debug!(count = encodings.len(), "parsed encoding list");

    inject_file(&cli.source, &cli.dest, &encodings)
        .with_context(|| format!("generating {}", cli.dest.display()))?;
    Ok(())
}

/// Returns the checker's exit code; `Err` only when it could not be run.
pub fn run_check_style<I, A>(args: I) -> Result<i32>
where
    I: IntoIterator<Item = A>,
    A: Into<OsString> + Clone,
{
    let cli: CheckStyleCli = parse_args(args)?;
    init_logging(cli.verbose);

    let checker = locate_checker(cli.checker.as_deref()).context("locating style checker")?;
    let code = run_checker(&checker, &cli.args)?;
    Ok(code)
}
