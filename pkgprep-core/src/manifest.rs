//! Manifest rendering: spec file + template in, filled-in manifest out

use std::fs;
use std::path::PathBuf;

use tracing::{debug, warn};

use crate::error::{require_files, ToolError, ToolResult};
use crate::output::write_replacing;
use crate::specfile::SpecMetadata;
use crate::template::{render_template, unrecognized_tokens, AppLiterals, SubstitutionTable};

/// Everything one manifest render needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestRequest {
    pub spec_path: PathBuf,
    pub origin_path: PathBuf,
    /// Macro name that precedes the package name in `%define <key> <value>`.
    pub package_name_key: String,
    pub literals: AppLiterals,
    pub output_path: PathBuf,
}

/// What a successful render produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedManifest {
    pub metadata: SpecMetadata,
    pub bytes: Vec<u8>,
}

/// Render the manifest described by `req` without touching the output path.
pub fn render_manifest(req: &ManifestRequest) -> ToolResult<RenderedManifest> {
    require_files([req.spec_path.as_path(), req.origin_path.as_path()])?;

    let metadata = SpecMetadata::from_file(&req.spec_path, &req.package_name_key)?;
    let template = fs::read(&req.origin_path).map_err(|e| ToolError::io(&req.origin_path, e))?;

    let table = SubstitutionTable::new(&metadata, &req.literals);
    let bytes = render_template(&template, &table);
    debug!(
        template = %req.origin_path.display(),
        bytes = bytes.len(),
        "rendered template"
    );

    for token in unrecognized_tokens(&bytes) {
        warn!(%token, template = %req.origin_path.display(), "unrecognized placeholder left in output");
    }

    Ok(RenderedManifest { metadata, bytes })
}

/// Render the manifest and write it to `req.output_path`.
///
/// Nothing is written unless both inputs exist and both spec markers are
/// present.
pub fn render(req: &ManifestRequest) -> ToolResult<RenderedManifest> {
    let rendered = render_manifest(req)?;
    write_replacing(&req.output_path, &rendered.bytes)?;
    Ok(rendered)
}
