//! pkgprep-core: the small build steps that dress a package for shipping
//!
//! A packaging pipeline needs a handful of generated files that nobody
//! wants to keep in sync by hand. This crate holds the logic behind each
//! step; the `pkgprep-cli` crate wraps every step in its own executable so
//! build systems can call them independently.
//!
//! ## The Steps
//!
//! **Manifests** ([`manifest`]): read the `Version:` line and a
//! `%define <key> <name>` macro from an RPM-style spec file, then fill the
//! `@PACKAGE_VERSION@`, `@PACKAGE_NAME@`, `@APP_ID@`, `@PACKAGE_EXEC@` and
//! `@PACKAGE_LABEL@` tokens of a manifest template.
//!
//! **Encodings** ([`encodings`]): turn the host's `iconv -l` listing into a
//! JSON table and splice it into a JavaScript module's
//! `var encodings = ...` line.
//!
//! **Style checks** ([`style`]): find the style checker that ships next to
//! the wrapper and hand it the terminal, propagating its exit status.
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::path::PathBuf;
//! use pkgprep_core::manifest::{render, ManifestRequest};
//! use pkgprep_core::template::AppLiterals;
//!
//! let req = ManifestRequest {
//!     spec_path: PathBuf::from("packaging/demo.spec"),
//!     origin_path: PathBuf::from("packaging/manifest.xml.in"),
//!     package_name_key: "package_name".into(),
//!     literals: AppLiterals {
//!         app_id: "org.example.demo".into(),
//!         package_exec: "/usr/bin/demo".into(),
//!         package_label: "Demo".into(),
//!     },
//!     output_path: PathBuf::from("out/manifest.xml"),
//! };
//!
//! let rendered = render(&req)?;
//! println!("{} {}", rendered.metadata.package_name, rendered.metadata.version);
//! #
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Failure
//!
//! Every step fails fast with a [`error::ToolError`], whose
//! [`exit_code`](error::ToolError::exit_code) maps missing inputs to
//! `ENOENT` and bad invocations to `EINVAL`. Output files are replaced
//! atomically, so an aborted step never leaves a truncated file behind.

pub mod encodings;
pub mod error;
pub mod manifest;
pub mod output;
pub mod specfile;
pub mod style;
pub mod template;
