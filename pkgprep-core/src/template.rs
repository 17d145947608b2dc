//! Placeholder substitution for manifest templates

use std::collections::BTreeSet;

use regex::bytes::Regex;

use crate::specfile::{find, SpecMetadata};

/// The placeholders a manifest template may contain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Placeholder {
    PackageVersion,
    PackageName,
    AppId,
    PackageExec,
    PackageLabel,
}

impl Placeholder {
    /// Every placeholder, in the order substitutions are applied.
    pub const ALL: [Placeholder; 5] = [
        Placeholder::PackageVersion,
        Placeholder::PackageName,
        Placeholder::AppId,
        Placeholder::PackageExec,
        Placeholder::PackageLabel,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Placeholder::PackageVersion => "PACKAGE_VERSION",
            Placeholder::PackageName => "PACKAGE_NAME",
            Placeholder::AppId => "APP_ID",
            Placeholder::PackageExec => "PACKAGE_EXEC",
            Placeholder::PackageLabel => "PACKAGE_LABEL",
        }
    }

    /// The literal token as it appears in a template, e.g. `@APP_ID@`.
    pub fn token(self) -> &'static str {
        match self {
            Placeholder::PackageVersion => "@PACKAGE_VERSION@",
            Placeholder::PackageName => "@PACKAGE_NAME@",
            Placeholder::AppId => "@APP_ID@",
            Placeholder::PackageExec => "@PACKAGE_EXEC@",
            Placeholder::PackageLabel => "@PACKAGE_LABEL@",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.name() == name)
    }
}

/// Caller-supplied literals substituted verbatim.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppLiterals {
    pub app_id: String,
    pub package_exec: String,
    pub package_label: String,
}

/// Replacement value for each [`Placeholder`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubstitutionTable {
    pub package_version: String,
    pub package_name: String,
    pub app_id: String,
    pub package_exec: String,
    pub package_label: String,
}

impl SubstitutionTable {
    pub fn new(meta: &SpecMetadata, literals: &AppLiterals) -> Self {
        Self {
            package_version: meta.version.clone(),
            package_name: meta.package_name.clone(),
            app_id: literals.app_id.clone(),
            package_exec: literals.package_exec.clone(),
            package_label: literals.package_label.clone(),
        }
    }

    pub fn value(&self, placeholder: Placeholder) -> &str {
        match placeholder {
            Placeholder::PackageVersion => &self.package_version,
            Placeholder::PackageName => &self.package_name,
            Placeholder::AppId => &self.app_id,
            Placeholder::PackageExec => &self.package_exec,
            Placeholder::PackageLabel => &self.package_label,
        }
    }

    /// `(token, replacement)` pairs in application order.
    pub fn entries(&self) -> impl Iterator<Item = (&'static str, &str)> + '_ {
        Placeholder::ALL
            .into_iter()
            .map(move |p| (p.token(), self.value(p)))
    }
}

/// Replace every recognized token in `template`.
///
/// Each placeholder is a global literal replacement, applied one after the
/// other in [`Placeholder::ALL`] order. A replacement value that itself
/// contains a later token is expanded again by that later pass. Bytes outside
/// the tokens are copied unchanged, whatever their encoding.
pub fn render_template(template: &[u8], table: &SubstitutionTable) -> Vec<u8> {
    table
        .entries()
        .fold(template.to_vec(), |text, (token, value)| {
            replace_all(&text, token.as_bytes(), value.as_bytes()).unwrap_or(text)
        })
}

/// `None` when `from` does not occur in `text`.
fn replace_all(text: &[u8], from: &[u8], to: &[u8]) -> Option<Vec<u8>> {
    let mut at = find(text, from)?;
    let mut out = Vec::with_capacity(text.len());
    let mut rest = text;

    loop {
        out.extend_from_slice(&rest[..at]);
        out.extend_from_slice(to);
        rest = &rest[at + from.len()..];
        match find(rest, from) {
            Some(next) => at = next,
            None => break,
        }
    }

    out.extend_from_slice(rest);
    Some(out)
}

/// `@UPPER_CASE@` tokens left in `text` that are not recognized placeholders.
pub fn unrecognized_tokens(text: &[u8]) -> BTreeSet<String> {
    let Ok(re) = Regex::new(r"@([A-Z][A-Z0-9_]*)@") else {
        return BTreeSet::new();
    };

    re.captures_iter(text)
        .filter_map(|caps| caps.get(1))
        .map(|m| String::from_utf8_lossy(m.as_bytes()).into_owned())
        .filter(|name| Placeholder::from_name(name).is_none())
        .map(|name| format!("@{name}@"))
        .collect()
}
