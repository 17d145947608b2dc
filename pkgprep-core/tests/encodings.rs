use std::fs;

use pkgprep_core::encodings::{inject_file, EncodingSet};
use pkgprep_core::error::ToolError;

const SOURCE: &str = "\
// Generated at build time.
var encodings = {};

exports.isSupported = function (name) {
  return encodings.hasOwnProperty(name);
};
";

#[test]
fn injects_into_a_js_module_on_disk() {
    let temp = tempfile::tempdir().expect("tempdir");
    let src = temp.path().join("filesystem_api.js");
    let dest = temp.path().join("filesystem_api.gen.js");
    fs::write(&src, SOURCE).unwrap();

    let set = EncodingSet::parse("UTF-8//\nISO-8859-1//\nLATIN1/ISO-8859-1//\n");
    inject_file(&src, &dest, &set).expect("inject");

    let out = fs::read_to_string(&dest).unwrap();
    let lines: Vec<&str> = out.lines().collect();
    assert_eq!(lines.len(), SOURCE.lines().count());
    assert_eq!(
        lines[1],
        r#"var encodings = {"ISO-8859-1":1,"LATIN1":1,"UTF-8":1};"#
    );
    assert!(out.ends_with("};\n"));
}

#[test]
fn missing_source_is_not_found() {
    let temp = tempfile::tempdir().expect("tempdir");
    let err = inject_file(
        &temp.path().join("absent.js"),
        &temp.path().join("out.js"),
        &EncodingSet::parse("UTF-8//"),
    )
    .unwrap_err();

    assert!(matches!(err, ToolError::NotFound { .. }));
    assert!(!temp.path().join("out.js").exists());
}

#[test]
fn empty_encoding_list_is_rejected() {
    let temp = tempfile::tempdir().expect("tempdir");
    let src = temp.path().join("a.js");
    fs::write(&src, SOURCE).unwrap();

    let err = inject_file(&src, &temp.path().join("b.js"), &EncodingSet::default()).unwrap_err();
    assert!(matches!(err, ToolError::EmptyEncodingList));
}
