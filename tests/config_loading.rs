// tests/config_loading.rs

use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use specwatch::config::{config_root_dir, load_and_validate, ConfigProvider};
use specwatch::errors::SpecwatchError;
use specwatch::types::Spec;
use specwatch_test_utils::builders::ConfigFileBuilder;

fn write_config(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "{contents}").unwrap();
    file
}

fn expect_config_error(contents: &str) -> String {
    let file = write_config(contents);
    match load_and_validate(file.path()) {
        Err(SpecwatchError::ConfigError(msg)) => msg,
        Err(e) => panic!("Expected ConfigError, got: {:?}", e),
        Ok(_) => panic!("Expected error, got Ok"),
    }
}

#[test]
fn loads_full_config() {
    let file = write_config(
        r#"
[watch]
files_to_watch = ["lib/**/*.js", "wdio.conf.js"]

[runner]
cmd = "npx mocha"
specs = ["tests/a.js", ["tests/b.js", "tests/c.js"]]
capabilities = [{ browserName = "chrome" }, { browserName = "firefox" }]
"#,
    );

    let cfg = load_and_validate(file.path()).expect("valid config");

    assert_eq!(cfg.runner.cmd, "npx mocha");
    assert_eq!(
        cfg.specs(),
        &[
            Spec::File(PathBuf::from("tests/a.js")),
            Spec::Group(vec![
                PathBuf::from("tests/b.js"),
                PathBuf::from("tests/c.js")
            ]),
        ]
    );
    assert_eq!(cfg.capabilities().len(), 2);
    assert_eq!(
        cfg.capabilities()[1].get("browserName").map(String::as_str),
        Some("firefox")
    );
    assert_eq!(
        cfg.files_to_watch(),
        vec!["lib/**/*.js".to_string(), "wdio.conf.js".to_string()]
    );
}

#[test]
fn watch_section_and_capabilities_are_optional() {
    let file = write_config(
        r#"
[runner]
cmd = "npx mocha"
specs = ["tests/a.js"]
"#,
    );

    let cfg = load_and_validate(file.path()).unwrap();

    assert!(cfg.files_to_watch().is_empty());
    assert_eq!(cfg.capabilities().len(), 1);
    assert!(cfg.capabilities()[0].is_empty());
}

#[test]
fn empty_cmd_is_rejected() {
    let msg = expect_config_error(
        r#"
[runner]
cmd = "  "
specs = ["tests/a.js"]
"#,
    );
    assert!(msg.contains("cmd must not be empty"));
}

#[test]
fn missing_specs_are_rejected() {
    let msg = expect_config_error(
        r#"
[runner]
cmd = "npx mocha"
"#,
    );
    assert!(msg.contains("at least one spec"));
}

#[test]
fn empty_spec_group_is_rejected() {
    let msg = expect_config_error(
        r#"
[runner]
cmd = "npx mocha"
specs = ["tests/a.js", []]
"#,
    );
    assert!(msg.contains("specs[1]"));
}

#[test]
fn empty_capabilities_are_rejected() {
    let msg = expect_config_error(
        r#"
[runner]
cmd = "npx mocha"
specs = ["tests/a.js"]
capabilities = []
"#,
    );
    assert!(msg.contains("capabilities"));
}

#[test]
fn invalid_watch_glob_is_rejected() {
    let msg = expect_config_error(
        r#"
[watch]
files_to_watch = ["lib/[unclosed"]

[runner]
cmd = "npx mocha"
specs = ["tests/a.js"]
"#,
    );
    assert!(msg.contains("lib/[unclosed"));
}

#[test]
fn malformed_toml_is_a_toml_error() {
    let file = write_config("[runner\ncmd = ");
    assert!(matches!(
        load_and_validate(file.path()),
        Err(SpecwatchError::TomlError(_))
    ));
}

#[test]
fn missing_file_is_an_io_error() {
    let result = load_and_validate("/definitely/not/here/Specwatch.toml");
    assert!(matches!(result, Err(SpecwatchError::IoError(_))));
}

#[test]
fn builder_output_passes_validation() {
    let cfg = ConfigFileBuilder::new("npx mocha")
        .spec("tests/a.js")
        .group(&["tests/b.js", "tests/c.js"])
        .file_to_watch("lib/**/*.js")
        .build();

    assert_eq!(cfg.specs().len(), 2);
    assert_eq!(cfg.files_to_watch(), vec!["lib/**/*.js".to_string()]);
}

#[test]
fn builder_without_specs_fails_validation() {
    let raw = ConfigFileBuilder::new("npx mocha").raw();
    assert!(specwatch::config::ConfigFile::try_from(raw).is_err());
}

#[test]
fn root_dir_is_config_parent() {
    assert_eq!(
        config_root_dir(Path::new("ci/Specwatch.toml")),
        PathBuf::from("ci")
    );
    assert_eq!(
        config_root_dir(Path::new("Specwatch.toml")),
        std::env::current_dir().unwrap()
    );
}
