use std::path::Path;

use mcp_registry_core::commands::{BuildCommand, BuildOptions};
use mcp_registry_core::config::Settings;
use mcp_registry_core::registry::{BuildError, RegistryBuilder, RegistryValidator};
use mcp_registry_core::spec::SpecValidator;
use serde_json::Value;
use tempfile::TempDir;

fn write(root: &Path, relative: &str, content: &str) {
    let path = root.join(relative);
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, content).unwrap();
}

fn read_json(path: &Path) -> Value {
    serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap()
}

const SINGLE_SPEC: &str = r#"{
  "id": "acme/weather-tool",
  "url": "https://github.com/acme/weather-tool",
  "name": "weather-tool",
  "description": "Forecasts",
  "installationMethods": {
    "nodeModule": {"npmPackage": "weather-tool", "envVars": {"API_KEY": "key"}},
    "docker": {"image": "modelcontextprotocol/weather-tool", "envVars": {"API_KEY": "key"}}
  }
}"#;

const KEYED_FILE: &str = r#"{
  "filesystem": {
    "name": "filesystem",
    "description": "Local files",
    "installationMethods": {"docker": {"image": "mcp/filesystem"}}
  },
  "git": {
    "name": "git",
    "description": "Git tools",
    "installationMethods": {"pythonModule": {"pipPackage": "mcp-server-git"}}
  }
}"#;

#[test]
fn build_merges_both_file_shapes() {
    let temp = TempDir::new().unwrap();
    let source = temp.path().join("mcp-servers");
    let output = temp.path().join("build");
    write(&source, "w/weather-tool.json", SINGLE_SPEC);
    write(&source, "core/reference.json", KEYED_FILE);

    let report = RegistryBuilder::new(&source, &output).build().unwrap();

    assert_eq!(report.server_count, 3);
    assert_eq!(report.definition_files.len(), 2);
    assert!(report.duplicates.is_empty());
    assert_eq!(report.checksum.len(), 64);

    let repository = read_json(&output.join("repository.json"));
    let servers = repository["mcpServers"].as_object().unwrap();
    let ids: Vec<&str> = servers.keys().map(String::as_str).collect();
    // sorted file order: core/ before w/
    assert_eq!(ids, vec!["filesystem", "git", "acme/weather-tool"]);
    assert_eq!(
        servers["acme/weather-tool"]["installationMethods"]["docker"]["image"],
        "modelcontextprotocol/weather-tool"
    );

    let index = std::fs::read_to_string(output.join("index.html")).unwrap();
    assert!(index.contains(r#"href="repository.json""#));
    assert!(index.contains("3 server definitions"));
}

#[test]
fn repository_json_is_two_space_indented() {
    let temp = TempDir::new().unwrap();
    let source = temp.path().join("src");
    write(&source, "w/weather-tool.json", SINGLE_SPEC);

    let report = RegistryBuilder::new(&source, temp.path().join("out"))
        .build()
        .unwrap();

    let text = std::fs::read_to_string(&report.repository_path).unwrap();
    assert!(text.starts_with("{\n  \"mcpServers\": {\n    \"acme/weather-tool\": {"));
    assert_eq!(
        report.checksum,
        blake3::hash(text.as_bytes()).to_hex().to_string()
    );
}

#[test]
fn later_duplicate_wins() {
    let temp = TempDir::new().unwrap();
    let source = temp.path().join("src");
    write(
        &source,
        "a.json",
        r#"{"tool": {"name": "old", "installationMethods": {"docker": {"image": "old"}}}}"#,
    );
    write(
        &source,
        "b.json",
        r#"{"tool": {"name": "new", "installationMethods": {"docker": {"image": "new"}}}}"#,
    );

    let report = RegistryBuilder::new(&source, temp.path().join("out"))
        .build()
        .unwrap();

    assert_eq!(report.server_count, 1);
    assert_eq!(report.duplicates, vec!["tool".to_string()]);
    let repository = read_json(&report.repository_path);
    assert_eq!(repository["mcpServers"]["tool"]["name"], "new");
}

#[test]
fn validation_errors_abort_build() {
    let temp = TempDir::new().unwrap();
    let source = temp.path().join("src");
    let output = temp.path().join("out");
    write(&source, "good.json", KEYED_FILE);
    write(
        &source,
        "bad.json",
        r#"{"broken": {"installationMethods": {"nodeModule": {}}}}"#,
    );

    let err = RegistryBuilder::new(&source, &output).build().unwrap_err();
    match err {
        BuildError::ValidationFailed(report) => {
            assert_eq!(report.files_with_errors(), 1);
            let bad = report
                .files
                .iter()
                .find(|f| f.path.ends_with("bad.json"))
                .unwrap();
            let messages: Vec<&str> = bad.errors().map(|i| i.message.as_str()).collect();
            assert_eq!(
                messages,
                vec![
                    "Missing 'name' for server broken",
                    "Missing 'npmPackage' for nodeModule installation method of broken",
                ]
            );
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(!output.join("repository.json").exists());
}

#[test]
fn strict_builder_rejects_node_only_definitions() {
    let temp = TempDir::new().unwrap();
    let source = temp.path().join("src");
    write(
        &source,
        "files.json",
        r#"{"id": "acme/files", "url": "https://github.com/acme/files", "name": "files",
            "installationMethods": {"nodeModule": {"npmPackage": "files"}}}"#,
    );

    let lenient = RegistryBuilder::new(&source, temp.path().join("lenient")).build();
    assert!(lenient.is_ok());

    let strict = RegistryBuilder::new(&source, temp.path().join("strict"))
        .with_validator(RegistryValidator::strict(SpecValidator::strict()))
        .build();
    assert!(matches!(strict, Err(BuildError::ValidationFailed(_))));
}

#[test]
fn build_command_strict_option_applies_spec_rules() {
    let temp = TempDir::new().unwrap();
    let source = temp.path().join("defs");
    write(
        &source,
        "w/weather.json",
        r#"{"id": "acme/weather", "url": "https://github.com/acme/weather", "name": "weather",
            "description": "Forecasts", "installationMethods": {"docker": {"image": "acme/weather"}}}"#,
    );
    let command = BuildCommand::new(Settings::default());

    let lenient = command.execute(
        &BuildOptions::new()
            .with_source_dir(&source)
            .with_output_dir(temp.path().join("lenient")),
    );
    assert!(lenient.is_ok());

    let strict = command.execute(
        &BuildOptions::new()
            .with_source_dir(&source)
            .with_output_dir(temp.path().join("strict"))
            .with_strict(true),
    );
    match strict {
        Err(BuildError::ValidationFailed(report)) => {
            let message = &report.files[0].errors().next().unwrap().message;
            assert!(message.contains("environment variables in docker"));
        }
        other => panic!("unexpected result: {other:?}"),
    }
    assert!(!temp.path().join("strict/repository.json").exists());
}

#[test]
fn empty_source_builds_empty_registry() {
    let temp = TempDir::new().unwrap();
    let output = temp.path().join("out");

    let report = RegistryBuilder::new(temp.path().join("missing"), &output)
        .build()
        .unwrap();

    assert_eq!(report.server_count, 0);
    let repository = read_json(&output.join("repository.json"));
    assert_eq!(repository, serde_json::json!({"mcpServers": {}}));
}

#[test]
fn build_command_uses_option_directories() {
    let temp = TempDir::new().unwrap();
    let source = temp.path().join("defs");
    let output = temp.path().join("public");
    write(&source, "w/weather-tool.json", SINGLE_SPEC);

    let report = BuildCommand::new(Settings::default())
        .execute(
            &BuildOptions::new()
                .with_source_dir(&source)
                .with_output_dir(&output),
        )
        .unwrap();

    assert_eq!(report.output_dir, output);
    assert!(output.join("repository.json").exists());
    assert!(output.join("index.html").exists());
}
