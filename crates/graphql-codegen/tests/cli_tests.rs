use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const SCHEMA_JSON: &str = r#"{
  "__schema": {
    "queryType": { "name": "Query" },
    "mutationType": null,
    "subscriptionType": null,
    "types": [
      {
        "kind": "OBJECT",
        "name": "Query",
        "fields": [
          { "name": "hero", "args": [], "type": { "kind": "OBJECT", "name": "Character", "ofType": null } }
        ],
        "interfaces": []
      },
      {
        "kind": "OBJECT",
        "name": "Character",
        "fields": [
          {
            "name": "name",
            "args": [],
            "type": { "kind": "NON_NULL", "name": null, "ofType": { "kind": "SCALAR", "name": "String", "ofType": null } }
          }
        ],
        "interfaces": []
      },
      { "kind": "SCALAR", "name": "String" }
    ],
    "directives": []
  }
}"#;

fn codegen_cmd() -> Command {
    Command::cargo_bin("graphql-codegen").unwrap()
}

/// A source root with `schema/schema.json` and the given operation files
/// inside `schema/`.
fn project(operation_files: &[(&str, &str)]) -> TempDir {
    let root = TempDir::new().unwrap();
    let schema_dir = root.path().join("schema");
    fs::create_dir_all(&schema_dir).unwrap();
    fs::write(schema_dir.join("schema.json"), SCHEMA_JSON).unwrap();
    for (name, contents) in operation_files {
        fs::write(schema_dir.join(name), contents).unwrap();
    }
    root
}

fn generate_in(root: &Path) -> Command {
    let mut cmd = codegen_cmd();
    cmd.arg("--source-root").arg(root).arg("generate").arg("schema");
    cmd
}

mod arguments {
    use super::*;

    #[test]
    fn no_subcommand_prints_help() {
        codegen_cmd()
            .assert()
            .success()
            .stdout(predicate::str::contains("download-schema"))
            .stdout(predicate::str::contains("generate"));
    }

    #[test]
    fn empty_schema_folder_is_a_usage_error() {
        codegen_cmd()
            .args(["generate", ""])
            .assert()
            .code(2)
            .stderr(predicate::str::contains("must not be empty"));
    }

    #[test]
    fn empty_endpoint_is_a_usage_error() {
        codegen_cmd()
            .args(["download-schema", "schema", ""])
            .assert()
            .code(2);
    }

    #[test]
    fn unparsable_endpoint_is_a_usage_error() {
        codegen_cmd()
            .args(["download-schema", "schema", "not a url"])
            .assert()
            .code(2)
            .stderr(predicate::str::contains("not a valid URL"));
    }

    #[test]
    fn malformed_header_is_a_usage_error() {
        codegen_cmd()
            .args(["download-schema", "schema", "http://localhost/graphql", "--header", "no-colon"])
            .assert()
            .code(2)
            .stderr(predicate::str::contains("NAME:VALUE"));
    }

    #[test]
    fn prefix_format_requires_a_prefix() {
        codegen_cmd()
            .args(["generate", "schema", "--custom-scalar-format", "prefix"])
            .assert()
            .code(2);
    }

    #[test]
    fn malformed_scalar_mapping_is_a_usage_error() {
        codegen_cmd()
            .args(["generate", "schema", "--scalar", "DateTime"])
            .assert()
            .code(2)
            .stderr(predicate::str::contains("NAME=RUST_TYPE"));
    }
}

mod generate {
    use super::*;

    #[test]
    fn writes_single_file() {
        let root = project(&[("hero.graphql", "query HeroName { hero { name } }")]);

        generate_in(root.path())
            .assert()
            .success()
            .stdout(predicate::str::contains("Bound 1 operations"));

        let generated = fs::read_to_string(root.path().join("schema/API.rs")).unwrap();
        assert!(generated.starts_with("// @generated"));
        assert!(generated.contains("pub struct HeroNameQuery;"));
        assert!(generated.contains("pub name: String,"));
    }

    #[test]
    fn regenerating_is_byte_identical() {
        let root = project(&[("hero.graphql", "query HeroName { hero { name } }")]);
        let output = root.path().join("schema/API.rs");

        generate_in(root.path()).assert().success();
        let first = fs::read(&output).unwrap();
        generate_in(root.path()).assert().success();
        let second = fs::read(&output).unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn writes_per_operation_files() {
        let root = project(&[("hero.graphql", "query HeroName { hero { name } }")]);

        generate_in(root.path())
            .args(["--output-format", "per-operation", "--output", "out"])
            .assert()
            .success();

        assert!(root.path().join("out/mod.rs").is_file());
        assert!(root.path().join("out/schema_types.rs").is_file());
        assert!(root.path().join("out/hero_name.rs").is_file());
    }

    #[test]
    fn writes_operation_id_manifest() {
        let root = project(&[("hero.graphql", "query HeroName { hero { name } }")]);

        generate_in(root.path())
            .args(["--operation-ids", "ids.json"])
            .assert()
            .success();

        let manifest = fs::read_to_string(root.path().join("ids.json")).unwrap();
        assert!(manifest.contains("\"name\": \"HeroName\""));
    }

    #[test]
    fn syntax_errors_fail_without_writing_output() {
        let root = project(&[
            ("broken.graphql", "query Broken { hero { name }"),
            ("hero.graphql", "query HeroName { hero { name } }"),
        ]);

        generate_in(root.path())
            .assert()
            .code(1)
            .stderr(predicate::str::contains("broken.graphql:1:"));

        assert!(!root.path().join("schema/API.rs").exists());
    }

    #[test]
    fn unknown_field_names_type_and_field() {
        let root = project(&[("hero.graphql", "query HeroName { hero { nmae } }")]);

        generate_in(root.path())
            .assert()
            .code(1)
            .stderr(predicate::str::contains("type `Character` has no field `nmae`"));
    }

    #[test]
    fn missing_schema_creates_folder_and_fails() {
        let root = TempDir::new().unwrap();

        codegen_cmd()
            .arg("--source-root")
            .arg(root.path())
            .args(["generate", "fresh"])
            .assert()
            .code(1)
            .stderr(predicate::str::contains("schema.json"));

        assert!(root.path().join("fresh").is_dir());
    }
}

mod download_schema {
    use super::*;

    #[test]
    fn unreachable_endpoint_writes_nothing() {
        let root = TempDir::new().unwrap();

        codegen_cmd()
            .arg("--source-root")
            .arg(root.path())
            .args(["download-schema", "schema", "http://127.0.0.1:9/graphql", "--timeout-secs", "2"])
            .assert()
            .code(1)
            .stderr(predicate::str::contains("Schema download failed"));

        assert!(root.path().join("schema").is_dir());
        assert!(!root.path().join("schema/schema.json").exists());
    }
}
