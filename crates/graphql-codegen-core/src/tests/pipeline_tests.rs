use crate::CodegenError;
use crate::CodegenOptions;
use crate::OutputFormat;
use crate::emitter::operation_id;
use crate::pipeline::run_codegen;
use crate::tests::fixtures::star_wars_introspection;
use std::path::Path;
use tempfile::TempDir;

fn schema_folder() -> TempDir {
    let folder = TempDir::new().expect("temp dir");
    std::fs::write(
        folder.path().join("schema.json"),
        star_wars_introspection().to_string(),
    )
    .expect("write schema");
    folder
}

fn write(folder: &Path, relative: &str, contents: &str) {
    let path = folder.join(relative);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).expect("create parent");
    }
    std::fs::write(path, contents).expect("write operation file");
}

fn read(path: &Path) -> String {
    std::fs::read_to_string(path).expect("generated file exists")
}

#[test]
fn generates_single_file_next_to_schema() {
    let folder = schema_folder();
    write(folder.path(), "hero.graphql", "query HeroName { hero { name } }");

    let summary = run_codegen(&CodegenOptions::new(folder.path())).expect("codegen succeeds");

    let output = folder.path().join("API.rs");
    assert_eq!(summary.written_files, vec![output.clone()]);
    assert_eq!(summary.operation_files, 1);
    assert_eq!(summary.operations, 1);
    let contents = read(&output);
    assert!(contents.starts_with("// @generated"));
    assert!(contents.contains("pub mod hero_name {"));
    assert!(contents.contains("pub struct HeroNameQuery;"));
    assert!(contents.contains("pub hero: Option<Hero>,"));
    assert!(contents.contains("pub name: String,"));
    assert!(contents.contains("pub use hero_name::HeroNameQuery;"));
}

#[test]
fn regenerating_is_byte_identical() {
    let folder = schema_folder();
    write(
        folder.path(),
        "ops/hero.graphql",
        "query HeroName($episode: Episode) { hero(episode: $episode) { ...HeroDetails } }",
    );
    write(
        folder.path(),
        "ops/fragments.graphql",
        "fragment HeroDetails on Character { name ... on Human { homePlanet } }",
    );
    write(
        folder.path(),
        "review.graphql",
        "mutation AddReview($review: ReviewInput!) { createReview(review: $review) { stars } }",
    );
    let options = CodegenOptions::new(folder.path());

    run_codegen(&options).expect("first run");
    let first = read(&folder.path().join("API.rs"));
    run_codegen(&options).expect("second run");
    let second = read(&folder.path().join("API.rs"));

    assert_eq!(first, second);
}

#[test]
fn syntax_errors_are_aggregated_and_nothing_is_written() {
    let folder = schema_folder();
    write(folder.path(), "a_valid.graphql", "query Valid { hero { name } }");
    write(folder.path(), "b_broken.graphql", "query Broken { hero { name }");

    let err = run_codegen(&CodegenOptions::new(folder.path())).expect_err("syntax error");

    match err {
        CodegenError::SyntaxErrors(errors) => {
            assert_eq!(errors.len(), 1);
            assert_eq!(errors[0].file_path, folder.path().join("b_broken.graphql"));
        },
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(!folder.path().join("API.rs").exists());
}

#[test]
fn syntax_errors_from_every_file_are_reported_in_path_order() {
    let folder = schema_folder();
    write(folder.path(), "z.graphql", "query Z { hero { name }");
    write(folder.path(), "a.graphql", "query A { hero(episode: ) { name } }");

    let err = run_codegen(&CodegenOptions::new(folder.path())).expect_err("syntax errors");

    let CodegenError::SyntaxErrors(errors) = err else {
        panic!("expected syntax errors");
    };
    let mut files: Vec<_> = errors.iter().map(|error| error.file_path.clone()).collect();
    files.dedup();
    assert_eq!(
        files,
        vec![folder.path().join("a.graphql"), folder.path().join("z.graphql")],
    );
}

#[test]
fn unknown_field_fails_the_run() {
    let folder = schema_folder();
    write(folder.path(), "hero.graphql", "query HeroName { hero { nmae } }");

    let err = run_codegen(&CodegenOptions::new(folder.path())).expect_err("unknown field");

    match err {
        CodegenError::UnknownFieldError { type_name, field_name, location } => {
            assert_eq!(type_name, "Character");
            assert_eq!(field_name, "nmae");
            assert_eq!((location.line, location.column), (1, 25));
        },
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(!folder.path().join("API.rs").exists());
}

#[test]
fn per_operation_output_writes_one_file_per_operation() {
    let folder = schema_folder();
    write(folder.path(), "hero.graphql", "query HeroName { hero { name } }");
    write(folder.path(), "search.graphql", "query Search { search(text: \"r2\") { __typename } }");
    let out_dir = folder.path().join("generated");
    let mut options = CodegenOptions::new(folder.path());
    options.output_format = OutputFormat::PerOperation(out_dir.clone());

    let summary = run_codegen(&options).expect("codegen succeeds");

    assert_eq!(
        summary.written_files,
        vec![
            out_dir.join("mod.rs"),
            out_dir.join("schema_types.rs"),
            out_dir.join("hero_name.rs"),
            out_dir.join("search.rs"),
        ],
    );
    let module = read(&out_dir.join("mod.rs"));
    assert!(module.contains("pub mod schema_types;"));
    assert!(module.contains("pub mod hero_name;"));
    assert!(module.contains("pub use search::SearchQuery;"));
    assert!(read(&out_dir.join("schema_types.rs")).contains("pub trait GraphQLOperation"));
    assert!(read(&out_dir.join("search.rs")).contains("pub struct SearchQuery;"));
    assert!(!folder.path().join("API.rs").exists());
}

#[test]
fn regenerating_removes_modules_of_renamed_operations() {
    let folder = schema_folder();
    write(folder.path(), "hero.graphql", "query HeroName { hero { name } }");
    let out_dir = folder.path().join("generated");
    let mut options = CodegenOptions::new(folder.path());
    options.output_format = OutputFormat::PerOperation(out_dir.clone());
    run_codegen(&options).expect("first run succeeds");
    write(&out_dir, "helpers.rs", "pub fn helper() {}\n");

    write(folder.path(), "hero.graphql", "query HeroSummary { hero { name } }");
    run_codegen(&options).expect("second run succeeds");

    assert!(!out_dir.join("hero_name.rs").exists());
    assert!(out_dir.join("hero_summary.rs").exists());
    assert_eq!(read(&out_dir.join("helpers.rs")), "pub fn helper() {}\n");
    assert!(!read(&out_dir.join("mod.rs")).contains("hero_name"));
}

#[test]
fn manifest_maps_operation_ids_to_documents() {
    let folder = schema_folder();
    write(folder.path(), "hero.graphql", "query HeroName { hero { name } }");
    let manifest_path = folder.path().join("operation_ids.json");
    let mut options = CodegenOptions::new(folder.path());
    options.operation_ids_path = Some(manifest_path.clone());

    run_codegen(&options).expect("codegen succeeds");

    let manifest: serde_json::Value =
        serde_json::from_str(&read(&manifest_path)).expect("manifest is JSON");
    let document = "query HeroName {\n  hero {\n    name\n  }\n}\n";
    let entry = &manifest[operation_id(document).as_str()];
    assert_eq!(entry["name"], "HeroName");
    assert_eq!(entry["source"], document);
}

#[test]
fn discovery_is_recursive_and_honors_extensions() {
    let folder = schema_folder();
    write(folder.path(), "nested/deeper/hero.gql", "query HeroName { hero { name } }");
    write(folder.path(), "ignored.graphql", "this is not parsed");
    write(folder.path(), "notes.txt", "neither is this");
    let mut options = CodegenOptions::new(folder.path());
    options.graphql_file_extensions = vec!["gql".to_string()];

    let summary = run_codegen(&options).expect("codegen succeeds");

    assert_eq!(summary.operation_files, 1);
    assert!(read(&folder.path().join("API.rs")).contains("HeroNameQuery"));
}

#[test]
fn anonymous_operation_is_named_after_its_file() {
    let folder = schema_folder();
    write(folder.path(), "hero_summary.graphql", "{ hero { name } }");

    run_codegen(&CodegenOptions::new(folder.path())).expect("codegen succeeds");

    let contents = read(&folder.path().join("API.rs"));
    assert!(contents.contains("pub const OPERATION_NAME: &str = \"HeroSummary\";"));
    assert!(contents.contains("pub struct HeroSummaryQuery;"));
}

#[test]
fn missing_schema_file_is_a_parse_error() {
    let folder = TempDir::new().expect("temp dir");
    write(folder.path(), "hero.graphql", "query HeroName { hero { name } }");

    let err = run_codegen(&CodegenOptions::new(folder.path())).expect_err("no schema");

    assert!(matches!(err, CodegenError::SchemaParseError { .. }), "{err:?}");
}

#[test]
fn non_utf8_operation_file_is_reported() {
    let folder = schema_folder();
    std::fs::write(folder.path().join("bad.graphql"), [0xff, 0xfe, 0x00]).expect("write");

    let err = run_codegen(&CodegenOptions::new(folder.path())).expect_err("not utf-8");

    match err {
        CodegenError::OperationFileError { path, .. } => {
            assert_eq!(path, folder.path().join("bad.graphql"));
        },
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn duplicate_operation_names_across_files_fail() {
    let folder = schema_folder();
    write(folder.path(), "a.graphql", "query Hero { hero { name } }");
    write(folder.path(), "b.graphql", "query Hero { hero { id } }");

    let err = run_codegen(&CodegenOptions::new(folder.path())).expect_err("duplicate");

    assert!(
        matches!(&err, CodegenError::DuplicateDefinition { name, .. } if name == "Hero"),
        "{err:?}",
    );
}
