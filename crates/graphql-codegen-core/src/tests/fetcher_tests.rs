use crate::CodegenError;
use crate::SchemaDownloadOptions;
use crate::SchemaValidationError;
use crate::pipeline::download_schema;
use crate::schema::load_schema_file;
use crate::tests::fixtures::star_wars_introspection;
use crate::tests::fixtures::star_wars_schema;
use serde_json::json;
use std::time::Duration;
use tempfile::TempDir;
use url::Url;
use wiremock::Mock;
use wiremock::MockServer;
use wiremock::ResponseTemplate;
use wiremock::matchers::body_partial_json;
use wiremock::matchers::header;
use wiremock::matchers::method;
use wiremock::matchers::path;

fn options_for(server: &MockServer, folder: &TempDir) -> SchemaDownloadOptions {
    let endpoint = Url::parse(&format!("{}/graphql", server.uri())).expect("valid url");
    let mut options = SchemaDownloadOptions::new(endpoint, folder.path());
    options.retry_backoff = Duration::from_millis(10);
    options
}

fn introspection_response() -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({ "data": star_wars_introspection() }))
}

#[tokio::test]
async fn download_writes_schema_file_that_loads_back() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/graphql"))
        .and(body_partial_json(json!({ "operationName": "IntrospectionQuery" })))
        .respond_with(introspection_response())
        .expect(1)
        .mount(&server)
        .await;
    let folder = TempDir::new().expect("temp dir");

    let written = download_schema(&options_for(&server, &folder))
        .await
        .expect("download succeeds");

    assert_eq!(written, folder.path().join("schema.json"));
    let loaded = load_schema_file(&written).expect("persisted schema loads");
    assert_eq!(loaded, star_wars_schema());

    let text = std::fs::read_to_string(&written).expect("schema file exists");
    let value: serde_json::Value = serde_json::from_str(&text).expect("schema file is JSON");
    assert!(value["data"]["__schema"]["types"].is_array());
}

#[tokio::test]
async fn download_sends_custom_headers() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(header("authorization", "Bearer secret"))
        .and(header("x-client", "codegen"))
        .respond_with(introspection_response())
        .expect(1)
        .mount(&server)
        .await;
    let folder = TempDir::new().expect("temp dir");
    let mut options = options_for(&server, &folder);
    options.headers = vec![
        ("Authorization".to_string(), "Bearer secret".to_string()),
        ("X-Client".to_string(), "codegen".to_string()),
    ];

    download_schema(&options).await.expect("download succeeds");
}

#[tokio::test]
async fn custom_schema_file_name_is_used() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(introspection_response())
        .mount(&server)
        .await;
    let folder = TempDir::new().expect("temp dir");
    let mut options = options_for(&server, &folder);
    options.schema_file_name = "starwars.json".to_string();

    let written = download_schema(&options).await.expect("download succeeds");

    assert_eq!(written, folder.path().join("starwars.json"));
    assert!(!folder.path().join("schema.json").exists());
}

#[tokio::test]
async fn timeout_leaves_missing_schema_file_missing() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(introspection_response().set_delay(Duration::from_secs(5)))
        .mount(&server)
        .await;
    let folder = TempDir::new().expect("temp dir");
    let mut options = options_for(&server, &folder);
    options.timeout = Some(Duration::from_millis(200));

    let err = download_schema(&options).await.expect_err("request times out");

    assert!(matches!(err, CodegenError::NetworkError { .. }), "{err:?}");
    assert!(!folder.path().join("schema.json").exists());
}

#[tokio::test]
async fn timeout_leaves_existing_schema_file_untouched() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(introspection_response().set_delay(Duration::from_secs(5)))
        .mount(&server)
        .await;
    let folder = TempDir::new().expect("temp dir");
    let schema_path = folder.path().join("schema.json");
    std::fs::write(&schema_path, "previous contents").expect("seed schema file");
    let mut options = options_for(&server, &folder);
    options.timeout = Some(Duration::from_millis(200));

    download_schema(&options).await.expect_err("request times out");

    let contents = std::fs::read_to_string(&schema_path).expect("schema file still exists");
    assert_eq!(contents, "previous contents");
}

#[tokio::test]
async fn server_error_is_retried() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503).set_body_string("try later"))
        .up_to_n_times(1)
        .with_priority(1)
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .respond_with(introspection_response())
        .expect(1)
        .mount(&server)
        .await;
    let folder = TempDir::new().expect("temp dir");
    let mut options = options_for(&server, &folder);
    options.max_retries = 1;

    download_schema(&options).await.expect("second attempt succeeds");

    assert!(folder.path().join("schema.json").exists());
}

#[tokio::test]
async fn server_error_without_retries_fails_with_status() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;
    let folder = TempDir::new().expect("temp dir");

    let err = download_schema(&options_for(&server, &folder))
        .await
        .expect_err("server error");

    match err {
        CodegenError::SchemaFetchError { status, message, .. } => {
            assert_eq!(status, Some(500));
            assert_eq!(message, "boom");
        },
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(!folder.path().join("schema.json").exists());
}

#[tokio::test]
async fn client_error_is_not_retried() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;
    let folder = TempDir::new().expect("temp dir");
    let mut options = options_for(&server, &folder);
    options.max_retries = 3;

    let err = download_schema(&options).await.expect_err("unauthorized");

    assert!(
        matches!(err, CodegenError::SchemaFetchError { status: Some(401), .. }),
        "{err:?}",
    );
}

#[tokio::test]
async fn graphql_errors_are_reported() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": null,
            "errors": [{ "message": "introspection is disabled" }],
        })))
        .mount(&server)
        .await;
    let folder = TempDir::new().expect("temp dir");

    let err = download_schema(&options_for(&server, &folder))
        .await
        .expect_err("server refused");

    assert!(err.to_string().contains("introspection is disabled"), "{err}");
    assert!(!folder.path().join("schema.json").exists());
}

#[tokio::test]
async fn missing_schema_in_response_is_a_validation_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": {} })))
        .mount(&server)
        .await;
    let folder = TempDir::new().expect("temp dir");

    let err = download_schema(&options_for(&server, &folder))
        .await
        .expect_err("no schema");

    match err {
        CodegenError::SchemaValidationError(SchemaValidationError::MissingIntrospectionField(
            field,
        )) => assert_eq!(field, "data.__schema"),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn non_json_response_is_a_fetch_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>hello</html>"))
        .mount(&server)
        .await;
    let folder = TempDir::new().expect("temp dir");

    let err = download_schema(&options_for(&server, &folder))
        .await
        .expect_err("not json");

    assert!(
        matches!(err, CodegenError::SchemaFetchError { status: Some(200), .. }),
        "{err:?}",
    );
}

#[tokio::test]
async fn invalid_schema_is_not_persisted() {
    let server = MockServer::start().await;
    let mut schema = star_wars_introspection();
    schema["__schema"]["queryType"] = json!({ "name": "Missing" });
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": schema })))
        .mount(&server)
        .await;
    let folder = TempDir::new().expect("temp dir");

    let err = download_schema(&options_for(&server, &folder))
        .await
        .expect_err("invalid schema");

    assert!(matches!(err, CodegenError::SchemaValidationError(_)), "{err:?}");
    assert!(!folder.path().join("schema.json").exists());
}

#[test]
fn invalid_header_name_is_rejected() {
    let endpoint = Url::parse("http://localhost:1/graphql").expect("valid url");
    let mut options = SchemaDownloadOptions::new(endpoint, "unused");
    options.headers = vec![("bad header".to_string(), "x".to_string())];

    let err = crate::fetcher::SchemaFetcher::new(options)
        .err()
        .expect("header name with a space is invalid");

    assert!(err.to_string().contains("invalid header name"), "{err}");
}
