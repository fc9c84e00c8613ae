//! Downloads a schema by POSTing the introspection query to a live
//! endpoint.

use crate::CodegenError;
use crate::SchemaDownloadOptions;
use crate::SchemaValidationError;
use crate::schema::SchemaDocument;
use crate::schema::introspection::GraphQLResponseError;
use crate::schema::introspection::IntrospectionRequest;
use crate::schema::introspection::IntrospectionSchema;
use reqwest::StatusCode;
use reqwest::header::HeaderMap;
use reqwest::header::HeaderName;
use reqwest::header::HeaderValue;
use tracing::debug;
use tracing::info;
use tracing::warn;

/// A failed attempt, and whether trying again might help.
struct AttemptError {
    error: CodegenError,
    transient: bool,
}

impl AttemptError {
    fn transient(error: CodegenError) -> Self {
        Self {
            error,
            transient: true,
        }
    }

    fn permanent(error: CodegenError) -> Self {
        Self {
            error,
            transient: false,
        }
    }
}

pub struct SchemaFetcher {
    client: reqwest::Client,
    options: SchemaDownloadOptions,
}

impl SchemaFetcher {
    pub fn new(options: SchemaDownloadOptions) -> crate::Result<Self> {
        let mut headers = HeaderMap::new();
        for (name, value) in &options.headers {
            let invalid = |what: &str| CodegenError::NetworkError {
                url: options.endpoint.to_string(),
                message: format!("invalid header {what} in `{name}: {value}`"),
            };
            let header_name =
                HeaderName::try_from(name.as_str()).map_err(|_| invalid("name"))?;
            let header_value =
                HeaderValue::try_from(value.as_str()).map_err(|_| invalid("value"))?;
            headers.append(header_name, header_value);
        }

        let mut builder = reqwest::Client::builder().default_headers(headers);
        if let Some(timeout) = options.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(|err| CodegenError::NetworkError {
            url: options.endpoint.to_string(),
            message: err.to_string(),
        })?;
        Ok(Self { client, options })
    }

    /// Runs the introspection query, retrying transient failures as the
    /// options allow, and validates the result.
    pub async fn fetch(&self) -> crate::Result<SchemaDocument> {
        let mut backoff = self.options.retry_backoff;
        let mut attempt = 0;
        loop {
            match self.attempt().await {
                Ok(schema) => {
                    info!("fetched schema from {}", self.options.endpoint);
                    return Ok(SchemaDocument::from_introspection(&schema)?);
                },
                Err(failure) if failure.transient && attempt < self.options.max_retries => {
                    attempt += 1;
                    warn!(
                        "introspection attempt {attempt} failed ({}); retrying in {backoff:?}",
                        failure.error,
                    );
                    tokio::time::sleep(backoff).await;
                    backoff *= 2;
                },
                Err(failure) => return Err(failure.error),
            }
        }
    }

    async fn attempt(&self) -> Result<IntrospectionSchema, AttemptError> {
        let url = self.options.endpoint.to_string();
        debug!("POST {url}");
        let network_error = |err: reqwest::Error| {
            let transient = err.is_timeout() || err.is_connect();
            let error = CodegenError::NetworkError {
                url: url.clone(),
                message: err.to_string(),
            };
            AttemptError { error, transient }
        };

        let response = self
            .client
            .post(self.options.endpoint.clone())
            .json(&IntrospectionRequest::default())
            .send()
            .await
            .map_err(network_error)?;
        let status = response.status();
        let body = response.text().await.map_err(network_error)?;

        if status != StatusCode::OK {
            let error = CodegenError::SchemaFetchError {
                url: url.clone(),
                status: Some(status.as_u16()),
                message: summarize_body(&body),
            };
            return Err(if status.is_server_error() {
                AttemptError::transient(error)
            } else {
                AttemptError::permanent(error)
            });
        }

        parse_introspection_response(&url, &body).map_err(AttemptError::permanent)
    }
}

/// Interprets the body of a `200 OK` introspection response.
pub(crate) fn parse_introspection_response(
    url: &str,
    body: &str,
) -> crate::Result<IntrospectionSchema> {
    let fetch_error = |message: String| CodegenError::SchemaFetchError {
        url: url.to_string(),
        status: Some(StatusCode::OK.as_u16()),
        message,
    };
    let mut value: serde_json::Value = serde_json::from_str(body)
        .map_err(|err| fetch_error(format!("response is not JSON ({err})")))?;

    let data_is_null = value.get("data").is_none_or(serde_json::Value::is_null);
    if data_is_null && let Some(errors) = value.get("errors") {
        let errors: Vec<GraphQLResponseError> = serde_json::from_value(errors.clone())
            .map_err(|err| fetch_error(format!("malformed `errors` array ({err})")))?;
        let messages: Vec<String> = errors.into_iter().map(|error| error.message).collect();
        return Err(fetch_error(format!(
            "server returned errors: {}",
            messages.join("; "),
        )));
    }

    let schema_value = value
        .get_mut("data")
        .and_then(|data| data.get_mut("__schema"))
        .map(serde_json::Value::take)
        .ok_or_else(|| {
            SchemaValidationError::MissingIntrospectionField("data.__schema".to_string())
        })?;
    let schema = serde_json::from_value(schema_value)
        .map_err(|err| SchemaValidationError::MalformedIntrospection(err.to_string()))?;
    Ok(schema)
}

/// The start of a response body, for error messages.
fn summarize_body(body: &str) -> String {
    const MAX_CHARS: usize = 200;
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return "empty response body".to_string();
    }
    let mut summary: String = trimmed.chars().take(MAX_CHARS).collect();
    if trimmed.chars().count() > MAX_CHARS {
        summary.push_str("...");
    }
    summary
}
