use anyhow::{anyhow, Result};
use reqwest::{
    Client,
    header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_RANGE, CONTENT_TYPE},
    Method, Response,
};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, error};

use shared_config::AppConfig;

/// SQLSTATE raised by Postgres when an exclusion constraint rejects a row.
pub const EXCLUSION_VIOLATION: &str = "23P01";
/// SQLSTATE raised by Postgres on a unique constraint violation.
pub const UNIQUE_VIOLATION: &str = "23505";

#[derive(Error, Debug)]
pub enum SupabaseError {
    #[error("Authentication error: {0}")]
    Unauthorized(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Constraint violation ({code}): {message}")]
    Conflict { code: String, message: String },

    #[error("API error ({status}): {body}")]
    Api { status: u16, body: String },
}

impl SupabaseError {
    pub fn is_exclusion_violation(&self) -> bool {
        matches!(self, SupabaseError::Conflict { code, .. } if code == EXCLUSION_VIOLATION)
    }

    pub fn is_unique_violation(&self) -> bool {
        matches!(self, SupabaseError::Conflict { code, .. } if code == UNIQUE_VIOLATION)
    }

    /// Looks through an `anyhow` chain for a store error.
    pub fn find(err: &anyhow::Error) -> Option<&SupabaseError> {
        err.downcast_ref::<SupabaseError>()
    }
}

#[derive(Debug, Deserialize)]
struct PostgrestErrorBody {
    code: Option<String>,
    message: Option<String>,
}

pub struct SupabaseClient {
    client: Client,
    base_url: String,
    service_key: String,
}

impl SupabaseClient {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            client: Client::new(),
            base_url: config.supabase_url.trim_end_matches('/').to_string(),
            service_key: config.supabase_service_key.clone(),
        }
    }

    fn get_headers(&self, auth_token: Option<&str>) -> HeaderMap {
        let mut headers = HeaderMap::new();

        if let Ok(key) = HeaderValue::from_str(&self.service_key) {
            headers.insert("apikey", key);
        }
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let bearer = auth_token.unwrap_or(&self.service_key);
        if let Ok(value) = HeaderValue::from_str(&format!("Bearer {}", bearer)) {
            headers.insert(AUTHORIZATION, value);
        }

        headers
    }

    pub async fn request<T>(&self, method: Method, path: &str,
                            auth_token: Option<&str>, body: Option<Value>)
                            -> Result<T>
    where T: DeserializeOwned {
        self.request_with_headers(method, path, auth_token, body, None).await
    }

    pub async fn request_with_headers<T>(&self, method: Method, path: &str,
                                         auth_token: Option<&str>, body: Option<Value>,
                                         extra_headers: Option<HeaderMap>)
                                         -> Result<T>
    where T: DeserializeOwned {
        let response = self.send(method, path, auth_token, body, extra_headers).await?;
        let data = response.json::<T>().await?;
        Ok(data)
    }

    async fn send(&self, method: Method, path: &str,
                  auth_token: Option<&str>, body: Option<Value>,
                  extra_headers: Option<HeaderMap>)
                  -> Result<Response> {
        let url = format!("{}{}", self.base_url, path);
        debug!("Making {} request to {}", method, url);

        let mut headers = self.get_headers(auth_token);
        if let Some(extra) = extra_headers {
            headers.extend(extra);
        }

        let mut req = self.client.request(method, &url)
            .headers(headers);

        if let Some(body_data) = body {
            req = req.json(&body_data);
        }

        let response = req.send().await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await?;
            error!("API error ({}): {}", status, error_text);

            let err = match status.as_u16() {
                401 | 403 => SupabaseError::Unauthorized(error_text),
                404 => SupabaseError::NotFound(error_text),
                409 => {
                    let parsed: Option<PostgrestErrorBody> = serde_json::from_str(&error_text).ok();
                    let code = parsed.as_ref().and_then(|b| b.code.clone()).unwrap_or_default();
                    let message = parsed.and_then(|b| b.message).unwrap_or(error_text);
                    SupabaseError::Conflict { code, message }
                }
                other => SupabaseError::Api { status: other, body: error_text },
            };
            return Err(err.into());
        }

        Ok(response)
    }

    fn representation_headers() -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert("Prefer", HeaderValue::from_static("return=representation"));
        headers
    }

    fn table_path(table: &str, query: &str) -> String {
        if query.is_empty() {
            format!("/rest/v1/{}", table)
        } else {
            format!("/rest/v1/{}?{}", table, query)
        }
    }

    pub async fn select<T>(&self, table: &str, query: &str) -> Result<Vec<T>>
    where T: DeserializeOwned {
        let rows: Vec<Value> = self.request(
            Method::GET,
            &Self::table_path(table, query),
            None,
            None,
        ).await?;

        rows.into_iter()
            .map(|row| serde_json::from_value(row).map_err(|e| anyhow!("Failed to parse {} row: {}", table, e)))
            .collect()
    }

    pub async fn select_one<T>(&self, table: &str, query: &str) -> Result<Option<T>>
    where T: DeserializeOwned {
        let mut rows: Vec<T> = self.select(table, query).await?;
        if rows.is_empty() {
            Ok(None)
        } else {
            Ok(Some(rows.swap_remove(0)))
        }
    }

    pub async fn insert<T>(&self, table: &str, body: Value) -> Result<T>
    where T: DeserializeOwned {
        let mut rows: Vec<T> = self.request_with_headers(
            Method::POST,
            &Self::table_path(table, ""),
            None,
            Some(body),
            Some(Self::representation_headers()),
        ).await?;

        if rows.is_empty() {
            return Err(anyhow!("Insert into {} returned no rows", table));
        }
        Ok(rows.swap_remove(0))
    }

    pub async fn patch<T>(&self, table: &str, query: &str, body: Value) -> Result<Option<T>>
    where T: DeserializeOwned {
        let mut rows: Vec<T> = self.request_with_headers(
            Method::PATCH,
            &Self::table_path(table, query),
            None,
            Some(body),
            Some(Self::representation_headers()),
        ).await?;

        if rows.is_empty() {
            Ok(None)
        } else {
            Ok(Some(rows.swap_remove(0)))
        }
    }

    /// Deletes matching rows and returns how many were removed.
    pub async fn delete(&self, table: &str, query: &str) -> Result<usize> {
        let rows: Vec<Value> = self.request_with_headers(
            Method::DELETE,
            &Self::table_path(table, query),
            None,
            None,
            Some(Self::representation_headers()),
        ).await?;

        Ok(rows.len())
    }

    /// Exact row count for `query`, read from the `Content-Range` total.
    pub async fn count(&self, table: &str, query: &str) -> Result<u64> {
        let mut headers = HeaderMap::new();
        headers.insert("Prefer", HeaderValue::from_static("count=exact"));

        let query = if query.is_empty() {
            "select=id&limit=1".to_string()
        } else {
            format!("select=id&limit=1&{}", query)
        };
        let response = self.send(
            Method::GET,
            &Self::table_path(table, &query),
            None,
            None,
            Some(headers),
        ).await?;

        let range = response
            .headers()
            .get(CONTENT_RANGE)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| anyhow!("Count on {} returned no Content-Range", table))?;
        parse_content_range_total(range)
            .ok_or_else(|| anyhow!("Unexpected Content-Range from {}: {}", table, range))
    }

    pub fn get_base_url(&self) -> &str {
        &self.base_url
    }
}

/// `0-0/42` and `*/0` both carry the total after the slash.
fn parse_content_range_total(range: &str) -> Option<u64> {
    range.rsplit_once('/')?.1.trim().parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> SupabaseClient {
        let config = AppConfig {
            supabase_url: server.uri(),
            supabase_service_key: "service-key".to_string(),
            ..AppConfig::default()
        };
        SupabaseClient::new(&config)
    }

    #[tokio::test]
    async fn test_select_one_sends_service_key() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rest/v1/clients"))
            .and(query_param("id", "eq.3"))
            .and(header("apikey", "service-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([{ "id": 3 }])))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let row: Option<Value> = client.select_one("clients", "id=eq.3").await.unwrap();
        assert_eq!(row.unwrap()["id"], 3);
    }

    #[tokio::test]
    async fn test_select_one_empty_is_none() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rest/v1/clients"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let row: Option<Value> = client.select_one("clients", "id=eq.99").await.unwrap();
        assert!(row.is_none());
    }

    #[tokio::test]
    async fn test_exclusion_violation_is_typed() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/rest/v1/staff_assignments"))
            .respond_with(ResponseTemplate::new(409).set_body_json(json!({
                "code": "23P01",
                "message": "conflicting key value violates exclusion constraint \"staff_assignments_no_overlap\"",
                "details": null,
                "hint": null
            })))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let err = client
            .insert::<Value>("staff_assignments", json!({ "client_id": 1 }))
            .await
            .unwrap_err();

        let store_err = SupabaseError::find(&err).expect("typed store error");
        assert!(store_err.is_exclusion_violation());
        assert!(!store_err.is_unique_violation());
    }

    #[tokio::test]
    async fn test_delete_counts_rows() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/rest/v1/documents"))
            .and(header("Prefer", "return=representation"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([{ "id": 1 }])))
            .mount(&server)
            .await;

        let client = client_for(&server);
        assert_eq!(client.delete("documents", "id=eq.1").await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_count_reads_content_range_total() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rest/v1/appointments"))
            .and(query_param("select", "id"))
            .and(header("Prefer", "count=exact"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("Content-Range", "0-0/42")
                    .set_body_json(json!([{ "id": 1 }])),
            )
            .mount(&server)
            .await;

        let client = client_for(&server);
        assert_eq!(client.count("appointments", "").await.unwrap(), 42);
    }

    #[test]
    fn test_content_range_parsing() {
        assert_eq!(parse_content_range_total("0-0/42"), Some(42));
        assert_eq!(parse_content_range_total("*/0"), Some(0));
        assert_eq!(parse_content_range_total("0-9/*"), None);
        assert_eq!(parse_content_range_total("garbage"), None);
    }
}
