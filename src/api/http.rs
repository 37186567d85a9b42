//! HTTP Task Service
//!
//! `TaskService` over the backend's REST collection endpoint.

use async_trait::async_trait;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use super::TaskService;
use crate::error::{SyncError, SyncResult};
use crate::models::{Task, TaskId};

/// Everything but RFC 3986 unreserved characters is escaped inside a segment.
const PATH_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

#[derive(Serialize)]
struct CreateTaskArgs<'a> {
    body: &'a str,
}

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

#[derive(Debug, Clone)]
pub struct HttpTaskService {
    client: Client,
    base_url: String,
}

impl HttpTaskService {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            client: Client::new(),
            base_url,
        }
    }

    fn collection_url(&self) -> String {
        format!("{}/todos", self.base_url)
    }

    fn task_url(&self, id: &TaskId) -> String {
        format!(
            "{}/todos/{}",
            self.base_url,
            utf8_percent_encode(id.as_str(), PATH_SEGMENT)
        )
    }
}

#[async_trait(?Send)]
impl TaskService for HttpTaskService {
    async fn fetch_all(&self) -> SyncResult<Vec<Task>> {
        log::debug!("GET {}", self.collection_url());
        let response = self.client.get(self.collection_url()).send().await?;
        let response = ensure_success(response, None).await?;
        // An empty collection comes back as `null`.
        let tasks: Option<Vec<Task>> = decode(response).await?;
        Ok(tasks.unwrap_or_default())
    }

    async fn toggle(&self, id: &TaskId) -> SyncResult<Task> {
        log::debug!("PATCH {}", self.task_url(id));
        let response = self.client.patch(self.task_url(id)).send().await?;
        let response = ensure_success(response, Some(id)).await?;
        decode(response).await
    }

    async fn delete(&self, id: &TaskId) -> SyncResult<()> {
        log::debug!("DELETE {}", self.task_url(id));
        let response = self.client.delete(self.task_url(id)).send().await?;
        ensure_success(response, Some(id)).await?;
        Ok(())
    }

    async fn create(&self, body: &str) -> SyncResult<Task> {
        if body.trim().is_empty() {
            return Err(SyncError::Rejected("task body cannot be empty".to_string()));
        }
        log::debug!("POST {}", self.collection_url());
        let response = self
            .client
            .post(self.collection_url())
            .json(&CreateTaskArgs { body })
            .send()
            .await?;
        if response.status() == StatusCode::BAD_REQUEST {
            return Err(SyncError::Rejected(error_message(response).await));
        }
        let response = ensure_success(response, None).await?;
        decode(response).await
    }
}

/// Map non-success statuses onto the error taxonomy.
///
/// For id-addressed calls the backend answers 404 for unknown ids and 400 for
/// ids it cannot resolve at all; both mean the task does not exist.
async fn ensure_success(response: Response, id: Option<&TaskId>) -> SyncResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    if let Some(id) = id {
        if status == StatusCode::NOT_FOUND || status == StatusCode::BAD_REQUEST {
            return Err(SyncError::NotFound(id.clone()));
        }
    }

    let message = error_message(response).await;
    Err(SyncError::Network(format!("HTTP {}: {}", status.as_u16(), message)))
}

async fn error_message(response: Response) -> String {
    let status = response.status();
    let text = response.text().await.unwrap_or_default();
    if let Ok(body) = serde_json::from_str::<ErrorBody>(&text) {
        return body.error;
    }
    let text = text.trim();
    if text.is_empty() {
        status.canonical_reason().unwrap_or("request failed").to_string()
    } else {
        text.to_string()
    }
}

async fn decode<T: DeserializeOwned>(response: Response) -> SyncResult<T> {
    let text = response.text().await?;
    serde_json::from_str(&text)
        .map_err(|e| SyncError::Network(format!("invalid response body: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn setup() -> (MockServer, HttpTaskService) {
        let server = MockServer::start().await;
        let service = HttpTaskService::new(format!("{}/api", server.uri()));
        (server, service)
    }

    #[tokio::test]
    async fn test_fetch_all_normalizes_missing_complete() {
        let (server, service) = setup().await;
        Mock::given(method("GET"))
            .and(path("/api/todos"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"_id": "1", "body": "buy milk"},
                {"_id": "2", "body": "walk dog", "complete": true}
            ])))
            .mount(&server)
            .await;

        let tasks = service.fetch_all().await.expect("fetch failed");
        assert_eq!(
            tasks,
            vec![Task::new("1", "buy milk", false), Task::new("2", "walk dog", true)]
        );
    }

    #[tokio::test]
    async fn test_fetch_all_null_body_is_empty_collection() {
        let (server, service) = setup().await;
        Mock::given(method("GET"))
            .and(path("/api/todos"))
            .respond_with(ResponseTemplate::new(200).set_body_string("null"))
            .mount(&server)
            .await;

        assert!(service.fetch_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_fetch_all_server_error_is_network_error() {
        let (server, service) = setup().await;
        Mock::given(method("GET"))
            .and(path("/api/todos"))
            .respond_with(
                ResponseTemplate::new(500).set_body_json(json!({"error": "db unavailable"})),
            )
            .mount(&server)
            .await;

        let err = service.fetch_all().await.unwrap_err();
        assert_eq!(err, SyncError::Network("HTTP 500: db unavailable".to_string()));
    }

    #[tokio::test]
    async fn test_fetch_all_garbage_body_is_network_error() {
        let (server, service) = setup().await;
        Mock::given(method("GET"))
            .and(path("/api/todos"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
            .mount(&server)
            .await;

        assert!(matches!(service.fetch_all().await, Err(SyncError::Network(_))));
    }

    #[tokio::test]
    async fn test_unreachable_backend_is_network_error() {
        let server = MockServer::start().await;
        let uri = server.uri();
        drop(server);

        let service = HttpTaskService::new(format!("{}/api", uri));
        assert!(matches!(service.fetch_all().await, Err(SyncError::Network(_))));
    }

    #[tokio::test]
    async fn test_toggle_returns_server_record() {
        let (server, service) = setup().await;
        Mock::given(method("PATCH"))
            .and(path("/api/todos/1"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"_id": "1", "body": "x", "completed": true})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let task = service.toggle(&TaskId::new("1")).await.expect("toggle failed");
        assert_eq!(task, Task::new("1", "x", true));
    }

    #[tokio::test]
    async fn test_toggle_record_with_both_flags_prefers_completed() {
        let (server, service) = setup().await;
        Mock::given(method("PATCH"))
            .and(path("/api/todos/1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(
                json!({"_id": "1", "body": "x", "complete": true, "completed": false}),
            ))
            .expect(1)
            .mount(&server)
            .await;

        let task = service.toggle(&TaskId::new("1")).await.expect("toggle failed");
        assert_eq!(task, Task::new("1", "x", false));
    }

    #[tokio::test]
    async fn test_toggle_unknown_id_is_not_found() {
        let (server, service) = setup().await;
        Mock::given(method("PATCH"))
            .and(path("/api/todos/9"))
            .respond_with(
                ResponseTemplate::new(404).set_body_json(json!({"error": "Todo not found"})),
            )
            .mount(&server)
            .await;
        Mock::given(method("PATCH"))
            .and(path("/api/todos/zz"))
            .respond_with(
                ResponseTemplate::new(400).set_body_json(json!({"error": "Invalid todo ID"})),
            )
            .mount(&server)
            .await;

        let err = service.toggle(&TaskId::new("9")).await.unwrap_err();
        assert_eq!(err, SyncError::NotFound(TaskId::new("9")));

        let err = service.toggle(&TaskId::new("zz")).await.unwrap_err();
        assert_eq!(err, SyncError::NotFound(TaskId::new("zz")));
    }

    #[tokio::test]
    async fn test_delete_ignores_response_body() {
        let (server, service) = setup().await;
        Mock::given(method("DELETE"))
            .and(path("/api/todos/1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": "true"})))
            .expect(1)
            .mount(&server)
            .await;

        service.delete(&TaskId::new("1")).await.expect("delete failed");
    }

    #[tokio::test]
    async fn test_delete_unknown_id_is_not_found() {
        let (server, service) = setup().await;
        Mock::given(method("DELETE"))
            .and(path("/api/todos/9"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let err = service.delete(&TaskId::new("9")).await.unwrap_err();
        assert_eq!(err, SyncError::NotFound(TaskId::new("9")));
    }

    #[tokio::test]
    async fn test_task_id_is_escaped_as_one_segment() {
        let (server, service) = setup().await;
        Mock::given(method("DELETE"))
            .and(path("/api/todos/a%2Fb%20c"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        service.delete(&TaskId::new("a/b c")).await.expect("delete failed");
    }

    #[tokio::test]
    async fn test_create_posts_body() {
        let (server, service) = setup().await;
        Mock::given(method("POST"))
            .and(path("/api/todos"))
            .and(body_json(json!({"body": "buy milk"})))
            .respond_with(
                ResponseTemplate::new(201)
                    .set_body_json(json!({"_id": "7", "body": "buy milk", "complete": false})),
            )
            .mount(&server)
            .await;

        let task = service.create("buy milk").await.expect("create failed");
        assert_eq!(task, Task::new("7", "buy milk", false));
    }

    #[tokio::test]
    async fn test_create_rejections() {
        let (server, service) = setup().await;
        Mock::given(method("POST"))
            .and(path("/api/todos"))
            .respond_with(
                ResponseTemplate::new(400)
                    .set_body_json(json!({"error": "Todo body cannot be empty"})),
            )
            .mount(&server)
            .await;

        // Blank bodies never reach the backend.
        let err = service.create("   ").await.unwrap_err();
        assert_eq!(err, SyncError::Rejected("task body cannot be empty".to_string()));

        let err = service.create("x").await.unwrap_err();
        assert_eq!(err, SyncError::Rejected("Todo body cannot be empty".to_string()));
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let service = HttpTaskService::new("http://localhost:5000/api/");
        assert_eq!(service.base_url, "http://localhost:5000/api");
        assert_eq!(service.task_url(&TaskId::new("1")), "http://localhost:5000/api/todos/1");
    }
}
