//! Remote task gateway.
//!
//! [`TaskGateway`] is the fixed method contract the store talks to;
//! [`HttpGateway`] implements it against the JSON todo API
//! (`/todos`, `/todos/{id}`, `/todos/add`). Each call is bounded by the
//! client timeout and attempted exactly once.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::debug;

use crate::error::GatewayError;
use crate::task::{CreateTaskInput, DeleteReceipt, ListPage, Task, TaskId, UpdateTaskInput};

/// Default bound on every remote call.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Method contract over the remote todo resource.
///
/// Only `create` is not idempotent: every call makes a new remote record.
#[async_trait]
pub trait TaskGateway: Send + Sync {
    async fn list(&self, limit: u64, offset: u64) -> Result<ListPage, GatewayError>;

    async fn get_by_id(&self, id: TaskId) -> Result<Task, GatewayError>;

    async fn create(&self, draft: &CreateTaskInput) -> Result<Task, GatewayError>;

    async fn update(&self, id: TaskId, fields: &UpdateTaskInput) -> Result<Task, GatewayError>;

    async fn delete(&self, id: TaskId) -> Result<DeleteReceipt, GatewayError>;
}

/// `reqwest`-backed gateway.
#[derive(Debug, Clone)]
pub struct HttpGateway {
    client: Client,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct RawDeleteReceipt {
    #[serde(default)]
    id: Option<TaskId>,
    #[serde(default, rename = "isDeleted")]
    is_deleted: Option<bool>,
}

impl HttpGateway {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, GatewayError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| GatewayError::Transport(e.to_string()))?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        debug!(%method, %url, "gateway request");
        self.client.request(method, url).header(CONTENT_TYPE, "application/json")
    }
}

/// Turn a response into a decoded body, mapping 404 to `NotFound` when the
/// call addressed a single id.
async fn read_json<T: DeserializeOwned>(
    sent: Result<Response, reqwest::Error>,
    id: Option<TaskId>,
) -> Result<T, GatewayError> {
    let response = sent.map_err(|e| GatewayError::classify(&e))?;
    let status = response.status();
    if status == StatusCode::NOT_FOUND {
        if let Some(id) = id {
            return Err(GatewayError::NotFound { id });
        }
    }
    if !status.is_success() {
        return Err(GatewayError::Http { status: status.as_u16() });
    }
    response.json::<T>().await.map_err(|e| GatewayError::classify(&e))
}

#[async_trait]
impl TaskGateway for HttpGateway {
    async fn list(&self, limit: u64, offset: u64) -> Result<ListPage, GatewayError> {
        let path = format!("/todos?limit={limit}&skip={offset}");
        read_json(self.request(Method::GET, &path).send().await, None).await
    }

    async fn get_by_id(&self, id: TaskId) -> Result<Task, GatewayError> {
        let path = format!("/todos/{id}");
        read_json(self.request(Method::GET, &path).send().await, Some(id)).await
    }

    async fn create(&self, draft: &CreateTaskInput) -> Result<Task, GatewayError> {
        let sent = self.request(Method::POST, "/todos/add").json(draft).send().await;
        read_json(sent, None).await
    }

    async fn update(&self, id: TaskId, fields: &UpdateTaskInput) -> Result<Task, GatewayError> {
        let path = format!("/todos/{id}");
        let sent = self.request(Method::PUT, &path).json(fields).send().await;
        read_json(sent, Some(id)).await
    }

    async fn delete(&self, id: TaskId) -> Result<DeleteReceipt, GatewayError> {
        let path = format!("/todos/{id}");
        let raw: RawDeleteReceipt = read_json(self.request(Method::DELETE, &path).send().await, Some(id)).await?;
        Ok(DeleteReceipt {
            id: raw.id.unwrap_or(id),
            deleted: raw.is_deleted.unwrap_or(true),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;
    use serde_json::json;

    fn gateway(server: &mockito::ServerGuard) -> HttpGateway {
        HttpGateway::new(&server.url(), Duration::from_secs(5)).unwrap()
    }

    #[tokio::test]
    async fn test_list_sends_limit_and_skip() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/todos")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("limit".into(), "50".into()),
                Matcher::UrlEncoded("skip".into(), "0".into()),
            ]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                json!({
                    "todos": [
                        {"id": 1, "todo": "A", "completed": false, "userId": 1},
                        {"id": 2, "todo": "B", "completed": true, "userId": 1}
                    ],
                    "total": 254, "skip": 0, "limit": 50
                })
                .to_string(),
            )
            .create_async()
            .await;

        let page = gateway(&server).list(50, 0).await.unwrap();
        mock.assert_async().await;
        assert_eq!(page.items.len(), 2);
        assert_eq!(page.total, 254);
        assert_eq!(page.items[1].title, "B");
        assert!(page.items[1].completed);
    }

    #[tokio::test]
    async fn test_non_success_is_http_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/todos")
            .match_query(Matcher::Any)
            .with_status(503)
            .create_async()
            .await;

        let err = gateway(&server).list(10, 0).await.unwrap_err();
        assert_eq!(err, GatewayError::Http { status: 503 });
    }

    #[tokio::test]
    async fn test_get_by_id_404_is_not_found() {
        let mut server = mockito::Server::new_async().await;
        server.mock("GET", "/todos/9999").with_status(404).create_async().await;

        let err = gateway(&server).get_by_id(9999).await.unwrap_err();
        assert_eq!(err, GatewayError::NotFound { id: 9999 });
        assert_eq!(err.status(), Some(404));
    }

    #[tokio::test]
    async fn test_create_posts_draft() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/todos/add")
            .match_header("content-type", "application/json")
            .match_body(Matcher::Json(json!({"todo": "Plan offsite", "completed": false, "userId": 5})))
            .with_status(201)
            .with_body(json!({"id": 255, "todo": "Plan offsite", "completed": false, "userId": 5}).to_string())
            .create_async()
            .await;

        let draft = CreateTaskInput { todo: "Plan offsite".into(), completed: false, user_id: 5 };
        let created = gateway(&server).create(&draft).await.unwrap();
        mock.assert_async().await;
        assert_eq!(created.id, 255);
    }

    #[tokio::test]
    async fn test_update_sends_only_present_fields() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("PUT", "/todos/3")
            .match_body(Matcher::Json(json!({"completed": true})))
            .with_status(200)
            .with_body(json!({"id": 3, "todo": "C", "completed": true, "userId": 2}).to_string())
            .create_async()
            .await;

        let fields = UpdateTaskInput { todo: None, completed: Some(true) };
        let updated = gateway(&server).update(3, &fields).await.unwrap();
        mock.assert_async().await;
        assert!(updated.completed);
    }

    #[tokio::test]
    async fn test_delete_receipt_defaults() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("DELETE", "/todos/4")
            .with_status(200)
            .with_body(json!({"todo": "D", "completed": false, "userId": 2}).to_string())
            .create_async()
            .await;

        let receipt = gateway(&server).delete(4).await.unwrap();
        assert_eq!(receipt, DeleteReceipt { id: 4, deleted: true });
    }

    #[tokio::test]
    async fn test_malformed_body_is_decode_error() {
        let mut server = mockito::Server::new_async().await;
        server.mock("GET", "/todos/1").with_status(200).with_body("not json").create_async().await;

        let err = gateway(&server).get_by_id(1).await.unwrap_err();
        assert!(matches!(err, GatewayError::Decode(_)), "got {err:?}");
    }

    #[tokio::test]
    async fn test_silent_server_times_out() {
        // Accepts connections through the kernel backlog but never answers.
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let url = format!("http://{}", listener.local_addr().unwrap());
        let gateway = HttpGateway::new(&url, Duration::from_millis(200)).unwrap();

        let err = gateway.list(1, 0).await.unwrap_err();
        assert_eq!(err, GatewayError::Timeout);
        drop(listener);
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let gateway = HttpGateway::new("https://dummyjson.com/", DEFAULT_TIMEOUT).unwrap();
        assert_eq!(gateway.base_url(), "https://dummyjson.com");
    }
}
