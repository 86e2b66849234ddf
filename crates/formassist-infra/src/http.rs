//! HttpBackend -- concrete [`AssistantBackend`] over the backend's HTTP API.
//!
//! Endpoint paths are appended to the configured base URL, so a base of
//! `http://host:5001/api` addresses `http://host:5001/api/chat`. No
//! authentication headers are sent and no request timeout is applied.

use std::path::Path;

use serde::de::DeserializeOwned;

use formassist_core::backend::AssistantBackend;
use formassist_types::backend::{ChatReply, ChatRequest, FillFormRequest, UploadFile, UploadReceipt};
use formassist_types::download::{BinaryPayload, ResponseHeaders};
use formassist_types::error::BackendError;
use formassist_types::form::FormDescriptor;
use formassist_types::session::SessionId;

/// HTTP client for the assistant backend.
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: reqwest::Client,
    base_url: String,
}

impl HttpBackend {
    /// Create a backend client rooted at `base_url`.
    pub fn new(base_url: &str) -> Result<Self, BackendError> {
        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| BackendError::Transport(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Build the full URL for a given path.
    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Send a request, turning connection failures and non-success statuses
    /// into [`BackendError`]s.
    async fn send(&self, request: reqwest::RequestBuilder) -> Result<reqwest::Response, BackendError> {
        let response = request
            .send()
            .await
            .map_err(|e| BackendError::Transport(format!("HTTP request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .bytes()
                .await
                .map(|b| b.to_vec())
                .unwrap_or_default();
            tracing::debug!(
                status = status.as_u16(),
                bytes = body.len(),
                "backend rejected request"
            );
            return Err(BackendError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        Ok(response)
    }

    async fn json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, BackendError> {
        let bytes = response
            .bytes()
            .await
            .map_err(|e| BackendError::Transport(format!("failed to read response body: {e}")))?;
        serde_json::from_slice(&bytes)
            .map_err(|e| BackendError::Decode(format!("failed to parse response: {e}")))
    }
}

impl AssistantBackend for HttpBackend {
    async fn list_forms(&self) -> Result<Vec<FormDescriptor>, BackendError> {
        let response = self.send(self.client.get(self.url("/forms"))).await?;
        Self::json(response).await
    }

    async fn chat(&self, request: &ChatRequest) -> Result<ChatReply, BackendError> {
        let response = self
            .send(self.client.post(self.url("/chat")).json(request))
            .await?;
        Self::json(response).await
    }

    async fn upload(
        &self,
        session_id: &SessionId,
        file: &UploadFile,
    ) -> Result<UploadReceipt, BackendError> {
        let part = reqwest::multipart::Part::bytes(file.bytes.clone())
            .file_name(file.filename.clone())
            .mime_str(detect_mime(&file.filename))
            .map_err(|e| BackendError::Transport(format!("invalid upload part: {e}")))?;
        let form = reqwest::multipart::Form::new()
            .part("file", part)
            .text("sessionId", session_id.to_string());

        let response = self
            .send(self.client.post(self.url("/upload")).multipart(form))
            .await?;
        Self::json(response).await
    }

    async fn fill_form(&self, request: &FillFormRequest) -> Result<BinaryPayload, BackendError> {
        let response = self
            .send(self.client.post(self.url("/fill-form")).json(request))
            .await?;

        let mut headers = ResponseHeaders::new();
        for (name, value) in response.headers() {
            if let Ok(value) = value.to_str() {
                headers.insert(name.as_str(), value);
            }
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| BackendError::Transport(format!("failed to read form body: {e}")))?;

        Ok(BinaryPayload {
            bytes: bytes.to_vec(),
            headers,
        })
    }
}

/// MIME type for an upload, from its extension.
pub fn detect_mime(filename: &str) -> &'static str {
    let ext = Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    match ext.as_str() {
        "txt" => "text/plain",
        "pdf" => "application/pdf",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "tiff" | "tif" => "image/tiff",
        "bmp" => "image/bmp",
        "gif" => "image/gif",
        "webp" => "image/webp",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::{Arc, Mutex};

    use axum::Json;
    use axum::Router;
    use axum::extract::{Multipart, State};
    use axum::http::{StatusCode, header};
    use axum::response::{IntoResponse, Response};
    use axum::routing::{get, post};
    use serde_json::{Value, json};

    #[derive(Clone, Default)]
    struct Recorded {
        bodies: Arc<Mutex<Vec<Value>>>,
        uploads: Arc<Mutex<Vec<(String, String, String, usize)>>>,
    }

    async fn forms() -> Json<Value> {
        Json(json!([
            {"id": "I-765", "name": "I-765 (EAD)"},
            {"id": "AR-11", "name": "AR-11"}
        ]))
    }

    async fn chat(State(rec): State<Recorded>, Json(body): Json<Value>) -> Response {
        rec.bodies.lock().unwrap().push(body.clone());
        if body["message"] == "limit me" {
            return (StatusCode::TOO_MANY_REQUESTS, Json(json!({"error": "rate limited"})))
                .into_response();
        }
        Json(json!({"reply": format!("echo: {}", body["message"].as_str().unwrap_or_default()),
                    "action_needed": "trigger_fill_form"}))
        .into_response()
    }

    async fn upload(State(rec): State<Recorded>, mut multipart: Multipart) -> Response {
        let mut session = String::new();
        let mut file = None;
        while let Some(field) = multipart.next_field().await.unwrap() {
            let name = field.name().unwrap_or_default().to_string();
            match name.as_str() {
                "sessionId" => session = field.text().await.unwrap(),
                "file" => {
                    let name = field.file_name().unwrap_or_default().to_string();
                    let mime = field.content_type().unwrap_or_default().to_string();
                    let len = field.bytes().await.unwrap().len();
                    file = Some((name, mime, len));
                }
                _ => {}
            }
        }
        let Some((name, mime, len)) = file else {
            return (StatusCode::BAD_REQUEST, Json(json!({"error": "No file part"}))).into_response();
        };
        rec.uploads
            .lock()
            .unwrap()
            .push((session, name.clone(), mime, len));
        Json(json!({"message": "File uploaded successfully", "filename": name.replace(' ', "_")}))
            .into_response()
    }

    async fn fill_form(State(rec): State<Recorded>, Json(body): Json<Value>) -> Response {
        rec.bodies.lock().unwrap().push(body.clone());
        if body["formTypeId"] == "missing" {
            return (
                StatusCode::NOT_FOUND,
                [(header::CONTENT_TYPE, "application/octet-stream")],
                br#"{"error":"template missing"}"#.to_vec(),
            )
                .into_response();
        }
        (
            [
                (header::CONTENT_TYPE, "application/pdf"),
                (header::CONTENT_DISPOSITION, r#"attachment; filename="filled_I-765.pdf""#),
            ],
            b"%PDF-1.7 stub".to_vec(),
        )
            .into_response()
    }

    async fn stub_backend() -> (HttpBackend, Recorded) {
        let recorded = Recorded::default();
        let app = Router::new()
            .route("/forms", get(forms))
            .route("/chat", post(chat))
            .route("/upload", post(upload))
            .route("/fill-form", post(fill_form))
            .with_state(recorded.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        let backend = HttpBackend::new(&format!("http://{addr}/")).unwrap();
        (backend, recorded)
    }

    fn session() -> SessionId {
        SessionId("session-123".to_string())
    }

    #[test]
    fn test_base_url_trailing_slash_is_trimmed() {
        let backend = HttpBackend::new("http://localhost:5001/api/").unwrap();
        assert_eq!(backend.base_url(), "http://localhost:5001/api");
        assert_eq!(backend.url("/chat"), "http://localhost:5001/api/chat");
    }

    #[test]
    fn test_detect_mime() {
        assert_eq!(detect_mime("scan.PDF"), "application/pdf");
        assert_eq!(detect_mime("photo.jpeg"), "image/jpeg");
        assert_eq!(detect_mime("notes.txt"), "text/plain");
        assert_eq!(detect_mime("blob"), "application/octet-stream");
    }

    #[tokio::test]
    async fn test_list_forms() {
        let (backend, _) = stub_backend().await;
        let forms = backend.list_forms().await.unwrap();
        assert_eq!(forms.len(), 2);
        assert_eq!(forms[0], FormDescriptor::new("I-765", "I-765 (EAD)"));
    }

    #[tokio::test]
    async fn test_chat_sends_camel_case_body() {
        let (backend, recorded) = stub_backend().await;
        let reply = backend
            .chat(&ChatRequest {
                message: "hello".to_string(),
                session_id: session(),
            })
            .await
            .unwrap();

        assert_eq!(reply.reply, "echo: hello");
        assert!(reply.suggests_fill());
        let bodies = recorded.bodies.lock().unwrap();
        assert_eq!(bodies[0], json!({"message": "hello", "sessionId": "session-123"}));
    }

    #[tokio::test]
    async fn test_chat_rejection_keeps_body() {
        let (backend, _) = stub_backend().await;
        let err = backend
            .chat(&ChatRequest {
                message: "limit me".to_string(),
                session_id: session(),
            })
            .await
            .unwrap_err();

        match err {
            BackendError::Rejected { status, body } => {
                assert_eq!(status, 429);
                assert_eq!(
                    formassist_core::failure::reason_from_body(&body).as_deref(),
                    Some("rate limited")
                );
            }
            other => panic!("expected rejection, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_upload_is_multipart_with_session() {
        let (backend, recorded) = stub_backend().await;
        let receipt = backend
            .upload(&session(), &UploadFile::new("my scan.pdf", b"%PDF-1.4".to_vec()))
            .await
            .unwrap();

        assert_eq!(receipt.filename, "my_scan.pdf");
        let uploads = recorded.uploads.lock().unwrap();
        assert_eq!(
            uploads[0],
            (
                "session-123".to_string(),
                "my scan.pdf".to_string(),
                "application/pdf".to_string(),
                8
            )
        );
    }

    #[tokio::test]
    async fn test_fill_form_returns_bytes_and_headers() {
        let (backend, recorded) = stub_backend().await;
        let payload = backend
            .fill_form(&FillFormRequest {
                form_type_id: "I-765".to_string(),
                session_id: session(),
            })
            .await
            .unwrap();

        assert_eq!(payload.bytes, b"%PDF-1.7 stub");
        assert_eq!(
            payload.headers.content_disposition(),
            Some(r#"attachment; filename="filled_I-765.pdf""#)
        );
        assert_eq!(recorded.bodies.lock().unwrap()[0]["formTypeId"], "I-765");
    }

    #[tokio::test]
    async fn test_fill_form_binary_error_body() {
        let (backend, _) = stub_backend().await;
        let err = backend
            .fill_form(&FillFormRequest {
                form_type_id: "missing".to_string(),
                session_id: session(),
            })
            .await
            .unwrap_err();

        assert_eq!(
            formassist_core::failure::failure_reason(&err).as_deref(),
            Some("template missing")
        );
    }

    #[tokio::test]
    async fn test_unreachable_backend_is_transport_error() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let backend = HttpBackend::new(&format!("http://{addr}")).unwrap();
        let err = backend.list_forms().await.unwrap_err();
        assert!(matches!(err, BackendError::Transport(_)));
    }

    #[tokio::test]
    async fn test_non_json_success_is_decode_error() {
        let app = Router::new().route("/forms", get(|| async { "<html>not json</html>" }));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        let backend = HttpBackend::new(&format!("http://{addr}")).unwrap();
        let err = backend.list_forms().await.unwrap_err();
        assert!(matches!(err, BackendError::Decode(_)));
    }
}
