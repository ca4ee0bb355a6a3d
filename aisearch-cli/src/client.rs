//! HTTP client for the AI Search backend.

use std::{
    path::{Path, PathBuf},
    time::Duration,
};

use futures_util::Stream;
use reqwest::{
    Client, RequestBuilder, Response, StatusCode,
    header::{ACCEPT, HeaderValue},
    multipart::{Form, Part},
};
use serde::de::DeserializeOwned;
use shared::{
    config::ApiConfig,
    models::{
        DeleteChatRequest, DeleteDocumentRequest, DocumentListResponse, ErrorResponse,
        LoadedChat, LoginRequest, LoginResponse, MAX_FILES_PER_UPLOAD, MAX_USERNAME_LEN,
        MeResponse, MessageResponse, ProcType, SaveChatRequest, SaveChatResponse,
        SaveMessageRequest, SignupRequest, StreamChatRequest, UpdateChatTitleRequest,
        UploadDocumentResponse,
        errors::{DETAIL_ALREADY_REGISTERED, DETAIL_BAD_CREDENTIALS},
    },
};
use thiserror::Error;
use tracing::{debug, warn};
use url::Url;

const USER_AGENT: &str = concat!("aisearch-cli/", env!("CARGO_PKG_VERSION"));
const EVENT_STREAM: &str = "text/event-stream";

/// Failures talking to the backend.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Connection, timeout or body decoding failure.
    #[error("could not reach the server: {0}")]
    Transport(#[from] reqwest::Error),
    /// Non-success status, with the backend's `detail` when it sent one.
    #[error("request failed with {status}: {}", .detail.as_deref().unwrap_or("no details"))]
    Status {
        /// HTTP status.
        status: StatusCode,
        /// Flattened `detail` field.
        detail: Option<String>,
    },
    /// No token stored for an authenticated route.
    #[error("not logged in; run `aisearch session login` first")]
    Unauthenticated,
    /// Rejected before sending.
    #[error("{0}")]
    Validation(String),
    /// A route could not be joined onto the base URL.
    #[error("invalid endpoint URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
    /// An upload file could not be read.
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        /// File that failed.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

impl ApiError {
    /// Whether the backend rejected the bearer token or credentials.
    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        matches!(
            self,
            Self::Unauthenticated
                | Self::Status {
                    status: StatusCode::UNAUTHORIZED,
                    ..
                }
        )
    }

    /// One-line message suitable for showing to the user.
    #[must_use]
    pub fn friendly_message(&self) -> String {
        match self {
            Self::Status {
                detail: Some(detail),
                ..
            } if detail == DETAIL_BAD_CREDENTIALS => "Incorrect username or password.".to_string(),
            Self::Status {
                detail: Some(detail),
                ..
            } if detail == DETAIL_ALREADY_REGISTERED => {
                "An account with this username already exists.".to_string()
            }
            Self::Transport(_) => {
                "Unable to connect to the server. Please contact your administrator.".to_string()
            }
            other => other.to_string(),
        }
    }
}

/// Thin wrapper over [`reqwest::Client`] that knows the backend routes.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base_url: Url,
    token: Option<String>,
    request_timeout: Duration,
}

impl ApiClient {
    /// Builds a client for the configured backend.
    ///
    /// # Errors
    /// Returns [`ApiError::Transport`] if the HTTP client cannot be built.
    pub fn new(config: &ApiConfig, token: Option<String>) -> Result<Self, ApiError> {
        let http = Client::builder().user_agent(USER_AGENT).build()?;
        Ok(Self {
            http,
            base_url: config.base_url.clone(),
            token,
            request_timeout: config.request_timeout(),
        })
    }

    /// Backend root every route is joined onto.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Whether a bearer token is attached.
    #[must_use]
    pub fn has_token(&self) -> bool {
        self.token.is_some()
    }

    fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        Ok(self.base_url.join(path)?)
    }

    fn get(&self, path: &str) -> Result<RequestBuilder, ApiError> {
        Ok(self
            .http
            .get(self.endpoint(path)?)
            .timeout(self.request_timeout))
    }

    fn post(&self, path: &str) -> Result<RequestBuilder, ApiError> {
        Ok(self
            .http
            .post(self.endpoint(path)?)
            .timeout(self.request_timeout))
    }

    fn authorized(&self, request: RequestBuilder) -> Result<RequestBuilder, ApiError> {
        let token = self.token.as_deref().ok_or(ApiError::Unauthenticated)?;
        Ok(request.bearer_auth(token))
    }

    async fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ApiError> {
        let response = check_status(request.send().await?).await?;
        Ok(response.json().await?)
    }

    /// Registers a new account.
    ///
    /// # Errors
    /// Fails validation for overlong usernames, otherwise surfaces the
    /// backend's response.
    pub async fn signup(&self, request: &SignupRequest) -> Result<MessageResponse, ApiError> {
        validate_username(&request.username)?;
        self.send_json(self.post("api/auth/signup")?.json(request))
            .await
    }

    /// Exchanges credentials for a bearer token. The body is form encoded.
    ///
    /// # Errors
    /// Returns [`ApiError::Status`] with the backend detail when the
    /// credentials are rejected.
    pub async fn login(&self, request: &LoginRequest) -> Result<LoginResponse, ApiError> {
        self.send_json(self.post("api/auth/login")?.form(request))
            .await
    }

    /// # Errors
    /// [`ApiError::Unauthenticated`] without a token, or the backend error.
    pub async fn me(&self) -> Result<MeResponse, ApiError> {
        self.send_json(self.authorized(self.get("api/auth/me")?)?)
            .await
    }

    /// Loads every saved conversation, newest first.
    ///
    /// # Errors
    /// [`ApiError::Unauthenticated`] without a token, or the backend error.
    pub async fn load_chats(&self) -> Result<Vec<LoadedChat>, ApiError> {
        self.send_json(self.authorized(self.get("api/ai-search/load-chat")?)?)
            .await
    }

    /// # Errors
    /// [`ApiError::Unauthenticated`] without a token, or the backend error.
    pub async fn save_chat(&self, request: &SaveChatRequest) -> Result<SaveChatResponse, ApiError> {
        let request = self
            .authorized(self.post("api/ai-search/save-chat")?)?
            .json(request);
        self.send_json(request).await
    }

    /// # Errors
    /// [`ApiError::Unauthenticated`] without a token, or the backend error.
    pub async fn update_chat_title(
        &self,
        chat_id: i64,
        title: &str,
    ) -> Result<MessageResponse, ApiError> {
        let body = UpdateChatTitleRequest {
            chat_id,
            title: title.to_string(),
        };
        let request = self
            .authorized(self.post("api/ai-search/update-chat-title")?)?
            .json(&body);
        self.send_json(request).await
    }

    /// # Errors
    /// [`ApiError::Unauthenticated`] without a token, or the backend error.
    pub async fn delete_chat(&self, chat_id: i64) -> Result<MessageResponse, ApiError> {
        let request = self
            .authorized(self.post("api/ai-search/delete-chat")?)?
            .json(&DeleteChatRequest { chat_id });
        self.send_json(request).await
    }

    /// # Errors
    /// [`ApiError::Unauthenticated`] without a token, or the backend error.
    pub async fn delete_all_chats(&self) -> Result<MessageResponse, ApiError> {
        self.send_json(self.authorized(self.post("api/ai-search/delete-all-chats")?)?)
            .await
    }

    /// Persists one completed exchange.
    ///
    /// # Errors
    /// [`ApiError::Unauthenticated`] without a token, or the backend error.
    pub async fn save_message(
        &self,
        request: &SaveMessageRequest,
    ) -> Result<MessageResponse, ApiError> {
        let request = self
            .authorized(self.post("api/ai-search/save-message")?)?
            .json(request);
        self.send_json(request).await
    }

    /// Starts a reply stream and returns its raw byte chunks.
    ///
    /// No overall timeout applies; the reply may take as long as the model
    /// needs. The bearer token is attached when present.
    ///
    /// # Errors
    /// Returns [`ApiError::Status`] when the backend rejects the request
    /// before streaming, or [`ApiError::Transport`] when it is unreachable.
    pub async fn stream_chat(
        &self,
        request: &StreamChatRequest,
    ) -> Result<impl Stream<Item = reqwest::Result<impl AsRef<[u8]>>>, ApiError> {
        let mut builder = self
            .http
            .post(self.endpoint("api/ai-search/stream-chat")?)
            .header(ACCEPT, HeaderValue::from_static(EVENT_STREAM))
            .json(request);
        if let Some(token) = &self.token {
            builder = builder.bearer_auth(token);
        }

        debug!(chat_id = request.chat_id, messages = request.messages.len(), "stream started");
        let response = check_status(builder.send().await?).await?;
        Ok(response.bytes_stream())
    }

    /// Uploads up to [`MAX_FILES_PER_UPLOAD`] files for background processing.
    ///
    /// # Errors
    /// Fails validation for too many files or unsupported extensions, with
    /// [`ApiError::Io`] when a file cannot be read, or the backend error.
    pub async fn upload_documents(
        &self,
        proc_type: ProcType,
        paths: &[PathBuf],
    ) -> Result<UploadDocumentResponse, ApiError> {
        validate_upload(proc_type, paths)?;

        let mut form = Form::new();
        for path in paths {
            let bytes = tokio::fs::read(path).await.map_err(|source| ApiError::Io {
                path: path.clone(),
                source,
            })?;
            let file_name = path
                .file_name()
                .map_or_else(|| "upload".to_string(), |name| name.to_string_lossy().into_owned());
            form = form.part("files", Part::bytes(bytes).file_name(file_name));
        }
        form = form.text("proc_type", proc_type.as_str());

        let request = self
            .authorized(self.post("api/ai-search/upload-document")?)?
            .multipart(form);
        self.send_json(request).await
    }

    /// Uploads typed text as a `<title>.txt` document.
    ///
    /// # Errors
    /// Fails validation when the title or content is blank, otherwise
    /// surfaces the backend's response.
    pub async fn upload_plain_text(
        &self,
        title: &str,
        content: &str,
    ) -> Result<UploadDocumentResponse, ApiError> {
        validate_plain_text(title, content)?;

        let part = Part::text(content.to_string())
            .file_name(format!("{}.txt", title.trim()))
            .mime_str("text/plain")?;
        let form = Form::new()
            .part("files", part)
            .text("proc_type", ProcType::Plain.as_str());

        let request = self
            .authorized(self.post("api/ai-search/upload-document")?)?
            .multipart(form);
        self.send_json(request).await
    }

    /// # Errors
    /// [`ApiError::Unauthenticated`] without a token, or the backend error.
    pub async fn list_documents(&self) -> Result<DocumentListResponse, ApiError> {
        self.send_json(self.authorized(self.get("api/ai-search/get-documents")?)?)
            .await
    }

    /// # Errors
    /// [`ApiError::Unauthenticated`] without a token, or the backend error.
    pub async fn delete_document(&self, doc_id: i64) -> Result<MessageResponse, ApiError> {
        let request = self
            .authorized(self.post("api/ai-search/delete-document/")?)?
            .json(&DeleteDocumentRequest { doc_id });
        self.send_json(request).await
    }
}

/// Turns a non-success response into [`ApiError::Status`].
async fn check_status(response: Response) -> Result<Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let detail = serde_json::from_str::<ErrorResponse>(&body)
        .ok()
        .and_then(|error| error.message())
        .or_else(|| (!body.trim().is_empty()).then(|| body.trim().to_string()));
    warn!(%status, detail = detail.as_deref().unwrap_or_default(), "request rejected");
    Err(ApiError::Status { status, detail })
}

/// # Errors
/// [`ApiError::Validation`] when the username is longer than the backend allows.
pub fn validate_username(username: &str) -> Result<(), ApiError> {
    if username.trim().is_empty() {
        return Err(ApiError::Validation("username must not be empty".to_string()));
    }
    if username.chars().count() > MAX_USERNAME_LEN {
        return Err(ApiError::Validation(format!(
            "username cannot exceed {MAX_USERNAME_LEN} characters"
        )));
    }
    Ok(())
}

/// # Errors
/// [`ApiError::Validation`] for an empty or oversized batch, or a file whose
/// extension `proc_type` does not accept.
pub fn validate_upload(proc_type: ProcType, paths: &[PathBuf]) -> Result<(), ApiError> {
    if proc_type == ProcType::Plain {
        return Err(ApiError::Validation(
            "plain text documents are added with `docs add-text`".to_string(),
        ));
    }
    if paths.is_empty() {
        return Err(ApiError::Validation("select at least one file".to_string()));
    }
    if paths.len() > MAX_FILES_PER_UPLOAD {
        return Err(ApiError::Validation(format!(
            "at most {MAX_FILES_PER_UPLOAD} files can be uploaded at once"
        )));
    }
    if let Some(rejected) = paths.iter().find(|path| !proc_type.accepts(path)) {
        return Err(ApiError::Validation(format!(
            "unsupported file type: {} (supported: {})",
            display_name(rejected),
            proc_type.allowed_extensions().join(", ").to_uppercase()
        )));
    }
    Ok(())
}

/// # Errors
/// [`ApiError::Validation`] when either field is blank.
pub fn validate_plain_text(title: &str, content: &str) -> Result<(), ApiError> {
    if title.trim().is_empty() || content.trim().is_empty() {
        return Err(ApiError::Validation(
            "both a title and content are required".to_string(),
        ));
    }
    Ok(())
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map_or_else(|| path.display().to_string(), |name| name.to_string_lossy().into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use shared::models::ChatMessage;
    use wiremock::matchers::{body_json, body_string_contains, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer, token: Option<&str>) -> ApiClient {
        let config = ApiConfig {
            base_url: Url::parse(&format!("{}/", server.uri())).unwrap(),
            request_timeout_secs: 5,
        };
        ApiClient::new(&config, token.map(str::to_string)).unwrap()
    }

    #[tokio::test]
    async fn test_login_posts_form_and_returns_token() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/auth/login"))
            .and(body_string_contains("username=ada%40example.com"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "message": "Login successful",
                "access_token": "token-123",
                "token_type": "bearer"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server, None);
        let response = client
            .login(&LoginRequest {
                username: "ada@example.com".to_string(),
                password: "secret".to_string(),
            })
            .await
            .unwrap();

        assert_eq!(response.access_token, "token-123");
    }

    #[tokio::test]
    async fn test_login_failure_surfaces_detail() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/auth/login"))
            .respond_with(
                ResponseTemplate::new(401).set_body_json(json!({"detail": DETAIL_BAD_CREDENTIALS})),
            )
            .mount(&server)
            .await;

        let client = client_for(&server, None);
        let err = client
            .login(&LoginRequest {
                username: "ada@example.com".to_string(),
                password: "wrong".to_string(),
            })
            .await
            .unwrap_err();

        match &err {
            ApiError::Status { status, detail } => {
                assert_eq!(*status, StatusCode::UNAUTHORIZED);
                assert_eq!(detail.as_deref(), Some(DETAIL_BAD_CREDENTIALS));
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(err.is_unauthorized());
        assert_eq!(err.friendly_message(), "Incorrect username or password.");
    }

    #[tokio::test]
    async fn test_signup_duplicate_maps_friendly_message() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/auth/signup"))
            .respond_with(
                ResponseTemplate::new(400)
                    .set_body_json(json!({"detail": DETAIL_ALREADY_REGISTERED})),
            )
            .mount(&server)
            .await;

        let client = client_for(&server, None);
        let err = client
            .signup(&SignupRequest {
                username: "ada@example.com".to_string(),
                password: "secret".to_string(),
            })
            .await
            .unwrap_err();

        assert_eq!(
            err.friendly_message(),
            "An account with this username already exists."
        );
    }

    #[tokio::test]
    async fn test_signup_rejects_long_username_without_request() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let client = client_for(&server, None);
        let err = client
            .signup(&SignupRequest {
                username: "a".repeat(MAX_USERNAME_LEN + 1),
                password: "secret".to_string(),
            })
            .await
            .unwrap_err();

        assert!(matches!(err, ApiError::Validation(_)));
    }

    #[tokio::test]
    async fn test_authenticated_calls_require_token() {
        let server = MockServer::start().await;
        let client = client_for(&server, None);

        let err = client.load_chats().await.unwrap_err();
        assert!(matches!(err, ApiError::Unauthenticated));
        assert!(err.is_unauthorized());
    }

    #[tokio::test]
    async fn test_load_chats_sends_bearer_token() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/ai-search/load-chat"))
            .and(header("authorization", "Bearer token-123"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {
                    "chat_id": 7,
                    "title": "Quarterly numbers",
                    "created_at": "2024-05-01T09:30:00",
                    "messages": [
                        {"user": "hi", "assistant": "hello", "doc_ids": [3], "chunk_ids": ["a1"]}
                    ]
                }
            ])))
            .mount(&server)
            .await;

        let client = client_for(&server, Some("token-123"));
        let chats = client.load_chats().await.unwrap();

        assert_eq!(chats.len(), 1);
        assert_eq!(chats[0].chat_id, 7);
        assert_eq!(chats[0].messages[0].doc_ids, Some(vec![3]));
    }

    #[tokio::test]
    async fn test_validation_error_list_is_flattened() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/ai-search/save-chat"))
            .respond_with(ResponseTemplate::new(422).set_body_json(json!({
                "detail": [{"loc": ["body", "title"], "msg": "field required", "type": "missing"}]
            })))
            .mount(&server)
            .await;

        let client = client_for(&server, Some("token-123"));
        let err = client
            .save_chat(&SaveChatRequest {
                title: String::new(),
                messages: Vec::new(),
            })
            .await
            .unwrap_err();

        assert!(err.to_string().contains("field required"));
    }

    #[tokio::test]
    async fn test_stream_chat_yields_body_chunks() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/ai-search/stream-chat"))
            .and(header("accept", EVENT_STREAM))
            .and(body_json(json!({
                "chat_id": 7,
                "messages": [{"user": "hi", "assistant": null, "doc_ids": null, "chunk_ids": null}]
            })))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string("Hello there.|doc_ids=3,7</s>chunk_ids=a1,b2"),
            )
            .mount(&server)
            .await;

        let client = client_for(&server, None);
        let request = StreamChatRequest {
            chat_id: 7,
            messages: vec![ChatMessage::from_user("hi")],
        };
        let stream = client.stream_chat(&request).await.unwrap();
        let reply = shared::drive_reply(stream, |_| {}).await.unwrap();

        assert_eq!(reply.assistant_text, "Hello there.");
        assert_eq!(reply.source_document_ids, Some(vec![3, 7]));
        assert_eq!(
            reply.source_chunk_ids,
            Some(vec!["a1".to_string(), "b2".to_string()])
        );
    }

    #[tokio::test]
    async fn test_stream_chat_rejection_is_status_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/ai-search/stream-chat"))
            .respond_with(
                ResponseTemplate::new(500).set_body_json(json!({"detail": "model offline"})),
            )
            .mount(&server)
            .await;

        let client = client_for(&server, None);
        let request = StreamChatRequest {
            chat_id: 1,
            messages: vec![ChatMessage::from_user("hi")],
        };
        let result = client.stream_chat(&request).await;

        match result {
            Err(ApiError::Status { status, detail }) => {
                assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
                assert_eq!(detail.as_deref(), Some("model offline"));
            }
            Err(other) => panic!("unexpected error: {other:?}"),
            Ok(_) => panic!("expected the stream request to be rejected"),
        }
    }

    #[tokio::test]
    async fn test_upload_documents_sends_multipart() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/ai-search/upload-document"))
            .and(body_string_contains("name=\"proc_type\""))
            .and(body_string_contains("filename=\"notes.txt\""))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "message": "1 documents upload started",
                "documents": [{"doc_id": 4, "title": "notes.txt", "extension": "txt", "proc_type": "text"}]
            })))
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("notes.txt");
        std::fs::write(&file, "meeting notes").unwrap();

        let client = client_for(&server, Some("token-123"));
        let response = client
            .upload_documents(ProcType::Text, &[file])
            .await
            .unwrap();

        assert_eq!(response.documents.len(), 1);
        assert_eq!(response.documents[0].doc_id, 4);
    }

    #[tokio::test]
    async fn test_upload_plain_text_names_file_after_title() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/ai-search/upload-document"))
            .and(body_string_contains("filename=\"Release notes.txt\""))
            .and(body_string_contains("plain"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "message": "1 documents upload started",
                "documents": [{"doc_id": 9, "title": "Release notes.txt", "extension": "txt", "proc_type": "plain"}]
            })))
            .mount(&server)
            .await;

        let client = client_for(&server, Some("token-123"));
        let response = client
            .upload_plain_text("Release notes", "Version 2 ships today.")
            .await
            .unwrap();

        assert_eq!(response.documents[0].proc_type, ProcType::Plain);
    }

    #[tokio::test]
    async fn test_delete_document_uses_trailing_slash_route() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/ai-search/delete-document/"))
            .and(body_json(json!({"doc_id": 12})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "message": "Document deleted successfully"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server, Some("token-123"));
        let response = client.delete_document(12).await.unwrap();
        assert_eq!(response.message, "Document deleted successfully");
    }

    #[test]
    fn test_validate_upload_limits() {
        let three: Vec<PathBuf> = ["a.txt", "b.txt", "c.txt"].iter().map(PathBuf::from).collect();
        assert!(matches!(
            validate_upload(ProcType::Text, &three),
            Err(ApiError::Validation(_))
        ));

        let image_for_text = vec![PathBuf::from("scan.png")];
        let err = validate_upload(ProcType::Text, &image_for_text).unwrap_err();
        assert!(err.to_string().contains("scan.png"));

        assert!(validate_upload(ProcType::Image, &image_for_text).is_ok());
        assert!(validate_upload(ProcType::Text, &[]).is_err());
        assert!(validate_upload(ProcType::Plain, &[PathBuf::from("a.txt")]).is_err());
    }

    #[test]
    fn test_validate_plain_text_requires_both_fields() {
        assert!(validate_plain_text("Title", "Body").is_ok());
        assert!(validate_plain_text("  ", "Body").is_err());
        assert!(validate_plain_text("Title", "\n").is_err());
    }
}
