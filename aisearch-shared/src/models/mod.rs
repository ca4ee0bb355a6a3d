//! Wire models exchanged with the AI Search backend.

pub mod chat;
pub mod document;
pub mod errors;
pub mod timestamp;
pub mod user;

pub use chat::{
    ChatMessage, Conversation, DeleteChatRequest, LoadedChat, SaveChatRequest, SaveChatResponse,
    SaveMessageRequest, StreamChatRequest, UpdateChatTitleRequest,
};
pub use document::{
    DeleteDocumentRequest, DocumentListResponse, DocumentProgress, DocumentQuery,
    DocumentSortField, DocumentState, DocumentSummary, MAX_FILES_PER_UPLOAD, ProcType, SortOrder,
    UploadDocumentResponse, UploadedDocument,
};
pub use errors::ErrorResponse;
pub use timestamp::Timestamp;
pub use user::{
    LoginRequest, LoginResponse, MAX_USERNAME_LEN, MeResponse, MessageResponse, SignupRequest,
};
