//! Conversation and chat request bodies.

use serde::{Deserialize, Serialize};

use super::Timestamp;

/// One user turn and, once streamed, the assistant's answer with its sources.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChatMessage {
    /// Text the user submitted.
    pub user: String,
    /// Assistant reply; partial while streaming, `None` before the first chunk.
    #[serde(default)]
    pub assistant: Option<String>,
    /// Source document identifiers cited by the reply.
    #[serde(default)]
    pub doc_ids: Option<Vec<i64>>,
    /// Source chunk identifiers cited by the reply.
    #[serde(default)]
    pub chunk_ids: Option<Vec<String>>,
}

impl ChatMessage {
    /// Creates a message holding only the user's text.
    pub fn from_user(text: impl Into<String>) -> Self {
        Self {
            user: text.into(),
            ..Self::default()
        }
    }

    /// Whether the reply carries any source citation.
    #[must_use]
    pub fn has_sources(&self) -> bool {
        self.doc_ids.as_ref().is_some_and(|ids| !ids.is_empty())
            || self.chunk_ids.as_ref().is_some_and(|ids| !ids.is_empty())
    }
}

/// A conversation as held by the client.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Conversation {
    /// Backend id in string form.
    pub id: String,
    /// Title shown in listings.
    pub title: String,
    /// Creation time.
    pub created_at: Timestamp,
    /// Exchanges, oldest first.
    pub messages: Vec<ChatMessage>,
}

impl Conversation {
    /// Numeric identifier the backend expects in request bodies.
    ///
    /// # Errors
    /// Returns [`std::num::ParseIntError`] when the id is not numeric.
    pub fn chat_id(&self) -> Result<i64, std::num::ParseIntError> {
        self.id.parse()
    }
}

/// Entry of `GET api/ai-search/load-chat`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LoadedChat {
    /// Backend id.
    pub chat_id: i64,
    /// Conversation title.
    pub title: String,
    /// Creation time.
    pub created_at: Timestamp,
    /// Stored exchanges, oldest first.
    #[serde(default)]
    pub messages: Vec<ChatMessage>,
}

impl From<LoadedChat> for Conversation {
    fn from(chat: LoadedChat) -> Self {
        Self {
            id: chat.chat_id.to_string(),
            title: chat.title,
            created_at: chat.created_at,
            messages: chat.messages,
        }
    }
}

/// Body of `POST api/ai-search/stream-chat`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StreamChatRequest {
    /// Conversation the reply belongs to.
    pub chat_id: i64,
    /// Full history including the new user message, oldest first.
    pub messages: Vec<ChatMessage>,
}

/// Body of `POST api/ai-search/save-chat`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SaveChatRequest {
    /// Initial title.
    pub title: String,
    /// Initial messages, usually empty.
    pub messages: Vec<ChatMessage>,
}

/// Response of `POST api/ai-search/save-chat`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SaveChatResponse {
    /// Optional acknowledgement.
    #[serde(default)]
    pub message: Option<String>,
    /// Id assigned to the new conversation.
    pub chat_id: i64,
    /// Creation time.
    pub created_at: Timestamp,
}

/// Body of `POST api/ai-search/update-chat-title`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UpdateChatTitleRequest {
    /// Conversation to rename.
    pub chat_id: i64,
    /// New title.
    pub title: String,
}

/// Body of `POST api/ai-search/delete-chat`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DeleteChatRequest {
    /// Conversation to delete.
    pub chat_id: i64,
}

/// Body of `POST api/ai-search/save-message`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SaveMessageRequest {
    /// Conversation the exchange belongs to.
    pub chat_id: i64,
    /// User text.
    pub user: String,
    /// Completed reply.
    pub assistant: Option<String>,
    /// Cited documents.
    pub doc_ids: Option<Vec<i64>>,
    /// Cited chunks.
    pub chunk_ids: Option<Vec<String>>,
}

impl SaveMessageRequest {
    /// Builds the request persisting `message` into conversation `chat_id`.
    #[must_use]
    pub fn new(chat_id: i64, message: &ChatMessage) -> Self {
        Self {
            chat_id,
            user: message.user.clone(),
            assistant: message.assistant.clone(),
            doc_ids: message.doc_ids.clone(),
            chunk_ids: message.chunk_ids.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chat_message_from_user() {
        let message = ChatMessage::from_user("What is in the Q3 report?");

        assert_eq!(message.user, "What is in the Q3 report?");
        assert_eq!(message.assistant, None);
        assert_eq!(message.doc_ids, None);
        assert_eq!(message.chunk_ids, None);
        assert!(!message.has_sources());
    }

    #[test]
    fn test_chat_message_tolerates_missing_fields() {
        let message: ChatMessage = serde_json::from_str(r#"{"user":"hi"}"#).unwrap();

        assert_eq!(message, ChatMessage::from_user("hi"));
    }

    #[test]
    fn test_chat_message_serializes_nulls() {
        let json = serde_json::to_value(ChatMessage::from_user("hi")).unwrap();

        assert_eq!(
            json,
            serde_json::json!({"user": "hi", "assistant": null, "doc_ids": null, "chunk_ids": null})
        );
    }

    #[test]
    fn test_loaded_chat_into_conversation() {
        let body = r#"{
            "chat_id": 42,
            "title": "Quarterly numbers",
            "created_at": "2024-11-26T11:24:05.123456",
            "messages": [
                {"user": "revenue?", "assistant": "Up 4%.", "doc_ids": [3], "chunk_ids": ["a1"]}
            ]
        }"#;
        let chat: LoadedChat = serde_json::from_str(body).unwrap();
        let conversation = Conversation::from(chat);

        assert_eq!(conversation.id, "42");
        assert_eq!(conversation.chat_id(), Ok(42));
        assert_eq!(conversation.title, "Quarterly numbers");
        assert_eq!(conversation.created_at.to_string(), "2024-11-26 11:24:05");
        assert_eq!(conversation.messages.len(), 1);
        assert!(conversation.messages[0].has_sources());
    }

    #[test]
    fn test_save_message_request_copies_message() {
        let message = ChatMessage {
            user: "q".into(),
            assistant: Some("a".into()),
            doc_ids: Some(vec![1, 2]),
            chunk_ids: None,
        };
        let request = SaveMessageRequest::new(9, &message);

        assert_eq!(request.chat_id, 9);
        assert_eq!(request.user, "q");
        assert_eq!(request.assistant.as_deref(), Some("a"));
        assert_eq!(request.doc_ids, Some(vec![1, 2]));
        assert_eq!(request.chunk_ids, None);
    }
}
