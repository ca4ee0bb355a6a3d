//! # Conversation history
//!
//! Client-side list of conversations plus the lifecycle of a single chat
//! turn: the user message is appended optimistically, the reply streams into
//! it, and the turn is either committed with its citations or rolled back so
//! the conversation looks exactly as it did before the message was sent.

use std::collections::HashSet;

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::models::{ChatMessage, Conversation};
use crate::streaming::AssembledReply;

/// Most conversations a user may keep.
pub const MAX_CONVERSATIONS: usize = 50;

/// Characters of the first message used as a new conversation's title.
pub const TITLE_PREFIX_CHARS: usize = 30;

/// Title used when a conversation is created without a first message.
pub const DEFAULT_TITLE: &str = "New chat";

/// Rejected history operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum HistoryError {
    /// Creating another conversation would exceed [`MAX_CONVERSATIONS`].
    #[error("at most {limit} conversations can be kept; delete an existing one first")]
    LimitReached {
        /// The cap that was hit.
        limit: usize,
    },
    /// No conversation has this id.
    #[error("conversation {0} not found")]
    UnknownConversation(String),
    /// A reply is already streaming into this conversation.
    #[error("conversation {0} is already waiting for a reply")]
    TurnInFlight(String),
}

/// Handle for a turn whose reply is still streaming.
///
/// Consumed by [`ChatHistory::complete_turn`] or [`ChatHistory::rollback_turn`].
#[derive(Debug, PartialEq, Eq)]
#[must_use = "a pending turn must be completed or rolled back"]
pub struct PendingTurn {
    conversation_id: String,
    /// Number of messages the conversation had before this turn.
    prior_len: usize,
}

/// Conversations newest first, with the current selection.
#[derive(Debug, Default)]
pub struct ChatHistory {
    conversations: Vec<Conversation>,
    current: Option<String>,
    in_flight: HashSet<String>,
}

impl ChatHistory {
    /// Builds the history from the backend listing and selects the newest.
    #[must_use]
    pub fn from_loaded(conversations: Vec<Conversation>) -> Self {
        let current = conversations.first().map(|conv| conv.id.clone());
        Self {
            conversations,
            current,
            in_flight: HashSet::new(),
        }
    }

    /// Title for a conversation started by `initial_message`.
    #[must_use]
    pub fn new_chat_title(initial_message: Option<&str>) -> String {
        match initial_message.map(str::trim) {
            Some(message) if !message.is_empty() => {
                message.chars().take(TITLE_PREFIX_CHARS).collect()
            }
            _ => DEFAULT_TITLE.to_string(),
        }
    }

    /// Every conversation, newest first.
    #[must_use]
    pub fn conversations(&self) -> &[Conversation] {
        &self.conversations
    }

    /// Number of conversations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.conversations.len()
    }

    /// Whether there are no conversations.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.conversations.is_empty()
    }

    /// Looks up conversation `id`.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Conversation> {
        self.conversations.iter().find(|conv| conv.id == id)
    }

    /// The selected conversation, if any.
    #[must_use]
    pub fn current(&self) -> Option<&Conversation> {
        self.current.as_deref().and_then(|id| self.get(id))
    }

    /// Selects conversation `id`.
    ///
    /// # Errors
    /// [`HistoryError::UnknownConversation`] when `id` is not in the history.
    pub fn select(&mut self, id: &str) -> Result<&Conversation, HistoryError> {
        let index = self.index_of(id)?;
        self.current = Some(id.to_string());
        Ok(&self.conversations[index])
    }

    /// Checks whether another conversation may be created.
    ///
    /// # Errors
    /// [`HistoryError::LimitReached`] at [`MAX_CONVERSATIONS`].
    pub fn ensure_capacity(&self) -> Result<(), HistoryError> {
        if self.conversations.len() >= MAX_CONVERSATIONS {
            return Err(HistoryError::LimitReached {
                limit: MAX_CONVERSATIONS,
            });
        }
        Ok(())
    }

    /// Adds a freshly created conversation at the front and selects it.
    ///
    /// # Errors
    /// [`HistoryError::LimitReached`] at [`MAX_CONVERSATIONS`].
    pub fn insert_new(&mut self, conversation: Conversation) -> Result<(), HistoryError> {
        self.ensure_capacity()?;
        self.current = Some(conversation.id.clone());
        self.conversations.insert(0, conversation);
        Ok(())
    }

    /// Renames conversation `id`.
    ///
    /// # Errors
    /// [`HistoryError::UnknownConversation`] when `id` is not in the history.
    pub fn rename(&mut self, id: &str, title: impl Into<String>) -> Result<(), HistoryError> {
        let index = self.index_of(id)?;
        self.conversations[index].title = title.into();
        Ok(())
    }

    /// Removes conversation `id`, clearing the selection if it was current.
    ///
    /// # Errors
    /// [`HistoryError::UnknownConversation`] when `id` is not in the history.
    pub fn remove(&mut self, id: &str) -> Result<Conversation, HistoryError> {
        let index = self.index_of(id)?;
        if self.current.as_deref() == Some(id) {
            self.current = None;
        }
        self.in_flight.remove(id);
        Ok(self.conversations.remove(index))
    }

    /// Drops every conversation.
    pub fn clear(&mut self) {
        self.conversations.clear();
        self.current = None;
        self.in_flight.clear();
    }

    /// Optimistically appends the user's message to conversation `id`.
    ///
    /// # Errors
    /// [`HistoryError::UnknownConversation`] for an unknown id and
    /// [`HistoryError::TurnInFlight`] when a reply is already streaming into
    /// the conversation.
    pub fn begin_turn(
        &mut self,
        id: &str,
        user_text: impl Into<String>,
    ) -> Result<PendingTurn, HistoryError> {
        let index = self.index_of(id)?;
        if self.in_flight.contains(id) {
            return Err(HistoryError::TurnInFlight(id.to_string()));
        }

        let conversation = &mut self.conversations[index];
        let prior_len = conversation.messages.len();
        conversation.messages.push(ChatMessage::from_user(user_text));
        self.in_flight.insert(id.to_string());
        debug!(conversation = id, prior_len, "turn started");

        Ok(PendingTurn {
            conversation_id: id.to_string(),
            prior_len,
        })
    }

    /// Messages to send with the turn: history plus the new user message.
    #[must_use]
    pub fn outgoing_messages(&self, turn: &PendingTurn) -> Vec<ChatMessage> {
        self.get(&turn.conversation_id)
            .map(|conv| conv.messages.clone())
            .unwrap_or_default()
    }

    /// Shows partial reply text on the pending message.
    pub fn apply_progress(&mut self, turn: &PendingTurn, visible_text: &str) {
        if let Some(message) = self.pending_message_mut(turn) {
            message.assistant = Some(visible_text.to_string());
        }
    }

    /// Commits the finished reply: text and citations land together.
    ///
    /// Returns the completed message, or `None` if the conversation was
    /// deleted while the reply was streaming.
    pub fn complete_turn(
        &mut self,
        turn: PendingTurn,
        reply: AssembledReply,
    ) -> Option<&ChatMessage> {
        self.in_flight.remove(&turn.conversation_id);
        let AssembledReply {
            assistant_text,
            source_document_ids,
            source_chunk_ids,
        } = reply;

        let Some(message) = self.pending_message_mut(&turn) else {
            warn!(
                conversation = %turn.conversation_id,
                "conversation vanished before reply completed"
            );
            return None;
        };
        *message = ChatMessage {
            user: std::mem::take(&mut message.user),
            assistant: Some(assistant_text),
            doc_ids: source_document_ids,
            chunk_ids: source_chunk_ids,
        };
        info!(conversation = %turn.conversation_id, "turn completed");
        Some(&*message)
    }

    /// Discards the pending message so the conversation returns to the
    /// state it had before the turn began.
    pub fn rollback_turn(&mut self, turn: PendingTurn) {
        self.in_flight.remove(&turn.conversation_id);
        if let Ok(index) = self.index_of(&turn.conversation_id) {
            self.conversations[index].messages.truncate(turn.prior_len);
            warn!(
                conversation = %turn.conversation_id,
                restored_len = turn.prior_len,
                "turn rolled back"
            );
        }
    }

    /// Whether a reply is streaming into conversation `id`.
    #[must_use]
    pub fn is_in_flight(&self, id: &str) -> bool {
        self.in_flight.contains(id)
    }

    fn pending_message_mut(&mut self, turn: &PendingTurn) -> Option<&mut ChatMessage> {
        let index = self.index_of(&turn.conversation_id).ok()?;
        self.conversations[index].messages.get_mut(turn.prior_len)
    }

    fn index_of(&self, id: &str) -> Result<usize, HistoryError> {
        self.conversations
            .iter()
            .position(|conv| conv.id == id)
            .ok_or_else(|| HistoryError::UnknownConversation(id.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Timestamp;

    fn conversation(id: &str, messages: usize) -> Conversation {
        Conversation {
            id: id.to_string(),
            title: format!("chat {id}"),
            created_at: Timestamp::parse("2024-11-26T11:24:05").unwrap(),
            messages: (0..messages)
                .map(|n| ChatMessage {
                    user: format!("question {n}"),
                    assistant: Some(format!("answer {n}")),
                    doc_ids: Some(vec![i64::try_from(n).unwrap()]),
                    chunk_ids: None,
                })
                .collect(),
        }
    }

    fn reply(text: &str) -> AssembledReply {
        AssembledReply {
            assistant_text: text.to_string(),
            source_document_ids: Some(vec![3, 7]),
            source_chunk_ids: Some(vec!["a1".to_string()]),
        }
    }

    #[test]
    fn from_loaded_selects_newest() {
        let history = ChatHistory::from_loaded(vec![conversation("2", 0), conversation("1", 0)]);

        assert_eq!(history.current().map(|c| c.id.as_str()), Some("2"));
        assert_eq!(history.len(), 2);
        assert!(ChatHistory::from_loaded(Vec::new()).current().is_none());
    }

    #[test]
    fn new_chat_title_uses_message_prefix() {
        let long = "a".repeat(45);
        assert_eq!(ChatHistory::new_chat_title(Some(&long)).chars().count(), 30);
        assert_eq!(ChatHistory::new_chat_title(Some("short")), "short");
        assert_eq!(ChatHistory::new_chat_title(Some("   ")), DEFAULT_TITLE);
        assert_eq!(ChatHistory::new_chat_title(None), DEFAULT_TITLE);
    }

    #[test]
    fn new_chat_title_counts_characters_not_bytes() {
        let korean = "분기별 매출 보고서에서 가장 큰 변화는 무엇이었나요? 자세히 알려주세요";
        let title = ChatHistory::new_chat_title(Some(korean));

        assert_eq!(title.chars().count(), TITLE_PREFIX_CHARS);
        assert!(korean.starts_with(&title));
    }

    #[test]
    fn insert_new_respects_limit() {
        let mut history = ChatHistory::default();
        for id in 0..MAX_CONVERSATIONS {
            history.insert_new(conversation(&id.to_string(), 0)).unwrap();
        }

        assert_eq!(
            history.ensure_capacity(),
            Err(HistoryError::LimitReached { limit: 50 })
        );
        assert_eq!(
            history.insert_new(conversation("overflow", 0)),
            Err(HistoryError::LimitReached { limit: 50 })
        );
        assert_eq!(history.len(), MAX_CONVERSATIONS);
        assert_eq!(history.current().map(|c| c.id.as_str()), Some("49"));
    }

    #[test]
    fn select_rename_and_remove() {
        let mut history =
            ChatHistory::from_loaded(vec![conversation("2", 1), conversation("1", 0)]);

        assert_eq!(history.select("1").unwrap().id, "1");
        history.rename("1", "Renamed").unwrap();
        assert_eq!(history.get("1").unwrap().title, "Renamed");

        let removed = history.remove("1").unwrap();
        assert_eq!(removed.id, "1");
        assert!(history.current().is_none());

        assert_eq!(
            history.select("1").unwrap_err(),
            HistoryError::UnknownConversation("1".to_string())
        );
        assert!(history.rename("missing", "x").is_err());
    }

    #[test]
    fn removing_other_conversation_keeps_selection() {
        let mut history =
            ChatHistory::from_loaded(vec![conversation("2", 0), conversation("1", 0)]);
        history.remove("1").unwrap();

        assert_eq!(history.current().map(|c| c.id.as_str()), Some("2"));
    }

    #[test]
    fn clear_drops_everything() {
        let mut history = ChatHistory::from_loaded(vec![conversation("1", 2)]);
        history.clear();

        assert!(history.is_empty());
        assert!(history.current().is_none());
    }

    #[test]
    fn completed_turn_carries_text_and_sources() {
        let mut history = ChatHistory::from_loaded(vec![conversation("1", 2)]);
        let turn = history.begin_turn("1", "new question").unwrap();
        assert_eq!(turn.prior_len, 2);

        let outgoing = history.outgoing_messages(&turn);
        assert_eq!(outgoing.len(), 3);
        assert_eq!(outgoing[2], ChatMessage::from_user("new question"));

        history.apply_progress(&turn, "partial");
        assert_eq!(
            history.get("1").unwrap().messages[2].assistant.as_deref(),
            Some("partial")
        );

        let message = history.complete_turn(turn, reply("final")).unwrap().clone();
        assert_eq!(message.user, "new question");
        assert_eq!(message.assistant.as_deref(), Some("final"));
        assert_eq!(message.doc_ids, Some(vec![3, 7]));
        assert_eq!(message.chunk_ids, Some(vec!["a1".to_string()]));
        assert!(!history.is_in_flight("1"));
    }

    #[test]
    fn rollback_restores_prior_messages() {
        let mut history = ChatHistory::from_loaded(vec![conversation("1", 3)]);
        let before = history.get("1").unwrap().messages.clone();

        let turn = history.begin_turn("1", "doomed question").unwrap();
        history.apply_progress(&turn, "half an ans");
        history.rollback_turn(turn);

        let after = &history.get("1").unwrap().messages;
        assert_eq!(after.len(), 3);
        assert_eq!(after, &before);
        assert!(
            after
                .iter()
                .all(|m| m.assistant.as_deref() != Some("half an ans"))
        );
        assert!(!history.is_in_flight("1"));
    }

    #[test]
    fn rollback_on_empty_conversation() {
        let mut history = ChatHistory::from_loaded(vec![conversation("1", 0)]);
        let turn = history.begin_turn("1", "first").unwrap();
        history.rollback_turn(turn);

        assert!(history.get("1").unwrap().messages.is_empty());
    }

    #[test]
    fn one_turn_in_flight_per_conversation() {
        let mut history =
            ChatHistory::from_loaded(vec![conversation("1", 0), conversation("2", 0)]);
        let first = history.begin_turn("1", "a").unwrap();

        assert_eq!(
            history.begin_turn("1", "b"),
            Err(HistoryError::TurnInFlight("1".to_string()))
        );
        let other = history.begin_turn("2", "c").unwrap();

        history.rollback_turn(first);
        let retry = history.begin_turn("1", "b").unwrap();
        history.complete_turn(retry, reply("ok"));
        history.rollback_turn(other);

        assert_eq!(history.get("1").unwrap().messages.len(), 1);
        assert!(history.get("2").unwrap().messages.is_empty());
    }

    #[test]
    fn completing_after_delete_is_a_no_op() {
        let mut history = ChatHistory::from_loaded(vec![conversation("1", 0)]);
        let turn = history.begin_turn("1", "q").unwrap();
        history.remove("1").unwrap();

        assert!(history.complete_turn(turn, reply("late")).is_none());
    }
}
