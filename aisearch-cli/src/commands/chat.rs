//! `chat` subcommands: conversation management and streamed turns.

use std::{
    fmt::Write as _,
    io::{self, Write},
};

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use shared::{
    history::{ChatHistory, HistoryError},
    models::{
        ChatMessage, Conversation, SaveChatRequest, SaveMessageRequest, StreamChatRequest,
    },
    streaming::{StreamError, drive_reply},
};
use thiserror::Error;
use tracing::{error, info};

use super::{AppContext, confirm};
use crate::client::{ApiClient, ApiError};

/// Failures of a chat turn.
#[derive(Debug, Error)]
pub enum ChatError {
    /// The reply could not be streamed; the turn was rolled back.
    #[error("Unable to connect to the server. Please contact your administrator. ({0})")]
    Transport(String),
    /// The conversation is unknown, busy, or the history is full.
    #[error(transparent)]
    History(#[from] HistoryError),
    /// The backend gave a conversation a non-numeric id.
    #[error("conversation id {0:?} is not numeric")]
    InvalidChatId(String),
    /// A message or title was empty after trimming.
    #[error("{0} must not be empty")]
    Blank(&'static str),
}

impl From<StreamError> for ChatError {
    fn from(err: StreamError) -> Self {
        match err {
            StreamError::Transport(reason) => Self::Transport(reason),
        }
    }
}

/// Conversation commands.
#[derive(Subcommand, Debug)]
pub enum ChatCommand {
    /// List saved conversations, newest first
    List,
    /// Print every message of a conversation
    Show(ChatIdArgs),
    /// Create an empty conversation
    New {
        /// Conversation title
        #[arg(long)]
        title: Option<String>,
    },
    /// Send a message and stream the reply
    Send(SendArgs),
    /// Change a conversation's title
    Rename {
        #[command(flatten)]
        target: ChatIdArgs,
        /// New title
        title: String,
    },
    /// Delete one conversation
    Delete {
        #[command(flatten)]
        target: ChatIdArgs,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// Delete every conversation
    DeleteAll {
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

/// Selects one conversation.
#[derive(Args, Debug)]
pub struct ChatIdArgs {
    /// Conversation identifier
    #[arg(long)]
    pub chat: i64,
}

/// Arguments of `chat send`.
#[derive(Args, Debug)]
#[command(about = "Send a message and stream the reply")]
pub struct SendArgs {
    /// Conversation to continue; a new one is created when omitted
    #[arg(long)]
    pub chat: Option<i64>,

    /// Message text
    #[arg(required = true)]
    pub text: String,
}

/// Runs a `chat` subcommand against the signed-in account.
pub async fn run(ctx: &AppContext, command: ChatCommand) -> Result<()> {
    let client = ctx.authenticated_client()?;
    match command {
        ChatCommand::List => list(&client).await,
        ChatCommand::Show(args) => show(&client, args.chat).await,
        ChatCommand::New { title } => {
            let title = match title {
                Some(title) => non_blank(&title, "title")?.to_string(),
                None => ChatHistory::new_chat_title(None),
            };
            let history = load_history(&client).await?;
            let conversation = create_conversation(&client, &history, title).await?;
            println!("Created conversation {} ({})", conversation.id, conversation.title);
            Ok(())
        }
        ChatCommand::Send(args) => send(&client, args).await,
        ChatCommand::Rename { target, title } => rename(&client, target.chat, &title).await,
        ChatCommand::Delete { target, yes } => {
            delete(&client, target.chat, |title| {
                confirm(&format!("Delete conversation {} ({title})?", target.chat), yes)
            })
            .await
        }
        ChatCommand::DeleteAll { yes } => {
            if !confirm("Delete every conversation?", yes)? {
                println!("Cancelled.");
                return Ok(());
            }
            delete_all(&client).await
        }
    }
}

/// Trims `value`, rejecting it when nothing is left.
fn non_blank<'a>(value: &'a str, what: &'static str) -> Result<&'a str, ChatError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ChatError::Blank(what));
    }
    Ok(trimmed)
}

async fn load_history(client: &ApiClient) -> Result<ChatHistory> {
    let chats = client
        .load_chats()
        .await
        .context("failed to load conversations")?;
    Ok(ChatHistory::from_loaded(
        chats.into_iter().map(Conversation::from).collect(),
    ))
}

/// Numeric id of conversation `id`, as request bodies carry it.
fn chat_id_of(history: &ChatHistory, id: &str) -> Result<i64, ChatError> {
    let conversation = history
        .get(id)
        .ok_or_else(|| HistoryError::UnknownConversation(id.to_string()))?;
    conversation
        .chat_id()
        .map_err(|_| ChatError::InvalidChatId(id.to_string()))
}

async fn list(client: &ApiClient) -> Result<()> {
    let history = load_history(client).await?;
    if history.is_empty() {
        println!("No conversations yet.");
        return Ok(());
    }

    for conversation in history.conversations() {
        println!(
            "- [{}] {} ({} messages, created {})",
            conversation.id,
            conversation.title,
            conversation.messages.len(),
            conversation.created_at
        );
    }
    Ok(())
}

async fn show(client: &ApiClient, chat_id: i64) -> Result<()> {
    let mut history = load_history(client).await?;
    let conversation = history.select(&chat_id.to_string())?;

    println!("{} (created {})", conversation.title, conversation.created_at);
    for message in &conversation.messages {
        println!();
        println!("You: {}", message.user);
        if let Some(answer) = &message.assistant {
            println!("Assistant: {answer}");
        }
        if let Some(sources) = render_sources(message) {
            println!("{sources}");
        }
    }
    Ok(())
}

/// Creates an empty conversation on the backend, respecting the history limit.
async fn create_conversation(
    client: &ApiClient,
    history: &ChatHistory,
    title: String,
) -> Result<Conversation> {
    history.ensure_capacity()?;

    let saved = client
        .save_chat(&SaveChatRequest {
            title: title.clone(),
            messages: Vec::new(),
        })
        .await
        .context("failed to create conversation")?;

    Ok(Conversation {
        id: saved.chat_id.to_string(),
        title,
        created_at: saved.created_at,
        messages: Vec::new(),
    })
}

async fn send(client: &ApiClient, args: SendArgs) -> Result<()> {
    let text = non_blank(&args.text, "message")?;
    let mut history = load_history(client).await?;

    if let Some(chat) = args.chat {
        history.select(&chat.to_string())?;
    } else {
        let title = ChatHistory::new_chat_title(Some(text));
        let conversation = create_conversation(client, &history, title).await?;
        eprintln!("Started conversation {}", conversation.id);
        history.insert_new(conversation)?;
    }
    let conversation_id = history
        .current()
        .map(|conversation| conversation.id.clone())
        .context("no conversation selected")?;

    let mut printed = 0;
    let outcome = send_turn(client, &mut history, &conversation_id, text, |visible| {
        print!("{}", visible.get(printed..).unwrap_or_default());
        io::stdout().flush().ok();
        printed = visible.len();
    })
    .await;

    let message = match outcome {
        Ok(message) => message,
        Err(err) => {
            println!();
            error!(conversation = %conversation_id, error = %err, "chat turn failed");
            return Err(err.into());
        }
    };

    if let Some(answer) = &message.assistant {
        println!("{}", answer.get(printed..).unwrap_or_default());
    }
    if let Some(sources) = render_sources(&message) {
        println!("{sources}");
    }

    let chat_id = chat_id_of(&history, &conversation_id)?;
    client
        .save_message(&SaveMessageRequest::new(chat_id, &message))
        .await
        .context("reply received but could not be saved")?;
    Ok(())
}

async fn rename(client: &ApiClient, chat_id: i64, title: &str) -> Result<()> {
    let title = non_blank(title, "title")?;
    let mut history = load_history(client).await?;
    let id = chat_id.to_string();
    let previous = history.select(&id)?.title.clone();

    client
        .update_chat_title(chat_id, title)
        .await
        .context("failed to rename conversation")?;
    history.rename(&id, title)?;
    println!("Renamed conversation {chat_id} from {previous:?} to {title:?}");
    Ok(())
}

/// Deletes one conversation once `confirmed` accepts its title.
async fn delete<F>(client: &ApiClient, chat_id: i64, confirmed: F) -> Result<()>
where
    F: FnOnce(&str) -> Result<bool>,
{
    let mut history = load_history(client).await?;
    let id = chat_id.to_string();
    let title = history.select(&id)?.title.clone();
    if !confirmed(&title)? {
        println!("Cancelled.");
        return Ok(());
    }

    client
        .delete_chat(chat_id)
        .await
        .context("failed to delete conversation")?;
    history.remove(&id)?;
    println!("Deleted conversation {chat_id} ({title})");
    Ok(())
}

async fn delete_all(client: &ApiClient) -> Result<()> {
    let mut history = load_history(client).await?;
    let response = client
        .delete_all_chats()
        .await
        .context("failed to delete conversations")?;
    let removed = history.len();
    history.clear();
    println!("{} ({removed} removed)", response.message);
    Ok(())
}

/// Runs one turn: optimistic append, streamed reply, then commit or rollback.
///
/// `on_progress` receives the visible reply text as it grows. On failure the
/// conversation is restored to the messages it had before the call.
pub async fn send_turn<F>(
    client: &ApiClient,
    history: &mut ChatHistory,
    conversation_id: &str,
    text: &str,
    mut on_progress: F,
) -> Result<ChatMessage, ChatError>
where
    F: FnMut(&str),
{
    let chat_id = chat_id_of(history, conversation_id)?;
    let turn = history.begin_turn(conversation_id, text)?;

    let request = StreamChatRequest {
        chat_id,
        messages: history.outgoing_messages(&turn),
    };

    let outcome = match client.stream_chat(&request).await {
        Ok(stream) => drive_reply(stream, |visible| {
            history.apply_progress(&turn, visible);
            on_progress(visible);
        })
        .await
        .map_err(ChatError::from),
        Err(err) => Err(transport_error(&err)),
    };

    match outcome {
        Ok(reply) => {
            let message = history
                .complete_turn(turn, reply)
                .cloned()
                .ok_or_else(|| HistoryError::UnknownConversation(conversation_id.to_string()))?;
            info!(chat_id, sources = message.has_sources(), "stream finished");
            Ok(message)
        }
        Err(err) => {
            history.rollback_turn(turn);
            Err(err)
        }
    }
}

fn transport_error(err: &ApiError) -> ChatError {
    ChatError::Transport(err.to_string())
}

fn render_sources(message: &ChatMessage) -> Option<String> {
    if !message.has_sources() {
        return None;
    }

    let mut line = String::from("Sources:");
    if let Some(doc_ids) = message.doc_ids.as_deref().filter(|ids| !ids.is_empty()) {
        let ids: Vec<String> = doc_ids.iter().map(ToString::to_string).collect();
        let _ = write!(line, " documents {}", ids.join(", "));
    }
    if let Some(chunk_ids) = message.chunk_ids.as_deref().filter(|ids| !ids.is_empty()) {
        let separator = if line.len() > "Sources:".len() { ";" } else { "" };
        let _ = write!(line, "{separator} chunks {}", chunk_ids.join(", "));
    }
    Some(line)
}
