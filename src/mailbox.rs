use async_trait::async_trait;
use thiserror::Error;

use crate::models::{Label, LabelVisibility, Message};

/// Classified failures from the mailbox collaborator. Malformed content
/// never surfaces here; it is resolved to sentinels inside the core.
#[derive(Debug, Error)]
pub enum MailboxError {
    #[error("not found: {0}")]
    NotFound(String),
    #[error("already exists: {0}")]
    Conflict(String),
    #[error("quota exceeded: {0}")]
    Quota(String),
    #[error("transport failure: {0}")]
    Transport(String),
}

pub type MailboxResult<T> = Result<T, MailboxError>;

/// The mailbox collaborator: the sole source of truth for messages and
/// labels. Every core operation re-fetches what it needs through this
/// trait; nothing is cached between invocations.
#[async_trait]
pub trait Mailbox: Send + Sync {
    /// Run a search query, returning at most `max_results` message ids in
    /// arrival order. An empty result is a valid success.
    async fn list_messages(&self, query: &str, max_results: u32) -> MailboxResult<Vec<String>>;

    /// Fetch a message's metadata, restricted to the named headers.
    async fn get_metadata(&self, id: &str, headers: &[&str]) -> MailboxResult<Message>;

    /// Fetch a message in full, including its MIME part tree.
    async fn get_full(&self, id: &str) -> MailboxResult<Message>;

    /// Submit a serialized RFC 822 message, optionally threading it into an
    /// existing conversation. Returns the new message id.
    async fn send_raw(&self, raw: Vec<u8>, thread_id: Option<&str>) -> MailboxResult<String>;

    async fn list_labels(&self) -> MailboxResult<Vec<Label>>;

    /// Create a label. Fails with `Conflict` if the name already exists;
    /// callers treat that as benign and re-list.
    async fn create_label(&self, name: &str, visibility: LabelVisibility) -> MailboxResult<Label>;

    /// Add labels to a message without removing any existing ones.
    async fn add_labels(&self, message_id: &str, label_ids: &[String]) -> MailboxResult<()>;

    /// Move a message to trash (recoverable per mailbox semantics).
    async fn trash_message(&self, id: &str) -> MailboxResult<()>;
}
