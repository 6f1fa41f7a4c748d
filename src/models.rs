use serde::{Deserialize, Serialize};

/// A single header line as returned by the mailbox. Names are not
/// guaranteed unique; lookups take the first exact match.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Header {
    pub name: String,
    pub value: String,
}

impl Header {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// One node of a message's MIME tree. `body` holds the part's payload as
/// URL-safe Base64 text; the mailbox collaborator normalizes to that form.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MessagePart {
    pub mime_type: String,
    pub body: Option<String>,
    pub parts: Vec<MessagePart>,
}

/// Immutable snapshot of a message fetched from the mailbox.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Message {
    pub id: String,
    pub thread_id: String,
    pub label_ids: Vec<String>,
    pub snippet: Option<String>,
    pub headers: Vec<Header>,
    pub payload: Option<MessagePart>,
}

/// Visibility flags for a newly created label.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LabelVisibility {
    /// Whether the label shows in the sidebar ("labelShow" / "labelHide").
    pub label_list: String,
    /// Whether the label shows on messages in the list ("show" / "hide").
    pub message_list: String,
}

impl Default for LabelVisibility {
    fn default() -> Self {
        Self {
            label_list: "labelShow".to_string(),
            message_list: "show".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Label {
    pub id: String,
    pub name: String,
    pub visibility: LabelVisibility,
}

/// Display record for one ticket. Built fresh per query, never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TicketSummary {
    pub id: String,
    pub subject: String,
    pub sender: String,
    pub snippet: String,
}

/// A threaded reply ready for serialization and transport.
#[derive(Debug, Clone)]
pub struct OutboundReply {
    pub from: String,
    pub to: String,
    pub subject: String,
    pub body: String,
    pub in_reply_to: Option<String>,
    pub references: Option<String>,
    pub thread_id: Option<String>,
}
