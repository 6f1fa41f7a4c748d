use crate::labels::{apply_label, ensure_label};
use crate::mailbox::{Mailbox, MailboxResult};
use crate::mime::{NO_PLAINTEXT_BODY, extract_plain_text};
use crate::models::TicketSummary;
use crate::reply::ReplyComposer;

/// Query used for the unread-ticket listing.
pub const UNREAD_QUERY: &str = "is:unread label:inbox";

const UNREAD_CAP: u32 = 10;
const SEARCH_CAP: u32 = 20;

const METADATA_HEADERS: &[&str] = &["Subject", "From"];
const REPLY_HEADERS: &[&str] = &["Subject", "From", "Message-ID"];

/// Result of a trash request. The destructive call is only issued behind
/// an explicit affirmative confirmation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrashOutcome {
    Trashed,
    Cancelled,
}

/// Orchestrates the ticket workflow against a mailbox collaborator.
/// Stateless between invocations: every operation re-fetches what it needs.
pub struct TicketQuery<M: Mailbox> {
    mailbox: M,
    composer: ReplyComposer,
    in_progress_label: String,
}

impl<M: Mailbox> TicketQuery<M> {
    pub fn new(
        mailbox: M,
        identity: impl Into<String>,
        in_progress_label: impl Into<String>,
    ) -> Self {
        Self {
            mailbox,
            composer: ReplyComposer::new(identity),
            in_progress_label: in_progress_label.into(),
        }
    }

    /// Latest unread inbox tickets, capped at 10, in arrival order. An
    /// empty list is a success, reported distinctly from a query failure.
    pub async fn list_unread(&self) -> MailboxResult<Vec<TicketSummary>> {
        self.summaries(UNREAD_QUERY, UNREAD_CAP).await
    }

    /// Arbitrary query text, capped at 20 results.
    pub async fn search(&self, query: &str) -> MailboxResult<Vec<TicketSummary>> {
        self.summaries(query, SEARCH_CAP).await
    }

    async fn summaries(&self, query: &str, cap: u32) -> MailboxResult<Vec<TicketSummary>> {
        let ids = self.mailbox.list_messages(query, cap).await?;
        let mut summaries = Vec::with_capacity(ids.len());
        for id in ids {
            let msg = self.mailbox.get_metadata(&id, METADATA_HEADERS).await?;
            summaries.push(TicketSummary::from_message(&msg));
        }
        Ok(summaries)
    }

    /// Full ticket text: the extracted plaintext body, or the sentinel
    /// when no part decodes.
    pub async fn read_full(&self, id: &str) -> MailboxResult<String> {
        let msg = self.mailbox.get_full(id).await?;
        Ok(msg
            .payload
            .as_ref()
            .and_then(extract_plain_text)
            .unwrap_or_else(|| NO_PLAINTEXT_BODY.to_string()))
    }

    /// Compose and submit a threaded reply; returns the new message id.
    pub async fn reply(&self, id: &str, text: &str) -> MailboxResult<String> {
        let original = self.mailbox.get_metadata(id, REPLY_HEADERS).await?;
        let reply = self.composer.compose(&original, text);
        let thread_id = reply.thread_id.clone();
        let sent_id = self
            .mailbox
            .send_raw(reply.to_rfc822(), thread_id.as_deref())
            .await?;
        tracing::info!(%sent_id, "reply sent");
        Ok(sent_id)
    }

    /// Move a ticket into the in-progress workflow state. Returns the
    /// label id that was applied.
    pub async fn label_in_progress(&self, id: &str) -> MailboxResult<String> {
        let label_id = ensure_label(&self.mailbox, &self.in_progress_label).await?;
        apply_label(&self.mailbox, id, &label_id).await?;
        Ok(label_id)
    }

    /// Move a ticket to trash, but only when the caller confirmed with a
    /// literal `y` or `Y`. Any other token cancels without touching the
    /// mailbox.
    pub async fn trash(&self, id: &str, confirmation: &str) -> MailboxResult<TrashOutcome> {
        if confirmation != "y" && confirmation != "Y" {
            return Ok(TrashOutcome::Cancelled);
        }
        self.mailbox.trash_message(id).await?;
        Ok(TrashOutcome::Trashed)
    }
}
