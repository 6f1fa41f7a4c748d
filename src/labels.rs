use crate::mailbox::{Mailbox, MailboxError, MailboxResult};
use crate::models::LabelVisibility;

/// Resolve a label name to its id, creating the label with default
/// visibility if it does not exist yet. Idempotent: a name is never
/// duplicated, and a `Conflict` from a concurrent creator is treated as
/// "label already exists, re-fetch".
pub async fn ensure_label<M: Mailbox>(mailbox: &M, name: &str) -> MailboxResult<String> {
    let labels = mailbox.list_labels().await?;
    for label in &labels {
        tracing::debug!(label = %label.name, id = %label.id, "existing label");
    }
    if let Some(label) = labels.into_iter().find(|l| l.name == name) {
        tracing::debug!(id = %label.id, "label {name} exists");
        return Ok(label.id);
    }

    match mailbox.create_label(name, LabelVisibility::default()).await {
        Ok(label) => {
            tracing::info!(id = %label.id, "created label {name}");
            Ok(label.id)
        }
        Err(MailboxError::Conflict(_)) => {
            // Someone else created it between our list and create.
            mailbox
                .list_labels()
                .await?
                .into_iter()
                .find(|l| l.name == name)
                .map(|l| l.id)
                .ok_or_else(|| MailboxError::Conflict(format!("label {name}")))
        }
        Err(e) => Err(e),
    }
}

/// Apply a label to a message. Purely additive: no existing label is
/// removed, in particular the unread marker stays untouched.
pub async fn apply_label<M: Mailbox>(
    mailbox: &M,
    message_id: &str,
    label_id: &str,
) -> MailboxResult<()> {
    mailbox
        .add_labels(message_id, &[label_id.to_string()])
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mailbox::testing::MockMailbox;

    #[tokio::test]
    async fn ensure_label_creates_when_missing() {
        let mailbox = MockMailbox::default();
        let id = ensure_label(&mailbox, "IN_PROGRESS").await.unwrap();
        let labels = mailbox.labels.lock().unwrap();
        assert_eq!(labels.len(), 1);
        assert_eq!(labels[0].id, id);
        assert_eq!(labels[0].name, "IN_PROGRESS");
        assert_eq!(labels[0].visibility.label_list, "labelShow");
        assert_eq!(labels[0].visibility.message_list, "show");
    }

    #[tokio::test]
    async fn ensure_label_is_idempotent() {
        let mailbox = MockMailbox::default();
        let first = ensure_label(&mailbox, "IN_PROGRESS").await.unwrap();
        let second = ensure_label(&mailbox, "IN_PROGRESS").await.unwrap();
        assert_eq!(first, second);
        assert_eq!(mailbox.labels.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn ensure_label_recovers_from_creation_race() {
        let mailbox = MockMailbox::default();
        // The other caller wins the race: the label exists, but our first
        // list saw a stale empty view, so our create hits Conflict.
        let existing = ensure_label(&mailbox, "IN_PROGRESS").await.unwrap();
        *mailbox.stale_label_read.lock().unwrap() = true;

        let resolved = ensure_label(&mailbox, "IN_PROGRESS").await.unwrap();
        assert_eq!(resolved, existing);
        assert_eq!(mailbox.labels.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn apply_label_adds_without_removing() {
        let mailbox = MockMailbox::with_messages(vec![MockMailbox::message("m1", Vec::new())]);
        apply_label(&mailbox, "m1", "Label_7").await.unwrap();

        let messages = mailbox.messages.lock().unwrap();
        let labels = &messages[0].label_ids;
        assert!(labels.contains(&"Label_7".to_string()));
        // Workflow labeling must not implicitly mark the ticket read.
        assert!(labels.contains(&"UNREAD".to_string()));
        assert!(labels.contains(&"INBOX".to_string()));
    }

    #[tokio::test]
    async fn apply_label_to_unknown_message_is_not_found() {
        let mailbox = MockMailbox::default();
        let err = apply_label(&mailbox, "ghost", "Label_1").await.unwrap_err();
        assert!(matches!(err, MailboxError::NotFound(_)));
    }
}
