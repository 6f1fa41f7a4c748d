use crate::models::{Message, OutboundReply};
use crate::ticket::{NO_SUBJECT, header_value};

/// Builds correctly threaded outbound replies for the authenticated
/// account. The sending identity is injected so the composer is testable
/// against arbitrary accounts.
#[derive(Debug, Clone)]
pub struct ReplyComposer {
    from: String,
}

impl ReplyComposer {
    pub fn new(from: impl Into<String>) -> Self {
        Self { from: from.into() }
    }

    /// Compose a reply to `original`. Threading is best effort: when the
    /// original carries no Message-ID the reply goes out without
    /// In-Reply-To/References rather than failing.
    pub fn compose(&self, original: &Message, body: &str) -> OutboundReply {
        let subject = reply_subject(header_value(&original.headers, "Subject"));
        let to = header_value(&original.headers, "From")
            .unwrap_or_default()
            .to_string();
        let message_id = header_value(&original.headers, "Message-ID").map(str::to_string);
        let thread_id = if original.thread_id.is_empty() {
            None
        } else {
            Some(original.thread_id.clone())
        };

        OutboundReply {
            from: self.from.clone(),
            to,
            subject,
            body: body.to_string(),
            in_reply_to: message_id.clone(),
            references: message_id,
            thread_id,
        }
    }
}

/// Apply the "Re: " rule: prefix unless the subject already starts with
/// "re:" case-insensitively. Idempotent; a missing subject takes the
/// placeholder before prefixing.
fn reply_subject(original: Option<&str>) -> String {
    let subject = original.unwrap_or(NO_SUBJECT);
    if subject.to_lowercase().starts_with("re:") {
        subject.to_string()
    } else {
        format!("Re: {subject}")
    }
}

impl OutboundReply {
    /// Serialize to the raw RFC 822 byte form handed to the transport:
    /// CRLF-framed headers, blank line, plain-text body. Encoding these
    /// bytes for the wire is the mailbox collaborator's job.
    pub fn to_rfc822(&self) -> Vec<u8> {
        let mut out = String::new();
        out.push_str(&format!("From: {}\r\n", self.from));
        out.push_str(&format!("To: {}\r\n", self.to));
        out.push_str(&format!("Subject: {}\r\n", self.subject));
        out.push_str(&format!("Date: {}\r\n", chrono::Utc::now().to_rfc2822()));
        if let Some(id) = &self.in_reply_to {
            out.push_str(&format!("In-Reply-To: {id}\r\n"));
        }
        if let Some(id) = &self.references {
            out.push_str(&format!("References: {id}\r\n"));
        }
        out.push_str("MIME-Version: 1.0\r\n");
        out.push_str("Content-Type: text/plain; charset=\"UTF-8\"\r\n");
        out.push_str("\r\n");
        out.push_str(&self.body);
        out.into_bytes()
    }
}
