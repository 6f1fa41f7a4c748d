use crate::models::{Header, Message, TicketSummary};

pub const NO_SUBJECT: &str = "(no subject)";
pub const NO_SENDER: &str = "(no sender)";
pub const NO_SNIPPET: &str = "(no snippet)";

/// First case-sensitive exact match for `name` in the header list.
/// Duplicate headers resolve to the earliest occurrence.
pub fn header_value<'a>(headers: &'a [Header], name: &str) -> Option<&'a str> {
    headers
        .iter()
        .find(|h| h.name == name)
        .map(|h| h.value.as_str())
}

impl TicketSummary {
    /// Normalize a raw message into its display record. Total: any absent
    /// field resolves to its named default, never an error.
    pub fn from_message(msg: &Message) -> Self {
        Self {
            id: msg.id.clone(),
            subject: header_value(&msg.headers, "Subject")
                .unwrap_or(NO_SUBJECT)
                .to_string(),
            sender: header_value(&msg.headers, "From")
                .unwrap_or(NO_SENDER)
                .to_string(),
            snippet: msg.snippet.clone().unwrap_or_else(|| NO_SNIPPET.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_header_list_resolves_all_defaults() {
        let msg = Message {
            id: "m1".to_string(),
            ..Message::default()
        };
        let summary = TicketSummary::from_message(&msg);
        assert_eq!(summary.id, "m1");
        assert_eq!(summary.subject, NO_SUBJECT);
        assert_eq!(summary.sender, NO_SENDER);
        assert_eq!(summary.snippet, NO_SNIPPET);
    }

    #[test]
    fn headers_and_snippet_are_taken_when_present() {
        let msg = Message {
            id: "m2".to_string(),
            snippet: Some("printer on fire".to_string()),
            headers: vec![
                Header::new("Subject", "Printer broken"),
                Header::new("From", "alice@example.com"),
            ],
            ..Message::default()
        };
        let summary = TicketSummary::from_message(&msg);
        assert_eq!(summary.subject, "Printer broken");
        assert_eq!(summary.sender, "alice@example.com");
        assert_eq!(summary.snippet, "printer on fire");
    }

    #[test]
    fn duplicate_headers_take_first_match() {
        let headers = vec![
            Header::new("Subject", "first"),
            Header::new("Subject", "second"),
        ];
        assert_eq!(header_value(&headers, "Subject"), Some("first"));
    }

    #[test]
    fn header_lookup_is_case_sensitive() {
        let headers = vec![Header::new("subject", "lowercase name")];
        assert_eq!(header_value(&headers, "Subject"), None);
    }
}
