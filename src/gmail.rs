use std::io::Cursor;

use async_trait::async_trait;
use base64::{Engine as _, engine::general_purpose};
use google_gmail1::Gmail;
use google_gmail1::api;
use hyper::client::HttpConnector;
use hyper_rustls::HttpsConnector;

use crate::mailbox::{Mailbox, MailboxError, MailboxResult};
use crate::models::{Header, Label, LabelVisibility, Message, MessagePart};

/// Production mailbox backed by the Gmail API. All calls act on the
/// authenticated user ("me").
#[derive(Clone)]
pub struct GmailMailbox {
    hub: Gmail<HttpsConnector<HttpConnector>>,
}

impl GmailMailbox {
    pub fn new(hub: Gmail<HttpsConnector<HttpConnector>>) -> Self {
        Self { hub }
    }
}

#[async_trait]
impl Mailbox for GmailMailbox {
    async fn list_messages(&self, query: &str, max_results: u32) -> MailboxResult<Vec<String>> {
        let (_, list) = self
            .hub
            .users()
            .messages_list("me")
            .q(query)
            .max_results(max_results)
            .doit()
            .await
            .map_err(|e| classify(e, "list messages"))?;

        // Gmail reports an empty result as a missing list; that is a
        // valid success, not an error.
        Ok(list
            .messages
            .unwrap_or_default()
            .into_iter()
            .filter_map(|m| m.id)
            .collect())
    }

    async fn get_metadata(&self, id: &str, headers: &[&str]) -> MailboxResult<Message> {
        let mut req = self
            .hub
            .users()
            .messages_get("me", id)
            .format("metadata");
        for name in headers {
            req = req.add_metadata_headers(name);
        }
        let (_, msg) = req
            .doit()
            .await
            .map_err(|e| classify(e, &format!("get message {id}")))?;
        convert_message(msg, id)
    }

    async fn get_full(&self, id: &str) -> MailboxResult<Message> {
        let (_, msg) = self
            .hub
            .users()
            .messages_get("me", id)
            .format("full")
            .doit()
            .await
            .map_err(|e| classify(e, &format!("get message {id}")))?;
        convert_message(msg, id)
    }

    async fn send_raw(&self, raw: Vec<u8>, thread_id: Option<&str>) -> MailboxResult<String> {
        tracing::debug!(bytes = raw.len(), ?thread_id, "sending raw message");
        let req = api::Message {
            thread_id: thread_id.map(str::to_string),
            ..api::Message::default()
        };
        let mime_type = "message/rfc822"
            .parse()
            .map_err(|_| MailboxError::Transport("invalid upload mime type".to_string()))?;
        let (_, sent) = self
            .hub
            .users()
            .messages_send(req, "me")
            .upload(Cursor::new(raw), mime_type)
            .await
            .map_err(|e| classify(e, "send message"))?;
        sent.id
            .ok_or_else(|| MailboxError::Transport("send response carried no id".to_string()))
    }

    async fn list_labels(&self) -> MailboxResult<Vec<Label>> {
        let (_, list) = self
            .hub
            .users()
            .labels_list("me")
            .doit()
            .await
            .map_err(|e| classify(e, "list labels"))?;

        Ok(list
            .labels
            .unwrap_or_default()
            .into_iter()
            .map(|l| Label {
                id: l.id.unwrap_or_default(),
                name: l.name.unwrap_or_default(),
                visibility: LabelVisibility {
                    label_list: l.label_list_visibility.unwrap_or_default(),
                    message_list: l.message_list_visibility.unwrap_or_default(),
                },
            })
            .collect())
    }

    async fn create_label(
        &self,
        name: &str,
        visibility: LabelVisibility,
    ) -> MailboxResult<Label> {
        let req = api::Label {
            name: Some(name.to_string()),
            label_list_visibility: Some(visibility.label_list.clone()),
            message_list_visibility: Some(visibility.message_list.clone()),
            ..api::Label::default()
        };
        let (_, created) = self
            .hub
            .users()
            .labels_create(req, "me")
            .doit()
            .await
            .map_err(|e| classify(e, &format!("create label {name}")))?;

        Ok(Label {
            id: created.id.unwrap_or_default(),
            name: created.name.unwrap_or_else(|| name.to_string()),
            visibility,
        })
    }

    async fn add_labels(&self, message_id: &str, label_ids: &[String]) -> MailboxResult<()> {
        let req = api::ModifyMessageRequest {
            add_label_ids: Some(label_ids.to_vec()),
            remove_label_ids: None,
        };
        self.hub
            .users()
            .messages_modify(req, "me", message_id)
            .doit()
            .await
            .map_err(|e| classify(e, &format!("modify labels on {message_id}")))?;
        Ok(())
    }

    async fn trash_message(&self, id: &str) -> MailboxResult<()> {
        tracing::debug!(%id, "trashing message");
        self.hub
            .users()
            .messages_trash("me", id)
            .doit()
            .await
            .map_err(|e| classify(e, &format!("trash message {id}")))?;
        Ok(())
    }
}

/// A fetch that comes back without an id is the NotFound condition.
fn convert_message(msg: api::Message, requested_id: &str) -> MailboxResult<Message> {
    let id = msg
        .id
        .ok_or_else(|| MailboxError::NotFound(format!("message {requested_id}")))?;

    let headers = msg
        .payload
        .as_ref()
        .and_then(|p| p.headers.as_ref())
        .map(|headers| {
            headers
                .iter()
                .filter_map(|h| match (&h.name, &h.value) {
                    (Some(name), Some(value)) => Some(Header::new(name, value)),
                    _ => None,
                })
                .collect()
        })
        .unwrap_or_default();

    Ok(Message {
        id,
        thread_id: msg.thread_id.unwrap_or_default(),
        label_ids: msg.label_ids.unwrap_or_default(),
        snippet: msg.snippet,
        headers,
        payload: msg.payload.map(convert_part),
    })
}

fn convert_part(part: api::MessagePart) -> MessagePart {
    MessagePart {
        mime_type: part.mime_type.unwrap_or_default(),
        // The API layer already decoded the wire base64; the part tree
        // carries URL-safe Base64, so re-encode at this boundary.
        body: part
            .body
            .and_then(|b| b.data)
            .map(|data| general_purpose::URL_SAFE_NO_PAD.encode(data)),
        parts: part
            .parts
            .unwrap_or_default()
            .into_iter()
            .map(convert_part)
            .collect(),
    }
}

/// Map a Gmail API failure onto the mailbox error taxonomy.
fn classify(err: google_gmail1::Error, what: &str) -> MailboxError {
    use google_gmail1::Error;

    let from_status = |code: u16| match code {
        404 => MailboxError::NotFound(what.to_string()),
        409 => MailboxError::Conflict(what.to_string()),
        403 | 429 => MailboxError::Quota(format!("{what}: HTTP {code}")),
        code => MailboxError::Transport(format!("{what}: HTTP {code}")),
    };

    match &err {
        Error::Failure(response) => from_status(response.status().as_u16()),
        Error::BadRequest(value) => {
            let code = value
                .pointer("/error/code")
                .and_then(|c| c.as_u64())
                .unwrap_or(0) as u16;
            if code > 0 {
                from_status(code)
            } else {
                MailboxError::Transport(format!("{what}: {value}"))
            }
        }
        _ => MailboxError::Transport(format!("{what}: {err}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mime::extract_plain_text;
    use crate::ticket::header_value;

    fn body(data: &[u8]) -> api::MessagePartBody {
        api::MessagePartBody {
            data: Some(data.to_vec()),
            ..api::MessagePartBody::default()
        }
    }

    fn part(mime_type: &str, data: Option<&[u8]>) -> api::MessagePart {
        api::MessagePart {
            mime_type: Some(mime_type.to_string()),
            body: data.map(body),
            ..api::MessagePart::default()
        }
    }

    #[test]
    fn converted_single_part_body_survives_extraction() {
        // The API layer hands the payload over already decoded.
        let converted = convert_part(part("text/plain", Some(b"Hello, my printer is broken.")));
        assert_eq!(
            extract_plain_text(&converted).as_deref(),
            Some("Hello, my printer is broken.")
        );
    }

    #[test]
    fn converted_multipart_keeps_document_order() {
        let root = api::MessagePart {
            mime_type: Some("multipart/alternative".to_string()),
            parts: Some(vec![
                part("text/html", Some(b"<p>hi</p>")),
                part("text/plain", Some(b"plain wins")),
            ]),
            ..api::MessagePart::default()
        };
        let converted = convert_part(root);
        assert_eq!(converted.parts.len(), 2);
        assert_eq!(converted.parts[0].mime_type, "text/html");
        assert_eq!(extract_plain_text(&converted).as_deref(), Some("plain wins"));
    }

    #[test]
    fn convert_message_flattens_payload_headers() {
        let msg = api::Message {
            id: Some("m1".to_string()),
            thread_id: Some("t1".to_string()),
            payload: Some(api::MessagePart {
                headers: Some(vec![
                    api::MessagePartHeader {
                        name: Some("Subject".to_string()),
                        value: Some("help".to_string()),
                    },
                    api::MessagePartHeader {
                        name: Some("From".to_string()),
                        value: Some("alice@example.com".to_string()),
                    },
                ]),
                ..api::MessagePart::default()
            }),
            ..api::Message::default()
        };

        let converted = convert_message(msg, "m1").unwrap();
        assert_eq!(converted.id, "m1");
        assert_eq!(converted.thread_id, "t1");
        assert_eq!(header_value(&converted.headers, "Subject"), Some("help"));
        assert_eq!(
            header_value(&converted.headers, "From"),
            Some("alice@example.com")
        );
    }

    #[test]
    fn convert_message_without_id_is_not_found() {
        let err = convert_message(api::Message::default(), "ghost").unwrap_err();
        assert!(matches!(err, MailboxError::NotFound(_)));
    }

    fn http_failure(status: u16) -> google_gmail1::Error {
        google_gmail1::Error::Failure(
            hyper::Response::builder()
                .status(status)
                .body(hyper::Body::empty())
                .unwrap(),
        )
    }

    #[test]
    fn classify_maps_http_statuses_onto_taxonomy() {
        assert!(matches!(
            classify(http_failure(404), "get message"),
            MailboxError::NotFound(_)
        ));
        assert!(matches!(
            classify(http_failure(409), "create label"),
            MailboxError::Conflict(_)
        ));
        assert!(matches!(
            classify(http_failure(429), "send message"),
            MailboxError::Quota(_)
        ));
        assert!(matches!(
            classify(http_failure(500), "list messages"),
            MailboxError::Transport(_)
        ));
    }

    #[test]
    fn classify_reads_code_from_structured_error_body() {
        let err = google_gmail1::Error::BadRequest(serde_json::json!({
            "error": { "code": 409, "message": "Label name exists or conflicts" }
        }));
        assert!(matches!(
            classify(err, "create label"),
            MailboxError::Conflict(_)
        ));
    }
}
