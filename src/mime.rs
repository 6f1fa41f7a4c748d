use base64::{Engine as _, engine::general_purpose};

use crate::models::MessagePart;

/// Sentinel rendered when a message carries no decodable text/plain part.
pub const NO_PLAINTEXT_BODY: &str = "(no plain text body)";

/// Hard cap on visited part nodes, so a malformed tree cannot keep the
/// walk alive indefinitely.
const MAX_PARTS: usize = 10_000;

/// Return the best plaintext representation of a message's part tree, or
/// `None` if no text/plain part exists or none decodes.
///
/// A single-part message carries its payload directly on the root; that is
/// returned as-is. Otherwise descendants are visited in document order and
/// the first `text/plain` node whose payload decodes wins. A node with a
/// matching type but no usable payload does not stop the scan. HTML parts
/// are never converted.
pub fn extract_plain_text(root: &MessagePart) -> Option<String> {
    if root.parts.is_empty() {
        return root.body.as_deref().and_then(decode_body);
    }

    // Explicit stack instead of recursion: depth is bounded only by the
    // input, and the visit cap guards against pathological trees.
    let mut stack: Vec<&MessagePart> = root.parts.iter().rev().collect();
    let mut visited = 0usize;

    while let Some(part) = stack.pop() {
        visited += 1;
        if visited > MAX_PARTS {
            tracing::warn!("part tree exceeded {MAX_PARTS} nodes, giving up");
            return None;
        }

        if part.mime_type == "text/plain" {
            if let Some(text) = part.body.as_deref().and_then(decode_body) {
                return Some(text);
            }
            // Matching type but nothing usable: keep scanning.
        }

        for child in part.parts.iter().rev() {
            stack.push(child);
        }
    }

    None
}

/// Decode a part payload from URL-safe Base64, tolerating both padded and
/// unpadded input. Any failure means "this part has no usable text".
fn decode_body(data: &str) -> Option<String> {
    let trimmed = data.trim();
    let bytes = general_purpose::URL_SAFE_NO_PAD
        .decode(trimmed)
        .or_else(|_| general_purpose::URL_SAFE.decode(trimmed))
        .ok()?;
    String::from_utf8(bytes).ok()
}
