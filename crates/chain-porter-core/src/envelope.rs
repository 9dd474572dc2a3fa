// chain-porter-core/src/envelope.rs
// ============================================================================
// Module: Response Envelope
// Description: Uniform response wrapper for tool invocations.
// Purpose: Normalize heterogeneous tool outcomes into one wire shape.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! Every dispatched invocation resolves to exactly one [`ResponseEnvelope`].
//! The envelope carries no success flag; failure is communicated by the text
//! itself. Only the `text` content variant is used by Chain Porter tools.

use serde::Deserialize;
use serde::Serialize;

/// Uniform response wrapper returned per invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseEnvelope {
    /// Ordered content items; Chain Porter tools emit exactly one.
    pub content: Vec<ContentItem>,
}

/// Tagged content variants for envelope payloads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentItem {
    /// Plain text payload.
    Text {
        /// Human-readable outcome text.
        text: String,
    },
}

impl ResponseEnvelope {
    /// Wraps outcome text in an envelope with a single text item.
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            content: vec![ContentItem::Text {
                text: text.into(),
            }],
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, reason = "Test-only assertions.")]

    use super::ResponseEnvelope;

    #[test]
    fn text_envelope_serializes_with_type_tag() {
        let envelope = ResponseEnvelope::text("done");
        let value = serde_json::to_value(&envelope).unwrap();
        assert_eq!(value["content"][0]["type"], "text");
        assert_eq!(value["content"][0]["text"], "done");
    }
}
