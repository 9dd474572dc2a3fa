// chain-porter-core/src/contract.rs
// ============================================================================
// Module: MCP Tool Contracts
// Description: Canonical MCP tool definitions and input schemas.
// Purpose: Drive MCP tool listings and pre-handler argument validation.
// Dependencies: serde, serde_json, chain-porter-core::tooling
// ============================================================================

//! ## Overview
//! This module defines the canonical MCP tool surface. Each definition pairs a
//! tool name with a strict JSON Schema for its input payload. Unknown extra
//! fields are ignored by validation; missing required fields or out-of-range
//! values are rejected before a handler runs.

use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;
use serde_json::json;

use crate::tooling::ToolName;

// ============================================================================
// SECTION: Tool Definition
// ============================================================================

/// Tool definition used by MCP tool listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolDefinition {
    /// MCP tool name.
    pub name: ToolName,
    /// Tool description for clients.
    pub description: String,
    /// JSON schema for tool input.
    #[serde(rename = "inputSchema")]
    pub input_schema: Value,
}

/// Builds a tool definition from its parts.
fn build_definition(name: ToolName, description: &str, input_schema: Value) -> ToolDefinition {
    ToolDefinition {
        name,
        description: description.to_string(),
        input_schema,
    }
}

// ============================================================================
// SECTION: Tool Catalog
// ============================================================================

/// Returns the canonical MCP tool definitions.
///
/// The order is intentional: it is preserved in `tools/list` responses to keep
/// client diffs stable across releases. Append new tools at the end.
#[must_use]
pub fn tool_definitions() -> Vec<ToolDefinition> {
    vec![
        wallet_send_definition(),
        storage_buy_definition(),
        file_upload_definition(),
        file_download_definition(),
        file_pin_definition(),
        weather_alerts_definition(),
        weather_forecast_definition(),
        text_save_definition(),
        text_get_definition(),
        text_list_definition(),
        text_delete_definition(),
    ]
}

/// Builds the tool definition for `wallet_send`.
fn wallet_send_definition() -> ToolDefinition {
    build_definition(
        ToolName::WalletSend,
        "Send tokens to a recipient address and return the transaction hash.",
        json!({
            "type": "object",
            "properties": {
                "recipient": {
                    "type": "string",
                    "minLength": 1,
                    "description": "Recipient bech-style address"
                },
                "amount": {
                    "type": "string",
                    "pattern": "^[0-9]+$",
                    "description": "Amount of whole tokens to send, without denomination"
                }
            },
            "required": ["recipient", "amount"]
        }),
    )
}

/// Builds the tool definition for `storage_buy`.
fn storage_buy_definition() -> ToolDefinition {
    build_definition(
        ToolName::StorageBuy,
        "Purchase a storage plan with the bootstrapped wallet.",
        json!({
            "type": "object",
            "properties": {
                "gigabytes": {
                    "type": "integer",
                    "minimum": 1,
                    "description": "Plan capacity in gigabytes"
                },
                "days": {
                    "type": "integer",
                    "minimum": 30,
                    "description": "Plan duration in days; plans are sold in 30-day blocks"
                }
            },
            "required": ["gigabytes", "days"]
        }),
    )
}

/// Builds the tool definition for `file_upload`.
fn file_upload_definition() -> ToolDefinition {
    build_definition(
        ToolName::FileUpload,
        "Load a file from an explicit local or remote source and submit it to the storage \
         network.",
        json!({
            "type": "object",
            "properties": {
                "source": {
                    "type": "object",
                    "properties": {
                        "kind": {
                            "type": "string",
                            "enum": ["local_path", "remote_url"],
                            "description": "Explicit loading strategy tag"
                        },
                        "value": {
                            "type": "string",
                            "minLength": 1,
                            "description": "Filesystem path or URL, per kind"
                        }
                    },
                    "required": ["kind", "value"]
                },
                "name": {
                    "type": "string",
                    "minLength": 1,
                    "description": "Name to store the file under"
                }
            },
            "required": ["source", "name"]
        }),
    )
}

/// Builds the tool definition for `file_download`.
fn file_download_definition() -> ToolDefinition {
    build_definition(
        ToolName::FileDownload,
        "Download a stored file by name and return its content.",
        json!({
            "type": "object",
            "properties": {
                "name": {
                    "type": "string",
                    "minLength": 1,
                    "description": "Stored file name"
                }
            },
            "required": ["name"]
        }),
    )
}

/// Builds the tool definition for `file_pin`.
fn file_pin_definition() -> ToolDefinition {
    build_definition(
        ToolName::FilePin,
        "Ask the pinning service to pin a content identifier.",
        json!({
            "type": "object",
            "properties": {
                "cid": {
                    "type": "string",
                    "minLength": 1,
                    "description": "Content identifier to pin"
                }
            },
            "required": ["cid"]
        }),
    )
}

/// Builds the tool definition for `weather_alerts`.
fn weather_alerts_definition() -> ToolDefinition {
    build_definition(
        ToolName::WeatherAlerts,
        "Get active weather alerts for a two-letter state code.",
        json!({
            "type": "object",
            "properties": {
                "state": {
                    "type": "string",
                    "minLength": 2,
                    "maxLength": 2,
                    "description": "Two-letter state code (e.g. CA, NY)"
                }
            },
            "required": ["state"]
        }),
    )
}

/// Builds the tool definition for `weather_forecast`.
fn weather_forecast_definition() -> ToolDefinition {
    build_definition(
        ToolName::WeatherForecast,
        "Get the weather forecast for a coordinate pair.",
        json!({
            "type": "object",
            "properties": {
                "latitude": {
                    "type": "number",
                    "minimum": -90,
                    "maximum": 90,
                    "description": "Latitude of the location"
                },
                "longitude": {
                    "type": "number",
                    "minimum": -180,
                    "maximum": 180,
                    "description": "Longitude of the location"
                }
            },
            "required": ["latitude", "longitude"]
        }),
    )
}

/// Builds the tool definition for `text_save`.
fn text_save_definition() -> ToolDefinition {
    build_definition(
        ToolName::TextSave,
        "Save text content to the local store and return the assigned id.",
        json!({
            "type": "object",
            "properties": {
                "content": {
                    "type": "string",
                    "description": "Text content to save"
                },
                "filename": {
                    "type": "string",
                    "minLength": 1,
                    "description": "Name to associate with the content"
                }
            },
            "required": ["content", "filename"]
        }),
    )
}

/// Builds the tool definition for `text_get`.
fn text_get_definition() -> ToolDefinition {
    build_definition(
        ToolName::TextGet,
        "Retrieve a saved text record by id.",
        json!({
            "type": "object",
            "properties": {
                "id": {
                    "type": "integer",
                    "minimum": 1,
                    "description": "Record identifier returned by text_save"
                }
            },
            "required": ["id"]
        }),
    )
}

/// Builds the tool definition for `text_list`.
fn text_list_definition() -> ToolDefinition {
    build_definition(
        ToolName::TextList,
        "List all saved text records, newest first.",
        json!({
            "type": "object",
            "properties": {}
        }),
    )
}

/// Builds the tool definition for `text_delete`.
fn text_delete_definition() -> ToolDefinition {
    build_definition(
        ToolName::TextDelete,
        "Delete a saved text record by id.",
        json!({
            "type": "object",
            "properties": {
                "id": {
                    "type": "integer",
                    "minimum": 1,
                    "description": "Record identifier to delete"
                }
            },
            "required": ["id"]
        }),
    )
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, reason = "Test-only assertions.")]

    use serde_json::json;

    use super::tool_definitions;
    use crate::tooling::ToolName;

    #[test]
    fn catalog_covers_every_tool_name_exactly_once() {
        let definitions = tool_definitions();
        assert_eq!(definitions.len(), ToolName::all().len());
        for (definition, tool) in definitions.iter().zip(ToolName::all()) {
            assert_eq!(definition.name, *tool);
        }
    }

    #[test]
    fn every_input_schema_compiles() {
        for definition in tool_definitions() {
            let compiled = jsonschema::options()
                .with_draft(jsonschema::Draft::Draft202012)
                .build(&definition.input_schema);
            assert!(compiled.is_ok(), "schema failed for {}", definition.name);
        }
    }

    #[test]
    fn alerts_schema_rejects_three_letter_state() {
        let definition = tool_definitions()
            .into_iter()
            .find(|definition| definition.name == ToolName::WeatherAlerts)
            .unwrap();
        let validator = jsonschema::options()
            .with_draft(jsonschema::Draft::Draft202012)
            .build(&definition.input_schema)
            .unwrap();
        assert!(validator.is_valid(&json!({ "state": "CA" })));
        assert!(!validator.is_valid(&json!({ "state": "CAL" })));
    }

    #[test]
    fn forecast_schema_enforces_coordinate_bounds() {
        let definition = tool_definitions()
            .into_iter()
            .find(|definition| definition.name == ToolName::WeatherForecast)
            .unwrap();
        let validator = jsonschema::options()
            .with_draft(jsonschema::Draft::Draft202012)
            .build(&definition.input_schema)
            .unwrap();
        assert!(validator.is_valid(&json!({ "latitude": 40.0, "longitude": -74.0 })));
        assert!(!validator.is_valid(&json!({ "latitude": 91.0, "longitude": -74.0 })));
        assert!(!validator.is_valid(&json!({ "latitude": 40.0, "longitude": 181.0 })));
    }
}
