// chain-porter-core/src/tooling.rs
// ============================================================================
// Module: Tooling Identifiers
// Description: Canonical MCP tool identifiers for Chain Porter.
// Purpose: Shared tool naming across contracts, runtime, and config.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! Canonical tool identifiers used by Chain Porter MCP.
//! These names are part of the external contract surface.

use std::fmt;

use serde::Deserialize;
use serde::Serialize;

/// Canonical tool names for Chain Porter MCP.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolName {
    /// Broadcast a funded token transfer.
    WalletSend,
    /// Purchase a storage plan on the network.
    StorageBuy,
    /// Upload a file to the storage network.
    FileUpload,
    /// Download a stored file by name.
    FileDownload,
    /// Pin a content identifier on the pinning service.
    FilePin,
    /// Fetch active weather alerts for a state.
    WeatherAlerts,
    /// Fetch a weather forecast for coordinates.
    WeatherForecast,
    /// Save text content to the local store.
    TextSave,
    /// Retrieve a text record by identifier.
    TextGet,
    /// List saved text records, newest first.
    TextList,
    /// Delete a text record by identifier.
    TextDelete,
}

impl ToolName {
    /// Returns the canonical string name for the tool.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::WalletSend => "wallet_send",
            Self::StorageBuy => "storage_buy",
            Self::FileUpload => "file_upload",
            Self::FileDownload => "file_download",
            Self::FilePin => "file_pin",
            Self::WeatherAlerts => "weather_alerts",
            Self::WeatherForecast => "weather_forecast",
            Self::TextSave => "text_save",
            Self::TextGet => "text_get",
            Self::TextList => "text_list",
            Self::TextDelete => "text_delete",
        }
    }

    /// Returns all Chain Porter tool names in canonical order.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::WalletSend,
            Self::StorageBuy,
            Self::FileUpload,
            Self::FileDownload,
            Self::FilePin,
            Self::WeatherAlerts,
            Self::WeatherForecast,
            Self::TextSave,
            Self::TextGet,
            Self::TextList,
            Self::TextDelete,
        ]
    }

    /// Parses a tool name from its string representation.
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "wallet_send" => Some(Self::WalletSend),
            "storage_buy" => Some(Self::StorageBuy),
            "file_upload" => Some(Self::FileUpload),
            "file_download" => Some(Self::FileDownload),
            "file_pin" => Some(Self::FilePin),
            "weather_alerts" => Some(Self::WeatherAlerts),
            "weather_forecast" => Some(Self::WeatherForecast),
            "text_save" => Some(Self::TextSave),
            "text_get" => Some(Self::TextGet),
            "text_list" => Some(Self::TextList),
            "text_delete" => Some(Self::TextDelete),
            _ => None,
        }
    }
}

impl fmt::Display for ToolName {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, reason = "Test-only assertions.")]

    use super::ToolName;

    #[test]
    fn parse_round_trips_all_names() {
        for tool in ToolName::all() {
            assert_eq!(ToolName::parse(tool.as_str()), Some(*tool));
        }
    }

    #[test]
    fn parse_rejects_unknown_names() {
        assert_eq!(ToolName::parse("wallet-send"), None);
        assert_eq!(ToolName::parse(""), None);
    }
}
