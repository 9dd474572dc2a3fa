// chain-porter-mcp/src/tools.rs
// ============================================================================
// Module: MCP Tool Registry and Dispatcher
// Description: Named tool registration, schema validation, and dispatch.
// Purpose: Route validated tool calls to collaborator-backed handlers.
// Dependencies: chain-porter-core, chain-porter-clients, jsonschema
// ============================================================================

//! ## Overview
//! The registry maps tool names to their definitions and handlers; the router
//! validates call arguments against the tool's schema and dispatches to the
//! handler. Tool inputs are untrusted: nothing reaches a handler until the
//! payload passes validation. Domain failures from collaborators render as
//! text result envelopes so a session survives a failed call; protocol
//! failures surface as JSON-RPC errors.
//!
//! ## Invariants
//! - A handler never runs on a payload its schema rejects.
//! - Registering a name twice replaces the earlier registration.
//! - A failed call leaves the registry and session untouched.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::Mutex;
use std::time::Instant;

use chain_porter_clients::ArtifactError;
use chain_porter_clients::ArtifactSource;
use chain_porter_clients::ChainClient;
use chain_porter_clients::ChainError;
use chain_porter_clients::PinningClient;
use chain_porter_clients::PinningError;
use chain_porter_clients::StorageClient;
use chain_porter_clients::StorageError;
use chain_porter_clients::WeatherClient;
use chain_porter_clients::WeatherError;
use chain_porter_clients::chain::MICRO_PER_TOKEN;
use chain_porter_core::ResponseEnvelope;
use chain_porter_core::ToolDefinition;
use chain_porter_core::ToolName;
use chain_porter_core::tool_definitions;
use chain_porter_store_sqlite::TextStore;
use chain_porter_store_sqlite::TextStoreError;
use jsonschema::Draft;
use jsonschema::Validator;
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

use crate::audit::ToolAuditSink;
use crate::audit::ToolCallAuditEvent;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Tool dispatch errors.
#[derive(Debug, Error)]
pub enum ToolError {
    /// Tool name not recognized.
    #[error("unknown tool")]
    UnknownTool,
    /// Tool payload failed schema validation or decoding.
    #[error("invalid parameters: {0}")]
    InvalidParams(String),
    /// Tool payload serialization failed.
    #[error("serialization failure")]
    Serialization,
    /// External collaborator refused or failed the operation.
    #[error("{0}")]
    Collaborator(String),
    /// Local subsystem failure.
    #[error("{0}")]
    Internal(String),
}

impl ToolError {
    /// Whether this error is a domain failure rendered as a text result.
    ///
    /// Domain failures keep the session alive; protocol failures become
    /// JSON-RPC errors.
    #[must_use]
    pub const fn is_domain(&self) -> bool {
        matches!(self, Self::Collaborator(_) | Self::Internal(_))
    }

    /// Normalized label for audit events.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::UnknownTool => "unknown_tool",
            Self::InvalidParams(_) => "invalid_params",
            Self::Serialization => "serialization",
            Self::Collaborator(_) => "collaborator",
            Self::Internal(_) => "internal",
        }
    }
}

impl From<ChainError> for ToolError {
    fn from(err: ChainError) -> Self {
        Self::Collaborator(err.to_string())
    }
}

impl From<StorageError> for ToolError {
    fn from(err: StorageError) -> Self {
        Self::Collaborator(err.to_string())
    }
}

impl From<WeatherError> for ToolError {
    fn from(err: WeatherError) -> Self {
        Self::Collaborator(err.to_string())
    }
}

impl From<PinningError> for ToolError {
    fn from(err: PinningError) -> Self {
        Self::Collaborator(err.to_string())
    }
}

impl From<TextStoreError> for ToolError {
    fn from(err: TextStoreError) -> Self {
        Self::Internal(err.to_string())
    }
}

impl From<ArtifactError> for ToolError {
    fn from(err: ArtifactError) -> Self {
        match err {
            ArtifactError::Invalid(message) => Self::InvalidParams(message),
            ArtifactError::Read(message) | ArtifactError::Fetch(message) => {
                Self::Collaborator(message)
            }
        }
    }
}

// ============================================================================
// SECTION: Registry
// ============================================================================

/// Handler invoked with a validated argument payload.
pub type ToolHandler = Box<dyn Fn(Value) -> Result<String, ToolError> + Send + Sync>;

/// One registered tool.
struct RegisteredTool {
    /// Definition advertised in `tools/list`.
    definition: ToolDefinition,
    /// Handler for validated calls.
    handler: ToolHandler,
}

/// Name-keyed tool registry.
///
/// Listing order follows first registration; re-registering a name replaces
/// the definition and handler in place.
#[derive(Default)]
pub struct ToolRegistry {
    /// Registered tools keyed by name.
    tools: BTreeMap<String, RegisteredTool>,
    /// Names in first-registration order.
    order: Vec<String>,
}

impl ToolRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a tool, replacing any earlier registration of the name.
    ///
    /// Returns whether an earlier registration was replaced.
    pub fn register(&mut self, definition: ToolDefinition, handler: ToolHandler) -> bool {
        let name = definition.name.as_str().to_string();
        let replaced = self
            .tools
            .insert(name.clone(), RegisteredTool {
                definition,
                handler,
            })
            .is_some();
        if !replaced {
            self.order.push(name);
        }
        replaced
    }

    /// Resolves a tool by name.
    fn resolve(&self, name: &str) -> Option<&RegisteredTool> {
        self.tools.get(name)
    }

    /// Returns the advertised definitions in listing order.
    #[must_use]
    pub fn definitions(&self) -> Vec<ToolDefinition> {
        self.order
            .iter()
            .filter_map(|name| self.tools.get(name))
            .map(|tool| tool.definition.clone())
            .collect()
    }

    /// Number of registered tools.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// Whether the registry is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

// ============================================================================
// SECTION: Router
// ============================================================================

/// Tool router for MCP requests.
pub struct ToolRouter {
    /// Registered tools.
    registry: ToolRegistry,
    /// Compiled schema validators, built lazily per tool.
    validators: Mutex<BTreeMap<String, Validator>>,
    /// Audit sink for call events.
    audit: Arc<dyn ToolAuditSink>,
}

impl ToolRouter {
    /// Builds a router over a finished registry.
    #[must_use]
    pub fn new(registry: ToolRegistry, audit: Arc<dyn ToolAuditSink>) -> Self {
        Self {
            registry,
            validators: Mutex::new(BTreeMap::new()),
            audit,
        }
    }

    /// Lists the advertised tool definitions.
    #[must_use]
    pub fn list_tools(&self) -> Vec<ToolDefinition> {
        self.registry.definitions()
    }

    /// Validates and dispatches one tool call.
    ///
    /// Domain failures render as text result envelopes; only protocol
    /// failures surface as errors.
    ///
    /// # Errors
    ///
    /// Returns [`ToolError`] for unknown tools and invalid payloads.
    pub fn handle_tool_call(
        &self,
        name: &str,
        arguments: Value,
    ) -> Result<ResponseEnvelope, ToolError> {
        let started = Instant::now();
        let Some(tool) = self.registry.resolve(name) else {
            self.record(name, "error", Some(ToolError::UnknownTool.kind()), started);
            return Err(ToolError::UnknownTool);
        };
        if let Err(err) = self.validate(name, &tool.definition.input_schema, &arguments) {
            self.record(name, "error", Some(err.kind()), started);
            return Err(err);
        }
        match (tool.handler)(arguments) {
            Ok(text) => {
                self.record(name, "ok", None, started);
                Ok(ResponseEnvelope::text(text))
            }
            Err(err) if err.is_domain() => {
                self.record(name, "domain_error", Some(err.kind()), started);
                Ok(ResponseEnvelope::text(format!("Error: {err}")))
            }
            Err(err) => {
                self.record(name, "error", Some(err.kind()), started);
                Err(err)
            }
        }
    }

    /// Validates a payload against the tool's schema, compiling on first use.
    fn validate(&self, name: &str, schema: &Value, payload: &Value) -> Result<(), ToolError> {
        let mut validators =
            self.validators.lock().map_err(|_| ToolError::Internal("lock poisoned".to_string()))?;
        if !validators.contains_key(name) {
            let compiled = jsonschema::options()
                .with_draft(Draft::Draft202012)
                .build(schema)
                .map_err(|err| ToolError::Internal(format!("invalid schema: {err}")))?;
            validators.insert(name.to_string(), compiled);
        }
        let validator = validators
            .get(name)
            .ok_or_else(|| ToolError::Internal("validator missing".to_string()))?;
        if !validator.is_valid(payload) {
            let messages =
                validator.iter_errors(payload).map(|error| error.to_string()).collect::<Vec<_>>();
            return Err(ToolError::InvalidParams(format!(
                "payload does not match schema: {}",
                messages.join("; ")
            )));
        }
        Ok(())
    }

    /// Emits one audit event for a call.
    fn record(
        &self,
        name: &str,
        outcome: &'static str,
        error_kind: Option<&'static str>,
        started: Instant,
    ) {
        let event = ToolCallAuditEvent::new(
            name.to_string(),
            outcome,
            error_kind,
            started.elapsed().as_millis(),
        );
        self.audit.record(&event);
    }
}

// ============================================================================
// SECTION: Handler Dependencies
// ============================================================================

/// Collaborator handles the tool handlers close over.
pub struct PorterTooling {
    /// Connected chain wallet client.
    pub chain: Arc<dyn ChainClient>,
    /// Storage gateway session.
    pub storage: Arc<dyn StorageClient>,
    /// Weather API client.
    pub weather: Arc<WeatherClient>,
    /// Pinning service client.
    pub pinning: Arc<PinningClient>,
    /// Local text store.
    pub store: Arc<TextStore>,
}

/// Registers the full Chain Porter tool surface.
///
/// Definitions come from the canonical catalog, so the advertised schemas and
/// the validated schemas are the same objects.
pub fn register_porter_tools(registry: &mut ToolRegistry, tooling: &PorterTooling) {
    for definition in tool_definitions() {
        let handler = match definition.name {
            ToolName::WalletSend => wallet_send_handler(Arc::clone(&tooling.chain)),
            ToolName::StorageBuy => storage_buy_handler(Arc::clone(&tooling.chain)),
            ToolName::FileUpload => file_upload_handler(Arc::clone(&tooling.storage)),
            ToolName::FileDownload => file_download_handler(Arc::clone(&tooling.storage)),
            ToolName::FilePin => file_pin_handler(Arc::clone(&tooling.pinning)),
            ToolName::WeatherAlerts => weather_alerts_handler(Arc::clone(&tooling.weather)),
            ToolName::WeatherForecast => weather_forecast_handler(Arc::clone(&tooling.weather)),
            ToolName::TextSave => text_save_handler(Arc::clone(&tooling.store)),
            ToolName::TextGet => text_get_handler(Arc::clone(&tooling.store)),
            ToolName::TextList => text_list_handler(Arc::clone(&tooling.store)),
            ToolName::TextDelete => text_delete_handler(Arc::clone(&tooling.store)),
        };
        registry.register(definition, handler);
    }
}

// ============================================================================
// SECTION: Request Payloads
// ============================================================================

/// `wallet_send` arguments.
#[derive(Debug, Deserialize)]
struct WalletSendRequest {
    /// Recipient address.
    recipient: String,
    /// Whole-token amount as a decimal string.
    amount: String,
}

/// `storage_buy` arguments.
#[derive(Debug, Deserialize)]
struct StorageBuyRequest {
    /// Plan capacity in gigabytes.
    gigabytes: u64,
    /// Plan duration in days.
    days: u64,
}

/// `file_upload` arguments.
#[derive(Debug, Deserialize)]
struct FileUploadRequest {
    /// Explicitly tagged file source.
    source: ArtifactSource,
    /// Name to store the file under.
    name: String,
}

/// `file_download` arguments.
#[derive(Debug, Deserialize)]
struct FileDownloadRequest {
    /// Stored file name.
    name: String,
}

/// `file_pin` arguments.
#[derive(Debug, Deserialize)]
struct FilePinRequest {
    /// Content identifier to pin.
    cid: String,
}

/// `weather_alerts` arguments.
#[derive(Debug, Deserialize)]
struct WeatherAlertsRequest {
    /// Two-letter state code.
    state: String,
}

/// `weather_forecast` arguments.
#[derive(Debug, Deserialize)]
struct WeatherForecastRequest {
    /// Latitude in degrees.
    latitude: f64,
    /// Longitude in degrees.
    longitude: f64,
}

/// `text_save` arguments.
#[derive(Debug, Deserialize)]
struct TextSaveRequest {
    /// Text content to store.
    content: String,
    /// Name associated with the content.
    filename: String,
}

/// Arguments for id-addressed text tools.
#[derive(Debug, Deserialize)]
struct TextIdRequest {
    /// Text record identifier.
    id: i64,
}

/// Decodes a validated payload into a typed request.
fn decode<T: for<'de> Deserialize<'de>>(payload: Value) -> Result<T, ToolError> {
    serde_json::from_value(payload).map_err(|err| ToolError::InvalidParams(err.to_string()))
}

// ============================================================================
// SECTION: Wallet Handlers
// ============================================================================

/// Builds the `wallet_send` handler.
fn wallet_send_handler(chain: Arc<dyn ChainClient>) -> ToolHandler {
    Box::new(move |payload| {
        let request: WalletSendRequest = decode(payload)?;
        let whole = request
            .amount
            .parse::<u128>()
            .map_err(|_| ToolError::InvalidParams("amount must be a decimal integer".to_string()))?;
        let micro = whole
            .checked_mul(MICRO_PER_TOKEN)
            .ok_or_else(|| ToolError::InvalidParams("amount too large".to_string()))?;
        let receipt = chain.send_tokens(&request.recipient, micro)?;
        Ok(format!(
            "Sent {whole} tokens to {}\nTransaction hash: {}",
            request.recipient, receipt.hash
        ))
    })
}

/// Builds the `storage_buy` handler.
fn storage_buy_handler(chain: Arc<dyn ChainClient>) -> ToolHandler {
    Box::new(move |payload| {
        let request: StorageBuyRequest = decode(payload)?;
        let receipt = chain.buy_storage(request.gigabytes, request.days)?;
        Ok(format!(
            "Purchased {} GB of storage for {} days\nTransaction hash: {}",
            request.gigabytes, request.days, receipt.hash
        ))
    })
}

// ============================================================================
// SECTION: Storage Handlers
// ============================================================================

/// Builds the `file_upload` handler.
fn file_upload_handler(storage: Arc<dyn StorageClient>) -> ToolHandler {
    Box::new(move |payload| {
        let request: FileUploadRequest = decode(payload)?;
        let bytes = request.source.load()?;
        let descriptor = storage.upload(&request.name, &bytes)?;
        Ok(format!(
            "Uploaded {} ({} bytes)\nCID: {}",
            descriptor.name, descriptor.size_bytes, descriptor.cid
        ))
    })
}

/// Builds the `file_download` handler.
fn file_download_handler(storage: Arc<dyn StorageClient>) -> ToolHandler {
    Box::new(move |payload| {
        let request: FileDownloadRequest = decode(payload)?;
        let bytes = storage.download(&request.name)?;
        match String::from_utf8(bytes) {
            Ok(text) => Ok(text),
            Err(err) => Ok(format!(
                "Downloaded {} ({} bytes of binary content)",
                request.name,
                err.as_bytes().len()
            )),
        }
    })
}

/// Builds the `file_pin` handler.
fn file_pin_handler(pinning: Arc<PinningClient>) -> ToolHandler {
    Box::new(move |payload| {
        let request: FilePinRequest = decode(payload)?;
        let receipt = pinning.pin(&request.cid)?;
        Ok(format!(
            "Pin requested for {}\nRequest id: {}\nStatus: {}",
            request.cid, receipt.request_id, receipt.status
        ))
    })
}

// ============================================================================
// SECTION: Weather Handlers
// ============================================================================

/// Builds the `weather_alerts` handler.
fn weather_alerts_handler(weather: Arc<WeatherClient>) -> ToolHandler {
    Box::new(move |payload| {
        let request: WeatherAlertsRequest = decode(payload)?;
        Ok(weather.alerts(&request.state)?)
    })
}

/// Builds the `weather_forecast` handler.
fn weather_forecast_handler(weather: Arc<WeatherClient>) -> ToolHandler {
    Box::new(move |payload| {
        let request: WeatherForecastRequest = decode(payload)?;
        Ok(weather.forecast(request.latitude, request.longitude)?)
    })
}

// ============================================================================
// SECTION: Text Store Handlers
// ============================================================================

/// Builds the `text_save` handler.
fn text_save_handler(store: Arc<TextStore>) -> ToolHandler {
    Box::new(move |payload| {
        let request: TextSaveRequest = decode(payload)?;
        let id = store.save(&request.content, &request.filename)?;
        Ok(format!("Saved text with id {id}"))
    })
}

/// Builds the `text_get` handler.
fn text_get_handler(store: Arc<TextStore>) -> ToolHandler {
    Box::new(move |payload| {
        let request: TextIdRequest = decode(payload)?;
        match store.get(request.id)? {
            Some(record) => Ok(record.content),
            None => Ok(format!("No text found with id {}", request.id)),
        }
    })
}

/// Builds the `text_list` handler.
fn text_list_handler(store: Arc<TextStore>) -> ToolHandler {
    Box::new(move |_payload| {
        let records = store.list()?;
        if records.is_empty() {
            return Ok("No texts saved".to_string());
        }
        let lines: Vec<String> = records
            .iter()
            .map(|record| {
                format!("{}: {} (saved {})", record.id, record.filename, record.created_at_rfc3339())
            })
            .collect();
        Ok(lines.join("\n"))
    })
}

/// Builds the `text_delete` handler.
fn text_delete_handler(store: Arc<TextStore>) -> ToolHandler {
    Box::new(move |payload| {
        let request: TextIdRequest = decode(payload)?;
        if store.delete(request.id)? {
            Ok(format!("Deleted text with id {}", request.id))
        } else {
            Ok(format!("No text found with id {}", request.id))
        }
    })
}

// ============================================================================
// SECTION: Tests
// ============================================================================
