//! MCP (Model Context Protocol) handling module
//!
//! Implements the JSON-RPC 2.0 protocol for MCP communication over stdio.
//! Tool dispatch hands every call the one shared, already-authenticated
//! reader client; tools are never given a fresh session per call.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader as AsyncBufReader};
use tracing::{debug, error, info};

use crate::reader::client::ReaderClient;
use crate::reader::transport::Transport;
use crate::tools;

/// Server context for tracking client information
#[derive(Clone, Default)]
pub struct ServerContext {
    pub client_info: Option<ClientInfo>,
}

impl ServerContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn client_name(&self) -> String {
        self.client_info
            .as_ref()
            .and_then(|info| info.name.as_ref())
            .cloned()
            .unwrap_or_else(|| "Unknown Client".to_string())
    }
}

/// MCP JSON-RPC 2.0 request structure
#[derive(Debug, Deserialize)]
pub struct McpRequest {
    /// JSON-RPC version field - required on the wire but not accessed in code
    #[allow(dead_code)]
    pub jsonrpc: String,
    pub id: Option<Value>,
    pub method: String,
    pub params: Option<Value>,
}

/// Initialize request parameters
#[derive(Debug, Deserialize)]
pub struct InitializeParams {
    #[serde(rename = "clientInfo")]
    pub client_info: Option<ClientInfo>,
}

/// Client information
#[derive(Debug, Deserialize, Clone)]
pub struct ClientInfo {
    pub name: Option<String>,
    #[allow(dead_code)]
    pub version: Option<String>,
}

/// MCP JSON-RPC 2.0 response structure
#[derive(Debug, Serialize)]
pub struct McpResponse {
    pub jsonrpc: String,
    pub id: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<McpError>,
}

/// MCP Error structure
#[derive(Debug, Serialize)]
pub struct McpError {
    pub code: String,
    pub message: String,
}

/// MCP Tool call arguments
#[derive(Debug, Deserialize)]
pub struct ToolCallArgs {
    pub name: String,
    #[serde(default)]
    pub arguments: Value,
}

/// MCP Content item
#[derive(Debug, Serialize)]
pub struct ContentItem {
    pub r#type: String,
    pub text: String,
}

/// MCP Tool result
#[derive(Debug, Serialize)]
pub struct ToolResult {
    pub content: Vec<ContentItem>,
}

impl McpResponse {
    /// Create a successful response
    pub fn success(id: Option<Value>, result: Value) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id,
            result: Some(result),
            error: None,
        }
    }

    /// Create an error response
    pub fn error(id: Option<Value>, code: &str, message: &str) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id,
            result: None,
            error: Some(McpError {
                code: code.to_string(),
                message: message.to_string(),
            }),
        }
    }
}

impl ToolResult {
    /// Create a text result
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: vec![ContentItem {
                r#type: "text".to_string(),
                text: content.into(),
            }],
        }
    }
}

/// Parse MCP request from JSON string
pub fn parse_request(json: &str) -> Result<McpRequest> {
    let request: McpRequest = serde_json::from_str(json)?;
    Ok(request)
}

/// Serialize MCP response to JSON string
pub fn serialize_response(response: &McpResponse) -> Result<String> {
    Ok(serde_json::to_string(response)?)
}

/// Handle stdio MCP communication against the shared reader client
pub async fn handle_stdio<T: Transport>(client: &ReaderClient<T>) -> Result<()> {
    info!("Starting freshrss-mcp server on stdio");

    let stdin = tokio::io::stdin();
    let mut reader = AsyncBufReader::new(stdin).lines();
    let mut stdout = tokio::io::stdout();

    let mut context = ServerContext::new();

    while let Some(line) = reader.next_line().await? {
        debug!("Received request: {}", line);

        let response = match parse_request(&line) {
            Ok(request) => handle_request(request, &mut context, client).await,
            Err(e) => {
                error!("Failed to parse request: {}", e);
                McpResponse::error(None, "parse_error", &format!("Invalid JSON: {}", e))
            }
        };

        let response_json = serialize_response(&response)?;
        debug!("Sending response: {}", response_json);

        stdout.write_all(response_json.as_bytes()).await?;
        stdout.write_all(b"\n").await?;
        stdout.flush().await?;
    }

    Ok(())
}

/// Handle a single MCP request
async fn handle_request<T: Transport>(
    request: McpRequest,
    context: &mut ServerContext,
    client: &ReaderClient<T>,
) -> McpResponse {
    match request.method.as_str() {
        "initialize" => handle_initialize(request, context).await,
        "tools/call" => handle_tool_call(request, client).await,
        "tools/list" => handle_tools_list(request).await,
        _ => McpResponse::error(
            request.id,
            "method_not_found",
            &format!("Method '{}' not found", request.method),
        ),
    }
}

/// Handle tools/call method
async fn handle_tool_call<T: Transport>(
    request: McpRequest,
    client: &ReaderClient<T>,
) -> McpResponse {
    let args: ToolCallArgs = match serde_json::from_value(request.params.unwrap_or_default()) {
        Ok(args) => args,
        Err(e) => {
            return McpResponse::error(
                request.id.clone(),
                "invalid_params",
                &format!("Invalid parameters: {}", e),
            )
        }
    };

    let id = request.id;
    match args.name.as_str() {
        "get_unread_articles" => {
            tools::articles::handle_get_unread(id, args.arguments, client).await
        }
        "get_articles_by_feed" => tools::articles::handle_by_feed(id, args.arguments, client).await,
        "search_articles" => tools::articles::handle_search(id, args.arguments, client).await,
        "list_feeds" => tools::feeds::handle_list_feeds(id, args.arguments, client).await,
        "get_feed_info" => tools::feeds::handle_feed_info(id, args.arguments, client).await,
        "get_feed_stats" => tools::feeds::handle_feed_stats(id, args.arguments, client).await,
        "mark_as_read" => tools::marks::handle_mark_as_read(id, args.arguments, client).await,
        "mark_as_unread" => tools::marks::handle_mark_as_unread(id, args.arguments, client).await,
        "star_article" => tools::marks::handle_star(id, args.arguments, client).await,
        "unstar_article" => tools::marks::handle_unstar(id, args.arguments, client).await,
        _ => McpResponse::error(
            id,
            "tool_not_found",
            &format!("Tool '{}' not found", args.name),
        ),
    }
}

/// Handle tools/list method
async fn handle_tools_list(request: McpRequest) -> McpResponse {
    let tools = build_tools_array();

    McpResponse::success(request.id, serde_json::json!({ "tools": tools }))
}

/// Handle initialize method
async fn handle_initialize(request: McpRequest, context: &mut ServerContext) -> McpResponse {
    if let Some(params) = request.params {
        if let Ok(init_params) = serde_json::from_value::<InitializeParams>(params) {
            context.client_info = init_params.client_info;
            info!("Initialized for client: {}", context.client_name());
        }
    }

    let tools = build_tools_array();
    let result = serde_json::json!({
        "serverInfo": {
            "name": "freshrss-mcp",
            "version": env!("CARGO_PKG_VERSION"),
        },
        "capabilities": {
            "tools": { "list": true, "call": true }
        },
        "tools": tools
    });
    McpResponse::success(request.id, result)
}

/// Build the tools array returned from tools/list and initialize
fn build_tools_array() -> serde_json::Value {
    use crate::cli::{FeedArticlesArgs, FeedInfoArgs, MarkArgs, SearchArgs, StarArgs, UnreadArgs};
    use schemars::schema_for;

    // Schemas generated from the CLI argument structs
    let unread_schema = schema_for!(UnreadArgs);
    let by_feed_schema = schema_for!(FeedArticlesArgs);
    let search_schema = schema_for!(SearchArgs);
    let feed_info_schema = schema_for!(FeedInfoArgs);
    let mark_schema = schema_for!(MarkArgs);
    let star_schema = schema_for!(StarArgs);
    let no_params_schema = serde_json::json!({"type": "object", "properties": {}});

    serde_json::json!([
        {
            "name": "get_unread_articles",
            "description": "Get unread articles, optionally filtered by feed IDs and publish time",
            "inputSchema": unread_schema
        },
        {
            "name": "get_articles_by_feed",
            "description": "Get articles from a specific feed",
            "inputSchema": by_feed_schema
        },
        {
            "name": "search_articles",
            "description": "Search articles by keyword in title or summary (client-side filtering)",
            "inputSchema": search_schema
        },
        {
            "name": "list_feeds",
            "description": "List all subscribed feeds with unread counts",
            "inputSchema": no_params_schema
        },
        {
            "name": "get_feed_info",
            "description": "Get detailed information about a specific feed",
            "inputSchema": feed_info_schema
        },
        {
            "name": "get_feed_stats",
            "description": "Get unread statistics for all feeds",
            "inputSchema": no_params_schema
        },
        {
            "name": "mark_as_read",
            "description": "Mark articles as read",
            "inputSchema": mark_schema
        },
        {
            "name": "mark_as_unread",
            "description": "Mark articles as unread",
            "inputSchema": mark_schema
        },
        {
            "name": "star_article",
            "description": "Star/favorite an article",
            "inputSchema": star_schema
        },
        {
            "name": "unstar_article",
            "description": "Remove the star from an article",
            "inputSchema": star_schema
        }
    ])
}
