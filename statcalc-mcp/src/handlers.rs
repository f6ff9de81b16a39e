//! Request dispatch and tool implementations

use crate::config::ServerConfig;
use crate::protocol::{McpError, McpRequest, McpResponse, PROTOCOL_VERSION};
use serde_json::{json, Value as JsonValue};
use statcalc_core::Report;
use statcalc_plugin::{CalculationMeta, CalculationRegistry, Inputs, RegistryError};
use tracing::{debug, info, warn};

const SERVER_VERSION: &str = env!("CARGO_PKG_VERSION");

const HELP_TOOL: &str = "help";
const LIST_TOOL: &str = "list_calculations";

/// Handles MCP requests against a calculation registry
pub struct Server {
    registry: CalculationRegistry,
    config: ServerConfig,
}

impl Server {
    pub fn new(registry: CalculationRegistry, config: ServerConfig) -> Self {
        Self { registry, config }
    }

    /// Handle one line of input; `None` when nothing should be written back
    pub fn handle_line(&self, line: &str) -> Option<String> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }

        let response = match serde_json::from_str::<McpRequest>(line) {
            Ok(request) => {
                debug!(method = %request.method, "processing request");
                let response = self.handle_request(&request);
                if request.is_notification() {
                    debug!(method = %request.method, "notification processed (no response)");
                    return None;
                }
                response
            }
            Err(e) => {
                warn!("error parsing request: {}", e);
                McpResponse::failure(None, McpError::parse_error(e))
            }
        };

        match serde_json::to_string(&response) {
            Ok(text) => Some(text),
            Err(e) => {
                warn!("error serializing response: {}", e);
                None
            }
        }
    }

    pub fn handle_request(&self, request: &McpRequest) -> McpResponse {
        let result = match request.method.as_str() {
            // Lifecycle
            "initialize" => self.handle_initialize(&request.params),
            "initialized" | "notifications/initialized" => Ok(json!({})),
            "ping" => Ok(json!({})),

            // Tools
            "tools/list" => Ok(self.handle_tools_list()),
            "tools/call" => self.handle_tool_call(&request.params),

            _ => Err(McpError::method_not_found(&request.method)),
        };

        McpResponse::from_result(request.id.clone(), result)
    }

    fn handle_initialize(&self, params: &Option<JsonValue>) -> Result<JsonValue, McpError> {
        let client_info = params
            .as_ref()
            .and_then(|p| p.get("clientInfo"))
            .and_then(|c| c.get("name"))
            .and_then(|n| n.as_str())
            .unwrap_or("unknown");

        // Use client's protocol version for compatibility
        let client_protocol = params
            .as_ref()
            .and_then(|p| p.get("protocolVersion"))
            .and_then(|v| v.as_str())
            .unwrap_or(PROTOCOL_VERSION);

        info!(client = client_info, protocol = client_protocol, "client connected");

        Ok(json!({
            "protocolVersion": client_protocol,
            "serverInfo": {
                "name": self.config.server_name,
                "version": SERVER_VERSION,
                "description": "Descriptive statistics, regression, Bayes, binomial, Poisson and ANOVA"
            },
            "capabilities": {
                "tools": {
                    "listChanged": false
                }
            },
            "instructions": "Each calculation takes text fields: values separated by ',', ANOVA groups by ';', '.' as decimal point. Show the returned text block to the user."
        }))
    }

    fn handle_tools_list(&self) -> JsonValue {
        let mut tools: Vec<JsonValue> = self.registry.metas().iter().map(calculation_tool).collect();

        let categories: Vec<&str> = {
            let mut c: Vec<&str> = self.registry.metas().iter().map(|m| m.category).collect();
            c.sort_unstable();
            c.dedup();
            c
        };

        tools.push(json!({
            "name": HELP_TOOL,
            "description": "Get documentation for a calculation, or general help when no name is given.",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "name": {
                        "type": "string",
                        "description": "Calculation name. Omit for general help."
                    }
                }
            }
        }));
        tools.push(json!({
            "name": LIST_TOOL,
            "description": "List all available calculations, optionally by category.",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "category": {
                        "type": "string",
                        "description": "Filter by category",
                        "enum": categories
                    }
                }
            }
        }));

        json!({ "tools": tools })
    }

    fn handle_tool_call(&self, params: &Option<JsonValue>) -> Result<JsonValue, McpError> {
        let params = params
            .as_ref()
            .ok_or_else(|| McpError::invalid_params("Missing params"))?;

        let name = params
            .get("name")
            .and_then(|v| v.as_str())
            .ok_or_else(|| McpError::invalid_params("Missing tool name"))?;

        let args = params.get("arguments").cloned().unwrap_or(json!({}));

        match name {
            HELP_TOOL => self.tool_help(&args),
            LIST_TOOL => Ok(self.tool_list_calculations(&args)),
            _ => self.tool_calculation(name, &args),
        }
    }

    fn tool_calculation(&self, name: &str, args: &JsonValue) -> Result<JsonValue, McpError> {
        let inputs = arguments_to_inputs(args)?;
        let report = self.registry.call(name, &inputs).map_err(|e| {
            let similar = match &e {
                RegistryError::Unknown { similar, .. } => similar.clone(),
            };
            McpError::invalid_params(format!("Unknown tool: {}", name))
                .with_data(json!({ "similar": similar }))
        })?;

        if let Some(err) = report.as_error() {
            info!(tool = name, code = %err.code, "calculation rejected input");
        }

        Ok(report_result(&report))
    }

    fn tool_help(&self, args: &JsonValue) -> Result<JsonValue, McpError> {
        let name = args.get("name").and_then(|v| v.as_str());
        let help = self
            .registry
            .help(name)
            .map_err(|e| McpError::invalid_params(e.to_string()))?;

        let text = match name.and_then(|n| self.registry.get(n)) {
            Some(calc) => format_help(&calc.meta()),
            None => format_overview(&self.registry.metas()),
        };

        Ok(json!({
            "content": [{ "type": "text", "text": text }],
            "data": help
        }))
    }

    fn tool_list_calculations(&self, args: &JsonValue) -> JsonValue {
        let category = args.get("category").and_then(|v| v.as_str());
        let metas = self.registry.list(category);
        json!({
            "content": [{ "type": "text", "text": format_overview(&metas) }],
            "data": metas
        })
    }
}

/// Tool result for a report: text block, JSON record and error flag
fn report_result(report: &Report) -> JsonValue {
    json!({
        "content": [{ "type": "text", "text": report.to_string() }],
        "report": report.to_json(),
        "isError": report.is_error()
    })
}

/// Tool definition for one calculation: a string property per field
fn calculation_tool(meta: &CalculationMeta) -> JsonValue {
    let properties: serde_json::Map<String, JsonValue> = meta
        .fields
        .iter()
        .map(|f| {
            (
                f.name.to_string(),
                json!({
                    "type": "string",
                    "description": format!("{} (e.g. {})", f.description, f.example)
                }),
            )
        })
        .collect();
    let required: Vec<&str> = meta.fields.iter().map(|f| f.name).collect();

    json!({
        "name": meta.name,
        "description": format!("{}: {}. Usage: {}", meta.title, meta.description, meta.usage),
        "inputSchema": {
            "type": "object",
            "properties": properties,
            "required": required
        }
    })
}

/// Convert tool arguments to text fields
///
/// Numbers are written as text; arrays are joined with ',' and nested
/// arrays with ';' so that `[[1,2],[3,4]]` reads as two ANOVA groups.
fn arguments_to_inputs(args: &JsonValue) -> Result<Inputs, McpError> {
    let obj = match args {
        JsonValue::Object(obj) => obj,
        JsonValue::Null => return Ok(Inputs::new()),
        _ => return Err(McpError::invalid_params("Tool arguments must be an object")),
    };

    obj.iter()
        .map(|(name, value)| {
            argument_text(value)
                .map(|text| (name.clone(), text))
                .ok_or_else(|| {
                    McpError::invalid_params(format!(
                        "Argument '{}' must be a string, a number or an array of numbers",
                        name
                    ))
                })
        })
        .collect()
}

fn argument_text(value: &JsonValue) -> Option<String> {
    match value {
        JsonValue::String(s) => Some(s.clone()),
        JsonValue::Number(n) => Some(n.to_string()),
        JsonValue::Array(items) => {
            let nested = items.iter().any(JsonValue::is_array);
            let parts = items.iter().map(argument_text).collect::<Option<Vec<_>>>()?;
            Some(parts.join(if nested { "; " } else { ", " }))
        }
        _ => None,
    }
}

fn format_help(meta: &CalculationMeta) -> String {
    let mut out = format!("# {}\n\n{}\n\n**Usage:** `{}`\n\n", meta.title, meta.description, meta.usage);
    for field in meta.fields {
        out.push_str(&format!("- `{}` ({}): {}\n", field.name, field.typ, field.description));
    }
    if !meta.examples.is_empty() {
        out.push_str("\n**Examples:**\n");
        for example in meta.examples {
            out.push_str(&format!("- `{}`\n", example));
        }
    }
    out
}

fn format_overview(metas: &[CalculationMeta]) -> String {
    metas
        .iter()
        .map(|m| format!("- {} ({}): {}", m.name, m.category, m.description))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn server() -> Server {
        Server::new(statcalc_stats::stats_registry(), ServerConfig::default())
    }

    fn call(line: &str) -> JsonValue {
        let out = server().handle_line(line).expect("response expected");
        serde_json::from_str(&out).unwrap()
    }

    #[test]
    fn test_report_result_shape() {
        let ok = report_result(&statcalc_stats::poisson("3", "3"));
        assert_eq!(ok["isError"], false);
        assert_eq!(ok["report"]["kind"], "poisson");
        assert!(ok["content"][0]["text"].as_str().unwrap().contains("P(X = 3) = 0.224042"));

        let err = report_result(&Report::Error(statcalc_core::StatsError::domain_error("k > n")));
        assert_eq!(err["isError"], true);
        assert_eq!(err["report"]["result"]["code"], "DOMAIN_ERROR");
    }

    #[test]
    fn test_initialize() {
        let resp = call(r#"{"jsonrpc":"2.0","id":1,"method":"initialize","params":{"protocolVersion":"2024-11-05"}}"#);
        assert_eq!(resp["id"], 1);
        assert_eq!(resp["result"]["protocolVersion"], "2024-11-05");
        assert_eq!(resp["result"]["serverInfo"]["name"], "statcalc");
    }

    #[test]
    fn test_notifications_get_no_response() {
        let s = server();
        assert!(s.handle_line(r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#).is_none());
        assert!(s.handle_line("   ").is_none());
    }

    #[test]
    fn test_ping() {
        let resp = call(r#"{"jsonrpc":"2.0","id":"a","method":"ping"}"#);
        assert_eq!(resp["result"], json!({}));
    }

    #[test]
    fn test_tools_list() {
        let resp = call(r#"{"jsonrpc":"2.0","id":2,"method":"tools/list"}"#);
        let tools = resp["result"]["tools"].as_array().unwrap();
        assert_eq!(tools.len(), 8);
        let anova = tools.iter().find(|t| t["name"] == "anova").unwrap();
        assert_eq!(anova["inputSchema"]["required"][0], "groups");
        assert_eq!(anova["inputSchema"]["properties"]["groups"]["type"], "string");
    }

    #[test]
    fn test_tools_call_bayes() {
        let resp = call(
            r#"{"jsonrpc":"2.0","id":3,"method":"tools/call","params":{"name":"bayes","arguments":{"p_a":"0.5","p_b_given_a":0.5,"p_b_given_not_a":"0.5"}}}"#,
        );
        let result = &resp["result"];
        assert_eq!(result["isError"], false);
        assert!(result["content"][0]["text"].as_str().unwrap().contains("P(A|B) = 0.5000"));
        assert_eq!(result["report"]["kind"], "bayes");
    }

    #[test]
    fn test_tools_call_domain_error() {
        let resp = call(
            r#"{"jsonrpc":"2.0","id":4,"method":"tools/call","params":{"name":"binomial","arguments":{"n":"5","p":"0.5","k":"9"}}}"#,
        );
        assert_eq!(resp["result"]["isError"], true);
        assert_eq!(resp["result"]["report"]["result"]["code"], "DOMAIN_ERROR");
    }

    #[test]
    fn test_tools_call_nested_arrays() {
        let resp = call(
            r#"{"jsonrpc":"2.0","id":5,"method":"tools/call","params":{"name":"anova","arguments":{"groups":[[1,2,3],[4,5,6],[7,8,9]]}}}"#,
        );
        assert_eq!(resp["result"]["report"]["result"]["groups"], 3);
    }

    #[test]
    fn test_unknown_tool() {
        let resp = call(r#"{"jsonrpc":"2.0","id":6,"method":"tools/call","params":{"name":"poison"}}"#);
        assert_eq!(resp["error"]["code"], -32602);
        assert_eq!(resp["error"]["data"]["similar"][0], "poisson");
    }

    #[test]
    fn test_help_tool() {
        let resp = call(r#"{"jsonrpc":"2.0","id":7,"method":"tools/call","params":{"name":"help","arguments":{"name":"poisson"}}}"#);
        assert!(resp["result"]["content"][0]["text"].as_str().unwrap().starts_with("# Poisson"));
        assert_eq!(resp["result"]["data"]["name"], "poisson");
    }

    #[test]
    fn test_list_calculations_by_category() {
        let resp = call(
            r#"{"jsonrpc":"2.0","id":8,"method":"tools/call","params":{"name":"list_calculations","arguments":{"category":"distribution"}}}"#,
        );
        assert_eq!(resp["result"]["data"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn test_method_not_found() {
        let resp = call(r#"{"jsonrpc":"2.0","id":9,"method":"resources/list"}"#);
        assert_eq!(resp["error"]["code"], -32601);
    }

    #[test]
    fn test_malformed_json() {
        let resp = call("{not json");
        assert_eq!(resp["error"]["code"], -32700);
        assert!(resp.as_object().unwrap().contains_key("id"));
        assert_eq!(resp["id"], JsonValue::Null);
    }

    #[test]
    fn test_null_id_gets_response() {
        let resp = call(r#"{"jsonrpc":"2.0","id":null,"method":"ping"}"#);
        assert_eq!(resp["id"], JsonValue::Null);
        assert_eq!(resp["result"], json!({}));
    }

    #[test]
    fn test_bad_argument_type() {
        let resp = call(
            r#"{"jsonrpc":"2.0","id":10,"method":"tools/call","params":{"name":"descriptive","arguments":{"data":true}}}"#,
        );
        assert_eq!(resp["error"]["code"], -32602);
    }
}
