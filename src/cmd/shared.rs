/*!
shared.rs - shared helpers for subcommands.

Focus:
  - connect: run a GithubCliServer in-process and attach an rmcp client
    over a memory duplex (same protocol path a real client takes)
  - find_tool_case_insensitive
  - build_arguments_from_schema + primitive coercion
  - load_param_file (JSON / YAML, typed values)
  - result text extraction
*/

use anyhow::{Context, Result};
use rmcp::{RoleClient, ServiceExt, service::RunningService};
use std::collections::{HashMap, HashSet};
use tokio::task::JoinHandle;
use tracing::warn;

use crate::server::GithubCliServer;

const DUPLEX_BUFFER: usize = 64 * 1024;

/* ---- In-process session ---- */

/// A connected client plus the task driving the server side.
pub struct Session {
    pub client: RunningService<RoleClient, ()>,
    server: JoinHandle<()>,
}

impl Session {
    /// Cancel the client and wait for the server task to wind down.
    pub async fn close(self) {
        let _ = self.client.cancel().await;
        let _ = self.server.await;
    }
}

/// Serve `server` on one end of a duplex pipe and initialize a client on the other.
pub async fn connect(server: GithubCliServer) -> Result<Session> {
    let (server_io, client_io) = tokio::io::duplex(DUPLEX_BUFFER);

    let server = tokio::spawn(async move {
        match server.serve(server_io).await {
            Ok(running) => {
                let _ = running.waiting().await;
            }
            Err(e) => warn!("in-process server failed to initialize: {e}"),
        }
    });

    let client = ()
        .serve(client_io)
        .await
        .context("Failed to initialize in-process MCP client")?;

    Ok(Session { client, server })
}

/* ---- Tool Object Utilities ---- */

/// Find a tool (case-insensitive name match) in serialized tool objects.
pub fn find_tool_case_insensitive<'a>(
    tools: &'a [serde_json::Value],
    name: &str,
) -> Option<&'a serde_json::Value> {
    tools.iter().find(|t| {
        t.get("name")
            .and_then(|v| v.as_str())
            .is_some_and(|n| n.eq_ignore_ascii_case(name))
    })
}

/// The tool's input schema object (`inputSchema`, or `input_schema`).
pub fn input_schema(
    tool_obj: &serde_json::Value,
) -> Option<&serde_json::Map<String, serde_json::Value>> {
    tool_obj
        .get("inputSchema")
        .or_else(|| tool_obj.get("input_schema"))
        .and_then(|v| v.as_object())
}

/// Primitive type of a schema property. `["string","null"]` style unions
/// resolve to their first non-null member.
pub fn property_type(prop: &serde_json::Value) -> &str {
    match prop.get("type") {
        Some(serde_json::Value::String(s)) => s.as_str(),
        Some(serde_json::Value::Array(items)) => items
            .iter()
            .filter_map(|v| v.as_str())
            .find(|s| *s != "null")
            .unwrap_or("string"),
        _ => "string",
    }
}

/// Required property names of a schema.
pub fn required_names(schema: &serde_json::Map<String, serde_json::Value>) -> HashSet<&str> {
    schema
        .get("required")
        .and_then(|v| v.as_array())
        .map(|arr| arr.iter().filter_map(|x| x.as_str()).collect())
        .unwrap_or_default()
}

/* ---- Argument Building / Schema Handling ---- */

/// Build a JSON arguments object for a tool call.
///
/// - `--param` strings are coerced by the property's declared `type`.
/// - `file_values` (from a param file) are used as-is; a `--param` with the
///   same key wins.
/// - Keys not in the schema pass through unchanged (the server rejects them
///   if they are invalid).
/// - A missing required property is an error.
pub fn build_arguments_from_schema(
    tool_obj: &serde_json::Value,
    provided: &HashMap<String, String>,
    file_values: &serde_json::Map<String, serde_json::Value>,
) -> Result<serde_json::Map<String, serde_json::Value>> {
    let schema = input_schema(tool_obj);
    let required = schema.map(required_names).unwrap_or_default();

    let mut result = serde_json::Map::new();
    let mut remaining = provided.clone();
    let mut remaining_file = file_values.clone();

    if let Some(props) = schema
        .and_then(|s| s.get("properties"))
        .and_then(|v| v.as_object())
    {
        for (pname, pobj) in props {
            let file_v = remaining_file.remove(pname);
            if let Some(raw_v) = remaining.remove(pname) {
                result.insert(pname.clone(), coerce_value(&raw_v, property_type(pobj)));
            } else if let Some(v) = file_v {
                result.insert(pname.clone(), v);
            } else if required.contains(pname.as_str()) {
                anyhow::bail!("missing required parameter: {}", pname);
            }
        }
    }

    result.extend(remaining_file);
    for (k, v) in remaining {
        result.insert(k, serde_json::Value::String(v));
    }

    Ok(result)
}

/// Attempt to coerce a raw string into a JSON value using a primitive type hint.
pub fn coerce_value(raw: &str, type_hint: &str) -> serde_json::Value {
    match type_hint {
        "integer" => raw
            .parse::<i64>()
            .map(|n| serde_json::Value::Number(n.into()))
            .unwrap_or_else(|_| serde_json::Value::String(raw.to_string())),
        "number" => raw
            .parse::<f64>()
            .ok()
            .and_then(serde_json::Number::from_f64)
            .map(serde_json::Value::Number)
            .unwrap_or_else(|| serde_json::Value::String(raw.to_string())),
        "boolean" => match raw.to_ascii_lowercase().as_str() {
            "true" | "1" | "yes" | "y" => serde_json::Value::Bool(true),
            "false" | "0" | "no" | "n" => serde_json::Value::Bool(false),
            _ => serde_json::Value::String(raw.to_string()),
        },
        "array" => serde_json::Value::Array(
            raw.split(',')
                .map(|s| s.trim())
                .filter(|s| !s.is_empty())
                .map(|s| serde_json::Value::String(s.to_string()))
                .collect(),
        ),
        _ => serde_json::Value::String(raw.to_string()),
    }
}

/// Parse repeated `--param KEY=VALUE` entries.
pub fn parse_param_pairs(pairs: &[String]) -> Result<HashMap<String, String>> {
    let mut provided = HashMap::new();
    for kv in pairs {
        let Some((k, v)) = kv.split_once('=') else {
            anyhow::bail!("invalid --param (expected KEY=VALUE): {kv}");
        };
        let key = k.trim();
        if key.is_empty() {
            anyhow::bail!("invalid --param (empty key): {kv}");
        }
        provided.insert(key.to_string(), v.to_string());
    }
    Ok(provided)
}

/// Read a JSON or YAML object file of tool arguments.
/// Values keep their JSON types; null entries are dropped (same as omitting
/// the key).
pub fn load_param_file(path: &str) -> Result<serde_json::Map<String, serde_json::Value>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read param file: {path}"))?;
    let lower = path.to_ascii_lowercase();

    let value: serde_json::Value = if lower.ends_with(".yaml") || lower.ends_with(".yml") {
        let yaml_v: serde_yaml::Value =
            serde_yaml::from_str(&raw).context("failed to parse YAML param file")?;
        serde_json::to_value(yaml_v).context("failed to convert YAML to JSON")?
    } else {
        serde_json::from_str(&raw).context("failed to parse JSON param file")?
    };

    let serde_json::Value::Object(mut obj) = value else {
        anyhow::bail!("param file root must be an object");
    };
    obj.retain(|_, v| !v.is_null());
    Ok(obj)
}

/* ---- Result Helpers ---- */

/// Concatenated text items of a serialized tool result / resource contents list.
pub fn collect_text(items: Option<&serde_json::Value>) -> String {
    items
        .and_then(|v| v.as_array())
        .map(|arr| {
            arr.iter()
                .filter_map(|c| c.get("text").and_then(|t| t.as_str()))
                .collect::<Vec<_>>()
                .join("\n")
        })
        .unwrap_or_default()
}

/// `(text, is_error)` of a tool call result.
pub fn call_result_text(call_result: &rmcp::model::CallToolResult) -> (String, bool) {
    let val = serde_json::to_value(call_result).unwrap_or(serde_json::Value::Null);
    let is_error = val
        .get("isError")
        .and_then(|v| v.as_bool())
        .unwrap_or(false);
    (collect_text(val.get("content")), is_error)
}

/* ---- Tests (basic) ---- */
#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn coerce_integer() {
        assert_eq!(coerce_value("42", "integer"), json!(42));
        assert_eq!(
            coerce_value("x42", "integer"),
            json!("x42"),
            "invalid integer remains string"
        );
    }

    #[test]
    fn coerce_boolean() {
        assert_eq!(coerce_value("true", "boolean"), json!(true));
        assert_eq!(coerce_value("No", "boolean"), json!(false));
        assert_eq!(coerce_value("maybe", "boolean"), json!("maybe"));
    }

    #[test]
    fn coerce_array() {
        assert_eq!(
            coerce_value("a.txt, b.txt,", "array"),
            json!(["a.txt", "b.txt"]),
            "comma splitting with trimming"
        );
    }

    #[test]
    fn nullable_type_resolves_to_member() {
        assert_eq!(property_type(&json!({"type": ["string", "null"]})), "string");
        assert_eq!(property_type(&json!({"type": "integer"})), "integer");
        assert_eq!(property_type(&json!({})), "string");
    }

    fn gist_tool() -> serde_json::Value {
        json!({
            "name": "gist_create",
            "inputSchema": {
                "type": "object",
                "required": ["files"],
                "properties": {
                    "files": {"type": "array", "items": {"type": "string"}},
                    "description": {"type": ["string", "null"]},
                    "public": {"type": "boolean"}
                }
            }
        })
    }

    #[test]
    fn build_arguments_from_gist_schema() {
        let mut provided = HashMap::new();
        provided.insert("files".into(), "a.txt,b.txt".into());
        provided.insert("public".into(), "yes".into());
        provided.insert("description".into(), "42".into());

        let args =
            build_arguments_from_schema(&gist_tool(), &provided, &serde_json::Map::new()).unwrap();
        assert_eq!(args.get("files"), Some(&json!(["a.txt", "b.txt"])));
        assert_eq!(args.get("public"), Some(&json!(true)));
        assert_eq!(args.get("description"), Some(&json!("42")));
    }

    #[test]
    fn build_arguments_missing_required() {
        let provided = HashMap::<String, String>::new();
        let err = build_arguments_from_schema(&gist_tool(), &provided, &serde_json::Map::new())
            .unwrap_err();
        assert!(err.to_string().contains("missing required parameter: files"));
    }

    #[test]
    fn find_tool_ignores_case() {
        let tools = vec![json!({"name": "repo_list"}), json!({"name": "pr_view"})];
        let t = find_tool_case_insensitive(&tools, "PR_VIEW").unwrap();
        assert_eq!(t["name"], "pr_view");
        assert!(find_tool_case_insensitive(&tools, "nope").is_none());
    }

    #[test]
    fn param_pairs_reject_malformed() {
        let ok = parse_param_pairs(&["repo=cli/cli".into(), " state =closed".into()]).unwrap();
        assert_eq!(ok.get("repo").map(String::as_str), Some("cli/cli"));
        assert_eq!(ok.get("state").map(String::as_str), Some("closed"));
        assert!(parse_param_pairs(&["noequals".into()]).is_err());
        assert!(parse_param_pairs(&["=value".into()]).is_err());
    }

    #[test]
    fn param_pairs_keep_value_whitespace() {
        let ok = parse_param_pairs(&["body=    indented code\n".into()]).unwrap();
        assert_eq!(ok.get("body").map(String::as_str), Some("    indented code\n"));
    }

    fn write_temp(name: &str, contents: &str) -> String {
        let path = std::env::temp_dir().join(name);
        std::fs::write(&path, contents).unwrap();
        path.to_str().unwrap().to_string()
    }

    #[test]
    fn param_file_json_keeps_types_and_cli_wins() {
        let path = write_temp(
            "gh_mcp_param_test.json",
            r#"{ "files": ["a.txt"], "public": true, "description": "from file" }"#,
        );
        let file_values = load_param_file(&path).unwrap();

        let mut provided = HashMap::new();
        provided.insert("description".into(), "from cli".into());
        let args = build_arguments_from_schema(&gist_tool(), &provided, &file_values).unwrap();

        assert_eq!(args.get("files"), Some(&json!(["a.txt"])));
        assert_eq!(args.get("public"), Some(&json!(true)));
        assert_eq!(args.get("description"), Some(&json!("from cli")));
    }

    #[test]
    fn param_file_yaml_null_is_omitted() {
        let path = write_temp(
            "gh_mcp_param_null.yaml",
            "files:\n  - a.txt\ndescription:\npublic: ~\n",
        );
        let file_values = load_param_file(&path).unwrap();
        assert!(!file_values.contains_key("description"));
        assert!(!file_values.contains_key("public"));

        let args =
            build_arguments_from_schema(&gist_tool(), &HashMap::new(), &file_values).unwrap();
        assert!(args.get("description").is_none());
        assert_eq!(args.get("files"), Some(&json!(["a.txt"])));
    }

    #[test]
    fn param_file_list_entries_keep_commas() {
        let path = write_temp(
            "gh_mcp_param_comma.yaml",
            "files:\n  - \"notes, v2.md\"\n  - b.txt\n",
        );
        let file_values = load_param_file(&path).unwrap();
        let args =
            build_arguments_from_schema(&gist_tool(), &HashMap::new(), &file_values).unwrap();
        assert_eq!(args.get("files"), Some(&json!(["notes, v2.md", "b.txt"])));
    }

    #[test]
    fn param_file_root_must_be_object() {
        let path = write_temp("gh_mcp_param_list.json", "[1, 2]");
        assert!(load_param_file(&path).is_err());
    }

    #[test]
    fn collect_text_joins_items() {
        let v = json!([{"type":"text","text":"a"},{"type":"image"},{"type":"text","text":"b"}]);
        assert_eq!(collect_text(Some(&v)), "a\nb");
        assert_eq!(collect_text(None), "");
    }
}
