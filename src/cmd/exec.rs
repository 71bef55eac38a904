/*!
`exec.rs`

Implements `gh-mcp exec <TOOL>`: invoke one tool through an in-process
client, exactly as an MCP client would.

Parameter injection:
  --param KEY=VALUE               (repeatable)
  --param-file params.(json|yaml) (merged; --param overrides file entries)

--param values are coerced using the tool's input schema (integer / number /
boolean / array as comma list / string). Param file values keep their
JSON / YAML types; null entries count as omitted.

Human output prints the tool's text as-is (gh's own output). A failed gh
call prints the sentinel-prefixed text and exits non-zero.

JSON Output:
{
  "status": "ok" | "error",
  "tool": "pr_view",
  "elapsed_ms": 412,
  "arguments": { ... },
  "text": "...",
  "result": { ...full call result, only with --raw... }
}
*/

use anyhow::{Context, Result};
use clap::Args;
use rmcp::model::{CallToolRequestParam, CallToolResult};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use crate::cmd::format::{Role, StyleOptions, box_header, color, emoji};
use crate::cmd::shared::{
    self, build_arguments_from_schema, call_result_text, find_tool_case_insensitive,
    load_param_file, parse_param_pairs,
};
use crate::gh::{GhCli, GhProgram};
use crate::server::GithubCliServer;

#[derive(Args, Debug)]
pub struct ExecArgs {
    /// Tool name to invoke (see `gh-mcp list tools`)
    #[arg(value_name = "TOOL")]
    pub tool: String,

    /// Provide parameter (KEY=VALUE), repeatable
    #[arg(long = "param", value_name = "KEY=VALUE")]
    pub params: Vec<String>,

    /// Load parameters from file (JSON or YAML). CLI --param overrides file entries
    #[arg(long = "param-file", value_name = "PATH")]
    pub param_file: Option<String>,

    /// Output JSON
    #[arg(long)]
    pub json: bool,

    /// Include the full MCP call result in JSON output / print a header in human output
    #[arg(long)]
    pub raw: bool,
}

/// Outcome of one in-process tool call.
#[derive(Debug)]
struct Invocation {
    tool: String,
    arguments: serde_json::Map<String, serde_json::Value>,
    result: CallToolResult,
}

pub fn execute_exec(args: ExecArgs, program: GhProgram) -> Result<()> {
    let tool_name = args.tool.trim().to_string();
    if tool_name.is_empty() {
        return output_error(args.json, "tool name cannot be empty");
    }

    let provided = match parse_param_pairs(&args.params) {
        Ok(p) => p,
        Err(e) => return output_error(args.json, &e.to_string()),
    };
    let file_values = match args.param_file.as_deref().map(load_param_file) {
        Some(Ok(values)) => values,
        Some(Err(e)) => return output_error(args.json, &format!("{e:#}")),
        None => serde_json::Map::new(),
    };

    let rt = tokio::runtime::Runtime::new().context("Failed to create Tokio runtime")?;
    let started = Instant::now();
    let outcome = rt.block_on(invoke_tool(program, &tool_name, &provided, &file_values));
    let elapsed_ms = started.elapsed().as_millis();

    let invocation = match outcome {
        Ok(inv) => inv,
        Err(e) => return output_error(args.json, &format!("{e:#}")),
    };
    let (text, is_error) = call_result_text(&invocation.result);

    if args.json {
        let mut body = serde_json::json!({
            "status": if is_error { "error" } else { "ok" },
            "tool": invocation.tool,
            "elapsed_ms": elapsed_ms,
            "arguments": invocation.arguments,
            "text": text,
        });
        if args.raw {
            body["result"] = serde_json::to_value(&invocation.result)
                .unwrap_or_else(|_| serde_json::json!({"error": "serialize"}));
        }
        println!(
            "{}",
            serde_json::to_string_pretty(&body).unwrap_or_else(|_| body.to_string())
        );
    } else {
        let style = StyleOptions::detect();
        if args.raw {
            let (tag, role, label) = if is_error {
                ("error", Role::Error, "failed")
            } else {
                ("success", Role::Success, "ok")
            };
            println!(
                "{}",
                box_header(
                    format!("{} {}", emoji("tool", &style), invocation.tool),
                    Some(format!("{elapsed_ms} ms")),
                    &style,
                )
            );
            println!("{} {}", emoji(tag, &style), color(role, label, &style));
        }
        print!("{text}");
        if !text.ends_with('\n') {
            println!();
        }
    }

    if is_error {
        anyhow::bail!("tool '{}' reported a gh failure", invocation.tool);
    }
    Ok(())
}

/* ---- Core Invocation Logic ---- */

async fn invoke_tool(
    program: GhProgram,
    tool_name: &str,
    provided: &HashMap<String, String>,
    file_values: &serde_json::Map<String, serde_json::Value>,
) -> Result<Invocation> {
    let server = GithubCliServer::new(Arc::new(GhCli::new(program)));
    let session = shared::connect(server).await?;
    let outcome = call_on_session(&session, tool_name, provided, file_values).await;
    session.close().await;
    outcome
}

async fn call_on_session(
    session: &shared::Session,
    tool_name: &str,
    provided: &HashMap<String, String>,
    file_values: &serde_json::Map<String, serde_json::Value>,
) -> Result<Invocation> {
    let tools: Vec<serde_json::Value> = session
        .client
        .list_all_tools()
        .await
        .context("Failed to list tools")?
        .iter()
        .filter_map(|t| serde_json::to_value(t).ok())
        .collect();

    let tool_obj = find_tool_case_insensitive(&tools, tool_name)
        .ok_or_else(|| anyhow::anyhow!("tool '{tool_name}' not found"))?;
    let canonical = tool_obj
        .get("name")
        .and_then(|v| v.as_str())
        .unwrap_or(tool_name)
        .to_string();

    let arguments = build_arguments_from_schema(tool_obj, provided, file_values)
        .context("Failed to build arguments")?;

    let result = session
        .client
        .call_tool(CallToolRequestParam {
            name: canonical.clone().into(),
            arguments: if arguments.is_empty() {
                None
            } else {
                Some(arguments.clone())
            },
        })
        .await
        .with_context(|| format!("tool invocation failed: {canonical}"))?;

    Ok(Invocation {
        tool: canonical,
        arguments,
        result,
    })
}

/* ---- Output Helpers ---- */

fn output_error(json: bool, msg: &str) -> Result<()> {
    if json {
        let err = serde_json::json!({"status": "error", "error": msg});
        println!(
            "{}",
            serde_json::to_string_pretty(&err).unwrap_or_else(|_| err.to_string())
        );
    } else {
        let style = StyleOptions::detect();
        let title = format!("{} Exec Error", emoji("error", &style));
        println!("{}", box_header(title, None::<&str>, &style));
        println!("{}", color(Role::Error, msg, &style));
    }
    anyhow::bail!(msg.to_string())
}
