/*!
`list.rs`

Implements `gh-mcp list <tools|resources>`.

Both subjects are fetched through an in-process client (`shared::connect`),
so the output is exactly what an MCP client would see.

JSON Output Shape (tools):
{
  "status": "ok",
  "subject": "tools",
  "gh": "gh",
  "elapsed_ms": 3,
  "count": 12,
  "tools": [
    { "name": "pr_view", "description": "...", "parameters": ["pr:integer*", "repo:string*"] }
  ]
}

JSON Output Shape (resources):
{
  "status": "ok",
  "subject": "resources",
  "count": 2,
  "resources": [ { "uri_template": "repo://{owner}/{name}", "name": "repository", "description": "..." } ]
}

Required parameters carry a trailing `*`.
*/

use anyhow::{Context, Result};
use clap::Args;
use std::sync::Arc;
use std::time::Instant;

use crate::cmd::format::{Role, StyleOptions, box_header, color, emoji, table};
use crate::cmd::shared::{self, input_schema, property_type, required_names};
use crate::cmd::subject::Subject;
use crate::gh::{GhCli, GhProgram};
use crate::server::GithubCliServer;

/// CLI arguments for `gh-mcp list <subject>`
#[derive(Args, Debug)]
pub struct ListArgs {
    /// Subject to list (tools|resources)
    pub subject: Subject,

    /// Output JSON instead of human-readable text
    #[arg(long)]
    pub json: bool,
}

/// One row of `list` output, independent of rendering.
#[derive(Debug, Clone, PartialEq)]
enum Entry {
    Tool {
        name: String,
        params: Vec<String>,
        description: String,
    },
    Template {
        uri_template: String,
        name: String,
        description: String,
    },
}

impl Entry {
    fn to_json(&self) -> serde_json::Value {
        match self {
            Entry::Tool {
                name,
                params,
                description,
            } => serde_json::json!({
                "name": name,
                "description": description,
                "parameters": params,
            }),
            Entry::Template {
                uri_template,
                name,
                description,
            } => serde_json::json!({
                "uri_template": uri_template,
                "name": name,
                "description": description,
            }),
        }
    }

    fn into_row(self) -> Vec<String> {
        match self {
            Entry::Tool {
                name,
                params,
                description,
            } => {
                let params = if params.is_empty() {
                    "-".to_string()
                } else {
                    params.join(", ")
                };
                vec![name, params, description.replace('\n', " ")]
            }
            Entry::Template {
                uri_template,
                name,
                description,
            } => vec![uri_template, name, description.replace('\n', " ")],
        }
    }
}

/// Entry point for the list subcommand.
pub fn execute_list(args: ListArgs, program: GhProgram) -> Result<()> {
    let rt = tokio::runtime::Runtime::new().context("Failed to create Tokio runtime")?;
    let started = Instant::now();
    let entries = rt.block_on(fetch_entries(args.subject, program.clone()))?;
    let elapsed_ms = started.elapsed().as_millis();

    if args.json {
        let items: Vec<serde_json::Value> = entries.iter().map(Entry::to_json).collect();
        let mut body = serde_json::json!({
            "status": "ok",
            "subject": args.subject.to_string(),
            "gh": program.original(),
            "elapsed_ms": elapsed_ms,
            "count": items.len(),
        });
        body[args.subject.to_string().as_str()] = serde_json::Value::Array(items);
        println!("{body}");
        return Ok(());
    }

    let style = StyleOptions::detect();
    let (icon, headers) = match args.subject {
        Subject::Tools => ("list", ["NAME", "PARAMS", "DESCRIPTION"]),
        Subject::Resources => ("resource", ["URI TEMPLATE", "NAME", "DESCRIPTION"]),
    };
    println!(
        "{}",
        box_header(
            format!(
                "{} {} ({})",
                emoji(icon, &style),
                args.subject,
                entries.len()
            ),
            Some(format!("gh={program} • {elapsed_ms} ms")),
            &style,
        )
    );

    if entries.is_empty() {
        println!(
            "{}",
            color(Role::Dim, format!("{} (none)", emoji("info", &style)), &style)
        );
        return Ok(());
    }

    let rows: Vec<Vec<String>> = entries.into_iter().map(Entry::into_row).collect();
    println!("{}", table(&headers, &rows, &style));

    if matches!(args.subject, Subject::Tools) {
        println!(
            "\n{} {}",
            emoji("info", &style),
            color(
                Role::Dim,
                "Use `gh-mcp exec <tool> --param KEY=VALUE` to invoke a tool (* = required)",
                &style
            )
        );
    }
    Ok(())
}

async fn fetch_entries(subject: Subject, program: GhProgram) -> Result<Vec<Entry>> {
    let server = GithubCliServer::new(Arc::new(GhCli::new(program)));
    let session = shared::connect(server).await?;

    let entries = match subject {
        Subject::Tools => session
            .client
            .list_all_tools()
            .await
            .context("Failed to list tools")
            .map(|tools| {
                tools
                    .iter()
                    .map(|t| tool_entry(&serde_json::to_value(t).unwrap_or_default()))
                    .collect()
            }),
        Subject::Resources => session
            .client
            .list_all_resource_templates()
            .await
            .context("Failed to list resource templates")
            .map(|templates| {
                templates
                    .iter()
                    .map(|t| template_entry(&serde_json::to_value(t).unwrap_or_default()))
                    .collect()
            }),
    };

    session.close().await;
    entries
}

fn str_field(v: &serde_json::Value, key: &str) -> String {
    v.get(key)
        .and_then(|x| x.as_str())
        .unwrap_or_default()
        .to_string()
}

fn tool_entry(tool: &serde_json::Value) -> Entry {
    let mut params = Vec::new();
    if let Some(schema) = input_schema(tool) {
        let required = required_names(schema);
        if let Some(props) = schema.get("properties").and_then(|v| v.as_object()) {
            for (pname, pobj) in props {
                let marker = if required.contains(pname.as_str()) { "*" } else { "" };
                params.push(format!("{pname}:{}{marker}", property_type(pobj)));
            }
        }
    }
    Entry::Tool {
        name: str_field(tool, "name"),
        params,
        description: str_field(tool, "description"),
    }
}

fn template_entry(template: &serde_json::Value) -> Entry {
    Entry::Template {
        uri_template: str_field(template, "uriTemplate"),
        name: str_field(template, "name"),
        description: str_field(template, "description"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use serde_json::json;

    #[derive(Parser, Debug)]
    struct TestCli {
        #[command(subcommand)]
        cmd: TestSub,
    }

    #[derive(clap::Subcommand, Debug)]
    enum TestSub {
        List(ListArgs),
    }

    #[test]
    fn clap_parses_list_resources_json() {
        let cli = TestCli::try_parse_from(["t", "list", "resources", "--json"]).unwrap();
        let TestSub::List(a) = cli.cmd;
        assert_eq!(a.subject, Subject::Resources);
        assert!(a.json);
    }

    #[test]
    fn tool_entry_marks_required_params() {
        let tool = json!({
            "name": "issue_list",
            "description": "List issues in a repository",
            "inputSchema": {
                "type": "object",
                "required": ["repo"],
                "properties": {
                    "repo": {"type": "string"},
                    "state": {"type": "string", "default": "open"}
                }
            }
        });
        let Entry::Tool { name, params, .. } = tool_entry(&tool) else {
            panic!("expected a tool entry");
        };
        assert_eq!(name, "issue_list");
        assert_eq!(params, vec!["repo:string*", "state:string"]);
    }

    #[test]
    fn template_entry_reads_camel_case() {
        let e = template_entry(&json!({
            "uriTemplate": "user://{username}",
            "name": "user",
            "description": "profile"
        }));
        assert_eq!(
            e.to_json(),
            json!({"uri_template": "user://{username}", "name": "user", "description": "profile"})
        );
        assert_eq!(e.into_row(), vec!["user://{username}", "user", "profile"]);
    }

    #[tokio::test]
    async fn in_process_listing_sees_every_tool() {
        let entries = fetch_entries(Subject::Tools, GhProgram::default())
            .await
            .unwrap();
        assert_eq!(entries.len(), 12);
        let pr_view = entries
            .iter()
            .find_map(|e| match e {
                Entry::Tool { name, params, .. } if name == "pr_view" => Some(params),
                _ => None,
            })
            .unwrap();
        assert!(pr_view.contains(&"pr:integer*".to_string()));
    }
}
