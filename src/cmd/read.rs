/*!
`read.rs`

Implements `gh-mcp read <URI>`: fetch one resource (`repo://owner/name`,
`user://login`) through an in-process client.

Human output prints the resource text (the JSON document gh returned).

JSON Output:
{
  "status": "ok",
  "uri": "repo://cli/cli",
  "elapsed_ms": 230,
  "mime_type": "application/json",
  "text": "..."
}
*/

use anyhow::{Context, Result};
use clap::Args;
use rmcp::model::ReadResourceRequestParam;
use std::sync::Arc;
use std::time::Instant;

use crate::cmd::format::{Role, StyleOptions, box_header, color, emoji};
use crate::cmd::shared::{self, collect_text};
use crate::gh::{GhCli, GhProgram};
use crate::server::GithubCliServer;

#[derive(Args, Debug)]
pub struct ReadArgs {
    /// Resource URI (repo://{owner}/{name} or user://{username})
    #[arg(value_name = "URI")]
    pub uri: String,

    /// Output JSON
    #[arg(long)]
    pub json: bool,
}

/// Text and MIME type of the first resource contents entry.
#[derive(Debug, Clone, PartialEq)]
struct Fetched {
    text: String,
    mime_type: Option<String>,
}

pub fn execute_read(args: ReadArgs, program: GhProgram) -> Result<()> {
    let uri = args.uri.trim().to_string();
    let rt = tokio::runtime::Runtime::new().context("Failed to create Tokio runtime")?;
    let started = Instant::now();
    let outcome = rt.block_on(fetch(program, &uri));
    let elapsed_ms = started.elapsed().as_millis();

    let fetched = match outcome {
        Ok(f) => f,
        Err(e) => return output_error(args.json, &uri, &format!("{e:#}")),
    };

    if args.json {
        let body = serde_json::json!({
            "status": "ok",
            "uri": uri,
            "elapsed_ms": elapsed_ms,
            "mime_type": fetched.mime_type,
            "text": fetched.text,
        });
        println!(
            "{}",
            serde_json::to_string_pretty(&body).unwrap_or_else(|_| body.to_string())
        );
    } else {
        print!("{}", fetched.text);
        if !fetched.text.ends_with('\n') {
            println!();
        }
    }
    Ok(())
}

async fn fetch(program: GhProgram, uri: &str) -> Result<Fetched> {
    let server = GithubCliServer::new(Arc::new(GhCli::new(program)));
    let session = shared::connect(server).await?;
    let outcome = read_on_session(&session, uri).await;
    session.close().await;
    outcome
}

async fn read_on_session(session: &shared::Session, uri: &str) -> Result<Fetched> {
    let result = session
        .client
        .read_resource(ReadResourceRequestParam {
            uri: uri.to_string(),
        })
        .await
        .with_context(|| format!("Failed to read resource {uri}"))?;

    let val = serde_json::to_value(&result).context("Failed to encode resource contents")?;
    let contents = val.get("contents");
    let mime_type = contents
        .and_then(|c| c.get(0))
        .and_then(|c| c.get("mimeType"))
        .and_then(|m| m.as_str())
        .map(str::to_string);

    Ok(Fetched {
        text: collect_text(contents),
        mime_type,
    })
}

fn output_error(json: bool, uri: &str, msg: &str) -> Result<()> {
    if json {
        let err = serde_json::json!({"status": "error", "uri": uri, "error": msg});
        println!(
            "{}",
            serde_json::to_string_pretty(&err).unwrap_or_else(|_| err.to_string())
        );
    } else {
        let style = StyleOptions::detect();
        let title = format!("{} Read Error", emoji("error", &style));
        println!("{}", box_header(title, Some(uri), &style));
        println!("{}", color(Role::Error, msg, &style));
    }
    anyhow::bail!(msg.to_string())
}
