/*!
`serve.rs`

Implements `gh-mcp serve` (the default): run the MCP server over stdio
until the client disconnects. stdout carries protocol frames only; all
diagnostics go to stderr through `tracing`.
*/

use anyhow::{Context, Result};
use rmcp::{ServiceExt, transport::stdio};
use std::sync::Arc;
use tracing::info;

use crate::gh::{GhCli, GhProgram};
use crate::server::GithubCliServer;

pub fn execute_serve(program: GhProgram) -> Result<()> {
    let rt = tokio::runtime::Runtime::new().context("Failed to create Tokio runtime")?;
    rt.block_on(serve_stdio(program))
}

async fn serve_stdio(program: GhProgram) -> Result<()> {
    info!(gh = %program, "serving GitHub CLI tools over stdio");
    let server = GithubCliServer::new(Arc::new(GhCli::new(program)));

    let running = server
        .serve(stdio())
        .await
        .context("Failed to start MCP server on stdio")?;
    let reason = running.waiting().await.context("MCP server task failed")?;

    info!(?reason, "client disconnected; shutting down");
    Ok(())
}
