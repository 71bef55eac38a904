/*!
MCP server exposing GitHub CLI operations.

Tools are thin templates over `gh` (see `gh::args`); the only branching is
the `pr_view` fallback to `--json` output. Resources are served through
`resources/templates/list` + `resources/read`.

A `gh` failure never surfaces as a protocol error from a tool: the tool
result is flagged `is_error` and its text is the sentinel-prefixed stderr.
*/

use std::sync::Arc;

use rmcp::{
    ErrorData as McpError, RoleServer, ServerHandler,
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::*,
    service::RequestContext,
    tool, tool_handler, tool_router,
};
use tracing::debug;

use crate::gh::{GhError, GhRunner, args, pr_summary};

pub mod params;
pub mod resources;

use params::*;
use resources::{MIME_JSON, parse_resource_uri, template_descriptors};

const INSTRUCTIONS: &str = "GitHub via the gh CLI. Tools cover repositories (repo_*), issues \
(issue_*), pull requests (pr_*) and gists (gist_*); output is gh's own text. Failed commands \
return an error result whose text starts with 'Error: '. Resources: repo://{owner}/{name} and \
user://{username} return JSON.";

/// Server context: every handler reaches `gh` through `runner`.
#[derive(Clone)]
pub struct GithubCliServer {
    runner: Arc<dyn GhRunner>,
    tool_router: ToolRouter<Self>,
}

#[tool_router]
impl GithubCliServer {
    pub fn new(runner: Arc<dyn GhRunner>) -> Self {
        Self {
            runner,
            tool_router: Self::tool_router(),
        }
    }

    /* ---- Repositories ---- */

    #[tool(description = "List repositories you own or contribute to")]
    async fn repo_list(&self) -> Result<CallToolResult, McpError> {
        self.respond("repo_list", args::repo_list()).await
    }

    #[tool(description = "Show details of a repository")]
    async fn repo_view(
        &self,
        Parameters(p): Parameters<RepoViewParams>,
    ) -> Result<CallToolResult, McpError> {
        self.respond("repo_view", args::repo_view(&p.repo)).await
    }

    #[tool(description = "Create a new repository")]
    async fn repo_create(
        &self,
        Parameters(p): Parameters<RepoCreateParams>,
    ) -> Result<CallToolResult, McpError> {
        let argv = args::repo_create(&p.name, p.description.as_deref(), p.private);
        self.respond("repo_create", argv).await
    }

    /* ---- Issues ---- */

    #[tool(description = "List issues in a repository")]
    async fn issue_list(
        &self,
        Parameters(p): Parameters<IssueListParams>,
    ) -> Result<CallToolResult, McpError> {
        self.respond("issue_list", args::issue_list(&p.repo, &p.state)).await
    }

    #[tool(description = "Show a single issue")]
    async fn issue_view(
        &self,
        Parameters(p): Parameters<IssueViewParams>,
    ) -> Result<CallToolResult, McpError> {
        self.respond("issue_view", args::issue_view(p.issue, &p.repo)).await
    }

    #[tool(description = "Create a new issue")]
    async fn issue_create(
        &self,
        Parameters(p): Parameters<IssueCreateParams>,
    ) -> Result<CallToolResult, McpError> {
        let argv = args::issue_create(&p.repo, &p.title, &p.body);
        self.respond("issue_create", argv).await
    }

    /* ---- Pull requests ---- */

    #[tool(description = "List pull requests in a repository")]
    async fn pr_list(
        &self,
        Parameters(p): Parameters<PrListParams>,
    ) -> Result<CallToolResult, McpError> {
        self.respond("pr_list", args::pr_list(&p.repo, &p.state)).await
    }

    #[tool(description = "Show a single pull request")]
    async fn pr_view(
        &self,
        Parameters(p): Parameters<PrNumberParams>,
    ) -> Result<CallToolResult, McpError> {
        debug!(tool = "pr_view", pr = p.pr, repo = %p.repo, "tool call");
        Ok(tool_result(self.view_pull_request(p.pr, &p.repo).await))
    }

    #[tool(description = "Show the full diff of a pull request")]
    async fn pr_diff(
        &self,
        Parameters(p): Parameters<PrNumberParams>,
    ) -> Result<CallToolResult, McpError> {
        self.respond("pr_diff", args::pr_diff(p.pr, &p.repo)).await
    }

    #[tool(description = "Create a pull request")]
    async fn pr_create(
        &self,
        Parameters(p): Parameters<PrCreateParams>,
    ) -> Result<CallToolResult, McpError> {
        let argv = args::pr_create(&p.repo, &p.title, &p.body, &p.base);
        self.respond("pr_create", argv).await
    }

    /* ---- Gists ---- */

    #[tool(description = "List your gists")]
    async fn gist_list(&self) -> Result<CallToolResult, McpError> {
        self.respond("gist_list", args::gist_list()).await
    }

    #[tool(description = "Create a gist from local files")]
    async fn gist_create(
        &self,
        Parameters(p): Parameters<GistCreateParams>,
    ) -> Result<CallToolResult, McpError> {
        let argv = args::gist_create(&p.files, p.description.as_deref(), p.public);
        self.respond("gist_create", argv).await
    }
}

impl GithubCliServer {
    async fn respond(&self, tool: &str, argv: Vec<String>) -> Result<CallToolResult, McpError> {
        debug!(tool, "tool call");
        Ok(tool_result(self.runner.run(&argv).await))
    }

    /// `pr view`, falling back to a summary of `pr view --json` when the
    /// plain form fails. If the fallback fails too (or does not yield a JSON
    /// object) the first failure is returned unchanged.
    pub async fn view_pull_request(&self, pr: u64, repo: &str) -> Result<String, GhError> {
        let first = match self.runner.run(&args::pr_view(pr, repo)).await {
            Ok(text) => return Ok(text),
            Err(e) => e,
        };

        debug!(pr, repo, "pr view failed; retrying with --json");
        match self.runner.run(&args::pr_view_json(pr, repo)).await {
            Ok(raw) => pr_summary::summarize(&raw).ok_or(first),
            Err(_) => Err(first),
        }
    }
}

fn tool_result(outcome: Result<String, GhError>) -> CallToolResult {
    match outcome {
        Ok(text) => CallToolResult::success(vec![Content::text(text)]),
        Err(e) => {
            if let GhError::Failed { code, .. } = &e {
                debug!(?code, "gh failure returned as error result");
            }
            CallToolResult::error(vec![Content::text(e.to_sentinel_text())])
        }
    }
}

fn internal(e: serde_json::Error) -> McpError {
    McpError::internal_error(e.to_string(), None)
}

#[tool_handler]
impl ServerHandler for GithubCliServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            capabilities: ServerCapabilities::builder()
                .enable_tools()
                .enable_resources()
                .build(),
            server_info: Implementation {
                name: env!("CARGO_PKG_NAME").to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                ..Default::default()
            },
            instructions: Some(INSTRUCTIONS.to_string()),
            ..Default::default()
        }
    }

    async fn list_resource_templates(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListResourceTemplatesResult, McpError> {
        serde_json::from_value(serde_json::json!({ "resourceTemplates": template_descriptors() }))
            .map_err(internal)
    }

    async fn read_resource(
        &self,
        request: ReadResourceRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> Result<ReadResourceResult, McpError> {
        let resource = parse_resource_uri(&request.uri)
            .map_err(|e| McpError::resource_not_found(e.to_string(), None))?;
        debug!(%resource, "resource read");

        let body = self
            .runner
            .run(&resource.gh_args())
            .await
            .map_err(|e| McpError::internal_error(e.to_sentinel_text(), None))?;

        let contents: ResourceContents = serde_json::from_value(serde_json::json!({
            "uri": request.uri,
            "mimeType": MIME_JSON,
            "text": body,
        }))
        .map_err(internal)?;
        Ok(ReadResourceResult {
            contents: vec![contents],
        })
    }
}
