//! GitHub CLI invocation layer.
//!
//! parse_program -> GhProgram { program, leading_args }
//! GhRunner (trait seam) / GhCli (tokio::process backed)
//! GhError: non-zero exit or launch failure, rendered with ERROR_SENTINEL.
//!
use anyhow::{Context, Result, bail};
use async_trait::async_trait;
use shell_words::split as shell_split;
use std::fmt;
use std::process::Stdio;
use std::time::Instant;
use thiserror::Error;
use tokio::process::Command;
use tracing::{debug, warn};

pub mod args;
pub mod pr_summary;

/// Prefix marking text that reports a failed `gh` invocation.
pub const ERROR_SENTINEL: &str = "Error: ";

/// Program used when neither `--gh` nor `GH_MCP_GH` is set.
pub const DEFAULT_PROGRAM: &str = "gh";

/// Failure of a single external invocation.
#[derive(Debug, Error)]
pub enum GhError {
    /// The process ran and exited unsuccessfully; `stderr` is its diagnostic text.
    #[error("{stderr}")]
    Failed { code: Option<i32>, stderr: String },

    /// The process could not be started at all.
    #[error("failed to launch '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
}

impl GhError {
    /// Sentinel-prefixed text handed back to tool callers.
    pub fn to_sentinel_text(&self) -> String {
        format!("{ERROR_SENTINEL}{self}")
    }
}

/// The external program to launch, with any fixed leading arguments
/// (e.g. `op plugin run -- gh`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GhProgram {
    original: String,
    pub program: String,
    pub leading_args: Vec<String>,
}

impl GhProgram {
    /// Returns the original user-supplied form.
    pub fn original(&self) -> &str {
        &self.original
    }

    /// Shell-quoted rendering of the full command line for `args`.
    pub fn render(&self, args: &[String]) -> String {
        let words = std::iter::once(&self.program)
            .chain(self.leading_args.iter())
            .chain(args.iter());
        shell_words::join(words)
    }
}

impl Default for GhProgram {
    fn default() -> Self {
        Self {
            original: DEFAULT_PROGRAM.to_string(),
            program: DEFAULT_PROGRAM.to_string(),
            leading_args: Vec::new(),
        }
    }
}

impl fmt::Display for GhProgram {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.leading_args.is_empty() {
            write!(f, "{}", self.program)
        } else {
            write!(f, "{} {}", self.program, self.leading_args.join(" "))
        }
    }
}

/// Parse a `--gh` / `GH_MCP_GH` value into a `GhProgram`.
///
/// The value is split with shell rules; the first word is the executable and
/// the rest are prepended to every invocation.
///
/// Examples:
/// - "gh" -> program "gh"
/// - "/opt/homebrew/bin/gh" -> program "/opt/homebrew/bin/gh"
/// - "op plugin run -- gh" -> program "op", leading ["plugin", "run", "--", "gh"]
pub fn parse_program(raw: &str) -> Result<GhProgram> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        bail!("gh program string is empty");
    }

    let parts =
        shell_split(trimmed).context("failed to parse gh command line (shell splitting)")?;
    let Some((program, rest)) = parts.split_first() else {
        bail!("no tokens produced when parsing gh command line");
    };
    if program.is_empty() {
        bail!("empty program name in gh command line");
    }

    Ok(GhProgram {
        original: raw.to_string(),
        program: program.clone(),
        leading_args: rest.to_vec(),
    })
}

/// Runs one `gh` argument vector to completion.
#[async_trait]
pub trait GhRunner: Send + Sync {
    /// Returns stdout on a zero exit status.
    async fn run(&self, args: &[String]) -> Result<String, GhError>;
}

/// Subprocess-backed runner.
#[derive(Debug, Clone, Default)]
pub struct GhCli {
    program: GhProgram,
}

impl GhCli {
    pub fn new(program: GhProgram) -> Self {
        Self { program }
    }
}

#[async_trait]
impl GhRunner for GhCli {
    async fn run(&self, args: &[String]) -> Result<String, GhError> {
        let started = Instant::now();
        debug!(command = %self.program.render(args), "running gh");

        let output = Command::new(&self.program.program)
            .args(&self.program.leading_args)
            .args(args)
            // stdin belongs to the MCP transport
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .env("GH_PROMPT_DISABLED", "1")
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|source| GhError::Spawn {
                program: self.program.program.clone(),
                source,
            })?;

        let elapsed_ms = started.elapsed().as_millis();
        if output.status.success() {
            debug!(elapsed_ms, bytes = output.stdout.len(), "gh finished");
            return Ok(String::from_utf8_lossy(&output.stdout).into_owned());
        }

        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
        warn!(
            code = ?output.status.code(),
            elapsed_ms,
            stderr = %stderr.trim_end(),
            "gh exited unsuccessfully"
        );
        Err(GhError::Failed {
            code: output.status.code(),
            stderr,
        })
    }
}
