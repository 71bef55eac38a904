//! Tool parameter types (deserialized from `tools/call` arguments).

use rmcp::schemars;
use serde::Deserialize;

fn default_state() -> String {
    "open".to_string()
}

fn default_base() -> String {
    "main".to_string()
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct RepoViewParams {
    /// Repository as OWNER/NAME (or NAME for your own repository)
    pub repo: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct RepoCreateParams {
    /// Name of the new repository
    pub name: String,
    /// Optional repository description
    #[serde(default)]
    pub description: Option<String>,
    /// Create the repository as private
    #[serde(default)]
    pub private: bool,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct IssueListParams {
    /// Repository as OWNER/NAME
    pub repo: String,
    /// Filter by state: open, closed or all
    #[serde(default = "default_state")]
    pub state: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct IssueViewParams {
    /// Issue number
    pub issue: u64,
    /// Repository as OWNER/NAME
    pub repo: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct IssueCreateParams {
    /// Repository as OWNER/NAME
    pub repo: String,
    /// Issue title
    pub title: String,
    /// Issue body (markdown)
    pub body: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct PrListParams {
    /// Repository as OWNER/NAME
    pub repo: String,
    /// Filter by state: open, closed, merged or all
    #[serde(default = "default_state")]
    pub state: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct PrNumberParams {
    /// Pull request number
    pub pr: u64,
    /// Repository as OWNER/NAME
    pub repo: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct PrCreateParams {
    /// Repository as OWNER/NAME
    pub repo: String,
    /// Pull request title
    pub title: String,
    /// Pull request body (markdown)
    pub body: String,
    /// Branch to merge into
    #[serde(default = "default_base")]
    pub base: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct GistCreateParams {
    /// Local file paths to upload
    pub files: Vec<String>,
    /// Optional gist description
    #[serde(default)]
    pub description: Option<String>,
    /// Create a public gist (gists are secret by default)
    #[serde(default)]
    pub public: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_state_defaults_to_open() {
        let p: IssueListParams = serde_json::from_str(r#"{"repo":"cli/cli"}"#).unwrap();
        assert_eq!(p.state, "open");
        let p: PrListParams =
            serde_json::from_str(r#"{"repo":"cli/cli","state":"merged"}"#).unwrap();
        assert_eq!(p.state, "merged");
    }

    #[test]
    fn pr_create_base_defaults_to_main() {
        let p: PrCreateParams =
            serde_json::from_str(r#"{"repo":"o/r","title":"t","body":"b"}"#).unwrap();
        assert_eq!(p.base, "main");
    }

    #[test]
    fn gist_create_defaults() {
        let p: GistCreateParams = serde_json::from_str(r#"{"files":["a.txt"]}"#).unwrap();
        assert!(!p.public);
        assert!(p.description.is_none());
    }

    #[test]
    fn numbers_must_be_integers() {
        assert!(serde_json::from_str::<PrNumberParams>(r#"{"pr":"abc","repo":"o/r"}"#).is_err());
        let p: IssueViewParams =
            serde_json::from_str(r#"{"issue":17,"repo":"o/r"}"#).unwrap();
        assert_eq!(p.issue, 17);
    }
}
