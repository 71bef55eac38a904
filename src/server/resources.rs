/*!
Resource URI templates and parsing.

  repo://{owner}/{name}  -> repository metadata (JSON)
  user://{username}      -> user metadata (JSON)
*/

use serde_json::json;
use std::fmt;
use thiserror::Error;
use url::Url;

use crate::gh::args;

pub const REPO_TEMPLATE: &str = "repo://{owner}/{name}";
pub const USER_TEMPLATE: &str = "user://{username}";
pub const MIME_JSON: &str = "application/json";

/// A resolved resource address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceRef {
    Repo { owner: String, name: String },
    User { username: String },
}

impl ResourceRef {
    /// `gh` arguments that produce this resource's content.
    pub fn gh_args(&self) -> Vec<String> {
        match self {
            ResourceRef::Repo { owner, name } => args::repo_metadata(owner, name),
            ResourceRef::User { username } => args::user_metadata(username),
        }
    }
}

impl fmt::Display for ResourceRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceRef::Repo { owner, name } => write!(f, "repo://{owner}/{name}"),
            ResourceRef::User { username } => write!(f, "user://{username}"),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ResourceUriError {
    #[error("invalid resource URI '{0}'")]
    Malformed(String),
    #[error("unknown resource scheme '{0}' (expected repo:// or user://)")]
    UnknownScheme(String),
    #[error("resource URI '{uri}' does not match {template}")]
    Shape { uri: String, template: &'static str },
}

/// Parse a resource URI into a `ResourceRef`.
pub fn parse_resource_uri(raw: &str) -> Result<ResourceRef, ResourceUriError> {
    let uri = raw.trim();
    let url = Url::parse(uri).map_err(|_| ResourceUriError::Malformed(raw.to_string()))?;

    let host = url.host_str().unwrap_or_default();
    let segments: Vec<&str> = url
        .path_segments()
        .map(|s| s.filter(|seg| !seg.is_empty()).collect())
        .unwrap_or_default();

    let shape_error = |template| ResourceUriError::Shape {
        uri: raw.to_string(),
        template,
    };

    match url.scheme() {
        "repo" => match segments.as_slice() {
            [name] if !host.is_empty() => Ok(ResourceRef::Repo {
                owner: host.to_string(),
                name: name.to_string(),
            }),
            _ => Err(shape_error(REPO_TEMPLATE)),
        },
        "user" => {
            if host.is_empty() || !segments.is_empty() {
                return Err(shape_error(USER_TEMPLATE));
            }
            Ok(ResourceRef::User {
                username: host.to_string(),
            })
        }
        other => Err(ResourceUriError::UnknownScheme(other.to_string())),
    }
}

/// Wire description of the two resource templates.
pub fn template_descriptors() -> Vec<serde_json::Value> {
    vec![
        json!({
            "uriTemplate": REPO_TEMPLATE,
            "name": "repository",
            "description": "Repository metadata (name, description, owner, isPrivate, stargazerCount) as JSON",
            "mimeType": MIME_JSON,
        }),
        json!({
            "uriTemplate": USER_TEMPLATE,
            "name": "user",
            "description": "GitHub user profile from the REST API as JSON",
            "mimeType": MIME_JSON,
        }),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_repo_uri() {
        let r = parse_resource_uri("repo://octocat/hello-world").unwrap();
        assert_eq!(
            r,
            ResourceRef::Repo {
                owner: "octocat".into(),
                name: "hello-world".into()
            }
        );
        assert_eq!(r.to_string(), "repo://octocat/hello-world");
    }

    #[test]
    fn parse_repo_uri_with_dots() {
        let r = parse_resource_uri("repo://rust-lang/rust.vim").unwrap();
        assert_eq!(
            r.gh_args().join(" "),
            "repo view rust-lang/rust.vim --json name,description,owner,isPrivate,stargazerCount"
        );
    }

    #[test]
    fn parse_user_uri() {
        let r = parse_resource_uri("user://octocat").unwrap();
        assert_eq!(
            r,
            ResourceRef::User {
                username: "octocat".into()
            }
        );
        assert_eq!(r.gh_args(), vec!["api", "users/octocat"]);
    }

    #[test]
    fn repo_uri_requires_two_parts() {
        assert!(matches!(
            parse_resource_uri("repo://octocat"),
            Err(ResourceUriError::Shape { .. })
        ));
        assert!(matches!(
            parse_resource_uri("repo://octocat/a/b"),
            Err(ResourceUriError::Shape { .. })
        ));
    }

    #[test]
    fn user_uri_rejects_path() {
        assert!(matches!(
            parse_resource_uri("user://octocat/repos"),
            Err(ResourceUriError::Shape { .. })
        ));
    }

    #[test]
    fn unknown_scheme_rejected() {
        assert_eq!(
            parse_resource_uri("gist://abc"),
            Err(ResourceUriError::UnknownScheme("gist".into()))
        );
    }

    #[test]
    fn garbage_rejected() {
        assert!(matches!(
            parse_resource_uri("not a uri"),
            Err(ResourceUriError::Malformed(_))
        ));
    }

    #[test]
    fn descriptors_cover_both_templates() {
        let d = template_descriptors();
        assert_eq!(d.len(), 2);
        assert_eq!(d[0]["uriTemplate"], REPO_TEMPLATE);
        assert_eq!(d[1]["uriTemplate"], USER_TEMPLATE);
    }
}
