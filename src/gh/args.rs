/*!
Argument templates for every `gh` invocation the server makes.

Each function returns the argument vector (without the program itself).
Optional strings are only appended when present and non-empty.
*/

/// Fields requested when `pr view` falls back to structured output.
pub const PR_SUMMARY_FIELDS: &str = "title,state,author,url,number,additions,deletions";

/// Fields returned by the `repo://{owner}/{name}` resource.
pub const REPO_METADATA_FIELDS: &str = "name,description,owner,isPrivate,stargazerCount";

fn argv<const N: usize>(parts: [&str; N]) -> Vec<String> {
    parts.iter().map(|s| s.to_string()).collect()
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

/* ---- Repositories ---- */

pub fn repo_list() -> Vec<String> {
    argv(["repo", "list"])
}

pub fn repo_view(repo: &str) -> Vec<String> {
    argv(["repo", "view", repo])
}

pub fn repo_create(name: &str, description: Option<&str>, private: bool) -> Vec<String> {
    let mut args = argv(["repo", "create", name]);
    if let Some(d) = non_empty(description) {
        args.extend(argv(["--description", d]));
    }
    if private {
        args.push("--private".into());
    }
    args
}

/* ---- Issues ---- */

pub fn issue_list(repo: &str, state: &str) -> Vec<String> {
    argv(["issue", "list", "--repo", repo, "--state", state])
}

pub fn issue_view(issue: u64, repo: &str) -> Vec<String> {
    argv(["issue", "view", &issue.to_string(), "--repo", repo])
}

pub fn issue_create(repo: &str, title: &str, body: &str) -> Vec<String> {
    argv([
        "issue", "create", "--repo", repo, "--title", title, "--body", body,
    ])
}

/* ---- Pull requests ---- */

pub fn pr_list(repo: &str, state: &str) -> Vec<String> {
    argv(["pr", "list", "--repo", repo, "--state", state])
}

pub fn pr_view(pr: u64, repo: &str) -> Vec<String> {
    argv(["pr", "view", &pr.to_string(), "--repo", repo])
}

/// Structured-output variant of [`pr_view`] used for the fallback summary.
pub fn pr_view_json(pr: u64, repo: &str) -> Vec<String> {
    let mut args = pr_view(pr, repo);
    args.extend(argv(["--json", PR_SUMMARY_FIELDS]));
    args
}

pub fn pr_diff(pr: u64, repo: &str) -> Vec<String> {
    argv(["pr", "diff", &pr.to_string(), "--repo", repo])
}

pub fn pr_create(repo: &str, title: &str, body: &str, base: &str) -> Vec<String> {
    argv([
        "pr", "create", "--repo", repo, "--title", title, "--body", body, "--base", base,
    ])
}

/* ---- Gists ---- */

pub fn gist_list() -> Vec<String> {
    argv(["gist", "list"])
}

pub fn gist_create(files: &[String], description: Option<&str>, public: bool) -> Vec<String> {
    let mut args = argv(["gist", "create"]);
    if let Some(d) = non_empty(description) {
        args.extend(argv(["--desc", d]));
    }
    if !public {
        args.push("--private".into());
    }
    args.extend(files.iter().cloned());
    args
}

/* ---- Resources ---- */

pub fn repo_metadata(owner: &str, name: &str) -> Vec<String> {
    argv([
        "repo",
        "view",
        &format!("{owner}/{name}"),
        "--json",
        REPO_METADATA_FIELDS,
    ])
}

pub fn user_metadata(username: &str) -> Vec<String> {
    argv(["api", &format!("users/{username}")])
}
