//! Plain-text summary built from `gh pr view --json ...` output.
//!
//! Used only when the human-readable `pr view` fails. Returns `None` when the
//! output is not a JSON object so the caller can keep the first failure.

use serde_json::Value;

const MISSING: &str = "N/A";

/// Format the fixed seven-field summary, or `None` if `raw` is not a JSON object.
pub fn summarize(raw: &str) -> Option<String> {
    let value: Value = serde_json::from_str(raw).ok()?;
    let obj = value.as_object()?;

    let field = |key: &str| render(obj.get(key));
    let author = render(obj.get("author").and_then(|a| a.get("login")));

    Some(format!(
        "\nTitle: {}\nState: {}\nAuthor: {}\nNumber: {}\nURL: {}\nAdditions: {}\nDeletions: {}\n",
        field("title"),
        field("state"),
        author,
        field("number"),
        field("url"),
        field("additions"),
        field("deletions"),
    ))
}

fn render(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => MISSING.to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_payload() {
        let raw = r#"{
            "title": "Add dark mode",
            "state": "OPEN",
            "author": {"login": "octocat", "name": "Mona"},
            "url": "https://github.com/o/r/pull/12",
            "number": 12,
            "additions": 120,
            "deletions": 4
        }"#;
        let text = summarize(raw).unwrap();
        assert_eq!(
            text,
            "\nTitle: Add dark mode\nState: OPEN\nAuthor: octocat\nNumber: 12\n\
             URL: https://github.com/o/r/pull/12\nAdditions: 120\nDeletions: 4\n"
        );
    }

    #[test]
    fn missing_fields_render_placeholder() {
        let text = summarize(r#"{"title":"Only title","author":{}}"#).unwrap();
        assert!(text.contains("Title: Only title"));
        assert!(text.contains("Author: N/A"));
        assert!(text.contains("State: N/A"));
        assert!(text.contains("Deletions: N/A"));
    }

    #[test]
    fn null_author_renders_placeholder() {
        let text = summarize(r#"{"number":3,"author":null}"#).unwrap();
        assert!(text.contains("Author: N/A"));
        assert!(text.contains("Number: 3"));
    }

    #[test]
    fn non_json_is_rejected() {
        assert!(summarize("Error: no pull requests found").is_none());
    }

    #[test]
    fn non_object_json_is_rejected() {
        assert!(summarize("[1,2,3]").is_none());
    }
}
