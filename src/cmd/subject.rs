/*!
Subject enum for the `list` subcommand.

Variants:
  tools      (the twelve gh-backed tools)
  resources  (resource URI templates)
*/

use std::fmt;

/// What `list` enumerates.
#[derive(clap::ValueEnum, Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Subject {
    /// Tools exposed by the server
    #[value(alias = "tool")]
    Tools,
    /// Resource URI templates
    #[value(alias = "resource")]
    Resources,
}

impl fmt::Display for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Subject::Tools => "tools",
            Subject::Resources => "resources",
        };
        f.write_str(s)
    }
}
