//! Utilities: logging setup (verbosity flags -> `tracing` filter).
//!
//! Key items:
//!   derive_level / init_logging
//!
//! Logs always go to stderr: in `serve` mode stdout is the MCP transport.

/// Logging helpers.
pub mod logging {
    use tracing_subscriber::EnvFilter;

    #[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd)]
    pub enum LogLevel {
        Error = 0,
        Info = 1,
        Debug = 2,
        Trace = 3,
    }

    impl LogLevel {
        pub fn as_str(&self) -> &'static str {
            match self {
                LogLevel::Error => "error",
                LogLevel::Info => "info",
                LogLevel::Debug => "debug",
                LogLevel::Trace => "trace",
            }
        }
    }

    pub fn derive_level(verbose: u8, quiet: bool) -> LogLevel {
        if quiet {
            return LogLevel::Error;
        }
        match verbose {
            0 => LogLevel::Info,
            1 => LogLevel::Debug,
            _ => LogLevel::Trace,
        }
    }

    /// Filter directives for `level` when `RUST_LOG` is not set.
    /// rmcp stays at `warn` unless tracing everything.
    pub fn default_directives(level: LogLevel) -> String {
        let rmcp = if level == LogLevel::Trace {
            "trace"
        } else {
            "warn"
        };
        format!("gh_mcp={},rmcp={rmcp}", level.as_str())
    }

    /// Install the global stderr subscriber. `RUST_LOG` overrides the flags.
    /// A second call is a no-op.
    pub fn init_logging(level: LogLevel) {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(default_directives(level)));

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .try_init();
    }
}

pub use logging::{derive_level, init_logging};

#[cfg(test)]
mod tests {
    use super::logging::*;

    #[test]
    fn quiet_wins_over_verbose() {
        assert_eq!(derive_level(2, true), LogLevel::Error);
    }

    #[test]
    fn verbosity_steps() {
        assert_eq!(derive_level(0, false), LogLevel::Info);
        assert_eq!(derive_level(1, false), LogLevel::Debug);
        assert_eq!(derive_level(5, false), LogLevel::Trace);
    }

    #[test]
    fn directives_keep_rmcp_quiet_below_trace() {
        assert_eq!(default_directives(LogLevel::Debug), "gh_mcp=debug,rmcp=warn");
        assert_eq!(default_directives(LogLevel::Trace), "gh_mcp=trace,rmcp=trace");
        assert_eq!(default_directives(LogLevel::Error), "gh_mcp=error,rmcp=warn");
    }
}
