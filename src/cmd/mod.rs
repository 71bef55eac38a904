/*!
Command dispatcher module.

Layout:
  src/cmd/
    mod.rs      (this file)
    serve.rs    (execute_serve: MCP over stdio, the default)
    list.rs     (ListArgs + execute_list)
    exec.rs     (ExecArgs + execute_exec)
    read.rs     (ReadArgs + execute_read)
    subject.rs  (Subject enum)
    shared.rs   (in-process session, schema + parameter helpers)
    format.rs   (box / table / color helpers for human output)

Conventions:
  - Each subcommand module exposes exactly one public `execute_*` function
    that returns `anyhow::Result<()>`.
  - Argument structs derive `clap::Args` and are kept minimal.
  - Local subcommands talk to the server through `shared::connect`, never
    by calling tool methods directly.
*/

pub mod exec;
pub mod format;
pub mod list;
pub mod read;
pub mod serve;
pub mod shared;
pub mod subject;

pub use exec::{ExecArgs, execute_exec};
pub use list::{ListArgs, execute_list};
pub use read::{ReadArgs, execute_read};
pub use serve::execute_serve;
