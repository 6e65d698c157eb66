pub mod commands;
pub mod core;
pub mod help;
pub mod io;
pub mod output;
pub mod registry;
mod shell;
pub mod shell_context;
pub mod table;

pub use shell::{run_cli, SCRIPT_ENV_VAR};
pub use shell_context::{CliMode, ShellContext};

#[cfg(test)]
pub(crate) use shell::handle_line;
