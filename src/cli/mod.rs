pub mod commands;
pub mod core;
pub mod forms;
pub mod io;
pub mod menus;
pub mod output;
pub mod registry;
mod shell;
pub mod shell_context;
pub mod ui;

pub use shell::{run_cli, run_loop, SCRIPT_ENV};
pub use shell_context::ShellContext;
