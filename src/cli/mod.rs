pub mod core;
pub mod interaction;
pub mod output;
mod shell;
mod wizard_runner;

pub use self::core::{CliError, CliMode, CommandError, LoopControl, ShellContext};
pub use interaction::{Interaction, ScriptedInteraction, TerminalInteraction};
pub use shell::{run_cli, run_script, SCRIPT_ENV};
