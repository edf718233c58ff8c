use crate::cli::commands::system::EXIT_MESSAGE;
use crate::cli::core::{CliError, CliMode, LoopControl};
use crate::cli::menus::{render_menu, CHOICE_PROMPT};
use crate::cli::output::{self, OutputPreferences};
use crate::cli::shell_context::ShellContext;
use crate::config::{Config, ConfigManager};

pub const SCRIPT_ENV: &str = "EXPENSE_TRACKER_CLI_SCRIPT";

pub fn run_cli() -> Result<(), CliError> {
    let mode = if std::env::var_os(SCRIPT_ENV).is_some() {
        CliMode::Script
    } else {
        CliMode::Interactive
    };
    output::set_preferences(OutputPreferences {
        plain_mode: mode == CliMode::Script || std::env::var_os("NO_COLOR").is_some(),
    });

    let config = startup_config(&ConfigManager::new()).with_env_overrides();
    tracing::info!(data_file = %config.data_file.display(), ?mode, "starting expense tracker");

    let mut context = ShellContext::new(mode, config)?;
    run_loop(&mut context)
}

/// Loads the settings, falling back to defaults when the config file cannot be
/// read or written. The expense file does not live in the config directory.
fn startup_config(manager: &ConfigManager) -> Config {
    match manager.load_or_init() {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!(path = %manager.path().display(), error = %err, "using default configuration");
            output::warning(format!("{err}. Using default settings."));
            Config::default()
        }
    }
}

/// Menu loop: show the menu, read one choice, run it, repeat until exit or end of input.
pub fn run_loop(context: &mut ShellContext) -> Result<(), CliError> {
    if let Err(err) = context.store.initialize() {
        context.report_error(err.into());
    }

    while context.running {
        output::info(render_menu(&context.registry));
        let choice = match context.prompter.ask_choice(CHOICE_PROMPT) {
            Ok(choice) => choice,
            Err(CliError::EndOfInput) => {
                output::info(EXIT_MESSAGE);
                break;
            }
            Err(CliError::Cancelled) => {
                if context.confirm_exit()? {
                    output::info(EXIT_MESSAGE);
                    break;
                }
                continue;
            }
            Err(err) => return Err(err),
        };

        let control = match context.dispatch(&choice) {
            Ok(control) => control,
            Err(CliError::EndOfInput) => {
                output::info(EXIT_MESSAGE);
                LoopControl::Exit
            }
            Err(err) => context.report_error(err),
        };
        if control == LoopControl::Exit {
            context.running = false;
        }
    }

    Ok(())
}
