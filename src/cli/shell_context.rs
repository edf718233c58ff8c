use std::io::{self, BufReader};

use dialoguer::{theme::ColorfulTheme, Confirm};

use crate::{
    cli::{
        commands::NO_EXPENSES,
        core::{CliError, CliMode, CommandResult, LoopControl},
        io::{EditorPrompter, LinePrompter, Prompter},
        menus::build_registry,
        output,
        registry::CommandRegistry,
        ui::{ChartRenderer, ConsoleChartRenderer},
    },
    config::Config,
    core::{
        errors::ExpenseError,
        time::{Clock, SystemClock},
    },
    domain::ExpenseRecord,
    storage::{CsvStore, ExpenseStore},
};

/// Everything one shell session needs. Records are never cached here: each
/// operation re-reads the store.
pub struct ShellContext {
    pub mode: CliMode,
    pub registry: CommandRegistry,
    pub config: Config,
    pub store: Box<dyn ExpenseStore>,
    pub prompter: Box<dyn Prompter>,
    pub renderer: Box<dyn ChartRenderer>,
    pub clock: Box<dyn Clock>,
    pub running: bool,
}

impl ShellContext {
    /// Builds a session wired to stdin/stdout and the configured data file.
    pub fn new(mode: CliMode, config: Config) -> Result<Self, CliError> {
        let registry = build_registry();
        let prompter: Box<dyn Prompter> = match mode {
            CliMode::Interactive => Box::new(EditorPrompter::new(registry.names())?),
            CliMode::Script => Box::new(LinePrompter::new(
                BufReader::new(io::stdin()),
                io::stdout(),
            )),
        };
        let renderer = ConsoleChartRenderer::new(io::stdout(), config.currency_label.clone())
            .with_width(config.chart_width)
            .plain(output::current_preferences().plain_mode);
        let store = CsvStore::new(config.data_file.clone());

        Ok(Self {
            mode,
            registry,
            store: Box::new(store),
            prompter,
            renderer: Box::new(renderer),
            clock: Box::new(SystemClock),
            config,
            running: true,
        })
    }

    /// Builds a script-mode session from explicit collaborators.
    pub fn with_parts(
        config: Config,
        store: Box<dyn ExpenseStore>,
        prompter: Box<dyn Prompter>,
        renderer: Box<dyn ChartRenderer>,
        clock: Box<dyn Clock>,
    ) -> Self {
        Self {
            mode: CliMode::Script,
            registry: build_registry(),
            config,
            store,
            prompter,
            renderer,
            clock,
            running: true,
        }
    }

    /// Reads every valid record, warning once per corrupt row.
    pub fn load_records(&self) -> Result<Vec<ExpenseRecord>, CliError> {
        let snapshot = self.store.read_all()?;
        for row in &snapshot.corrupt {
            output::warning(format!("Skipping {}", row.to_error()));
        }
        Ok(snapshot.records)
    }

    pub fn money(&self, amount: f64) -> String {
        self.config.format_amount(amount)
    }

    /// Runs the handler registered for `token`, or reports an invalid choice.
    pub fn dispatch(&mut self, token: &str) -> CommandResult {
        let resolved = self
            .registry
            .resolve(token)
            .map(|entry| (entry.name, entry.handler));
        match resolved {
            Some((name, handler)) => {
                tracing::debug!(command = name, "dispatching menu choice");
                handler(self)
            }
            None => {
                output::warning("Invalid choice. Please try again.");
                if let Some(name) = self.registry.suggest(token) {
                    output::info(format!("Did you mean `{name}`?"));
                }
                Ok(LoopControl::Continue)
            }
        }
    }

    /// Prints a failed operation and decides whether the loop keeps going.
    pub fn report_error(&mut self, err: CliError) -> LoopControl {
        match err {
            CliError::EndOfInput => return LoopControl::Exit,
            CliError::Core(ExpenseError::StoreEmpty) => output::info(NO_EXPENSES),
            CliError::Cancelled => output::warning("Operation cancelled."),
            CliError::Core(err @ ExpenseError::InvalidInput(_)) => {
                output::error(format!("{err}. Please try again."));
            }
            other => {
                tracing::error!(error = %other, "operation failed");
                output::error(other);
            }
        }
        LoopControl::Continue
    }

    pub fn confirm_exit(&self) -> Result<bool, CliError> {
        if self.mode == CliMode::Script {
            return Ok(true);
        }
        Confirm::with_theme(&ColorfulTheme::default())
            .with_prompt("Exit Expense Tracker?")
            .default(false)
            .interact()
            .map_err(CliError::from)
    }
}
