//! Shell context, command dispatch and the read-only commands.

use std::{io, sync::Arc};

use rustyline::error::ReadlineError;
use strsim::levenshtein;
use thiserror::Error;
use tokio::runtime::{Builder, Runtime};

use crate::api::{CustomerApi, HttpCustomerClient};
use crate::config::{Config, ConfigManager};
use crate::errors::{ApiError, ConfigError, WizardError};
use crate::notify::Toaster;
use crate::screens::{load_list, DetailScreen, DetailState, ListState, ViewEpoch};
use crate::wizard::{SubmissionReceipt, Wizard};

use super::interaction::Interaction;
use super::output;
use super::wizard_runner;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliMode {
    Interactive,
    Script,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopControl {
    Continue,
    Exit,
}

/// A failed command. Reported to the user; the shell keeps running.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("{0}")]
    InvalidArguments(String),
    #[error("Input ended before the prompt was answered")]
    InputClosed,
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Dialoguer(#[from] dialoguer::Error),
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error(transparent)]
    Wizard(#[from] WizardError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("exit requested")]
    ExitRequested,
}

/// Failures that stop the shell.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Readline(#[from] ReadlineError),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Command(#[from] CommandError),
}

pub type CommandResult = Result<(), CommandError>;

/// Name and one-line description of every shell command.
pub const COMMANDS: &[(&str, &str)] = &[
    ("list", "List all customers"),
    ("show", "Show one customer: show <id>"),
    ("create", "Add a customer with the step-by-step wizard"),
    ("config", "Show settings, or change one: config set <key> <value>"),
    ("help", "Show available commands"),
    ("exit", "Leave the shell"),
    ("quit", "Leave the shell"),
];

pub struct ShellContext {
    pub(crate) mode: CliMode,
    pub(crate) config: Config,
    config_manager: Option<ConfigManager>,
    api: Option<Arc<dyn CustomerApi>>,
    pub(crate) runtime: Runtime,
    pub(crate) wizard: Wizard,
    pub(crate) toaster: Toaster,
    pub(crate) epoch: ViewEpoch,
    pub(crate) running: bool,
}

impl ShellContext {
    /// Loads configuration from disk and connects to the configured backend.
    pub fn new(mode: CliMode) -> Result<Self, CliError> {
        let manager = ConfigManager::new()?;
        let config = manager.load()?.with_env_overrides();
        let mut context = Self::build(mode, config, None)?;
        context.config_manager = Some(manager);
        if let Err(err) = context.api() {
            output::warning(err);
            output::hint("Fix it with `config set api_base_url <url>`.");
        }
        Ok(context)
    }

    /// Context with an injected backend and no persisted configuration.
    pub fn with_api(
        mode: CliMode,
        config: Config,
        api: Arc<dyn CustomerApi>,
    ) -> Result<Self, CliError> {
        Self::build(mode, config, Some(api))
    }

    fn build(
        mode: CliMode,
        config: Config,
        api: Option<Arc<dyn CustomerApi>>,
    ) -> Result<Self, CliError> {
        let runtime = Builder::new_current_thread().enable_all().build()?;
        Ok(Self {
            mode,
            toaster: Toaster::new(config.notification_ttl()),
            config,
            config_manager: None,
            api,
            runtime,
            wizard: Wizard::new(),
            epoch: ViewEpoch::new(),
            running: true,
        })
    }

    pub fn mode(&self) -> CliMode {
        self.mode
    }

    pub fn wizard(&self) -> &Wizard {
        &self.wizard
    }

    pub fn prompt(&self) -> String {
        "customer-desk> ".to_string()
    }

    pub fn command_names(&self) -> Vec<&'static str> {
        COMMANDS.iter().map(|(name, _)| *name).collect()
    }

    pub(crate) fn api(&mut self) -> Result<Arc<dyn CustomerApi>, CommandError> {
        if let Some(api) = &self.api {
            return Ok(Arc::clone(api));
        }
        let client: Arc<dyn CustomerApi> = Arc::new(HttpCustomerClient::from_config(&self.config)?);
        self.api = Some(Arc::clone(&client));
        Ok(client)
    }

    /// Prints notifications raised since the last call.
    pub(crate) fn flush_notifications(&self) {
        for notification in self.toaster.take_unseen() {
            output::notification(&notification);
        }
    }

    pub fn dispatch(
        &mut self,
        command: &str,
        raw: &str,
        args: &[&str],
        io: &mut dyn Interaction,
    ) -> Result<LoopControl, CommandError> {
        let outcome = match command {
            "list" => self.list_customers(io),
            "show" => self.cmd_show(args),
            "create" => wizard_runner::run(self, io),
            "config" => self.cmd_config(args),
            "help" => self.cmd_help(args),
            "exit" | "quit" => Err(CommandError::ExitRequested),
            _ => {
                self.suggest_command(raw);
                Ok(())
            }
        };
        self.flush_notifications();
        match outcome {
            Ok(()) => Ok(LoopControl::Continue),
            Err(CommandError::ExitRequested) => Ok(LoopControl::Exit),
            Err(err) => Err(err),
        }
    }

    pub(crate) fn suggest_command(&self, input: &str) {
        output::warning(format!(
            "Unknown command `{}`. Type `help` to see available commands.",
            input
        ));

        let needle = input.to_lowercase();
        let best = COMMANDS
            .iter()
            .map(|(name, _)| (levenshtein(name, &needle), *name))
            .min_by_key(|(distance, _)| *distance);

        if let Some((distance, name)) = best {
            if distance <= 3 {
                output::info(format!("Suggestion: `{}`?", name));
            }
        }
    }

    pub(crate) fn report_error(&self, err: CommandError) {
        match err {
            CommandError::ExitRequested => {}
            CommandError::InvalidArguments(message) => {
                output::error(message);
                output::hint("Use `help` for usage details.");
            }
            other => output::error(other),
        }
    }

    fn cmd_help(&self, args: &[&str]) -> CommandResult {
        if let Some(topic) = args.first() {
            return match COMMANDS.iter().find(|(name, _)| name == topic) {
                Some((name, description)) => {
                    output::plain(format!("{name}: {description}"));
                    if *name == "config" {
                        output::plain(
                            "  keys: api_base_url, notification_ttl_secs, request_timeout_secs",
                        );
                    }
                    Ok(())
                }
                None => Err(CommandError::InvalidArguments(format!(
                    "No help available for `{topic}`"
                ))),
            };
        }
        output::section("Commands");
        for (name, description) in COMMANDS {
            output::plain(format!("  {name:<8}{description}"));
        }
        Ok(())
    }

    pub(crate) fn list_customers(&mut self, io: &mut dyn Interaction) -> CommandResult {
        let api = self.api()?;
        self.epoch.bump();
        output::section("Customer List");
        if let Some(message) = ListState::Loading.message() {
            output::info(message);
        }
        let Some(state) = self.runtime.block_on(load_list(api.as_ref(), &self.epoch)) else {
            return Ok(());
        };

        match &state {
            ListState::Loaded(_) => {
                let cards = state.cards();
                for card in &cards {
                    let [name, id, dob] = card.lines();
                    output::blank_line();
                    output::plain(name);
                    output::plain(format!("  {id}"));
                    output::plain(format!("  {dob}"));
                }
                if self.mode == CliMode::Interactive {
                    let mut options: Vec<String> =
                        cards.iter().map(|card| card.name.clone()).collect();
                    options.push("Back".to_string());
                    let back = options.len() - 1;
                    let picked = io.select("Open a customer", &options, Some(back))?;
                    if let Some(id) = picked
                        .filter(|index| *index != back)
                        .and_then(|index| cards[index].id.clone())
                    {
                        self.show_customer(&id)?;
                    }
                }
            }
            ListState::Failed(message) => output::error(message),
            ListState::Empty => {
                output::info(state.message().unwrap_or_default());
                output::hint("Run `create` to add your first customer.");
            }
            ListState::Loading => {}
        }
        Ok(())
    }

    fn cmd_show(&mut self, args: &[&str]) -> CommandResult {
        match args {
            [id] => self.show_customer(id),
            _ => Err(CommandError::InvalidArguments("usage: show <id>".into())),
        }
    }

    pub(crate) fn show_customer(&mut self, id: &str) -> CommandResult {
        let api = self.api()?;
        self.epoch.bump();
        if let Some(message) = DetailScreen::loading().state().message() {
            output::info(message);
        }
        let Some(screen) = self
            .runtime
            .block_on(DetailScreen::load(api.as_ref(), id, &self.epoch))
        else {
            return Ok(());
        };
        match screen.state() {
            DetailState::Failed(message) => output::error(message),
            DetailState::Loaded(_) => {
                if let Some(sheet) = screen.sheet() {
                    output::blank_line();
                    output::plain(sheet.render());
                }
            }
            DetailState::Loading => {}
        }
        Ok(())
    }

    fn cmd_config(&mut self, args: &[&str]) -> CommandResult {
        match args {
            [] | ["show"] => {
                self.show_config();
                Ok(())
            }
            ["set", key, value @ ..] => {
                let value = value.join(" ");
                self.set_config_value(key, &value)
            }
            _ => Err(CommandError::InvalidArguments(
                "usage: config | config set <key> <value>".into(),
            )),
        }
    }

    fn show_config(&self) {
        output::section("Configuration");
        let timeout = self
            .config
            .request_timeout_secs
            .map(|secs| secs.to_string())
            .unwrap_or_else(|| "none".into());
        output::plain(format!("  api_base_url           {}", self.config.api_base_url));
        output::plain(format!(
            "  notification_ttl_secs  {}",
            self.config.notification_ttl_secs
        ));
        output::plain(format!("  request_timeout_secs   {timeout}"));
        if let Some(manager) = &self.config_manager {
            output::hint(format!("stored at {}", manager.path().display()));
        }
    }

    fn set_config_value(&mut self, key: &str, value: &str) -> CommandResult {
        let mut updated = self.config.clone();
        updated.set_value(key, value)?;
        if let Some(manager) = &self.config_manager {
            manager.save(&updated)?;
        }
        if updated.api_base_url != self.config.api_base_url
            || updated.request_timeout_secs != self.config.request_timeout_secs
        {
            self.api = None;
        }
        if updated.notification_ttl_secs != self.config.notification_ttl_secs {
            self.toaster = Toaster::new(updated.notification_ttl());
        }
        self.config = updated;
        tracing::info!(key, "configuration updated");
        output::success(format!("Updated `{key}`."));
        Ok(())
    }

    /// Submits the wizard's summary. A rejected create leaves the wizard on
    /// the summary and yields `Ok(None)`.
    pub(crate) fn submit_wizard(&mut self) -> Result<Option<SubmissionReceipt>, CommandError> {
        let api = self.api()?;
        let outcome = self
            .runtime
            .block_on(self.wizard.submit(api.as_ref(), &self.toaster));
        self.flush_notifications();
        match outcome {
            Ok(receipt) => Ok(Some(receipt)),
            Err(WizardError::Submission(_)) => Ok(None),
            Err(other) => Err(other.into()),
        }
    }
}
