//! Shell context, dispatch, and the errors commands report.

use std::{io, path::PathBuf, sync::Arc};

use chrono::NaiveDate;
use strsim::levenshtein;
use uuid::Uuid;

use crate::{
    config::{ConfigManager, StatementConfig},
    errors::StatementError,
    ledger::{AccountId, Statement},
    store::{LiveQuery, TemplateSource, TemplateStore},
    utils::persistence::load_templates,
};

use super::commands::{all_definitions, CommandDefinition, CommandRegistry};
use super::output;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliMode {
    Interactive,
    Script,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LoopControl {
    Continue,
    Exit,
}

pub type CommandResult = Result<(), CommandError>;

/// Counts shown after a load and in the interactive prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Overview {
    pub templates: usize,
    pub categories: Vec<String>,
}

pub struct ShellContext {
    pub mode: CliMode,
    pub registry: CommandRegistry,
    pub config: StatementConfig,
    pub store: Arc<TemplateStore>,
    pub overview: LiveQuery<Overview>,
    pub templates_path: Option<PathBuf>,
    pub last_command: Option<String>,
    pub running: bool,
}

impl ShellContext {
    pub fn new(mode: CliMode) -> Result<Self, CliError> {
        let config = ConfigManager::new()?.load()?;
        let mut context = Self::with_config(mode, config);
        if let Some(path) = context.config.templates_path.clone() {
            if let Err(err) = context.load_from(path) {
                output::warning(format!("Could not load configured templates: {err}"));
            }
        }
        Ok(context)
    }

    pub fn with_config(mode: CliMode, config: StatementConfig) -> Self {
        Self {
            mode,
            registry: CommandRegistry::new(all_definitions()),
            config,
            store: Arc::new(TemplateStore::new()),
            overview: LiveQuery::new("overview", |statement: &Statement<'_>| Overview {
                templates: statement.templates().len(),
                categories: statement.categories(None, ""),
            }),
            templates_path: None,
            last_command: None,
            running: true,
        }
    }

    /// Replaces the template set with the contents of `path`.
    pub fn load_from(&mut self, path: PathBuf) -> Result<usize, CommandError> {
        let templates = load_templates(&path)?;
        let count = templates.len();
        self.store.replace_all(templates);
        self.templates_path = Some(path);
        Ok(count)
    }

    pub fn overview(&self) -> Arc<Overview> {
        self.overview.get(self.store.as_ref())
    }

    /// Runs `f` against the current snapshot of the template set.
    pub fn with_statement<T>(&self, f: impl FnOnce(&Statement<'_>) -> T) -> T {
        let snapshot = self.store.snapshot();
        f(&Statement::new(&snapshot))
    }

    pub fn prompt(&self) -> String {
        let overview = self.overview();
        let source = self
            .templates_path
            .as_deref()
            .and_then(|path| path.file_name())
            .map(|name| format!("{} ", name.to_string_lossy()))
            .unwrap_or_default();
        format!("statement [{}{} templates]> ", source, overview.templates)
    }

    pub(crate) fn command(&self, name: &str) -> Option<&CommandDefinition> {
        self.registry.get(name)
    }

    pub(crate) fn dispatch(
        &mut self,
        command: &str,
        raw: &str,
        args: &[&str],
    ) -> Result<LoopControl, CommandError> {
        if let Some(definition) = self.registry.get(command) {
            let handler = definition.handler;
            match handler(self, args) {
                Ok(()) => Ok(LoopControl::Continue),
                Err(CommandError::ExitRequested) => Ok(LoopControl::Exit),
                Err(err) => Err(err),
            }
        } else {
            self.suggest_command(raw);
            Ok(LoopControl::Continue)
        }
    }

    pub(crate) fn suggest_command(&self, input: &str) {
        output::warning(format!(
            "Unknown command `{}`. Type `help` to see available commands.",
            input
        ));

        let needle = input.to_lowercase();
        let best = self
            .registry
            .names()
            .map(|key| (levenshtein(key, &needle), key))
            .min_by_key(|(distance, _)| *distance);

        if let Some((distance, best)) = best {
            if distance <= 3 {
                output::info(format!("Suggestion: `{}`?", best));
            }
        }
    }

    pub(crate) fn report_error(&self, err: CommandError) -> Result<(), CliError> {
        match err {
            CommandError::ExitRequested => Ok(()),
            CommandError::InvalidArguments(message) => {
                output::error(&message);
                output::hint("Use `help <command>` for usage details.");
                Ok(())
            }
            CommandError::NothingLoaded => {
                output::error(CommandError::NothingLoaded);
                output::hint("Try `load templates.json` first.");
                Ok(())
            }
            other => {
                output::error(other);
                Ok(())
            }
        }
    }

    pub(crate) fn require_templates(&self) -> CommandResult {
        if self.store.is_empty() {
            Err(CommandError::NothingLoaded)
        } else {
            Ok(())
        }
    }

    pub(crate) fn parse_date(&self, input: &str) -> Result<NaiveDate, CommandError> {
        NaiveDate::parse_from_str(input, &self.config.date_format).map_err(|_| {
            CommandError::InvalidArguments(format!(
                "invalid date `{}` (expected format {})",
                input, self.config.date_format
            ))
        })
    }

    pub(crate) fn format_date(&self, date: NaiveDate) -> String {
        date.format(&self.config.date_format).to_string()
    }
}

pub(crate) fn parse_account(input: &str) -> Result<AccountId, CommandError> {
    Uuid::parse_str(input)
        .map_err(|_| CommandError::InvalidArguments(format!("invalid account id `{}`", input)))
}

pub(crate) fn short_id(id: Uuid) -> String {
    let mut short = id.simple().to_string();
    short.truncate(8);
    short
}

#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error("No templates loaded.")]
    NothingLoaded,
    #[error("{0}")]
    InvalidArguments(String),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Core(#[from] StatementError),
    #[error("exit requested")]
    ExitRequested,
}

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] StatementError),
    #[error("Invalid input: {0}")]
    Input(String),
    #[error("Command failed: {0}")]
    Command(String),
}

impl From<CommandError> for CliError {
    fn from(err: CommandError) -> Self {
        CliError::Command(err.to_string())
    }
}

impl From<io::Error> for CliError {
    fn from(err: io::Error) -> Self {
        CliError::Command(err.to_string())
    }
}

impl From<rustyline::error::ReadlineError> for CliError {
    fn from(err: rustyline::error::ReadlineError) -> Self {
        CliError::Input(err.to_string())
    }
}

#[cfg(test)]
pub(crate) fn script_context() -> ShellContext {
    ShellContext::with_config(CliMode::Script, StatementConfig::default())
}
