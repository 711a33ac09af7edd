//! CLI command implementations.
//!
//! Each submodule maps one command group onto the console's screen
//! services. Commands load what they need, act, print the result and exit;
//! only the session marker outlives a run.

pub mod auth;
pub mod products;
pub mod reviews;
pub mod taxonomy;
pub mod users;

use std::io::{BufRead, Write};

use thiserror::Error;

use catalog_admin::confirm::{AssumeYes, Confirm};
use catalog_admin::list::{LoadOutcome, MutationOutcome};
use catalog_admin::{Console, ConsoleConfig, ConsoleError};

use crate::output;

/// File name of the default session marker file in the temp directory.
const SESSION_FILE_NAME: &str = "catalog-admin-session.json";

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CliError {
    /// The console refused or failed the action.
    #[error(transparent)]
    Console(#[from] ConsoleError),

    /// Reading a local file or the terminal failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A product file is not valid YAML for the product form.
    #[error("Invalid product file: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// The command's input matched nothing it could act on.
    #[error("{0}")]
    Usage(String),
}

impl CliError {
    /// Text shown to the operator.
    pub fn user_message(&self) -> String {
        match self {
            Self::Console(e) => e.user_message(),
            other => other.to_string(),
        }
    }
}

/// Keep the session marker between runs unless configured otherwise.
pub fn with_default_session_file(mut config: ConsoleConfig) -> ConsoleConfig {
    if config.session_file.is_none() {
        config.session_file = Some(std::env::temp_dir().join(SESSION_FILE_NAME));
    }
    config
}

/// What every command receives.
pub struct Context {
    pub console: Console,
    confirm: Box<dyn Confirm>,
}

impl Context {
    /// Build the console and the confirmation source.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client cannot be built.
    pub fn new(config: ConsoleConfig, assume_yes: bool) -> Result<Self, CliError> {
        let console = Console::new(config)?;
        let confirm: Box<dyn Confirm> = if assume_yes {
            Box::new(AssumeYes)
        } else {
            Box::new(StdinConfirm)
        };
        Ok(Self { console, confirm })
    }

    pub fn confirm(&self) -> &dyn Confirm {
        self.confirm.as_ref()
    }

    /// Fail early with the login hint when no session marker is stored.
    ///
    /// # Errors
    ///
    /// Returns `Unauthenticated` when the gate would redirect to login.
    pub fn require_session(&self, path: &str) -> Result<(), CliError> {
        self.console.enter(path)?;
        Ok(())
    }
}

/// Asks on the terminal; anything but `y`/`yes` declines.
struct StdinConfirm;

impl Confirm for StdinConfirm {
    #[allow(clippy::print_stderr)]
    fn confirm(&self, prompt: &str) -> bool {
        eprint!("{prompt} [y/N] ");
        let _ = std::io::stderr().flush();
        read_line().is_ok_and(|answer| is_yes(&answer))
    }
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

/// Read one line from stdin without its line ending.
///
/// # Errors
///
/// Returns error if stdin cannot be read.
pub fn read_line() -> Result<String, std::io::Error> {
    let mut line = String::new();
    std::io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

/// Call `load_more` until `pages` pages are in or the feed runs dry.
///
/// # Errors
///
/// Returns the first page error.
pub async fn load_pages<F, Fut>(pages: u32, mut load_more: F) -> Result<(), CliError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<LoadOutcome, ConsoleError>>,
{
    for _ in 1..pages {
        match load_more().await? {
            LoadOutcome::Loaded { added } if added > 0 => {}
            _ => break,
        }
    }
    Ok(())
}

/// Report a mutation that the operator may have declined.
pub fn report_mutation(outcome: MutationOutcome, done: &str) {
    match outcome {
        MutationOutcome::Applied => output::success(done),
        MutationOutcome::Cancelled => output::note("Cancelled."),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_yes() {
        assert!(is_yes("y"));
        assert!(is_yes(" YES \n"));
        assert!(!is_yes(""));
        assert!(!is_yes("no"));
        assert!(!is_yes("yep"));
    }

    #[test]
    fn test_default_session_file() {
        let config = with_default_session_file(ConsoleConfig::default());
        assert!(
            config
                .session_file
                .as_ref()
                .is_some_and(|p| p.ends_with(SESSION_FILE_NAME))
        );

        let custom = ConsoleConfig {
            session_file: Some("/tmp/custom.json".into()),
            ..ConsoleConfig::default()
        };
        let config = with_default_session_file(custom);
        assert_eq!(
            config.session_file.as_deref(),
            Some(std::path::Path::new("/tmp/custom.json"))
        );
    }

    #[tokio::test]
    async fn test_load_pages_stops_when_dry() {
        let mut calls = 0;
        load_pages(5, || {
            calls += 1;
            let outcome = if calls < 2 {
                LoadOutcome::Loaded { added: 3 }
            } else {
                LoadOutcome::Exhausted
            };
            async move { Ok(outcome) }
        })
        .await
        .ok();
        assert_eq!(calls, 2);
    }
}
