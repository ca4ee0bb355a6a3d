//! Subcommand handlers and the context they share.

pub mod chat;
pub mod completion;
pub mod config;
pub mod documents;
pub mod session;

use std::io::{self, BufRead, Write};

use anyhow::Result;
use shared::config::Config;

use crate::{
    client::{ApiClient, ApiError},
    token::TokenStore,
};

/// Resolved configuration plus the token store, shared by every command.
#[derive(Debug)]
pub struct AppContext {
    /// Resolved configuration.
    pub config: Config,
    /// Token file named by the configuration.
    pub tokens: TokenStore,
}

impl AppContext {
    /// Opens the token store configured in `config`.
    pub fn new(config: Config) -> Self {
        let tokens = TokenStore::new(config.session.token_path());
        Self { config, tokens }
    }

    /// Client carrying the stored token, if any.
    pub fn client(&self) -> Result<ApiClient> {
        let token = self.tokens.load()?;
        Ok(ApiClient::new(&self.config.api, token)?)
    }

    /// Client for commands that need a signed-in user.
    pub fn authenticated_client(&self) -> Result<ApiClient> {
        let client = self.client()?;
        if !client.has_token() {
            return Err(ApiError::Unauthenticated.into());
        }
        Ok(client)
    }

    /// Client without credentials, for login and signup.
    pub fn anonymous_client(&self) -> Result<ApiClient> {
        Ok(ApiClient::new(&self.config.api, None)?)
    }
}

/// Asks `question` on stderr and reads the answer from stdin.
///
/// `assume_yes` (the `--yes` flag) skips the prompt.
pub fn confirm(question: &str, assume_yes: bool) -> Result<bool> {
    if assume_yes {
        return Ok(true);
    }
    confirm_with(question, &mut io::stdin().lock(), &mut io::stderr())
}

/// Only `y` or `yes` confirms; anything else, including end of input, declines.
fn confirm_with(question: &str, input: &mut impl BufRead, output: &mut impl Write) -> Result<bool> {
    write!(output, "{question} [y/N] ")?;
    output.flush()?;

    let mut answer = String::new();
    input.read_line(&mut answer)?;
    Ok(matches!(
        answer.trim().to_ascii_lowercase().as_str(),
        "y" | "yes"
    ))
}
