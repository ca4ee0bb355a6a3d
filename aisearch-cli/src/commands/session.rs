//! `session` subcommands: sign-in state and the stored token.

use std::io::{self, Write};

use anyhow::{Context, Result, bail};
use clap::{Args, Subcommand};
use rpassword::prompt_password;
use shared::models::{LoginRequest, MeResponse, SignupRequest};
use tracing::{info, warn};

use super::AppContext;
use crate::client::validate_username;

/// Account and token commands.
#[derive(Subcommand, Debug)]
pub enum SessionCommand {
    /// Sign in and store the bearer token
    Login(CredentialsArgs),
    /// Create a new account
    Signup(CredentialsArgs),
    /// Show the signed-in user
    Me,
    /// Forget the stored token
    Logout,
}

/// Username for login and signup; the password is always prompted for.
#[derive(Args, Debug)]
pub struct CredentialsArgs {
    /// Account email; prompted for when omitted
    #[arg(long, short)]
    pub username: Option<String>,
}

/// Runs a `session` subcommand.
pub async fn run(ctx: &AppContext, command: SessionCommand) -> Result<()> {
    match command {
        SessionCommand::Login(args) => login(ctx, args).await,
        SessionCommand::Signup(args) => signup(ctx, args).await,
        SessionCommand::Me => me(ctx).await,
        SessionCommand::Logout => logout(ctx),
    }
}

async fn login(ctx: &AppContext, args: CredentialsArgs) -> Result<()> {
    let (username, password) = read_credentials(args)?;
    let client = ctx.anonymous_client()?;

    let login = client
        .login(&LoginRequest { username, password })
        .await
        .map_err(|err| anyhow::anyhow!(err.friendly_message()))?;

    ctx.tokens.save(&login.access_token)?;
    info!("login succeeded");
    println!("{}", login.message);
    println!("token stored at {}", ctx.tokens.path().display());
    Ok(())
}

async fn signup(ctx: &AppContext, args: CredentialsArgs) -> Result<()> {
    let (username, password) = read_credentials(args)?;
    validate_username(&username)?;
    let client = ctx.anonymous_client()?;

    let response = client
        .signup(&SignupRequest { username, password })
        .await
        .map_err(|err| anyhow::anyhow!(err.friendly_message()))?;

    println!("{}", response.message);
    println!("run `aisearch session login` to sign in");
    Ok(())
}

/// Validates the stored token, discarding it when the backend rejects it.
async fn me(ctx: &AppContext) -> Result<()> {
    let client = ctx.client()?;
    match client.me().await {
        Ok(profile) => {
            print_profile(&profile, client.base_url().as_str());
            Ok(())
        }
        Err(err) if err.is_unauthorized() => {
            if ctx.tokens.clear()? {
                warn!("stored token rejected; removed it");
            }
            bail!("session expired. run `aisearch session login` to sign in again");
        }
        Err(err) => Err(err).context("failed to fetch profile"),
    }
}

fn logout(ctx: &AppContext) -> Result<()> {
    let path = ctx.tokens.path().display().to_string();
    if ctx.tokens.clear()? {
        println!("Removed session token at {path}");
    } else {
        println!("No session token found at {path}");
    }
    Ok(())
}

fn read_credentials(args: CredentialsArgs) -> Result<(String, String)> {
    let username = match args.username {
        Some(username) => username.trim().to_string(),
        None => prompt("Email: ")?,
    };
    let password = prompt_password("Password: ")?;
    if password.trim().is_empty() {
        bail!("password must not be empty");
    }
    Ok((username, password))
}

fn prompt(message: &str) -> Result<String> {
    print!("{message}");
    io::stdout().flush().ok();
    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    let trimmed = input.trim().to_string();
    if trimmed.is_empty() {
        bail!("input must not be empty");
    }
    Ok(trimmed)
}

fn print_profile(profile: &MeResponse, server: &str) {
    println!("Logged in as {} (id {})", profile.username, profile.id);
    println!("active: {}", profile.is_active);
    println!("member since: {}", profile.created_at);
    println!("server: {server}");
}
