use std::sync::Arc;

use anyhow::Context;
use bookshelf_app::Application;
use bookshelf_authz::{Authenticator, Credential, Identity, TokenCodec};
use bookshelf_kernel::settings::Settings;
use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "bookshelf-cli", version, about = "Bookshelf command-line tools")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run the HTTP server
    Serve,
    /// Log in against the configured identity and print a bearer token
    Token {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let settings = Settings::load().with_context(|| "failed to load Bookshelf settings")?;

    match cli.command {
        Command::Serve => serve(settings),
        Command::Token { email, password } => {
            let token = issue_token(&settings, Credential { email, password })?;
            println!("{}", token);
            Ok(())
        }
    }
}

fn serve(settings: Settings) -> anyhow::Result<()> {
    bookshelf_telemetry::init(&settings.telemetry)?;
    tracing::info!(env = ?settings.environment, "bookshelf-cli serve");

    let runtime = tokio::runtime::Runtime::new().context("failed to start tokio runtime")?;
    runtime.block_on(async {
        let app = Application::build(&settings)?;
        app.run(&settings).await
    })
}

fn issue_token(settings: &Settings, credential: Credential) -> anyhow::Result<String> {
    let codec = Arc::new(TokenCodec::from_settings(&settings.auth)?);
    let authenticator = Authenticator::new(Identity::from_settings(&settings.auth), codec);

    authenticator
        .login(&credential)
        .with_context(|| format!("login failed for {}", credential.email))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn issue_token_with_default_identity() {
        let settings = Settings::default();
        let token = issue_token(
            &settings,
            Credential {
                email: "user@example.com".to_string(),
                password: "password123".to_string(),
            },
        )
        .unwrap();

        let codec = TokenCodec::from_settings(&settings.auth).unwrap();
        assert!(codec.verify(&token).unwrap().is_admin());
    }

    #[test]
    fn issue_token_rejects_bad_password() {
        let err = issue_token(
            &Settings::default(),
            Credential {
                email: "user@example.com".to_string(),
                password: "wrong".to_string(),
            },
        )
        .unwrap_err();
        assert!(err.to_string().contains("login failed"));
    }
}
