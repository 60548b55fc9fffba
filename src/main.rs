use anyhow::Result;
use clap::Parser;
use guildsbook::application::{ServerConfig, serve};
use guildsbook::presentation::cli::{
    Cli, Commands, TokenCommand, UserCommand, add_user, issue_token,
};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (before clap parses env vars)
    let _ = dotenvy::dotenv();

    init_tracing();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve(cmd) => {
            serve(ServerConfig {
                bind_address: cmd.bind_address,
                database_url: cli.database_url,
            })
            .await
        }
        Commands::User {
            command: UserCommand::Add { username },
        } => add_user(&cli.database_url, &username).await,
        Commands::Token {
            command: TokenCommand::Issue { username, name },
        } => issue_token(&cli.database_url, &username, &name).await,
    }
}

#[allow(clippy::expect_used)] // Startup: panicking is appropriate if logging cannot be initialized
fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let use_json = std::env::var("RUST_LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json"));

    let registry = tracing_subscriber::registry().with(env_filter);

    if use_json {
        registry
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().compact())
            .init();
    }
}
