use std::net::SocketAddr;

use clap::{Args, Parser, Subcommand};

use crate::domain::repositories::{TokenRepository, UserRepository};
use crate::domain::tokens::NewToken;
use crate::domain::users::NewUser;
use crate::infrastructure::auth::{generate_token, hash_token};
use crate::infrastructure::database::Database;
use crate::infrastructure::repositories::tokens::SqlTokenRepository;
use crate::infrastructure::repositories::users::SqlUserRepository;

#[derive(Parser)]
#[command(
    name = "guildsbook",
    about = "GuildsBook reading-statistics service",
    version
)]
pub struct Cli {
    /// SQLite database URL.
    #[arg(
        long,
        global = true,
        env = "GUILDSBOOK_DATABASE_URL",
        default_value = "sqlite://guildsbook.db"
    )]
    pub database_url: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the HTTP server.
    Serve(ServeCommand),
    /// Manage users (normally provisioned by the auth provider).
    User {
        #[command(subcommand)]
        command: UserCommand,
    },
    /// Manage API tokens.
    Token {
        #[command(subcommand)]
        command: TokenCommand,
    },
}

#[derive(Args)]
pub struct ServeCommand {
    /// Address to bind the HTTP server to.
    #[arg(
        long,
        env = "GUILDSBOOK_BIND_ADDRESS",
        default_value = "127.0.0.1:8080"
    )]
    pub bind_address: SocketAddr,
}

#[derive(Subcommand)]
pub enum UserCommand {
    /// Create a user.
    Add {
        #[arg(long)]
        username: String,
    },
}

#[derive(Subcommand)]
pub enum TokenCommand {
    /// Issue a bearer token for an existing user and print it once.
    Issue {
        #[arg(long)]
        username: String,
        /// Label for the token (e.g. the consuming client).
        #[arg(long)]
        name: String,
    },
}

pub async fn add_user(database_url: &str, username: &str) -> anyhow::Result<()> {
    let database = Database::connect(database_url).await?;
    let users = SqlUserRepository::new(database.clone_pool());

    let uuid = uuid::Uuid::new_v4().to_string();
    let user = users
        .insert(NewUser::new(username.to_string(), uuid))
        .await?;

    println!("created user {} (id {})", user.username, user.id);
    Ok(())
}

pub async fn issue_token(database_url: &str, username: &str, name: &str) -> anyhow::Result<()> {
    let database = Database::connect(database_url).await?;
    let pool = database.clone_pool();
    let users = SqlUserRepository::new(pool.clone());
    let tokens = SqlTokenRepository::new(pool);

    let user = users.get_by_username(username).await?;

    let token_value = generate_token();
    tokens
        .insert(NewToken::new(
            user.id,
            hash_token(&token_value),
            name.to_string(),
        ))
        .await?;

    // The raw value is only ever printed here.
    println!("{token_value}");
    eprintln!("Token '{name}' issued for {username}. Store it now; it cannot be shown again.");
    Ok(())
}
