//! CLI administration tool for shortlink.
//!
//! Provides commands for managing user accounts, inspecting links,
//! viewing statistics, and performing database operations without
//! requiring HTTP API access.
//!
//! # Usage
//!
//! ```bash
//! # Create a new user
//! cargo run --bin admin -- user create
//!
//! # List all users
//! cargo run --bin admin -- user list
//!
//! # Reset a password
//! cargo run --bin admin -- user passwd alice
//!
//! # List a user's links
//! cargo run --bin admin -- links alice
//!
//! # View statistics
//! cargo run --bin admin -- stats
//!
//! # Check database connection / apply migrations
//! cargo run --bin admin -- db check
//! cargo run --bin admin -- db migrate
//! ```
//!
//! # Environment Variables
//!
//! - `DATABASE_URL` or `DB_NAME`: SQLite database location
//!   (default: `sqlite://shorturls.db`)

use shortlink::application::services::auth_service::hash_password;
use shortlink::config::Config;
use shortlink::domain::entities::NewUser;
use shortlink::domain::repositories::{LinkRepository, UserRepository};
use shortlink::infrastructure::persistence::{SqliteLinkRepository, SqliteUserRepository};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::{Confirm, Input, Password};
use sqlx::SqlitePool;
use sqlx::sqlite::SqliteConnectOptions;
use std::str::FromStr;
use std::sync::Arc;

/// CLI tool for managing shortlink.
#[derive(Parser)]
#[command(name = "admin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Top-level command groups.
#[derive(Subcommand)]
enum Commands {
    /// Manage user accounts
    User {
        #[command(subcommand)]
        action: UserAction,
    },

    /// List links owned by a user
    Links {
        /// Owner username
        username: String,
    },

    /// Show statistics
    Stats,

    /// Database operations
    Db {
        #[command(subcommand)]
        action: DbAction,
    },
}

/// User management subcommands.
#[derive(Subcommand)]
enum UserAction {
    /// Create a new user
    Create {
        #[arg(short, long)]
        username: Option<String>,

        #[arg(short, long)]
        email: Option<String>,

        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },

    /// List all users
    List,

    /// Set a new password for a user
    Passwd {
        username: String,
    },
}

/// Database operation subcommands.
#[derive(Subcommand)]
enum DbAction {
    /// Check database connection
    Check,

    /// Apply pending migrations
    Migrate,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let database_url = Config::load_database_url();
    let options = SqliteConnectOptions::from_str(&database_url)
        .with_context(|| format!("Invalid database URL '{}'", database_url))?
        .create_if_missing(true)
        .foreign_keys(true);

    let pool = SqlitePool::connect_with(options)
        .await
        .context("Failed to connect to database")?;

    match cli.command {
        Commands::User { action } => handle_user_action(action, &pool).await?,
        Commands::Links { username } => list_links(&pool, &username).await?,
        Commands::Stats => handle_stats(&pool).await?,
        Commands::Db { action } => handle_db_action(action, &pool).await?,
    }

    Ok(())
}

/// Dispatches user management commands.
async fn handle_user_action(action: UserAction, pool: &SqlitePool) -> Result<()> {
    let repo = SqliteUserRepository::new(Arc::new(pool.clone()));

    match action {
        UserAction::Create {
            username,
            email,
            yes,
        } => create_user(&repo, username, email, yes).await?,
        UserAction::List => list_users(&repo).await?,
        UserAction::Passwd { username } => change_password(&repo, &username).await?,
    }

    Ok(())
}

/// Creates a user with interactive prompts.
///
/// The password is read without echo and stored as an Argon2 hash.
async fn create_user(
    repo: &SqliteUserRepository,
    username: Option<String>,
    email: Option<String>,
    skip_confirm: bool,
) -> Result<()> {
    println!("{}", "👤 Create User".bright_blue().bold());
    println!();

    let username = match username {
        Some(u) => u,
        None => Input::new().with_prompt("Username").interact_text()?,
    };
    let email = match email {
        Some(e) => e,
        None => Input::new().with_prompt("Email").interact_text()?,
    };
    let first_name: String = Input::new().with_prompt("First name").interact_text()?;
    let last_name: String = Input::new().with_prompt("Last name").interact_text()?;
    let password = Password::new()
        .with_prompt("Password")
        .with_confirmation("Repeat password", "Passwords don't match")
        .interact()?;

    println!();
    println!("{}", "User details:".bright_white().bold());
    println!("  Username: {}", username.cyan());
    println!("  Email:    {}", email.cyan());
    println!("  Name:     {} {}", first_name, last_name);
    println!();

    if !skip_confirm {
        let confirmed = Confirm::new()
            .with_prompt("Create this user?")
            .default(true)
            .interact()?;

        if !confirmed {
            println!("{}", "❌ Cancelled".red());
            return Ok(());
        }
    }

    let password_hash = hash_password(&password)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to hash password: {}", e))?;

    repo.create(NewUser {
        username,
        email,
        first_name,
        last_name,
        password_hash,
    })
    .await
    .map_err(|e| anyhow::anyhow!("Failed to create user: {}", e))?;

    println!();
    println!("{}", "✅ User created successfully!".green().bold());
    println!();

    Ok(())
}

/// Lists all users.
///
/// # Output Format
///
/// ```text
/// 📋 Users
///
///   Username             Email                          Created
///   ──────────────────────────────────────────────────────────────────────
///   alice                alice@example.com              2024-01-15 10:30
/// ```
async fn list_users(repo: &SqliteUserRepository) -> Result<()> {
    println!("{}", "📋 Users".bright_blue().bold());
    println!();

    let users = repo
        .list()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to list users: {}", e))?;

    if users.is_empty() {
        println!("{}", "  No users found".yellow());
        println!();
        println!(
            "  Create one with: {} admin user create",
            "cargo run --bin".bright_cyan()
        );
        return Ok(());
    }

    println!(
        "  {:<20} {:<30} {:<20}",
        "Username".bright_white().bold(),
        "Email".bright_white().bold(),
        "Created".bright_white().bold()
    );
    println!("  {}", "─".repeat(70).bright_black());

    for user in &users {
        println!(
            "  {:<20} {:<30} {}",
            user.username.cyan(),
            user.email,
            user.created_at
                .format("%Y-%m-%d %H:%M")
                .to_string()
                .bright_black()
        );
    }

    println!();
    println!("  Total: {}", users.len().to_string().bright_white().bold());
    println!();

    Ok(())
}

/// Replaces a user's password after confirmation.
async fn change_password(repo: &SqliteUserRepository, username: &str) -> Result<()> {
    println!("{}", "🔒 Change Password".bright_blue().bold());
    println!();

    repo.find_by_username(username)
        .await
        .map_err(|e| anyhow::anyhow!("Database error: {}", e))?
        .context("User not found")?;

    let password = Password::new()
        .with_prompt(format!("New password for {}", username))
        .with_confirmation("Repeat password", "Passwords don't match")
        .interact()?;

    let password_hash = hash_password(&password)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to hash password: {}", e))?;

    let updated = repo
        .update_password(username, &password_hash)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to update password: {}", e))?;

    if !updated {
        anyhow::bail!("User not found");
    }

    println!();
    println!("{}", "✅ Password updated successfully!".green().bold());
    println!();

    Ok(())
}

/// Lists the links owned by `username`, newest first.
async fn list_links(pool: &SqlitePool, username: &str) -> Result<()> {
    println!(
        "{} {}",
        "🔗 Links owned by".bright_blue().bold(),
        username.cyan().bold()
    );
    println!();

    let repo = SqliteLinkRepository::new(Arc::new(pool.clone()));
    let links = repo
        .list_by_owner(username)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to list links: {}", e))?;

    if links.is_empty() {
        println!("{}", "  No links found".yellow());
        return Ok(());
    }

    println!(
        "  {:<16} {:<8} {:<20} {}",
        "ID".bright_white().bold(),
        "Views".bright_white().bold(),
        "Created".bright_white().bold(),
        "Target".bright_white().bold()
    );
    println!("  {}", "─".repeat(80).bright_black());

    for link in &links {
        println!(
            "  {:<16} {:<8} {:<20} {}",
            link.id.cyan(),
            link.view_count.to_string().bright_green(),
            link.created_at
                .format("%Y-%m-%d %H:%M")
                .to_string()
                .bright_black(),
            link.target_url
        );
    }

    println!();
    println!("  Total: {}", links.len().to_string().bright_white().bold());
    println!();

    Ok(())
}

/// Displays system statistics.
///
/// Shows:
/// - Number of users
/// - Number of links
/// - Total recorded views
async fn handle_stats(pool: &SqlitePool) -> Result<()> {
    println!("{}", "📊 Statistics".bright_blue().bold());
    println!();

    let users_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
        .fetch_one(pool)
        .await?;

    let links_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM short_links")
        .fetch_one(pool)
        .await?;

    let views_count: i64 = sqlx::query_scalar("SELECT COALESCE(SUM(view_count), 0) FROM short_links")
        .fetch_one(pool)
        .await?;

    println!(
        "  Users: {}",
        users_count.to_string().bright_green().bold()
    );
    println!(
        "  Links: {}",
        links_count.to_string().bright_green().bold()
    );
    println!(
        "  Views: {}",
        views_count.to_string().bright_green().bold()
    );
    println!();

    Ok(())
}

/// Handles database diagnostic commands.
async fn handle_db_action(action: DbAction, pool: &SqlitePool) -> Result<()> {
    match action {
        DbAction::Check => {
            println!("{}", "🔍 Checking database connection...".bright_blue());

            let version: String = sqlx::query_scalar("SELECT sqlite_version()")
                .fetch_one(pool)
                .await?;

            println!("{}", "✅ Database connection OK".green().bold());
            println!("  SQLite: {}", version.bright_white());
        }
        DbAction::Migrate => {
            println!("{}", "🛠  Applying migrations...".bright_blue());

            sqlx::migrate!("./migrations")
                .run(pool)
                .await
                .context("Failed to migrate")?;

            println!("{}", "✅ Migrations applied".green().bold());
        }
    }

    Ok(())
}
