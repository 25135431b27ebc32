//! Keyrack admin CLI
//!
//! Terminal front-end for the license backend: session management plus
//! package and key administration. Destructive commands ask for
//! confirmation unless `--yes` is given.

mod confirm;
mod render;

use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context};
use chrono::Utc;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use keyrack_client::{AdminConsole, Catalog, CreateKeySpec, FileSessionStore};
use keyrack_core::key::DurationType;

const DEFAULT_API_URL: &str = "http://127.0.0.1:8081";
const DEFAULT_SESSION_FILE: &str = ".keyrack/session.json";

#[derive(Parser, Debug)]
#[command(name = "keyrack-admin")]
#[command(about = "Administration console for the Keyrack license backend")]
struct Args {
    /// Backend base URL (falls back to $KEYRACK_API_URL)
    #[arg(long)]
    api_url: Option<String>,

    /// Session file path (falls back to $KEYRACK_SESSION_FILE)
    #[arg(long)]
    session_file: Option<PathBuf>,

    /// Assume yes on every confirmation prompt
    #[arg(short = 'y', long)]
    yes: bool,

    /// Enable verbose debug logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Log in and persist the session
    Login {
        #[arg(long)]
        username: String,
        /// Taken from $KEYRACK_PASSWORD or prompted when omitted
        #[arg(long)]
        password: Option<String>,
    },
    /// Drop the persisted session
    Logout,
    /// Show aggregate key counts
    Status,
    /// Package administration
    #[command(subcommand)]
    Packages(PackagesCommand),
    /// Key administration
    #[command(subcommand)]
    Keys(KeysCommand),
}

#[derive(Subcommand, Debug)]
enum PackagesCommand {
    /// List registered packages
    List,
    /// Register a package and print its one-time API token
    Create { name: String },
    /// Delete a package; the backend deletes its keys with it
    Delete { id: String },
}

#[derive(Subcommand, Debug)]
enum KeysCommand {
    /// List keys with search and paging
    List {
        /// Substring match on key string or package name
        #[arg(long, default_value = "")]
        search: String,
        #[arg(long, default_value_t = 1)]
        page: usize,
        #[arg(long, default_value_t = 10)]
        page_size: usize,
    },
    /// Generate a batch of keys
    Create {
        /// Owning package id
        #[arg(long)]
        package: String,
        #[arg(long)]
        prefix: String,
        #[arg(long, default_value_t = 1)]
        quantity: u32,
        #[arg(long)]
        duration: u32,
        #[arg(long, default_value_t = DurationType::Days)]
        unit: DurationType,
        /// Allow more than one activated device
        #[arg(long)]
        multi: bool,
        #[arg(long, default_value_t = 1)]
        max_activations: u32,
    },
    /// Clear a key's activated devices
    Reset { id: String },
    /// Permanently delete a key
    Delete { id: String },
}

#[tokio::main]
async fn main() {
    let args = Args::parse();
    init_tracing(args.verbose);

    if let Err(err) = run(args).await {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose {
        "keyrack_admin=debug,keyrack_client=debug,keyrack_core=debug"
    } else {
        "keyrack_admin=info,keyrack_client=warn"
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();
}

async fn run(args: Args) -> anyhow::Result<()> {
    let api_url = args
        .api_url
        .or_else(|| std::env::var("KEYRACK_API_URL").ok())
        .unwrap_or_else(|| DEFAULT_API_URL.to_string());
    let session_file = args
        .session_file
        .or_else(|| std::env::var("KEYRACK_SESSION_FILE").ok().map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_SESSION_FILE));
    tracing::debug!(%api_url, "using backend");

    let store = Arc::new(FileSessionStore::new(session_file));
    let mut console = AdminConsole::new(Catalog::new(&api_url), store);

    match args.command {
        Command::Login { username, password } => {
            let password = resolve_password(password)?;
            console.login(&username, &password).await?;
            println!("logged in as {username}");
            println!("{}", render::stat_line(&console.stats()));
        }
        Command::Logout => {
            console.logout().await?;
            println!("logged out");
        }
        Command::Status => {
            ensure_session(&mut console).await?;
            println!("{}", render::stat_line(&console.stats()));
        }
        Command::Packages(command) => {
            ensure_session(&mut console).await?;
            run_packages(&mut console, command, args.yes).await?;
        }
        Command::Keys(command) => {
            ensure_session(&mut console).await?;
            run_keys(&mut console, command, args.yes).await?;
        }
    }

    Ok(())
}

/// Restore the persisted session and load both lists.
async fn ensure_session(console: &mut AdminConsole) -> anyhow::Result<()> {
    console.init().await.context("could not restore session")?;
    if !console.is_authenticated() {
        bail!("not logged in (run `keyrack-admin login --username <name>` first)");
    }
    Ok(())
}

fn resolve_password(arg: Option<String>) -> anyhow::Result<String> {
    if let Some(password) = arg {
        return Ok(password);
    }
    if let Ok(password) = std::env::var("KEYRACK_PASSWORD") {
        return Ok(password);
    }

    let mut stdout = io::stdout();
    write!(stdout, "password: ")?;
    stdout.flush()?;
    let mut line = String::new();
    io::stdin().read_line(&mut line)?;
    let password = line.trim_end_matches(['\r', '\n']).to_string();
    if password.is_empty() {
        bail!("password must not be empty");
    }
    Ok(password)
}

async fn run_packages(
    console: &mut AdminConsole,
    command: PackagesCommand,
    assume_yes: bool,
) -> anyhow::Result<()> {
    match command {
        PackagesCommand::List => {
            print!("{}", render::package_table(console.packages()));
        }
        PackagesCommand::Create { name } => {
            let package = console.create_package(&name).await?;
            println!("created package {} ({})", package.name, package.id);
            match package.token {
                Some(token) => println!("api token (shown once): {token}"),
                None => println!("the server did not return an api token"),
            }
        }
        PackagesCommand::Delete { id } => {
            if !confirm::confirm("Delete this package? Its keys go with it.", assume_yes)? {
                println!("aborted");
                return Ok(());
            }
            console.delete_package(&id).await?;
            println!("package {id} deleted");
        }
    }
    Ok(())
}

async fn run_keys(
    console: &mut AdminConsole,
    command: KeysCommand,
    assume_yes: bool,
) -> anyhow::Result<()> {
    match command {
        KeysCommand::List {
            search,
            page,
            page_size,
        } => {
            console.set_page_size(page_size)?;
            console.set_search(search);
            console.set_page(page)?;

            print!("{}", render::key_table(&console.page(), Utc::now()));
            println!(
                "{}",
                render::pager_strip(&console.visible_pages(), console.view().current_page())
            );
            println!(
                "page {} of {} ({} matching keys)",
                console.view().current_page(),
                console.total_pages(),
                console.filtered_keys().len()
            );
        }
        KeysCommand::Create {
            package,
            prefix,
            quantity,
            duration,
            unit,
            multi,
            max_activations,
        } => {
            let spec = CreateKeySpec {
                package_id: package,
                prefix,
                quantity,
                duration,
                duration_type: unit,
                multi_activation: multi,
                max_activations,
            };
            let batch = console.create_keys(&spec).await?;
            println!("created {} keys", batch.len());
            if let Some(first) = batch.first() {
                println!("first key: {}", first.key);
            }
        }
        KeysCommand::Reset { id } => {
            if !confirm::confirm(
                "Reset this key? Its activated devices are removed.",
                assume_yes,
            )? {
                println!("aborted");
                return Ok(());
            }
            console.reset_key(&id).await?;
            println!("key {id} reset");
        }
        KeysCommand::Delete { id } => {
            if !confirm::confirm("Permanently delete this key?", assume_yes)? {
                println!("aborted");
                return Ok(());
            }
            console.delete_key(&id).await?;
            println!("key {id} deleted");
        }
    }
    Ok(())
}
