//! userdir - list users from a paginated user directory API
//!
//! Prints every user, then looks up a single user by id, reporting
//! not-found and network failures separately from everything else.

use std::io::{self, BufRead, Write};

use clap::Parser;
use tracing_subscriber::EnvFilter;

use userdir::cli::{parse_user_id_arg, resolve_config, Cli};
use userdir::data::{User, UserDirectoryClient, UserDirectoryError};

/// Sends log output to stderr, at `warn` unless `RUST_LOG` says otherwise
fn setup_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();
}

fn format_user(user: &User) -> String {
    format!("{}: {} - {}", user.id, user.full_name(), user.email)
}

/// Reads a user id from stdin; `None` if the input is not a valid id
fn prompt_user_id() -> io::Result<Option<u32>> {
    print!("Enter user ID to fetch: ");
    io::stdout().flush()?;

    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;

    match parse_user_id_arg(&line) {
        Ok(id) => Ok(Some(id)),
        Err(e) => {
            println!("{}", e);
            Ok(None)
        }
    }
}

async fn run(client: &UserDirectoryClient, user_id: Option<u32>) -> Result<(), UserDirectoryError> {
    let users = client.get_all_users().await?;
    println!("=== All Users ===");
    for user in &users {
        println!("{}", format_user(user));
    }
    println!();

    let user_id = match user_id {
        Some(id) => Some(id),
        None => prompt_user_id().map_err(|e| UserDirectoryError::Unexpected {
            context: "reading user ID".to_string(),
            source: Box::new(e),
        })?,
    };

    if let Some(id) = user_id {
        let user = client.get_user_by_id(id).await?;
        println!("User {}", format_user(&user));
    }

    Ok(())
}

/// Prints an error the way the console user should see it
fn report(err: &UserDirectoryError) {
    match err {
        UserDirectoryError::NotFound(_) => println!("Not found: {}", err),
        UserDirectoryError::Network { .. } => println!("Network issue: {}", err),
        _ => println!("Unexpected error: {}", err),
    }
}

/// Prints a startup failure and exits with status 1
fn fail(err: impl std::fmt::Display) -> ! {
    eprintln!("Error: {}", err);
    std::process::exit(1);
}

#[tokio::main]
async fn main() {
    setup_tracing();

    let cli = Cli::parse();
    let config = resolve_config(&cli).unwrap_or_else(|e| fail(e));
    let client = UserDirectoryClient::new(config).unwrap_or_else(|e| fail(e));

    if let Err(err) = run(&client, cli.user_id).await {
        report(&err);
        std::process::exit(1);
    }
}
