//! CLI command implementations

use anyhow::{bail, Context, Result};
use std::fs;
use std::path::Path;

use crate::api::AppState;
use crate::auth::models::{RegisterRequest, UserInfo};
use crate::auth::{AuthGate, Rejection, SecretKey, TokenCodec, UserStore};
use crate::cli::{
    error, info, print_books_table, print_claims, print_library_stats, print_users_table, success,
    warn, LibraryAction, OutputFormat, TokenAction, UsersAction,
};
use crate::config::{self, loader::CONFIG_FILENAME, Config};
use crate::library::{BookQuery, Library};

/// Initialize a new timetable.toml configuration file
pub async fn init() -> Result<()> {
    let config_path = Path::new(CONFIG_FILENAME);

    if config_path.exists() {
        warn(&format!("{} already exists", CONFIG_FILENAME));
        return Ok(());
    }

    let content = config::loader::default_config_content();
    fs::write(config_path, content)?;

    success(&format!("Created {}", CONFIG_FILENAME));
    info("Set TIMETABLE_SECRET and run 'timetable serve' to start the web UI");

    Ok(())
}

/// Start the web UI
pub async fn serve(host: Option<String>, port: Option<u16>) -> Result<()> {
    let config = config::load_config_or_default()?;
    let host = host.unwrap_or_else(|| config.server.host.clone());
    let port = port.unwrap_or(config.server.port);

    info(&format!("Starting server at http://{}:{}", host, port));

    crate::api::run_server(config, &host, port).await?;
    Ok(())
}

fn user_store(config: &Config) -> UserStore {
    UserStore::new(config.store.users_file.clone(), config.auth.bcrypt_cost)
}

fn auth_gate(config: &Config) -> AuthGate {
    let codec = TokenCodec::new(SecretKey::from(config.auth.secret.as_str()));
    AuthGate::new(codec, config.auth.token_ttl_secs)
}

/// User management commands
pub async fn users(action: UsersAction) -> Result<()> {
    let config = config::load_config_or_default()?;
    let store = user_store(&config);

    match action {
        UsersAction::Add {
            login,
            name,
            group,
            role,
            password,
        } => {
            if !config.auth.is_known_role(&role) {
                bail!(
                    "Unknown role '{}', expected one of: {}",
                    role,
                    config.auth.roles.join(", ")
                );
            }
            let principal = store
                .register(RegisterRequest {
                    name,
                    group,
                    login,
                    password,
                    role,
                })
                .await?;
            success(&format!(
                "Registered {} ({}) in {}",
                principal.login,
                principal.role,
                store.path().display()
            ));
        }
        UsersAction::List { format } => {
            let users: Vec<UserInfo> = store.list().await?.into_iter().map(UserInfo::from).collect();
            match format {
                OutputFormat::Table => print_users_table(&users),
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&users)?),
            }
        }
    }

    Ok(())
}

/// Token commands
pub async fn token(action: TokenAction) -> Result<()> {
    let config = config::load_config_or_default()?;
    let gate = auth_gate(&config);

    match action {
        TokenAction::Issue { login } => {
            let principal = user_store(&config)
                .lookup(&login)
                .await?
                .with_context(|| format!("No user with login '{}'", login))?;
            println!("{}", gate.issue(&principal, AppState::now()));
        }
        TokenAction::Inspect { token } => {
            let now = AppState::now();
            match gate.verify(&token, now) {
                Ok(claims) => print_claims(&claims, false),
                Err(Rejection::Expired) => {
                    // Signature checked out, show what it carried
                    let claims = gate.codec().decode(&token)?;
                    print_claims(&claims, true);
                }
                Err(Rejection::Invalid(e)) => {
                    error(&format!("Token rejected: {}", e));
                    bail!("invalid token");
                }
            }
        }
    }

    Ok(())
}

/// Book catalog commands
pub async fn library(action: LibraryAction) -> Result<()> {
    match action {
        LibraryAction::Demo { file } => {
            let mut library = Library::new();
            library.add_book("War and Peace", "Tolstoy", "Novel", 4)?;
            library.add_book("Anna Karenina", "Tolstoy", "Novel", 2)?;
            library.add_book("Hadji Murat", "Tolstoy", "Novella", 1)?;
            library.add_book("Crime and Punishment", "Dostoevsky", "Novel", 1)?;

            match library.borrow_book("War and Peace") {
                Some(book) => info(&format!("Borrowed '{}', {} left", book.title, book.copies)),
                None => warn("'War and Peace' is not available"),
            }

            info("Books by Tolstoy:");
            print_books_table(&library.search(&BookQuery::by_author("Tolstoy")));

            info("Novels by Tolstoy:");
            print_books_table(&library.search(&BookQuery::by_author("Tolstoy").genre("Novel")));

            if let Some(stats) = library.analyze() {
                print_library_stats(&stats);
            }

            library.save_to_file(&file)?;
            let mut reloaded = Library::new();
            reloaded.load_from_file(&file)?;
            success(&format!(
                "Saved and reloaded {} books from {}",
                reloaded.len(),
                file.display()
            ));
        }
        LibraryAction::Show { file, author, genre } => {
            let mut library = Library::new();
            library
                .load_from_file(&file)
                .with_context(|| format!("Failed to load {}", file.display()))?;

            let books = if author.is_none() && genre.is_none() {
                library.list_books()
            } else {
                library.search(&BookQuery {
                    title: None,
                    author,
                    genre,
                })
            };
            print_books_table(&books);

            if let Some(stats) = library.analyze() {
                println!();
                print_library_stats(&stats);
            }
        }
    }

    Ok(())
}
