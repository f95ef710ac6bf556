use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use occupancy_lookup::{
    config::Config,
    models::{Document, SearchField, UserCredential},
    search::{format_for_display, RecordSearch, SearchOutcome},
    state::create_store,
};
use reqwest::Client;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "occupancy-admin")]
#[command(about = "Operator tools for the occupancy lookup store", long_about = None)]
struct Cli {
    /// Store connection URL; overrides OCCUPANCY__STORE__URL
    #[arg(long, global = true, env = "OCCUPANCY__STORE__URL")]
    store_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load a JSON array of records into the records collection
    ImportRecords {
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },

    /// Add a login credential
    AddUser {
        #[arg(short, long)]
        username: String,

        /// Read from OCCUPANCY_ADMIN_PASSWORD, or from stdin when neither is given
        #[arg(short, long, env = "OCCUPANCY_ADMIN_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },

    /// Look up the first record matching one field
    Lookup {
        /// address, name, bsl_on_roll, lease or licence
        #[arg(short, long, default_value = "address")]
        field: SearchField,

        #[arg(short, long)]
        value: String,
    },

    /// Show record and user counts
    Count,

    /// Check a running server's health
    Health {
        #[arg(short, long, default_value = "http://localhost:8501")]
        endpoint: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "occupancy_lookup=warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Health { endpoint } => {
            let body: serde_json::Value = Client::new()
                .get(format!("{}/health", endpoint))
                .send()
                .await?
                .json()
                .await?;
            println!("{}", serde_json::to_string_pretty(&body)?);
            Ok(())
        }
        command => run_store_command(command, cli.store_url).await,
    }
}

async fn run_store_command(command: Commands, store_url: Option<String>) -> anyhow::Result<()> {
    let mut config = Config::load().context("failed to load configuration")?;
    if store_url.is_some() {
        config.store.url = store_url;
    }
    let store = create_store(&config.store).await?;
    let records = config.store.records_collection.as_str();
    let users = config.store.users_collection.as_str();

    match command {
        Commands::ImportRecords { file } => {
            let raw = std::fs::read_to_string(&file)
                .with_context(|| format!("failed to read {}", file.display()))?;
            let documents: Vec<Document> = serde_json::from_str(&raw)
                .with_context(|| format!("{} is not a JSON array of objects", file.display()))?;

            let total = documents.len();
            for document in documents {
                store.insert_one(records, document).await?;
            }
            println!("Imported {} records into '{}'", total, records);
        }

        Commands::AddUser { username, password } => {
            if username.trim().is_empty() {
                bail!("username must not be empty");
            }
            let password = match password {
                Some(password) => password,
                None => read_password_from_stdin()?,
            };
            if password.is_empty() {
                bail!("password must not be empty");
            }
            let scheme = config.auth.password_scheme;
            let credential = UserCredential::new(username.clone(), &password, scheme);
            store.insert_one(users, credential.into_document()).await?;
            println!("Added user '{}' ({} password)", username, scheme);
        }

        Commands::Lookup { field, value } => {
            let search = RecordSearch::new(store.clone(), records);
            match search.search(field, &value).await? {
                SearchOutcome::Found(record) => {
                    let row = format_for_display(record);
                    println!("{}", serde_json::to_string_pretty(&row.to_json())?);
                }
                SearchOutcome::NotFound => println!("No document found with the given criteria."),
                SearchOutcome::Skipped => {}
            }
        }

        Commands::Count => {
            println!("{}: {}", records, store.count(records).await?);
            println!("{}: {}", users, store.count(users).await?);
        }

        Commands::Health { .. } => {}
    }

    store.flush().await?;
    Ok(())
}

fn read_password_from_stdin() -> anyhow::Result<String> {
    eprint!("Password: ");
    let mut line = String::new();
    std::io::stdin()
        .read_line(&mut line)
        .context("failed to read password from stdin")?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_add_user_password_is_optional_on_command_line() {
        let cli = Cli::try_parse_from(["occupancy-admin", "add-user", "--username", "admin"]).unwrap();
        match cli.command {
            Commands::AddUser { username, .. } => assert_eq!(username, "admin"),
            _ => panic!("expected add-user"),
        }
    }

    #[test]
    fn test_lookup_rejects_unknown_field() {
        let result = Cli::try_parse_from([
            "occupancy-admin",
            "lookup",
            "--field",
            "password",
            "--value",
            "x",
        ]);
        assert!(result.is_err());
    }
}
