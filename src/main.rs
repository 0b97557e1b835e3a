use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use cardbank::config::{CardPaths, ServerSettings};
use cardbank::crypto::SystemKey;
use cardbank::models::AccountId;
use cardbank::remote::{HttpRemoteClient, RemoteClient};
use cardbank::services::Teller;
use cardbank::storage::{CardStore, LocalStore};
use cardbank::sync::{RunMode, SyncEngine};

#[derive(Parser)]
#[command(
    name = "cardbank",
    version,
    about = "Local-first bank account store with best-effort remote synchronization",
    long_about = "cardbank keeps accounts as encrypted card files on disk and \
                  mirrors changes to a remote account authority when one is \
                  configured and reachable. Local state always wins for the \
                  current session; remote failures never undo local changes."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a new account guarded by a seven-digit password
    Create {
        /// Seven-digit numeric password (1000000-9999999)
        password: u64,
    },

    /// Deposit an amount (in cents) into an account
    Deposit {
        id: AccountId,
        password: u64,
        amount: u64,
    },

    /// Withdraw an amount (in cents) from an account
    Withdraw {
        id: AccountId,
        password: u64,
        amount: u64,
    },

    /// Transfer an amount (in cents) between two accounts
    Transfer {
        from: AccountId,
        password: u64,
        to: AccountId,
        amount: u64,
    },

    /// Close an account (balance must be zero)
    Delete { id: AccountId, password: u64 },

    /// List all local accounts
    List,

    /// Run push-then-pull reconciliation with the remote authority
    Sync,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .with_target(false)
        .init();

    let cli = Cli::parse();

    let paths = CardPaths::new()?;
    paths.ensure_directories()?;

    let key = SystemKey::load_or_generate(&paths.key_file())?;
    let settings = ServerSettings::load(&paths)?;

    let client = match &settings {
        Some(settings) => Some(HttpRemoteClient::new(settings, &key)?),
        None => None,
    };

    let mut store = LocalStore::new(CardStore::open(paths.cards_dir(), key)?);
    store.preload()?;

    // Probe once; the mode holds for the rest of the process.
    let mode = match &client {
        Some(client) => RunMode::probe(client),
        None => RunMode::Local,
    };
    let remote: Option<&dyn RemoteClient> = match mode {
        RunMode::Remote => client.as_ref().map(|c| c as &dyn RemoteClient),
        RunMode::Local => None,
    };

    match cli.command {
        Commands::Create { password } => {
            let mut teller = Teller::new(&mut store, remote);
            let account = teller.create(password)?;
            println!("Account created: {}", account.id);
            println!("Keep your identifier and password safe.");
        }
        Commands::Deposit {
            id,
            password,
            amount,
        } => {
            let mut teller = Teller::new(&mut store, remote);
            let account = teller.deposit(&id, password, amount)?;
            println!("Deposit complete. {}", account);
        }
        Commands::Withdraw {
            id,
            password,
            amount,
        } => {
            let mut teller = Teller::new(&mut store, remote);
            let account = teller.withdraw(&id, password, amount)?;
            println!("Withdrawal complete. {}", account);
        }
        Commands::Transfer {
            from,
            password,
            to,
            amount,
        } => {
            let mut teller = Teller::new(&mut store, remote);
            let account = teller.transfer(&from, password, &to, amount)?;
            println!("Transfer complete. {}", account);
        }
        Commands::Delete { id, password } => {
            let mut teller = Teller::new(&mut store, remote);
            teller.delete(&id, password)?;
            println!("Account {} closed.", id);
        }
        Commands::List => {
            let mut teller = Teller::new(&mut store, remote);
            let accounts = teller.list()?;
            if accounts.is_empty() {
                println!("No accounts.");
            } else {
                for account in &accounts {
                    println!("{}", account);
                }
                println!("{} account(s)", accounts.len());
            }
        }
        Commands::Sync => match remote {
            Some(remote) => {
                let max_batch = settings
                    .as_ref()
                    .map(|s| s.max_pull_batch)
                    .unwrap_or(1000);
                let report = SyncEngine::new(&mut store, remote, max_batch).reconcile()?;
                println!(
                    "Sync finished: pushed {}, created {}, updated {}, unchanged {}, failed {}",
                    report.pushed,
                    report.created,
                    report.updated,
                    report.unchanged,
                    report.push_failed + report.pull_failed
                );
            }
            None => {
                println!("No remote authority reachable; nothing to sync.");
            }
        },
    }

    Ok(())
}
