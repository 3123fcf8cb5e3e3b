mod config;

use anyhow::Context;
use chrono::Utc;
use clap::Parser;
use config::{NodeConfig, StorageBackend};
use economics::TierTable;
use owo_colors::OwoColorize;
use smeraldo_api::ApiState;
use smeraldo_core::RewardPolicy;
use smeraldo_mining::AccountRegistry;
use smeraldo_storage::{MemoryStore, SledStore, Store};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

const DEFAULT_LOG_FILTER: &str = "smeraldo=info,tower_http=info";

#[derive(Parser)]
#[command(name = "smeraldod")]
#[command(about = "SmeraldoCoin mining rewards server")]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Address to listen on
    #[arg(short, long, value_name = "ADDR")]
    bind: Option<SocketAddr>,

    /// Directory for the persistent store (selects the sled backend)
    #[arg(long, value_name = "DIR", conflicts_with = "memory")]
    data_dir: Option<PathBuf>,

    /// Keep all state in memory
    #[arg(long)]
    memory: bool,
}

impl Cli {
    fn apply(&self, config: &mut NodeConfig) {
        if let Some(bind) = self.bind {
            config.server.bind = bind;
        }
        if let Some(dir) = &self.data_dir {
            config.storage.backend = StorageBackend::Sled;
            config.storage.data_dir = dir.clone();
        }
        if self.memory {
            config.storage.backend = StorageBackend::Memory;
        }
    }
}

fn open_store(config: &NodeConfig) -> anyhow::Result<Arc<dyn Store>> {
    Ok(match config.storage.backend {
        StorageBackend::Memory => Arc::new(MemoryStore::new()),
        StorageBackend::Sled => {
            let dir = &config.storage.data_dir;
            let store = SledStore::open(dir)
                .with_context(|| format!("opening sled store at {}", dir.display()))?;
            Arc::new(store)
        }
    })
}

fn print_banner(config: &NodeConfig, policy: &RewardPolicy) {
    println!("{}", "SmeraldoCoin Node v0.1.0".green().bold());
    println!("{}", "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━".bright_black());
    println!("{}: {}", "Listening".yellow().bold(), config.server.bind);
    match config.storage.backend {
        StorageBackend::Memory => println!("{}: in-memory", "Storage".yellow().bold()),
        StorageBackend::Sled => println!(
            "{}: sled at {}",
            "Storage".yellow().bold(),
            config.storage.data_dir.display()
        ),
    }
    println!(
        "{}: {}/hour passive, {}/click, {} clicks/day, {} coins/day",
        "Rewards".yellow().bold(),
        policy.passive_per_hour,
        policy.per_click,
        policy.max_clicks_per_day,
        policy.max_coins_per_day
    );
    println!(
        "{}: {} EUR per coin",
        "Base value".yellow().bold(),
        policy.coin_value_eur
    );
    println!("{}\n", "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━".bright_black());
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .init();

    let cli = Cli::parse();
    let mut config = NodeConfig::load(cli.config.as_deref())?;
    cli.apply(&mut config);

    let policy = config.reward_policy()?;
    print_banner(&config, &policy);

    let store = open_store(&config)?;

    if let Some(admin) = &config.admin {
        AccountRegistry::new(store.clone())
            .ensure_admin(&admin.username, &admin.email, Utc::now())
            .context("seeding admin account")?;
    }

    let accounts = store.count_accounts()?;
    info!(accounts, bind = %config.server.bind, "node_starting");

    let state = ApiState::new(store, policy, TierTable::standard());
    smeraldo_api::start_server(config.server.bind, state, config.server.cors_permissive)
        .await
        .map_err(|e| anyhow::anyhow!("server error: {}", e))?;

    Ok(())
}
