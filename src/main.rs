//! CLI for blogsub
//!
//! Subcommands:
//! - `run`: apply a mutation script and print every delivered event
//! - `topics`: print the topic names a client subscribes to for a post

use std::error::Error;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use tracing::{error, info};

use blogsub::bus::{EventBus, Topic};
use blogsub::config::{Settings, StoreBackend, load_config, load_config_from};
use blogsub::model::Id;
use blogsub::mutation::Mutations;
use blogsub::notify::NotificationEmitter;
use blogsub::persistence::{MemoryStore, SledStore};
use blogsub::script::{self, ScriptCommand};
use blogsub::utils::logging;

#[derive(Parser)]
#[command(name = "blogsub", version, about = "Blog mutations with live change notifications")]
struct Cli {
    /// Configuration file (defaults to `config/default.*` when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Apply a JSON-lines mutation script and print delivered events to stdout
    Run {
        script: PathBuf,
        /// Topic to listen on; repeatable (default: post)
        #[arg(long = "subscribe", value_name = "TOPIC")]
        topics: Vec<Topic>,
    },
    /// Print the topics carrying notifications for a post
    Topics { post_id: String },
}

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    let settings = match cli.config.as_deref() {
        Some(path) => load_config_from(path),
        None => load_config(),
    };
    let settings = match settings {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(2);
        }
    };
    logging::init(&settings.log.level);

    let result = match cli.command {
        Command::Run { script, topics } => run_script(&settings, &script, topics).await,
        Command::Topics { post_id } => {
            let post_id = Id::from(post_id);
            println!("{}", Topic::post());
            println!("{}", Topic::comment(&post_id));
            Ok(())
        }
    };

    if let Err(e) = result {
        error!("{e}");
        std::process::exit(1);
    }
}

async fn run_script(
    settings: &Settings,
    path: &Path,
    mut topics: Vec<Topic>,
) -> Result<(), Box<dyn Error>> {
    let commands = script::read_script(path)?;
    if topics.is_empty() {
        topics.push(Topic::post());
    }

    let bus = EventBus::new();
    let emitter = NotificationEmitter::new(bus.clone())
        .with_unpublish_snapshot(settings.notify.unpublish_snapshot);

    let mut handles = Vec::with_capacity(topics.len());
    let mut printers = Vec::with_capacity(topics.len());
    for topic in topics {
        let (handle, rx) = bus.subscribe_channel(topic.clone());
        handles.push(handle);
        printers.push(tokio::spawn(script::print_events(topic, rx)));
    }

    let summary = apply_with_backend(settings, emitter, commands)?;

    // dropping the subscriptions closes the channels and ends the printers
    for handle in &handles {
        bus.unsubscribe(handle);
    }
    futures::future::join_all(printers).await;

    info!(
        applied = summary.applied,
        failed = summary.failed,
        "script finished"
    );
    Ok(())
}

fn apply_with_backend(
    settings: &Settings,
    emitter: NotificationEmitter,
    commands: Vec<ScriptCommand>,
) -> Result<script::RunSummary, Box<dyn Error>> {
    match settings.store.backend {
        StoreBackend::Memory => {
            let mut mutations = Mutations::new(MemoryStore::new(), emitter);
            Ok(script::run(&mut mutations, commands))
        }
        StoreBackend::Sled => {
            let store = SledStore::open(&settings.store.path)?;
            let mut mutations = Mutations::new(store, emitter);
            let summary = script::run(&mut mutations, commands);
            mutations.into_store().flush()?;
            Ok(summary)
        }
    }
}
