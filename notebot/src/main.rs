//! notebot — an assistant whose only memory is a directory of notes.

use clap::Parser;
use dotenv::dotenv;
use std::sync::Arc;

mod agent;
mod ai;
mod config;
mod directives;
mod error;
mod notes;

use agent::{Agent, Conversation};
use ai::OpenAiClient;
use config::{Cli, Config};
use notes::NoteStore;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    dotenv().ok();
    env_logger::init();

    let cli = Cli::parse();
    let config = match Config::from_cli(cli) {
        Ok(config) => config,
        Err(e) => {
            log::error!("Invalid configuration: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = config::initialize_notes_dir(&config.notes_dir) {
        log::error!("{}", e);
        std::process::exit(1);
    }

    let client = match OpenAiClient::new(&config.ai) {
        Ok(client) => client,
        Err(e) => {
            log::error!("Failed to create completion client: {}", e);
            std::process::exit(1);
        }
    };

    log::info!(
        "Using model {} at {} (path rule: {:?})",
        config.ai.model,
        config.ai.base_url,
        config.path_rule
    );

    let store = NoteStore::new(config.notes_dir.clone(), config.path_rule);
    let agent = Agent::new(store, Arc::new(client));
    let mut conversation = Conversation::new();

    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    if let Err(e) = agent::run_repl(&agent, &mut conversation, stdin.lock(), stdout.lock()).await {
        log::error!("Session ended with an error: {}", e);
        std::process::exit(1);
    }
}
