pub mod cli;
pub mod collate;
pub mod commands;
pub mod config;
pub mod data;
pub mod error;
pub mod event;
pub mod event_cmd;
pub mod filter;
pub mod format;
pub mod io_utils;
pub mod loader;
pub mod media;
pub mod parser;
pub mod quotation;
pub mod quote_cmd;
pub mod record;
pub mod sort;
pub mod stats;
pub mod table;

use std::{env, sync::OnceLock};

use anyhow::Result;
use clap::Parser;
use log::LevelFilter;

use crate::cli::{Cli, Commands};

static LOGGER: OnceLock<()> = OnceLock::new();

fn init_logging() {
    LOGGER.get_or_init(|| {
        let mut builder = env_logger::Builder::from_env(env_logger::Env::default());
        if env::var("RUST_LOG").is_err() {
            builder.filter_module("sheetboard", LevelFilter::Info);
        }
        let _ = builder.format_timestamp_millis().try_init();
    });
}

pub fn run() -> Result<()> {
    init_logging();
    let cli = Cli::parse();
    match &cli.command {
        Commands::Quotes(command) => quote_cmd::execute(command),
        Commands::Events(command) => event_cmd::execute(command),
    }
}
