pub mod api;
pub mod cli;
pub mod config;
pub mod database;
pub mod domain;
pub mod errors;
pub mod rating;
pub mod services;

use anyhow::Result;
use clap::Parser;
use cli::Cli;
use log::info;

use crate::cli::Command;
use crate::config::settings::AppConfig;
use crate::database::SqliteRepository;
use crate::services::recalculation::RecalculationService;
use crate::services::server::ServerService;

pub fn interpret() -> Command {
    let cli = Cli::parse();
    cli.command
}

pub fn handle_serve(port: u16) -> Result<()> {
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(async {
        let config = AppConfig::new();
        let service = ServerService::new(port, config);
        service.run().await
    })
}

pub fn handle_init() -> Result<()> {
    let config = AppConfig::new();
    open_repository(&config)?;
    info!("Schema ready in {}", config.database.path);
    Ok(())
}

pub fn handle_recalculate(repair: bool) -> Result<()> {
    let config = AppConfig::new();
    let service = RecalculationService::new(open_repository(&config)?);
    let report = service.run(repair)?;
    println!("{}", report.render());
    Ok(())
}

fn open_repository(config: &AppConfig) -> Result<SqliteRepository> {
    let pool = database::create_pool(&config.database.path)?;
    SqliteRepository::open(pool)
}
