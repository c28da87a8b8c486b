mod cli;
mod commands;
mod identity;

use anyhow::Result;
use clap::Parser;
use planclave_config::Config;

use cli::Cli;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let config_path = Config::config_path();
    let config = Config::load()?;
    match &config {
        Some(_) => log::debug!("loaded config from {}", config_path.display()),
        None => log::debug!("no config file at {}", config_path.display()),
    }

    commands::run(cli, config)
}
