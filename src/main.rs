use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt};

use sensorset::calib::load_calibrations;
use sensorset::cli::{Cli, Commands};
use sensorset::config::{Config, parse_topic_section};
use sensorset::dataset::DatasetConfig;
use sensorset::summary;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    // stdout carries command output
    fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
}

fn load(path: &str) -> Result<Config> {
    Config::load(path).with_context(|| format!("failed to load config: {path}"))
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    match cli.command {
        Commands::Show { config, json } => {
            let cfg = load(&config)?;
            let dataset = DatasetConfig::from_config(&cfg)
                .with_context(|| format!("failed to derive dataset config from {config}"))?;
            if json {
                println!("{}", serde_json::to_string_pretty(&dataset)?);
            } else {
                print!("{}", summary::format_summary(&dataset));
            }
            Ok(())
        }
        Commands::Topics { config } => {
            let cfg = load(&config)?;
            let infos = cfg.topic_tree()?.topic_infos(&cfg.msg_type)?;
            summary::topics_table(&infos).printstd();
            Ok(())
        }
        Commands::Calib { config } => {
            let cfg = load(&config)?;
            let cars = load_calibrations(&cfg)?;
            print!("{}", summary::format_calibrations(cars.as_ref()));
            Ok(())
        }
        Commands::TopicSection { path } => {
            if let Some(topic) = parse_topic_section(&path)? {
                print!("{}", serde_yaml::to_string(&topic)?);
            }
            Ok(())
        }
    }
}
