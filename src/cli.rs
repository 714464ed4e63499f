use clap::{Parser, Subcommand};

use crate::config::DEFAULT_CONFIG_PATH;

#[derive(Parser, Debug)]
#[command(name = "sensorset", about = "Inspect multi-sensor dataset experiment configs", version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Load a config and print every derived value
    Show {
        /// Path to the experiment config
        #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
        config: String,
        /// Print JSON instead of the text summary
        #[arg(long)]
        json: bool,
    },

    /// List topics with their sensor category and message type
    Topics {
        /// Path to the experiment config
        #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
        config: String,
    },

    /// Print per-car calibration transforms
    Calib {
        /// Path to the experiment config
        #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
        config: String,
    },

    /// Print the `topic` section of a standalone topic config
    TopicSection {
        /// Path to the topic config
        #[arg(default_value = DEFAULT_CONFIG_PATH)]
        path: String,
    },
}
