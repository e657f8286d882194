use std::time::Duration;
use clap::{Args, Parser, Subcommand};
use crate::grid::GridConfig;

#[derive(Debug, Parser)]
#[command(name = "smartpark", about = "Parking slot grid with simulated occupancy")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Serve the grid over HTTP
    Web(WebArgs),
    /// Print the grid in the terminal while it drifts
    Simulate(SimulateArgs),
}

/// Grid shape and simulation cadence
#[derive(Debug, Clone, Args)]
pub struct GridArgs {
    #[arg(long, default_value_t = 5, allow_negative_numbers = true)]
    pub rows: i64,

    #[arg(long, default_value_t = 5, allow_negative_numbers = true)]
    pub cols: i64,

    /// Milliseconds between simulated occupancy changes
    #[arg(long, default_value_t = 5000)]
    pub tick_ms: u64,

    /// Seed for reproducible layouts and drift
    #[arg(long)]
    pub seed: Option<u64>,
}

impl GridArgs {
    pub fn grid_config(&self) -> GridConfig {
        GridConfig {
            rows: self.rows,
            cols: self.cols,
            tick_interval: Duration::from_millis(self.tick_ms.max(1)),
            seed: self.seed,
        }
    }
}

#[derive(Debug, Clone, Args)]
pub struct WebArgs {
    #[arg(long, default_value_t = 8080)]
    pub port: u16,

    /// Password for owner-only routes
    #[arg(long, env = "OWNER_PASSWORD", default_value = "admin123", hide_env_values = true)]
    pub owner_password: String,

    /// Whether drivers may pick slots on the grid page
    #[arg(long, default_value_t = true, action = clap::ArgAction::Set)]
    pub selectable: bool,

    #[command(flatten)]
    pub grid: GridArgs,
}

#[derive(Debug, Clone, Args)]
pub struct SimulateArgs {
    /// Number of ticks to show before exiting
    #[arg(long, default_value_t = 10)]
    pub ticks: u32,

    /// Slot to keep selected while the grid drifts
    #[arg(long)]
    pub select: Option<String>,

    #[command(flatten)]
    pub grid: GridArgs,
}
