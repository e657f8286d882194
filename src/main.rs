use clap::Parser;
use tracing_subscriber::EnvFilter;
use smartpark::config::{Cli, Command, SimulateArgs};
use smartpark::display::print_grid;
use smartpark::grid::{SlotGridManager, SlotId};
use smartpark::web;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Web(args) => {
            println!("Access the site at http://localhost:{}", args.port);
            web::start_server(args.port, args.owner_password, args.selectable, args.grid.grid_config()).await
        }
        Command::Simulate(args) => simulate(args).await,
    }
}

/// Terminal mode: let the grid drift and print it once per tick
async fn simulate(args: SimulateArgs) -> anyhow::Result<()> {
    let config = args.grid.grid_config();
    let grid = SlotGridManager::new(config, None)?;
    if let Some(id) = args.select {
        grid.select(SlotId::new(id))?;
    }

    let snapshot = grid.snapshot();
    print_grid("Initial layout", &snapshot.render(true), &snapshot.summary(), None);

    // sample halfway between ticks
    tokio::time::sleep(config.tick_interval / 2).await;
    for tick in 1..=args.ticks {
        tokio::time::sleep(config.tick_interval).await;
        let snapshot = grid.snapshot();
        let events = grid.events();
        print_grid(&format!("Tick {}", tick), &snapshot.render(true), &snapshot.summary(), events.first());
    }

    Ok(())
}
