use clap::Parser;
use console::style;
use log::info;

use lulu_journal::{App, Cli, Config};

pub fn initialize_logger(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp_secs()
        .format_module_path(true)
        .init();

    info!("Logger initialized");
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    initialize_logger(cli.verbose);
    info!("Application starting up");

    if let Err(e) = run(cli).await {
        eprintln!("{} {}", style("error:").red().bold(), e);
        std::process::exit(1);
    }

    info!("Application shutting down");
}

async fn run(cli: Cli) -> lulu_journal::Result<()> {
    let mut config = Config::load(cli.config)?;
    if let Some(data_dir) = cli.data_dir {
        config.data_dir = data_dir;
    }

    let mut app = App::new(config, cli.verbose)?;
    app.run(cli.command).await
}
