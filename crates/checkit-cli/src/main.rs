mod cli;
mod context;
mod handlers;
mod output;

use checkit_sheets::{HttpSheetSource, SheetLoader};
use checkit_tui::App;
use clap::{CommandFactory, Parser};
use cli::{Cli, Commands};
use context::CliContext;
use std::sync::Arc;

fn init_tracing(interactive: bool) -> anyhow::Result<()> {
    if let Ok(log_path) = std::env::var("CHECKIT_DEBUG_LOG") {
        let log_file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_path)?;

        tracing_subscriber::fmt()
            .with_writer(log_file)
            .with_max_level(tracing::Level::DEBUG)
            .with_target(true)
            .with_thread_ids(true)
            .with_file(true)
            .with_line_number(true)
            .with_ansi(false)
            .init();
    } else if !interactive {
        tracing_subscriber::fmt()
            .with_writer(std::io::stderr)
            .with_max_level(tracing::Level::WARN)
            .init();
    }
    // the TUI owns the terminal, so without a log file nothing is installed
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.command.is_none())?;

    let Some(command) = cli.command else {
        let ctx = CliContext::load(cli.store)?;
        let loader = SheetLoader::new(Arc::new(HttpSheetSource::new(&ctx.settings)?));
        let mut app = App::new(ctx.store(), loader, ctx.settings.clone());
        app.run().await?;
        return Ok(());
    };

    if let Commands::Completions { shell } = command {
        clap_complete::generate(shell, &mut Cli::command(), "checkit", &mut std::io::stdout());
        return Ok(());
    }

    let ctx = match CliContext::load(cli.store) {
        Ok(ctx) => ctx,
        Err(e) => output::output_error(&e.to_string()),
    };

    let result = match command {
        Commands::Config(config_cmd) => handlers::config::handle(&ctx, config_cmd.action).await,
        Commands::Fetch(args) => handlers::fetch::handle(&ctx, args).await,
        Commands::Order(order_cmd) => handlers::order::handle(&ctx, order_cmd.action).await,
        Commands::Export(args) => handlers::export::handle(&ctx, args).await,
        Commands::Completions { .. } => Ok(()),
    };

    if let Err(e) = result {
        tracing::debug!("Command failed: {}", e);
        output::output_error(&e.to_string());
    }

    Ok(())
}
