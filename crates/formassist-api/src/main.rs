//! formassist command-line client.
//!
//! Binary name: `fassist`
//!
//! Parses CLI arguments, resolves configuration, then dispatches to the
//! command handler. Every invocation is its own backend session.

mod cli;
mod state;

use clap::Parser;
use clap_complete::generate;

use cli::{Cli, Commands};
use formassist_observe::tracing_setup::{init_tracing, shutdown_tracing, verbosity_filter};
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_tracing(verbosity_filter(cli.verbose, cli.quiet), cli.otel)
        .map_err(|e| anyhow::anyhow!("failed to initialize tracing: {e}"))?;

    let result = run(cli).await;
    shutdown_tracing();
    result
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    // Shell completions don't need configuration
    if let Commands::Completions { shell } = &cli.command {
        let mut cmd = <Cli as clap::CommandFactory>::command();
        generate(*shell, &mut cmd, "fassist", &mut std::io::stdout());
        return Ok(());
    }

    let state = AppState::init(cli.backend_url.clone(), cli.download_dir.as_deref()).await?;

    match cli.command {
        Commands::Forms => {
            cli::forms::list_forms(&state, cli.json, cli.quiet).await?;
        }

        Commands::Ask { message } => {
            cli::ask::ask(&state, &message.join(" "), cli.json, cli.quiet).await?;
        }

        Commands::Upload { paths, fill } => {
            cli::upload::upload(&state, &paths, fill.as_deref(), cli.json, cli.quiet).await?;
        }

        Commands::Chat { form } => {
            cli::chat::loop_runner::run_chat_loop(&state, form).await?;
        }

        Commands::Completions { .. } => {}
    }

    Ok(())
}
