//! CLI entry point.
//!
//! Wires the console via bootstrap, then either prints the command catalog,
//! runs a single line, or starts the interactive prompt.

use clap::Parser;
use tracing_subscriber::EnvFilter;

use advisor_cli::{Cli, CliConfig, CliError, bootstrap, console};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Parse CLI arguments
    let cli = Cli::parse();

    // Initialize logging; RUST_LOG wins when set
    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let ctx = match bootstrap(CliConfig::from_cli(&cli)) {
        Ok(ctx) => ctx,
        Err(e) => exit_with(&e),
    };

    if cli.list_json {
        let infos: Vec<_> = ctx
            .dispatcher()
            .read_registry()
            .visible()
            .map(|command| command.info())
            .collect();
        println!("{}", serde_json::to_string_pretty(&infos)?);
        return Ok(());
    }

    if let Some(line) = cli.exec.as_deref() {
        match console::execute_line(&ctx, line) {
            Ok(replies) => {
                for reply in replies {
                    println!("{reply}");
                }
            }
            Err(e) => exit_with(&e),
        }
        return Ok(());
    }

    if let Err(e) = console::run(&ctx).await {
        exit_with(&e);
    }
    Ok(())
}

fn exit_with(err: &CliError) -> ! {
    eprintln!("Error: {err}");
    std::process::exit(err.exit_code());
}
