//! Console front end: one line in, replies out.

use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::debug;

use crate::binder::parse_line;
use crate::bootstrap::CliContext;
use crate::context::ConsoleContext;
use crate::error::CliError;

/// Bind and dispatch a single console line, returning the replies.
pub fn execute_line(ctx: &CliContext, line: &str) -> Result<Vec<String>, CliError> {
    let invocation = {
        let registry = ctx.dispatcher.read_registry();
        parse_line(&registry, line, &ctx.roster)?
    };

    let console = Arc::new(ConsoleContext::new(
        ctx.operator.clone(),
        invocation.targets,
        ctx.dispatcher.host_realm(),
    ));
    ctx.dispatcher
        .execute(&invocation.command, console.clone(), invocation.args)?;
    Ok(console.take_replies())
}

/// Read commands from stdin until `quit`, `exit` or end of input.
pub async fn run(ctx: &CliContext) -> Result<(), CliError> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();

    loop {
        stdout
            .write_all(format!("{}> ", ctx.operator.name).as_bytes())
            .await?;
        stdout.flush().await?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if line.eq_ignore_ascii_case("quit") || line.eq_ignore_ascii_case("exit") {
            break;
        }

        match execute_line(ctx, line) {
            Ok(replies) => {
                for reply in replies {
                    stdout.write_all(format!("{reply}\n").as_bytes()).await?;
                }
            }
            Err(e) => {
                debug!(line, error = %e, "Command failed");
                eprintln!("Error: {e}");
            }
        }
    }

    Ok(())
}
