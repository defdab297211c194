//! Main CLI parser and top-level argument handling.

use std::path::PathBuf;

use advisor_core::SandboxRealm;
use clap::Parser;

/// Command-line interface for the advisor console.
///
/// Without `--exec` or `--list-json` an interactive prompt reads commands from
/// standard input until `quit`.
#[derive(Debug, Parser)]
#[command(name = "advisor")]
#[command(about = "Run chat-style admin commands from a console")]
#[command(version)]
pub struct Cli {
    /// JSON settings file
    #[arg(long = "settings")]
    pub settings: Option<PathBuf>,

    /// Realm this console executes commands in (server, client or shared)
    #[arg(long = "realm", env = "ADVISOR_REALM")]
    pub realm: Option<SandboxRealm>,

    /// Include hidden commands in help and completion
    #[arg(long = "show-hidden")]
    pub show_hidden: bool,

    /// Roster name to run commands as
    #[arg(long = "as", default_value = "host")]
    pub operator: String,

    /// Enable verbose/debug output
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,

    /// Print every registered command as JSON and exit
    #[arg(long = "list-json", conflicts_with = "exec")]
    pub list_json: bool,

    /// Run a single command line and exit
    #[arg(short = 'e', long = "exec")]
    pub exec: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_parser_builds() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_defaults() {
        let cli = Cli::parse_from(["advisor"]);
        assert_eq!(cli.operator, "host");
        assert!(!cli.verbose);
        assert!(cli.exec.is_none());
        assert!(cli.settings.is_none());
    }

    #[test]
    fn test_global_args() {
        let cli = Cli::parse_from([
            "advisor",
            "--verbose",
            "--realm",
            "client",
            "--as",
            "bob",
            "--settings",
            "/tmp/advisor.json",
            "-e",
            "ping",
        ]);
        assert!(cli.verbose);
        assert_eq!(cli.realm, Some(SandboxRealm::Client));
        assert_eq!(cli.operator, "bob");
        assert_eq!(cli.settings, Some(PathBuf::from("/tmp/advisor.json")));
        assert_eq!(cli.exec.as_deref(), Some("ping"));
    }

    #[test]
    fn test_rejects_unknown_realm() {
        assert!(Cli::try_parse_from(["advisor", "--realm", "moon"]).is_err());
    }

    #[test]
    fn test_list_json_conflicts_with_exec() {
        assert!(Cli::try_parse_from(["advisor", "--list-json", "-e", "ping"]).is_err());
    }
}
