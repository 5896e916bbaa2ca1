mod generate;
mod init;

pub use generate::GenerateCommand;
pub use init::InitCommand;

use anyhow::Result;
use clap::{Parser, Subcommand};

/// hookgen - typed React hooks from Foundry build artifacts
#[derive(Parser)]
#[command(name = "hookgen")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable debug logging.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI commands.
#[derive(Subcommand)]
pub enum Commands {
    /// Generate bindings from the configuration file.
    Generate(GenerateCommand),

    /// Create a configuration file in the current directory.
    Init(InitCommand),
}

impl Cli {
    /// Execute the CLI command.
    pub fn execute(self) -> Result<()> {
        // Load .env before the config is read so ${VAR} substitution sees it.
        dotenvy::dotenv().ok();

        let log_level = if self.verbose { "debug" } else { "warn" };
        tracing_subscriber::fmt()
            .with_env_filter(std::env::var("RUST_LOG").unwrap_or_else(|_| log_level.to_string()))
            .with_writer(std::io::stderr)
            .init();

        match self.command {
            Commands::Generate(cmd) => cmd.execute(),
            Commands::Init(cmd) => cmd.execute(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_generate() {
        let cli = Cli::try_parse_from(["hookgen", "generate"]).unwrap();
        match cli.command {
            Commands::Generate(cmd) => {
                assert_eq!(cmd.config, "hookgen.toml");
                assert!(!cmd.no_build);
                assert!(!cmd.dry_run);
            }
            _ => panic!("expected generate"),
        }
    }

    #[test]
    fn test_cli_parse_generate_flags() {
        let cli = Cli::try_parse_from([
            "hookgen",
            "-v",
            "generate",
            "--config",
            "contracts/hookgen.toml",
            "--root",
            "contracts",
            "--no-build",
            "--dry-run",
        ])
        .unwrap();
        assert!(cli.verbose);
        let Commands::Generate(cmd) = cli.command else {
            panic!("expected generate");
        };
        assert_eq!(cmd.root.as_deref(), Some(std::path::Path::new("contracts")));
        assert!(cmd.no_build);
        assert!(cmd.dry_run);
    }

    #[test]
    fn test_cli_parse_init() {
        let cli = Cli::try_parse_from(["hookgen", "init", "--force"]);
        assert!(cli.is_ok());
    }

    #[test]
    fn test_cli_rejects_unknown_command() {
        assert!(Cli::try_parse_from(["hookgen", "deploy"]).is_err());
    }
}
