pub mod commands;
pub mod utils;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "cm")]
#[command(about = "cm - Command-line interface for the doctor and hospital registry API")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, help = "Output in JSON format")]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Run the HTTP server")]
    Serve {
        #[arg(long, help = "Port to listen on (overrides PORT)")]
        port: Option<u16>,
    },

    #[command(about = "Account management")]
    Account {
        #[command(subcommand)]
        cmd: commands::account::AccountCommands,
    },

    #[command(about = "Print a bcrypt hash for manual seeding")]
    HashPassword {
        #[arg(help = "Password to hash")]
        password: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_cli(cli: &Cli) -> Self {
        if cli.json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let output_format = OutputFormat::from_cli(&cli);

    match cli.command {
        Commands::Serve { port } => commands::serve::handle(port).await,
        Commands::Account { cmd } => commands::account::handle(cmd, output_format).await,
        Commands::HashPassword { password } => commands::hash::handle(&password, output_format),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_account_create() {
        let cli = Cli::try_parse_from([
            "cm", "--json", "account", "create", "--email", "a@b.co", "--name", "A", "--password", "password123",
        ])
        .unwrap();
        assert_eq!(OutputFormat::from_cli(&cli), OutputFormat::Json);
        assert!(matches!(cli.command, Commands::Account { .. }));
    }

    #[test]
    fn parses_serve_port() {
        let cli = Cli::try_parse_from(["cm", "serve", "--port", "8080"]).unwrap();
        assert!(matches!(cli.command, Commands::Serve { port: Some(8080) }));
    }
}
