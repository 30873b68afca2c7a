use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "summarize-api")]
#[command(about = "Article summarization REST backend")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    #[command(about = "Apply migrations and start the HTTP server (default)")]
    Serve {
        #[arg(long, help = "Port to listen on, overrides PORT")]
        port: Option<u16>,

        #[arg(long, help = "Don't run database migrations on startup")]
        skip_migrations: bool,
    },

    #[command(about = "Apply database migrations and exit")]
    Migrate,
}

impl Cli {
    /// The subcommand to run; no subcommand means `serve` with defaults.
    pub fn command_or_default(&self) -> Commands {
        self.command.clone().unwrap_or(Commands::Serve {
            port: None,
            skip_migrations: false,
        })
    }
}
