use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "capmix")]
#[command(about = "Caption-burning video generator TUI", long_about = None)]
pub struct Cli {
    /// Host command to spawn (overrides config)
    #[arg(long, value_name = "COMMAND")]
    pub host: Option<String>,

    /// Extra argument passed to the host command (repeatable)
    #[arg(long = "host-arg", value_name = "ARG")]
    pub host_args: Vec<String>,

    /// Header title (overrides config)
    #[arg(long)]
    pub title: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show config status and location, or create default config if missing
    InitConfig,
}

pub fn parse() -> Cli {
    Cli::parse()
}
