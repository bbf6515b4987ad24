use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use harskill::cli;

#[derive(Parser)]
#[command(name = "harskill", version)]
#[command(about = "Turn a HAR capture into an API client and skill bundle", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze a HAR capture and generate a client (or export a skill bundle)
    Analyze {
        /// Path to the HAR capture
        capture: String,

        /// Directory to export the skill bundle into (prints the client if omitted)
        #[arg(short = 'o', long)]
        output: Option<String>,

        /// Path to config file (defaults to ./harskill.toml or ~/.config/harskill/config.toml)
        #[arg(long)]
        config: Option<String>,

        /// Mask credential values in the generated client and exported files
        #[arg(long)]
        redact: bool,

        /// Verbose logging (per-entry classification decisions)
        #[arg(short, long)]
        verbose: bool,
    },
    /// Print a shell completion script
    Completions {
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Analyze {
            capture,
            output,
            config,
            redact,
            verbose,
        } => {
            init_logging(verbose);
            cli::analyze::run(capture, output, config, redact)?;
        }
        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            clap_complete::generate(shell, &mut cmd, "harskill", &mut std::io::stdout());
        }
    }

    Ok(())
}
