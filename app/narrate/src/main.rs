use anyhow::Result;
use clap::Parser;
use clap::Subcommand;
use command::completion::Completion;
use command::profiles::Profiles;
use command::synthesize::Synthesize;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

mod command;
mod config;

#[derive(Parser)]
#[command(author, version)]
#[command(about = "read markdown aloud with an azure personal voice")]
pub struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
#[command(arg_required_else_help(true))]
pub enum Command {
    #[command(about = "synthesize markdown file to audio")]
    Synthesize(Synthesize),
    #[command(about = "list trial and personal voice profiles")]
    Profiles(Profiles),
    #[command(about = "generate shell completion")]
    Completion(Completion),
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(
            tracing_subscriber::fmt::layer()
                .compact()
                .with_line_number(true)
                .with_writer(std::io::stderr),
        )
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Synthesize(command) => command.execute().await,
        Command::Profiles(command) => command.execute().await,
        Command::Completion(command) => command.execute(),
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn cli_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn synthesize_defaults_to_input_md() {
        let cli = Cli::try_parse_from(["narrate", "synthesize", "-o", "demo", "--style", "Prompt"]).unwrap();
        assert!(matches!(cli.command, Command::Synthesize(_)));

        let cli = Cli::try_parse_from(["narrate", "synthesize", "notes.md", "--dry-run"]).unwrap();
        assert!(matches!(cli.command, Command::Synthesize(_)));
    }
}
