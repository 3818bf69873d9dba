use clap::Parser;
use parley_common::Provider;

/// Parley, a terminal chat client for Gemini, Mistral and GROQ.
#[derive(Parser, Debug)]
#[command(name = "parley", version, about)]
pub struct Args {
    /// Provider to start with (gemini, mistral, groq).
    #[arg(short, long)]
    pub provider: Option<Provider>,

    /// Model to start with.
    #[arg(short, long)]
    pub model: Option<String>,

    /// Config file path override.
    #[arg(long)]
    pub config: Option<String>,

    /// Log level override (debug, info, warn, error).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Keep conversations in memory only.
    #[arg(long)]
    pub ephemeral: bool,

    /// Disable coloured output.
    #[arg(long)]
    pub no_color: bool,
}

pub fn parse() -> Args {
    Args::parse()
}
