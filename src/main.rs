mod cli;
mod error;
mod pipeline;
mod sampler;
mod train;
mod video;

use anyhow::Result;
use cli::{Args, Command};

fn main() -> Result<()> {
    // Load environment variables from .env if present
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt::init();

    let args = Args::parse_args();

    match args.command {
        Command::Sample(cfg) => sampler::run(&cfg),
        Command::Track(cfg) => pipeline::runner::run(&cfg),
        Command::Train(cfg) => train::run(&cfg),
    }
}
