//! fm24-real - Main entry point

use anyhow::Result;
use clap::{CommandFactory, Parser};
use fm24_real::cli::{self, Action, AssumeYes, Context, Prompt, StdinPrompt};
use fm24_real::{config, utils, Config, ToolError};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(name = "fm24-real", author, version, about, long_about = None)]
struct Args {
    /// Check whether the licence files are still present
    #[arg(short, long)]
    check: bool,

    /// Back up and delete the licence files
    #[arg(short, long)]
    apply: bool,

    /// Re-apply after a game update restored the files
    #[arg(short, long)]
    update: bool,

    /// Write the default config file
    #[arg(short, long)]
    init: bool,

    /// Path to configuration file (default: ~/.config/fm24-real/config.toml)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Database directory to use instead of searching (.../data/database/db)
    #[arg(short, long, value_name = "DIR")]
    path: Option<PathBuf>,

    /// Answer yes to every confirmation
    #[arg(short = 'y', long)]
    yes: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long)]
    log_level: Option<String>,
}

fn main() -> ExitCode {
    let args = Args::parse();

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {:#}", e);
            if matches!(
                e.downcast_ref::<ToolError>(),
                Some(ToolError::Config(_) | ToolError::TomlDe(_))
            ) {
                eprintln!("hint: 'fm24-real --init' writes a default config file");
            }
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<()> {
    let Some(action) = Action::select(args.init, args.check, args.apply, args.update) else {
        Args::command().print_help()?;
        return Ok(());
    };

    let config_path = args.config.clone().unwrap_or_else(config::default_config_path);
    let mut prompt: Box<dyn Prompt> = if args.yes {
        Box::new(AssumeYes)
    } else {
        Box::new(StdinPrompt)
    };
    let mut stdout = std::io::stdout();

    if action == Action::Init {
        utils::logger::init(args.log_level.as_deref().unwrap_or("warn"))?;
        cli::init(&config_path, &mut stdout, prompt.as_mut())?;
        return Ok(());
    }

    let config = Config::load_or_default(&config_path)?;

    // Initialize logging
    let log_level = args.log_level.as_deref().unwrap_or(&config.log.level);
    utils::logger::init(log_level)?;

    tracing::info!(
        "Starting fm24-real v{} (config: {})",
        env!("CARGO_PKG_VERSION"),
        config_path.display()
    );

    let ctx = Context::new(&config, args.path.as_deref());
    if action == Action::Check {
        cli::check(&ctx, &mut stdout)?;
    } else if action == Action::Apply {
        cli::apply(&ctx, &mut stdout, prompt.as_mut())?;
    } else {
        cli::update(&ctx, &mut stdout, prompt.as_mut())?;
    }

    Ok(())
}
