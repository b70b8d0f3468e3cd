//! promptr CLI entry point.

use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;

use promptr::{session, Config, Prompter, PrompterOptions};

#[derive(Parser)]
#[command(
    name = "promptr",
    version,
    about = "Terminal teleprompter - timed token-by-token script playback"
)]
struct Cli {
    /// Script file to play; reads stdin when omitted
    file: Option<PathBuf>,

    /// Playback speed multiplier (0.1 - 10.0)
    #[arg(short, long)]
    speed: Option<f64>,

    /// Start playing immediately
    #[arg(long)]
    auto_start: bool,

    /// Named color for the script text
    #[arg(long)]
    color: Option<String>,

    /// Requested font size (recognized; terminals render at their own)
    #[arg(long)]
    font_size: Option<u16>,

    /// Requested font family (recognized; terminals render their own)
    #[arg(long)]
    font_family: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate shell completions
    Completions {
        /// Target shell
        shell: Shell,
    },
}

fn read_script(file: Option<&PathBuf>) -> Result<String> {
    match file {
        Some(path) => {
            fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
        }
        None => {
            let mut script = String::new();
            io::stdin()
                .read_to_string(&mut script)
                .context("failed to read script from stdin")?;
            Ok(script)
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Some(Commands::Completions { shell }) = cli.command {
        clap_complete::generate(shell, &mut Cli::command(), "promptr", &mut io::stdout());
        return Ok(());
    }

    let config = Config::load().unwrap_or_default();
    let script = read_script(cli.file.as_ref())?;

    let options = PrompterOptions {
        initial_script: script,
        font_size: cli.font_size.unwrap_or(config.font_size),
        font_family: cli.font_family.unwrap_or(config.font_family),
        text_color: cli.color.unwrap_or(config.text_color),
        auto_start: cli.auto_start || config.auto_start,
        speed: cli.speed.unwrap_or(config.speed),
    };

    // An empty script is fatal before the terminal is touched, so the
    // caller just sees the error and its shell prompt back.
    let mut prompter = Prompter::new(options)?;
    session::run(&mut prompter)
}
