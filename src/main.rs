//! viberules CLI
//!
//! Command-line interface for managing AI assistant rules through symlinks.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::env;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use viberules::{Error, Mode, Project, RulesFileState, TargetChange, init, targets};

#[derive(Parser)]
#[command(name = "viberules")]
#[command(
    author,
    version,
    about = "AI assistant rules management tool using symlinks",
    long_about = "Manage a single rules file (.viberules/rules.md) for AI coding assistants \
                  (Claude Code, Amazon Q Developer, Gemini Code Assist, OpenAI Codex) and keep \
                  each assistant's rules file linked to it."
)]
#[command(propagate_version = true)]
struct Cli {
    /// Project root directory (default: current directory)
    #[arg(short, long, global = true)]
    path: Option<PathBuf>,

    /// Show debug logs
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize viberules in the project
    Init {
        /// Reinitialize an existing project (rules.md is preserved)
        #[arg(short, long)]
        force: bool,
    },

    /// Enable a target and create its symlink
    Add {
        /// Target name (claude, amazonq, gemini, codex)
        target: String,
    },

    /// Disable a target and remove its symlink
    Remove {
        /// Target name (claude, amazonq, gemini, codex)
        target: String,
    },

    /// List enabled and available targets
    List,

    /// Get or set the project mode
    ///
    /// public: .viberules/rules.md is tracked by git (shared rules).
    /// local: the .viberules directory is ignored by git (personal rules).
    Mode {
        /// New mode: public or local
        mode: Option<String>,
    },

    /// Check the symlinks of all enabled targets
    Status(commands::status::StatusArgs),

    /// Remove all managed symlinks
    Clean,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if cfg!(windows) {
        return Err(Error::UnsupportedPlatform.into());
    }

    let project_root = match cli.path {
        Some(path) => path,
        None => env::current_dir()?,
    };
    let project = Project::new(project_root);

    match cli.command {
        Commands::Init { force } => {
            println!("{}", "Initializing viberules project...\n".cyan());

            let report = project.initialize(force, init::DEFAULT_RULES_MD)?;

            if report.reinitialized {
                println!("  {} Reinitialized existing project", "!".yellow());
            }
            match report.rules_file {
                RulesFileState::Created => {
                    println!("  {} Created: {}", "✔".green(), targets::RULES_FILE)
                }
                RulesFileState::Preserved => {
                    println!("  {} Preserved: {}", "✔".green(), targets::RULES_FILE)
                }
            }
            println!(
                "  {} Updated .gitignore ({} mode)",
                "✔".green(),
                report.mode
            );
            for target in targets::all_targets() {
                for link in target.links {
                    println!(
                        "  {} Linked: {} -> {}",
                        "✔".green(),
                        link.target,
                        link.source
                    );
                }
            }

            println!("\n{}", "✨ viberules project initialized!".green().bold());
            println!(
                "\nNext steps:\n  1. Edit {} to write your project rules\n  2. Run {} to drop targets you don't use",
                targets::RULES_FILE.cyan(),
                "viberules remove <target>".cyan()
            );
        }

        Commands::Add { target } => match project.add_target(&target)? {
            TargetChange::AlreadyEnabled => {
                println!("{} Target '{}' is already enabled", "!".yellow(), target);
            }
            _ => println!("{} Target '{}' added", "✔".green(), target),
        },

        Commands::Remove { target } => match project.remove_target(&target)? {
            TargetChange::NotEnabled => {
                println!("{} Target '{}' is not enabled", "!".yellow(), target);
            }
            _ => println!("{} Target '{}' removed", "✔".green(), target),
        },

        Commands::List => {
            let enabled = project.enabled_targets()?;

            println!("{}", "Enabled targets:".bold());
            if enabled.is_empty() {
                println!("  {}", "(none)".dimmed());
            }
            for name in &enabled {
                println!("  - {}", name);
            }

            println!("\n{}", "Available targets:".bold());
            for target in targets::all_targets() {
                println!("  - {} {}", target.name, target.description.dimmed());
            }
        }

        Commands::Mode { mode: None } => {
            println!("Current mode: {}", project.mode()?);
        }

        Commands::Mode { mode: Some(value) } => {
            let mode: Mode = value.parse()?;
            project.set_mode(mode)?;

            println!("{} Project mode set to '{}'", "✔".green(), mode);
            match mode {
                Mode::Public => {
                    println!("  {} will be tracked by git", targets::RULES_FILE);
                    println!("  {} will be ignored by git", viberules::config::CONFIG_FILE);
                }
                Mode::Local => {
                    println!("  {}/ will be ignored by git", targets::VIBERULES_DIR);
                }
            }
        }

        Commands::Status(args) => commands::status::run_status(args, &project)?,

        Commands::Clean => {
            project.clean()?;
            println!("{} Removed all managed symlinks", "✔".green());
        }
    }

    Ok(())
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("viberules=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
