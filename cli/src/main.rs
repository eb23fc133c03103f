use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use std::process;
use std::time::Instant;

use anyhow::{bail, Context, Result};
use clap::{ArgAction, Parser, Subcommand, ValueHint};
use console::style;
use tracing_subscriber::EnvFilter;

use safe_wipe_core::{sanitize_path, NoopObserver, RenamePolicy, SanitizeOptions};

mod shell;
mod ui;

/// SafeWipe - Forensic-Resistant Deletion CLI
#[derive(Parser)]
#[command(name = "safewipe")]
#[command(version)]
#[command(author = "Mason Parle")]
#[command(about = "Securely erase files and directory trees")]
#[command(
    long_about = "Destroys file content with DoD 5220.22-M and Gutmann-style overwrite passes, \
obscures names through chains of random renames, then removes the entries"
)]
#[command(args_conflicts_with_subcommands = true)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress the progress display
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Skip the confirmation prompt
    #[arg(short = 'y', long, global = true)]
    yes: bool,

    /// Treat a failed directory rename as fatal instead of a warning
    #[arg(long, global = true)]
    strict_rename: bool,

    #[command(subcommand)]
    command: Option<Commands>,

    /// File or directory to securely erase
    #[arg(value_hint = ValueHint::AnyPath)]
    path: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Add a "Secure erase" entry to the file manager context menu
    Register,

    /// Remove the file manager context menu entry
    Unregister,
}

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let _ = err.print();
            // clap distinguishes usage errors with exit code 2; this
            // tool reports every failure as exit code 1.
            let code = match err.kind() {
                clap::error::ErrorKind::DisplayHelp | clap::error::ErrorKind::DisplayVersion => 0,
                _ => 1,
            };
            process::exit(code);
        }
    };

    init_tracing(cli.verbose);

    if let Err(err) = run(&cli) {
        eprintln!("{} {:#}", style("✗ Error:").red().bold(), err);
        process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<()> {
    match &cli.command {
        Some(Commands::Register) => {
            let exe = std::env::current_exe().context("failed to locate own executable")?;
            shell::register_shell_action(&exe)?;
            println!("{} Context menu entry registered", style("✓").green().bold());
            Ok(())
        }
        Some(Commands::Unregister) => {
            shell::unregister_shell_action()?;
            println!("{} Context menu entry removed", style("✓").green().bold());
            Ok(())
        }
        None => wipe(cli),
    }
}

fn wipe(cli: &Cli) -> Result<()> {
    let Some(path) = &cli.path else {
        bail!("usage: safewipe <FILE-OR-DIRECTORY>");
    };

    if !confirmed(path, cli.yes)? {
        bail!("operation cancelled by user");
    }

    let options = SanitizeOptions {
        rename_policy: if cli.strict_rename {
            RenamePolicy::Strict
        } else {
            RenamePolicy::BestEffort
        },
    };

    tracing::debug!("sanitizing '{}'", path.display());
    let started = Instant::now();

    if cli.quiet {
        sanitize_path(path, &NoopObserver, options)?;
    } else {
        let observer = ui::ConsoleObserver::new();
        let result = sanitize_path(path, &observer, options);
        observer.clear();
        result?;
    }

    println!(
        "{} Securely erased '{}' [took {:.2}s]",
        style("✓").green().bold(),
        path.display(),
        started.elapsed().as_secs_f32()
    );

    Ok(())
}

/// Ask before destroying data, unless `--yes` was given or there is no
/// interactive terminal to ask on.
fn confirmed(path: &Path, assume_yes: bool) -> Result<bool> {
    if assume_yes || !std::io::stdin().is_terminal() {
        return Ok(true);
    }

    dialoguer::Confirm::new()
        .with_prompt(format!(
            "Permanently destroy '{}'? This cannot be undone",
            path.display()
        ))
        .default(false)
        .interact()
        .context("failed to read confirmation")
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
