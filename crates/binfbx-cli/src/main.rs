//! binfbx tools - command-line front end for binfbx mesh containers
//!
//! One executable dispatching to a named tool. `binfbx` inspects, edits and
//! re-encodes a mesh container.

use clap::{ArgAction, Parser, Subcommand};
use colored::Colorize;
use std::io::{self, Write};
use std::process::ExitCode;

use binfbx_cli::commands;
use binfbx_cli::logging;

/// Exit status for any fatal error (-1 as a process status).
const EXIT_FAILURE: u8 = 255;

/// binfbx tools - mesh container inspection and editing
#[derive(Parser)]
#[command(name = "binfbx-tools")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Increase log output (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Decode a mesh container, remove meshes, dump it or write it back
    Binfbx {
        /// Path to the input container
        #[arg(short, long = "in")]
        input: String,

        /// Re-encode the container to this path
        #[arg(short, long = "out")]
        output: Option<String>,

        /// Print a human-readable report
        #[arg(long)]
        dump: bool,

        /// Report detail level
        #[arg(long, default_value = "detailed", value_parser = ["summary", "detailed", "full"])]
        detail: String,

        /// Output machine-readable JSON instead of colored text
        #[arg(long)]
        json: bool,

        /// Remove a mesh by group, LOD and position within the LOD (repeatable)
        #[arg(
            long,
            num_args = 3,
            value_names = ["GROUP", "LOD", "INDEX"],
            action = ArgAction::Append
        )]
        remove: Vec<u32>,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(cli.verbose, cli.quiet);

    let result = match cli.command {
        Commands::Binfbx {
            input,
            output,
            dump,
            detail,
            json,
            remove,
        } => run_binfbx(&input, output.as_deref(), dump, &detail, json, &remove),
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            let _ = report_error(&mut io::stdout(), &e);
            ExitCode::from(EXIT_FAILURE)
        }
    }
}

/// Fatal errors go to standard output next to the command's own output;
/// logs stay on standard error.
fn report_error<W: Write>(out: &mut W, e: &anyhow::Error) -> io::Result<()> {
    writeln!(out, "{}: {:#}", "error".red(), e)
}

fn run_binfbx(
    input: &str,
    output: Option<&str>,
    dump: bool,
    detail: &str,
    json: bool,
    remove: &[u32],
) -> anyhow::Result<ExitCode> {
    let removals = commands::binfbx::parse_removals(remove)?;
    let dump = if dump {
        Some(commands::binfbx::parse_verbosity(detail)?)
    } else {
        None
    };
    commands::binfbx::run(&commands::binfbx::BinfbxOptions {
        input,
        output,
        removals: &removals,
        dump,
        json,
    })
}
