// Dotlanth
// Copyright (C) 2025 Synerthink

// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.

// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU Affero General Public License for more details.

// You should have received a copy of the GNU Affero General Public License
// along with this program.  If not, see <http://www.gnu.org/licenses/>.

//! Luddite CLI Tool
//!
//! Main entry point for the `luddite` command-line interface.

use clap::{Parser, Subcommand};
use luddite_tools::{CompileArgs, InspectArgs, run_compile, run_inspect};
use std::process;
use tracing::error;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "luddite")]
#[command(about = "Luddite - UDL lexer table compiler")]
#[command(version = "0.1.0")]
struct Cli {
    /// Debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile a grammar tree into a lexer table
    Compile(CompileArgs),
    /// Summarize a compiled resource table
    Inspect(InspectArgs),
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Compile(args) => run_compile(&args).map(|summary| {
            println!("{}", summary.output.display());
        }),
        Commands::Inspect(args) => run_inspect(&args).map(|text| {
            print!("{text}");
        }),
    };

    if let Err(err) = result {
        error!("{err:#}");
        eprintln!("luddite: {err:#}");
        process::exit(1);
    }
}
