/*
Copyright 2025 Connor Nolan

Licensed under the Apache License, Version 2.0 (the "License");
you may not use this file except in compliance with the License.
You may obtain a copy of the License at

    http://www.apache.org/licenses/LICENSE-2.0

Unless required by applicable law or agreed to in writing, software
distributed under the License is distributed on an "AS IS" BASIS,
WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
See the License for the specific language governing permissions and
limitations under the License.
*/

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use basys3_asm::assembler;
use basys3_asm::config::Config;
use basys3_asm::file_reader::AsmFileReader;
use basys3_asm::rom_writer::{self, DryRunProgrammer};
use clap::Parser;
use tracing_subscriber::EnvFilter;

/// Two-pass assembler translating Basys3 educational-CPU source into
/// fixed-width binary machine words.
#[derive(Parser)]
#[command(version, about)]
struct Opts {
    /// Assembly source file to translate.
    input: PathBuf,

    /// Output file for the assembled machine code.
    #[arg(short, long, default_value = "output.txt")]
    output: PathBuf,

    /// JSON configuration describing the instruction set and word layout.
    #[arg(short, long, default_value = "utils/setup.json")]
    setup: PathBuf,

    /// Print detailed tracing for every emitted word.
    #[arg(short, long)]
    verbose: bool,

    /// Re-raise the full error chain instead of just printing a summary.
    #[arg(long)]
    debug: bool,

    /// Program the board's ROM after a successful assembly.
    #[arg(long)]
    program_board: bool,

    /// Serial port to use when programming the board.
    #[arg(long)]
    port: Option<String>,

    /// Prepend synthetic instructions that load each DATA cell's initial value.
    #[arg(long)]
    load_data: bool,
}

fn main() -> ExitCode {
    let opts = Opts::parse();

    let default_filter = if opts.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into()))
        .init();

    match run(&opts) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err:#}");
            if opts.debug {
                for cause in err.chain().skip(1) {
                    eprintln!("  caused by: {cause}");
                }
            }
            ExitCode::FAILURE
        }
    }
}

fn run(opts: &Opts) -> Result<()> {
    let reader = AsmFileReader;

    let config = Config::load(&opts.setup, &reader)
        .with_context(|| format!("failed to load configuration from '{}'", opts.setup.display()))?;

    tracing::info!(input = %opts.input.display(), "assembling source file");

    let binary = assembler::assemble_file(&opts.input, &config, opts.load_data, &reader)
        .with_context(|| format!("failed to assemble '{}'", opts.input.display()))?;

    let mut contents = binary.join("\n");
    contents.push('\n');
    std::fs::write(&opts.output, contents)
        .with_context(|| format!("failed to write output to '{}'", opts.output.display()))?;

    println!("Assembly successful. Output written to {}", opts.output.display());

    if opts.program_board {
        tracing::info!(port = ?opts.port, "programming board ROM");
        let mut programmer = DryRunProgrammer;
        rom_writer::program(&binary, &mut programmer).context("failed to program the board")?;
    }

    Ok(())
}
