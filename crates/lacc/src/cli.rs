//! Command-line interface.
//!
//! `lacc <entrada> <saida>` compiles one LA source file. The process exits
//! 0 on any completed compilation — including the diagnostic path, where
//! the output file carries the report — and 1 only when the arguments
//! themselves are wrong. Internal failures (unreadable input, a failing
//! host compiler) are written into the output file as
//! `Erro durante a compilacao: <text>` followed by the terminator.

use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use clap::Parser;

use lacc_compile::{compile_source, TERMINATOR};

#[derive(Parser)]
#[command(name = "lacc")]
#[command(about = "The LA-to-C compiler", long_about = None)]
#[command(version)]
pub struct Cli {
    /// LA source file
    pub entrada: PathBuf,
    /// Output file (C translation, or the diagnostic report)
    pub saida: PathBuf,
}

/// Entry point for the CLI.
pub fn run_cli() -> Result<(), Box<dyn Error>> {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            // a wrong argument count exits with status 1
            eprintln!("{}", err);
            std::process::exit(1);
        }
    };
    run(&cli.entrada, &cli.saida)
}

/// Compiles `entrada` into `saida`.
///
/// The output file is the report: compilation problems and internal
/// failures land inside it, and the call still returns `Ok`. Only a write
/// failure on the output path itself surfaces as an error.
pub fn run(entrada: &Path, saida: &Path) -> Result<(), Box<dyn Error>> {
    let source = match fs::read_to_string(entrada) {
        Ok(source) => source,
        Err(err) => {
            write_internal_error(saida, &err.to_string())?;
            return Ok(());
        }
    };

    let outcome = compile_source(&source);
    fs::write(saida, outcome.render())?;

    if outcome.is_code() {
        invoke_host_compiler(saida)?;
    }
    Ok(())
}

fn write_internal_error(saida: &Path, text: &str) -> Result<(), Box<dyn Error>> {
    fs::write(
        saida,
        format!("Erro durante a compilacao: {}\n{}\n", text, TERMINATOR),
    )?;
    Ok(())
}

/// Hands a `.c` output to `gcc`, producing `<saida minus .c>.out`.
///
/// A missing host compiler is silently tolerated; a nonzero exit replaces
/// the output file with an error summary.
fn invoke_host_compiler(saida: &Path) -> Result<(), Box<dyn Error>> {
    let Some(path_str) = saida.to_str() else {
        return Ok(());
    };
    let Some(stem) = path_str.strip_suffix(".c") else {
        return Ok(());
    };
    let executable = format!("{}.out", stem);

    match Command::new("gcc")
        .arg(path_str)
        .arg("-o")
        .arg(&executable)
        .output()
    {
        Ok(result) if !result.status.success() => {
            let stderr = String::from_utf8_lossy(&result.stderr);
            write_internal_error(saida, stderr.trim_end())?;
        }
        _ => {}
    }
    Ok(())
}
