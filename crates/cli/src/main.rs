//! lexforge CLI — compile lexical specifications to DFA tables and run them
//! over input files.

mod render;

use std::collections::HashMap;
use std::fs;
use std::io::{self, Read, Write};
use std::process;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use lexforge_core::document::CompiledLexicalSpecDocument;
use lexforge_core::{CompiledLexicalSpec, Lexer, LexerOptions, LexicalSpec};
use lexforge_diagnostics::Diagnostic;
use serde::Serialize;

use crate::render::{Format, print_summary, render_diagnostics};

#[derive(Parser, Debug)]
#[command(
    name = "lexforge",
    version,
    about = "Compile regex-based lexical specifications into DFA tables and run them over input"
)]
struct Cli {
    /// Output mode for diagnostics: "pretty" for coloured terminal output,
    /// "json" for machine-readable output. Defaults to "pretty" on a TTY,
    /// "json" otherwise.
    #[arg(long, global = true, value_parser = ["pretty", "json"])]
    output: Option<String>,

    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Subcommand, Debug)]
enum Cmd {
    /// Compile a lexical-specification document into a compiled spec.
    Compile {
        /// Lexical-specification JSON file, or `-` for stdin.
        #[arg(value_name = "SPEC")]
        spec: String,
        /// Where to write the compiled spec. Defaults to stdout.
        #[arg(long, short, value_name = "PATH")]
        output_file: Option<String>,
        /// Transition-table compression level.
        #[arg(long, value_parser = ["0", "1", "2"], default_value = "2")]
        compression_level: String,
    },
    /// Tokenize an input file against a compiled spec, emitting one JSON
    /// object per line.
    Lex {
        /// Compiled-spec JSON file produced by `compile`.
        #[arg(value_name = "COMPILED_SPEC")]
        compiled_spec: String,
        /// Input file to tokenize, or `-` for stdin.
        #[arg(value_name = "INPUT")]
        input: String,
        /// Exit nonzero on the first invalid token instead of scanning to EOF.
        #[arg(long)]
        break_on_error: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let format = Format::resolve_or_detect(cli.output.as_deref());

    let run_result = match cli.cmd {
        Cmd::Compile { spec, output_file, compression_level } => {
            cmd_compile(&spec, output_file.as_deref(), &compression_level, format)
        }
        Cmd::Lex { compiled_spec, input, break_on_error } => cmd_lex(&compiled_spec, &input, break_on_error),
    };

    if let Err(err) = run_result {
        emit_cli_error(format, &err);
        process::exit(1);
    }
    Ok(())
}

// ── compile ───────────────────────────────────────────────────────────

fn cmd_compile(spec_path: &str, output_file: Option<&str>, compression_level: &str, format: Format) -> Result<()> {
    let raw = read_input(spec_path)?;
    let spec: LexicalSpec = serde_json::from_str(&raw).context("parsing lexical-specification document")?;
    let level: u8 = compression_level.parse().expect("clap restricts this to 0|1|2");

    let sources: HashMap<String, String> =
        spec.entries.iter().map(|e| (e.kind.clone(), e.pattern.clone())).collect();

    match lexforge_core::compile(&spec, level) {
        Ok(compiled) => {
            let doc = CompiledLexicalSpecDocument::from(&compiled);
            let json = serde_json::to_string_pretty(&doc).context("serializing compiled spec")?;
            match output_file {
                Some(path) => fs::write(path, json).with_context(|| format!("writing {path}"))?,
                None => println!("{json}"),
            }
            Ok(())
        }
        Err(err) => {
            let diagnostics: Vec<Diagnostic> = err.into_diagnostics();
            render_diagnostics(&sources, &diagnostics, format);
            print_summary(&diagnostics);
            process::exit(1)
        }
    }
}

// ── lex ───────────────────────────────────────────────────────────────

/// One scanned token, serialized as a single JSON line (§6).
#[derive(Debug, Serialize)]
struct TokenRecord {
    mode_id: u32,
    mode_name: String,
    kind_id: u32,
    mode_kind_id: u32,
    kind_name: String,
    row: usize,
    col: usize,
    #[serde(rename = "match")]
    matched: Vec<u8>,
    eof: bool,
    invalid: bool,
}

fn cmd_lex(compiled_spec_path: &str, input_path: &str, break_on_error: bool) -> Result<()> {
    let spec_json = fs::read_to_string(compiled_spec_path)
        .with_context(|| format!("reading {compiled_spec_path}"))?;
    let doc: CompiledLexicalSpecDocument =
        serde_json::from_str(&spec_json).context("parsing compiled-spec document")?;
    let compiled: CompiledLexicalSpec = doc.into();

    let input = read_input_bytes(input_path)?;

    let stdout = io::stdout();
    let mut out = stdout.lock();

    let mut lexer = Lexer::new(&compiled, input, LexerOptions::default());
    loop {
        let token = lexer.next().context("internal driver invariant violated")?;
        let is_eof = token.eof;
        let was_invalid = token.invalid;
        let record = TokenRecord {
            mode_id: token.mode_id,
            mode_name: token.mode_name,
            kind_id: token.kind_id,
            mode_kind_id: token.mode_kind_id,
            kind_name: token.kind_name,
            row: token.row,
            col: token.col,
            matched: token.bytes,
            eof: token.eof,
            invalid: token.invalid,
        };
        writeln!(out, "{}", serde_json::to_string(&record)?)?;

        if was_invalid && break_on_error {
            bail!("invalid token at row {}, col {}", record.row, record.col);
        }
        if is_eof {
            break;
        }
    }
    Ok(())
}

// ── shared helpers ──────────────────────────────────────────────────────

fn emit_cli_error(format: Format, err: &anyhow::Error) {
    let message = format!("{err:#}");
    match format {
        Format::Json => {
            let out = serde_json::json!({ "success": false, "error": "command_failed", "message": message });
            println!(
                "{}",
                serde_json::to_string_pretty(&out).expect("error envelope JSON serialization cannot fail")
            );
        }
        Format::Pretty => eprintln!("error: {message}"),
    }
}

fn read_input(path: &str) -> Result<String> {
    if path == "-" {
        let mut input = String::new();
        io::stdin().read_to_string(&mut input)?;
        Ok(input)
    } else {
        fs::read_to_string(path).with_context(|| format!("reading {path}"))
    }
}

fn read_input_bytes(path: &str) -> Result<Vec<u8>> {
    if path == "-" {
        let mut input = Vec::new();
        io::stdin().read_to_end(&mut input)?;
        Ok(input)
    } else {
        fs::read(path).with_context(|| format!("reading {path}"))
    }
}
