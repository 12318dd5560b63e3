//! CLI: infer structure from one or more JSON samples and emit declarations,
//! a validating schema, or an example value.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use serde_json::Value;

use crate::emit::{example, typescript, zod};
use crate::infer::infer_many;
use crate::ir::{Diagnostic, InferResult, Level};
use crate::parse::parse_source;
use crate::settings::{OutputStyle, Settings};

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

/// infer structure from JSON samples and emit type declarations, a validating
/// schema, or a representative example value
#[derive(Parser, Debug)]
pub struct CommandLineInterface {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// infer and emit type declarations
    Types(EmitTarget),
    /// infer and emit a runtime-validating schema
    Schema(EmitTarget),
    /// infer and emit a representative example value
    Example(EmitTarget),
    /// infer and report diagnostics only
    Check(CheckTarget),
}

#[derive(Args, Debug, Clone)]
struct InputSettings {
    /// One or more inputs: literal paths or quoted glob patterns
    #[arg(long, short, num_args = 1.., required = true)]
    input: Vec<String>,
}

#[derive(Args, Debug, Clone)]
struct SchemaOptions {
    /// identifier for the outermost declaration
    #[arg(long, default_value = "Root")]
    root_type: String,

    /// recognize ISO-8601 date strings
    #[arg(long, default_value_t = false)]
    detect_dates: bool,

    /// declaration style (types emitter only)
    #[arg(long, value_enum, default_value_t = OutputStyle::Type)]
    style: OutputStyle,

    /// reject unknown object keys (schema emitter only)
    #[arg(long, default_value_t = false)]
    strict: bool,

    /// rewrite snake_case property names to camelCase (types/example only)
    #[arg(long, default_value_t = false)]
    camel: bool,
}

#[derive(Args, Debug)]
struct EmitTarget {
    #[command(flatten)]
    input_settings: InputSettings,

    #[command(flatten)]
    options: SchemaOptions,

    /// output file (stdout if omitted)
    #[arg(short, long)]
    out: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct CheckTarget {
    #[command(flatten)]
    input_settings: InputSettings,

    #[command(flatten)]
    options: SchemaOptions,

    /// print diagnostics as JSON instead of human-readable lines
    #[arg(long, default_value_t = false)]
    json: bool,
}

// ————————————————————————————————————————————————————————————————————————————
// IMPLEMENTATION
// ————————————————————————————————————————————————————————————————————————————

impl SchemaOptions {
    fn to_settings(&self) -> Settings {
        Settings {
            root_type_name: self.root_type.clone(),
            detect_dates: self.detect_dates,
            output_style: self.style,
            strict_objects: self.strict,
            snake_to_camel: self.camel,
        }
    }
}

impl InputSettings {
    /// Read, parse, and collect every input document, accumulating parse-stage
    /// advisories. A syntax error in any file aborts the run.
    fn load_documents(&self) -> Result<(Vec<Value>, Vec<Diagnostic>)> {
        let source_paths = resolve_file_path_patterns(&self.input)
            .context("failed to resolve input file paths")?;
        if source_paths.is_empty() {
            bail!("no input files");
        }

        let mut documents = Vec::new();
        let mut diagnostics = Vec::new();
        for source_path in source_paths {
            let source = std::fs::read_to_string(&source_path)
                .with_context(|| format!("failed to read {}", source_path.display()))?;
            let parsed = parse_source(&source);
            match parsed.value {
                Some(value) => {
                    diagnostics.extend(parsed.diagnostics);
                    documents.push(value);
                }
                None => {
                    if let Some(err) =
                        parsed.diagnostics.iter().find(|d| d.level == Level::Error)
                    {
                        bail!("{}: {}", source_path.display(), err.message);
                    }
                    eprintln!(
                        "{}: {} is empty, skipping",
                        "warning".yellow().bold(),
                        source_path.display()
                    );
                }
            }
        }
        Ok((documents, diagnostics))
    }
}

impl CommandLineInterface {
    pub fn load() -> Self {
        Self::parse()
    }

    pub fn run(&self) -> Result<()> {
        match &self.cmd {
            Command::Types(target) => {
                let (settings, result) = infer_target(target)?;
                write_output(target.out.as_ref(), &typescript::emit(&result.ty, &settings))
            }
            Command::Schema(target) => {
                let (settings, result) = infer_target(target)?;
                write_output(target.out.as_ref(), &zod::emit(&result.ty, &settings))
            }
            Command::Example(target) => {
                let (settings, result) = infer_target(target)?;
                write_output(target.out.as_ref(), &example::emit(&result.ty, &settings))
            }
            Command::Check(target) => {
                let settings = target.options.to_settings();
                let (documents, parse_diags) = target.input_settings.load_documents()?;
                let result = infer_many(&documents, &settings);
                if target.json {
                    let all: Vec<&Diagnostic> =
                        parse_diags.iter().chain(&result.diagnostics).collect();
                    println!("{}", serde_json::to_string_pretty(&all)?);
                } else {
                    print_diagnostics(&parse_diags);
                    print_diagnostics(&result.diagnostics);
                    eprintln!("{} fields inferred", result.field_count);
                }
                if result.has_errors() {
                    bail!("inference failed");
                }
                Ok(())
            }
        }
    }
}

fn infer_target(target: &EmitTarget) -> Result<(Settings, InferResult)> {
    let settings = target.options.to_settings();
    let (documents, parse_diags) = target.input_settings.load_documents()?;
    let result = infer_many(&documents, &settings);
    print_diagnostics(&parse_diags);
    print_diagnostics(&result.diagnostics);
    if result.has_errors() {
        bail!("inference failed; see diagnostics above");
    }
    Ok((settings, result))
}

fn print_diagnostics(diagnostics: &[Diagnostic]) {
    for d in diagnostics {
        let level = match d.level {
            Level::Error => "error".red().bold(),
            Level::Warning => "warning".yellow().bold(),
            Level::Info => "info".blue(),
        };
        if d.path.is_empty() {
            eprintln!("{level}: {}", d.message);
        } else {
            eprintln!("{level}: {} (at {})", d.message, d.path);
        }
    }
}

fn write_output(out: Option<&PathBuf>, text: &str) -> Result<()> {
    if let Some(out) = out {
        if let Some(parent) = out.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
        std::fs::write(out, text)
            .with_context(|| format!("failed to write {}", out.display()))?;
    } else {
        print!("{text}");
    }
    Ok(())
}

// ————————————————————————————————————————————————————————————————————————————
// INTERNAL HELPERS
// ————————————————————————————————————————————————————————————————————————————

fn resolve_file_path_patterns<I>(patterns: I) -> Result<Vec<PathBuf>>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    fn has_glob_chars(s: &str) -> bool {
        // Minimal glob detection for the `glob` crate syntax.
        s.bytes().any(|b| matches!(b, b'*' | b'?' | b'[' | b'{'))
    }

    let mut out = Vec::<PathBuf>::new();

    for raw in patterns {
        let pattern = raw.as_ref();

        if has_glob_chars(pattern) {
            let mut matched_any = false;
            for entry in glob::glob(pattern)? {
                out.push(entry?);
                matched_any = true;
            }
            if !matched_any {
                // Pattern was explicitly a glob but matched nothing -> surface as an error
                bail!("glob pattern matched no files: {pattern}");
            }
        } else {
            // Treat as a literal path
            out.push(PathBuf::from(pattern));
        }
    }

    Ok(out)
}
