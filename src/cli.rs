//! Minimal CLI: generate | schema | repair
use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use rayon::prelude::*;

use crate::codegen::Language;
use crate::recover;
use crate::value::Value;

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

/// derive class definitions from JSON samples, or repair broken JSON in place
#[derive(Parser, Debug)]
pub struct CommandLineInterface {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// infer a class schema from a sample and emit source code for a target language
    Generate(GenerateOut),
    /// infer a class schema from a sample and emit it as a JSON Schema document
    Schema(SchemaOut),
    /// locate syntax defects; auto-fix the simple ones and report the rest
    Repair(RepairOut),
}

#[derive(Args, Debug, Clone)]
struct InputSettings {
    /// JSON Pointer to select a subnode in each document (e.g. /data/items/0)
    #[arg(long)]
    json_pointer: Option<String>,

    /// One or more inputs; literal paths or quoted glob patterns
    #[arg(long, short, num_args = 1.., required = true)]
    input: Vec<String>,
}

#[derive(Args, Debug)]
struct GenerateOut {
    #[command(flatten)]
    input_settings: InputSettings,

    /// top-level class name
    #[arg(long, default_value = "Root")]
    root_type: String,

    /// target language
    #[arg(long, value_enum, default_value = "csharp")]
    lang: Language,

    /// emit every target language, one document per target
    #[arg(long, default_value_t = false)]
    all_langs: bool,

    /// output file (stdout if omitted; single input, single target only)
    #[arg(short, long)]
    out: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct SchemaOut {
    #[command(flatten)]
    input_settings: InputSettings,

    /// output .json file (stdout if omitted)
    #[arg(short, long)]
    out: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct RepairOut {
    #[command(flatten)]
    input_settings: InputSettings,

    /// where to write the repaired text (stdout if omitted)
    #[arg(short, long)]
    out: Option<PathBuf>,

    /// report defects without writing any repaired text
    #[arg(long, default_value_t = false)]
    check: bool,
}

// ————————————————————————————————————————————————————————————————————————————
// IMPLEMENTATION
// ————————————————————————————————————————————————————————————————————————————

impl InputSettings {
    fn load_texts(&self) -> anyhow::Result<Vec<(PathBuf, String)>> {
        let paths = resolve_file_path_patterns(&self.input)?;
        let mut out = Vec::with_capacity(paths.len());
        for path in paths {
            let text = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            out.push((path, text));
        }
        Ok(out)
    }

    fn load_values(&self) -> anyhow::Result<Vec<(PathBuf, Value)>> {
        let mut out = Vec::new();
        for (path, text) in self.load_texts()? {
            let json: serde_json::Value = serde_json::from_str(&text)
                .with_context(|| format!("failed to parse {}", path.display()))?;
            let json = match self.json_pointer.as_deref() {
                None => json,
                Some(ptr) => json
                    .pointer(ptr)
                    .with_context(|| {
                        format!("JSON pointer `{ptr}` resolves nothing in {}", path.display())
                    })?
                    .clone(),
            };
            out.push((path, Value::from_json(&json)));
        }
        Ok(out)
    }
}

impl CommandLineInterface {
    pub fn load() -> Self {
        Self::parse()
    }

    pub fn run(&self) -> anyhow::Result<()> {
        match &self.cmd {
            Command::Generate(target) => run_generate(target),
            Command::Schema(target) => run_schema(target),
            Command::Repair(target) => run_repair(target),
        }
    }
}

fn run_generate(target: &GenerateOut) -> anyhow::Result<()> {
    let inputs = target.input_settings.load_values()?;
    if target.out.is_some() && (inputs.len() > 1 || target.all_langs) {
        bail!("--out requires a single input and a single target language");
    }
    for (path, value) in &inputs {
        let schema = crate::infer::infer(value, &target.root_type);
        if target.all_langs {
            // per-target emission is independent; fan out across targets
            let rendered: Vec<(Language, String)> = Language::ALL
                .par_iter()
                .map(|lang| (*lang, crate::codegen::emit(&schema, *lang)))
                .collect();
            for (lang, text) in rendered {
                println!(
                    "{}",
                    format!("==== {} ({}) ====", lang.name(), path.display()).cyan()
                );
                println!("{text}");
            }
        } else {
            let text = crate::codegen::emit(&schema, target.lang);
            match target.out.as_ref() {
                Some(out) => write_output(out, &text)?,
                None => println!("{text}"),
            }
        }
    }
    Ok(())
}

fn run_schema(target: &SchemaOut) -> anyhow::Result<()> {
    for (_, value) in target.input_settings.load_values()? {
        let schema = crate::infer::infer(&value, "Root");
        let text = crate::codegen::emit(&schema, Language::JsonSchema);
        match target.out.as_ref() {
            Some(out) => write_output(out, &text)?,
            None => print!("{text}"),
        }
    }
    Ok(())
}

fn run_repair(target: &RepairOut) -> anyhow::Result<()> {
    let mut complex_remaining = 0usize;
    for (path, text) in target.input_settings.load_texts()? {
        let outcome = recover::repair_simple(&text);
        for change in &outcome.changes {
            eprintln!(
                "{} {}: line {}: {}",
                "fixed".green().bold(),
                path.display(),
                change.line,
                change.description
            );
        }
        for err in &outcome.remaining {
            let tag = if err.category.is_simple() {
                "simple".yellow().bold()
            } else {
                complex_remaining += 1;
                "complex".red().bold()
            };
            eprintln!(
                "{tag} {}: {}:{}: {}",
                path.display(),
                err.line,
                err.column,
                err.message
            );
        }
        if !target.check {
            match target.out.as_ref() {
                Some(out) => write_output(out, &outcome.fixed_text)?,
                None => print!("{}", outcome.fixed_text),
            }
        }
    }
    if complex_remaining > 0 {
        bail!("{complex_remaining} defect(s) need manual attention");
    }
    Ok(())
}

fn write_output(out: &PathBuf, text: &str) -> anyhow::Result<()> {
    if let Some(parent) = out.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    std::fs::write(out, text).with_context(|| format!("failed to write {}", out.display()))
}

// ————————————————————————————————————————————————————————————————————————————
// INTERNAL HELPERS
// ————————————————————————————————————————————————————————————————————————————

fn resolve_file_path_patterns<I>(patterns: I) -> anyhow::Result<Vec<PathBuf>>
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
                bail!("glob pattern matched no files: {pattern}");
            }
        } else {
            out.push(PathBuf::from(pattern));
        }
    }

    Ok(out)
}
