//! CLI: (samples | schema) → (key paths | shape | path checks)
use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};
use colored::Colorize;
use rayon::prelude::*;
use regex::Regex;
use serde_json::Value;
use tracing_subscriber::EnvFilter;

use crate::inference::{Evidence, Inference};
use crate::keypaths::{DepthCeiling, Options, DEFAULT_DEPTH, UNBOUNDED_MAX_DEPTH};
use crate::shape::Schema;

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

/// list every key path (`a.b[0].c`) that addresses a field or element of a JSON shape
#[derive(Parser, Debug)]
#[command(name = "json-keypaths", version)]
pub struct CommandLineInterface {
    /// more log output on stderr (-v debug, -vv trace); RUST_LOG takes precedence
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// print the key paths of a shape
    Paths(PathsOut),
    /// infer a shape from samples and print it as a JSON-schema-ish document
    Shape(ShapeOut),
    /// check concrete paths against the key paths of a shape
    Check(CheckArgs),
}

#[derive(Args, Debug, Clone)]
struct InputSettings {
    /// treat input as newline-delimited JSON (NDJSON)
    #[arg(long, default_value_t = false)]
    ndjson: bool,

    /// JSON Pointer to select a subnode in each document (e.g. /data/items/0/payload)
    #[arg(long)]
    json_pointer: Option<String>,

    /// JQ pre-process filter for each document.
    #[arg(long)]
    jq_expr: Option<String>,

    /// One or more inputs. May be literal paths or quoted glob patterns or '-' for stdin
    #[arg(long, short, num_args = 1..)]
    input: Vec<String>,
}

#[derive(Args, Debug, Clone)]
struct ShapeSource {
    /// JSON-schema-ish shape document (as printed by `shape`) instead of samples
    #[arg(long, conflicts_with = "input")]
    schema: Option<PathBuf>,

    #[command(flatten)]
    input_settings: InputSettings,
}

#[derive(Args, Debug, Clone, Copy)]
struct DepthSettings {
    /// nested levels to descend below the top-level fields
    #[arg(
        long,
        default_value_t = DEFAULT_DEPTH,
        value_parser = clap::value_parser!(u32).range(..=i64::from(UNBOUNDED_MAX_DEPTH)),
    )]
    depth: u32,

    /// honour depths above 20 (up to 256) instead of truncating them to top-level paths
    #[arg(long, default_value_t = false)]
    no_depth_ceiling: bool,
}

#[derive(ValueEnum, Debug, Clone, Copy, Default, PartialEq, Eq)]
enum Format {
    /// one path per line
    #[default]
    Text,
    /// a JSON array of paths
    Json,
}

#[derive(clap::Parser, Debug)]
struct PathsOut {
    #[command(flatten)]
    source: ShapeSource,

    #[command(flatten)]
    depth: DepthSettings,

    /// sort paths lexicographically (default: production order)
    #[arg(long)]
    sort: bool,

    /// only print paths matching this regex
    #[arg(long)]
    matching: Option<String>,

    #[arg(long, value_enum, default_value_t = Format::Text)]
    format: Format,

    /// output file (stdout if omitted)
    #[arg(short, long)]
    out: Option<PathBuf>,
}

#[derive(clap::Parser, Debug)]
struct ShapeOut {
    #[command(flatten)]
    input_settings: InputSettings,

    /// output .json file (stdout if omitted)
    #[arg(short, long)]
    out: Option<PathBuf>,
}

#[derive(clap::Parser, Debug)]
struct CheckArgs {
    #[command(flatten)]
    source: ShapeSource,

    #[command(flatten)]
    depth: DepthSettings,

    /// concrete paths to check, e.g. `hits.hits[3]._source.name`
    #[arg(required = true)]
    paths: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Source {
    Stdin,
    File(PathBuf),
}

// ————————————————————————————————————————————————————————————————————————————
// IMPLEMENTATION
// ————————————————————————————————————————————————————————————————————————————

impl InputSettings {
    /// Structural evidence over every document of every input.
    ///
    /// Inputs are observed in parallel and their evidence joined afterwards.
    fn evidence(&self) -> Result<Evidence> {
        if self.input.is_empty() {
            bail!("no input given (use --input, or --schema where supported)");
        }
        let sources = resolve_file_path_patterns(&self.input)?;
        tracing::debug!(count = sources.len(), "resolved inputs");
        let per_source = sources
            .par_iter()
            .map(|source| self.observe_source(source))
            .collect::<Result<Vec<_>>>()?;
        Ok(per_source
            .iter()
            .fold(Evidence::empty(), |acc, ev| Evidence::join(&acc, ev)))
    }

    fn observe_source(&self, source: &Source) -> Result<Evidence> {
        let label = source.label();
        let text = source.read()?;
        let mut inf = Inference::new();
        let mut observed = 0usize;
        for document in self.documents(&text, &label)? {
            for value in self.preprocess(document, &label)? {
                inf.observe_value(&value);
                observed += 1;
            }
        }
        tracing::debug!(source = %label, observed, "observed documents");
        Ok(inf.into_evidence())
    }

    fn documents(&self, text: &str, label: &str) -> Result<Vec<Value>> {
        if !self.ndjson {
            let value = serde_json::from_str::<Value>(text)
                .with_context(|| format!("failed to parse JSON source ({label})"))?;
            return Ok(vec![value]);
        }
        text.lines()
            .enumerate()
            .filter(|(_, line)| !line.trim().is_empty())
            .map(|(i, line)| {
                serde_json::from_str::<Value>(line)
                    .with_context(|| format!("failed to parse NDJSON line {} ({label})", i + 1))
            })
            .collect()
    }

    fn preprocess(&self, document: Value, label: &str) -> Result<Vec<Value>> {
        let document = match self.json_pointer.as_deref() {
            None => document,
            Some(pointer) => match document.pointer(pointer) {
                Some(node) => node.clone(),
                None => {
                    tracing::warn!(source = %label, pointer, "JSON pointer selects nothing; document skipped");
                    return Ok(Vec::new());
                }
            },
        };
        match self.jq_expr.as_deref() {
            None => Ok(vec![document]),
            Some(jq_expr) => crate::jq_exec::run_jaq(jq_expr, &document)
                .with_context(|| format!("failed to apply jq expression to source ({label})")),
        }
    }
}

impl ShapeSource {
    fn load(&self) -> Result<Schema> {
        match &self.schema {
            Some(path) => {
                let src = std::fs::read_to_string(path)
                    .with_context(|| format!("failed to read schema file {}", path.display()))?;
                src.parse::<Schema>()
                    .with_context(|| format!("failed to load schema file {}", path.display()))
            }
            None => Ok(Schema::new(self.input_settings.evidence()?.to_shape())),
        }
    }
}

impl DepthSettings {
    fn options(&self) -> Options {
        let ceiling = if self.no_depth_ceiling { DepthCeiling::Unbounded } else { DepthCeiling::Legacy };
        Options { depth: self.depth, ceiling }
    }
}

impl Source {
    fn label(&self) -> String {
        match self {
            Source::Stdin => "<stdin>".to_owned(),
            Source::File(path) => path.to_string_lossy().to_string(),
        }
    }

    fn read(&self) -> Result<String> {
        match self {
            Source::Stdin => {
                let mut buf = String::new();
                std::io::stdin().read_to_string(&mut buf).context("failed to read stdin")?;
                Ok(buf)
            }
            Source::File(path) => std::fs::read_to_string(path)
                .with_context(|| format!("failed to read source file {}", path.display())),
        }
    }
}

impl CommandLineInterface {
    pub fn load() -> Self {
        Self::parse()
    }

    /// Install the stderr tracing subscriber. `RUST_LOG` wins over `-v`.
    pub fn init_logging(&self) {
        let fallback = match self.verbose {
            0 => "warn",
            1 => "debug",
            _ => "trace",
        };
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .try_init();
    }

    /// Run the selected command. `Ok(false)` means the command ran but reports
    /// a negative outcome (a rejected path).
    pub fn run(&self) -> Result<bool> {
        match &self.cmd {
            Command::Paths(target) => {
                let schema = target.source.load()?;
                let mut paths = schema.key_paths(target.depth.options());
                if let Some(pattern) = target.matching.as_deref() {
                    let rx = Regex::new(pattern)
                        .with_context(|| format!("invalid --matching regex `{pattern}`"))?;
                    paths.retain(|p| rx.is_match(p));
                }
                let listed: Vec<&str> = if target.sort { paths.sorted() } else { paths.iter().collect() };
                let rendered = match target.format {
                    Format::Text => listed.iter().map(|p| format!("{p}\n")).collect::<String>(),
                    Format::Json => serde_json::to_string_pretty(&listed)? + "\n",
                };
                write_output(target.out.as_deref(), &rendered)?;
                Ok(true)
            }
            Command::Shape(target) => {
                let shape = target.input_settings.evidence()?.to_shape();
                let rendered = serde_json::to_string_pretty(&Schema::new(shape).to_json())? + "\n";
                write_output(target.out.as_deref(), &rendered)?;
                Ok(true)
            }
            Command::Check(target) => {
                let schema = target.source.load()?;
                let paths = schema.key_paths(target.depth.options());
                let mut all_ok = true;
                for path in &target.paths {
                    match paths.admits(path) {
                        Ok(true) => println!("{} {path}", "ok      ".green()),
                        Ok(false) => {
                            all_ok = false;
                            println!("{} {path}", "rejected".red());
                        }
                        Err(error) => {
                            all_ok = false;
                            println!("{} {error}", "invalid ".red().bold());
                        }
                    }
                }
                Ok(all_ok)
            }
        }
    }
}

// ————————————————————————————————————————————————————————————————————————————
// INTERNAL HELPERS
// ————————————————————————————————————————————————————————————————————————————

fn write_output(out: Option<&Path>, rendered: &str) -> Result<()> {
    match out {
        Some(out) => {
            if let Some(parent) = out.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("failed to create {}", parent.display()))?;
            }
            std::fs::write(out, rendered).with_context(|| format!("failed to write {}", out.display()))
        }
        None => {
            print!("{rendered}");
            Ok(())
        }
    }
}

fn resolve_file_path_patterns<I>(patterns: I) -> Result<Vec<Source>>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    fn has_glob_chars(s: &str) -> bool {
        // Minimal glob detection for the `glob` crate syntax.
        s.bytes().any(|b| matches!(b, b'*' | b'?' | b'[' | b'{'))
    }

    let mut out = Vec::<Source>::new();

    for raw in patterns {
        let pattern = raw.as_ref();

        if pattern == "-" {
            if !out.contains(&Source::Stdin) {
                out.push(Source::Stdin);
            }
        } else if has_glob_chars(pattern) {
            let mut matched_any = false;
            let entries = glob::glob(pattern).with_context(|| format!("invalid glob pattern: {pattern}"))?;
            for entry in entries {
                let path = entry.with_context(|| format!("failed to read a match of {pattern}"))?;
                matched_any = true;
                out.push(Source::File(path));
            }
            if !matched_any {
                // an explicit glob that matched nothing is an error
                bail!("glob pattern matched no files: {pattern}");
            }
        } else {
            out.push(Source::File(PathBuf::from(pattern)));
        }
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn settings() -> InputSettings {
        InputSettings { ndjson: false, json_pointer: None, jq_expr: None, input: Vec::new() }
    }

    #[test]
    fn ndjson_splits_lines_and_skips_blanks() {
        let s = InputSettings { ndjson: true, ..settings() };
        let docs = s.documents("{\"a\":1}\n\n[1,2]\n", "mem").unwrap();
        assert_eq!(docs, vec![json!({"a": 1}), json!([1, 2])]);
        let err = s.documents("{\"a\":1}\n{oops\n", "mem").unwrap_err();
        assert!(format!("{err:#}").contains("line 2"));
    }

    #[test]
    fn json_pointer_selects_or_skips() {
        let s = InputSettings { json_pointer: Some("/data/0".into()), ..settings() };
        let got = s.preprocess(json!({"data": [{"x": 1}]}), "mem").unwrap();
        assert_eq!(got, vec![json!({"x": 1})]);
        assert!(s.preprocess(json!({"other": true}), "mem").unwrap().is_empty());
    }

    #[test]
    fn stdin_and_literal_paths_resolve() {
        let got = resolve_file_path_patterns(["-", "a.json", "-"]).unwrap();
        assert_eq!(got, vec![Source::Stdin, Source::File(PathBuf::from("a.json"))]);
    }

    #[test]
    fn ceiling_flag_maps_to_options() {
        let d = DepthSettings { depth: 25, no_depth_ceiling: true };
        assert_eq!(d.options(), Options { depth: 25, ceiling: DepthCeiling::Unbounded });
        let d = DepthSettings { depth: 3, no_depth_ceiling: false };
        assert_eq!(d.options(), Options::with_depth(3));
    }

    #[test]
    fn depth_flag_is_capped() {
        let args = |depth: &str| {
            CommandLineInterface::try_parse_from([
                "json-keypaths", "paths", "--no-depth-ceiling", "--depth", depth, "-i", "a.json",
            ])
        };
        assert!(args("5000").is_err());
        let cli = args(&UNBOUNDED_MAX_DEPTH.to_string()).unwrap();
        let Command::Paths(out) = cli.cmd else { panic!("expected the paths command") };
        assert_eq!(out.depth.options().start().remaining(), Some(UNBOUNDED_MAX_DEPTH));
    }
}
