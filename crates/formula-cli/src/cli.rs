//! Command-line definitions and command execution

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use formula_core::{Formula, FormulaParser, ParserConfig};
use serde::Serialize;
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use tracing::{debug, info};

#[derive(Parser, Debug)]
#[command(name = "formula", version, about = "Check and evaluate algebraic formulas")]
pub struct Cli {
    /// Parser configuration file (TOML with a [parser] table)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Write logs as JSON
    #[arg(long, global = true)]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Parse a formula and evaluate it against bindings
    Eval {
        formula: String,
        /// Variable binding, as name=value
        #[arg(long = "var", value_parser = parse_binding)]
        vars: Vec<(String, f64)>,
        /// Additional legal variable name without a value
        #[arg(long = "name")]
        names: Vec<String>,
        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },
    /// Parse a formula and print its normalized form
    Check {
        formula: String,
        /// Legal variable name
        #[arg(long = "name")]
        names: Vec<String>,
        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Serialize, Debug)]
struct EvalReport<'a> {
    formula: &'a str,
    normalized: &'a str,
    result: f64,
}

#[derive(Serialize, Debug)]
struct CheckReport<'a> {
    formula: &'a str,
    normalized: &'a str,
    tree: String,
    variables: Vec<String>,
    nodes: usize,
}

/// Parse a `name=value` binding
pub fn parse_binding(raw: &str) -> Result<(String, f64), String> {
    let (name, value) =
        raw.split_once('=').ok_or_else(|| format!("expected name=value, got '{raw}'"))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(format!("missing variable name in '{raw}'"));
    }
    let value = value
        .trim()
        .parse::<f64>()
        .map_err(|e| format!("invalid value for '{name}': {e}"))?;
    Ok((name.to_string(), value))
}

/// Parser configuration from an optional file, then environment overrides
pub fn load_config(path: Option<&PathBuf>) -> Result<ParserConfig> {
    let config = match path {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("reading configuration {}", path.display()))?;
            ParserConfig::from_toml_str(&text)
                .with_context(|| format!("loading configuration {}", path.display()))?
        }
        None => ParserConfig::default(),
    };
    let config = config
        .with_overrides(|key| std::env::var(key).ok())
        .context("applying environment overrides")?;
    debug!(?config, "Parser configuration loaded");
    Ok(config)
}

/// Execute a command and return the text to print
pub fn run(cli: &Cli) -> Result<String> {
    let parser = FormulaParser::new(load_config(cli.config.as_ref())?);

    match &cli.command {
        Command::Eval { formula, vars, names, json } => {
            eval_command(&parser, formula, vars, names, *json)
        }
        Command::Check { formula, names, json } => check_command(&parser, formula, names, *json),
    }
}

fn compile(parser: &FormulaParser, formula: &str, names: &[String]) -> Result<Formula> {
    parser.compile(formula, names).with_context(|| format!("parsing '{formula}'"))
}

fn eval_command(
    parser: &FormulaParser,
    formula: &str,
    vars: &[(String, f64)],
    names: &[String],
    json: bool,
) -> Result<String> {
    let mut legal: Vec<String> = Vec::new();
    for name in vars.iter().map(|(name, _)| name).chain(names) {
        if !legal.contains(name) {
            legal.push(name.clone());
        }
    }

    let compiled = compile(parser, formula, &legal)?;
    let bindings: HashMap<String, f64> = vars.iter().cloned().collect();

    let missing = compiled.missing_bindings(&bindings);
    if !missing.is_empty() {
        bail!("no value given for {}", missing.join(", "));
    }

    let result = compiled.evaluate(&bindings)?;
    info!(formula, result, "Evaluated formula");

    if json {
        let report = EvalReport { formula, normalized: compiled.normalized(), result };
        Ok(serde_json::to_string_pretty(&report)?)
    } else {
        Ok(result.to_string())
    }
}

fn check_command(
    parser: &FormulaParser,
    formula: &str,
    names: &[String],
    json: bool,
) -> Result<String> {
    let compiled = compile(parser, formula, names)?;
    let report = CheckReport {
        formula,
        normalized: compiled.normalized(),
        tree: compiled.to_string(),
        variables: compiled.variables_used(),
        nodes: compiled.expression().node_count(),
    };

    if json {
        return Ok(serde_json::to_string_pretty(&report)?);
    }

    Ok(format!(
        "normalized: {}\ntree: {}\nvariables: {}\nnodes: {}",
        report.normalized,
        report.tree,
        report.variables.join(", "),
        report.nodes
    ))
}
