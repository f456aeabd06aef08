//! cfgtree CLI
//!
//! Entry point for the `cfgtree` command-line tool: overlays configuration
//! files in order and prints the merged tree or a single resolved path.

use clap::{Parser, Subcommand};
use config_tree::LayeredConfig;
use serde_json::Value;
use std::path::PathBuf;
use std::process;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "cfgtree")]
#[command(about = "Inspect layered configuration trees", version)]
struct Cli {
    /// Enable debug logging (RUST_LOG overrides)
    #[arg(long, short = 'v', global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the merged configuration
    Dump {
        /// Config files, lowest precedence first (.json or .toml)
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Apply PATH=VALUE after loading (VALUE is JSON, else a string; null is the string "null")
        #[arg(long = "set", value_name = "PATH=VALUE")]
        sets: Vec<String>,

        /// Emit object keys sorted instead of in declaration order
        #[arg(long)]
        unordered: bool,

        /// Include the contributing sources in the output
        #[arg(long)]
        sources: bool,
    },

    /// Resolve a path (wildcards allowed) and print the subtree
    Get {
        /// Slash-separated path, e.g. soc/*/freq or **/cores
        path: String,

        /// Config files, lowest precedence first (.json or .toml)
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Apply PATH=VALUE after loading (VALUE is JSON, else a string; null is the string "null")
        #[arg(long = "set", value_name = "PATH=VALUE")]
        sets: Vec<String>,
    },
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Dump {
            files,
            sets,
            unordered,
            sources,
        } => {
            run_dump(&files, &sets, unordered, sources);
        }
        Commands::Get { path, files, sets } => {
            run_get(&path, &files, &sets);
        }
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "config_tree=debug" } else { "config_tree=warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run_dump(files: &[PathBuf], sets: &[String], unordered: bool, with_sources: bool) {
    let layered = load_or_exit(files, sets);

    let config = layered.tree().to_plain_value(!unordered);
    let output = if with_sources {
        serde_json::json!({
            "config": config,
            "sources": layered.sources(),
        })
    } else {
        config
    };
    print_json(&output);
}

fn run_get(path: &str, files: &[PathBuf], sets: &[String]) {
    let layered = load_or_exit(files, sets);

    match layered.tree().get(path) {
        Some(node) => print_json(&node.to_plain_value(true)),
        None => {
            eprintln!("Path not found: {}", path);
            process::exit(1);
        }
    }
}

fn load_or_exit(files: &[PathBuf], sets: &[String]) -> LayeredConfig {
    let mut layered = match LayeredConfig::load(files) {
        Ok(layered) => layered,
        Err(e) => {
            eprintln!("Error loading config: {}", e);
            process::exit(1);
        }
    };

    for assignment in sets {
        let result = parse_assignment(assignment).and_then(|(path, value)| {
            layered.set(path, value).map_err(|e| e.to_string())
        });
        if let Err(e) = result {
            eprintln!("Error applying --set {}: {}", assignment, e);
            process::exit(1);
        }
    }

    layered
}

/// Split `PATH=VALUE`; VALUE is parsed as JSON, falling back to a string.
///
/// `null` has no node form, so it falls back to a string as well.
fn parse_assignment(assignment: &str) -> Result<(&str, Value), String> {
    let (path, raw) = assignment
        .split_once('=')
        .ok_or_else(|| "expected PATH=VALUE".to_string())?;
    let value = match serde_json::from_str(raw) {
        Ok(Value::Null) | Err(_) => Value::String(raw.to_string()),
        Ok(value) => value,
    };
    Ok((path, value))
}

fn print_json(value: &Value) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{}", json),
        Err(e) => {
            eprintln!("Error serializing output: {}", e);
            process::exit(1);
        }
    }
}
