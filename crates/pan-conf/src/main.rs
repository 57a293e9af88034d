//! Pan Transit configuration tool: entry point.
//!
//! Plays the part of the host application around the configuration store: it
//! supplies the application version and config home, registers provider
//! schemas, loads the persisted document, runs one store operation and writes
//! the document back when the operation changed something.
//!
//! # Usage
//!
//! ```text
//! pan-conf [OPTIONS] <COMMAND>
//!
//! Commands:
//!   get       <PATH>          Print the value of an option
//!   default   <PATH>          Print the default value of an option
//!   set       <PATH> <VALUE>  Set an option
//!   add       <PATH> <ITEM>   Add an item to a list option
//!   remove    <PATH> <ITEM>   Remove an item from a list option
//!   contains  <PATH> <ITEM>   Print whether a list option holds an item
//!   dump                      Print all options
//!   path                      Print the configuration file location
//!
//! Options:
//!   --config <FILE>           Configuration file [env: PAN_CONFIG]
//!   --register <NAME=JSON>    Register provider defaults (repeatable)
//! ```
//!
//! Values are parsed as JSON when possible, otherwise taken as plain strings,
//! so `set departure_time_cutoff 15` stores an integer and
//! `set units imperial` stores a string.

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use pan_core::infrastructure::storage::paths::platform_identity;
use pan_core::{AppIdentity, ConfigurationStore, OptionTree, Value};
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Directory name of the application under the platform config directory.
const APP_NAME: &str = "pan-transit";
/// Version stamped into written configuration files.
const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

// ── CLI argument definitions ──────────────────────────────────────────────────

/// Read and modify Pan Transit options.
#[derive(Debug, Parser)]
#[command(name = "pan-conf", about = "Read and modify Pan Transit options", version)]
struct Cli {
    /// Configuration file to use instead of the platform default.
    #[arg(long, env = "PAN_CONFIG")]
    config: Option<PathBuf>,

    /// Provider defaults to register before loading, as `NAME=JSON_OBJECT`.
    ///
    /// Options under `providers.<NAME>` are coerced to the types given here.
    #[arg(long = "register", value_name = "NAME=JSON", value_parser = parse_registration)]
    registrations: Vec<Registration>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Clone, PartialEq, Subcommand)]
enum Command {
    /// Print the value of an option.
    Get { path: String },
    /// Print the default value of an option.
    Default { path: String },
    /// Set an option, creating missing sections.
    Set { path: String, value: String },
    /// Add an item to a list option unless already present.
    Add { path: String, item: String },
    /// Remove an item from a list option.
    Remove { path: String, item: String },
    /// Print whether a list option holds an item.
    Contains { path: String, item: String },
    /// Print all options as JSON.
    Dump,
    /// Print the configuration file location.
    Path,
}

/// A provider schema given with `--register`.
#[derive(Debug, Clone, PartialEq)]
struct Registration {
    name: String,
    values: OptionTree,
}

fn parse_registration(raw: &str) -> Result<Registration, String> {
    let (name, schema) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=JSON, got '{raw}'"))?;
    if name.is_empty() {
        return Err("provider name must not be empty".to_string());
    }
    match serde_json::from_str::<Value>(schema) {
        Ok(Value::Object(values)) => Ok(Registration {
            name: name.to_string(),
            values,
        }),
        Ok(_) => Err(format!("defaults for provider '{name}' must be a JSON object")),
        Err(e) => Err(format!("invalid JSON for provider '{name}': {e}")),
    }
}

/// Parses a command-line value as JSON, falling back to a plain string.
fn parse_value(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}

// ── Command execution ─────────────────────────────────────────────────────────

/// Result of running one command against the store.
#[derive(Debug, PartialEq)]
struct Outcome {
    /// Text to print on standard output.
    output: Option<String>,
    /// Whether the store changed and must be written back.
    modified: bool,
}

impl Outcome {
    fn print(output: String) -> Self {
        Self {
            output: Some(output),
            modified: false,
        }
    }

    fn modified() -> Self {
        Self {
            output: None,
            modified: true,
        }
    }
}

fn render(value: &Value) -> anyhow::Result<String> {
    serde_json::to_string_pretty(value).context("failed to render value")
}

fn execute(store: &mut ConfigurationStore, file: &Path, command: &Command) -> anyhow::Result<Outcome> {
    let outcome = match command {
        Command::Get { path } => Outcome::print(render(&store.get(path)?)?),
        Command::Default { path } => Outcome::print(render(&store.get_default(path)?)?),
        Command::Set { path, value } => {
            store.set(path, parse_value(value))?;
            Outcome::modified()
        }
        Command::Add { path, item } => {
            store.add(path, parse_value(item))?;
            Outcome::modified()
        }
        Command::Remove { path, item } => {
            store.remove(path, &parse_value(item))?;
            Outcome::modified()
        }
        Command::Contains { path, item } => {
            Outcome::print(store.contains(path, &parse_value(item))?.to_string())
        }
        Command::Dump => Outcome::print(render(&Value::Object(store.snapshot()))?),
        Command::Path => Outcome::print(file.display().to_string()),
    };
    Ok(outcome)
}

impl Cli {
    /// Resolves where the configuration lives.
    ///
    /// # Errors
    ///
    /// Returns an error if no `--config` is given and the platform config
    /// directory cannot be determined.
    fn identity(&self) -> anyhow::Result<AppIdentity> {
        match &self.config {
            Some(file) => {
                let home = file.parent().unwrap_or_else(|| Path::new("."));
                Ok(AppIdentity::new(home, APP_VERSION))
            }
            None => platform_identity(APP_NAME, APP_VERSION)
                .context("cannot locate the configuration directory; pass --config"),
        }
    }

    /// Builds the store: identity, provider schemas, then persisted values.
    fn open_store(&self) -> anyhow::Result<(ConfigurationStore, PathBuf)> {
        let identity = self.identity()?;
        let file = self.config.clone().unwrap_or_else(|| identity.config_file());
        let mut store = ConfigurationStore::new(identity);
        for registration in &self.registrations {
            store
                .register_provider(&registration.name, registration.values.clone())
                .with_context(|| format!("cannot register provider '{}'", registration.name))?;
        }
        store.read(Some(&file));
        Ok((store, file))
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> anyhow::Result<()> {
    // Diagnostics (discarded options, I/O failures) go to standard error.
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let (mut store, file) = cli.open_store()?;
    debug!(path = %file.display(), "configuration store ready");

    let outcome = execute(&mut store, &file, &cli.command)?;
    if let Some(output) = outcome.output {
        println!("{output}");
    }
    if outcome.modified {
        store.write(Some(&file));
    }
    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
