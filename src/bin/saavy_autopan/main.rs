//! saavy-autopan - offline renderer and preset tool
//!
//! Run with: cargo run -- render --output out.wav

mod render;

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use color_eyre::eyre::{eyre, Result as EyreResult, WrapErr};
use tracing_subscriber::EnvFilter;

use saavy_autopan::params::format;
use saavy_autopan::preset::{self, PresetInfo, ValueEncoding};
use saavy_autopan::{ParameterSchema, ParameterStore};

use render::RenderOptions;

#[derive(Parser)]
#[command(name = "saavy-autopan")]
#[command(about = "Tempo-synced gain, boost and auto-pan, rendered offline")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run a WAV file (or a test tone) through the modulation engine
    Render(RenderOptions),

    /// Write a preset holding the default parameter values
    PresetInit {
        /// Output file; stdout when omitted
        #[arg(short, long)]
        output: Option<PathBuf>,

        #[arg(short, long, default_value = "Init")]
        name: String,

        #[arg(short, long, default_value = "")]
        author: String,

        /// Timestamp text for the `modified` field
        #[arg(long, default_value = "")]
        modified: String,

        /// Store raw normalized numbers instead of display text
        #[arg(long)]
        normalized: bool,

        /// Parameter overrides as id=text, e.g. panLFORate=3/4
        #[arg(long = "set", value_name = "ID=TEXT")]
        overrides: Vec<String>,
    },

    /// Load a preset and print the resulting parameter values
    PresetCheck {
        path: PathBuf,
    },
}

fn main() -> EyreResult<()> {
    color_eyre::install()?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let store = Arc::new(ParameterStore::new(Arc::new(
        ParameterSchema::embedded().wrap_err("built-in parameter schema is invalid")?,
    )));

    match cli.command {
        Command::Render(options) => render::run(store, &options),
        Command::PresetInit {
            output,
            name,
            author,
            modified,
            normalized,
            overrides,
        } => {
            apply_overrides(&store, &overrides)?;

            let encoding = if normalized {
                ValueEncoding::Normalized
            } else {
                ValueEncoding::Text
            };
            let info = PresetInfo {
                name,
                author,
                modified,
            };
            let json = preset::save(&store, &info, encoding).wrap_err("failed to serialize preset")?;

            match output {
                Some(path) => std::fs::write(&path, json)
                    .wrap_err_with(|| format!("failed to write {}", path.display()))?,
                None => println!("{}", json),
            }
            Ok(())
        }
        Command::PresetCheck { path } => {
            let json = std::fs::read_to_string(&path)
                .wrap_err_with(|| format!("failed to read {}", path.display()))?;
            let name = preset::load(&store, &json)
                .wrap_err_with(|| format!("failed to load {}", path.display()))?;

            println!("=== {} ===", if name.is_empty() { "(unnamed)" } else { name.as_str() });
            print_parameters(&store);
            Ok(())
        }
    }
}

/// Apply `id=text` overrides through the same parser as preset text.
pub(crate) fn apply_overrides(store: &ParameterStore, overrides: &[String]) -> EyreResult<()> {
    let schema = store.schema();

    for entry in overrides {
        let (id, text) = entry
            .split_once('=')
            .ok_or_else(|| eyre!("override '{}' is not in id=value form", entry))?;
        let index = schema
            .index_of_id(id.trim())
            .ok_or_else(|| eyre!("unknown parameter '{}'", id))?;
        let def = schema
            .get(index)
            .ok_or_else(|| eyre!("unknown parameter '{}'", id))?;
        let value = format::parse(def, text).ok_or_else(|| eyre!("cannot read '{}' for {}", text, id))?;

        store.set(index, value);
    }
    Ok(())
}

fn print_parameters(store: &ParameterStore) {
    for (index, def) in store.schema().iter().enumerate() {
        println!("  {:<14} {}", def.id, format::display(def, store.get(index)));
    }
}
