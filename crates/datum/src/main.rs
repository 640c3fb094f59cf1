use clap::Parser;
use datum::cmd::{convert, cost_models, hash, script_hash};
use owo_colors::OwoColorize;
use tracing_subscriber::EnvFilter;

/// Datum: inspect, convert and hash Plutus Data
#[derive(Parser)]
#[clap(version, about, long_about = None)]
#[clap(propagate_version = true)]
pub enum Cmd {
    Hash(hash::Args),
    ScriptHash(script_hash::Args),
    Convert(convert::Args),
    CostModels(cost_models::Args),
}

impl Default for Cmd {
    fn default() -> Self {
        Self::parse()
    }
}

fn main() -> miette::Result<()> {
    panic_handler();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    match Cmd::default() {
        Cmd::Hash(args) => hash::exec(args),
        Cmd::ScriptHash(args) => script_hash::exec(args),
        Cmd::Convert(args) => convert::exec(args),
        Cmd::CostModels(args) => cost_models::exec(args),
    }
}

fn panic_handler() {
    std::panic::set_hook(Box::new(move |info| {
        let message = info
            .payload()
            .downcast_ref::<&str>()
            .map(|s| (*s).to_string())
            .or_else(|| {
                info.payload()
                    .downcast_ref::<String>()
                    .map(|s| s.to_string())
            })
            .unwrap_or_else(|| "unknown error".to_string());

        let location = info.location().map_or_else(
            || "".into(),
            |location| format!("{}:{}\n\n    ", location.file(), location.line()),
        );

        let error_message = indoc::formatdoc! {
            r#"{fatal}

                Whoops! You found a bug in datum.

                In your bug report please provide the information below and the
                input that produced it.

                    {location}{message}"#,
            fatal = "datum::fatal::error".red().bold(),
            location = location.purple(),
        };

        eprintln!("{error_message}")
    }));
}
