use crate::read_input;
use clap::ValueEnum;
use plutus_data::{IsData, RawData, Separators};
use std::path::PathBuf;

#[derive(Copy, Clone, ValueEnum)]
pub enum Format {
    Cbor,
    Json,
}

/// Convert a datum between hex-encoded CBOR and JSON
#[derive(clap::Args)]
pub struct Args {
    /// File holding the datum, or '-' to read from stdin
    input: PathBuf,

    /// Format to convert from
    #[clap(long, default_value = "cbor")]
    from: Format,

    /// Print JSON without any whitespace
    #[clap(long, conflicts_with = "pretty")]
    compact: bool,

    /// Print JSON over multiple indented lines
    #[clap(long)]
    pretty: bool,
}

pub fn exec(
    Args {
        input,
        from,
        compact,
        pretty,
    }: Args,
) -> miette::Result<()> {
    let text = read_input(&input)?;

    let separators = match (compact, pretty) {
        (true, _) => Separators::Compact,
        (_, true) => Separators::Pretty,
        _ => Separators::Default,
    };

    let converted = match from {
        Format::Cbor => RawData::from_cbor_hex(&text)?.to_json(separators)?,
        Format::Json => RawData::from_json(&text)?.to_cbor_hex()?,
    };

    println!("{converted}");

    Ok(())
}
